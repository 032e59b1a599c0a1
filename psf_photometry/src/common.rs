//! Common utilities for psf_photometry.

pub use ::common::buffer2::Buffer2;
