//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use psf_photometry::prelude::*;
//! ```

pub use std::sync::Arc;

pub use glam::{DVec2, IVec2};

pub use crate::{Buffer2, Exposure, GaussianPsf, ImagePlane, ImagePsf, Mask, Psf};

pub use crate::{Config, Error, FilteredFlux, FluxMeasurement, FluxRecord, WarpingKernel};

pub use crate::{AlgorithmRegistry, Catalog, Source, measure_sources};
