//! psf_photometry - Point-source flux from PSF-filtered astronomical images.
//!
//! The exposure is assumed to be already filtered (correlated) with its own
//! PSF. A source's flux is then recovered from a single filtered pixel value:
//! the image is shifted by the source's sub-pixel offset with a small warping
//! kernel evaluated at one point, and the value is scaled by the PSF's optimal
//! weight `1 / sum(psf^2)`.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use psf_photometry::prelude::*;
//!
//! let exposure = Exposure::new(filtered_plane, Arc::new(GaussianPsf::new(15, 15, 2.0)));
//! let algorithm = FilteredFlux::new(Config::default())?;
//!
//! let mut record = FluxRecord::default();
//! algorithm.apply(&exposure, DVec2::new(512.3, 247.8), &mut record)?;
//! println!("flux = {:?}", record.flux());
//! ```

pub(crate) mod common;
pub mod config;
pub mod convolve;
pub mod driver;
pub mod error;
pub mod flux;
pub mod image;
pub mod pixel_grid;
pub mod psf;
pub mod registry;
pub mod warp;

#[cfg(test)]
pub mod testing;

pub mod prelude;

// ============================================================================
// Images and PSFs
// ============================================================================

pub use crate::common::Buffer2;
pub use image::{Exposure, ImagePlane, Mask, MaskedPixel, Pixel};
pub use psf::{GaussianPsf, ImagePsf, KernelImage, Psf, optimal_weight, psf_weight};

// ============================================================================
// Measurement
// ============================================================================

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use flux::{FILTERED_FLUX, FilteredFlux, FluxMeasurement, FluxRecord, measure_filtered_flux};
pub use warp::{WarpingKernel, build_named_warp_kernel, build_warp_kernel};

// ============================================================================
// Batch measurement
// ============================================================================

pub use driver::{Catalog, FailureCounts, Source, measure_sources};
pub use registry::{AlgorithmRegistry, MeasureFn};
