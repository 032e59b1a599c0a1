//! Error types for PSF-filtered photometry.

use glam::IVec2;
use thiserror::Error;

/// Errors that can occur while measuring a source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Unknown warping kernel '{name}'")]
    UnknownWarpingKernel { name: String },

    #[error("Degenerate PSF at ({x:.2}, {y:.2}): sum of squared weights is {sum_sq}")]
    DegeneratePsf { x: f64, y: f64, sum_sq: f64 },

    #[error("Kernel image cannot be normalized: total weight is {sum}")]
    EmptyKernel { sum: f64 },

    #[error(
        "Kernel footprint [{min}, {max}) extends outside the {width}x{height} image plane"
    )]
    FootprintOutOfBounds {
        min: IVec2,
        max: IVec2,
        width: usize,
        height: usize,
    },

    #[error("Source center ({x}, {y}) cannot be mapped onto the pixel grid")]
    CenterOutOfRange { x: f64, y: f64 },

    #[error("No measurement algorithm registered as '{name}'")]
    UnknownAlgorithm { name: String },
}

/// Coarse classification of [`Error`] for callers that tally failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad configuration; identical for every source.
    Configuration,
    /// The numbers do not admit a result (degenerate PSF, empty kernel).
    Computation,
    /// The kernel footprint leaves the stored image, or the center is not on any pixel.
    Bounds,
    /// Registry lookup miss.
    Lookup,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownWarpingKernel { .. } => ErrorKind::Configuration,
            Error::DegeneratePsf { .. } | Error::EmptyKernel { .. } => ErrorKind::Computation,
            Error::FootprintOutOfBounds { .. } | Error::CenterOutOfRange { .. } => {
                ErrorKind::Bounds
            }
            Error::UnknownAlgorithm { .. } => ErrorKind::Lookup,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
