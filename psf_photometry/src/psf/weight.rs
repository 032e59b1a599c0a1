//! Optimal photometric weight from the PSF's self-overlap.
//!
//! For data `d = A * psf + noise`, the PSF-matched estimate of the amplitude
//! `A` is `sum(psf * d) / sum(psf^2)`. With the PSF normalized to unit sum the
//! scalar factor is `1 / sum(psf^2)`.

use glam::DVec2;
use tracing::trace;

use super::{KernelImage, Psf};
use crate::error::{Error, Result};

/// `1 / sum(w^2)` of `kernel` after normalizing it to unit sum.
///
/// `point` is only used to report where a degenerate kernel came from.
pub fn optimal_weight(kernel: &KernelImage, point: DVec2) -> Result<f64> {
    let raw_sum_sq = kernel.sum_of_squares();
    if raw_sum_sq == 0.0 {
        return Err(Error::DegeneratePsf {
            x: point.x,
            y: point.y,
            sum_sq: raw_sum_sq,
        });
    }

    let sum_sq = kernel.normalized()?.sum_of_squares();
    if !(sum_sq > 0.0 && sum_sq.is_finite()) {
        return Err(Error::DegeneratePsf {
            x: point.x,
            y: point.y,
            sum_sq,
        });
    }

    Ok(1.0 / sum_sq)
}

/// Optimal weight of the PSF evaluated at `point`.
///
/// `point` should be the center of the pixel nearest the source; the
/// sub-pixel residual is handled by warping the image, not the PSF.
pub fn psf_weight(psf: &dyn Psf, point: DVec2) -> Result<f64> {
    let kernel = psf.local_kernel(point);
    let weight = optimal_weight(&kernel, point)?;
    trace!(
        x = point.x,
        y = point.y,
        width = kernel.width(),
        height = kernel.height(),
        weight,
        "PSF weight"
    );
    Ok(weight)
}
