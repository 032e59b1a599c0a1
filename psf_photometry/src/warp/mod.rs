//! Sub-pixel warping kernels.
//!
//! A warping kernel, correlated with the image around the nearest pixel `n`,
//! yields the image value at `n + f` for a fraction `f` in `[-0.5, 0.5)`. All
//! supported families are separable with an even number of taps `2a`:
//!
//! - **Bilinear**: triangle `max(0, 1 - |x|)`, `a = 1`.
//! - **Lanczos-a**: `sinc(x) * sinc(x / a)` for `|x| < a`.
//!
//! The canonical center tap is `a - 1`, i.e. the tap just below the zero-offset
//! point. For a negative fraction the sample point lies below `n`, so the center
//! moves one tap up to keep the taps symmetric around `n + f`. Tap `i` then sits
//! at image offset `i - center` and receives weight `K(f - (i - center))`.


use std::f64::consts::PI;
use std::str::FromStr;

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::{Error, Result};
use crate::psf::KernelImage;

/// Resampling family used to shift the image by a sub-pixel amount.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WarpingKernel {
    /// 2x2 triangle kernel - fast, smooths noise
    Bilinear,
    /// Lanczos-2 (4x4 kernel)
    Lanczos2,
    /// Lanczos-3 (6x6 kernel) - default
    #[default]
    Lanczos3,
    /// Lanczos-4 (8x8 kernel)
    Lanczos4,
    /// Lanczos-5 (10x10 kernel)
    Lanczos5,
}

impl WarpingKernel {
    /// Resolve a configuration name such as `"lanczos3"`.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| Error::UnknownWarpingKernel {
            name: name.to_string(),
        })
    }

    /// Half-width `a`: the kernel has `2a` taps per axis.
    #[inline]
    pub fn radius(&self) -> usize {
        match self {
            WarpingKernel::Bilinear => 1,
            WarpingKernel::Lanczos2 => 2,
            WarpingKernel::Lanczos3 => 3,
            WarpingKernel::Lanczos4 => 4,
            WarpingKernel::Lanczos5 => 5,
        }
    }

    #[inline]
    pub fn taps(&self) -> usize {
        2 * self.radius()
    }

    /// Center tap for a zero or positive fraction.
    #[inline]
    pub fn canonical_center(&self) -> i32 {
        self.radius() as i32 - 1
    }

    /// 1D kernel value at distance `x` from the sample point.
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            WarpingKernel::Bilinear => (1.0 - x.abs()).max(0.0),
            _ => lanczos(x, self.radius() as f64),
        }
    }
}

/// Lanczos window `sinc(x) * sinc(x / a)`, zero for `|x| >= a`.
#[inline]
fn lanczos(x: f64, a: f64) -> f64 {
    if x.abs() < 1e-12 {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = PI * x;
    let pi_x_a = pi_x / a;

    (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
}

/// Center tap along one axis after the parity tie-break.
#[inline]
pub fn center_for_fraction(kernel: WarpingKernel, fraction: f64) -> i32 {
    if fraction < 0.0 {
        kernel.canonical_center() + 1
    } else {
        kernel.canonical_center()
    }
}

/// Normalized 1D taps for `fraction` with the given center tap.
fn axis_weights(kernel: WarpingKernel, fraction: f64, center: i32) -> Result<Vec<f64>> {
    let mut weights: Vec<f64> = (0..kernel.taps() as i32)
        .map(|i| kernel.evaluate(fraction - (i - center) as f64))
        .collect();

    let sum: f64 = weights.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return Err(Error::EmptyKernel { sum });
    }
    weights.iter_mut().for_each(|w| *w /= sum);
    Ok(weights)
}

/// Build the normalized 2D warping kernel that shifts the image by `fraction`.
///
/// Each component of `fraction` must lie in `[-0.5, 0.5)`.
pub fn build_warp_kernel(kernel: WarpingKernel, fraction: DVec2) -> Result<KernelImage> {
    debug_assert!(
        (-0.5..0.5).contains(&fraction.x) && (-0.5..0.5).contains(&fraction.y),
        "fraction {} outside [-0.5, 0.5)",
        fraction
    );

    let center = IVec2::new(
        center_for_fraction(kernel, fraction.x),
        center_for_fraction(kernel, fraction.y),
    );
    let wx = axis_weights(kernel, fraction.x, center.x)?;
    let wy = axis_weights(kernel, fraction.y, center.y)?;

    Ok(KernelImage::separable(&wx, &wy, center))
}

/// [`build_warp_kernel`] for a kernel given by configuration name.
pub fn build_named_warp_kernel(name: &str, fraction: DVec2) -> Result<KernelImage> {
    build_warp_kernel(WarpingKernel::from_name(name)?, fraction)
}
