//! PSF models and kernel images.
//!
//! The measurement core only needs one capability from a PSF: an image of the
//! PSF local to a point ([`Psf::local_kernel`]). Two simple models are provided
//! for callers without a fitted PSF: a sampled Gaussian and a fixed kernel image.


mod weight;

pub use weight::{optimal_weight, psf_weight};

use glam::{DVec2, IVec2};

use crate::common::Buffer2;
use crate::error::{Error, Result};

/// A grid of `f64` weights with one cell marked as the kernel origin.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelImage {
    weights: Buffer2<f64>,
    center: IVec2,
}

impl KernelImage {
    pub fn new(weights: Buffer2<f64>, center: IVec2) -> Self {
        assert!(
            center.x >= 0
                && center.y >= 0
                && (center.x as usize) < weights.width()
                && (center.y as usize) < weights.height(),
            "kernel center {} outside {}x{} kernel",
            center,
            weights.width(),
            weights.height()
        );
        Self { weights, center }
    }

    /// Kernel whose center is the middle cell, `((w - 1) / 2, (h - 1) / 2)`.
    pub fn centered(weights: Buffer2<f64>) -> Self {
        let center = IVec2::new(
            (weights.width() as i32 - 1) / 2,
            (weights.height() as i32 - 1) / 2,
        );
        Self::new(weights, center)
    }

    /// Single unit weight: the identity under convolution.
    pub fn delta() -> Self {
        Self::new(Buffer2::new(1, 1, vec![1.0]), IVec2::ZERO)
    }

    /// Separable kernel `weights[(x, y)] = wx[x] * wy[y]`.
    pub fn separable(wx: &[f64], wy: &[f64], center: IVec2) -> Self {
        Self::new(
            Buffer2::from_fn(wx.len(), wy.len(), |x, y| wx[x] * wy[y]),
            center,
        )
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.weights.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.weights.height()
    }

    #[inline]
    pub fn center(&self) -> IVec2 {
        self.center
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.weights[(x, y)]
    }

    #[inline]
    pub fn weights(&self) -> &Buffer2<f64> {
        &self.weights
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    pub fn sum_of_squares(&self) -> f64 {
        self.weights.iter().map(|w| w * w).sum()
    }

    /// Copy scaled so the weights sum to 1.
    pub fn normalized(&self) -> Result<KernelImage> {
        let sum = self.sum();
        if sum == 0.0 || !sum.is_finite() {
            return Err(Error::EmptyKernel { sum });
        }
        let inv = 1.0 / sum;
        Ok(KernelImage {
            weights: self.weights.map(|w| w * inv),
            center: self.center,
        })
    }
}

/// A PSF model that can produce the PSF image local to any point.
///
/// Measurements may call this concurrently for different sources.
pub trait Psf: Send + Sync {
    /// Image of the PSF at continuous position `point`, with the kernel center
    /// marking the cell on which a point source at `point` is centered.
    fn local_kernel(&self, point: DVec2) -> KernelImage;
}

/// Spatially constant Gaussian PSF sampled on a `width x height` grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianPsf {
    width: usize,
    height: usize,
    sigma_x: f64,
    sigma_y: f64,
}

impl GaussianPsf {
    /// Circular Gaussian with standard deviation `sigma` pixels.
    pub fn new(width: usize, height: usize, sigma: f64) -> Self {
        Self::elliptical(width, height, sigma, sigma)
    }

    /// Axis-aligned elliptical Gaussian.
    pub fn elliptical(width: usize, height: usize, sigma_x: f64, sigma_y: f64) -> Self {
        assert!(width > 0 && height > 0, "PSF dimensions must be positive");
        assert!(
            sigma_x > 0.0 && sigma_y > 0.0,
            "PSF sigma must be positive, got ({}, {})",
            sigma_x,
            sigma_y
        );
        Self {
            width,
            height,
            sigma_x,
            sigma_y,
        }
    }

    pub fn sigma(&self) -> DVec2 {
        DVec2::new(self.sigma_x, self.sigma_y)
    }
}

impl Psf for GaussianPsf {
    fn local_kernel(&self, _point: DVec2) -> KernelImage {
        let cx = (self.width as i32 - 1) / 2;
        let cy = (self.height as i32 - 1) / 2;
        let two_sx2 = 2.0 * self.sigma_x * self.sigma_x;
        let two_sy2 = 2.0 * self.sigma_y * self.sigma_y;

        let weights = Buffer2::from_fn(self.width, self.height, |x, y| {
            let dx = (x as i32 - cx) as f64;
            let dy = (y as i32 - cy) as f64;
            (-(dx * dx) / two_sx2 - (dy * dy) / two_sy2).exp()
        });
        let sum: f64 = weights.iter().sum();
        KernelImage::new(weights.map(|w| w / sum), IVec2::new(cx, cy))
    }
}

/// PSF given by one fixed kernel image, returned for every position.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePsf {
    kernel: KernelImage,
}

impl ImagePsf {
    pub fn new(kernel: KernelImage) -> Self {
        Self { kernel }
    }
}

impl Psf for ImagePsf {
    fn local_kernel(&self, _point: DVec2) -> KernelImage {
        self.kernel.clone()
    }
}
