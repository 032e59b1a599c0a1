//! Analytic PSFs and synthetic point-source images.
//!
//! PSFs are mixtures of normalized elliptical Gaussians. Their autocorrelation
//! is again a Gaussian mixture, so the PSF-filtered image of a point source can
//! be sampled exactly at any sub-pixel center.

use std::f64::consts::PI;

use glam::{DVec2, IVec2};

use crate::common::Buffer2;
use crate::psf::{ImagePsf, KernelImage};

/// Normalized 2D Gaussian density with per-axis sigma, evaluated at offset `p`.
pub fn gaussian_density(p: DVec2, sigma: DVec2) -> f64 {
    let q = p / sigma;
    (-0.5 * q.length_squared()).exp() / (2.0 * PI * sigma.x * sigma.y)
}

/// One Gaussian term of a [`GaussianMixture`].
#[derive(Debug, Clone, Copy)]
pub struct GaussianComponent {
    pub amplitude: f64,
    pub offset: DVec2,
    pub sigma: DVec2,
}

/// PSF made of Gaussian components whose amplitudes sum to 1.
#[derive(Debug, Clone)]
pub struct GaussianMixture {
    components: Vec<GaussianComponent>,
}

impl GaussianMixture {
    pub fn new(components: Vec<GaussianComponent>) -> Self {
        let total: f64 = components.iter().map(|c| c.amplitude).sum();
        assert!(
            (total - 1.0).abs() < 1e-12,
            "component amplitudes must sum to 1, got {}",
            total
        );
        Self { components }
    }

    /// Circular Gaussian.
    pub fn circular(sigma: f64) -> Self {
        Self::elliptical(sigma, sigma)
    }

    /// Axis-aligned elliptical Gaussian.
    pub fn elliptical(sigma_x: f64, sigma_y: f64) -> Self {
        Self::new(vec![GaussianComponent {
            amplitude: 1.0,
            offset: DVec2::ZERO,
            sigma: DVec2::new(sigma_x, sigma_y),
        }])
    }

    /// Core plus an offset, broader wing: no mirror symmetry on either axis.
    pub fn skewed() -> Self {
        Self::new(vec![
            GaussianComponent {
                amplitude: 0.7,
                offset: DVec2::ZERO,
                sigma: DVec2::new(1.5, 1.5),
            },
            GaussianComponent {
                amplitude: 0.3,
                offset: DVec2::new(2.0, 1.0),
                sigma: DVec2::new(2.0, 2.0),
            },
        ])
    }

    /// PSF density at offset `p` from the source center.
    pub fn evaluate(&self, p: DVec2) -> f64 {
        self.components
            .iter()
            .map(|c| c.amplitude * gaussian_density(p - c.offset, c.sigma))
            .sum()
    }

    /// `integral psf(u) * psf(u + p) du`: the PSF-filtered image of a unit point source.
    pub fn autocorrelation(&self, p: DVec2) -> f64 {
        let mut total = 0.0;
        for a in &self.components {
            for b in &self.components {
                let sigma = DVec2::new(a.sigma.x.hypot(b.sigma.x), a.sigma.y.hypot(b.sigma.y));
                total +=
                    a.amplitude * b.amplitude * gaussian_density(p - (b.offset - a.offset), sigma);
            }
        }
        total
    }

    /// PSF sampled on a `(2r + 1)^2` grid centered on the middle cell.
    pub fn kernel_image(&self, radius: usize) -> KernelImage {
        let size = 2 * radius + 1;
        let r = radius as f64;
        KernelImage::centered(Buffer2::from_fn(size, size, |x, y| {
            self.evaluate(DVec2::new(x as f64 - r, y as f64 - r))
        }))
    }

    pub fn image_psf(&self, radius: usize) -> ImagePsf {
        ImagePsf::new(self.kernel_image(radius))
    }
}

/// PSF-filtered image of a point source of `flux` at image position `center`.
pub fn filtered_point_source(
    width: usize,
    height: usize,
    origin: IVec2,
    center: DVec2,
    flux: f64,
    psf: &GaussianMixture,
) -> Buffer2<f64> {
    Buffer2::from_fn(width, height, |x, y| {
        let position = DVec2::new(x as f64, y as f64) + origin.as_dvec2();
        flux * psf.autocorrelation(position - center)
    })
}

/// Unfiltered image of a point source: `flux` times the kernel image, with the
/// kernel center on array pixel `at`.
pub fn stamp_kernel(
    width: usize,
    height: usize,
    kernel: &KernelImage,
    at: IVec2,
    flux: f64,
) -> Buffer2<f64> {
    let c = kernel.center();
    Buffer2::from_fn(width, height, |x, y| {
        let kx = x as i32 - at.x + c.x;
        let ky = y as i32 - at.y + c.y;
        if kx < 0 || ky < 0 || kx as usize >= kernel.width() || ky as usize >= kernel.height() {
            0.0
        } else {
            flux * kernel.get(kx as usize, ky as usize)
        }
    })
}

/// Full-frame correlation with `kernel`, treating pixels outside the image as zero.
pub fn correlate(image: &Buffer2<f64>, kernel: &KernelImage) -> Buffer2<f64> {
    let c = kernel.center();
    Buffer2::from_fn(image.width(), image.height(), |x, y| {
        let mut sum = 0.0;
        for ky in 0..kernel.height() {
            for kx in 0..kernel.width() {
                let sx = x as i64 + kx as i64 - c.x as i64;
                let sy = y as i64 + ky as i64 - c.y as i64;
                if let Some(&v) = image.get_signed(sx, sy) {
                    sum += kernel.get(kx, ky) * v;
                }
            }
        }
        sum
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixture_is_normalized() {
        for psf in [
            GaussianMixture::circular(1.5),
            GaussianMixture::elliptical(1.5, 2.5),
            GaussianMixture::skewed(),
        ] {
            let k = psf.kernel_image(15);
            assert!((k.sum() - 1.0).abs() < 1e-6, "sum = {}", k.sum());
        }
    }

    #[test]
    fn test_autocorrelation_peak_matches_sum_of_squares() {
        for psf in [GaussianMixture::circular(2.0), GaussianMixture::skewed()] {
            let k = psf.kernel_image(15);
            let peak = psf.autocorrelation(DVec2::ZERO);
            assert!(
                (peak - k.sum_of_squares()).abs() / peak < 1e-6,
                "peak {} vs sum of squares {}",
                peak,
                k.sum_of_squares()
            );
        }
    }

    #[test]
    fn test_skewed_psf_is_asymmetric() {
        let psf = GaussianMixture::skewed();
        let p = DVec2::new(2.0, 0.0);
        assert!((psf.evaluate(p) - psf.evaluate(-p)).abs() > 1e-3);
        // Autocorrelation is always point-symmetric
        assert!((psf.autocorrelation(p) - psf.autocorrelation(-p)).abs() < 1e-15);
    }

    #[test]
    fn test_correlate_with_delta_is_identity() {
        let image = Buffer2::from_fn(4, 3, |x, y| (x * y) as f64);
        assert_eq!(correlate(&image, &KernelImage::delta()), image);
    }

    #[test]
    fn test_stamp_kernel_places_center() {
        let kernel = KernelImage::centered(Buffer2::from_fn(3, 3, |x, y| (x + 3 * y) as f64));
        let image = stamp_kernel(6, 6, &kernel, IVec2::new(4, 2), 2.0);
        assert_eq!(image[(4, 2)], 2.0 * kernel.get(1, 1));
        assert_eq!(image[(3, 1)], 2.0 * kernel.get(0, 0));
        assert_eq!(image[(0, 0)], 0.0);
    }
}
