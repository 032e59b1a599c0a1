//! PSF-filtered flux of a point source.
//!
//! The exposure is expected to be filtered with its own PSF, so the value of the
//! filtered image at the source center is `flux * sum(psf^2)`. Measuring it needs
//! only two things at the source position:
//!
//! 1. The optimal weight `1 / sum(psf^2)` of the PSF at the nearest pixel.
//! 2. The filtered image value at the exact sub-pixel center. Instead of shifting
//!    the image, a warping kernel for the fractional offset is convolved with the
//!    image at the nearest pixel only.
//!
//! `flux = value * weight` and `variance = value_variance * weight^2`.


use glam::{DVec2, IVec2};
use tracing::debug;

use crate::config::Config;
use crate::convolve::convolve_at_point;
use crate::error::{Error, Result};
use crate::image::{Exposure, Mask, Pixel};
use crate::pixel_grid::{checked_map_to_pixel, pixel_center};
use crate::psf::psf_weight;
use crate::warp::build_warp_kernel;

/// Name under which the measurement is registered.
pub const FILTERED_FLUX: &str = "filtered_flux";

/// A successful flux measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxMeasurement {
    pub flux: f64,
    /// Variance of `flux`.
    pub flux_variance: f64,
    /// Optimal weight `1 / sum(psf^2)` that scaled the filtered value.
    pub weight: f64,
    /// OR of the mask bits under the warping footprint.
    pub mask: Mask,
}

impl FluxMeasurement {
    /// One-sigma flux uncertainty.
    pub fn flux_sigma(&self) -> f64 {
        self.flux_variance.sqrt()
    }
}

/// Caller-owned output slots for one source.
///
/// Starts out failed. Flux and variance are only ever written together with
/// clearing the flag, so a failed record never exposes values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxRecord {
    flux: f64,
    flux_variance: f64,
    failed: bool,
}

impl Default for FluxRecord {
    fn default() -> Self {
        Self {
            flux: f64::NAN,
            flux_variance: f64::NAN,
            failed: true,
        }
    }
}

impl FluxRecord {
    #[inline]
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// `(flux, variance)`, or `None` if the record is failed.
    pub fn values(&self) -> Option<(f64, f64)> {
        (!self.failed).then_some((self.flux, self.flux_variance))
    }

    pub fn flux(&self) -> Option<f64> {
        self.values().map(|(flux, _)| flux)
    }

    pub fn flux_variance(&self) -> Option<f64> {
        self.values().map(|(_, variance)| variance)
    }

    pub(crate) fn mark_failed(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn set(&mut self, measurement: &FluxMeasurement) {
        *self = Self {
            flux: measurement.flux,
            flux_variance: measurement.flux_variance,
            failed: false,
        };
    }
}

/// Measure the PSF-filtered flux of the source centered at `center`.
///
/// `center` is in image coordinates, i.e. including the plane origin. A bad
/// warping kernel name fails before the image or PSF are touched. A center
/// that is not finite or lies beyond the `i32` pixel range is a bounds error.
pub fn measure_filtered_flux<T: Pixel>(
    exposure: &Exposure<T>,
    center: DVec2,
    config: &Config,
) -> Result<FluxMeasurement> {
    let kernel = config.warping_kernel()?;
    let image = exposure.image();

    let out_of_range = || Error::CenterOutOfRange {
        x: center.x,
        y: center.y,
    };
    let (nearest, fraction) =
        checked_map_to_pixel(center, image.origin()).ok_or_else(out_of_range)?;
    let nearest_position = pixel_center(nearest, image.origin());

    let weight = psf_weight(exposure.psf(), nearest_position)?;

    let warp = build_warp_kernel(kernel, fraction)?;
    let alignment = match (
        nearest.x.checked_sub(warp.center().x),
        nearest.y.checked_sub(warp.center().y),
    ) {
        (Some(x), Some(y)) => IVec2::new(x, y),
        _ => return Err(out_of_range()),
    };
    let shifted = convolve_at_point(image, &warp, alignment)?;

    let measurement = FluxMeasurement {
        flux: shifted.value * weight,
        flux_variance: shifted.variance * weight * weight,
        weight,
        mask: shifted.mask,
    };

    debug!(
        x = center.x,
        y = center.y,
        nearest_x = nearest.x,
        nearest_y = nearest.y,
        dx = fraction.x,
        dy = fraction.y,
        weight,
        flux = measurement.flux,
        variance = measurement.flux_variance,
        "Filtered flux measured"
    );

    Ok(measurement)
}

/// Filtered-flux measurement bound to one validated configuration.
#[derive(Debug, Clone)]
pub struct FilteredFlux {
    config: Config,
}

impl FilteredFlux {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn measure<T: Pixel>(
        &self,
        exposure: &Exposure<T>,
        center: DVec2,
    ) -> Result<FluxMeasurement> {
        measure_filtered_flux(exposure, center, &self.config)
    }

    /// Measure into `record`. The record is marked failed first and is only
    /// filled in once every step has succeeded; on error it stays failed and
    /// the error is returned.
    pub fn apply<T: Pixel>(
        &self,
        exposure: &Exposure<T>,
        center: DVec2,
        record: &mut FluxRecord,
    ) -> Result<FluxMeasurement> {
        record.mark_failed();
        let measurement = self.measure(exposure, center)?;
        record.set(&measurement);
        Ok(measurement)
    }
}
