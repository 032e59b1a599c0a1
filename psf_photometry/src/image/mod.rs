//! Masked image planes and exposures.
//!
//! An [`ImagePlane`] stores value, variance and mask grids of equal shape plus
//! the integer origin of array pixel `(0, 0)`. An [`Exposure`] pairs a plane
//! with the PSF model that describes it.


use std::fmt;
use std::sync::Arc;

use glam::IVec2;
use num_traits::{AsPrimitive, Float};

use crate::common::Buffer2;
use crate::psf::Psf;

/// Numeric pixel representation of an image plane.
///
/// Accumulation always happens in `f64`; planes may be stored as `f32` or `f64`.
pub trait Pixel: Float + AsPrimitive<f64> + Send + Sync + fmt::Debug + 'static {}

impl<T> Pixel for T where T: Float + AsPrimitive<f64> + Send + Sync + fmt::Debug + 'static {}

/// Per-pixel quality bits. Carried through measurements untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mask(pub u16);

impl Mask {
    pub const NONE: Mask = Mask(0);
    pub const BAD: Mask = Mask(1 << 0);
    pub const SAT: Mask = Mask(1 << 1);
    pub const INTRP: Mask = Mask(1 << 2);
    pub const CR: Mask = Mask(1 << 3);
    pub const EDGE: Mask = Mask(1 << 4);
    pub const NO_DATA: Mask = Mask(1 << 5);

    #[inline]
    pub fn contains(self, other: Mask) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Mask {
    type Output = Mask;

    #[inline]
    fn bitor(self, rhs: Mask) -> Mask {
        Mask(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for Mask {
    #[inline]
    fn bitor_assign(&mut self, rhs: Mask) {
        self.0 |= rhs.0;
    }
}

/// A single pixel's value, variance and mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskedPixel<T> {
    pub value: T,
    pub variance: T,
    pub mask: Mask,
}

/// Value, variance and mask grids sharing one shape and one origin.
#[derive(Debug, Clone)]
pub struct ImagePlane<T: Pixel> {
    values: Buffer2<T>,
    variance: Buffer2<T>,
    mask: Buffer2<Mask>,
    origin: IVec2,
}

impl<T: Pixel> ImagePlane<T> {
    /// Plane with an all-clear mask.
    pub fn new(values: Buffer2<T>, variance: Buffer2<T>, origin: IVec2) -> Self {
        let mask = Buffer2::new_default(values.width(), values.height());
        Self::with_mask(values, variance, mask, origin)
    }

    pub fn with_mask(
        values: Buffer2<T>,
        variance: Buffer2<T>,
        mask: Buffer2<Mask>,
        origin: IVec2,
    ) -> Self {
        assert!(
            values.same_shape(&variance),
            "variance plane {}x{} does not match value plane {}x{}",
            variance.width(),
            variance.height(),
            values.width(),
            values.height()
        );
        assert!(
            values.same_shape(&mask),
            "mask plane {}x{} does not match value plane {}x{}",
            mask.width(),
            mask.height(),
            values.width(),
            values.height()
        );
        Self {
            values,
            variance,
            mask,
            origin,
        }
    }

    /// Plane whose variance is `variance` everywhere.
    pub fn with_uniform_variance(values: Buffer2<T>, variance: T, origin: IVec2) -> Self {
        let variance = Buffer2::new_filled(values.width(), values.height(), variance);
        Self::new(values, variance, origin)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.values.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.values.height()
    }

    /// Image coordinate of array pixel `(0, 0)`.
    #[inline]
    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    #[inline]
    pub fn values(&self) -> &Buffer2<T> {
        &self.values
    }

    #[inline]
    pub fn variance(&self) -> &Buffer2<T> {
        &self.variance
    }

    #[inline]
    pub fn mask(&self) -> &Buffer2<Mask> {
        &self.mask
    }

    /// Pixel at array coordinates `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> MaskedPixel<T> {
        MaskedPixel {
            value: self.values[(x, y)],
            variance: self.variance[(x, y)],
            mask: self.mask[(x, y)],
        }
    }

    /// Whether the `w x h` block whose lower corner is array pixel `corner` is stored.
    #[inline]
    pub fn contains_block(&self, corner: IVec2, w: usize, h: usize) -> bool {
        self.values
            .contains_rect(corner.x as i64, corner.y as i64, w, h)
    }
}

/// An image plane together with its PSF model.
///
/// The PSF is held behind an `Arc` so one exposure can be measured from
/// several threads; implementations must not mutate internal state.
#[derive(Clone)]
pub struct Exposure<T: Pixel> {
    image: ImagePlane<T>,
    psf: Arc<dyn Psf>,
}

impl<T: Pixel> Exposure<T> {
    pub fn new(image: ImagePlane<T>, psf: Arc<dyn Psf>) -> Self {
        Self { image, psf }
    }

    #[inline]
    pub fn image(&self) -> &ImagePlane<T> {
        &self.image
    }

    #[inline]
    pub fn psf(&self) -> &dyn Psf {
        self.psf.as_ref()
    }
}

impl<T: Pixel> fmt::Debug for Exposure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exposure")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("origin", &self.image.origin())
            .finish_non_exhaustive()
    }
}
