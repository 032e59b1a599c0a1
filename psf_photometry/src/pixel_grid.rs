//! Mapping between continuous image positions and pixel indices.
//!
//! Pixel `i` of a plane whose origin is `x0` is centered on position `x0 + i`.
//! A position maps to the nearest pixel center plus a signed fraction in
//! `[-0.5, 0.5)`; an exact half-pixel position rounds up, so its fraction is
//! `-0.5` and never `+0.5`.

use glam::{DVec2, IVec2};

/// Nearest pixel index (array space) and the residual from its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelIndex {
    /// Index into the plane's array, origin already removed.
    pub index: i32,
    /// `position - center(index)`, in `[-0.5, 0.5)`.
    pub fraction: f64,
}

/// Map a position along one axis to the nearest pixel of a plane with the given origin.
#[inline]
pub fn position_to_index(position: f64, origin: i32) -> PixelIndex {
    let (index, fraction) = split_nearest(position - origin as f64);
    PixelIndex {
        index: index as i32,
        fraction,
    }
}

/// Nearest integer and residual. `full + 0.5` can round up across an integer
/// (e.g. for the largest double below 0.5), which is undone here so the
/// residual stays in `[-0.5, 0.5)`.
#[inline]
fn split_nearest(full: f64) -> (f64, f64) {
    let mut index = (full + 0.5).floor();
    if full - index < -0.5 {
        index -= 1.0;
    }
    (index, full - index)
}

/// [`position_to_index`] for untrusted positions: `None` if `position` is not
/// finite or its nearest pixel index does not fit in an `i32`.
pub fn checked_position_to_index(position: f64, origin: i32) -> Option<PixelIndex> {
    let (index, fraction) = split_nearest(position - origin as f64);
    if !index.is_finite() || index < i32::MIN as f64 || index > i32::MAX as f64 {
        return None;
    }
    Some(PixelIndex {
        index: index as i32,
        fraction,
    })
}

/// Continuous position of the center of array pixel `index`.
#[inline]
pub fn index_to_position(index: i32, origin: i32) -> f64 {
    index as f64 + origin as f64
}

/// Two-axis [`position_to_index`]: returns the nearest pixel and the per-axis fraction.
pub fn map_to_pixel(position: DVec2, origin: IVec2) -> (IVec2, DVec2) {
    let x = position_to_index(position.x, origin.x);
    let y = position_to_index(position.y, origin.y);
    (
        IVec2::new(x.index, y.index),
        DVec2::new(x.fraction, y.fraction),
    )
}

/// Two-axis [`checked_position_to_index`].
pub fn checked_map_to_pixel(position: DVec2, origin: IVec2) -> Option<(IVec2, DVec2)> {
    let x = checked_position_to_index(position.x, origin.x)?;
    let y = checked_position_to_index(position.y, origin.y)?;
    Some((
        IVec2::new(x.index, y.index),
        DVec2::new(x.fraction, y.fraction),
    ))
}

/// Two-axis [`index_to_position`].
pub fn pixel_center(index: IVec2, origin: IVec2) -> DVec2 {
    DVec2::new(
        index_to_position(index.x, origin.x),
        index_to_position(index.y, origin.y),
    )
}
