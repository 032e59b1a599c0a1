//! Convolution evaluated at a single output pixel.
//!
//! Only the kernel footprint around one pixel is read, so shifting a source
//! by a sub-pixel amount costs `O(k^2)` instead of a full-image pass.

use glam::IVec2;

use crate::error::{Error, Result};
use crate::image::{ImagePlane, Mask, MaskedPixel, Pixel};
use crate::psf::KernelImage;

/// Correlate `kernel` with `plane`, aligning kernel cell `(0, 0)` with array
/// pixel `alignment`.
///
/// Returns `sum(w * value)` and `sum(w^2 * variance)`; the mask is the OR of
/// every footprint pixel with a nonzero weight. Fails without reading any
/// pixel if the footprint is not entirely inside the plane.
pub fn convolve_at_point<T: Pixel>(
    plane: &ImagePlane<T>,
    kernel: &KernelImage,
    alignment: IVec2,
) -> Result<MaskedPixel<f64>> {
    let (kw, kh) = (kernel.width(), kernel.height());
    if !plane.contains_block(alignment, kw, kh) {
        return Err(Error::FootprintOutOfBounds {
            min: alignment,
            max: alignment.saturating_add(IVec2::new(kw as i32, kh as i32)),
            width: plane.width(),
            height: plane.height(),
        });
    }

    let x0 = alignment.x as usize;
    let y0 = alignment.y as usize;
    let values = plane.values();
    let variance = plane.variance();
    let masks = plane.mask();

    let mut sum = 0.0f64;
    let mut var_sum = 0.0f64;
    let mut mask = Mask::NONE;

    for ky in 0..kh {
        let row = y0 + ky;
        let value_row = &values.row(row)[x0..x0 + kw];
        let var_row = &variance.row(row)[x0..x0 + kw];
        let mask_row = &masks.row(row)[x0..x0 + kw];

        for kx in 0..kw {
            let w = kernel.get(kx, ky);
            if w == 0.0 {
                continue;
            }
            sum += w * value_row[kx].as_();
            var_sum += w * w * var_row[kx].as_();
            mask |= mask_row[kx];
        }
    }

    Ok(MaskedPixel {
        value: sum,
        variance: var_sum,
        mask,
    })
}
