//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::SizeBound;

/// Calculate the dimensions an image must be shrunk to so it fits `bound`.
///
/// Returns `None` when no resize is needed: the image already fits, or one
/// of its dimensions is zero.
///
/// Otherwise the image is scaled uniformly by
/// `min(max_width / width, max_height / height)`. The limiting dimension lands
/// exactly on its bound and the other is floored, so feeding the result back
/// in always returns `None`. Neither output dimension goes below 1px.
///
/// # Examples
/// ```
/// # use image_intake::imaging::{SizeBound, calculate_bounded_dimensions};
/// // 4000x3000 into 2000x2000 → width limits: 2000x1500
/// assert_eq!(
///     calculate_bounded_dimensions((4000, 3000), SizeBound::new(2000, 2000)),
///     Some((2000, 1500))
/// );
///
/// // Already fits → no resize
/// assert_eq!(
///     calculate_bounded_dimensions((800, 600), SizeBound::new(2000, 2000)),
///     None
/// );
/// ```
pub fn calculate_bounded_dimensions(source: (u32, u32), bound: SizeBound) -> Option<(u32, u32)> {
    let (src_w, src_h) = source;

    if src_w == 0 || src_h == 0 || bound.contains(src_w, src_h) {
        return None;
    }

    let (w, h) = (u64::from(src_w), u64::from(src_h));
    let (max_w, max_h) = (u64::from(bound.max_width), u64::from(bound.max_height));

    // max_w / w <= max_h / h, cross-multiplied to stay in integers
    let (new_w, new_h) = if max_w * h <= max_h * w {
        // Width is the tighter constraint
        (max_w, h * max_w / w)
    } else {
        // Height is the tighter constraint
        (w * max_h / h, max_h)
    };

    Some((clamp_dimension(new_w), clamp_dimension(new_h)))
}

fn clamp_dimension(value: u64) -> u32 {
    // Never larger than the source, which was a u32
    u32::try_from(value).unwrap_or(u32::MAX).max(1)
}

/// Uniform reduction factor applied when shrinking `source` into `bound`.
///
/// `2.0` means the image was halved. Taken from the limiting axis, the one
/// [`calculate_bounded_dimensions`] lands exactly on its bound, so flooring
/// of the other axis does not skew it. Images that already fit report `1.0`.
pub fn reduction_factor(source: (u32, u32), bound: SizeBound) -> f64 {
    if source.0 == 0 || source.1 == 0 || bound.contains(source.0, source.1) {
        return 1.0;
    }
    let fw = f64::from(source.0) / f64::from(bound.max_width.max(1));
    let fh = f64::from(source.1) / f64::from(bound.max_height.max(1));
    fw.max(fh)
}
