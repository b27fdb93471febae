//! Color and size normalization of decoded images.
//!
//! Both operations consume the image and return a new one; nothing is
//! modified in place.

use super::calculations::{calculate_bounded_dimensions, reduction_factor};
use super::params::SizeBound;
use crate::pipeline::PipelineEvent;
use image::DynamicImage;
use image::imageops::FilterType;
use std::sync::mpsc::Sender;

/// Convert to single-channel 8-bit luma.
///
/// Uses the `image` crate's standard luminance weighting. An image that is
/// already `Luma8` is returned as-is.
pub fn to_grayscale(img: DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageLuma8(_) => img,
        other => DynamicImage::ImageLuma8(other.to_luma8()),
    }
}

/// Shrink `img` so it fits inside `bound`, preserving aspect ratio.
///
/// Images that already fit, or that have a zero dimension, are returned
/// untouched. Otherwise the image is resampled with a bilinear filter to the
/// size from [`calculate_bounded_dimensions`].
///
/// The original size, reduction factor and new size are logged at `info` and,
/// when `events` is given, sent as a [`PipelineEvent::Resized`].
pub fn bound_size(
    img: DynamicImage,
    bound: SizeBound,
    events: Option<&Sender<PipelineEvent>>,
) -> DynamicImage {
    let original = (img.width(), img.height());
    let Some((width, height)) = calculate_bounded_dimensions(original, bound) else {
        return img;
    };

    let factor = reduction_factor(original, bound);
    log::info!("Image too big ({} x {})", original.0, original.1);
    log::info!("Reducing by factor of {factor:.2}");
    log::info!("New size: ({width} x {height})");

    let resized = img.resize_exact(width, height, FilterType::Triangle);

    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening
        let _ = tx.send(PipelineEvent::Resized {
            from: original,
            to: (width, height),
            factor,
        });
    }

    resized
}
