//! CLI output formatting.
//!
//! Each kind of output has a `format_*` function returning lines (pure, no
//! I/O, unit tested) and a `print_*` wrapper that writes them to stdout.
//!
//! # Output Format
//!
//! ## Events
//!
//! ```text
//! Resolved https://imgur.com/bStt0Fu
//!     → https://i.imgur.com/bStt0Fuh.jpg
//! Decoded 4032 x 3024
//!     Source: https://i.imgur.com/bStt0Fuh.jpg
//! Resized 4032 x 3024 → 2000 x 1500 (÷2.02)
//! Converted to grayscale
//! ```
//!
//! ## Summary
//!
//! ```text
//! Image
//!     Source: https://i.imgur.com/bStt0Fuh.jpg
//!     Size: 2000 x 1500
//!     Color: luma8
//! ```

use crate::pipeline::{Intake, PipelineEvent};
use image::DynamicImage;
use serde::Serialize;

/// Machine-readable summary of an [`Intake`], for `load --json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntakeSummary {
    pub source: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

impl IntakeSummary {
    pub fn from_intake(intake: &Intake) -> Self {
        let image = intake.image.as_ref();
        Self {
            source: intake.source.clone(),
            found: image.is_some(),
            width: image.map(DynamicImage::width),
            height: image.map(DynamicImage::height),
            color: image.map(color_name),
        }
    }
}

/// Short lowercase name of the pixel layout.
pub fn color_name(img: &DynamicImage) -> &'static str {
    match img {
        DynamicImage::ImageLuma8(_) => "luma8",
        DynamicImage::ImageLumaA8(_) => "luma_a8",
        DynamicImage::ImageRgb8(_) => "rgb8",
        DynamicImage::ImageRgba8(_) => "rgba8",
        DynamicImage::ImageLuma16(_) => "luma16",
        DynamicImage::ImageLumaA16(_) => "luma_a16",
        DynamicImage::ImageRgb16(_) => "rgb16",
        DynamicImage::ImageRgba16(_) => "rgba16",
        DynamicImage::ImageRgb32F(_) => "rgb32f",
        DynamicImage::ImageRgba32F(_) => "rgba32f",
        _ => "other",
    }
}

pub fn format_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::Resolved { from, to } => {
            vec![format!("Resolved {from}"), format!("    → {to}")]
        }
        PipelineEvent::Decoded {
            source,
            width,
            height,
        } => vec![
            format!("Decoded {width} x {height}"),
            format!("    Source: {source}"),
        ],
        PipelineEvent::Absent { url } => vec![format!("Could not load image from {url}")],
        PipelineEvent::Resized { from, to, factor } => vec![format!(
            "Resized {} x {} → {} x {} (÷{factor:.2})",
            from.0, from.1, to.0, to.1
        )],
        PipelineEvent::Grayscaled => vec!["Converted to grayscale".to_string()],
    }
}

pub fn format_summary(summary: &IntakeSummary) -> Vec<String> {
    let mut lines = vec!["Image".to_string(), format!("    Source: {}", summary.source)];
    match (summary.width, summary.height, summary.color) {
        (Some(w), Some(h), Some(color)) => {
            lines.push(format!("    Size: {w} x {h}"));
            lines.push(format!("    Color: {color}"));
        }
        _ => lines.push("    No image (download or decode failed)".to_string()),
    }
    lines
}

pub fn print_summary(summary: &IntakeSummary) {
    for line in format_summary(summary) {
        println!("{line}");
    }
}
