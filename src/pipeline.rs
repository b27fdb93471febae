//! End-to-end intake of one [`ImageReference`].
//!
//! ```text
//! RemoteUrl ─▶ resolve ─▶ download + decode ─┐
//!                                            ├─▶ bound_size ─▶ grayscale? ─▶ Intake
//! LocalPath ─▶ read + decode ────────────────┘
//! ```
//!
//! Progress is reported through an optional [`Sender<PipelineEvent>`]; the
//! CLI drains it on a printer thread, library callers can ignore it.

use crate::acquire::{AcquireError, acquire_from_path, acquire_from_url};
use crate::config::IntakeConfig;
use crate::http::Fetcher;
use crate::imaging::{bound_size, to_grayscale};
use crate::resolve::ResolveError;
use crate::types::ImageReference;
use image::DynamicImage;
use serde::Serialize;
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Acquire(#[from] AcquireError),
}

/// Progress notices emitted while an image moves through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A share URL was swapped for the direct image URL.
    Resolved { from: String, to: String },
    /// An image was decoded from `source` (URL or path).
    Decoded {
        source: String,
        width: u32,
        height: u32,
    },
    /// A remote image could not be downloaded or decoded.
    Absent { url: String },
    /// The image was shrunk to fit the size bound.
    Resized {
        from: (u32, u32),
        to: (u32, u32),
        factor: f64,
    },
    Grayscaled,
}

/// Result of running the pipeline.
#[derive(Debug, Clone)]
pub struct Intake {
    /// Normalized image, or `None` when a remote fetch failed.
    pub image: Option<DynamicImage>,
    /// The path read, or the resolved URL downloaded.
    pub source: String,
}

fn emit(events: Option<&Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events {
        let _ = tx.send(event);
    }
}

/// Acquire and normalize the image behind `reference`.
///
/// Normalization follows `config.normalize`: the image is bounded first and
/// converted to grayscale afterwards when requested.
pub fn load(
    fetcher: &impl Fetcher,
    config: &IntakeConfig,
    reference: &ImageReference,
    events: Option<&Sender<PipelineEvent>>,
) -> Result<Intake, PipelineError> {
    let (image, source) = match reference {
        ImageReference::LocalPath(path) => {
            let img = acquire_from_path(path)?;
            (Some(img), path.display().to_string())
        }
        ImageReference::RemoteUrl(url) => {
            let acquired = acquire_from_url(fetcher, config, url)?;
            if acquired.url != *url {
                emit(
                    events,
                    PipelineEvent::Resolved {
                        from: url.clone(),
                        to: acquired.url.clone(),
                    },
                );
            }
            (acquired.image, acquired.url)
        }
    };

    let Some(img) = image else {
        emit(events, PipelineEvent::Absent { url: source.clone() });
        return Ok(Intake {
            image: None,
            source,
        });
    };

    emit(
        events,
        PipelineEvent::Decoded {
            source: source.clone(),
            width: img.width(),
            height: img.height(),
        },
    );

    let mut img = bound_size(img, config.normalize.bound(), events);
    if config.normalize.grayscale {
        img = to_grayscale(img);
        emit(events, PipelineEvent::Grayscaled);
    }

    Ok(Intake {
        image: Some(img),
        source,
    })
}
