//! Turning a URL or a path into a decoded image.
//!
//! The two entry points treat failure differently on purpose:
//!
//! - [`acquire_from_url`] is for untrusted remote input. Anything that goes
//!   wrong while downloading or decoding becomes an [`Acquired`] with no
//!   image, alongside the URL that was tried.
//! - [`acquire_from_path`] is for caller-validated local files. A missing or
//!   corrupt file is an [`AcquireError`].

use crate::config::IntakeConfig;
use crate::http::{Fetcher, Request};
use crate::resolve::{ResolveError, resolve};
use image::{DynamicImage, ImageReader};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Outcome of a remote acquisition.
#[derive(Debug, Clone)]
pub struct Acquired {
    /// The decoded image, or `None` if the download or decode failed.
    pub image: Option<DynamicImage>,
    /// The resolved URL the download was attempted from.
    pub url: String,
}

impl Acquired {
    pub fn is_absent(&self) -> bool {
        self.image.is_none()
    }
}

/// Resolve `url`, download it, and decode it in its native color mode.
///
/// The download sends `http.user_agent`. Transport errors, non-2xx responses,
/// and undecodable bodies all produce `Ok(Acquired { image: None, .. })`. The
/// only `Err` is a share-page failure under the `propagate` policy, which
/// happens before any image download is attempted.
pub fn acquire_from_url(
    fetcher: &impl Fetcher,
    config: &IntakeConfig,
    url: &str,
) -> Result<Acquired, ResolveError> {
    let url = resolve(fetcher, config, url)?;
    let request = Request::get(&url).with_user_agent(&config.http.user_agent);

    let image = match fetcher.fetch(request) {
        Ok(bytes) => match image::load_from_memory(&bytes) {
            Ok(img) => {
                log::info!("Loaded {} x {} image from {url}", img.width(), img.height());
                Some(img)
            }
            Err(e) => {
                log::warn!("Could not decode image from {url}: {e}");
                None
            }
        },
        Err(e) => {
            log::warn!("Could not download image: {e}");
            None
        }
    };

    Ok(Acquired { image, url })
}

/// Read and decode a local image file, keeping its color mode.
///
/// The format is sniffed from the file contents, not the extension.
pub fn acquire_from_path(path: &Path) -> Result<DynamicImage, AcquireError> {
    let display = path.display().to_string();
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| AcquireError::Io {
            path: display.clone(),
            source,
        })?;
    let img = reader.decode().map_err(|source| AcquireError::Decode {
        path: display.clone(),
        source,
    })?;
    log::info!("Loaded {} x {} image from {display}", img.width(), img.height());
    Ok(img)
}
