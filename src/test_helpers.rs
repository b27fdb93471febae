//! Shared test utilities.
//!
//! Synthetic images so tests never depend on fixture files, and a
//! [`MockFetcher`] that serves canned responses and records every request.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let fetcher = MockFetcher::new()
//!     .with_body("https://example.com/a.png", encode_png(&gradient_rgb(8, 8)))
//!     .with_status("https://example.com/gone.png", 404);
//!
//! // ... run code under test ...
//!
//! assert_eq!(fetcher.requests()[0].url, "https://example.com/a.png");
//! ```

use crate::http::{FetchError, Fetcher, Request};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;

// =========================================================================
// Synthetic images
// =========================================================================

/// RGB image with a horizontal red and vertical green gradient.
pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

/// Single-channel 8x8-square checkerboard, like an empty chessboard.
pub fn checkerboard_luma(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            Luma([230])
        } else {
            Luma([40])
        }
    }))
}

/// Encode `img` as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

/// Write `img` to `path` as PNG regardless of the extension.
pub fn write_png(path: &Path, img: &DynamicImage) {
    std::fs::write(path, encode_png(img)).unwrap();
}

// =========================================================================
// MockFetcher
// =========================================================================

/// A request as the mock saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
enum Canned {
    Body(Vec<u8>),
    Status(u16),
}

/// In-memory [`Fetcher`].
///
/// URLs without a canned response fail like an unreachable host.
/// Uses `Mutex` (not `RefCell`) so it stays `Sync`.
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, Canned>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: &str, body: Vec<u8>) -> Self {
        self.responses.insert(url.to_string(), Canned::Body(body));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Canned::Status(status));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, request: Request<'_>) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: request.url.to_string(),
            user_agent: request.user_agent.map(str::to_string),
        });

        match self.responses.get(request.url) {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(FetchError::Status {
                url: request.url.to_string(),
                status: *status,
            }),
            None => Err(FetchError::Transport {
                url: request.url.to_string(),
                message: "could not connect: connection refused".to_string(),
            }),
        }
    }
}

#[test]
fn mock_fetcher_records_requests() {
    let fetcher = MockFetcher::new().with_body("http://a.com/x", b"x".to_vec());
    assert!(fetcher.fetch(Request::get("http://a.com/x")).is_ok());
    assert!(
        fetcher
            .fetch(Request::get("http://a.com/y").with_user_agent("ua"))
            .is_err()
    );
    assert_eq!(
        fetcher.requests(),
        vec![
            RecordedRequest {
                url: "http://a.com/x".into(),
                user_agent: None
            },
            RecordedRequest {
                url: "http://a.com/y".into(),
                user_agent: Some("ua".into())
            },
        ]
    );
}
