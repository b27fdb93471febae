//! # Image Intake
//!
//! Turns whatever a user pastes (a local path, a direct image URL, or an
//! image-host share page) into a decoded bitmap with predictable size and
//! color depth, ready for a downstream analyzer with fixed input
//! expectations.
//!
//! # Architecture: Three-Stage Pipeline
//!
//! ```text
//! 1. Resolve    share URL  →  direct image URL   (HTML <meta> lookup)
//! 2. Acquire    URL / path →  DynamicImage       (download or read, decode)
//! 3. Normalize  image      →  image              (bounded resize, grayscale)
//! ```
//!
//! Each stage is a plain function over owned values, so every stage can be
//! tested on its own. Network access goes through the [`http::Fetcher`]
//! trait; the production [`http::ReqwestFetcher`] uses a blocking `reqwest`
//! client, tests use an in-memory fake.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resolve`] | Stage 1: share-page detection and `twitter:image` lookup |
//! | [`metadata`] | Tolerant `<meta>` tag extraction from arbitrary HTML |
//! | [`acquire`] | Stage 2: remote fetch (absence on failure) and local read (error on failure) |
//! | [`imaging`] | Stage 3: bounded resize and grayscale conversion |
//! | [`pipeline`] | Runs the three stages for one [`types::ImageReference`] |
//! | [`link`] | Overlay visualization links for detected corners |
//! | [`http`] | The `Fetcher` seam and its `reqwest` implementation |
//! | [`config`] | TOML configuration layered over stock defaults |
//! | [`types`] | `ImageReference` |
//! | [`output`] | CLI output formatting |
//!
//! # Failure Model
//!
//! Remote input is untrusted: a URL that cannot be downloaded or decoded
//! yields an absent image rather than an error. Local paths are trusted: a
//! missing or corrupt file is an error. Share pages that cannot be fetched
//! follow the configured policy (`resolver.on_failure`).
//!
//! Nothing is shared between runs, so independent pipelines can run on
//! separate threads with the same fetcher.

pub mod acquire;
pub mod config;
pub mod http;
pub mod imaging;
pub mod link;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod resolve;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
