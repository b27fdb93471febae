//! Share-page resolution.
//!
//! Image hosts hand out two kinds of links: direct image URLs
//! (`https://i.imgur.com/bStt0Fuh.jpg`) and share pages
//! (`https://imgur.com/bStt0Fu`) that wrap the image in HTML. The resolver
//! turns the second kind into the first by reading the page's social card
//! metadata.
//!
//! ```text
//! host lacks marker ──────────────────────────────▶ url unchanged
//! host has marker ─▶ GET page ─▶ <meta name=...> ─▶ content
//!                                 no match ───────▶ url unchanged
//!                    fetch fails ─▶ on_failure policy
//! ```

use crate::config::{IntakeConfig, MetadataFailure};
use crate::http::{FetchError, Fetcher, Request};
use crate::metadata::PageMetadata;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("could not fetch share page {url}: {source}")]
    Page {
        url: String,
        #[source]
        source: FetchError,
    },
}

/// Whether `url` points at an image host share page.
///
/// Only the host is inspected, so a marker appearing in the path or query
/// does not count. URLs that fail to parse are never share pages.
pub fn is_share_url(url: &str, host_marker: &str) -> bool {
    let Ok(parsed) = reqwest::Url::parse(url) else {
        return false;
    };
    parsed
        .host_str()
        .is_some_and(|host| host.contains(&host_marker.to_ascii_lowercase()))
}

/// Resolve `url` to a directly fetchable image URL.
///
/// Non-share URLs come back unchanged without touching the network. Share
/// pages are fetched once; the `content` of the first `<meta>` tag named in
/// `resolver.meta_names` is returned, or `url` itself when there is none.
///
/// A failed page fetch is an error under [`MetadataFailure::Propagate`] and
/// falls back to `url` under [`MetadataFailure::FallBack`].
pub fn resolve(
    fetcher: &impl Fetcher,
    config: &IntakeConfig,
    url: &str,
) -> Result<String, ResolveError> {
    let resolver = &config.resolver;
    if !is_share_url(url, &resolver.host_marker) {
        return Ok(url.to_string());
    }

    let mut request = Request::get(url);
    if resolver.send_user_agent {
        request = request.with_user_agent(&config.http.user_agent);
    }

    let body = match fetcher.fetch(request) {
        Ok(body) => body,
        Err(source) => {
            return match resolver.on_failure {
                MetadataFailure::Propagate => Err(ResolveError::Page {
                    url: url.to_string(),
                    source,
                }),
                MetadataFailure::FallBack => {
                    log::warn!("Share page unavailable, using URL as-is: {source}");
                    Ok(url.to_string())
                }
            };
        }
    };

    let html = String::from_utf8_lossy(&body);
    let metadata = PageMetadata::parse(&html);
    match metadata.first_content(resolver.meta_names.as_slice()) {
        Some(direct) => {
            log::info!("Resolved {url} → {direct}");
            Ok(direct.to_string())
        }
        None => {
            log::debug!("No image metadata on {url}; keeping it");
            Ok(url.to_string())
        }
    }
}
