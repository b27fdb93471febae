//! Input types shared by the pipeline stages.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Where an image comes from.
///
/// Built once by the caller and consumed by [`crate::pipeline::load`]. Local
/// paths are trusted (a failure to read them is an error); remote URLs are not
/// (a failure to fetch them is an absence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ImageReference {
    LocalPath(PathBuf),
    RemoteUrl(String),
}

impl ImageReference {
    /// Classify a user-supplied string.
    ///
    /// Anything with an `http://` or `https://` scheme is remote; everything
    /// else, including `file://`-less relative paths, is treated as a path.
    ///
    /// ```
    /// # use image_intake::types::ImageReference;
    /// assert!(matches!(
    ///     ImageReference::parse("https://i.imgur.com/a.png"),
    ///     ImageReference::RemoteUrl(_)
    /// ));
    /// assert!(matches!(
    ///     ImageReference::parse("boards/a.png"),
    ///     ImageReference::LocalPath(_)
    /// ));
    /// ```
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if has_http_scheme(trimmed) {
            Self::RemoteUrl(trimmed.to_string())
        } else {
            Self::LocalPath(PathBuf::from(input))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::RemoteUrl(_))
    }
}

fn has_http_scheme(s: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        s.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalPath(path) => write!(f, "{}", path.display()),
            Self::RemoteUrl(url) => f.write_str(url),
        }
    }
}
