//! Intake configuration.
//!
//! Handles loading, validating, and merging a TOML config file on top of the
//! stock defaults. Every key is optional; a file only needs the values it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [http]
//! user_agent = "image-intake/0.1.0"  # Sent with every image download
//! # timeout_secs = 30                # Unset = block until the server answers
//! proxy_from_env = true              # Honor HTTP_PROXY / NO_PROXY
//!
//! [resolver]
//! host_marker = "imgur"              # Hosts containing this are share pages
//! meta_names = ["twitter:image"]     # <meta name=...> tags tried, in order
//! on_failure = "propagate"           # or "fall_back" to keep the original URL
//! send_user_agent = false            # Also send user_agent for the page fetch
//!
//! [normalize]
//! max_width = 2000
//! max_height = 2000
//! grayscale = false
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::SizeBound;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full configuration for one intake run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntakeConfig {
    /// HTTP client settings shared by page and image fetches.
    pub http: HttpConfig,
    /// Share-page resolution settings.
    pub resolver: ResolverConfig,
    /// Size bound and color normalization.
    pub normalize: NormalizeConfig,
}

impl IntakeConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.user_agent.trim().is_empty() {
            return Err(ConfigError::Validation(
                "http.user_agent must not be empty".into(),
            ));
        }
        if self.http.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "http.timeout_secs must be positive (omit it for no timeout)".into(),
            ));
        }
        if self.resolver.host_marker.is_empty() {
            return Err(ConfigError::Validation(
                "resolver.host_marker must not be empty".into(),
            ));
        }
        if self.resolver.meta_names.is_empty() {
            return Err(ConfigError::Validation(
                "resolver.meta_names must not be empty".into(),
            ));
        }
        if self.normalize.max_width == 0 || self.normalize.max_height == 0 {
            return Err(ConfigError::Validation(
                "normalize.max_width and normalize.max_height must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// `User-Agent` header value identifying this client.
    pub user_agent: String,
    /// Whole-request timeout. `None` blocks until the server answers or
    /// the connection fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Honor `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment.
    pub proxy_from_env: bool,
}

pub const DEFAULT_USER_AGENT: &str = concat!("image-intake/", env!("CARGO_PKG_VERSION"));

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: None,
            proxy_from_env: true,
        }
    }
}

/// What to do when the share page itself cannot be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataFailure {
    /// Surface the error to the caller.
    #[default]
    Propagate,
    /// Log it and carry on with the unresolved URL.
    FallBack,
}

/// Share-page resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Substring of the URL host that marks an image-hosting share page.
    pub host_marker: String,
    /// `<meta name=...>` values holding the direct image URL, in priority order.
    pub meta_names: Vec<String>,
    pub on_failure: MetadataFailure,
    /// Send `http.user_agent` with the share-page request too.
    pub send_user_agent: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            host_marker: "imgur".to_string(),
            meta_names: vec!["twitter:image".to_string()],
            on_failure: MetadataFailure::default(),
            send_user_agent: false,
        }
    }
}

/// Normalization applied after decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizeConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// Convert to single-channel luma after resizing.
    pub grayscale: bool,
}

impl NormalizeConfig {
    pub fn bound(&self) -> SizeBound {
        SizeBound::new(self.max_width, self.max_height)
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        let bound = SizeBound::default();
        Self {
            max_width: bound.max_width,
            max_height: bound.max_height,
            grayscale: false,
        }
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(IntakeConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Apply a user config file on top of the stock defaults, in place.
///
/// Sections (`[http]`, `[resolver]`, `[normalize]`) merge key by key, so a
/// file that only sets `normalize.grayscale` keeps the stock bound. Any
/// non-table value replaces the default outright; `resolver.meta_names` is
/// never appended to.
pub fn merge_overlay(defaults: &mut toml::Value, overlay: toml::Value) {
    match (defaults, overlay) {
        (toml::Value::Table(defaults_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match defaults_table.get_mut(&key) {
                    Some(existing) => merge_overlay(existing, value),
                    None => {
                        defaults_table.insert(key, value);
                    }
                }
            }
        }
        (defaults, overlay) => *defaults = overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<IntakeConfig, ConfigError> {
    let mut merged = stock_defaults_value()?;
    if let Some(overlay) = overlay {
        merge_overlay(&mut merged, overlay);
    }
    let config: IntakeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file, or stock defaults when `path` is `None`.
///
/// Unlike a missing optional directory config, an explicitly named file that
/// does not exist is an error.
pub fn load_config(path: Option<&Path>) -> Result<IntakeConfig, ConfigError> {
    let overlay = match path {
        Some(p) => {
            let content = fs::read_to_string(p)?;
            Some(toml::from_str::<toml::Value>(&content)?)
        }
        None => None,
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# image-intake configuration
# ==========================
# Every key is optional. Values shown are the defaults.

[http]
# User-Agent header sent when downloading the image itself.
user_agent = "image-intake/0.1.0"
# Whole-request timeout in seconds. Leave unset to wait indefinitely.
# timeout_secs = 30
# Route requests through the proxy named in HTTP_PROXY / HTTPS_PROXY.
proxy_from_env = true

[resolver]
# URLs whose host contains this marker are treated as share pages: the page
# is fetched and the direct image URL is read from its <meta> tags.
host_marker = "imgur"
# <meta name="..."> values to look for, in priority order.
meta_names = ["twitter:image"]
# What to do when the share page cannot be fetched:
#   "propagate" - fail the run
#   "fall_back" - log a warning and try the original URL as an image
on_failure = "propagate"
# Send the User-Agent header with the share-page request as well.
send_user_agent = false

[normalize]
# Images larger than this are scaled down, preserving aspect ratio.
max_width = 2000
max_height = 2000
# Convert to single-channel grayscale.
grayscale = false
"##
}
