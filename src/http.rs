//! HTTP transport behind a trait.
//!
//! The [`Fetcher`] trait is the single seam between the resolver/acquirer and
//! the network. [`ReqwestFetcher`] is the production implementation on top of
//! the blocking `reqwest` client; tests swap in an in-memory fetcher so the
//! decision logic runs without sockets.

use crate::config::HttpConfig;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("could not build HTTP client: {0}")]
    Client(String),
}

/// One outgoing GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub url: &'a str,
    /// `User-Agent` header value, or `None` to send the client default.
    pub user_agent: Option<&'a str>,
}

impl<'a> Request<'a> {
    pub fn get(url: &'a str) -> Self {
        Self {
            url,
            user_agent: None,
        }
    }

    pub fn with_user_agent(self, user_agent: &'a str) -> Self {
        Self {
            user_agent: Some(user_agent),
            ..self
        }
    }
}

/// Blocking GET returning the full response body.
///
/// Non-2xx responses are errors. Implementations must be `Sync` so one
/// fetcher can serve pipelines on several threads.
pub trait Fetcher: Sync {
    fn fetch(&self, request: Request<'_>) -> Result<Vec<u8>, FetchError>;
}

/// [`Fetcher`] backed by `reqwest::blocking::Client`.
pub struct ReqwestFetcher {
    client: reqwest::blocking::Client,
}

impl ReqwestFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(config.timeout_secs.map(Duration::from_secs));
        if !config.proxy_from_env {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for ReqwestFetcher {
    fn fetch(&self, request: Request<'_>) -> Result<Vec<u8>, FetchError> {
        log::debug!("GET {}", request.url);

        let mut builder = self.client.get(request.url);
        if let Some(ua) = request.user_agent {
            builder = builder.header(reqwest::header::USER_AGENT, ua);
        }

        let response = builder
            .send()
            .map_err(|e| map_reqwest_error(e, request.url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: request.url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .map_err(|e| map_reqwest_error(e, request.url))?;
        log::debug!("{} bytes from {}", body.len(), request.url);
        Ok(body.to_vec())
    }
}

fn map_reqwest_error(e: reqwest::Error, url: &str) -> FetchError {
    let message = if e.is_timeout() {
        "timed out".to_string()
    } else if e.is_connect() {
        format!("could not connect: {e}")
    } else {
        e.to_string()
    };
    FetchError::Transport {
        url: url.to_string(),
        message,
    }
}
