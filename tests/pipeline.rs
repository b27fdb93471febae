//! End-to-end tests over real HTTP.
//!
//! A `tiny_http` server on loopback plays the image host:
//!
//! - `http://localhost:PORT/share/<id>`: share page with `twitter:image`
//! - `http://127.0.0.1:PORT/i/<id>.png`: the image itself
//!
//! Share pages are addressed through `localhost` and images through
//! `127.0.0.1`, so a `localhost` host marker separates the two.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use image_intake::acquire::acquire_from_url;
use image_intake::config::{IntakeConfig, MetadataFailure};
use image_intake::http::ReqwestFetcher;
use image_intake::pipeline::{self, PipelineError};
use image_intake::resolve::resolve;
use image_intake::types::ImageReference;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use tiny_http::{Header, Response, Server, StatusCode};

type Seen = Arc<Mutex<Vec<(String, Option<String>)>>>;

struct ImageHost {
    port: u16,
    seen: Seen,
}

impl ImageHost {
    fn start() -> Self {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let seen: Seen = Arc::default();

        let log = Arc::clone(&seen);
        std::thread::spawn(move || {
            for request in server.incoming_requests() {
                let path = request.url().to_owned();
                let user_agent = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("User-Agent"))
                    .map(|h| h.value.as_str().to_owned());
                log.lock().unwrap().push((path.clone(), user_agent));

                let response = route(&path, port);
                let _ = request.respond(response);
            }
        });

        Self { port, seen }
    }

    fn share_url(&self, id: &str) -> String {
        format!("http://localhost:{}/share/{id}", self.port)
    }

    fn image_url(&self, name: &str) -> String {
        format!("http://127.0.0.1:{}/i/{name}", self.port)
    }

    fn requests(&self) -> Vec<(String, Option<String>)> {
        self.seen.lock().unwrap().clone()
    }
}

fn route(path: &str, port: u16) -> Response<Cursor<Vec<u8>>> {
    match path {
        "/share/board" => html(format!(
            r#"<!doctype html><html><head>
<meta property="og:title" content="board">
<meta name="twitter:image" content="http://127.0.0.1:{port}/i/board.png"/>
</head><body>share page</body></html>"#
        )),
        "/share/plain" => html("<html><head><title>nothing</title></head></html>".into()),
        "/i/board.png" => png(board_png(3000, 1500)),
        "/i/small.png" => png(board_png(64, 32)),
        "/i/broken.png" => png(b"\x89PNG\r\n\x1a\nnot really".to_vec()),
        _ => Response::new(
            StatusCode(404),
            vec![Header::from_bytes(b"Content-Type", b"text/plain").unwrap()],
            Cursor::new(b"404 Not Found".to_vec()),
            None,
            None,
        ),
    }
}

fn html(body: String) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.into_bytes();
    let len = bytes.len();
    Response::new(
        StatusCode(200),
        vec![Header::from_bytes(b"Content-Type", b"text/html; charset=utf-8").unwrap()],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

fn png(bytes: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    let len = bytes.len();
    Response::new(
        StatusCode(200),
        vec![Header::from_bytes(b"Content-Type", b"image/png").unwrap()],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

fn board_png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        if (x / 100 + y / 100) % 2 == 0 {
            Rgb([240, 217, 181])
        } else {
            Rgb([181, 136, 99])
        }
    }));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn local_config() -> IntakeConfig {
    let mut config = IntakeConfig::default();
    config.resolver.host_marker = "localhost".into();
    config.http.timeout_secs = Some(10);
    config.http.proxy_from_env = false;
    config
}

fn fetcher(config: &IntakeConfig) -> ReqwestFetcher {
    ReqwestFetcher::new(&config.http).unwrap()
}

// =========================================================================
// Resolve
// =========================================================================

#[test]
fn share_page_resolves_to_twitter_image() {
    let host = ImageHost::start();
    let config = local_config();

    let resolved = resolve(&fetcher(&config), &config, &host.share_url("board")).unwrap();
    assert_eq!(resolved, host.image_url("board.png"));
}

#[test]
fn share_page_without_metadata_keeps_url() {
    let host = ImageHost::start();
    let config = local_config();
    let url = host.share_url("plain");

    assert_eq!(resolve(&fetcher(&config), &config, &url).unwrap(), url);
}

#[test]
fn share_page_404_propagates_or_falls_back() {
    let host = ImageHost::start();
    let url = host.share_url("gone");

    let config = local_config();
    assert!(resolve(&fetcher(&config), &config, &url).is_err());

    let mut config = local_config();
    config.resolver.on_failure = MetadataFailure::FallBack;
    assert_eq!(resolve(&fetcher(&config), &config, &url).unwrap(), url);
}

#[test]
fn direct_url_is_not_fetched_by_resolver() {
    let host = ImageHost::start();
    let config = local_config();
    let url = host.image_url("board.png");

    assert_eq!(resolve(&fetcher(&config), &config, &url).unwrap(), url);
    assert!(host.requests().is_empty());
}

// =========================================================================
// Acquire
// =========================================================================

#[test]
fn acquire_sends_user_agent_only_for_image() {
    let host = ImageHost::start();
    let config = local_config();

    let acquired = acquire_from_url(&fetcher(&config), &config, &host.share_url("board")).unwrap();
    assert!(!acquired.is_absent());
    assert_eq!(acquired.url, host.image_url("board.png"));

    let requests = host.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].0, "/share/board");
    assert_ne!(requests[0].1.as_deref(), Some(config.http.user_agent.as_str()));
    assert_eq!(requests[1].0, "/i/board.png");
    assert_eq!(requests[1].1.as_deref(), Some(config.http.user_agent.as_str()));
}

#[test]
fn http_errors_and_garbage_are_absent() {
    let host = ImageHost::start();
    let config = local_config();
    let fetcher = fetcher(&config);

    for name in ["missing.png", "broken.png"] {
        let url = host.image_url(name);
        let acquired = acquire_from_url(&fetcher, &config, &url).unwrap();
        assert!(acquired.is_absent(), "{name} should be absent");
        assert_eq!(acquired.url, url);
    }
}

#[test]
fn unreachable_host_is_absent() {
    let config = local_config();
    let url = "http://127.0.0.1:1/board.png";
    let acquired = acquire_from_url(&fetcher(&config), &config, url).unwrap();
    assert!(acquired.is_absent());
    assert_eq!(acquired.url, url);
}

// =========================================================================
// Full pipeline
// =========================================================================

#[test]
fn share_url_to_bounded_grayscale_image() {
    let host = ImageHost::start();
    let mut config = local_config();
    config.normalize.grayscale = true;

    let reference = ImageReference::parse(&host.share_url("board"));
    let intake = pipeline::load(&fetcher(&config), &config, &reference, None).unwrap();

    let img = intake.image.unwrap();
    // 3000x1500 bounded to 2000x2000
    assert_eq!((img.width(), img.height()), (2000, 1000));
    assert!(matches!(img, DynamicImage::ImageLuma8(_)));
    assert_eq!(intake.source, host.image_url("board.png"));
}

#[test]
fn small_image_passes_through_unchanged() {
    let host = ImageHost::start();
    let config = local_config();

    let reference = ImageReference::parse(&host.image_url("small.png"));
    let intake = pipeline::load(&fetcher(&config), &config, &reference, None).unwrap();

    let img = intake.image.unwrap();
    assert_eq!((img.width(), img.height()), (64, 32));
    assert!(matches!(img, DynamicImage::ImageRgb8(_)));
}

#[test]
fn corrupt_local_file_is_fatal() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("board.png");
    std::fs::write(&path, b"\x89PNG\r\n\x1a\ntruncated").unwrap();

    let config = local_config();
    let reference = ImageReference::parse(path.to_str().unwrap());
    let result = pipeline::load(&fetcher(&config), &config, &reference, None);
    assert!(matches!(result, Err(PipelineError::Acquire(_))));
}

#[test]
fn pipelines_run_concurrently_on_one_fetcher() {
    let host = ImageHost::start();
    let config = local_config();
    let fetcher = fetcher(&config);
    let reference = ImageReference::parse(&host.share_url("board"));

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| pipeline::load(&fetcher, &config, &reference, None)))
            .collect();
        for handle in handles {
            let intake = handle.join().unwrap().unwrap();
            assert!(intake.image.is_some());
        }
    });
}
