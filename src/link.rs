//! Visualization links for detected board corners.
//!
//! The overlay page takes the four corner coordinates and the image URL in its
//! query string:
//!
//! ```text
//! http://tetration.xyz/tensorflow_chessbot/overlay_chessboard.html?x0,y0,x1,y1,<url>
//! ```
//!
//! The URL is percent-encoded with no reserved characters left literal, so
//! `:` `/` `?` `&` `,` inside it cannot be confused with the outer query.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

const OVERLAY_PAGE: &str = "http://tetration.xyz/tensorflow_chessbot/overlay_chessboard.html";

/// Everything except ASCII alphanumerics and `-._~` is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Board corners as `(x0, y0, x1, y1)` pixel coordinates.
pub type Corners = (i64, i64, i64, i64);

/// Percent-encode `value` for use as a single query component.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Build the overlay link for `corners` found in the image at `url`.
///
/// ```
/// # use image_intake::link::format_visualize_link;
/// assert_eq!(
///     format_visualize_link((1, 2, 3, 4), "http://a.com/b c"),
///     "http://tetration.xyz/tensorflow_chessbot/overlay_chessboard.html\
///      ?1,2,3,4,http%3A%2F%2Fa.com%2Fb%20c"
/// );
/// ```
pub fn format_visualize_link(corners: Corners, url: &str) -> String {
    let (x0, y0, x1, y1) = corners;
    format!(
        "{OVERLAY_PAGE}?{x0},{y0},{x1},{y1},{}",
        encode_component(url)
    )
}
