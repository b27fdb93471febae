//! `<meta>` tag extraction from third-party HTML.
//!
//! Share pages on image hosts advertise the direct image URL through social
//! card metadata:
//!
//! ```html
//! <meta name="twitter:image" content="https://i.imgur.com/bStt0Fuh.jpg"/>
//! ```
//!
//! The scanner is tolerant: it finds every `<meta ...>` tag, reads its
//! attributes in any order with double, single, or no quotes, and skips
//! anything it cannot make sense of. It never fails.
//!
//! It walks the document left to right and consumes comments and raw-text
//! elements (`script`, `style`, `textarea`, `title`) whole, so markup quoted
//! inside them never surfaces as a tag. A `>` inside a quoted attribute value
//! does not end the tag. Unterminated comments and raw-text elements run to
//! the end of the document, as they do in a browser.
//!
//! Attribute names are case-insensitive; values have HTML character
//! references decoded (`&amp;` is common inside image URLs).

use regex::Regex;
use std::sync::LazyLock;

/// Body of a start tag up to its closing `>`, honoring quoted values.
const TAG_BODY: &str = r#"(?:[^>"']|"[^"]*"|'[^']*')*"#;

/// Leftmost-first scan: skipped regions come before `<meta` in the
/// alternation, so a tag inside one of them is consumed with it.
static DOCUMENT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    let raw_text = ["script", "style", "textarea", "title"]
        .map(|name| format!(r"<{name}\b{TAG_BODY}>.*?(?:</{name}\s*>|\z)"))
        .join("|");
    let pattern = format!(r"(?is)<!--.*?(?:-->|\z)|{raw_text}|<meta\b(?P<attrs>{TAG_BODY})>");
    Regex::new(&pattern).expect("document token regex must compile")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("attribute regex must compile")
});

static CHAR_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9A-Fa-f]+|amp|lt|gt|quot|apos);")
        .expect("character reference regex must compile")
});

/// One `<meta>` tag with its attributes in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaTag {
    attributes: Vec<(String, String)>,
}

impl MetaTag {
    /// Value of attribute `key`, if present. Keys compare case-insensitively.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn name(&self) -> Option<&str> {
        self.attr("name")
    }

    pub fn content(&self) -> Option<&str> {
        self.attr("content")
    }
}

/// All `<meta>` tags of one HTML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    tags: Vec<MetaTag>,
}

impl PageMetadata {
    /// Scan `html` for `<meta>` tags.
    pub fn parse(html: &str) -> Self {
        let tags = DOCUMENT_TOKEN
            .captures_iter(html)
            .filter_map(|cap| cap.name("attrs"))
            .map(|body| parse_attributes(body.as_str()))
            .collect();
        Self { tags }
    }

    pub fn tags(&self) -> &[MetaTag] {
        &self.tags
    }

    /// `content` of the first tag whose `name` equals `name` exactly.
    ///
    /// Only the first tag with that name is considered: if it has no
    /// `content`, the result is `None` even when a later tag has one.
    pub fn content_for(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.name() == Some(name))
            .and_then(MetaTag::content)
    }

    /// First hit of [`content_for`](Self::content_for) over `names`, in order.
    pub fn first_content<S: AsRef<str>>(&self, names: &[S]) -> Option<&str> {
        names
            .iter()
            .find_map(|name| self.content_for(name.as_ref()))
    }
}

fn parse_attributes(body: &str) -> MetaTag {
    let attributes = ATTRIBUTE
        .captures_iter(body)
        .filter_map(|cap| {
            let key = cap.get(1)?.as_str().to_ascii_lowercase();
            let raw = cap.get(2).or_else(|| cap.get(3)).or_else(|| cap.get(4))?;
            Some((key, decode_char_refs(raw.as_str())))
        })
        .collect();
    MetaTag { attributes }
}

/// Decode the HTML character references that show up in attribute values.
///
/// Unknown or invalid references are left as written.
pub fn decode_char_refs(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    CHAR_REF
        .replace_all(value, |cap: &regex::Captures<'_>| {
            let entity = &cap[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => numeric_char_ref(entity),
            };
            decoded.map_or_else(|| cap[0].to_string(), String::from)
        })
        .into_owned()
}

fn numeric_char_ref(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}
