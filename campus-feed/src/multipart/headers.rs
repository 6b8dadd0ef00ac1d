//! Part header parsing
//!
//! Each raw part is a header block, a blank line (`CRLF CRLF`), and the body.
//! Only `Content-Disposition` and `Content-Type` carry meaning for uploads;
//! other headers are kept in the map but otherwise ignored.

use super::splitter::find;
use std::collections::HashMap;

const HEADER_SEPARATOR: &[u8] = b"\r\n\r\n";

/// Part headers keyed by lower-cased name; a repeated header keeps its last value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartHeaders(HashMap<String, String>);

impl PartHeaders {
    fn parse(block: &str) -> Self {
        let mut headers = HashMap::new();
        for line in block.lines() {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            headers.insert(name.to_ascii_lowercase(), value.trim().to_string());
        }
        Self(headers)
    }

    /// Looks up a header value, ignoring case of `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Number of distinct headers
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the part had no parseable headers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Fields of a `Content-Disposition: form-data` header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentDisposition {
    /// Form field name
    pub name: Option<String>,
    /// Original filename, present only for file fields
    pub filename: Option<String>,
}

impl ContentDisposition {
    /// Parses a disposition value; returns `None` unless it is `form-data`
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let mut params = split_params(value).into_iter();
        let kind = params.next()?;
        if !kind.trim().eq_ignore_ascii_case("form-data") {
            return None;
        }

        let mut disposition = Self::default();
        for param in params {
            let Some((key, raw)) = param.split_once('=') else {
                continue;
            };
            let value = unquote(raw.trim());
            match key.trim().to_ascii_lowercase().as_str() {
                "name" => disposition.name = Some(value),
                "filename" => disposition.filename = Some(value),
                _ => {}
            }
        }
        Some(disposition)
    }
}

/// A part split into headers and body; the body borrows the request buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPart<'a> {
    /// Part headers
    pub headers: PartHeaders,
    /// Part body, exactly as it appeared after the header block
    pub body: &'a [u8],
}

impl ParsedPart<'_> {
    /// The `form-data` disposition of this part, if any
    #[must_use]
    pub fn disposition(&self) -> Option<ContentDisposition> {
        self.headers
            .get("content-disposition")
            .and_then(ContentDisposition::parse)
    }

    /// MIME token from `Content-Type`, without parameters
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get("content-type")
            .map(|value| value.split(';').next().unwrap_or_default().trim())
            .filter(|mime| !mime.is_empty())
    }
}

/// Splits a raw part at its first blank line
///
/// Returns `None` when the part has no `CRLF CRLF` separator, in which case it
/// cannot be interpreted and is dropped by the decoder.
#[must_use]
pub fn parse_part(raw: &[u8]) -> Option<ParsedPart<'_>> {
    let separator = find(raw, HEADER_SEPARATOR, 0)?;
    let block = String::from_utf8_lossy(&raw[..separator]);

    Some(ParsedPart {
        headers: PartHeaders::parse(&block),
        body: &raw[separator + HEADER_SEPARATOR.len()..],
    })
}

/// Splits on `;` outside of double quotes
fn split_params(value: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (idx, ch) in value.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                params.push(&value[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    params.push(&value[start..]);
    params
}

/// Removes surrounding double quotes; an unterminated opening quote is dropped too
fn unquote(value: &str) -> String {
    match value.strip_prefix('"') {
        Some(inner) => inner.strip_suffix('"').unwrap_or(inner).to_string(),
        None => value.to_string(),
    }
}
