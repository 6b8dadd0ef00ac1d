//! Splitting a buffered multipart body into raw parts
//!
//! The splitter makes one linear pass over the body looking for
//! `--<boundary>`. It never backtracks and does not inspect part contents, so a
//! part whose bytes happen to contain `--<boundary>` is cut at that point.
//! Clients are expected to pick long random boundaries (browsers do), which
//! makes such a collision practically impossible.

use super::{Boundary, MultipartError};

const CRLF: &[u8] = b"\r\n";
const CLOSE_MARKER: &[u8] = b"--";

/// Cuts `body` into the raw byte ranges found between delimiters
///
/// Each returned slice has the CRLF framing of its delimiter lines removed
/// (one leading and one trailing CRLF). Empty ranges are skipped. A delimiter
/// immediately followed by `--` is the close delimiter and ends the scan; the
/// epilogue after it is ignored.
///
/// # Errors
///
/// Returns [`MultipartError::TooManyParts`] once more than `max_parts`
/// non-empty ranges are found.
pub fn split_parts<'a>(
    body: &'a [u8],
    boundary: &Boundary,
    max_parts: usize,
) -> Result<Vec<&'a [u8]>, MultipartError> {
    let delimiter = boundary.delimiter();
    let mut parts = Vec::new();
    let mut cursor = 0;

    while let Some(start) = find(body, &delimiter, cursor) {
        push_part(&mut parts, &body[cursor..start], max_parts)?;
        cursor = start + delimiter.len();

        if body[cursor..].starts_with(CLOSE_MARKER) {
            return Ok(parts);
        }
    }

    push_part(&mut parts, &body[cursor..], max_parts)?;
    Ok(parts)
}

fn push_part<'a>(
    parts: &mut Vec<&'a [u8]>,
    raw: &'a [u8],
    max_parts: usize,
) -> Result<(), MultipartError> {
    let raw = strip_framing(raw);
    if raw.is_empty() {
        return Ok(());
    }
    if parts.len() >= max_parts {
        return Err(MultipartError::TooManyParts { max: max_parts });
    }
    parts.push(raw);
    Ok(())
}

fn strip_framing(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_prefix(CRLF).unwrap_or(raw);
    raw.strip_suffix(CRLF).unwrap_or(raw)
}

/// Position of the first `needle` in `haystack` at or after `from`
pub(crate) fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}
