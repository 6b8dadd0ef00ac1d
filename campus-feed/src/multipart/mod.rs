//! Hand-written `multipart/form-data` decoder
//!
//! Decoding operates on a fully buffered request body and never copies part
//! bodies: every [`ParsedPart`] borrows from the input slice.
//!
//! The decoder runs in three steps:
//!
//! 1. [`extract_boundary`] reads the boundary from the `Content-Type` header
//! 2. [`split_parts`] cuts the body into raw parts at each `--<boundary>`
//! 3. [`parse_part`] separates each raw part into headers and body
//!
//! A [`FileSelector`] then decides which part is the uploaded file.
//!
//! # Examples
//!
//! ```rust
//! use campus_feed::multipart::{decode, DecodeLimits, FileSelector, FirstFileSelector};
//!
//! let body = b"--X\r\n\
//! Content-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\
//! Content-Type: text/plain\r\n\
//! \r\n\
//! hello\r\n\
//! --X--\r\n";
//!
//! let parts = decode("multipart/form-data; boundary=X", body, &DecodeLimits::default()).unwrap();
//! let file = FirstFileSelector.select(&parts).unwrap();
//! assert_eq!(file.filename, "a.txt");
//! assert_eq!(file.body, b"hello");
//! ```

mod boundary;
mod headers;
mod selector;
mod splitter;

pub use boundary::{extract_boundary, Boundary};
pub use headers::{parse_part, ContentDisposition, ParsedPart, PartHeaders};
pub use selector::{FilePart, FileSelector, FirstFileSelector, DEFAULT_FILE_MIME};
pub use splitter::split_parts;

use thiserror::Error;

/// Default ceiling on the number of parts in one body
pub const DEFAULT_MAX_PARTS: usize = 16;

/// Errors produced while decoding a multipart body
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MultipartError {
    /// Not multipart/form-data, or no boundary parameter
    #[error("invalid content type: {0}")]
    InvalidContentType(String),

    /// Body contains more parts than allowed
    #[error("multipart body has more than {max} parts")]
    TooManyParts {
        /// Configured ceiling
        max: usize,
    },

    /// No part carries a filename
    #[error("no file found in upload")]
    NoFileFound,
}

/// Limits applied while decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum number of raw parts
    pub max_parts: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_parts: DEFAULT_MAX_PARTS,
        }
    }
}

/// Decodes a buffered body into its parts
///
/// Parts without a header/body separator are dropped. Decoding is pure:
/// the same input always yields the same parts.
///
/// # Errors
///
/// Returns [`MultipartError::InvalidContentType`] for a non-multipart or
/// boundary-less header and [`MultipartError::TooManyParts`] when the body
/// exceeds `limits.max_parts`.
pub fn decode<'a>(
    content_type: &str,
    body: &'a [u8],
    limits: &DecodeLimits,
) -> Result<Vec<ParsedPart<'a>>, MultipartError> {
    let boundary = extract_boundary(content_type)?;
    let raw_parts = split_parts(body, &boundary, limits.max_parts)?;

    Ok(raw_parts.into_iter().filter_map(parse_part).collect())
}

/// Decodes a body and selects its file part with `selector`
///
/// # Errors
///
/// Everything [`decode`] returns, plus [`MultipartError::NoFileFound`] when
/// the selector finds no file.
pub fn decode_file<'a>(
    content_type: &str,
    body: &'a [u8],
    limits: &DecodeLimits,
    selector: &dyn FileSelector,
) -> Result<FilePart<'a>, MultipartError> {
    let parts = decode(content_type, body, limits)?;
    tracing::debug!(parts = parts.len(), "decoded multipart body");
    selector.select(&parts).ok_or(MultipartError::NoFileFound)
}
