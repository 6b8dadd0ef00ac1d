//! Choosing the uploaded file among decoded parts

use super::ParsedPart;

/// MIME type assumed for file parts that omit `Content-Type`
pub const DEFAULT_FILE_MIME: &str = "application/octet-stream";

/// A part that carries a file, with its MIME type resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart<'a> {
    /// Form field name, if the part had one
    pub field_name: Option<String>,
    /// Client-supplied filename (never empty)
    pub filename: String,
    /// Declared MIME type, or [`DEFAULT_FILE_MIME`]
    pub content_type: String,
    /// File bytes, borrowed from the request body
    pub body: &'a [u8],
}

impl<'a> FilePart<'a> {
    /// Builds a file part from a parsed part that has a non-empty `filename`
    #[must_use]
    pub fn from_part(part: &ParsedPart<'a>) -> Option<Self> {
        let disposition = part.disposition()?;
        let filename = disposition.filename.filter(|name| !name.is_empty())?;

        Some(Self {
            field_name: disposition.name,
            filename,
            content_type: part.content_type().unwrap_or(DEFAULT_FILE_MIME).to_string(),
            body: part.body,
        })
    }

    /// Size of the file in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.body.len() as u64
    }
}

/// Policy deciding which part of an upload is the file to ingest
///
/// Uploads accept one file per request. Supporting several files means
/// supplying a different selector, not changing the decoder.
pub trait FileSelector: Send + Sync {
    /// Picks the file part, or `None` when the upload carries no file
    fn select<'a>(&self, parts: &[ParsedPart<'a>]) -> Option<FilePart<'a>>;
}

/// Selects the first part that has a non-empty `filename`; later files and
/// plain fields are ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFileSelector;

impl FileSelector for FirstFileSelector {
    fn select<'a>(&self, parts: &[ParsedPart<'a>]) -> Option<FilePart<'a>> {
        parts.iter().find_map(FilePart::from_part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multipart::parse_part;

    fn part(raw: &'static [u8]) -> ParsedPart<'static> {
        parse_part(raw).unwrap()
    }

    #[test]
    fn test_selects_first_file() {
        let parts = vec![
            part(b"Content-Disposition: form-data; name=\"caption\"\r\n\r\nhello"),
            part(b"Content-Disposition: form-data; name=\"a\"; filename=\"one.txt\"\r\nContent-Type: text/plain\r\n\r\n1"),
            part(b"Content-Disposition: form-data; name=\"b\"; filename=\"two.txt\"\r\n\r\n2"),
        ];

        let file = FirstFileSelector.select(&parts).unwrap();
        assert_eq!(file.filename, "one.txt");
        assert_eq!(file.field_name.as_deref(), Some("a"));
        assert_eq!(file.content_type, "text/plain");
        assert_eq!(file.body, b"1");
    }

    #[test]
    fn test_missing_content_type_defaults_to_octet_stream() {
        let parts = vec![part(
            b"Content-Disposition: form-data; name=\"f\"; filename=\"blob\"\r\n\r\n\x00\x01",
        )];
        let file = FirstFileSelector.select(&parts).unwrap();
        assert_eq!(file.content_type, DEFAULT_FILE_MIME);
        assert_eq!(file.size(), 2);
    }

    #[test]
    fn test_empty_filename_is_not_a_file() {
        let parts = vec![part(
            b"Content-Disposition: form-data; name=\"f\"; filename=\"\"\r\n\r\n",
        )];
        assert!(FirstFileSelector.select(&parts).is_none());
    }

    #[test]
    fn test_no_file_parts() {
        let parts = vec![part(b"Content-Disposition: form-data; name=\"caption\"\r\n\r\nhi")];
        assert!(FirstFileSelector.select(&parts).is_none());
        assert!(FirstFileSelector.select(&[]).is_none());
    }
}
