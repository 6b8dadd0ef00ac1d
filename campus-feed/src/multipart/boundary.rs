//! Boundary extraction from the request `Content-Type` header

use super::MultipartError;

const MULTIPART_FORM_DATA: &str = "multipart/form-data";
const BOUNDARY_PARAM: &str = "boundary=";

/// Delimiter token of a multipart body, taken verbatim from the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary(Vec<u8>);

impl Boundary {
    /// Raw boundary bytes, without the leading `--`
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The delimiter that actually appears in the body: `--` + boundary
    #[must_use]
    pub fn delimiter(&self) -> Vec<u8> {
        let mut delimiter = Vec::with_capacity(self.0.len() + 2);
        delimiter.extend_from_slice(b"--");
        delimiter.extend_from_slice(&self.0);
        delimiter
    }
}

/// Derives the boundary from a `Content-Type` header value
///
/// The media type must be `multipart/form-data` and a `boundary=` parameter
/// must be present. Everything after `boundary=` is the boundary; no
/// unquoting or other decoding is applied.
///
/// # Errors
///
/// Returns [`MultipartError::InvalidContentType`] when the header is not
/// multipart/form-data or carries no boundary.
///
/// # Examples
///
/// ```rust
/// use campus_feed::multipart::extract_boundary;
///
/// let boundary = extract_boundary("multipart/form-data; boundary=X").unwrap();
/// assert_eq!(boundary.as_bytes(), b"X");
/// assert!(extract_boundary("application/json").is_err());
/// ```
pub fn extract_boundary(content_type: &str) -> Result<Boundary, MultipartError> {
    // ASCII lowercasing keeps byte offsets identical to the original header
    let lowered = content_type.to_ascii_lowercase();

    if !lowered.contains(MULTIPART_FORM_DATA) {
        return Err(MultipartError::InvalidContentType(format!(
            "expected {MULTIPART_FORM_DATA}, got {content_type:?}"
        )));
    }

    let start = lowered
        .find(BOUNDARY_PARAM)
        .map(|idx| idx + BOUNDARY_PARAM.len())
        .ok_or_else(|| MultipartError::InvalidContentType("missing boundary parameter".to_string()))?;

    let boundary = &content_type[start..];
    if boundary.is_empty() {
        return Err(MultipartError::InvalidContentType("empty boundary parameter".to_string()));
    }

    Ok(Boundary(boundary.as_bytes().to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_suffix_verbatim() {
        let boundary =
            extract_boundary("multipart/form-data; boundary=----WebKitFormBoundary7MA4YWxkTrZu0gW")
                .unwrap();
        assert_eq!(boundary.as_bytes(), b"----WebKitFormBoundary7MA4YWxkTrZu0gW");
        assert_eq!(boundary.delimiter(), b"------WebKitFormBoundary7MA4YWxkTrZu0gW");
    }

    #[test]
    fn test_media_type_is_case_insensitive() {
        let boundary = extract_boundary("Multipart/Form-Data; Boundary=AbC").unwrap();
        assert_eq!(boundary.as_bytes(), b"AbC");
    }

    #[test]
    fn test_quoted_boundary_is_not_unquoted() {
        let boundary = extract_boundary("multipart/form-data; boundary=\"abc\"").unwrap();
        assert_eq!(boundary.as_bytes(), b"\"abc\"");
    }

    #[test]
    fn test_rejects_other_media_types() {
        let err = extract_boundary("application/x-www-form-urlencoded").unwrap_err();
        assert!(matches!(err, MultipartError::InvalidContentType(_)));
    }

    #[test]
    fn test_rejects_missing_or_empty_boundary() {
        assert!(matches!(
            extract_boundary("multipart/form-data").unwrap_err(),
            MultipartError::InvalidContentType(_)
        ));
        assert!(matches!(
            extract_boundary("multipart/form-data; boundary=").unwrap_err(),
            MultipartError::InvalidContentType(_)
        ));
    }
}
