use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode, header};

/// A fully materialized response.
///
/// Cloning is cheap (the body is reference counted), which is what lets the
/// same response be returned to the client and written to the cache.
#[derive(Debug, Clone)]
pub struct EdgeResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl EdgeResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Plain-text response with the given status.
    pub fn text(status: StatusCode, message: impl Into<String>) -> Self {
        let body = Bytes::from(message.into());

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain;charset=UTF-8"),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));

        Self::new(status, headers, body)
    }

    pub fn header(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
