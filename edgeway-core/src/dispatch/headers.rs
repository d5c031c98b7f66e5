use crate::store::ObjectMetadata;
use http::{HeaderMap, HeaderName, HeaderValue, header};
use std::time::SystemTime;

#[derive(Debug, Default)]
pub(crate) struct HeaderBuilder {
    headers: HeaderMap,
}

impl HeaderBuilder {
    /// Inserts (or removes) a header from the header map.
    ///
    /// Values that are not valid header values, or are empty, remove the
    /// header instead.
    pub(crate) fn insert(&mut self, header_name: HeaderName, value: &str) {
        let header_value = match HeaderValue::from_str(value) {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(header = %header_name, value, "dropping invalid header value");
                HeaderValue::from_static("")
            }
        };

        if header_value.is_empty() {
            self.headers.remove(header_name);
        } else {
            self.headers.insert(header_name, header_value);
        }
    }

    fn insert_opt(&mut self, header_name: HeaderName, value: Option<&str>) {
        if let Some(value) = value {
            self.insert(header_name, value);
        }
    }

    /// Replays the object's stored HTTP metadata.
    pub(crate) fn object_metadata(&mut self, metadata: &ObjectMetadata) {
        self.insert_opt(header::CONTENT_TYPE, metadata.content_type.as_deref());
        self.insert_opt(header::CONTENT_LANGUAGE, metadata.content_language.as_deref());
        self.insert_opt(
            header::CONTENT_DISPOSITION,
            metadata.content_disposition.as_deref(),
        );
        self.insert_opt(header::CONTENT_ENCODING, metadata.content_encoding.as_deref());
        self.insert_opt(header::CACHE_CONTROL, metadata.cache_control.as_deref());
    }

    pub(crate) fn content_type(&mut self, value: &str) {
        self.insert(header::CONTENT_TYPE, value);
    }

    pub(crate) fn content_length(&mut self, len: usize) {
        self.headers.insert(header::CONTENT_LENGTH, HeaderValue::from(len));
    }

    pub(crate) fn etag(&mut self, value: &str) {
        self.insert(header::ETAG, value);
    }

    pub(crate) fn last_modified(&mut self, modified: SystemTime) {
        self.insert(header::LAST_MODIFIED, &httpdate::fmt_http_date(modified));
    }

    pub(crate) fn has_cache_control(&self) -> bool {
        self.headers.contains_key(header::CACHE_CONTROL)
    }

    /// Lifetime in shared caches only; browsers revalidate on their own terms.
    pub(crate) fn shared_max_age(&mut self, seconds: u64) {
        self.insert(header::CACHE_CONTROL, &format!("s-maxage={seconds}"));
    }

    pub(crate) fn build(self) -> HeaderMap {
        self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::HeaderBuilder;
    use crate::store::ObjectMetadata;
    use http::header;
    use pretty_assertions::assert_eq;

    #[test]
    fn invalid_metadata_value_is_dropped_and_others_kept() {
        // Arrange
        let metadata = ObjectMetadata {
            content_type: Some("text/plain".to_string()),
            content_disposition: Some("attachment; filename=\"a\nb.txt\"".to_string()),
            ..ObjectMetadata::default()
        };
        let mut builder = HeaderBuilder::default();

        // Act
        builder.object_metadata(&metadata);
        let headers = builder.build();

        // Assert
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/plain");
        assert!(headers.get(header::CONTENT_DISPOSITION).is_none());
    }
}
