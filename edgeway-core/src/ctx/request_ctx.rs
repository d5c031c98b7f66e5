use crate::ctx::{EdgeRequest, RequestId, RequestRejectError};
use http::uri::Authority;
use http::{HeaderMap, Method, StatusCode, Uri, header};
use pingora::prelude::Session;
use std::time::Instant;

/// Per-request state carried through the gateway hooks.
#[derive(Debug)]
pub struct RequestCtx {
    pub request_id: RequestId,

    /// Lifecycle flag to determine if the context has already been hydrated from a session.
    pub hydrated: bool,

    pub method: Option<Method>,
    pub host: Option<String>,

    /// The request path as received, still percent-encoded.
    pub raw_path: Option<String>,

    /// Status of the response written downstream, if any.
    pub status: Option<StatusCode>,

    pub started: Instant,
}

impl Default for RequestCtx {
    fn default() -> Self {
        Self::empty()
    }
}

impl RequestCtx {
    pub fn empty() -> Self {
        Self {
            request_id: RequestId::default(),
            hydrated: false,
            method: None,
            host: None,
            raw_path: None,
            status: None,
            started: Instant::now(),
        }
    }

    pub fn hydrate_from_session(&mut self, session: &Session) -> Result<(), RequestRejectError> {
        let request_header = session.req_header();
        self.hydrate(
            &request_header.uri,
            &request_header.method,
            &request_header.headers,
        )
    }

    pub(crate) fn hydrate(
        &mut self,
        uri: &Uri,
        method: &Method,
        headers: &HeaderMap,
    ) -> Result<(), RequestRejectError> {
        debug_assert!(!self.hydrated, "Already hydrated, cannot hydrate again");

        // Recorded before host validation so the access log still has them.
        self.method = Some(method.clone());
        self.raw_path = Some(uri.path().to_owned());

        self.host = Some(request_host(uri, headers)?);
        self.hydrated = true;

        Ok(())
    }

    /// Build the dispatcher's view of this request.
    pub fn edge_request(&self, scheme: &str) -> Option<EdgeRequest> {
        Some(EdgeRequest::new(
            self.method.clone()?,
            scheme,
            self.host.as_deref()?,
            self.raw_path.as_deref()?,
        ))
    }

    pub fn is_head(&self) -> bool {
        self.method.as_ref() == Some(&Method::HEAD)
    }
}

/// Hostname from the `Host` header (or the absolute URI), without port.
fn request_host(uri: &Uri, headers: &HeaderMap) -> Result<String, RequestRejectError> {
    let raw = match headers.get(header::HOST) {
        Some(value) => value
            .to_str()
            .map_err(|_| {
                let lossy = String::from_utf8_lossy(value.as_bytes());
                RequestRejectError::InvalidHost(lossy.into_owned())
            })?
            .to_owned(),
        None => uri
            .authority()
            .map(|a| a.as_str().to_owned())
            .ok_or(RequestRejectError::MissingHost)?,
    };

    let authority = raw
        .parse::<Authority>()
        .map_err(|_| RequestRejectError::InvalidHost(raw.clone()))?;

    let host = authority.host();
    if host.is_empty() {
        return Err(RequestRejectError::MissingHost);
    }

    Ok(host.to_ascii_lowercase())
}
