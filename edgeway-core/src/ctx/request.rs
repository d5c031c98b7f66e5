use http::Method;

/// An inbound request as the dispatcher sees it.
///
/// `raw_path` is the path exactly as the client sent it, still
/// percent-encoded. Query strings are not part of object identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRequest {
    pub method: Method,
    pub scheme: String,
    pub host: String,
    pub raw_path: String,
}

impl EdgeRequest {
    pub fn new(method: Method, scheme: &str, host: &str, raw_path: &str) -> Self {
        Self {
            method,
            scheme: scheme.to_owned(),
            host: host.to_owned(),
            raw_path: raw_path.to_owned(),
        }
    }

    /// Convenience constructor for an `https` GET.
    pub fn get(host: &str, raw_path: &str) -> Self {
        Self::new(Method::GET, "https", host, raw_path)
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Only GET and HEAD go through the shared cache. HEAD shares the GET key.
    pub fn uses_cache(&self) -> bool {
        self.method == Method::GET || self.method == Method::HEAD
    }
}
