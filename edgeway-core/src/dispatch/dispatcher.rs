use crate::cache::ResponseCache;
use crate::canonical::{CacheKey, CanonicalPath};
use crate::ctx::{EdgeRequest, EdgeResponse};
use crate::dispatch::headers::HeaderBuilder;
use crate::dispatch::{
    BackgroundWork, DeliveryMode, DispatchError, DispatcherSettings, redirect_location,
};
use crate::resolve::{Candidates, ObjectKeyResolver, Resolution};
use crate::store::{ObjectStore, StoredObject};
use http::{HeaderMap, HeaderValue, StatusCode, header};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const NOT_FOUND_BODY: &str = "Object Not Found";

/// Per-request state machine:
///
/// ```text
/// Start -> Redirect -> Done
/// Start -> CacheLookup -> CacheHit -> Done
///                      -> CacheMiss -> StoreFetch -> Found -> StoreCacheEntry -> Done
///                                                 -> NotFound -> StoreNegativeEntry -> Done
/// ```
///
/// There is no retry edge. Every failure ends in a 500 carrying its message.
pub struct ProxyDispatcher {
    settings: DispatcherSettings,
    resolver: ObjectKeyResolver,
    store: Arc<dyn ObjectStore>,
    cache: Arc<dyn ResponseCache>,
}

/// One candidate interpretation with the cache key it maps to.
struct Candidate {
    path: CanonicalPath,
    cache_key: CacheKey,
}

impl ProxyDispatcher {
    pub fn new(
        settings: DispatcherSettings,
        store: Arc<dyn ObjectStore>,
        cache: Arc<dyn ResponseCache>,
    ) -> Self {
        let resolver = ObjectKeyResolver::new(store.clone(), settings.decode_passes);
        Self {
            settings,
            resolver,
            store,
            cache,
        }
    }

    /// Produce the response for `request`. Never fails: internal errors are
    /// turned into a 500 response.
    ///
    /// Cache writes are deferred onto `background`; the response does not
    /// wait for them.
    pub async fn handle(&self, request: &EdgeRequest, background: &BackgroundWork) -> EdgeResponse {
        match self.dispatch(request, background).await {
            Ok(response) => response,
            Err(err) => {
                error!(raw_path = %request.raw_path, error = %err, "request failed");
                EdgeResponse::text(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error thrown: {err}"),
                )
            }
        }
    }

    async fn dispatch(
        &self,
        request: &EdgeRequest,
        background: &BackgroundWork,
    ) -> Result<EdgeResponse, DispatchError> {
        match &self.settings.mode {
            DeliveryMode::Redirect { external_domain } => {
                self.redirect(request, external_domain).await
            }
            DeliveryMode::Cached => self.serve(request, background).await,
        }
    }

    //-------------------------------------------------------------------------
    // Redirect mode
    //-------------------------------------------------------------------------

    async fn redirect(
        &self,
        request: &EdgeRequest,
        external_domain: &str,
    ) -> Result<EdgeResponse, DispatchError> {
        let path = match self.resolver.resolve(&request.raw_path).await? {
            Resolution::Resolved { path, .. } => path,
            // Best effort; the CDN reports the miss itself.
            Resolution::Unresolved => self.resolver.candidates(&request.raw_path).once,
        };

        let location = redirect_location(external_domain, &path);
        debug!(raw_path = %request.raw_path, location = %location, "redirecting");

        let location_value =
            HeaderValue::from_str(&location).map_err(|_| DispatchError::InvalidHeader {
                name: "location",
                value: location.clone(),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(header::LOCATION, location_value);
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(0));

        Ok(EdgeResponse::new(StatusCode::FOUND, headers, Default::default()))
    }

    //-------------------------------------------------------------------------
    // Cache-fronted mode
    //-------------------------------------------------------------------------

    async fn serve(
        &self,
        request: &EdgeRequest,
        background: &BackgroundWork,
    ) -> Result<EdgeResponse, DispatchError> {
        let candidates = self.candidates(request);
        let use_cache = request.uses_cache();

        if use_cache {
            for candidate in &candidates {
                if let Some(hit) = self.lookup(&candidate.cache_key).await {
                    return Ok(hit);
                }
            }
        }

        for candidate in &candidates {
            let key = candidate.path.object_key();

            let Some(object) = self.store.get(&key).await? else {
                debug!(key = %key, "object not in bucket");
                continue;
            };

            let response = self.found(object);
            info!(key = %key, cache_key = %candidate.cache_key, "fetched object from bucket");

            if use_cache {
                self.defer_store(background, candidate.cache_key.clone(), response.clone());
            }
            return Ok(response);
        }

        let response = self.not_found();
        if use_cache {
            // Every candidate gets the negative entry so the next ambiguous
            // miss is answered without probing the bucket.
            for candidate in &candidates {
                self.defer_store(background, candidate.cache_key.clone(), response.clone());
            }
        }

        Ok(response)
    }

    fn candidates(&self, request: &EdgeRequest) -> Vec<Candidate> {
        Candidates::derive(&request.raw_path, self.settings.decode_passes)
            .iter()
            .map(|path| Candidate {
                cache_key: CacheKey::new(&request.scheme, &request.host, path),
                path: path.clone(),
            })
            .collect()
    }

    /// Cache lookup where a failing cache counts as a miss.
    async fn lookup(&self, cache_key: &CacheKey) -> Option<EdgeResponse> {
        match self.cache.lookup(cache_key).await {
            Ok(Some(response)) => {
                info!(cache_key = %cache_key, status = response.status.as_u16(), "cache hit");
                Some(response)
            }
            Ok(None) => {
                debug!(cache_key = %cache_key, "cache miss");
                None
            }
            Err(err) => {
                warn!(cache_key = %cache_key, error = %err, "cache lookup failed, treating as miss");
                None
            }
        }
    }

    fn defer_store(&self, background: &BackgroundWork, cache_key: CacheKey, response: EdgeResponse) {
        let cache = Arc::clone(&self.cache);

        background.defer(async move {
            match cache.store(&cache_key, response).await {
                Ok(()) => debug!(cache_key = %cache_key, "stored response in cache"),
                Err(err) => warn!(cache_key = %cache_key, error = %err, "cache write failed"),
            }
        });
    }

    fn found(&self, object: StoredObject) -> EdgeResponse {
        let mut headers = HeaderBuilder::default();

        headers.object_metadata(&object.metadata);
        headers.etag(&object.http_etag());
        if let Some(uploaded) = object.uploaded {
            headers.last_modified(uploaded);
        }
        if !headers.has_cache_control() {
            headers.shared_max_age(self.settings.default_max_age_seconds);
        }
        headers.content_length(object.body.len());

        EdgeResponse::new(StatusCode::OK, headers.build(), object.body)
    }

    fn not_found(&self) -> EdgeResponse {
        let mut headers = HeaderBuilder::default();

        headers.content_type("text/plain;charset=UTF-8");
        headers.shared_max_age(self.settings.negative_max_age_seconds);
        headers.content_length(NOT_FOUND_BODY.len());

        EdgeResponse::new(
            StatusCode::NOT_FOUND,
            headers.build(),
            NOT_FOUND_BODY.into(),
        )
    }
}
