use crate::ctx::{EdgeResponse, RequestCtx};
use crate::dispatch::{BackgroundWork, ProxyDispatcher};
use async_trait::async_trait;
use http::StatusCode;
use pingora::prelude::{HttpPeer, ProxyHttp, Session};
use pingora::{Custom, Error};
use pingora_http::ResponseHeader;
use std::sync::Arc;

/// Terminal gateway: every request is answered by the dispatcher and
/// nothing is ever proxied upstream.
pub struct EdgeGateway {
    dispatcher: Arc<ProxyDispatcher>,

    /// Scheme recorded in cache keys (`https` on a TLS listener).
    scheme: &'static str,
}

impl EdgeGateway {
    pub fn new(dispatcher: Arc<ProxyDispatcher>, scheme: &'static str) -> Self {
        Self { dispatcher, scheme }
    }

    /// Dispatch a hydrated request. Cache writes are left on `background`
    /// and are not awaited here.
    pub(crate) async fn respond(
        &self,
        ctx: &RequestCtx,
        background: &BackgroundWork,
    ) -> EdgeResponse {
        let Some(request) = ctx.edge_request(self.scheme) else {
            return EdgeResponse::text(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error thrown: incomplete request",
            );
        };

        self.dispatcher.handle(&request, background).await
    }
}

#[async_trait]
impl ProxyHttp for EdgeGateway {
    type CTX = RequestCtx;

    fn new_ctx(&self) -> Self::CTX {
        RequestCtx::empty()
    }

    async fn upstream_peer(
        &self,
        _session: &mut Session,
        _ctx: &mut Self::CTX,
    ) -> pingora::Result<Box<HttpPeer>> {
        Err(Error::new(Custom(
            "EdgeGateway attempted to proxy upstream (bug)",
        )))
    }

    async fn request_filter(
        &self,
        session: &mut Session,
        ctx: &mut Self::CTX,
    ) -> pingora::Result<bool> {
        let background = BackgroundWork::new();

        let response = match ctx.hydrate_from_session(session) {
            Ok(()) => self.respond(ctx, &background).await,
            Err(e) => {
                tracing::warn!(request_id = %ctx.request_id, error = %e, "request rejected");
                EdgeResponse::text(StatusCode::INTERNAL_SERVER_ERROR, format!("Error thrown: {e}"))
            }
        };

        ctx.status = Some(response.status);
        write_response(session, response, ctx.is_head()).await?;

        // The client already has its response; spawned cache writes finish
        // here so they stay attributed to this request in the access log.
        if background.pending() > 0 {
            background.drain().await;
        }

        // Terminal: the response has been written.
        Ok(true)
    }

    async fn logging(&self, _session: &mut Session, e: Option<&Error>, ctx: &mut Self::CTX)
    where
        Self::CTX: Send + Sync,
    {
        let elapsed_ms = ctx.started.elapsed().as_millis() as u64;
        let status = ctx.status.map(|s| s.as_u16());

        match e {
            Some(err) => tracing::warn!(
                request_id = %ctx.request_id,
                method = ?ctx.method,
                host = ?ctx.host,
                raw_path = ?ctx.raw_path,
                status,
                elapsed_ms,
                error = %err,
                "request finished with transport error"
            ),
            None => tracing::info!(
                request_id = %ctx.request_id,
                method = ?ctx.method,
                host = ?ctx.host,
                raw_path = ?ctx.raw_path,
                status,
                elapsed_ms,
                "request finished"
            ),
        }
    }
}

async fn write_response(
    session: &mut Session,
    response: EdgeResponse,
    head_only: bool,
) -> pingora::Result<()> {
    let mut resp = ResponseHeader::build(response.status, Some(response.headers.len()))?;
    for (name, value) in response.headers.iter() {
        resp.append_header(name, value)?;
    }

    session.write_response_header(Box::new(resp), false).await?;

    if head_only || response.body.is_empty() {
        session.write_response_body(None, true).await?;
    } else {
        session.write_response_body(Some(response.body), true).await?;
    }

    Ok(())
}
