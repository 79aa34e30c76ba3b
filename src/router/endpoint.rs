use crate::handler::{Handler, Reply};
use crate::middleware::{Middleware, Next};
use crate::types::{BoxFuture, HttpRequest, HttpResponse, RouteParams};
use bytes::{Bytes, BytesMut};
use http_body_util::{BodyExt, Full};
use std::sync::Arc;

/// The last entry of every chain: calls the matched route's handler with the captured parameters.
pub(crate) struct RouteEndpoint {
    handler: Arc<dyn Handler>,
    params: RouteParams,
}

impl RouteEndpoint {
    pub(crate) fn new(handler: Arc<dyn Handler>, params: RouteParams) -> RouteEndpoint {
        RouteEndpoint { handler, params }
    }
}

impl Middleware for RouteEndpoint {
    fn handle(&self, req: HttpRequest, res: HttpResponse, _next: Next) -> BoxFuture<crate::Result<HttpResponse>> {
        let fut = self.handler.call(req, self.params.clone());

        Box::pin(async move {
            match fut.await? {
                Reply::Response(res) => Ok::<_, crate::Error>(res),
                Reply::Body(body) => Ok(append_body(res, body).await),
            }
        })
    }
}

async fn append_body(res: HttpResponse, body: String) -> HttpResponse {
    let (parts, existing) = res.into_parts();
    let existing = match existing.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(never) => match never {},
    };

    let mut buf = BytesMut::with_capacity(existing.len() + body.len());
    buf.extend_from_slice(&existing);
    buf.extend_from_slice(body.as_bytes());

    HttpResponse::from_parts(parts, Full::new(Bytes::from(buf)))
}
