use super::{Middleware, Next};
use crate::types::{BoxFuture, HttpRequest, HttpResponse};
use crate::Error;
use http::header::CONTENT_LENGTH;
use http::StatusCode;
use tracing::debug;

/// Rejects requests whose body exceeds a limit with `413 Payload Too Large`.
///
/// Both the declared `Content-Length` and the collected body are measured, so chunked requests without a declared
/// length are caught too. A limit of zero disables the check.
#[derive(Debug, Clone, Copy)]
pub struct PostSizeLimit {
    max_bytes: u64,
}

impl PostSizeLimit {
    pub fn new(max_bytes: u64) -> PostSizeLimit {
        PostSizeLimit { max_bytes }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    fn exceeds(&self, req: &HttpRequest) -> bool {
        let declared = req
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);

        self.max_bytes > 0 && declared.max(req.body().len() as u64) > self.max_bytes
    }
}

impl Middleware for PostSizeLimit {
    fn handle(&self, req: HttpRequest, res: HttpResponse, next: Next) -> BoxFuture<crate::Result<HttpResponse>> {
        if self.exceeds(&req) {
            debug!(limit = self.max_bytes, "Request body exceeds the post size limit");
            return Box::pin(async { Err::<HttpResponse, _>(Error::status(StatusCode::PAYLOAD_TOO_LARGE)) });
        }

        next.run(req, res)
    }
}
