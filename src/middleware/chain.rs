use super::Middleware;
use crate::types::{BoxFuture, HttpRequest, HttpResponse};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use tracing::trace;

/// An ordered list of middleware, with the route endpoint as its last entry, assembled for a single request.
///
/// Running the chain consumes it. The position in the chain is carried by the [`Next`](./struct.Next.html)
/// value handed to each middleware, so no state is shared between two requests or two runs.
#[derive(Default)]
pub struct MiddlewareChain {
    stack: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> MiddlewareChain {
        MiddlewareChain::default()
    }

    pub fn with_capacity(capacity: usize) -> MiddlewareChain {
        MiddlewareChain {
            stack: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, middleware: Arc<dyn Middleware>) {
        self.stack.push(middleware);
    }

    pub fn extend<I: IntoIterator<Item = Arc<dyn Middleware>>>(&mut self, middleware: I) {
        self.stack.extend(middleware);
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Runs the chain from the first entry.
    pub fn run(self, req: HttpRequest, res: HttpResponse) -> BoxFuture<crate::Result<HttpResponse>> {
        let next = Next {
            stack: Arc::from(self.stack),
            cursor: 0,
        };
        next.run(req, res)
    }
}

impl Debug for MiddlewareChain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ len: {} }}", self.stack.len())
    }
}

/// The continuation of a middleware chain.
///
/// Each middleware gets its own `Next` pointing one past itself. When the cursor runs past the end of the chain
/// the response is returned unchanged.
pub struct Next {
    stack: Arc<[Arc<dyn Middleware>]>,
    cursor: usize,
}

impl Next {
    pub fn run(self, req: HttpRequest, res: HttpResponse) -> BoxFuture<crate::Result<HttpResponse>> {
        let Some(middleware) = self.stack.get(self.cursor).cloned() else {
            trace!(cursor = self.cursor, "Middleware chain exhausted");
            return Box::pin(async move { Ok::<_, crate::Error>(res) });
        };

        trace!(cursor = self.cursor, len = self.stack.len(), "Executing middleware");
        let next = Next {
            stack: self.stack,
            cursor: self.cursor + 1,
        };
        middleware.handle(req, res, next)
    }
}

impl Debug for Next {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ cursor: {}, len: {} }}", self.cursor, self.stack.len())
    }
}
