use crate::types::{BoxFuture, HttpRequest, HttpResponse};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

pub use self::chain::{MiddlewareChain, Next};
pub use self::post_size::PostSizeLimit;

mod chain;
mod post_size;

/// A unit of request/response processing in a chain. Please refer to the [Middleware](./index.html#middleware)
/// section for more info.
///
/// A middleware receives the request, the response built so far and the continuation `next`. Calling
/// `next.run(req, res)` hands control to the rest of the chain; returning without calling it ends the chain with
/// whatever the middleware returns.
///
/// Closures with the signature `Fn(HttpRequest, HttpResponse, Next) -> impl Future<Output = Result<HttpResponse>>`
/// are middleware too.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, req: HttpRequest, res: HttpResponse, next: Next) -> BoxFuture<crate::Result<HttpResponse>>;
}

impl<F, R> Middleware for F
where
    F: Fn(HttpRequest, HttpResponse, Next) -> R + Send + Sync + 'static,
    R: Future<Output = crate::Result<HttpResponse>> + Send + 'static,
{
    fn handle(&self, req: HttpRequest, res: HttpResponse, next: Next) -> BoxFuture<crate::Result<HttpResponse>> {
        Box::pin(self(req, res, next))
    }
}

/// A reference to a middleware as it is written at registration time.
///
/// `Named` refers either to an alias registered on the router or, failing that, to a type reference the
/// [`Invoker`](./trait.Invoker.html) knows how to instantiate. Names are resolved when the router is built.
#[derive(Clone)]
pub enum MiddlewareRef {
    Direct(Arc<dyn Middleware>),
    Named(String),
}

impl MiddlewareRef {
    /// Creates a direct reference from a closure or an async fn.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchyard::{HttpRequest, HttpResponse, MiddlewareRef, Next};
    ///
    /// let logger = MiddlewareRef::direct(|req: HttpRequest, res: HttpResponse, next: Next| async move {
    ///     println!("{} {}", req.method(), req.uri().path());
    ///     next.run(req, res).await
    /// });
    /// # let _ = logger;
    /// ```
    pub fn direct<F, R>(handler: F) -> MiddlewareRef
    where
        F: Fn(HttpRequest, HttpResponse, Next) -> R + Send + Sync + 'static,
        R: Future<Output = crate::Result<HttpResponse>> + Send + 'static,
    {
        MiddlewareRef::Direct(Arc::new(handler))
    }

    /// Creates a direct reference from any [`Middleware`](./trait.Middleware.html) implementation.
    pub fn new<M: Middleware>(middleware: M) -> MiddlewareRef {
        MiddlewareRef::Direct(Arc::new(middleware))
    }

    pub fn named<N: Into<String>>(name: N) -> MiddlewareRef {
        MiddlewareRef::Named(name.into())
    }
}

impl From<&str> for MiddlewareRef {
    fn from(name: &str) -> MiddlewareRef {
        MiddlewareRef::Named(name.to_string())
    }
}

impl From<String> for MiddlewareRef {
    fn from(name: String) -> MiddlewareRef {
        MiddlewareRef::Named(name)
    }
}

impl From<Arc<dyn Middleware>> for MiddlewareRef {
    fn from(middleware: Arc<dyn Middleware>) -> MiddlewareRef {
        MiddlewareRef::Direct(middleware)
    }
}

impl Debug for MiddlewareRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MiddlewareRef::Direct(_) => write!(f, "<middleware>"),
            MiddlewareRef::Named(name) => write!(f, "{:?}", name),
        }
    }
}

/// Conversion into a list of middleware references, so that a single reference or a list can be passed
/// wherever middleware is accepted.
pub trait IntoMiddlewareList {
    fn into_middleware_list(self) -> Vec<MiddlewareRef>;
}

impl IntoMiddlewareList for MiddlewareRef {
    fn into_middleware_list(self) -> Vec<MiddlewareRef> {
        vec![self]
    }
}

impl IntoMiddlewareList for &str {
    fn into_middleware_list(self) -> Vec<MiddlewareRef> {
        vec![MiddlewareRef::from(self)]
    }
}

impl IntoMiddlewareList for String {
    fn into_middleware_list(self) -> Vec<MiddlewareRef> {
        vec![MiddlewareRef::from(self)]
    }
}

impl<T: Into<MiddlewareRef>> IntoMiddlewareList for Vec<T> {
    fn into_middleware_list(self) -> Vec<MiddlewareRef> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<MiddlewareRef> + Clone> IntoMiddlewareList for &[T] {
    fn into_middleware_list(self) -> Vec<MiddlewareRef> {
        self.iter().cloned().map(Into::into).collect()
    }
}

impl<T: Into<MiddlewareRef>, const N: usize> IntoMiddlewareList for [T; N] {
    fn into_middleware_list(self) -> Vec<MiddlewareRef> {
        self.into_iter().map(Into::into).collect()
    }
}
