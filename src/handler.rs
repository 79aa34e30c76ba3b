use crate::helpers::join_namespace;
use crate::types::{BoxFuture, HttpRequest, HttpResponse, RouteParams};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

/// What a route handler produces.
///
/// A full response is used verbatim. A body is appended to the body of the response that reached the route,
/// so anything a middleware already wrote stays in front of it.
#[derive(Debug)]
pub enum Reply {
    Response(HttpResponse),
    Body(String),
}

impl From<HttpResponse> for Reply {
    fn from(res: HttpResponse) -> Reply {
        Reply::Response(res)
    }
}

impl From<String> for Reply {
    fn from(body: String) -> Reply {
        Reply::Body(body)
    }
}

impl From<&str> for Reply {
    fn from(body: &str) -> Reply {
        Reply::Body(body.to_string())
    }
}

impl From<()> for Reply {
    fn from(_: ()) -> Reply {
        Reply::Body(String::new())
    }
}

/// A route handler. It receives the request and the positional route parameters.
///
/// Any `Fn(HttpRequest, RouteParams) -> impl Future<Output = Result<impl Into<Reply>>>` is a handler:
///
/// ```
/// use switchyard::{HttpRequest, RouteParams};
///
/// async fn show_user(_req: HttpRequest, params: RouteParams) -> switchyard::Result<String> {
///     Ok(format!("user {}", &params[0]))
/// }
/// # let _ = switchyard::Callback::closure(show_user);
/// ```
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: HttpRequest, params: RouteParams) -> BoxFuture<crate::Result<Reply>>;
}

impl<F, R, O> Handler for F
where
    F: Fn(HttpRequest, RouteParams) -> R + Send + Sync + 'static,
    R: Future<Output = crate::Result<O>> + Send + 'static,
    O: Into<Reply>,
{
    fn call(&self, req: HttpRequest, params: RouteParams) -> BoxFuture<crate::Result<Reply>> {
        let fut = self(req, params);
        Box::pin(async move { fut.await.map(Into::into) })
    }
}

/// A reference to the code a route runs.
///
/// Function and method references are symbolic: they are qualified with the namespace of the enclosing group
/// when the route is registered and resolved once, through the [`Invoker`](./trait.Invoker.html), when the
/// router is built. Closures are used as they are.
#[derive(Clone)]
pub enum Callback {
    Function(String),
    Method { class: String, method: String },
    Closure(Arc<dyn Handler>),
}

impl Callback {
    pub fn function<N: Into<String>>(name: N) -> Callback {
        Callback::Function(name.into())
    }

    pub fn method<C: Into<String>, M: Into<String>>(class: C, method: M) -> Callback {
        Callback::Method {
            class: class.into(),
            method: method.into(),
        }
    }

    /// Wraps a closure or an async fn.
    pub fn closure<F, R, O>(handler: F) -> Callback
    where
        F: Fn(HttpRequest, RouteParams) -> R + Send + Sync + 'static,
        R: Future<Output = crate::Result<O>> + Send + 'static,
        O: Into<Reply>,
    {
        Callback::Closure(Arc::new(handler))
    }

    /// Wraps any type implementing [`Handler`](./trait.Handler.html).
    pub fn handler<H: Handler>(handler: H) -> Callback {
        Callback::Closure(Arc::new(handler))
    }

    /// Prefixes a symbolic reference with a namespace. Closures are returned untouched.
    pub(crate) fn qualify(self, namespace: &str) -> Callback {
        match self {
            Callback::Function(name) => Callback::Function(join_namespace([namespace, name.as_str()])),
            Callback::Method { class, method } => Callback::Method {
                class: join_namespace([namespace, class.as_str()]),
                method,
            },
            closure => closure,
        }
    }
}

impl Debug for Callback {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Function(name) => write!(f, "{}", name),
            Callback::Method { class, method } => write!(f, "{}@{}", class, method),
            Callback::Closure(_) => write!(f, "<closure>"),
        }
    }
}
