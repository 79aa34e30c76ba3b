use crate::handler::{Callback, Handler, Reply};
use crate::middleware::Middleware;
use crate::types::{HttpRequest, HttpResponse, RouteParams};
use crate::Next;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

/// The seam between the router and whatever owns application objects.
///
/// The router asks it, once while building, for the handler behind every symbolic [`Callback`](./enum.Callback.html)
/// and for the middleware behind every type reference that is not an alias.
pub trait Invoker: Send + Sync + 'static {
    fn resolve_middleware(&self, type_ref: &str) -> Option<Arc<dyn Middleware>>;

    fn resolve_handler(&self, callback: &Callback) -> Option<Arc<dyn Handler>>;
}

/// A static reference table: fully qualified names mapped to handlers and middleware.
///
/// # Examples
///
/// ```
/// use switchyard::{Callback, HttpRequest, Registry, RouteParams, Router};
///
/// async fn show(_: HttpRequest, params: RouteParams) -> switchyard::Result<String> {
///     Ok(format!("user {}", &params[0]))
/// }
///
/// let registry = Registry::new().method("app::UserController", "show", show);
///
/// let mut builder = Router::builder().invoker(registry);
/// builder.namespace("app", |r| {
///     r.get("/users/{id}", Callback::method("UserController", "show"));
/// });
/// let router = builder.build().unwrap();
/// # let _ = router;
/// ```
#[derive(Default)]
pub struct Registry {
    functions: HashMap<String, Arc<dyn Handler>>,
    methods: HashMap<(String, String), Arc<dyn Handler>>,
    middleware: HashMap<String, Arc<dyn Middleware>>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    pub fn function<N, F, R, O>(mut self, name: N, handler: F) -> Self
    where
        N: Into<String>,
        F: Fn(HttpRequest, RouteParams) -> R + Send + Sync + 'static,
        R: Future<Output = crate::Result<O>> + Send + 'static,
        O: Into<Reply>,
    {
        self.functions.insert(name.into(), Arc::new(handler));
        self
    }

    pub fn method<C, M, F, R, O>(mut self, class: C, method: M, handler: F) -> Self
    where
        C: Into<String>,
        M: Into<String>,
        F: Fn(HttpRequest, RouteParams) -> R + Send + Sync + 'static,
        R: Future<Output = crate::Result<O>> + Send + 'static,
        O: Into<Reply>,
    {
        self.methods.insert((class.into(), method.into()), Arc::new(handler));
        self
    }

    /// Registers a middleware instance under a type reference.
    pub fn middleware<N: Into<String>, M: Middleware>(mut self, type_ref: N, middleware: M) -> Self {
        self.middleware.insert(type_ref.into(), Arc::new(middleware));
        self
    }

    /// Registers a closure middleware under a type reference.
    pub fn middleware_fn<N, F, R>(mut self, type_ref: N, handler: F) -> Self
    where
        N: Into<String>,
        F: Fn(HttpRequest, HttpResponse, Next) -> R + Send + Sync + 'static,
        R: Future<Output = crate::Result<HttpResponse>> + Send + 'static,
    {
        self.middleware.insert(type_ref.into(), Arc::new(handler));
        self
    }
}

impl Invoker for Registry {
    fn resolve_middleware(&self, type_ref: &str) -> Option<Arc<dyn Middleware>> {
        self.middleware.get(type_ref).cloned()
    }

    fn resolve_handler(&self, callback: &Callback) -> Option<Arc<dyn Handler>> {
        match callback {
            Callback::Function(name) => self.functions.get(name).cloned(),
            Callback::Method { class, method } => self.methods.get(&(class.clone(), method.clone())).cloned(),
            Callback::Closure(handler) => Some(handler.clone()),
        }
    }
}

impl Debug for Registry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ functions: {:?}, methods: {:?}, middleware: {:?} }}",
            self.functions.keys().collect::<Vec<_>>(),
            self.methods.keys().collect::<Vec<_>>(),
            self.middleware.keys().collect::<Vec<_>>()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn noop(_: HttpRequest, _: RouteParams) -> crate::Result<()> {
        Ok(())
    }

    #[test]
    fn should_resolve_by_qualified_name() {
        let registry = Registry::new()
            .function("app::health", noop)
            .method("app::Users", "index", noop)
            .middleware_fn("app::Auth", |req, res, next: Next| next.run(req, res));

        assert!(registry.resolve_handler(&Callback::function("app::health")).is_some());
        assert!(registry.resolve_handler(&Callback::method("app::Users", "index")).is_some());
        assert!(registry.resolve_handler(&Callback::method("app::Users", "show")).is_none());
        assert!(registry.resolve_handler(&Callback::function("health")).is_none());
        assert!(registry.resolve_middleware("app::Auth").is_some());
        assert!(registry.resolve_middleware("app::Guest").is_none());
    }

    #[test]
    fn should_pass_closures_through() {
        let registry = Registry::new();
        assert!(registry.resolve_handler(&Callback::closure(noop)).is_some());
    }
}
