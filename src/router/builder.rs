use super::group::GroupAttributes;
use super::{ErrHandler, Router};
use crate::config::RouterConfig;
use crate::handler::Callback;
use crate::helpers::join_path;
use crate::invoker::{Invoker, Registry};
use crate::matcher::PathMatcher;
use crate::middleware::{IntoMiddlewareList, Middleware, MiddlewareRef, PostSizeLimit};
use crate::route::table::CompiledRoute;
use crate::route::{Route, RouteActions, RouteHandle, RouteTable};
use crate::types::HttpResponse;
use crate::Error;
use http::Method;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use tracing::debug;

/// Builder for the [Router](./struct.Router.html) type.
///
/// Routes are registered with `&mut self` methods that return a [RouteHandle](./struct.RouteHandle.html) for the
/// new route. Groups open a scope with their own prefix, namespace and middleware for the routes registered in
/// their body and restore the previous scope afterwards. Router wide settings use consuming `self` methods.
///
/// Problems found while registering (a route without methods, for instance) are reported by
/// [`build`](#method.build), which also resolves every callback and middleware reference.
///
/// # Examples
///
/// ```
/// use switchyard::{Callback, GroupAttributes, HttpRequest, HttpResponse, Next, Router};
///
/// let mut builder = Router::builder()
///     .alias("auth", |req: HttpRequest, res: HttpResponse, next: Next| next.run(req, res));
///
/// builder.group(GroupAttributes::new().prefix("/admin").middleware("auth"), |r| {
///     r.group_at("/users", |r| {
///         r.get("/", Callback::closure(|_, _| async { Ok("users") }));
///     });
/// });
///
/// let router = builder.build().unwrap();
/// assert_eq!(router.routes().iter().next().unwrap().pattern(), "/admin/users");
/// ```
pub struct RouterBuilder {
    routes: Vec<Route>,
    scope: GroupAttributes,
    global: Vec<MiddlewareRef>,
    aliases: HashMap<String, MiddlewareRef>,
    invoker: Option<Arc<dyn Invoker>>,
    script_name: String,
    body_limit: Option<u64>,
    err_handler: Option<ErrHandler>,
    deferred: Option<Error>,
}

impl RouterBuilder {
    /// Creates a new `RouterBuilder` instance with default options.
    pub fn new() -> RouterBuilder {
        RouterBuilder::default()
    }

    /// Creates a builder preconfigured from a [`RouterConfig`](./struct.RouterConfig.html).
    pub fn from_config(config: &RouterConfig) -> crate::Result<RouterBuilder> {
        RouterBuilder::new().with_config(config)
    }

    /// Applies the script name, aliases and global middleware of a configuration. A positive `max_body_size`
    /// sets the [`body_limit`](#method.body_limit) and installs a [`PostSizeLimit`](./struct.PostSizeLimit.html) in
    /// front of the configured global middleware.
    pub fn with_config(mut self, config: &RouterConfig) -> crate::Result<RouterBuilder> {
        if let Some(ref script_name) = config.script_name {
            self.script_name = script_name.clone();
        }

        for (alias, type_ref) in config.aliases.iter() {
            self.aliases
                .insert(alias.clone(), MiddlewareRef::Named(type_ref.clone()));
        }

        if let Some(limit) = config.max_body_bytes()? {
            if limit > 0 {
                self.body_limit = Some(limit);
                self.global.push(MiddlewareRef::new(PostSizeLimit::new(limit)));
            }
        }

        self.global.extend(config.global_middleware.iter().cloned().map(MiddlewareRef::Named));

        debug!(
            script_name = %self.script_name,
            aliases = config.aliases.len(),
            global = self.global.len(),
            "Applied router configuration"
        );
        Ok(self)
    }

    /// Sets the collaborator that resolves symbolic callbacks and middleware type references.
    /// Without one, only closures and direct middleware can be used.
    pub fn invoker<I: Invoker>(mut self, invoker: I) -> Self {
        self.invoker = Some(Arc::new(invoker));
        self
    }

    /// Sets the path of the front script, e.g. `/blog/index.php`. Its directory is stripped from request paths and
    /// prefixed to generated urls. Defaults to the document root.
    pub fn script_name<S: Into<String>>(mut self, script_name: S) -> Self {
        self.script_name = script_name.into();
        self
    }

    /// Caps the size of request bodies read by the [`RequestService`](./struct.RequestService.html). A request
    /// declaring a larger `Content-Length`, or streaming more bytes than the cap, is answered with
    /// `413 Payload Too Large` before it is dispatched. Zero removes the cap.
    pub fn body_limit(mut self, max_bytes: u64) -> Self {
        self.body_limit = if max_bytes > 0 { Some(max_bytes) } else { None };
        self
    }

    /// Adds global middleware, run for every dispatched request before the route middleware.
    pub fn middleware<M: IntoMiddlewareList>(mut self, middleware: M) -> Self {
        self.global.extend(middleware.into_middleware_list());
        self
    }

    /// Registers a closure middleware under an alias name.
    pub fn alias<N, F, R>(mut self, name: N, handler: F) -> Self
    where
        N: Into<String>,
        F: Fn(crate::HttpRequest, HttpResponse, crate::Next) -> R + Send + Sync + 'static,
        R: std::future::Future<Output = crate::Result<HttpResponse>> + Send + 'static,
    {
        self.aliases.insert(name.into(), MiddlewareRef::direct(handler));
        self
    }

    /// Registers any middleware reference under an alias name. A `Named` target is resolved by the invoker.
    pub fn alias_ref<N: Into<String>, M: Into<MiddlewareRef>>(mut self, name: N, target: M) -> Self {
        self.aliases.insert(name.into(), target.into());
        self
    }

    /// Adds a handler to convert errors escaping dispatch into responses.
    pub fn err_handler<H>(mut self, handler: H) -> Self
    where
        H: Fn(Error) -> HttpResponse + Send + Sync + 'static,
    {
        self.err_handler = Some(Box::new(handler));
        self
    }

    /// Adds a new route with `GET` and `HEAD` methods.
    pub fn get<P: AsRef<str>>(&mut self, path: P, callback: Callback) -> RouteHandle<'_> {
        self.add(path, vec![Method::GET, Method::HEAD], callback)
    }

    /// Adds a new route with `POST` method.
    pub fn post<P: AsRef<str>>(&mut self, path: P, callback: Callback) -> RouteHandle<'_> {
        self.add(path, vec![Method::POST], callback)
    }

    /// Adds a new route with `PUT` method.
    pub fn put<P: AsRef<str>>(&mut self, path: P, callback: Callback) -> RouteHandle<'_> {
        self.add(path, vec![Method::PUT], callback)
    }

    /// Adds a new route with `DELETE` method.
    pub fn delete<P: AsRef<str>>(&mut self, path: P, callback: Callback) -> RouteHandle<'_> {
        self.add(path, vec![Method::DELETE], callback)
    }

    /// Adds a new route with `PATCH` method.
    pub fn patch<P: AsRef<str>>(&mut self, path: P, callback: Callback) -> RouteHandle<'_> {
        self.add(path, vec![Method::PATCH], callback)
    }

    /// Adds a new route with `OPTIONS` method.
    pub fn options<P: AsRef<str>>(&mut self, path: P, callback: Callback) -> RouteHandle<'_> {
        self.add(path, vec![Method::OPTIONS], callback)
    }

    /// Adds a new route with `GET`, `HEAD`, `POST`, `PUT`, `DELETE`, `PATCH` and `OPTIONS` methods.
    pub fn any<P: AsRef<str>>(&mut self, path: P, callback: Callback) -> RouteHandle<'_> {
        self.add(
            path,
            vec![
                Method::GET,
                Method::HEAD,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::PATCH,
                Method::OPTIONS,
            ],
            callback,
        )
    }

    /// Adds a new route with the specified methods.
    ///
    /// The path is joined to the current group prefix, symbolic callbacks are qualified with the current namespace,
    /// and the route starts with the current group middleware.
    pub fn add<P: AsRef<str>>(&mut self, path: P, methods: Vec<Method>, callback: Callback) -> RouteHandle<'_> {
        let pattern = join_path([self.scope.prefix.as_str(), path.as_ref()]);

        if methods.is_empty() && self.deferred.is_none() {
            self.deferred = Some(Error::Config(format!("The route {} has no methods", pattern)));
        }

        let callback = callback.qualify(&self.scope.namespace);
        let actions = RouteActions::new(callback, self.scope.middleware.clone());

        self.routes.push(Route::new(pattern, methods, actions));
        let idx = self.routes.len() - 1;
        RouteHandle::new(&mut self.routes[idx])
    }

    /// Registers the routes of `body` inside a group.
    ///
    /// The group attributes are nested into the current ones for the duration of `body` and the previous attributes
    /// are restored afterwards, so nothing leaks to sibling or enclosing groups. `body` can be a closure or any
    /// `fn(&mut RouterBuilder)`, which is how route files are usually written.
    pub fn group<A, F>(&mut self, attrs: A, body: F) -> &mut Self
    where
        A: Into<GroupAttributes>,
        F: FnOnce(&mut RouterBuilder),
    {
        let saved = self.scope.clone();
        self.scope = saved.nest(attrs.into());
        body(self);
        self.scope = saved;
        self
    }

    /// Shorthand for a group with only a prefix.
    pub fn group_at<P, F>(&mut self, prefix: P, body: F) -> &mut Self
    where
        P: Into<String>,
        F: FnOnce(&mut RouterBuilder),
    {
        self.group(GroupAttributes::new().prefix(prefix), body)
    }

    /// Shorthand for a group with only a namespace.
    pub fn namespace<N, F>(&mut self, namespace: N, body: F) -> &mut Self
    where
        N: Into<String>,
        F: FnOnce(&mut RouterBuilder),
    {
        self.group(GroupAttributes::new().namespace(namespace), body)
    }

    /// Creates a new [Router](./struct.Router.html) instance from the added configuration.
    pub fn build(self) -> crate::Result<Router> {
        if let Some(err) = self.deferred {
            return Err(err);
        }

        let invoker: Arc<dyn Invoker> = match self.invoker {
            Some(invoker) => invoker,
            None => Arc::new(Registry::new()),
        };
        let resolver = Resolver {
            aliases: &self.aliases,
            invoker: invoker.as_ref(),
        };

        let global = resolver.resolve_all(&self.global)?;

        let mut compiled = Vec::with_capacity(self.routes.len());
        for route in self.routes {
            let matcher = PathMatcher::new(route.pattern())?;
            let handler = invoker
                .resolve_handler(route.callback())
                .ok_or_else(|| Error::UnresolvedCallback(format!("{:?}", route.callback())))?;
            let middleware = resolver.resolve_all(route.middleware())?;

            compiled.push(CompiledRoute {
                route,
                matcher,
                handler,
                middleware,
            });
        }

        let table = RouteTable::new(compiled)?;
        debug!(routes = table.len(), global = global.len(), "Router built");

        Ok(Router::new(
            table,
            global,
            self.script_name,
            self.body_limit,
            self.err_handler,
        ))
    }
}

impl Default for RouterBuilder {
    fn default() -> RouterBuilder {
        RouterBuilder {
            routes: Vec::new(),
            scope: GroupAttributes::new(),
            global: Vec::new(),
            aliases: HashMap::new(),
            invoker: None,
            script_name: String::new(),
            body_limit: None,
            err_handler: None,
            deferred: None,
        }
    }
}

impl Debug for RouterBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ routes: {:?}, scope: {:?}, global: {:?}, aliases: {:?} }}",
            self.routes,
            self.scope,
            self.global,
            self.aliases.keys().collect::<Vec<_>>()
        )
    }
}

/// Turns middleware references into instances: aliases first, then the invoker for type references.
struct Resolver<'a> {
    aliases: &'a HashMap<String, MiddlewareRef>,
    invoker: &'a dyn Invoker,
}

impl<'a> Resolver<'a> {
    fn resolve(&self, middleware: &MiddlewareRef) -> crate::Result<Arc<dyn Middleware>> {
        let type_ref = match middleware {
            MiddlewareRef::Direct(m) => return Ok(m.clone()),
            MiddlewareRef::Named(name) => match self.aliases.get(name) {
                Some(MiddlewareRef::Direct(m)) => return Ok(m.clone()),
                Some(MiddlewareRef::Named(target)) => target,
                None => name,
            },
        };

        self.invoker
            .resolve_middleware(type_ref)
            .ok_or_else(|| Error::UnresolvedMiddleware(type_ref.clone()))
    }

    fn resolve_all(&self, middleware: &[MiddlewareRef]) -> crate::Result<Vec<Arc<dyn Middleware>>> {
        middleware.iter().map(|m| self.resolve(m)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HttpRequest, RouteParams};

    fn noop() -> Callback {
        Callback::closure(|_, _| async { Ok(()) })
    }

    fn names(route: &Route) -> Vec<String> {
        route
            .middleware()
            .iter()
            .map(|m| format!("{:?}", m).trim_matches('"').to_string())
            .collect()
    }

    #[test]
    fn should_normalize_patterns() {
        let mut builder = RouterBuilder::new();
        builder.get("users/", noop());
        builder.get("", noop());
        builder.group_at("/api/", |r| {
            r.get("//v1//items/{id}/", noop());
            r.get("/", noop());
        });

        let patterns: Vec<_> = builder.routes.iter().map(|r| r.pattern().to_string()).collect();
        assert_eq!(patterns, vec!["/users", "/", "/api/v1/items/{id}", "/api"]);
    }

    #[test]
    fn should_inherit_and_restore_group_attributes() {
        let mut builder = RouterBuilder::new();
        builder.group(GroupAttributes::new().prefix("admin").middleware("auth"), |r| {
            r.group(GroupAttributes::new().prefix("users").middleware("audit"), |r| {
                r.get("/", noop()).middleware("throttle");
            });
            r.get("/stats", noop());
        });
        builder.get("/about", noop());

        let routes = &builder.routes;
        assert_eq!(routes[0].pattern(), "/admin/users");
        assert_eq!(names(&routes[0]), vec!["auth", "audit", "throttle"]);
        assert_eq!(routes[1].pattern(), "/admin/stats");
        assert_eq!(names(&routes[1]), vec!["auth"]);
        assert_eq!(routes[2].pattern(), "/about");
        assert!(names(&routes[2]).is_empty());
    }

    #[test]
    fn should_qualify_callbacks_with_namespace() {
        let mut builder = RouterBuilder::new();
        builder.namespace("app", |r| {
            r.namespace("admin::", |r| {
                r.get("/", Callback::method("Dashboard", "index"));
            });
            r.post("/login", Callback::function("login"));
        });

        assert_eq!(format!("{:?}", builder.routes[0].callback()), "app::admin::Dashboard@index");
        assert_eq!(format!("{:?}", builder.routes[1].callback()), "app::login");
    }

    #[test]
    fn should_register_method_sets() {
        let mut builder = RouterBuilder::new();
        builder.get("/a", noop());
        builder.any("/b", noop());
        builder.delete("/c", noop());

        assert_eq!(builder.routes[0].methods(), &[Method::GET, Method::HEAD]);
        assert_eq!(builder.routes[1].methods().len(), 7);
        assert_eq!(builder.routes[2].methods(), &[Method::DELETE]);
    }

    #[test]
    fn should_fail_build_on_unresolved_references() {
        let mut builder = RouterBuilder::new();
        builder.get("/", Callback::function("missing"));
        assert!(matches!(builder.build(), Err(Error::UnresolvedCallback(name)) if name == "missing"));

        let mut builder = RouterBuilder::new();
        builder.get("/", noop()).middleware("nope");
        assert!(matches!(builder.build(), Err(Error::UnresolvedMiddleware(name)) if name == "nope"));

        let mut builder = RouterBuilder::new();
        builder.add("/", Vec::new(), noop());
        assert!(matches!(builder.build(), Err(Error::Config(_))));
    }

    #[test]
    fn should_resolve_aliases_and_type_references() {
        let registry = Registry::new()
            .function("app::home", |_: HttpRequest, _: RouteParams| async { Ok("home") })
            .middleware("app::Web", PostSizeLimit::new(10));

        let mut builder = RouterBuilder::new()
            .invoker(registry)
            .alias_ref("web", "app::Web")
            .middleware("web");
        builder.namespace("app", |r| {
            r.get("/", Callback::function("home")).middleware("app::Web");
        });

        let router = builder.build().unwrap();
        assert_eq!(router.routes().len(), 1);
    }
}
