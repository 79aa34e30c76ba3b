use crate::handler::Callback;
use crate::middleware::{IntoMiddlewareList, MiddlewareRef};
use http::Method;
use std::fmt::{self, Debug, Formatter};

pub use self::table::RouteTable;

pub(crate) mod table;

/// What a route does once it is matched: its optional name, its callback and its middleware.
#[derive(Clone)]
pub struct RouteActions {
    pub(crate) name: Option<String>,
    pub(crate) callback: Callback,
    pub(crate) middleware: Vec<MiddlewareRef>,
}

impl RouteActions {
    pub(crate) fn new(callback: Callback, middleware: Vec<MiddlewareRef>) -> RouteActions {
        RouteActions {
            name: None,
            callback,
            middleware,
        }
    }
}

/// Represents a single route.
///
/// A route consists of a normalized path pattern, the http methods it accepts and its actions. It shouldn't be
/// created directly, use the [RouterBuilder](./struct.RouterBuilder.html) methods to register a route.
///
/// The pattern is fixed once the route exists. Its middleware list can only grow, through
/// [`RouteHandle::middleware`](./struct.RouteHandle.html#method.middleware), while routes are being registered.
#[derive(Clone)]
pub struct Route {
    pattern: String,
    methods: Vec<Method>,
    actions: RouteActions,
}

impl Route {
    pub(crate) fn new(pattern: String, methods: Vec<Method>, actions: RouteActions) -> Route {
        Route {
            pattern,
            methods,
            actions,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn name(&self) -> Option<&str> {
        self.actions.name.as_deref()
    }

    pub fn callback(&self) -> &Callback {
        &self.actions.callback
    }

    pub fn middleware(&self) -> &[MiddlewareRef] {
        &self.actions.middleware
    }

    pub(crate) fn is_match_method(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }
}

impl Debug for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ pattern: {:?}, methods: {:?}, name: {:?}, callback: {:?}, middleware: {:?} }}",
            self.pattern, self.methods, self.actions.name, self.actions.callback, self.actions.middleware
        )
    }
}

/// A handle to the route that was just registered, for naming it or attaching more middleware.
///
/// # Examples
///
/// ```
/// use switchyard::{Callback, Router};
///
/// let mut builder = Router::builder();
/// builder
///     .get("/users/{id}", Callback::closure(|_, params| async move { Ok(format!("user {}", &params[0])) }))
///     .name("users.show")
///     .middleware("auth");
/// ```
pub struct RouteHandle<'a> {
    route: &'a mut Route,
}

impl<'a> RouteHandle<'a> {
    pub(crate) fn new(route: &'a mut Route) -> RouteHandle<'a> {
        RouteHandle { route }
    }

    pub fn name<N: Into<String>>(self, name: N) -> Self {
        self.route.actions.name = Some(name.into());
        self
    }

    /// Appends middleware after the group middleware and anything appended before.
    pub fn middleware<M: IntoMiddlewareList>(self, middleware: M) -> Self {
        self.route.actions.middleware.extend(middleware.into_middleware_list());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> Route {
        let callback = Callback::function("app::home");
        Route::new(
            "/".to_string(),
            vec![Method::GET, Method::HEAD],
            RouteActions::new(callback, vec![MiddlewareRef::named("web")]),
        )
    }

    #[test]
    fn should_append_middleware_in_order() {
        let mut route = route();
        RouteHandle::new(&mut route)
            .middleware("auth")
            .middleware(vec!["throttle", "verified"])
            .name("home");

        let names: Vec<_> = route
            .middleware()
            .iter()
            .map(|m| match m {
                MiddlewareRef::Named(n) => n.as_str(),
                MiddlewareRef::Direct(_) => "<direct>",
            })
            .collect();
        assert_eq!(names, vec!["web", "auth", "throttle", "verified"]);
        assert_eq!(route.name(), Some("home"));
    }

    #[test]
    fn should_check_methods() {
        let route = route();
        assert!(route.is_match_method(&Method::HEAD));
        assert!(!route.is_match_method(&Method::POST));
    }
}
