use crate::helpers::{self, join_path, split_script_name};
use crate::middleware::{Middleware, MiddlewareChain};
use crate::route::{Route, RouteTable};
use crate::types::{empty_response, HttpRequest, HttpResponse, RequestMeta, RouteParams};
use crate::Error;
use bytes::Bytes;
use http_body_util::Full;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use tracing::{debug, error, warn};

pub use self::builder::RouterBuilder;
pub use self::group::{GroupAttributes, GroupDescriptor, OneOrMany};

mod builder;
mod endpoint;
mod group;

pub(crate) type ErrHandler = Box<dyn Fn(Error) -> HttpResponse + Send + Sync + 'static>;

/// Represents a modular, lightweight and mountable router type.
///
/// A router is built once with a [RouterBuilder](./struct.RouterBuilder.html) and is read-only afterwards, so it
/// can be shared across connections behind an `Arc`. Every call to [`dispatch`](#method.dispatch) assembles its
/// own middleware chain.
///
/// # Examples
///
/// ```
/// use switchyard::{Callback, Router};
///
/// let mut builder = Router::builder();
/// builder.get("/", Callback::closure(|_, _| async { Ok("home") }));
/// builder
///     .get("/users/{id}", Callback::closure(|_, params| async move { Ok(format!("user {}", &params[0])) }))
///     .name("users.show");
///
/// let router = builder.build().unwrap();
/// assert_eq!(router.url_for("users.show", &["42"]).unwrap(), "/users/42");
/// ```
pub struct Router {
    table: RouteTable,
    global: Vec<Arc<dyn Middleware>>,
    script_name: String,
    base_path: String,
    body_limit: Option<u64>,
    err_handler: Option<ErrHandler>,
}

impl Router {
    /// Return a [RouterBuilder](./struct.RouterBuilder.html) instance to build a `Router`.
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub(crate) fn new(
        table: RouteTable,
        global: Vec<Arc<dyn Middleware>>,
        script_name: String,
        body_limit: Option<u64>,
        err_handler: Option<ErrHandler>,
    ) -> Router {
        let base_path = join_path([split_script_name(&script_name).0]);
        Router {
            table,
            global,
            script_name,
            base_path,
            body_limit,
            err_handler,
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    /// The directory the application is served from, `/` at the document root.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// The largest request body, in bytes, the service layer reads before dispatching.
    pub fn body_limit(&self) -> Option<u64> {
        self.body_limit
    }

    /// The application relative path of a request: script directory, script file and query string removed.
    pub fn current_path(&self, req: &HttpRequest) -> crate::Result<String> {
        let uri = req.uri().path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        helpers::current_path(&self.script_name, uri)
    }

    /// Matches the request against the registered routes and runs the resulting middleware chain.
    ///
    /// The first route, in registration order, whose pattern matches the path and whose methods include the
    /// request method is selected. Fails with [`Error::RouteNotFound`](./enum.Error.html) when no pattern matches
    /// and with [`Error::MethodNotAllowed`](./enum.Error.html) when patterns match but none accepts the method.
    pub async fn dispatch(&self, mut req: HttpRequest) -> crate::Result<HttpResponse> {
        let path = self.current_path(&req)?;

        let mut found = false;
        let mut selected = None;
        for compiled in self.table.matching(&path) {
            found = true;
            if compiled.route.is_match_method(req.method()) {
                selected = Some(compiled);
                break;
            }
        }

        let Some(compiled) = selected else {
            if found {
                warn!(method = %req.method(), path = %path, "Method not allowed");
                return Err(Error::MethodNotAllowed {
                    method: req.method().clone(),
                    path,
                });
            }
            warn!(path = %path, "No route found");
            return Err(Error::RouteNotFound { path });
        };

        let params = RouteParams::from(compiled.matcher.captures(&path).unwrap_or_default());
        debug!(
            method = %req.method(),
            path = %path,
            pattern = compiled.route.pattern(),
            params = ?params,
            "Route matched"
        );

        let route_name = compiled.route.name().map(str::to_string);
        req.extensions_mut()
            .insert(RequestMeta::new(path, route_name, params.clone()));

        let mut chain = MiddlewareChain::with_capacity(self.global.len() + compiled.middleware.len() + 1);
        chain.extend(self.global.iter().cloned());
        chain.extend(compiled.middleware.iter().cloned());
        chain.push(Arc::new(endpoint::RouteEndpoint::new(compiled.handler.clone(), params)));

        chain.run(req, empty_response()).await
    }

    /// Generates the url of a named route, substituting `values` for its placeholders in order.
    ///
    /// Values are ignored for a route without placeholders. Otherwise the number of values must equal the number of
    /// placeholders.
    pub fn url_for<V: AsRef<str>>(&self, name: &str, values: &[V]) -> crate::Result<String> {
        let compiled = self.table.compiled_by_name(name)?;

        let path = if compiled.matcher.param_count() == 0 {
            compiled.route.pattern().to_string()
        } else {
            compiled.matcher.substitute(values)?
        };

        Ok(join_path([self.base_path.as_str(), path.as_str()]))
    }

    /// Turns an error escaping [`dispatch`](#method.dispatch) into a response using the registered error handler,
    /// or a plain status response by default.
    pub fn handle_error(&self, err: Error) -> HttpResponse {
        match self.err_handler {
            Some(ref handler) => handler(err),
            None => default_error_response(err),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.table.iter()
    }
}

pub(crate) fn default_error_response(err: Error) -> HttpResponse {
    let status = err.status_code();
    if status.is_server_error() {
        error!("{}", err);
    } else {
        debug!("{}", err);
    }

    let mut res = http::Response::new(Full::new(Bytes::from(format!("{} {}", status.as_u16(), err.reason()))));
    *res.status_mut() = status;
    res
}

impl Debug for Router {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ table: {:?}, global: {}, script_name: {:?} }}",
            self.table,
            self.global.len(),
            self.script_name
        )
    }
}
