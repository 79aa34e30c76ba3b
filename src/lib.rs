//! `switchyard` is an ordered HTTP router for [hyper](https://hyper.rs/) with grouped route registration,
//! continuation-style middleware chains and named-route URL generation.
//!
//! Core features:
//!
//! - Routes are matched in registration order, the first route that matches the path and accepts the method wins
//!
//! - Fast route matching using [`RegexSet`](https://docs.rs/regex/1/regex/struct.RegexSet.html)
//!
//! - Groups pass a path prefix, a callback namespace and middleware down to every route registered inside them
//!
//! - Middleware receive the request, the response built so far and a `Next` continuation they may or may not run
//!
//! - Symbolic callbacks and middleware type references are resolved through a pluggable
//!   [`Invoker`](./trait.Invoker.html)
//!
//! - Named routes can be turned back into urls
//!
//! ## Basic Example
//!
//! ```no_run
//! use hyper::service::Service;
//! use hyper_util::rt::{TokioExecutor, TokioIo};
//! use hyper_util::server::conn::auto::Builder;
//! // Import the prelude traits.
//! use switchyard::prelude::*;
//! use switchyard::{Callback, HttpRequest, HttpResponse, Next, Router, RouterService};
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! // A middleware which logs an http request.
//! async fn logger(req: HttpRequest, res: HttpResponse, next: Next) -> switchyard::Result<HttpResponse> {
//!     println!("{:?} {} {}", req.remote_addr(), req.method(), req.uri().path());
//!     next.run(req, res).await
//! }
//!
//! fn router() -> Router {
//!     let mut builder = Router::builder().middleware(switchyard::MiddlewareRef::direct(logger));
//!
//!     builder.get("/", Callback::closure(|_, _| async { Ok("Home page") }));
//!     builder
//!         .get("/users/{id}", Callback::closure(|_, params| async move { Ok(format!("Hello {}", &params[0])) }))
//!         .name("users.show");
//!
//!     builder.build().unwrap()
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     // Create a Service from the router above to handle incoming requests.
//!     let service = Arc::new(RouterService::new(router()));
//!
//!     // The address on which the server will be listening.
//!     let addr = SocketAddr::from(([127, 0, 0, 1], 3001));
//!     let listener = TcpListener::bind(addr).await.unwrap();
//!     println!("App is running on: {}", addr);
//!
//!     loop {
//!         let (stream, _) = listener.accept().await.unwrap();
//!         let service = service.clone();
//!
//!         tokio::spawn(async move {
//!             let request_service = service.call(&stream).await.unwrap();
//!             let io = TokioIo::new(stream);
//!             let builder = Builder::new(TokioExecutor::new());
//!             if let Err(err) = builder.serve_connection(io, request_service).await {
//!                 eprintln!("Error serving connection: {:?}", err);
//!             }
//!         });
//!     }
//! }
//! ```
//!
//! ## Routing
//!
//! ### Route Handlers
//!
//! A handler receives the request and the captured parameters and returns anything convertible into a
//! [`Reply`](./enum.Reply.html): a full response, which is used as is, or text, which is appended to the body of
//! the response that reached the route.
//!
//! ```
//! use bytes::Bytes;
//! use http_body_util::Full;
//! use switchyard::{Callback, HttpRequest, HttpResponse, RouteParams, Router};
//!
//! async fn created(_: HttpRequest, _: RouteParams) -> switchyard::Result<HttpResponse> {
//!     let mut res = http::Response::new(Full::new(Bytes::from("created")));
//!     *res.status_mut() = http::StatusCode::CREATED;
//!     Ok(res)
//! }
//!
//! # fn run() -> Router {
//! let mut builder = Router::builder();
//! builder.get("/", Callback::closure(|_, _| async { Ok("Home page") }));
//! builder.post("/users", Callback::closure(created));
//! let router = builder.build().unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! Handlers can also be referenced by name, `Callback::function("health")` or
//! `Callback::method("UserController", "show")`, and are then looked up in the [`Invoker`](./trait.Invoker.html)
//! when the router is built. A [`Registry`](./struct.Registry.html) is the simplest invoker.
//!
//! ### Route Paths
//!
//! Patterns are normalized when registered: slashes are trimmed and collapsed, so `users/`, `/users` and
//! `//users` are the same route. A placeholder `{name}` matches one or more ASCII letters, digits, underscores
//! or dashes. Every other character matches literally.
//!
//! `get` registers `GET` and `HEAD`, `any` registers every common method, and `add` takes an explicit list.
//!
//! ### Route Parameters
//!
//! Captured values are positional, in the order the placeholders appear in the pattern. They are passed to the
//! handler as [`RouteParams`](./struct.RouteParams.html) and stay available to middleware through
//! [`RequestExt`](./ext/trait.RequestExt.html).
//!
//! ```
//! use switchyard::{Callback, Router};
//!
//! # fn run() -> Router {
//! let mut builder = Router::builder();
//! builder.get(
//!     "/books/{book}/pages/{page}",
//!     Callback::closure(|_, params| async move { Ok(format!("book {} page {}", &params[0], &params[1])) }),
//! );
//! let router = builder.build().unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ### Groups
//!
//! A group opens a scope whose prefix, namespace and middleware apply to every route registered in its body.
//! Groups nest, and a group never affects routes registered outside of it. Route files are plain functions.
//!
//! ```
//! use switchyard::{Callback, GroupAttributes, Router, RouterBuilder};
//!
//! fn admin_routes(r: &mut RouterBuilder) {
//!     r.get("/", Callback::closure(|_, _| async { Ok("dashboard") }));
//!     r.group_at("/users", |r| {
//!         r.get("/{id}", Callback::closure(|_, params| async move { Ok(params[0].to_string()) }));
//!     });
//! }
//!
//! # fn run() -> Router {
//! let mut builder = Router::builder().alias("auth", |req, res, next: switchyard::Next| next.run(req, res));
//! builder.group(GroupAttributes::new().prefix("/admin").middleware("auth"), admin_routes);
//! let router = builder.build().unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! ### Named Routes
//!
//! ```
//! use switchyard::{Callback, Router};
//!
//! let mut builder = Router::builder().script_name("/blog/index.php");
//! builder.get("/posts/{slug}", Callback::closure(|_, _| async { Ok("") })).name("posts.show");
//! let router = builder.build().unwrap();
//!
//! assert_eq!(router.url_for("posts.show", &["hello-world"]).unwrap(), "/blog/posts/hello-world");
//! assert!(router.url_for("posts.show", &[] as &[&str]).is_err());
//! ```
//!
//! ## Middleware
//!
//! Every dispatched request runs through a fresh chain made of the global middleware, then the route middleware
//! (group middleware first), then the route handler. A middleware calls `next.run(req, res)` to continue, and can
//! change the request before and the response after that call. Returning without calling it ends the chain.
//!
//! ```
//! use http::StatusCode;
//! use switchyard::{Callback, Error, HttpRequest, HttpResponse, Next, Router};
//!
//! async fn require_token(req: HttpRequest, res: HttpResponse, next: Next) -> switchyard::Result<HttpResponse> {
//!     if !req.headers().contains_key("x-token") {
//!         return Err(Error::status(StatusCode::UNAUTHORIZED));
//!     }
//!     let mut res = next.run(req, res).await?;
//!     res.headers_mut().insert("x-checked", "1".parse().unwrap());
//!     Ok(res)
//! }
//!
//! # fn run() -> Router {
//! let mut builder = Router::builder().alias("token", require_token);
//! builder.get("/secret", Callback::closure(|_, _| async { Ok("42") })).middleware("token");
//! let router = builder.build().unwrap();
//! # router
//! # }
//! # run();
//! ```
//!
//! Middleware is referenced directly with [`MiddlewareRef::direct`](./enum.MiddlewareRef.html#method.direct), by an
//! alias registered on the builder, or by a type reference the invoker can instantiate.
//!
//! ### The built-in Middleware
//!
//! [`PostSizeLimit`](./struct.PostSizeLimit.html) rejects requests whose body exceeds a limit with
//! `413 Payload Too Large`. It is installed globally when the configuration sets `max_body_size`.
//!
//! Middleware runs on a body that is already collected. To bound reading itself, set
//! [`body_limit`](./struct.RouterBuilder.html#method.body_limit): the service then refuses a larger
//! `Content-Length` and stops reading a chunked body once it passes the limit.
//!
//! ## Configuration
//!
//! [`RouterConfig`](./struct.RouterConfig.html) reads the script name, middleware aliases, global middleware and
//! the body size limit from TOML.
//!
//! ## Error Handling
//!
//! Routing failures, middleware rejections and handler errors all surface as [`Error`](./enum.Error.html) from
//! [`Router::dispatch`](./struct.Router.html#method.dispatch). The service layer turns them into responses with the
//! handler registered through [`err_handler`](./struct.RouterBuilder.html#method.err_handler), or renders the status
//! code and reason phrase by default.
//!
//! ```
//! use bytes::Bytes;
//! use http_body_util::Full;
//! use switchyard::{Error, HttpResponse, Router};
//!
//! fn error_handler(err: Error) -> HttpResponse {
//!     let mut res = http::Response::new(Full::new(Bytes::from(format!("Something went wrong: {}", err))));
//!     *res.status_mut() = err.status_code();
//!     res
//! }
//!
//! # fn run() -> Router {
//! let router = Router::builder().err_handler(error_handler).build().unwrap();
//! # router
//! # }
//! # run();
//! ```

pub use self::config::{BodySize, RouterConfig};
pub use self::error::Error;
pub use self::handler::{Callback, Handler, Reply};
pub use self::invoker::{Invoker, Registry};
pub use self::matcher::PathMatcher;
pub use self::middleware::{IntoMiddlewareList, Middleware, MiddlewareChain, MiddlewareRef, Next, PostSizeLimit};
pub use self::route::{Route, RouteActions, RouteHandle, RouteTable};
pub use self::router::{GroupAttributes, GroupDescriptor, OneOrMany, Router, RouterBuilder};
pub use self::service::{RequestService, RequestServiceBuilder, RouterService};
pub use self::types::{empty_response, BoxFuture, HttpRequest, HttpResponse, RequestMeta, RouteParams};

mod config;
mod error;
pub mod ext;
mod handler;
mod helpers;
mod invoker;
mod matcher;
mod middleware;
pub mod prelude;
mod route;
mod router;
mod service;
mod types;

/// A Result type often returned from methods that can have `switchyard` errors.
pub type Result<T> = std::result::Result<T, Error>;
