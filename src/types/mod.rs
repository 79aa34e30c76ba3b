use bytes::Bytes;
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;

pub use self::request_meta::RequestMeta;
pub use self::route_params::RouteParams;

mod request_meta;
mod route_params;

/// The request type flowing through the middleware chain. The body is collected before dispatch.
pub type HttpRequest = http::Request<Bytes>;

/// The response type produced by route handlers and middleware.
pub type HttpResponse = http::Response<Full<Bytes>>;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// An empty `200 OK` response, the starting point of every chain.
pub fn empty_response() -> HttpResponse {
    http::Response::new(Full::new(Bytes::new()))
}
