//! Extension traits for reading routing information out of a request.

use crate::types::{HttpRequest, RequestMeta, RouteParams};
use std::net::SocketAddr;

/// Gives middleware and handlers access to what the router decided about the current request.
///
/// # Examples
///
/// ```
/// use switchyard::ext::RequestExt;
/// use switchyard::{HttpRequest, HttpResponse, Next};
///
/// let audit = |req: HttpRequest, res: HttpResponse, next: Next| {
///     println!("{:?} -> {:?}", req.current_path(), req.route_name());
///     next.run(req, res)
/// };
/// # let _ = switchyard::MiddlewareRef::direct(audit);
/// ```
pub trait RequestExt {
    /// The normalized path the router matched, e.g. `/users/42`.
    fn current_path(&self) -> Option<&str>;

    /// The name of the matched route, if it has one.
    fn route_name(&self) -> Option<&str>;

    /// The captured placeholder values of the matched route.
    fn route_params(&self) -> Option<&RouteParams>;

    /// A single captured value by its position in the pattern.
    fn param(&self, idx: usize) -> Option<&str>;

    /// The peer address of the connection, when served through a [`RouterService`](../struct.RouterService.html).
    fn remote_addr(&self) -> Option<SocketAddr>;
}

impl RequestExt for HttpRequest {
    fn current_path(&self) -> Option<&str> {
        self.extensions().get::<RequestMeta>().map(RequestMeta::path)
    }

    fn route_name(&self) -> Option<&str> {
        self.extensions().get::<RequestMeta>().and_then(RequestMeta::route_name)
    }

    fn route_params(&self) -> Option<&RouteParams> {
        self.extensions().get::<RequestMeta>().map(RequestMeta::params)
    }

    fn param(&self, idx: usize) -> Option<&str> {
        self.route_params().and_then(|params| params.get(idx))
    }

    fn remote_addr(&self) -> Option<SocketAddr> {
        self.extensions().get::<SocketAddr>().copied()
    }
}
