use super::RouteParams;

/// Routing information attached to a request's extensions once a route has been selected.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    pub(crate) path: String,
    pub(crate) route_name: Option<String>,
    pub(crate) params: RouteParams,
}

impl RequestMeta {
    pub(crate) fn new(path: String, route_name: Option<String>, params: RouteParams) -> RequestMeta {
        RequestMeta {
            path,
            route_name,
            params,
        }
    }

    /// The normalized, application relative path the route was matched against.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn route_name(&self) -> Option<&str> {
        self.route_name.as_deref()
    }

    pub fn params(&self) -> &RouteParams {
        &self.params
    }
}
