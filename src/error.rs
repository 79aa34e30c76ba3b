use http::{Method, StatusCode};
use thiserror::Error;

/// The error type for everything the router can fail at: building the route table, dispatching a request,
/// generating a url, or running a middleware/handler.
///
/// Every variant maps onto an HTTP status code through [`Error::status_code`], which is what the
/// [`RequestService`](./struct.RequestService.html) uses to render a failure.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No route matches the path: {path}")]
    RouteNotFound { path: String },

    #[error("Method {method} is not allowed for the path: {path}")]
    MethodNotAllowed { method: Method, path: String },

    #[error("Route name [{0}] does not exist")]
    NamedRouteMissing(String),

    #[error("Route expects {expected} parameter(s) but {given} were given")]
    ParameterCountMismatch { expected: usize, given: usize },

    #[error("Could not create an exact match regex for the route path {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("No handler is registered for the callback: {0}")]
    UnresolvedCallback(String),

    #[error("No middleware is registered for: {0}")]
    UnresolvedMiddleware(String),

    #[error("Couldn't percent decode request path: {0}")]
    InvalidPath(String),

    #[error("{status}")]
    Status { status: StatusCode, reason: Option<String> },

    #[error("Couldn't read the request body: {0}")]
    Body(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Handler error: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Invalid router configuration: {0}")]
    Config(String),
}

impl Error {
    /// Creates an error which carries just an HTTP status, the way a middleware rejects a request.
    pub fn status(status: StatusCode) -> Error {
        Error::Status { status, reason: None }
    }

    /// Creates a status error with a custom reason phrase.
    pub fn status_with_reason<R: Into<String>>(status: StatusCode, reason: R) -> Error {
        Error::Status {
            status,
            reason: Some(reason.into()),
        }
    }

    /// Wraps any error raised by a route handler or a middleware.
    pub fn handler<E>(err: E) -> Error
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Handler(err.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            Error::Status { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The reason phrase to render: the custom one if present, otherwise the canonical one for the status.
    pub fn reason(&self) -> &str {
        match self {
            Error::Status {
                reason: Some(reason), ..
            } => reason.as_str(),
            _ => self.status_code().canonical_reason().unwrap_or("Unknown Error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_routing_failures_to_status_codes() {
        let not_found = Error::RouteNotFound { path: "/x".into() };
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let not_allowed = Error::MethodNotAllowed {
            method: Method::DELETE,
            path: "/x".into(),
        };
        assert_eq!(not_allowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(not_allowed.reason(), "Method Not Allowed");

        let missing = Error::NamedRouteMissing("users.show".into());
        assert_eq!(missing.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn should_prefer_custom_reason() {
        let err = Error::status_with_reason(StatusCode::from_u16(419).unwrap(), "Page Expired");
        assert_eq!(err.status_code().as_u16(), 419);
        assert_eq!(err.reason(), "Page Expired");
        assert_eq!(Error::status(StatusCode::PAYLOAD_TOO_LARGE).reason(), "Payload Too Large");
    }
}
