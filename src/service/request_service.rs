use crate::router::Router;
use crate::types::HttpResponse;
use crate::Error;
use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http::{HeaderMap, StatusCode};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::{service::Service, Request};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, trace};

/// Serves the requests of a single connection.
///
/// The request body is collected into memory, the peer address is stored in the request extensions, and the request
/// is dispatched. Errors escaping the router are rendered by its error handler, so the service itself never fails.
///
/// When the router has a [`body_limit`](./struct.RouterBuilder.html#method.body_limit), a declared
/// `Content-Length` above it is rejected before reading, and a body streaming past it is cut off with
/// `413 Payload Too Large`.
#[derive(Debug)]
pub struct RequestService {
    pub(crate) router: Arc<Router>,
    pub(crate) remote_addr: SocketAddr,
}

impl<T> Service<Request<T>> for RequestService
where
    T: Body + Send + 'static,
    T::Data: Send,
    T::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Response = HttpResponse;
    type Error = Infallible;
    #[allow(clippy::type_complexity)]
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

    fn call(&self, req: Request<T>) -> Self::Future {
        let router = self.router.clone();
        let remote_addr = self.remote_addr;

        let fut = async move {
            trace!(%remote_addr, method = %req.method(), uri = %req.uri(), "Incoming request");

            let (mut parts, body) = req.into_parts();
            parts.extensions.insert(remote_addr);

            let body = read_body(&parts.headers, body, router.body_limit()).await;
            let result = match body {
                Ok(body) => router.dispatch(Request::from_parts(parts, body)).await,
                Err(err) => Err(err),
            };

            Ok(result.unwrap_or_else(|err| router.handle_error(err)))
        };

        Box::pin(fut)
    }
}

async fn read_body<T>(headers: &HeaderMap, body: T, limit: Option<u64>) -> crate::Result<Bytes>
where
    T: Body,
    T::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let Some(limit) = limit else {
        return match body.collect().await {
            Ok(collected) => Ok(collected.to_bytes()),
            Err(err) => Err(Error::Body(err.into())),
        };
    };

    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    if declared.is_some_and(|len| len > limit) {
        debug!(limit, declared, "Declared request body exceeds the body limit");
        return Err(Error::status(StatusCode::PAYLOAD_TOO_LARGE));
    }

    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.is::<LengthLimitError>() => {
            debug!(limit, "Streamed request body exceeds the body limit");
            Err(Error::status(StatusCode::PAYLOAD_TOO_LARGE))
        }
        Err(err) => Err(Error::Body(err)),
    }
}

#[derive(Debug)]
pub struct RequestServiceBuilder {
    router: Arc<Router>,
}

impl RequestServiceBuilder {
    pub fn new(router: Router) -> RequestServiceBuilder {
        RequestServiceBuilder {
            router: Arc::new(router),
        }
    }

    pub fn build(&self, remote_addr: SocketAddr) -> RequestService {
        RequestService {
            router: self.router.clone(),
            remote_addr,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ext::RequestExt;
    use crate::{Callback, Error, RequestServiceBuilder, Router};
    use bytes::Bytes;
    use futures::future::poll_fn;
    use http::{Method, StatusCode};
    use http_body_util::{BodyExt, Full, StreamBody};
    use hyper::body::Frame;
    use hyper::service::Service;
    use hyper::Request;
    use std::convert::Infallible;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::str::FromStr;
    use std::task::Poll;

    async fn body_text(res: crate::HttpResponse) -> String {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn should_route_request() {
        const RESPONSE_TEXT: &str = "Hello world!";
        let remote_addr = SocketAddr::from_str("10.0.0.7:8080").unwrap();

        let mut builder = Router::builder();
        builder.post(
            "/echo",
            Callback::closure(|req, _| async move {
                let body = String::from_utf8_lossy(req.body()).to_string();
                Ok(format!("{} {} {:?}", RESPONSE_TEXT, body, req.remote_addr()))
            }),
        );
        let router = builder.build().unwrap();

        let req = Request::builder()
            .method(Method::POST)
            .uri("/echo")
            .body(Full::new(Bytes::from("ping")))
            .unwrap();

        let service = RequestServiceBuilder::new(router).build(remote_addr);

        poll_fn(|_| -> Poll<Result<(), Error>> { Poll::Ready(Ok(())) })
            .await
            .expect("request service is not ready");

        let res = service.call(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, "Hello world! ping Some(10.0.0.7:8080)");
    }

    #[tokio::test]
    async fn should_render_errors_with_err_handler() {
        let mut builder = Router::builder().err_handler(|err: Error| {
            let mut res = http::Response::new(Full::new(Bytes::from(format!("oops: {}", err.status_code()))));
            *res.status_mut() = err.status_code();
            res
        });
        builder.get("/", Callback::closure(|_, _| async { Ok("home") }));
        let service = RequestServiceBuilder::new(builder.build().unwrap()).build(SocketAddr::from(([127, 0, 0, 1], 1)));

        let req = Request::builder().uri("/missing").body(Full::new(Bytes::new())).unwrap();
        let res = service.call(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(res).await, "oops: 404 Not Found");
    }

    fn limited_router(max_bytes: u64, hits: Arc<AtomicUsize>) -> Router {
        let mut builder = Router::builder().body_limit(max_bytes);
        builder.post(
            "/upload",
            Callback::closure(move |req, _| {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    Ok(format!("{} bytes", req.body().len()))
                }
            }),
        );
        builder.build().unwrap()
    }

    #[tokio::test]
    async fn should_cut_off_streamed_bodies_past_the_limit() {
        let hits = Arc::new(AtomicUsize::new(0));
        let service =
            RequestServiceBuilder::new(limited_router(8, hits.clone())).build(SocketAddr::from(([127, 0, 0, 1], 1)));

        let chunks = (0..4).map(|_| Ok::<_, Infallible>(Frame::data(Bytes::from(vec![b'x'; 1024]))));
        let req = Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .body(StreamBody::new(futures::stream::iter(chunks.collect::<Vec<_>>())))
            .unwrap();

        let res = service.call(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_text(res).await, "413 Payload Too Large");
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn should_reject_declared_length_past_the_limit() {
        let hits = Arc::new(AtomicUsize::new(0));
        let service =
            RequestServiceBuilder::new(limited_router(8, hits.clone())).build(SocketAddr::from(([127, 0, 0, 1], 1)));

        let req = Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .header("content-length", "16")
            .body(Full::new(Bytes::from(vec![b'x'; 16])))
            .unwrap();
        let res = service.call(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let req = Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .body(Full::new(Bytes::from("12345678")))
            .unwrap();
        let res = service.call(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_text(res).await, "8 bytes");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
