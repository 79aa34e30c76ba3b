use hyper::service::Service;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
// Import the prelude traits.
use switchyard::prelude::*;
use switchyard::{
    Callback, GroupAttributes, HttpRequest, HttpResponse, Next, Registry, RouteParams, Router, RouterConfig,
    RouterService,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
script_name = "/index.php"
max_body_size = "1M"

[aliases]
web = "app::middleware::RequestLog"
"#;

// A middleware which logs an http request and its outcome.
async fn request_log(req: HttpRequest, res: HttpResponse, next: Next) -> switchyard::Result<HttpResponse> {
    let method = req.method().clone();
    let path = req.current_path().unwrap_or("/").to_string();
    let remote_addr = req.remote_addr();

    let res = next.run(req, res).await?;
    info!(?remote_addr, %method, %path, status = %res.status(), "Handled request");
    Ok(res)
}

async fn home(_: HttpRequest, _: RouteParams) -> switchyard::Result<&'static str> {
    Ok("Home page")
}

async fn show_user(_: HttpRequest, params: RouteParams) -> switchyard::Result<String> {
    Ok(format!("Hello {}", &params[0]))
}

fn router() -> switchyard::Result<Router> {
    let registry = Registry::new()
        .function("app::home", home)
        .method("app::UserController", "show", show_user)
        .middleware_fn("app::middleware::RequestLog", request_log);

    let config = RouterConfig::from_toml_str(CONFIG)?;
    let mut builder = Router::builder().invoker(registry).with_config(&config)?;

    builder.group(GroupAttributes::new().namespace("app").middleware("web"), |r| {
        r.get("/", Callback::function("home")).name("home");
        r.get("/users/{id}", Callback::method("UserController", "show"))
            .name("users.show");
    });

    builder.build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let router = router()?;
    info!(url = %router.url_for("users.show", &["42"])?, "Sample url");

    // Create a Service from the router above to handle incoming requests.
    let service = Arc::new(RouterService::new(router));

    // The address on which the server will be listening.
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "App is running");

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                let service = Arc::clone(&service);

                tokio::task::spawn(async move {
                    let request_service = service.call(&stream).await.unwrap_or_else(|never| match never {});
                    let io = TokioIo::new(stream);
                    let builder = Builder::new(TokioExecutor::new());
                    if let Err(err) = builder.serve_connection(io, request_service).await {
                        error!("Error serving connection: {:?}", err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
            }
        }
    }
}
