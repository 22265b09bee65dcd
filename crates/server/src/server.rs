use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use std::sync::Arc;

use crate::{Ocr, expenses, health};
use engine::Engine;

const RECEIPT_BODY_LIMIT: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub ocr: Arc<dyn Ocr>,
    pub app_name: Arc<str>,
}

/// Settings the HTTP layer needs from the application configuration.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    pub app_name: String,
    /// Origins allowed by CORS. `"*"` allows every origin.
    pub allowed_hosts: Vec<String>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            app_name: "ExpenseBuddy".to_string(),
            allowed_hosts: vec!["*".to_string()],
        }
    }
}

fn cors(allowed_hosts: &[String]) -> CorsLayer {
    if allowed_hosts.iter().any(|host| host == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_hosts
        .iter()
        .filter_map(|host| match HeaderValue::from_str(host) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid allowed host {host:?}");
                None
            }
        })
        .collect();

    // Credentials cannot be combined with wildcards, so mirror the request.
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub fn router(engine: Engine, ocr: Arc<dyn Ocr>, options: &ServerOptions) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        ocr,
        app_name: options.app_name.as_str().into(),
    };

    Router::new()
        .route("/health", get(health::get))
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/expenses/upload-receipt",
            post(expenses::upload_receipt).layer(DefaultBodyLimit::max(RECEIPT_BODY_LIMIT)),
        )
        .route(
            "/expenses/{id}",
            get(expenses::get).delete(expenses::delete),
        )
        .layer(cors(&options.allowed_hosts))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    ocr: Arc<dyn Ocr>,
    options: ServerOptions,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("{} listening on {}", options.app_name, addr);

    axum::serve(listener, router(engine, ocr, &options)).await
}
