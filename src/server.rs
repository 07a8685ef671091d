use crate::resolver::{ResolutionRequest, ResolutionResponse, Resolver};
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub const SERVICE_NAME: &str = "video-resolver";

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub resolver: Resolver,
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    // Any origin may call the resolver (browser players, mobile webviews)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/resolve", post(resolve_video))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Video URL Resolver API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "online",
        "endpoints": {
            "resolve": "POST /resolve - Resolve a page URL to a direct stream URL",
            "health": "GET /health - Service health"
        }
    }))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Extraction and unexpected failures answer 200 with an error envelope;
/// records without a usable stream answer 400.
async fn resolve_video(
    State(ctx): State<AppContext>,
    Json(request): Json<ResolutionRequest>,
) -> (StatusCode, Json<ResolutionResponse>) {
    match ctx.resolver.try_resolve(&request).await {
        Ok(data) => (StatusCode::OK, Json(ResolutionResponse::Success { data })),
        Err(e) => {
            let status = if e.is_insufficient_record() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::OK
            };
            (status, Json(ResolutionResponse::from(Err(e))))
        }
    }
}

/// Start the HTTP server
pub async fn start_server(host: &str, port: u16, ctx: AppContext) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid server address")?;

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
