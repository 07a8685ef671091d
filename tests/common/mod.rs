//! Shared helpers: a scripted extraction engine and router construction.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use video_resolver_lib::resolver::{
    EngineError, ExtractionEngine, ExtractionProfile, ExtractionRecord, Resolver,
};
use video_resolver_lib::server::{create_router, AppContext};

/// Engine that answers every URL with the same scripted outcome
pub struct ScriptedEngine {
    outcome: Result<Option<serde_json::Value>, EngineError>,
}

impl ScriptedEngine {
    pub fn record(value: serde_json::Value) -> Self {
        Self {
            outcome: Ok(Some(value)),
        }
    }

    pub fn empty() -> Self {
        Self { outcome: Ok(None) }
    }

    pub fn failing(error: EngineError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

#[async_trait]
impl ExtractionEngine for ScriptedEngine {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn extract(
        &self,
        _url: &str,
        _profile: &ExtractionProfile,
    ) -> Result<Option<ExtractionRecord>, EngineError> {
        match &self.outcome {
            Ok(Some(value)) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| EngineError::Malformed(e.to_string())),
            Ok(None) => Ok(None),
            Err(e) => Err(e.clone()),
        }
    }
}

pub fn router_with(engine: ScriptedEngine) -> axum::Router {
    let ctx = AppContext {
        resolver: Resolver::with_default_profile(Arc::new(engine)),
    };
    create_router(ctx)
}

/// Serve `engine` on a random local port
pub async fn spawn_server(engine: ScriptedEngine) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router_with(engine);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}
