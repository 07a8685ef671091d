// Engine chain with fallback logic

use async_trait::async_trait;

use crate::resolver::errors::EngineError;
use crate::resolver::models::ExtractionRecord;
use crate::resolver::profile::ExtractionProfile;
use crate::resolver::traits::ExtractionEngine;

/// Tries engines in order; moves on only when an engine could not run.
///
/// The whole chain shares one `engine_deadline()`, so falling back never
/// extends the wait past what a single engine is allowed.
pub struct EngineChain {
    engines: Vec<Box<dyn ExtractionEngine>>,
}

impl EngineChain {
    pub fn new() -> Self {
        Self {
            engines: Vec::new(),
        }
    }

    pub fn add_engine(&mut self, engine: Box<dyn ExtractionEngine>) {
        self.engines.push(engine);
    }

    async fn extract_in_order(
        &self,
        url: &str,
        profile: &ExtractionProfile,
    ) -> Result<Option<ExtractionRecord>, EngineError> {
        let mut last_error =
            EngineError::Unavailable("no extraction engines configured".to_string());

        for engine in &self.engines {
            tracing::debug!("[EngineChain] Trying engine: {}", engine.name());

            match engine.extract(url, profile).await {
                Ok(record) => {
                    tracing::debug!("[EngineChain] Success with {}", engine.name());
                    return Ok(record);
                }
                Err(e) if e.allows_fallback() => {
                    tracing::warn!("[EngineChain] {} failed, trying next: {}", engine.name(), e);
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }
}

impl Default for EngineChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionEngine for EngineChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    async fn is_available(&self) -> bool {
        for engine in &self.engines {
            if engine.is_available().await {
                return true;
            }
        }
        false
    }

    async fn extract(
        &self,
        url: &str,
        profile: &ExtractionProfile,
    ) -> Result<Option<ExtractionRecord>, EngineError> {
        let deadline = profile.engine_deadline();
        match tokio::time::timeout(deadline, self.extract_in_order(url, profile)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("[EngineChain] Deadline of {:?} spent for {}", deadline, url);
                Err(EngineError::TimedOut(deadline))
            }
        }
    }
}
