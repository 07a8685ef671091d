// Resolver - drives the engine, selects the stream, classifies failures

use std::sync::Arc;

use super::errors::{EngineError, ResolveError};
use super::models::{ResolutionRequest, ResolutionResponse, ResolvedVideo};
use super::profile::ExtractionProfile;
use super::selector::StreamSelector;
use super::traits::ExtractionEngine;

/// Stateless orchestrator; cheap to clone and share between requests
#[derive(Clone)]
pub struct Resolver {
    engine: Arc<dyn ExtractionEngine>,
    profile: Arc<ExtractionProfile>,
}

impl Resolver {
    pub fn new(engine: Arc<dyn ExtractionEngine>, profile: Arc<ExtractionProfile>) -> Self {
        Self { engine, profile }
    }

    /// Resolver with the default extraction profile
    pub fn with_default_profile(engine: Arc<dyn ExtractionEngine>) -> Self {
        Self::new(engine, Arc::new(ExtractionProfile::build()))
    }

    /// Resolve into the response envelope. Never fails.
    pub async fn resolve(&self, request: &ResolutionRequest) -> ResolutionResponse {
        ResolutionResponse::from(self.try_resolve(request).await)
    }

    /// Resolve, keeping the failure kind so the transport can pick a status.
    pub async fn try_resolve(
        &self,
        request: &ResolutionRequest,
    ) -> Result<ResolvedVideo, ResolveError> {
        let url = request.url.trim();
        tracing::info!("Resolving URL: {}", url);

        if url.is_empty() {
            tracing::warn!("Rejected empty URL");
            return Err(ResolveError::ExtractionFailure(
                "URL must not be empty".to_string(),
            ));
        }

        let record = match self.engine.extract(url, &self.profile).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::warn!("{} returned no record for {}", self.engine.name(), url);
                return Err(ResolveError::EmptyRecord);
            }
            Err(e) => return Err(self.classify(url, e)),
        };

        let Some(stream_url) = StreamSelector::select(&record) else {
            tracing::warn!(
                "No resolvable stream for {} (extractor: {}, formats: {})",
                url,
                record.extractor_key.as_deref().unwrap_or("?"),
                record.formats.as_ref().map_or(0, Vec::len)
            );
            return Err(ResolveError::NoResolvableStream);
        };

        let video = ResolvedVideo::from_record(&record, stream_url.to_string());
        tracing::info!("Resolved successfully: {}", video.title);
        Ok(video)
    }

    fn classify(&self, url: &str, error: EngineError) -> ResolveError {
        match &error {
            EngineError::Extraction { reason, detail } => {
                tracing::warn!(
                    "{} refused {}: {} ({})",
                    self.engine.name(),
                    url,
                    detail,
                    reason.description()
                );
            }
            EngineError::TimedOut(after) => {
                tracing::warn!("{} timed out on {} after {:?}", self.engine.name(), url, after);
            }
            other => {
                tracing::error!("Unexpected failure resolving {}: {}", url, other);
            }
        }
        ResolveError::from(error)
    }
}
