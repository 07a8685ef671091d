// ExtractionEngine trait definition

use async_trait::async_trait;

use super::errors::EngineError;
use super::models::ExtractionRecord;
use super::profile::ExtractionProfile;

/// Anything that can turn a page URL into a metadata record without
/// downloading media.
#[async_trait]
pub trait ExtractionEngine: Send + Sync {
    /// Name of the engine (for logging)
    fn name(&self) -> &'static str;

    /// Check if this engine can run at all (tool installed)
    async fn is_available(&self) -> bool;

    /// Extract metadata for `url` under `profile`.
    ///
    /// `Ok(None)` means the engine ran but produced no record.
    async fn extract(
        &self,
        url: &str,
        profile: &ExtractionProfile,
    ) -> Result<Option<ExtractionRecord>, EngineError>;
}
