// Error types for extraction engines and the resolver

use std::time::Duration;

use thiserror::Error;

use super::diagnostics::BlockingReason;

/// Classified failure reported by an extraction engine
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// The engine looked at the URL and rejected it (unsupported site,
    /// geo-block, removed video, rate limiting, ...)
    #[error("{detail}")]
    Extraction {
        reason: BlockingReason,
        detail: String,
    },

    /// Engine did not finish within the profile deadline
    #[error("timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    /// yt-dlp binary or Python module not found
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    /// Engine produced output that is not a metadata record
    #[error("malformed engine output: {0}")]
    Malformed(String),

    /// Spawn/IO failure; the engine never got to the site
    #[error("engine process failed: {0}")]
    Process(String),

    /// The engine ran against the site and then died (uncaught exception,
    /// signal, unknown exit status)
    #[error("engine crashed: {0}")]
    Crashed(String),
}

impl EngineError {
    /// Build an extraction failure from raw engine stderr.
    pub fn extraction(stderr: &str) -> Self {
        Self::Extraction {
            reason: super::diagnostics::diagnose_error(stderr),
            detail: super::diagnostics::clean_error_message(stderr),
        }
    }

    /// Whether another engine in a chain is worth trying after this error.
    ///
    /// Only failures that happen before the site is contacted qualify. A
    /// rejected URL, a crash mid-extraction or an exhausted deadline is final.
    pub fn allows_fallback(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Process(_) | Self::Malformed(_)
        )
    }
}

/// Message returned for failures whose detail must stay internal
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error while resolving the video";

/// Outcome taxonomy of a single resolution
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The engine could not process the URL
    #[error("Could not process the URL: {0}")]
    ExtractionFailure(String),

    /// The engine returned nothing at all
    #[error("Could not extract information for this video")]
    EmptyRecord,

    /// A record came back but carried no usable stream URL
    #[error("Could not determine a direct stream URL for this video")]
    NoResolvableStream,

    /// Anything else; detail is logged, never sent to the client
    #[error("Internal server error while resolving the video")]
    UnexpectedFailure(String),
}

impl ResolveError {
    /// Sanitized message safe to hand to a client.
    pub fn client_message(&self) -> String {
        self.to_string()
    }

    /// Whether the input was processable but insufficient (HTTP 400 class).
    pub fn is_insufficient_record(&self) -> bool {
        matches!(self, Self::EmptyRecord | Self::NoResolvableStream)
    }
}

impl From<EngineError> for ResolveError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Extraction { .. } | EngineError::TimedOut(_) => {
                Self::ExtractionFailure(e.to_string())
            }
            EngineError::Unavailable(_)
            | EngineError::Malformed(_)
            | EngineError::Process(_)
            | EngineError::Crashed(_) => Self::UnexpectedFailure(e.to_string()),
        }
    }
}
