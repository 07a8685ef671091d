// Data models for the resolver: engine records in, response envelope out

use serde::{Deserialize, Deserializer, Serialize};

use super::errors::ResolveError;

/// Title used when the engine reports none
pub const DEFAULT_TITLE: &str = "Untitled";

/// Incoming `/resolve` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionRequest {
    pub url: String,
}

impl ResolutionRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// One candidate rendition reported by the engine.
///
/// Only the URL matters for selection; `format_id` is kept for logs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatEntry {
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Metadata record produced by the extraction engine (read-only)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Log-only; an odd type never fails the record
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub extractor_key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Seconds; engines report integers or decimals (Instagram), sometimes strings
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub duration: Option<f64>,
    /// Direct stream URL when the engine resolved to exactly one
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub formats: Option<Vec<FormatEntry>>,
}

fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| D::Error::custom("duration is not representable as f64")),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("duration is not numeric: {:?}", s))),
        Some(other) => Err(D::Error::custom(format!(
            "duration has unexpected type: {}",
            other
        ))),
    }
}

/// Normalized result of a successful resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedVideo {
    pub title: String,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
    pub stream_url: String,
}

impl ResolvedVideo {
    /// Build from a record once a stream URL has been selected.
    ///
    /// A title the engine supplied is kept verbatim; only a missing one
    /// becomes [`DEFAULT_TITLE`].
    pub fn from_record(record: &ExtractionRecord, stream_url: String) -> Self {
        Self {
            title: record
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            thumbnail: record.thumbnail.clone(),
            duration: record.duration,
            stream_url,
        }
    }
}

/// Response envelope; `status` is the discriminant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ResolutionResponse {
    Success { data: ResolvedVideo },
    Error { message: String },
}

impl ResolutionResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<Result<ResolvedVideo, ResolveError>> for ResolutionResponse {
    fn from(result: Result<ResolvedVideo, ResolveError>) -> Self {
        match result {
            Ok(data) => Self::Success { data },
            Err(e) => Self::Error {
                message: e.client_message(),
            },
        }
    }
}
