// Extraction engines
//
// Two yt-dlp front ends plus a chain:
// - Python mode: drives `yt_dlp.YoutubeDL` directly with the profile as an
//   options dict (exact DownloadError classification)
// - CLI mode: native `yt-dlp` binary with the profile rendered as flags
// - Chain: Python first, CLI when Python is missing or crashes

mod chain;
mod cli;
mod python;

pub use chain::EngineChain;
pub use cli::CliEngine;
pub use python::PythonEngine;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;

use super::errors::EngineError;
use super::models::ExtractionRecord;
use super::traits::ExtractionEngine;

/// Which engine(s) to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EngineMode {
    /// Python module yt_dlp, falling back to the CLI binary
    #[default]
    Auto,
    /// Python module yt_dlp only
    Python,
    /// CLI binary yt-dlp only
    Cli,
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Python => write!(f, "python"),
            Self::Cli => write!(f, "cli"),
        }
    }
}

/// Build the engine for `mode`.
pub fn build_engine(
    mode: EngineMode,
    python_cmd: Option<String>,
    module_path: Option<PathBuf>,
    ytdlp_path: Option<String>,
) -> Arc<dyn ExtractionEngine> {
    let python = || {
        let engine = match python_cmd.clone() {
            Some(cmd) => PythonEngine::new(cmd),
            None => PythonEngine::default(),
        };
        match module_path.clone() {
            Some(dir) => engine.with_module_path(dir),
            None => engine,
        }
    };
    let cli = || match ytdlp_path.clone() {
        Some(path) => CliEngine::new(path),
        None => CliEngine::default(),
    };

    match mode {
        EngineMode::Python => Arc::new(python()),
        EngineMode::Cli => Arc::new(cli()),
        EngineMode::Auto => {
            let mut chain = EngineChain::new();
            chain.add_engine(Box::new(python()));
            chain.add_engine(Box::new(cli()));
            Arc::new(chain)
        }
    }
}

/// Parse engine JSON output into a record.
///
/// `null`, an empty object, or empty output all mean "no record".
pub fn parse_record(stdout: &[u8]) -> Result<Option<ExtractionRecord>, EngineError> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let json: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| EngineError::Malformed(format!("Invalid JSON: {}", e)))?;

    match json {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(map) if map.is_empty() => Ok(None),
        serde_json::Value::Object(map) => serde_json::from_value(serde_json::Value::Object(map))
            .map(Some)
            .map_err(|e| EngineError::Malformed(format!("Unexpected record shape: {}", e))),
        other => Err(EngineError::Malformed(format!(
            "Expected a JSON object, got: {}",
            truncate(&other.to_string(), 80)
        ))),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_empty_variants() {
        assert!(parse_record(b"").unwrap().is_none());
        assert!(parse_record(b"  null\n").unwrap().is_none());
        assert!(parse_record(b"{}").unwrap().is_none());
    }

    #[test]
    fn test_parse_record_fields() {
        let out = br#"{"id":"abc","extractor_key":"Youtube","title":"Clip","duration":12.5,
                       "formats":[{"format_id":"18","url":"https://cdn/18.mp4"}]}"#;
        let rec = parse_record(out).unwrap().unwrap();
        assert_eq!(rec.extractor_key.as_deref(), Some("Youtube"));
        assert_eq!(rec.title.as_deref(), Some("Clip"));
        assert_eq!(rec.duration, Some(12.5));
        assert_eq!(rec.formats.unwrap().len(), 1);
    }

    #[test]
    fn test_parse_record_malformed() {
        assert!(matches!(parse_record(b"not json"), Err(EngineError::Malformed(_))));
        assert!(matches!(parse_record(b"[1,2]"), Err(EngineError::Malformed(_))));
        assert!(matches!(
            parse_record(br#"{"title": 5}"#),
            Err(EngineError::Malformed(_))
        ));
    }

    #[test]
    fn test_build_engine_names() {
        assert_eq!(build_engine(EngineMode::Auto, None, None, None).name(), "chain");
        assert_eq!(
            build_engine(EngineMode::Python, None, Some("/opt/ytdlp".into()), None).name(),
            "python-yt-dlp"
        );
        assert_eq!(
            build_engine(EngineMode::Cli, None, None, Some("/usr/bin/yt-dlp".into())).name(),
            "cli-yt-dlp"
        );
    }

    #[test]
    fn test_engine_mode_display() {
        assert_eq!(EngineMode::default().to_string(), "auto");
        assert_eq!(EngineMode::Cli.to_string(), "cli");
    }
}
