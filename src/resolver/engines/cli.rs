// CLI engine - uses the native `yt-dlp` binary
//
// The profile is rendered as flags; `--dump-single-json` keeps the run
// metadata-only and prints one record.

use std::path::Path;

use async_trait::async_trait;

use super::parse_record;
use crate::resolver::errors::EngineError;
use crate::resolver::models::ExtractionRecord;
use crate::resolver::profile::ExtractionProfile;
use crate::resolver::traits::ExtractionEngine;
use crate::resolver::utils::{probe_command, run_output_with_timeout};

/// CLI-based engine using the yt-dlp binary
pub struct CliEngine {
    ytdlp_path: String,
}

impl CliEngine {
    pub fn new(ytdlp_path: impl Into<String>) -> Self {
        Self {
            ytdlp_path: ytdlp_path.into(),
        }
    }

    /// Find yt-dlp binary
    fn find_ytdlp() -> String {
        let mut candidates = vec![
            "/opt/homebrew/bin/yt-dlp".to_string(), // Homebrew on Apple Silicon
            "/usr/local/bin/yt-dlp".to_string(),    // Homebrew on Intel / manual install
            "/usr/bin/yt-dlp".to_string(),          // Distro package
        ];
        // pip install --user
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".local/bin/yt-dlp").to_string_lossy().to_string());
        }

        candidates
            .into_iter()
            .find(|p| Path::new(p).exists())
            .unwrap_or_else(|| "yt-dlp".to_string())
    }

    fn build_args(url: &str, profile: &ExtractionProfile) -> Vec<String> {
        let mut args = vec!["--dump-single-json".to_string()];
        args.extend(profile.to_cli_args());
        // URLs starting with '-' must not be read as flags
        args.push("--".to_string());
        args.push(url.to_string());
        args
    }
}

impl Default for CliEngine {
    fn default() -> Self {
        Self::new(Self::find_ytdlp())
    }
}

#[async_trait]
impl ExtractionEngine for CliEngine {
    fn name(&self) -> &'static str {
        "cli-yt-dlp"
    }

    async fn is_available(&self) -> bool {
        probe_command(&self.ytdlp_path, &["--version"], &[]).await
    }

    async fn extract(
        &self,
        url: &str,
        profile: &ExtractionProfile,
    ) -> Result<Option<ExtractionRecord>, EngineError> {
        let args = Self::build_args(url, profile);
        tracing::debug!("[CliEngine] Running: {} {}", self.ytdlp_path, args.join(" "));

        let output =
            run_output_with_timeout(&self.ytdlp_path, &args, &[], profile.engine_deadline()).await?;

        if output.status.success() {
            return parse_record(&output.stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("ERROR:") {
            Err(EngineError::extraction(&stderr))
        } else {
            Err(EngineError::Crashed(format!(
                "{} exited with {:?}: {}",
                self.ytdlp_path,
                output.status.code(),
                stderr.trim()
            )))
        }
    }
}
