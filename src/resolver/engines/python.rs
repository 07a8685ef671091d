// Python engine - drives `yt_dlp.YoutubeDL` through a small driver script
//
// The profile goes in as the YoutubeDL options dict, so every facet maps
// one-to-one. The driver reports the outcome through its exit code, which
// keeps DownloadError (site refused) apart from crashes.

use std::ffi::OsString;
use std::path::PathBuf;

use async_trait::async_trait;

use super::parse_record;
use crate::resolver::errors::EngineError;
use crate::resolver::models::ExtractionRecord;
use crate::resolver::profile::ExtractionProfile;
use crate::resolver::traits::ExtractionEngine;
use crate::resolver::utils::{probe_command, run_output_with_timeout};

/// argv: [-c, url, options_json]. stdout carries only the JSON record.
const DRIVER: &str = r#"
import json, sys
try:
    import yt_dlp
except ImportError as e:
    sys.stderr.write(str(e))
    sys.exit(4)
url, opts = sys.argv[1], json.loads(sys.argv[2])
out, sys.stdout = sys.stdout, sys.stderr
try:
    with yt_dlp.YoutubeDL(opts) as ydl:
        info = ydl.extract_info(url, download=False)
        info = ydl.sanitize_info(info) if info else None
except yt_dlp.utils.DownloadError as e:
    sys.stderr.write(str(e))
    sys.exit(2)
except Exception as e:
    sys.stderr.write("%s: %s" % (type(e).__name__, e))
    sys.exit(3)
json.dump(info, out)
out.flush()
"#;

const EXIT_DOWNLOAD_ERROR: i32 = 2;
const EXIT_UNEXPECTED: i32 = 3;
const EXIT_NO_MODULE: i32 = 4;

/// Python-based engine using the yt_dlp module
pub struct PythonEngine {
    python_cmd: String,
    module_path: Option<PathBuf>,
}

impl PythonEngine {
    pub fn new(python_cmd: impl Into<String>) -> Self {
        Self {
            python_cmd: python_cmd.into(),
            module_path: None,
        }
    }

    /// Look for `yt_dlp` in `dir` before the interpreter's own site-packages
    pub fn with_module_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.module_path = Some(dir.into());
        self
    }

    /// PYTHONPATH for the child: module path first, inherited entries after
    fn child_env(&self) -> Vec<(&'static str, OsString)> {
        let Some(dir) = &self.module_path else {
            return Vec::new();
        };

        let mut paths = vec![dir.clone()];
        if let Some(existing) = std::env::var_os("PYTHONPATH") {
            paths.extend(std::env::split_paths(&existing));
        }
        match std::env::join_paths(paths) {
            Ok(joined) => vec![("PYTHONPATH", joined)],
            Err(e) => {
                tracing::warn!("[PythonEngine] Ignoring module path {}: {}", dir.display(), e);
                Vec::new()
            }
        }
    }

    fn build_args(url: &str, profile: &ExtractionProfile) -> Vec<String> {
        vec![
            "-c".to_string(),
            DRIVER.to_string(),
            url.to_string(),
            profile.to_ydl_options().to_string(),
        ]
    }
}

impl Default for PythonEngine {
    fn default() -> Self {
        Self::new("python3")
    }
}

#[async_trait]
impl ExtractionEngine for PythonEngine {
    fn name(&self) -> &'static str {
        "python-yt-dlp"
    }

    async fn is_available(&self) -> bool {
        probe_command(&self.python_cmd, &["-c", "import yt_dlp"], &self.child_env()).await
    }

    async fn extract(
        &self,
        url: &str,
        profile: &ExtractionProfile,
    ) -> Result<Option<ExtractionRecord>, EngineError> {
        let args = Self::build_args(url, profile);
        tracing::debug!("[PythonEngine] Running {} for {}", self.python_cmd, url);

        let output = run_output_with_timeout(
            &self.python_cmd,
            &args,
            &self.child_env(),
            profile.engine_deadline(),
        )
        .await?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        match output.status.code() {
            Some(0) => parse_record(&output.stdout),
            Some(EXIT_DOWNLOAD_ERROR) => Err(EngineError::extraction(&stderr)),
            Some(EXIT_NO_MODULE) => Err(EngineError::Unavailable(format!(
                "Python yt_dlp module not installed: {}",
                stderr.trim()
            ))),
            Some(EXIT_UNEXPECTED) => Err(EngineError::Crashed(format!(
                "yt_dlp raised: {}",
                stderr.trim()
            ))),
            code => Err(EngineError::Crashed(format!(
                "{} exited with {:?}: {}",
                self.python_cmd,
                code,
                stderr.trim()
            ))),
        }
    }
}
