use std::path::PathBuf;

use clap::Parser;

use crate::resolver::EngineMode;

#[derive(Parser, Debug)]
#[command(name = "video-resolver")]
#[command(author, version, about = "Resolve media page URLs to direct stream URLs", long_about = None)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "RESOLVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "RESOLVER_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Extraction engine(s) to use
    #[arg(long, env = "RESOLVER_ENGINE", value_enum, default_value_t = EngineMode::Auto)]
    pub engine: EngineMode,

    /// Path to the yt-dlp binary (default: auto-detect)
    #[arg(long, env = "YTDLP_PATH")]
    pub ytdlp: Option<String>,

    /// Python interpreter with the yt_dlp module (e.g. a venv python)
    #[arg(long, env = "YTDLP_PYTHON")]
    pub python: Option<String>,

    /// Directory searched for the yt_dlp package before site-packages
    #[arg(long, env = "YTDLP_PYTHONPATH")]
    pub python_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["video-resolver"]).unwrap();
        assert_eq!(cli.port, 8000);
        assert_eq!(cli.host, "0.0.0.0");
        assert_eq!(cli.engine, EngineMode::Auto);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "video-resolver",
            "--port",
            "9000",
            "--engine",
            "cli",
            "--ytdlp",
            "/usr/bin/yt-dlp",
            "--python-path",
            "/opt/ytdlp",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.port, 9000);
        assert_eq!(cli.engine, EngineMode::Cli);
        assert_eq!(cli.ytdlp.as_deref(), Some("/usr/bin/yt-dlp"));
        assert_eq!(cli.python_path, Some(PathBuf::from("/opt/ytdlp")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_rejects_unknown_engine() {
        assert!(Cli::try_parse_from(["video-resolver", "--engine", "lux"]).is_err());
    }
}
