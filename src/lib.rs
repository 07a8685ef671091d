pub mod cli;
pub mod resolver;
pub mod server;

use std::sync::Arc;

use cli::Cli;
use resolver::{build_engine, ExtractionProfile, Resolver};
use server::AppContext;

/// Build the resolver from CLI settings and serve until shutdown
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!("Starting {} {}", server::SERVICE_NAME, env!("CARGO_PKG_VERSION"));

    // Built once; shared read-only by every request
    let profile = Arc::new(ExtractionProfile::build());
    let engine = build_engine(
        cli.engine,
        cli.python.clone(),
        cli.python_path.clone(),
        cli.ytdlp.clone(),
    );

    if engine.is_available().await {
        tracing::info!("Extraction engine ready: {} (mode: {})", engine.name(), cli.engine);
    } else {
        // Keep serving: requests will get a classified error until the tool is installed
        tracing::warn!(
            "No extraction engine available (mode: {}). Install yt-dlp: pip3 install yt-dlp",
            cli.engine
        );
    }

    let ctx = AppContext {
        resolver: Resolver::new(engine, profile),
    };

    server::start_server(&cli.host, cli.port, ctx).await
}
