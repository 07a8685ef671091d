use anyhow::Result;
use clap::Parser;
use video_resolver_lib::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "video_resolver_lib=debug,video_resolver=debug,tower_http=debug".to_string()
        } else {
            "video_resolver_lib=info,video_resolver=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    video_resolver_lib::run(cli).await
}
