use anyhow::Result;
use ascent_core::config::{RankingConfig, DEFAULT_K_FEATURES};
use ascent_server::{build_app, load_engine, ServerConfig};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Artifact directory (also the download cache)
    #[arg(long, env = "ASCENT_ARTIFACTS", default_value = "./data")]
    artifacts: PathBuf,
    /// Base URL to fetch missing artifacts from
    #[arg(long, env = "ASCENT_REMOTE_BASE")]
    remote_base: Option<String>,
    /// Per-request timeout for artifact downloads, in seconds
    #[arg(long, default_value_t = 120)]
    fetch_timeout_secs: u64,
    /// Number of query-weighted terms compared per query
    #[arg(long, env = "ASCENT_K_FEATURES", default_value_t = DEFAULT_K_FEATURES)]
    k_features: usize,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = ServerConfig {
        artifacts_dir: args.artifacts,
        remote_base: args.remote_base,
        fetch_timeout: Duration::from_secs(args.fetch_timeout_secs),
        ranking: RankingConfig::with_k_features(args.k_features),
    };
    let engine = load_engine(&config).await?;
    let app = build_app(engine);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, k_features = config.ranking.k_features, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
