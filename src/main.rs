use portico::config::Config;
use portico::pipeline::EchoPipeline;
use portico::server::Server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?.with_args(std::env::args().skip(1));

    let handle = Server::new(cfg, EchoPipeline).start().await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received");

    handle.stop();
    handle.wait().await
}
