use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use codeshot::cdp::CdpLauncher;
use codeshot::server::Server;
use codeshot::{LaunchProfile, PipelineConfig, RenderPipeline, ServerConfig, SessionManager};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // `log` records from the library are bridged into the subscriber by `init`.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServerConfig::parse();
    config.validate()?;

    let profile = LaunchProfile::detect(config.chrome_path.clone());
    info!(
        profile = profile.execution.as_str(),
        cache_ttl_secs = config.cache_ttl_secs,
        render_timeout_ms = config.render_timeout_ms,
        trust_proxy = config.trust_proxy,
        "Starting codeshot"
    );

    let sessions = SessionManager::new(Arc::new(CdpLauncher::new()), profile);
    let pipeline = RenderPipeline::new(sessions, PipelineConfig::from(&config));

    Server::new(config, pipeline).run().await?;
    info!("Codeshot stopped");
    Ok(())
}
