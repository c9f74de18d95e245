//! LexAI server entry point.

use std::sync::Arc;

use mimalloc::MiMalloc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lexai::config::AppConfig;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before clap reads env-bound flags
    let _ = dotenvy::dotenv();

    let config = AppConfig::load()?;
    init_tracing(config.log.json);

    tracing::info!(
        name: "config.loaded",
        address = %config.bind_address(),
        research_url = %config.research.base_url,
        "Configuration loaded"
    );

    lexai::server::start_server(Arc::new(config)).await
}

/// Initialize tracing (M-LOG-STRUCTURED).
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}
