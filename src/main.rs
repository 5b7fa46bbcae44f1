use order_gateway::config::AppConfig;
use order_gateway::{gateway, logging};

fn git_hash() -> &'static str {
    option_env!("GIT_HASH").unwrap_or("unknown")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let _guard = logging::init_logging(config.log_json);

    tracing::info!(git_hash = git_hash(), "starting order gateway");

    gateway::run_server(config).await
}
