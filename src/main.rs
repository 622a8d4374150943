use anyhow::Result;
use conceptmap::server::SkillServer;
use conceptmap::{Config, IntentOrchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.conceptmap.log_level.as_str()),
    )
    .init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("serve");

    match command {
        "verify" => run_verification(&config),
        "serve" => run_server(config).await,
        other => anyhow::bail!("Unknown command '{}'. Usage: conceptmap [serve|verify]", other),
    }
}

/// Run the skill endpoint
async fn run_server(config: Config) -> Result<()> {
    log::info!("Starting Concept Map v{}", env!("CARGO_PKG_VERSION"));

    let orchestrator = IntentOrchestrator::from_config(&config)?;
    let server = SkillServer::new(orchestrator, config.http_server.clone());
    server.run().await?;

    Ok(())
}

/// Log the effective configuration (it has already been validated by `Config::load`)
fn run_verification(config: &Config) -> Result<()> {
    log::info!("Concept Map v{}", env!("CARGO_PKG_VERSION"));
    log::info!("✓ Configuration loaded successfully");
    log::info!("Id locator: {}", config.services.id_locator_url);
    log::info!("Traversal: {}", config.services.traversal_url);
    log::info!(
        "Language: {}, relationship: {}",
        config.services.language,
        config.services.relationship_id
    );
    log::info!(
        "Timeout: {} ms, max retries: {}",
        config.services.timeout_ms,
        config.services.max_retries
    );
    log::info!(
        "HTTP endpoint: {}:{}",
        config.http_server.bind_address,
        config.http_server.port
    );

    // Building the orchestrator also builds the HTTP client.
    IntentOrchestrator::from_config(config)?;
    log::info!("✓ HTTP client ready");

    Ok(())
}
