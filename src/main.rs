use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod audit;
mod catalog;
mod cli;
mod config;
mod core;
mod providers;
mod server;
mod service;

use crate::audit::PromptLog;
use crate::catalog::Catalog;
use crate::cli::Args;
use crate::config::Config;
use crate::providers::openrouter::OpenRouterClient;
use crate::service::GenerationService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let catalog = match args.catalog.as_deref().or(config.catalog.as_deref()) {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin(),
    };
    catalog.validate()?;

    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| config.resolve_base_url());
    let client = OpenRouterClient::new(base_url, config.resolve_api_key());
    let journal = config.prompt_log_dir.clone().map(PromptLog::new);
    let service = Arc::new(GenerationService::new(catalog, client, journal));

    if args.check {
        let healthy = service.health_check().await;
        println!(
            "{}",
            serde_json::json!({"status": "operational", "healthy": healthy})
        );
        return Ok(());
    }

    let host = args.host.unwrap_or(config.host);
    let port = args.port.unwrap_or(config.port);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let app = server::router(service);

    tracing::info!(%addr, "serving lesson summary api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
