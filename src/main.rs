// src/main.rs — tripmate entry point

use clap::Parser;
use std::sync::Arc;

use tripmate::api::{self, ApiState};
use tripmate::auth::local::LocalAuthenticator;
use tripmate::cli::{Cli, Commands};
use tripmate::core::assistant::Assistant;
use tripmate::infra::config::Config;
use tripmate::infra::{logger, paths};
use tripmate::memory::{open_store, spawn_store_server};
use tripmate::provider::ollama::OllamaProvider;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides --verbose
    logger::init_logging(logger::level_for(cli.verbose));

    // Falls back to defaults if no config.toml
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    match &cli.command {
        Some(Commands::Status) => {
            return tripmate::cli::status::show_status(&config).await;
        }
        Some(Commands::Migrate { status, rollback }) => {
            return tripmate::cli::migrate::run_migrate(*status, *rollback).await;
        }
        _ => {}
    }

    paths::ensure_dirs().await?;
    let store = open_store(&paths::db_path())?;
    let (store_handle, _store_task) = spawn_store_server(store);

    let provider = Arc::new(OllamaProvider::from_config(&config.model)?);
    let authenticator = Arc::new(LocalAuthenticator::new(
        store_handle.clone(),
        config.auth.min_password_len,
    ));
    let assistant = Assistant::new(provider, authenticator, Arc::new(store_handle), &config);

    match cli.command {
        Some(Commands::Serve { port }) => {
            let port = port.unwrap_or(config.api.port);
            let state = ApiState::new(
                Arc::new(assistant),
                config.api.token.clone(),
                config.api.session_ttl(),
            );
            eprintln!("tripmate API on http://127.0.0.1:{port}/api/v1");
            api::start_server(port, state).await
        }
        _ => {
            let label = format!("{} @ {}", config.model.name, config.model.base_url);
            tripmate::cli::chat::run_chat(&assistant, &label).await
        }
    }
}
