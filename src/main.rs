use std::net::SocketAddr;
use std::path::Path;

use clap::Parser;
use eyre::{Result, WrapErr};
use log::{LevelFilter, error, info};

mod cli;

use cli::Cli;
use ytsum::config::{Config, FileConfig};
use ytsum::server::{AppState, create_router};
use ytsum::summarize::OpenRouter;
use ytsum::youtube::YouTubeCaptions;

fn setup_logging(log_file: Option<&Path>, verbose: bool) -> Result<()> {
    let default_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level).parse_default_env();

    if let Some(path) = log_file {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(path)?);
        builder.target(env_logger::Target::Pipe(target));
    }

    builder.init();

    if let Some(path) = log_file {
        info!("Logging initialized: {}", path.display());
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables take precedence
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    setup_logging(cli.log_file.as_deref(), cli.verbose)?;

    let config_path = cli.config.clone().unwrap_or_else(ytsum::config::config_path);
    let file = FileConfig::load(&config_path)
        .wrap_err_with(|| format!("failed to read config file {}", config_path.display()))?;

    let config = Config::from_env(file)
        .wrap_err("invalid configuration")?
        .with_bind_overrides(cli.host, cli.port);

    info!(
        "Using model {} via {} (captions lang={})",
        config.llm.model, config.llm.base_url, config.lang
    );

    let client = reqwest::Client::new();
    let state = AppState::new(
        YouTubeCaptions::new(client.clone(), &config.youtube_base_url, &config.lang),
        OpenRouter::new(client, config.llm.clone()),
    );
    let app = create_router(state, &config.allowed_origins);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .wrap_err_with(|| format!("invalid bind address {}:{}", config.host, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}
