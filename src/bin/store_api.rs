use anyhow::Context;
use clap::Parser;
use momo_etl::api::{router, AppState, Persistence, TransactionStore};
use momo_etl::config::toml_config::TomlConfig;
use momo_etl::utils::{logger, validation::Validate};
use momo_etl::LocalStorage;
use std::path::Path;

#[derive(Parser)]
#[command(name = "store-api")]
#[command(about = "Serve extracted transactions over a small CRUD HTTP API")]
struct Args {
    /// Transactions JSON file loaded at startup
    #[arg(short, long, default_value = "transactions.json")]
    data_file: String,

    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    bind: String,

    /// Write the collection back to the data file after every change
    #[arg(long)]
    persist: bool,

    /// Read data file, bind address and persistence from a TOML config
    #[arg(short, long)]
    config: Option<String>,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let config = TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path))?;
            config.validate()?;
            Some(config)
        }
        None => None,
    };

    if args.json_logs {
        logger::init_json_logger();
    } else {
        let level = config.as_ref().and_then(|c| c.log_level());
        logger::init_cli_logger_with_level(level, args.verbose);
    }

    let (data_file, bind, persist) = match &config {
        Some(config) => (
            config.server_data_file(),
            config.server_bind().to_string(),
            config.server_persist() || args.persist,
        ),
        None => (args.data_file.clone(), args.bind.clone(), args.persist),
    };

    let data_path = Path::new(&data_file);
    let filename = data_path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("invalid data file path '{}'", data_file))?
        .to_string();
    let base_dir = data_path
        .parent()
        .map(|dir| dir.to_string_lossy().to_string())
        .unwrap_or_default();
    let storage = LocalStorage::new(base_dir);

    let store = TransactionStore::load(&storage, &filename)
        .await
        .with_context(|| format!("failed to load transactions from '{}'", data_file))?;
    tracing::info!("📂 Loaded {} transactions from {}", store.len(), data_file);

    let persistence = if persist {
        tracing::info!("💾 Changes will be written back to {}", data_file);
        Some(Persistence { storage, filename })
    } else {
        tracing::info!("Changes are kept in memory only");
        None
    };

    let app = router(AppState::new(store, persistence));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {}", bind))?;
    tracing::info!("🚀 Store API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Store API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
