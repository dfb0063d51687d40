use clap::Parser;
use momo_etl::config::toml_config::TomlConfig;
use momo_etl::core::{ConfigProvider, Pipeline};
use momo_etl::utils::{logger, validation::Validate};
use momo_etl::{EtlEngine, LocalStorage, SmsPipeline};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "SMS extraction with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "momo-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - classify the export without writing any output
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置，日誌等級可能由配置決定，所以先於日誌初始化
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    // 初始化日誌
    logger::init_cli_logger_with_level(config.log_level(), args.verbose);

    tracing::info!("🚀 Starting TOML-based SMS extraction");
    tracing::info!("✅ Configuration loaded from {} and validated", args.config);
    display_config_summary(&config, &args);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = SmsPipeline::new(storage, config)?;

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No output will be written");
        perform_dry_run(&pipeline).await?;
        return Ok(());
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Extraction completed successfully!");
            println!("✅ Extraction completed successfully!");
            for file in &report.files {
                println!("📁 {}/{}", report.output_dir, file);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Extraction failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Pipeline: {}", config.pipeline.name);
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Source: {}", config.source());
    println!("  Currency marker: {}", config.currency());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));

    if config.compress() {
        println!("  Compression: {} (ZIP)", config.archive_filename());
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run<P: Pipeline>(pipeline: &P) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Dry Run Analysis:");

    let messages = pipeline.extract().await?;
    let result = pipeline.transform(messages).await?;

    println!("  Messages: {}", result.total_messages());
    println!("  Transactions: {}", result.transactions.len());
    println!("  Non-transactions: {}", result.non_transactions.len());
    println!(
        "  Without direction keyword: {}",
        result.unclassified_direction
    );

    println!();
    println!("🔎 First transactions:");
    for record in result.transactions.iter().take(5) {
        println!(
            "  {} {:?} {} {} | {} -> {} | ref {}",
            record.id,
            record.kind,
            record.amount,
            record.currency,
            record.sender,
            record.receiver,
            record.transaction_id
        );
    }

    println!();
    println!("✅ Dry run analysis complete.");
    Ok(())
}
