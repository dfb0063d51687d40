use clap::Parser;
use momo_etl::core::lookup::{compare_lookups, LookupStrategy};
use momo_etl::core::TransactionRecord;
use momo_etl::utils::{logger, validation::Validate};
use momo_etl::{CliConfig, EtlEngine, LocalStorage, SmsPipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting momo-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }
    let compare = config.compare;
    let probes = config.probes;

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = match SmsPipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            println!(
                "✅ Successfully processed {} messages.",
                report.summary.total_messages
            );
            println!(
                "📁 Saved: {} transactions, {} non-transactions to {}",
                report.summary.transactions, report.summary.non_transactions, report.output_dir
            );
            if report.summary.unclassified_direction > 0 {
                println!(
                    "⚠️  {} transactions had no direction keyword (recorded as Payment)",
                    report.summary.unclassified_direction
                );
            }

            if compare {
                let transactions_path =
                    std::path::Path::new(&report.output_dir).join("transactions.json");
                let data = std::fs::read(&transactions_path)?;
                let transactions: Vec<TransactionRecord> = serde_json::from_slice(&data)?;
                let comparison = compare_lookups(&transactions, probes);

                println!("\nLookup comparison over {} ids:", comparison.probes);
                println!(
                    "  Linear search:     {:.2} microseconds",
                    comparison.linear_micros()
                );
                println!(
                    "  Dictionary lookup: {:.2} microseconds",
                    comparison.indexed_micros()
                );
                match comparison.faster() {
                    LookupStrategy::Indexed => println!("  Dictionary lookup was faster"),
                    LookupStrategy::Linear => println!("  Linear search was faster"),
                }
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
