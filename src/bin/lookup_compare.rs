use clap::Parser;
use momo_etl::core::lookup::{
    compare_lookups, lookup_indexed, lookup_linear, LookupIndex, LookupStrategy, DEFAULT_PROBES,
};
use momo_etl::core::TransactionRecord;
use momo_etl::utils::logger;
use momo_etl::utils::validation::{validate_path, validate_positive_number};

#[derive(Parser)]
#[command(name = "lookup-compare")]
#[command(about = "Compare linear search and dictionary lookup over extracted transactions")]
struct Args {
    /// Path to the transactions JSON written by momo-etl
    #[arg(short, long, default_value = "output/transactions.json")]
    file: String,

    /// Number of ids to look up, starting from the first transaction
    #[arg(short, long, default_value_t = DEFAULT_PROBES)]
    probes: usize,

    /// Print every record found by both strategies
    #[arg(long)]
    show_records: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    validate_path("file", &args.file)?;
    validate_positive_number("probes", args.probes, 1)?;

    let data = std::fs::read(&args.file)?;
    let transactions: Vec<TransactionRecord> = serde_json::from_slice(&data)?;
    tracing::info!("📥 Loaded {} transactions from {}", transactions.len(), args.file);

    if args.show_records {
        let index = LookupIndex::build(&transactions);
        println!("Search Results");
        for record in transactions.iter().take(args.probes) {
            let linear = lookup_linear(&transactions, &record.id);
            let indexed = lookup_indexed(&index, &record.id);
            println!(
                "{} linear={:?} indexed={:?}",
                record.id,
                linear.map(|r| r.amount),
                indexed.map(|r| r.amount)
            );
        }
    }

    let comparison = compare_lookups(&transactions, args.probes);
    if comparison.mismatches > 0 {
        anyhow::bail!(
            "{} lookups returned different records for the two strategies",
            comparison.mismatches
        );
    }

    println!(
        "\nLinear Search Time: {:?} ({:.2} microseconds)",
        comparison.linear_total,
        comparison.linear_micros()
    );
    println!(
        "Dictionary Search Time: {:?} ({:.2} microseconds, index built in {:?})",
        comparison.indexed_total,
        comparison.indexed_micros(),
        comparison.index_build
    );

    match comparison.faster() {
        LookupStrategy::Indexed => {
            println!("\n\tDictionary Search Method is more efficient as it took less time")
        }
        LookupStrategy::Linear => {
            println!("\n\tLinear Search Method is more efficient as it took less time")
        }
    }

    Ok(())
}
