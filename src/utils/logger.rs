use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_cli_logger(verbose: bool) {
    init_cli_logger_with_level(None, verbose);
}

/// `level` 通常來自 TOML 的 `[monitoring] log_level`，RUST_LOG 與 `--verbose` 優先
pub fn init_cli_logger_with_level(level: Option<&str>, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level, verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

fn default_directive(level: Option<&str>, verbose: bool) -> String {
    match (verbose, level) {
        (true, _) => "momo_etl=debug,info".to_string(),
        (false, Some(level)) => format!("momo_etl={}", level),
        (false, None) => "momo_etl=info".to_string(),
    }
}

/// Store API 在容器內執行時改用 JSON 格式，方便集中收集日誌
pub fn init_json_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("momo_etl=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
