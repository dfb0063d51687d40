pub mod api;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use api::{router, AppState, TransactionStore};
pub use config::cli::LocalStorage;
pub use core::{
    etl::EtlEngine, lookup::LookupIndex, pipeline::ExtractionPipeline, sms_pipeline::SmsPipeline,
};
pub use utils::error::{EtlError, Result};
