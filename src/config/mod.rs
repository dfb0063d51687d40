pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::lookup::DEFAULT_PROBES;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "momo-etl")]
#[command(about = "Extract mobile-money transactions from an SMS backup XML export")]
pub struct CliConfig {
    #[arg(long, default_value = "data/modified_sms_v2.xml", help = "SMS export path or http(s) URL")]
    pub source: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "json")]
    pub output_formats: Vec<String>,

    #[arg(long, default_value = "RWF", help = "Currency marker that identifies a transaction")]
    pub currency: String,

    #[arg(long, help = "Bundle all outputs into a zip archive")]
    pub compress: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Compare linear and indexed lookups after extraction")]
    pub compare: bool,

    #[arg(long, default_value_t = DEFAULT_PROBES)]
    pub probes: usize,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn source(&self) -> &str {
        &self.source
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn currency(&self) -> &str {
        &self.currency
    }

    fn compress(&self) -> bool {
        self.compress
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_source("source", &self.source)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("output_formats", &self.output_formats)?;
        validation::validate_currency_marker("currency", &self.currency)?;
        if self.compare {
            validation::validate_positive_number("probes", self.probes, 1)?;
        }
        Ok(())
    }
}
