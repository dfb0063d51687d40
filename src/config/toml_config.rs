use crate::core::ConfigProvider;
use crate::domain::model::DEFAULT_CURRENCY;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
    pub server: Option<ServerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// 本機 XML 路徑或 http(s) URL
    pub location: String,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
    pub filenames: Option<FilenameConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilenameConfig {
    pub transactions: Option<String>,
    pub non_transactions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
    /// 交易 JSON 檔路徑，預設為 load.output_path 底下的交易檔
    pub data_file: Option<String>,
    pub persist: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SMS_EXPORT_URL})，找不到的變數原樣保留
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// `[monitoring] log_level`，只影響 momo_etl 本身的日誌
    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }

    pub fn server_bind(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind.as_deref())
            .unwrap_or("127.0.0.1:8000")
    }

    pub fn server_data_file(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.data_file.clone())
            .unwrap_or_else(|| {
                Path::new(&self.load.output_path)
                    .join(self.transactions_filename())
                    .to_string_lossy()
                    .to_string()
            })
    }

    pub fn server_persist(&self) -> bool {
        self.server.as_ref().and_then(|s| s.persist).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn source(&self) -> &str {
        &self.source.location
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn currency(&self) -> &str {
        self.source.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    fn compress(&self) -> bool {
        self.load
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }

    fn transactions_filename(&self) -> &str {
        self.load
            .filenames
            .as_ref()
            .and_then(|f| f.transactions.as_deref())
            .unwrap_or("transactions.json")
    }

    fn non_transactions_filename(&self) -> &str {
        self.load
            .filenames
            .as_ref()
            .and_then(|f| f.non_transactions.as_deref())
            .unwrap_or("non_transactions.json")
    }

    fn archive_filename(&self) -> &str {
        self.load
            .compression
            .as_ref()
            .and_then(|c| c.filename.as_deref())
            .unwrap_or("momo_output.zip")
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_source("source.location", &self.source.location)?;
        validation::validate_currency_marker("source.currency", self.currency())?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;
        validation::validate_file_extensions(
            "load.filenames",
            &[
                self.transactions_filename().to_string(),
                self.non_transactions_filename().to_string(),
            ],
            &["json"],
        )?;
        if let Some(level) = self.log_level() {
            validation::validate_log_level("monitoring.log_level", level)?;
        }
        if self.compress() {
            validation::validate_file_extensions(
                "load.compression.filename",
                &[self.archive_filename().to_string()],
                &["zip"],
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[pipeline]
name = "momo-sms"
description = "MTN MoMo SMS backup"

[source]
location = "data/modified_sms_v2.xml"

[load]
output_path = "./test-output"
output_formats = ["json", "csv"]
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.pipeline.name, "momo-sms");
        assert_eq!(config.source(), "data/modified_sms_v2.xml");
        assert_eq!(config.currency(), "RWF");
        assert!(!config.compress());
        assert_eq!(config.transactions_filename(), "transactions.json");
        assert_eq!(config.server_bind(), "127.0.0.1:8000");
        assert!(config.server_data_file().ends_with("transactions.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_toml_config() {
        let toml_content = r#"
[pipeline]
name = "momo-sms"

[source]
location = "https://exports.example.com/sms.xml"
currency = "RWF"

[load]
output_path = "./out"
output_formats = ["json"]

[load.compression]
enabled = true
filename = "bundle.zip"

[load.filenames]
transactions = "txns.json"
non_transactions = "skipped.json"

[monitoring]
enabled = true
log_level = "debug"

[server]
bind = "0.0.0.0:9000"
data_file = "./out/txns.json"
persist = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(config.compress());
        assert_eq!(config.archive_filename(), "bundle.zip");
        assert_eq!(config.transactions_filename(), "txns.json");
        assert_eq!(config.non_transactions_filename(), "skipped.json");
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_level(), Some("debug"));
        assert_eq!(config.server_bind(), "0.0.0.0:9000");
        assert_eq!(config.server_data_file(), "./out/txns.json");
        assert!(config.server_persist());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("MOMO_TEST_EXPORT_URL", "https://test.example.com/sms.xml");

        let toml_content = r#"
[pipeline]
name = "env"

[source]
location = "${MOMO_TEST_EXPORT_URL}"

[load]
output_path = "./output"
output_formats = ["json"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.location, "https://test.example.com/sms.xml");

        std::env::remove_var("MOMO_TEST_EXPORT_URL");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[pipeline]
name = "bad"

[source]
location = "data/sms.csv"
currency = "rwf"

[load]
output_path = "./output"
output_formats = ["tsv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let toml_content = r#"
[pipeline]
name = "momo-sms"

[source]
location = "data/modified_sms_v2.xml"

[load]
output_path = "./output"
output_formats = ["json"]

[monitoring]
enabled = false
log_level = "loud"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.log_level(), Some("loud"));
        let err = config.validate().unwrap_err();
        assert!(matches!(err, EtlError::InvalidConfigValueError { ref field, .. } if field == "monitoring.log_level"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[pipeline\nname=").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "momo-sms");
    }
}
