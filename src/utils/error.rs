use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("XML parsing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Source document error: {message}")]
    SourceFormatError { message: String },

    #[error("Source unavailable: {location} (status {status})")]
    SourceUnavailableError { location: String, status: u16 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Source,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::SourceUnavailableError { .. } => {
                ErrorCategory::Network
            }
            EtlError::IoError(_) | EtlError::ZipError(_) => ErrorCategory::Storage,
            EtlError::XmlError(_) | EtlError::SourceFormatError { .. } => ErrorCategory::Source,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. }
            | EtlError::ValidationError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 遠端來源通常重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Source | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(_) | EtlError::SourceUnavailableError { .. } => {
                "Check that the source URL is reachable and returns the SMS export"
            }
            EtlError::XmlError(_) | EtlError::SourceFormatError { .. } => {
                "Make sure the source is a well-formed SMS backup XML export"
            }
            EtlError::IoError(_) => "Check that the path exists and is readable/writable",
            EtlError::ZipError(_) => "Disable compression or free up disk space and retry",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the command line arguments or TOML configuration"
            }
            EtlError::CsvError(_) | EtlError::SerializationError(_) => {
                "Inspect the extracted records for unexpected values"
            }
            EtlError::ProcessingError { .. } | EtlError::ValidationError { .. } => {
                "Re-run with --verbose to see which message failed"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not fetch the SMS export: {}", self),
            ErrorCategory::Storage => format!("Could not read or write files: {}", self),
            ErrorCategory::Source => format!("The SMS export could not be parsed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
        }
    }

    /// 依嚴重程度決定 CLI 結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
