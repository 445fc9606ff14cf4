use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::XlsxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("No file uploaded")]
    MissingFile,

    #[error("File '{filename}' must be one of: {}", .allowed.join(", "))]
    UnsupportedFileType {
        filename: String,
        allowed: Vec<String>,
    },

    #[error(
        "Missing required columns: [{}]. Columns found: [{}]",
        .missing.join(", "),
        .found.join(", ")
    )]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Record store rejected request (status {status}): {message}")]
    StoreError { status: u16, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Network,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::MissingFile
            | EtlError::UnsupportedFileType { .. }
            | EtlError::MissingColumns { .. }
            | EtlError::CsvError(_)
            | EtlError::SpreadsheetError(_) => ErrorCategory::Input,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::ApiError(_) | EtlError::StoreError { .. } => ErrorCategory::Network,
            EtlError::SerializationError(_) | EtlError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::ApiError(_) | EtlError::StoreError { .. } => ErrorSeverity::Medium,
            EtlError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 對應上傳端點的 HTTP 狀態碼
    ///
    /// Only a missing upload, a rejected extension or a missing column is the
    /// caller's fault; a file that cannot be decoded is a server-side failure.
    pub fn status_code(&self) -> u16 {
        match self {
            EtlError::MissingFile
            | EtlError::UnsupportedFileType { .. }
            | EtlError::MissingColumns { .. } => 400,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::MissingFile => "No statement file was provided".to_string(),
            EtlError::UnsupportedFileType { filename, .. } => {
                format!("'{}' is not a supported statement file", filename)
            }
            EtlError::MissingColumns { missing, .. } => format!(
                "The statement is missing the columns: {}",
                missing.join(", ")
            ),
            EtlError::ApiError(_) | EtlError::StoreError { .. } => {
                "Could not reach the record store".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => {
                "Check the file template and the number of header rows to skip (--skip-rows)"
            }
            ErrorCategory::Configuration => {
                "Review the configuration file and make sure every ${VAR} is exported"
            }
            ErrorCategory::Network => "Check the store endpoint, token and network, then retry",
            ErrorCategory::Processing => "Re-run with --verbose and inspect the row log",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
