use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Input unavailable: {path}: {reason}")]
    InputUnavailable { path: String, reason: String },

    #[error("Missing required column(s): {}", .missing.join(", "))]
    SchemaError { missing: Vec<String> },

    #[error("Empty input: {message}")]
    EmptyInput { message: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Schema,
    Data,
    Config,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a run that failed with this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::InputUnavailable { .. } | EtlError::CsvError(_) => ErrorCategory::Input,
            EtlError::SchemaError { .. } => ErrorCategory::Schema,
            EtlError::EmptyInput { .. } | EtlError::ProcessingError { .. } => ErrorCategory::Data,
            EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Config,
            EtlError::ZipError(_) | EtlError::SerializationError(_) => ErrorCategory::Output,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Schema | ErrorCategory::Config => {
                ErrorSeverity::High
            }
            ErrorCategory::Output | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::InputUnavailable { .. } => {
                "Check that the input file exists, is readable and is a delimited text export"
            }
            EtlError::CsvError(_) => "Check the delimiter setting and that every row has the same number of fields",
            EtlError::SchemaError { .. } => {
                "Pass the matching column names with --supplier-column, --product-column or --date-column"
            }
            EtlError::EmptyInput { .. } => {
                "Verify the date column and the configured date formats; every row was filtered out"
            }
            EtlError::ProcessingError { .. } => "Inspect the input data for inconsistent values",
            EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => "Review the configuration values and try again",
            EtlError::ZipError(_) | EtlError::SerializationError(_) => {
                "Retry with fewer output formats or without compression"
            }
            EtlError::IoError(_) => "Check file permissions and free disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::InputUnavailable { path, .. } => format!("Could not read input file '{}'", path),
            EtlError::SchemaError { missing } => {
                format!("The input is missing required column(s): {}", missing.join(", "))
            }
            EtlError::EmptyInput { .. } => "No records with a valid registration date were found".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
