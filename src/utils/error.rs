use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Insight request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV must contain date, revenue, expense columns (missing: {})", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Upload exceeds {limit} bytes")]
    UploadTooLarge { limit: usize },

    #[error("Report not found: {report_id}")]
    ReportNotFound { report_id: String },

    #[error("Report rendering failed: {message}")]
    RenderError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    External,
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

impl AnalysisError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalysisError::CsvError(_)
            | AnalysisError::MissingColumns { .. }
            | AnalysisError::UploadTooLarge { .. } => ErrorCategory::Input,
            AnalysisError::ConfigError { .. }
            | AnalysisError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AnalysisError::HttpError(_) => ErrorCategory::External,
            AnalysisError::ReportNotFound { .. }
            | AnalysisError::RenderError { .. }
            | AnalysisError::SerializationError(_) => ErrorCategory::Output,
            AnalysisError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::External => ErrorSeverity::Medium,
            ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// True when the caller sent something we cannot analyze, as opposed to a
    /// failure on our side.
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Input
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AnalysisError::MissingColumns { .. } => {
                "CSV must contain date, revenue, expense columns".to_string()
            }
            AnalysisError::CsvError(e) => format!("The uploaded CSV could not be read: {}", e),
            AnalysisError::UploadTooLarge { limit } => {
                format!("The uploaded file is larger than the {} byte limit", limit)
            }
            AnalysisError::ReportNotFound { .. } => {
                "Run analysis first before exporting".to_string()
            }
            AnalysisError::ConfigError { message } => format!("Configuration problem: {}", message),
            AnalysisError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AnalysisError::MissingColumns { .. } => {
                "Add 'date', 'revenue' and 'expense' header columns to the CSV"
            }
            AnalysisError::CsvError(_) => {
                "Check that revenue and expense cells are numeric and every row has the same number of fields"
            }
            AnalysisError::UploadTooLarge { .. } => {
                "Split the file or raise server.max_upload_bytes"
            }
            AnalysisError::ReportNotFound { .. } => {
                "Upload the CSV again; reports expire after store.ttl_seconds"
            }
            AnalysisError::HttpError(_) => "Check network access and the insights API key",
            AnalysisError::ConfigError { .. }
            | AnalysisError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags and restart"
            }
            AnalysisError::IoError(_) => "Check file permissions and free disk space",
            AnalysisError::RenderError { .. } | AnalysisError::SerializationError(_) => {
                "Retry the export; if it keeps failing, report the input file"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_is_client_error() {
        let err = AnalysisError::MissingColumns {
            missing: vec!["date".to_string()],
        };
        assert!(err.is_client_error());
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(
            err.user_friendly_message(),
            "CSV must contain date, revenue, expense columns"
        );
        assert!(err.to_string().contains("missing: date"));
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = AnalysisError::InvalidConfigValueError {
            field: "server.port".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_client_error());
    }
}
