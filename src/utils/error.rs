use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Source request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Source '{source_name}' unavailable: {message}")]
    SourceError { source_name: String, message: String },

    #[error("Malformed {source_name} data: {message}")]
    MalformedSourceError { source_name: String, message: String },

    #[error("Simulation error: {message}")]
    SimulationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    Simulation,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SimError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SimError::ConfigValidationError { .. }
            | SimError::InvalidConfigValueError { .. }
            | SimError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SimError::ApiError(_)
            | SimError::SourceError { .. }
            | SimError::MalformedSourceError { .. } => ErrorCategory::Source,
            SimError::SimulationError { .. } => ErrorCategory::Simulation,
            SimError::ZipError(_)
            | SimError::CsvError(_)
            | SimError::IoError(_)
            | SimError::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Sources fail open, so these only surface when a caller asks for them directly.
            SimError::SourceError { .. } | SimError::MalformedSourceError { .. } => {
                ErrorSeverity::Low
            }
            SimError::ApiError(_) => ErrorSeverity::Medium,
            SimError::ConfigValidationError { .. }
            | SimError::InvalidConfigValueError { .. }
            | SimError::MissingConfigError { .. }
            | SimError::SimulationError { .. } => ErrorSeverity::High,
            SimError::ZipError(_)
            | SimError::CsvError(_)
            | SimError::IoError(_)
            | SimError::SerializationError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SimError::ConfigValidationError { field, .. }
            | SimError::InvalidConfigValueError { field, .. } => {
                format!("Check the value of '{}' in your configuration", field)
            }
            SimError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration file or command line", field)
            }
            SimError::ApiError(_) | SimError::SourceError { .. } => {
                "Verify the source location is reachable; built-in defaults are used otherwise"
                    .to_string()
            }
            SimError::MalformedSourceError { .. } => {
                "Fix the input file format; built-in defaults are used otherwise".to_string()
            }
            SimError::SimulationError { .. } => {
                "Re-run with --verbose and the same --seed to reproduce".to_string()
            }
            SimError::IoError(_) | SimError::ZipError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            SimError::CsvError(_) | SimError::SerializationError(_) => {
                "Report this as a bug together with the seed that produced it".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Source => format!("Could not read an input source: {}", self),
            ErrorCategory::Simulation => format!("The simulation could not complete: {}", self),
            ErrorCategory::Output => format!("Failed to write the election report: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = SimError::InvalidConfigValueError {
            field: "simulation.runs".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(err.exit_code(), 1);
        assert!(err.recovery_suggestion().contains("simulation.runs"));
    }

    #[test]
    fn test_io_errors_are_output_errors() {
        let err = SimError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.category(), ErrorCategory::Output);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().starts_with("Failed to write"));
    }
}
