//! Unified error hierarchy for loadwatch
//!
//! The analytics engine itself is infallible: empty windows, zero variance and
//! missing baselines resolve to documented sentinels. Errors only arise at the
//! boundary, when a dataset or configuration is loaded and validated.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for all loadwatch operations
#[derive(Debug, Error)]
pub enum LoadwatchError {
    /// Record failed boundary validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Dataset loading errors
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Record-level validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// RPE outside the 1-10 scale
    #[error("RPE out of range for load entry {entry}: {rpe} (expected 1-10)")]
    RpeOutOfRange { entry: String, rpe: u8 },

    /// Session duration must be positive
    #[error("Duration must be positive for load entry {entry}: {minutes}")]
    NonPositiveDuration { entry: String, minutes: u32 },

    /// Precomputed training load disagrees with rpe x duration
    #[error("Training load mismatch for load entry {entry}: expected {expected}, got {actual}")]
    TrainingLoadMismatch {
        entry: String,
        expected: String,
        actual: String,
    },

    /// Wellness sub-score outside 1-5
    #[error("{field} out of range for check-in {checkin}: {value} (expected 1-5)")]
    ScoreOutOfRange {
        checkin: String,
        field: String,
        value: u8,
    },

    /// Readiness outside 0-100
    #[error("Readiness out of range for check-in {checkin}: {value} (expected 0-100)")]
    ReadinessOutOfRange { checkin: String, value: u8 },

    /// Sleep hours below zero
    #[error("Sleep hours cannot be negative for check-in {checkin}: {hours}")]
    NegativeSleep { checkin: String, hours: String },

    /// Injury resolved before it occurred
    #[error("Injury {injury} resolved ({resolved}) before it occurred ({occurred})")]
    InjuryDatesInverted {
        injury: String,
        occurred: String,
        resolved: String,
    },

    /// Blank identifier on a record
    #[error("Empty {field} on {record}")]
    EmptyIdentifier { record: String, field: String },
}

/// Dataset loading errors
#[derive(Debug, Error)]
pub enum DatasetError {
    /// File content could not be parsed
    #[error("Failed to parse dataset {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// Dataset failed validation, with every problem found
    #[error("Dataset contains {} invalid record(s)", .0.len())]
    Invalid(Vec<ValidationError>),

    /// Requested athlete is not part of the dataset
    #[error("Unknown athlete: {0}")]
    UnknownAthlete(String),
}

/// Result type alias for loadwatch operations
pub type Result<T> = std::result::Result<T, LoadwatchError>;

impl LoadwatchError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LoadwatchError::Validation(_) => ErrorSeverity::Warning,
            LoadwatchError::Dataset(DatasetError::UnknownAthlete(_)) => ErrorSeverity::Warning,
            LoadwatchError::Dataset(_) => ErrorSeverity::Error,
            LoadwatchError::Configuration(_) => ErrorSeverity::Error,
            LoadwatchError::Io(_) => ErrorSeverity::Error,
            LoadwatchError::Internal(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LoadwatchError::Dataset(DatasetError::Parse { path, .. }) => {
                format!("Could not read dataset file: {}", path.display())
            }
            LoadwatchError::Dataset(DatasetError::Invalid(errors)) => {
                let mut message = format!("Dataset has {} invalid record(s):", errors.len());
                for error in errors.iter().take(5) {
                    message.push_str("\n  - ");
                    message.push_str(&error.to_string());
                }
                if errors.len() > 5 {
                    message.push_str(&format!("\n  ... and {} more", errors.len() - 5));
                }
                message
            }
            LoadwatchError::Dataset(DatasetError::UnknownAthlete(id)) => {
                format!("No athlete with id '{}' in the dataset", id)
            }
            LoadwatchError::Configuration(reason) => {
                format!("Invalid configuration: {}. Please check your config file.", reason)
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}
