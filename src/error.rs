use thiserror::Error;

/// Errors surfaced by the training and prediction pipeline
#[derive(Error, Debug)]
pub enum AppError {
    /// SQLite access failures
    #[error("Database error: {0}")]
    Database(String),

    /// Missing database file, table, or saved model
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected input, such as an unsafe table identifier
    #[error("Validation error: {0}")]
    Validation(String),

    /// Labeled data that does not match the expected table layout
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// SVM fitting or grid search failures
    #[error("Training error: {0}")]
    Training(String),

    /// Configuration load or parse failures
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Filesystem errors while reading or writing model artifacts
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Model encode/decode failures
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Conversion from rusqlite::Error
impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

/// Conversion from bincode::Error
impl From<bincode::Error> for AppError {
    fn from(err: bincode::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Database("no such table".to_string()).to_string(),
            "Database error: no such table"
        );
        assert_eq!(
            AppError::Validation("bad table name".to_string()).to_string(),
            "Validation error: bad table name"
        );
        assert_eq!(
            AppError::Training("fold failed".to_string()).to_string(),
            "Training error: fold failed"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_sqlite_error_conversion() {
        let sqlite = rusqlite::Error::InvalidColumnName("message".to_string());
        let err: AppError = sqlite.into();
        assert!(matches!(err, AppError::Database(_)));
    }
}
