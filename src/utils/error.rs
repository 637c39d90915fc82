use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing credential: {key}")]
    MissingCredentialError { key: String },

    #[error("Input file error: {path}: {message}")]
    InputFileError { path: String, message: String },

    #[error("API returned error: {message}")]
    ApiBodyError { message: String },
}

impl EtlError {
    /// 配置階段的錯誤在任何網路請求之前就讓整個執行中止
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EtlError::ConfigError { .. }
                | EtlError::InvalidConfigValueError { .. }
                | EtlError::MissingCredentialError { .. }
                | EtlError::InputFileError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
