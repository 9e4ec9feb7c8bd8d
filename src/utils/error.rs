use thiserror::Error;

/// 文章操作的錯誤種類（封閉集合），每個 service / controller 操作都回傳這個型別
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArticleError {
    /// 本地檢查失敗，不會發出網路請求
    #[error("{message}")]
    Validation { field: String, message: String },

    /// 伺服器回應非 2xx
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// 請求無法完成（連線失敗、逾時等）
    #[error("Network error: {message}")]
    Network { message: String },

    /// 回應內容無法解析成預期的形狀
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ArticleError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// 由 HTTP 狀態與回應內容建立遠端錯誤；內容為空時使用通用訊息
    pub fn remote(status: u16, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("Request failed with status {}", status)
        } else {
            body.to_string()
        };
        Self::Remote { status, message }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation { .. } => ErrorSeverity::Low,
            Self::Network { .. } => ErrorSeverity::Medium,
            Self::Remote { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            Self::Remote { .. } => ErrorSeverity::High,
            Self::MalformedResponse { .. } => ErrorSeverity::Critical,
        }
    }

    /// 顯示給使用者的訊息（表單內嵌錯誤或通知描述）
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Validation { message, .. } | Self::Remote { message, .. } => message.clone(),
            Self::Network { message } => {
                format!("Could not reach the inventory service ({})", message)
            }
            Self::MalformedResponse { message } => {
                format!("The inventory service returned an unexpected response ({})", message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "Correct the highlighted value and submit again",
            Self::Remote { status, .. } if *status >= 500 => "Retry later; the service reported an internal error",
            Self::Remote { .. } => "Check the submitted values against the service's rules",
            Self::Network { .. } => "Verify the service base URL and that the backend is running",
            Self::MalformedResponse { .. } => "Make sure the base URL points at a compatible inventory service",
        }
    }
}

impl From<reqwest::Error> for ArticleError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::malformed(err.to_string())
        } else {
            Self::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for ArticleError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Article(#[from] ArticleError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl AppError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Article(err) => err.severity(),
            Self::IoError(_) | Self::CsvError(_) | Self::SerializationError(_) => {
                ErrorSeverity::Critical
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Article(err) => err.user_friendly_message(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Article(err) => err.recovery_suggestion(),
            Self::IoError(_) => "Check that the file exists and is readable",
            Self::CsvError(_) | Self::SerializationError(_) => "Try a different output format",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line arguments"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
