//! 翻译模块统一错误处理
//!
//! 所有提供者共用一个错误类型，按失败原因分类，调用方据此决定提示文案和重试策略。

use std::fmt;

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// 缺少访问凭证（accessId 或 accessSecret 为空）
    #[error("缺少访问凭证: {0}")]
    MissingCredentialsError(String),

    /// 签名时间戳无效
    #[error("时间戳无效: {0}")]
    ClockError(String),

    /// 请求内容无法编码为规范请求
    #[error("编码错误: {0}")]
    EncodingError(String),

    /// 网络传输错误，可以用新的时间戳和签名重试
    #[error("网络错误: {0}")]
    TransportError(String),

    /// 远程服务返回非 2xx 状态
    #[error("远程服务拒绝请求: HTTP {status}")]
    RemoteRejectedError { status: u16 },

    /// 远程服务在 2xx 响应中返回了错误对象
    #[error("服务返回错误 [{code}]: {message}")]
    ServiceError {
        code: String,
        message: String,
        request_id: Option<String>,
    },

    /// 响应结构与预期不符
    #[error("响应格式异常: {0}")]
    MalformedResponseError(String),

    /// 页面内容提取失败
    #[error("内容提取失败: {0}")]
    ExtractionError(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),
}

impl TranslationError {
    /// 检查错误是否可重试
    ///
    /// 只有网络层错误值得重试；签名或参数问题用相同输入重试不会成功。
    pub fn is_retryable(&self) -> bool {
        matches!(self, TranslationError::TransportError(_))
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::MissingCredentialsError(_) => ErrorSeverity::Critical,
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::ClockError(_) => ErrorSeverity::Error,
            TranslationError::EncodingError(_) => ErrorSeverity::Error,
            TranslationError::TransportError(_) => ErrorSeverity::Warning,
            TranslationError::RemoteRejectedError { .. } => ErrorSeverity::Error,
            TranslationError::ServiceError { .. } => ErrorSeverity::Error,
            TranslationError::MalformedResponseError(_) => ErrorSeverity::Error,
            TranslationError::ExtractionError(_) => ErrorSeverity::Warning,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::MissingCredentialsError(_)
            | TranslationError::ClockError(_)
            | TranslationError::EncodingError(_) => ErrorCategory::Local,
            TranslationError::TransportError(_) => ErrorCategory::Network,
            TranslationError::RemoteRejectedError { .. } | TranslationError::ServiceError { .. } => {
                ErrorCategory::Remote
            }
            TranslationError::MalformedResponseError(_) | TranslationError::ExtractionError(_) => {
                ErrorCategory::Response
            }
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        match &mut self {
            TranslationError::MissingCredentialsError(msg)
            | TranslationError::ClockError(msg)
            | TranslationError::EncodingError(msg)
            | TranslationError::TransportError(msg)
            | TranslationError::MalformedResponseError(msg)
            | TranslationError::ExtractionError(msg)
            | TranslationError::ConfigError(msg) => {
                *msg = format!("{} (上下文: {})", msg, context);
            }
            TranslationError::ServiceError { message, .. } => {
                *message = format!("{} (上下文: {})", message, context);
            }
            TranslationError::RemoteRejectedError { .. } => {}
        }

        self
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// 本地错误，发请求前就已失败，永不重试
    Local,
    Network,
    /// 远程拒绝，需要修复请求而不是重试
    Remote,
    Response,
    Configuration,
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::MalformedResponseError(format!("JSON解析错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::ConfigError(format!("IO错误: {}", error))
    }
}

impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        TranslationError::TransportError(error.to_string())
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 记录并返回错误
    pub fn log_error<T>(error: TranslationError) -> TranslationResult<T> {
        let category = error.category();
        match error.severity() {
            ErrorSeverity::Info => tracing::info!(?category, "翻译信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!(?category, "翻译警告: {}", error),
            ErrorSeverity::Error => tracing::error!(?category, "翻译错误: {}", error),
            ErrorSeverity::Critical => tracing::error!(?category, "翻译严重错误: {}", error),
        }

        Err(error)
    }

    /// 创建网络错误
    pub fn transport_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::TransportError(msg.to_string())
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ConfigError(msg.to_string())
    }

    /// 创建响应格式错误
    pub fn malformed_response<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::MalformedResponseError(msg.to_string())
    }

    /// 创建内容提取错误
    pub fn extraction_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ExtractionError(msg.to_string())
    }
}
