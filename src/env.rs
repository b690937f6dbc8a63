//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，按用途分组：核心、腾讯云、Reverso、HTTP。

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }

    /// 变量已设置时才返回值，解析失败同样视为错误
    fn get_if_set() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "READER_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("warn".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.trim().to_lowercase().as_str() {
                level @ ("trace" | "debug" | "info" | "warn" | "error") => Ok(level.to_string()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何非空值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }
}

/// 腾讯云机器翻译相关环境变量
pub mod tencent {
    use super::*;

    /// SecretId
    pub struct SecretId;
    impl EnvVar<String> for SecretId {
        const NAME: &'static str = "TENCENTCLOUD_SECRET_ID";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Tencent Cloud API SecretId";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }

    /// SecretKey
    pub struct SecretKey;
    impl EnvVar<String> for SecretKey {
        const NAME: &'static str = "TENCENTCLOUD_SECRET_KEY";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Tencent Cloud API SecretKey (never logged)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }

    /// 临时凭证的会话令牌
    pub struct Token;
    impl EnvVar<String> for Token {
        const NAME: &'static str = "TENCENTCLOUD_TOKEN";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Session token for temporary credentials (optional)";

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.trim().to_string())
        }
    }

    /// 地域，空字符串表示不发送 X-TC-Region
    pub struct Region;
    impl EnvVar<String> for Region {
        const NAME: &'static str = "READER_TENCENT_REGION";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str =
            "Region sent as X-TC-Region; empty to omit (default: ap-beijing)";

        fn parse(value: &str) -> EnvResult<String> {
            let region = value.trim();
            if region.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                Ok(region.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid region '{}'", value),
                })
            }
        }
    }

    /// API 主机名
    pub struct Host;
    impl EnvVar<String> for Host {
        const NAME: &'static str = "READER_TENCENT_HOST";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str =
            "Machine translation API host (default: tmt.tencentcloudapi.com)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_host(value, Self::NAME)
        }
    }
}

/// Reverso 相关环境变量
pub mod reverso {
    use super::*;

    /// 上下文页面主机名
    pub struct ContextHost;
    impl EnvVar<String> for ContextHost {
        const NAME: &'static str = "READER_REVERSO_CONTEXT_HOST";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Context page host (default: context.reverso.net)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_host(value, Self::NAME)
        }
    }

    /// 句子翻译 API 地址
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "READER_REVERSO_API_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Sentence translation API endpoint URL";

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 例句最大词数
    pub struct MaxWords;
    impl EnvVar<usize> for MaxWords {
        const NAME: &'static str = "READER_REVERSO_MAX_WORDS";
        const DEFAULT: Option<usize> = Some(20);
        const DESCRIPTION: &'static str = "Maximum words per side of a kept usage example";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 200)
        }
    }
}

/// HTTP 相关环境变量
pub mod http {
    use super::*;

    /// 请求超时
    pub struct Timeout;
    impl EnvVar<Duration> for Timeout {
        const NAME: &'static str = "READER_HTTP_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(30));
        const DESCRIPTION: &'static str = "Request timeout in seconds, 0 disables it";

        fn parse(value: &str) -> EnvResult<Duration> {
            let secs = parse_positive_usize(value, Self::NAME, 0, 300)?;
            Ok(Duration::from_secs(secs as u64))
        }
    }

    /// 签名请求的最大重试次数
    pub struct MaxRetries;
    impl EnvVar<usize> for MaxRetries {
        const NAME: &'static str = "READER_HTTP_MAX_RETRIES";
        const DEFAULT: Option<usize> = Some(0);
        const DESCRIPTION: &'static str =
            "Retries of signed requests after transport errors (re-signed each time)";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 0, 5)
        }
    }

    /// 固定 User-Agent
    pub struct UserAgent;
    impl EnvVar<String> for UserAgent {
        const NAME: &'static str = "READER_HTTP_USER_AGENT";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str =
            "Fixed User-Agent for signed requests (scraping always randomizes)";

        fn parse(value: &str) -> EnvResult<String> {
            parse_non_empty(value, Self::NAME)
        }
    }
}

/// 辅助函数
fn parse_non_empty(value: &str, var_name: &str) -> EnvResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "Value must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_host(value: &str, var_name: &str) -> EnvResult<String> {
    let host = parse_non_empty(value, var_name)?;
    if host.contains("://") || host.contains('/') || host.contains(char::is_whitespace) {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Expected a bare host name, got '{}'", value),
        });
    }
    Ok(host)
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables\n\n");

    docs.push_str("## Core\n\n");
    push_doc::<String, core::LogLevel>(&mut docs);
    push_doc::<bool, core::NoColor>(&mut docs);

    docs.push_str("\n## Tencent Cloud\n\n");
    push_doc::<String, tencent::SecretId>(&mut docs);
    push_doc::<String, tencent::SecretKey>(&mut docs);
    push_doc::<String, tencent::Token>(&mut docs);
    push_doc::<String, tencent::Region>(&mut docs);
    push_doc::<String, tencent::Host>(&mut docs);

    docs.push_str("\n## Reverso\n\n");
    push_doc::<String, reverso::ContextHost>(&mut docs);
    push_doc::<String, reverso::ApiUrl>(&mut docs);
    push_doc::<usize, reverso::MaxWords>(&mut docs);

    docs.push_str("\n## HTTP\n\n");
    push_doc::<Duration, http::Timeout>(&mut docs);
    push_doc::<usize, http::MaxRetries>(&mut docs);
    push_doc::<String, http::UserAgent>(&mut docs);

    docs
}

fn push_doc<T: fmt::Debug, V: EnvVar<T>>(docs: &mut String) {
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        V::NAME,
        V::DESCRIPTION,
        V::DEFAULT
    ));
}
