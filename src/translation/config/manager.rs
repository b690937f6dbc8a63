//! 配置管理器
//!
//! 加载顺序：`.env` 文件 → 配置文件（显式路径或 `CONFIG_PATHS` 中第一个存在的文件）
//! → 环境变量覆盖 → 校验。

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::env::{self, EnvVar};
use crate::signing::Credentials;
use crate::translation::error::{TranslationError, TranslationResult};

/// 腾讯云机器翻译配置
///
/// 密钥可以从配置文件读入，但永远不会被序列化。
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TencentConfig {
    #[serde(skip_serializing)]
    pub secret_id: Option<String>,
    #[serde(skip_serializing)]
    pub secret_key: Option<String>,
    #[serde(skip_serializing)]
    pub token: Option<String>,

    pub host: String,
    pub service: String,
    /// 为空时不发送 `X-TC-Region`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub action: String,
    pub version: String,
    pub project_id: i64,
    pub source_lang: String,
    pub target_lang: String,
}

impl Default for TencentConfig {
    fn default() -> Self {
        Self {
            secret_id: None,
            secret_key: None,
            token: None,
            host: constants::TENCENT_HOST.to_string(),
            service: constants::TENCENT_SERVICE.to_string(),
            region: Some(constants::TENCENT_REGION.to_string()),
            action: constants::TENCENT_ACTION.to_string(),
            version: constants::TENCENT_VERSION.to_string(),
            project_id: 0,
            source_lang: constants::TENCENT_SOURCE_LANG.to_string(),
            target_lang: constants::TENCENT_TARGET_LANG.to_string(),
        }
    }
}

impl fmt::Debug for TencentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("TencentConfig")
            .field("secret_id", &self.secret_id)
            .field("secret_key", &redacted(&self.secret_key))
            .field("token", &redacted(&self.token))
            .field("host", &self.host)
            .field("service", &self.service)
            .field("region", &self.region)
            .field("action", &self.action)
            .field("version", &self.version)
            .field("project_id", &self.project_id)
            .field("source_lang", &self.source_lang)
            .field("target_lang", &self.target_lang)
            .finish()
    }
}

impl TencentConfig {
    /// 构造签名凭证，缺少 SecretId 或 SecretKey 时失败
    pub fn credentials(&self) -> TranslationResult<Credentials> {
        let secret_id = non_empty(&self.secret_id).ok_or_else(|| {
            TranslationError::MissingCredentialsError(format!(
                "未配置 SecretId（设置 {} 或 tencent.secret_id）",
                env::tencent::SecretId::NAME
            ))
        })?;
        let secret_key = non_empty(&self.secret_key).ok_or_else(|| {
            TranslationError::MissingCredentialsError(format!(
                "未配置 SecretKey（设置 {} 或 tencent.secret_key）",
                env::tencent::SecretKey::NAME
            ))
        })?;

        let credentials = Credentials::new(secret_id, secret_key);
        Ok(match non_empty(&self.token) {
            Some(token) => credentials.with_session_token(token),
            None => credentials,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("https://{}/", self.host)
    }
}

/// Reverso 配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReversoConfig {
    pub context_host: String,
    pub api_url: String,
    pub source_lang: String,
    pub target_lang: String,
    pub max_words_in_context: usize,
}

impl Default for ReversoConfig {
    fn default() -> Self {
        Self {
            context_host: constants::REVERSO_CONTEXT_HOST.to_string(),
            api_url: constants::REVERSO_API_URL.to_string(),
            source_lang: constants::REVERSO_SOURCE_LANG.to_string(),
            target_lang: constants::REVERSO_TARGET_LANG.to_string(),
            max_words_in_context: constants::MAX_WORDS_IN_CONTEXT,
        }
    }
}

/// HTTP 配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 零表示不设超时
    pub timeout_secs: u64,
    /// 仅作用于签名请求，且只在网络错误时重试
    pub max_retry_attempts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: constants::DEFAULT_TIMEOUT.as_secs(),
            max_retry_attempts: 0,
            user_agent: None,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 全部提供者的配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub tencent: TencentConfig,
    pub reverso: ReversoConfig,
    pub http: HttpConfig,
}

impl ProviderConfig {
    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        for (field, value) in [
            ("tencent.host", &self.tencent.host),
            ("tencent.service", &self.tencent.service),
            ("tencent.action", &self.tencent.action),
            ("tencent.version", &self.tencent.version),
            ("tencent.source_lang", &self.tencent.source_lang),
            ("tencent.target_lang", &self.tencent.target_lang),
            ("reverso.context_host", &self.reverso.context_host),
            ("reverso.source_lang", &self.reverso.source_lang),
            ("reverso.target_lang", &self.reverso.target_lang),
        ] {
            if value.trim().is_empty() {
                return Err(TranslationError::ConfigError(format!("{} 不能为空", field)));
            }
        }

        for (field, host) in [
            ("tencent.host", &self.tencent.host),
            ("reverso.context_host", &self.reverso.context_host),
        ] {
            if host.contains('/') || host.contains(char::is_whitespace) {
                return Err(TranslationError::ConfigError(format!(
                    "{} 必须是不含协议、路径和空白的主机名: '{}'",
                    field, host
                )));
            }
        }

        let api_url = url::Url::parse(&self.reverso.api_url).map_err(|e| {
            TranslationError::ConfigError(format!(
                "reverso.api_url 无效 '{}': {}",
                self.reverso.api_url, e
            ))
        })?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(TranslationError::ConfigError(
                "reverso.api_url 必须以 http:// 或 https:// 开头".to_string(),
            ));
        }

        if self.reverso.max_words_in_context == 0 {
            return Err(TranslationError::ConfigError(
                "例句最大词数不能为0".to_string(),
            ));
        }

        if self.http.max_retry_attempts > constants::MAX_RETRY_ATTEMPTS_LIMIT {
            return Err(TranslationError::ConfigError(format!(
                "重试次数不能超过 {}",
                constants::MAX_RETRY_ATTEMPTS_LIMIT
            )));
        }

        Ok(())
    }

    /// 应用环境变量覆盖
    ///
    /// 只覆盖已设置的变量；值无法解析时返回 `ConfigError`。
    pub fn apply_env_overrides(&mut self) -> TranslationResult<()> {
        use crate::env::{http, reverso, tencent};

        if let Some(secret_id) = env_override::<String, tencent::SecretId>()? {
            self.tencent.secret_id = Some(secret_id);
        }
        if let Some(secret_key) = env_override::<String, tencent::SecretKey>()? {
            self.tencent.secret_key = Some(secret_key);
        }
        if let Some(token) = env_override::<String, tencent::Token>()? {
            self.tencent.token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(region) = env_override::<String, tencent::Region>()? {
            self.tencent.region = Some(region).filter(|r| !r.is_empty());
        }
        if let Some(host) = env_override::<String, tencent::Host>()? {
            tracing::info!("环境变量覆盖腾讯云主机: {}", host);
            self.tencent.host = host;
        }

        if let Some(context_host) = env_override::<String, reverso::ContextHost>()? {
            self.reverso.context_host = context_host;
        }
        if let Some(api_url) = env_override::<String, reverso::ApiUrl>()? {
            tracing::info!("环境变量覆盖 Reverso API URL: {}", api_url);
            self.reverso.api_url = api_url;
        }
        if let Some(max_words) = env_override::<usize, reverso::MaxWords>()? {
            self.reverso.max_words_in_context = max_words;
        }

        if let Some(timeout) = env_override::<Duration, http::Timeout>()? {
            self.http.timeout_secs = timeout.as_secs();
        }
        if let Some(retries) = env_override::<usize, http::MaxRetries>()? {
            self.http.max_retry_attempts = retries;
        }
        if let Some(user_agent) = env_override::<String, http::UserAgent>()? {
            self.http.user_agent = Some(user_agent);
        }

        Ok(())
    }
}

fn env_override<T, V: EnvVar<T>>() -> TranslationResult<Option<T>> {
    V::get_if_set().map_err(|e| TranslationError::ConfigError(e.to_string()))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 配置管理器
pub struct ConfigManager {
    config: ProviderConfig,
}

impl ConfigManager {
    /// 按完整的加载顺序创建配置管理器
    pub fn new(explicit_path: Option<&Path>) -> TranslationResult<Self> {
        Self::load_dotenv();

        let mut config = match explicit_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_config()?,
        };
        config.apply_env_overrides()?;
        config.validate()?;

        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn into_config(self) -> ProviderConfig {
        self.config
    }

    /// 在搜索路径中查找配置文件
    fn load_config() -> TranslationResult<ProviderConfig> {
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            let candidate = Path::new(expanded_path.as_ref());
            if candidate.exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(candidate);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(ProviderConfig::default())
    }

    /// 从指定文件加载配置，`.json` 按 JSON 解析，其余按 TOML 解析
    pub fn load_from_file(path: &Path) -> TranslationResult<ProviderConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TranslationError::ConfigError(format!("读取配置文件失败 {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析JSON配置失败: {}", e)))
        } else {
            toml::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析TOML配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        for env_file in constants::ENV_FILES {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &Path) -> TranslationResult<()> {
        let config = ProviderConfig::default();
        let body = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))?;
        let content = format!(
            "# reader-translators 配置\n#\n# 密钥请通过环境变量 {} / {} 提供，\n# 也可以在 [tencent] 中填写 secret_id / secret_key（不会被写回文件）。\n\n{}",
            env::tencent::SecretId::NAME,
            env::tencent::SecretKey::NAME,
            body
        );

        std::fs::write(path, content).map_err(|e| {
            TranslationError::ConfigError(format!("写入配置文件失败 {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}
