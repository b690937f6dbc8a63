//! 翻译提供者配置模块
//!
//! 支持配置文件、环境变量和默认值，加载顺序见 [`ConfigManager`]。

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, HttpConfig, ProviderConfig, ReversoConfig, TencentConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 腾讯云机器翻译
    pub const TENCENT_HOST: &str = "tmt.tencentcloudapi.com";
    pub const TENCENT_SERVICE: &str = "tmt";
    pub const TENCENT_REGION: &str = "ap-beijing";
    pub const TENCENT_ACTION: &str = "TextTranslate";
    pub const TENCENT_VERSION: &str = "2018-03-21";
    pub const TENCENT_SOURCE_LANG: &str = "en";
    pub const TENCENT_TARGET_LANG: &str = "zh";

    // Reverso
    pub const REVERSO_CONTEXT_HOST: &str = "context.reverso.net";
    pub const REVERSO_API_URL: &str = "https://api.reverso.net/translate/v1/translation";
    pub const REVERSO_SOURCE_LANG: &str = "english";
    pub const REVERSO_TARGET_LANG: &str = "chinese";
    pub const MAX_WORDS_IN_CONTEXT: usize = 20;

    // HTTP
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const MAX_RETRY_ATTEMPTS_LIMIT: usize = 5;

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "reader-translators.toml",
        ".reader-translators.toml",
        "reader-translators.json",
        "~/.config/reader-translators/config.toml",
        "/etc/reader-translators/config.toml",
    ];

    // .env 文件搜索顺序
    pub const ENV_FILES: &[&str] = &[".env.local", ".env.development", ".env.production", ".env"];
}
