//! 翻译提供者模块
//!
//! 两个可以互换的提供者：
//! - **tencent**: 腾讯云机器翻译，TC3-HMAC-SHA256 签名
//! - **reverso**: Reverso 上下文页面抓取与公开句子接口
//!
//! 以及它们共用的部分：
//! - **config**: 配置管理
//! - **error**: 错误处理
//! - **filters**: 例句过滤
//! - **provider**: 提供者选择与装配
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use reader_translators::translation::{build_provider, ConfigManager, ProviderKind};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigManager::new(None)?.into_config();
//! let provider = build_provider(ProviderKind::Reverso, &config)?;
//! let translation = provider.translate_word("bank").await?;
//! println!("{}", translation.translated_text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod filters;
pub mod provider;
pub mod reverso;
pub mod tencent;

pub use config::{ConfigManager, HttpConfig, ProviderConfig, ReversoConfig, TencentConfig};
pub use error::{ErrorCategory, ErrorSeverity, TranslationError, TranslationResult};
pub use filters::ContextFilter;
pub use provider::{build_provider, build_provider_with_transport, ProviderKind};
pub use reverso::{ContextTranslation, ReversoClient, SentenceTranslation};
pub use tencent::TencentClient;
