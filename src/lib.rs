//! # Reader Translators
//!
//! 电子书阅读器的翻译提供者层：签名的云 API 客户端和上下文页面抓取客户端。
//!
//! ## 模块组织
//!
//! - `core` - 翻译结果类型和 `TranslationProvider` 接口
//! - `signing` - TC3-HMAC-SHA256 请求签名
//! - `parsers` - HTML 解析、节点谓词和文本提取
//! - `network` - HTTP 传输和会话
//! - `translation` - 两个提供者、配置、错误和例句过滤
//! - `env` - 类型安全的环境变量

pub mod core;
pub mod env;
pub mod network;
pub mod parsers;
pub mod signing;
pub mod translation;

// Re-export commonly used items for convenience
pub use crate::core::{
    ProviderMetadata, Translation, TranslationContext, TranslationProvider, WordTranslation,
};
pub use translation::{TranslationError, TranslationResult};
