use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::translation::error::TranslationResult;

/// 翻译结果
///
/// 返回给调用方后不再修改。`metadata` 携带提供者特有的信息，阅读器界面可以忽略。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub source_text: String,
    pub translated_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProviderMetadata>,
}

impl Translation {
    pub fn new(source_text: impl Into<String>, translated_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            translated_text: translated_text.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: ProviderMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// 提供者特有的附加信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderMetadata {
    Tencent {
        source: Option<String>,
        target: Option<String>,
        request_id: Option<String>,
    },
    Reverso {
        translations: Vec<WordTranslation>,
        contexts: Vec<TranslationContext>,
    },
}

/// 候选译词及其词性
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordTranslation {
    pub word: String,
    pub pos: String,
}

/// 一组双语例句，强调词以 `<em>…</em>` 标出
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationContext {
    pub original: String,
    pub translation: String,
}

/// 翻译提供者
///
/// 阅读器只依赖这个接口，不关心背后是签名 API 还是网页抓取。
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// 提供者名称，用于日志和命令行输出
    fn name(&self) -> &'static str;

    async fn translate_word(&self, text: &str) -> TranslationResult<Translation>;

    async fn translate_sentence(&self, text: &str) -> TranslationResult<Translation>;
}

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// Parses a Content-Type header value into `(media_type, charset)`
///
/// The media type is lowercased; the charset is empty when not declared.
pub fn parse_content_type(content_type: &str) -> (String, String) {
    let mut parts = content_type.split(';');
    let media_type = parts.next().unwrap_or_default().trim().to_lowercase();

    let charset = parts
        .filter_map(|part| part.split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("charset"))
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .unwrap_or_default();

    (media_type, charset)
}

/// Prints an error message to stderr
pub fn print_error_message(msg: &str, no_color: bool) {
    if no_color {
        eprintln!("{msg}");
    } else {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    }
}

/// Prints an info message to stdout
pub fn print_info_message(msg: &str) {
    println!("{msg}");
}
