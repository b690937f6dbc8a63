//! 例句过滤器模块
//!
//! 判断抓取到的双语例句是否值得展示：译文中的强调词必须是提取到的候选译词之一，
//! 且原文和译文都不能太长。

use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::core::{TranslationContext, WordTranslation};
use crate::translation::config::constants;

/// 例句过滤器
#[derive(Debug)]
pub struct ContextFilter {
    /// 原文或译文允许的最大词数
    max_words: usize,
    /// 缓存的正则表达式
    regex_cache: RegexCache,
}

/// 正则表达式缓存
#[derive(Debug, Default)]
struct RegexCache {
    emphasis_regex: OnceLock<Regex>,
    markup_regex: OnceLock<Regex>,
}

impl ContextFilter {
    /// 创建新的例句过滤器
    pub fn new(max_words: usize) -> Self {
        Self {
            max_words,
            regex_cache: RegexCache::default(),
        }
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }

    /// 保留通过校验的例句，保持原有顺序
    pub fn filter(
        &self,
        contexts: Vec<TranslationContext>,
        translations: &[WordTranslation],
    ) -> Vec<TranslationContext> {
        let total = contexts.len();
        let kept: Vec<TranslationContext> = contexts
            .into_iter()
            .filter(|context| self.is_valid(context, translations))
            .collect();

        if kept.len() < total {
            warn!("丢弃了 {} 条例句（共 {} 条）", total - kept.len(), total);
        }

        kept
    }

    /// 判断单条例句是否有效
    pub fn is_valid(&self, context: &TranslationContext, translations: &[WordTranslation]) -> bool {
        let emphasized = self.extract_emphasis(&context.translation).to_lowercase();
        let has_matching_translation = translations
            .iter()
            .any(|translation| translation.word.to_lowercase() == emphasized);

        has_matching_translation
            && self.count_words(&context.original) <= self.max_words
            && self.count_words(&context.translation) <= self.max_words
    }

    /// 第一个 `<em>…</em>` 中的内容，没有强调时为空字符串
    pub fn extract_emphasis<'a>(&self, text: &'a str) -> &'a str {
        let emphasis_regex = self.regex_cache.emphasis_regex.get_or_init(|| {
            Regex::new(r"<em>(.*?)</em>").expect("emphasis pattern is valid")
        });

        emphasis_regex
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map_or("", |m| m.as_str())
    }

    /// 去掉标签后按空白切分的非空词数
    pub fn count_words(&self, text: &str) -> usize {
        self.strip_markup(text).split_whitespace().count()
    }

    /// 去掉所有 `<…>` 标签
    pub fn strip_markup<'a>(&self, text: &'a str) -> std::borrow::Cow<'a, str> {
        let markup_regex = self
            .regex_cache
            .markup_regex
            .get_or_init(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));

        markup_regex.replace_all(text, "")
    }
}

impl Default for ContextFilter {
    fn default() -> Self {
        Self::new(constants::MAX_WORDS_IN_CONTEXT)
    }
}
