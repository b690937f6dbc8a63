//! 翻译提供者的选择与装配

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{ProviderMetadata, Translation, TranslationProvider};
use crate::network::{HttpTransport, Session, SessionOptions};
use crate::translation::config::ProviderConfig;
use crate::translation::error::{TranslationError, TranslationResult};
use crate::translation::reverso::ReversoClient;
use crate::translation::tencent::TencentClient;

/// 可选的提供者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    Tencent,
    #[default]
    Reverso,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Tencent => "tencent",
            ProviderKind::Reverso => "reverso",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = TranslationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "tencent" | "tmt" => Ok(ProviderKind::Tencent),
            "reverso" => Ok(ProviderKind::Reverso),
            other => Err(TranslationError::ConfigError(format!(
                "未知的翻译提供者 '{}'，可选: tencent, reverso",
                other
            ))),
        }
    }
}

/// 按配置创建提供者，使用真实的 HTTP 会话
pub fn build_provider(
    kind: ProviderKind,
    config: &ProviderConfig,
) -> TranslationResult<Arc<dyn TranslationProvider>> {
    let session = Session::new(SessionOptions {
        timeout: config.http.timeout(),
        user_agent: config.http.user_agent.clone(),
    })?;
    build_provider_with_transport(kind, config, Arc::new(session))
}

/// 按配置创建提供者，使用给定的传输层
pub fn build_provider_with_transport(
    kind: ProviderKind,
    config: &ProviderConfig,
    transport: Arc<dyn HttpTransport>,
) -> TranslationResult<Arc<dyn TranslationProvider>> {
    let provider: Arc<dyn TranslationProvider> = match kind {
        ProviderKind::Tencent => Arc::new(
            TencentClient::from_config(transport, &config.tencent)?
                .with_max_retries(config.http.max_retry_attempts),
        ),
        ProviderKind::Reverso => Arc::new(ReversoClient::new(transport, config.reverso.clone())),
    };
    Ok(provider)
}

#[async_trait]
impl TranslationProvider for TencentClient {
    fn name(&self) -> &'static str {
        ProviderKind::Tencent.as_str()
    }

    async fn translate_word(&self, text: &str) -> TranslationResult<Translation> {
        let config = self.config();
        self.translate(text, &config.source_lang, &config.target_lang, config.project_id)
            .await
    }

    async fn translate_sentence(&self, text: &str) -> TranslationResult<Translation> {
        self.translate_word(text).await
    }
}

#[async_trait]
impl TranslationProvider for ReversoClient {
    fn name(&self) -> &'static str {
        ProviderKind::Reverso.as_str()
    }

    /// 译文为候选译词以 `", "` 连接，例句放在元数据里
    async fn translate_word(&self, text: &str) -> TranslationResult<Translation> {
        let config = self.config();
        let context = self
            .fetch_context(text, &config.source_lang, &config.target_lang)
            .await?;

        let translated_text = context
            .translations
            .iter()
            .map(|translation| translation.word.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Ok(
            Translation::new(context.original, translated_text).with_metadata(
                ProviderMetadata::Reverso {
                    translations: context.translations,
                    contexts: context.contexts,
                },
            ),
        )
    }

    async fn translate_sentence(&self, text: &str) -> TranslationResult<Translation> {
        let config = self.config();
        let sentence = self
            .fetch_translation_api(text, &config.source_lang, &config.target_lang)
            .await?;
        Ok(Translation::new(sentence.original, sentence.translation))
    }
}
