//! 提供者接口集成测试
//!
//! 两个提供者通过同一个 `TranslationProvider` 接口使用

use reader_translators::core::{ProviderMetadata, TranslationProvider};
use reader_translators::network::HttpResponse;
use reader_translators::translation::{
    build_provider_with_transport, ProviderConfig, ProviderKind, TranslationError,
};

mod common {
    include!("common/mod.rs");
}

use common::{html_response, tencent_config, tencent_success_body, MockTransport, BANK_PAGE};

#[tokio::test]
async fn test_reverso_word_joins_translations() {
    let transport = MockTransport::new()
        .with_response(html_response(BANK_PAGE))
        .shared();
    let provider =
        build_provider_with_transport(ProviderKind::Reverso, &ProviderConfig::default(), transport)
            .unwrap();

    let translation = provider.translate_word("bank").await.unwrap();
    assert_eq!(provider.name(), "reverso");
    assert_eq!(translation.source_text, "bank");
    assert_eq!(translation.translated_text, "银行, 存");

    match translation.metadata {
        Some(ProviderMetadata::Reverso {
            translations,
            contexts,
        }) => {
            assert_eq!(translations.len(), 2);
            assert_eq!(contexts.len(), 1);
        }
        other => panic!("unexpected metadata: {:?}", other),
    }
}

#[tokio::test]
async fn test_reverso_sentence_uses_translation_api() {
    let transport = MockTransport::new()
        .with_response(HttpResponse::new(200, r#"{"translation":["银行关门了。"]}"#))
        .shared();
    let provider = build_provider_with_transport(
        ProviderKind::Reverso,
        &ProviderConfig::default(),
        transport.clone(),
    )
    .unwrap();

    let translation = provider.translate_sentence("The bank is closed.").await.unwrap();
    assert_eq!(translation.translated_text, "银行关门了。");
    assert_eq!(translation.metadata, None);
    assert!(transport.requests()[0].url.starts_with("https://api.reverso.net/"));
}

#[tokio::test]
async fn test_tencent_uses_configured_languages_and_project() {
    let mut config = ProviderConfig::default();
    config.tencent = tencent_config();
    config.tencent.source_lang = "fr".to_string();
    config.tencent.target_lang = "en".to_string();
    config.tencent.project_id = 42;

    let transport = MockTransport::new()
        .with_response(tencent_success_body("bank"))
        .shared();
    let provider =
        build_provider_with_transport(ProviderKind::Tencent, &config, transport.clone()).unwrap();

    let translation = provider.translate_sentence("banque").await.unwrap();
    assert_eq!(provider.name(), "tencent");
    assert_eq!(translation.source_text, "banque");
    assert_eq!(translation.translated_text, "bank");

    let body = transport.requests()[0].body.clone().unwrap();
    assert_eq!(
        String::from_utf8(body).unwrap(),
        r#"{"SourceText":"banque","Source":"fr","Target":"en","ProjectId":42}"#
    );
}

#[tokio::test]
async fn test_tencent_retry_setting_comes_from_http_config() {
    let mut config = ProviderConfig::default();
    config.tencent = tencent_config();
    config.http.max_retry_attempts = 1;

    let transport = MockTransport::new()
        .with_error(TranslationError::TransportError("timeout".to_string()))
        .with_response(tencent_success_body("银行"))
        .shared();
    let provider =
        build_provider_with_transport(ProviderKind::Tencent, &config, transport.clone()).unwrap();

    let translation = provider.translate_word("bank").await.unwrap();
    assert_eq!(translation.translated_text, "银行");
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn test_tencent_without_credentials_is_rejected() {
    let transport = MockTransport::new().shared();
    let result = build_provider_with_transport(
        ProviderKind::Tencent,
        &ProviderConfig::default(),
        transport.clone(),
    );
    assert!(matches!(
        result,
        Err(TranslationError::MissingCredentialsError(_))
    ));
    assert_eq!(transport.request_count(), 0);
}
