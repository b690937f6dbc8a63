//! Reverso 客户端集成测试

use reader_translators::core::{TranslationContext, WordTranslation};
use reader_translators::network::{HttpMethod, HttpResponse};
use reader_translators::translation::{ReversoClient, ReversoConfig, TranslationError};

mod common {
    include!("common/mod.rs");
}

use common::{html_response, MockTransport, BANK_PAGE};

#[tokio::test]
async fn test_fetch_context_end_to_end() {
    let transport = MockTransport::new()
        .with_response(html_response(BANK_PAGE))
        .shared();
    let client = ReversoClient::new(transport.clone(), ReversoConfig::default());

    let context = client.fetch_context("bank", "english", "chinese").await.unwrap();

    assert_eq!(context.original, "bank");
    assert_eq!(
        context.translations,
        vec![
            WordTranslation {
                word: "银行".to_string(),
                pos: "noun".to_string(),
            },
            WordTranslation {
                word: "存".to_string(),
                pos: "verb".to_string(),
            },
        ]
    );
    assert_eq!(
        context.contexts,
        vec![TranslationContext {
            original: "She works at a <em>bank</em>.".to_string(),
            translation: "她在<em>银行</em>工作。".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_context_request_url_and_headers() {
    let transport = MockTransport::new()
        .with_response(html_response(BANK_PAGE))
        .shared();
    let client = ReversoClient::new(transport.clone(), ReversoConfig::default());

    client
        .fetch_context("river bank", "english", "chinese")
        .await
        .unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(
        request.url,
        "https://context.reverso.net/translation/english-chinese/river%20bank"
    );
    assert!(request.body.is_none());
    assert!(!request.header_value("User-Agent").unwrap_or_default().is_empty());
    assert_eq!(request.header_value("Accept"), Some("*/*"));
    assert_eq!(request.header_value("Connection"), Some("keep-alive"));
}

#[tokio::test]
async fn test_context_max_words_is_configurable() {
    let transport = MockTransport::new()
        .with_response(html_response(BANK_PAGE))
        .shared();
    let config = ReversoConfig {
        max_words_in_context: 30,
        ..ReversoConfig::default()
    };
    let context = ReversoClient::new(transport, config)
        .fetch_context("bank", "english", "chinese")
        .await
        .unwrap();

    assert_eq!(context.contexts.len(), 2);
    assert_eq!(context.contexts[1].translation, "<em>银行</em>批准了贷款。");
}

#[tokio::test]
async fn test_context_page_in_declared_charset() {
    let (encoded, _, _) = encoding_rs::GBK.encode(BANK_PAGE);
    let response = HttpResponse::new(200, encoded.into_owned())
        .with_header("Content-Type", "text/html; charset=gbk");
    let transport = MockTransport::new().with_response(response).shared();

    let context = ReversoClient::new(transport, ReversoConfig::default())
        .fetch_context("bank", "english", "chinese")
        .await
        .unwrap();

    assert_eq!(context.translations[0].word, "银行");
    assert_eq!(context.contexts.len(), 1);
}

#[tokio::test]
async fn test_context_non_success_status() {
    let transport = MockTransport::new()
        .with_response(HttpResponse::new(429, "slow down"))
        .shared();
    let result = ReversoClient::new(transport, ReversoConfig::default())
        .fetch_context("bank", "english", "chinese")
        .await;

    assert_eq!(result, Err(TranslationError::RemoteRejectedError { status: 429 }));
}

#[tokio::test]
async fn test_network_errors_propagate_as_transport_errors() {
    let transport = MockTransport::new()
        .with_error(TranslationError::TransportError("connection reset".to_string()))
        .with_error(TranslationError::TransportError("connection reset".to_string()))
        .shared();
    let client = ReversoClient::new(transport.clone(), ReversoConfig::default());

    let context = client.fetch_context("bank", "english", "chinese").await;
    assert_eq!(
        context,
        Err(TranslationError::TransportError("connection reset".to_string()))
    );

    let sentence = client
        .fetch_translation_api("The bank is closed.", "english", "chinese")
        .await;
    assert_eq!(
        sentence,
        Err(TranslationError::TransportError("connection reset".to_string()))
    );
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn test_context_page_without_results() {
    let transport = MockTransport::new()
        .with_response(html_response("<html><body><p>No results</p></body></html>"))
        .shared();
    let context = ReversoClient::new(transport, ReversoConfig::default())
        .fetch_context("qwxz", "english", "chinese")
        .await
        .unwrap();

    assert!(context.translations.is_empty());
    assert!(context.contexts.is_empty());
}

#[tokio::test]
async fn test_sentence_api_request_body() {
    let transport = MockTransport::new()
        .with_response(HttpResponse::new(200, r#"{"translation":["银行关门了。"]}"#))
        .shared();
    let client = ReversoClient::new(transport.clone(), ReversoConfig::default());

    let sentence = client
        .fetch_translation_api("The bank is closed.", "english", "chinese")
        .await
        .unwrap();
    assert_eq!(sentence.original, "The bank is closed.");
    assert_eq!(sentence.translation, "银行关门了。");

    let request = &transport.requests()[0];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.url, "https://api.reverso.net/translate/v1/translation");
    assert_eq!(request.header_value("Content-Type"), Some("application/json"));

    let body: serde_json::Value = serde_json::from_slice(request.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["format"], "text");
    assert_eq!(body["from"], "eng");
    assert_eq!(body["to"], "chi");
    assert_eq!(body["input"], "The bank is closed.");
    assert_eq!(body["options"]["origin"], "reversomobile");
    assert_eq!(body["options"]["sentenceSplitter"], false);
    assert_eq!(body["options"]["contextResults"], true);
    assert_eq!(body["options"]["languageDetection"], true);
}

#[tokio::test]
async fn test_sentence_api_translation_shapes() {
    let transport = MockTransport::new()
        .with_response(HttpResponse::new(200, r#"{"translation":"银行"}"#))
        .with_response(HttpResponse::new(200, r#"{"translation":["银行","河岸"]}"#))
        .with_response(HttpResponse::new(200, r#"{"sources":[]}"#))
        .with_response(HttpResponse::new(200, "<html>"))
        .shared();
    let client = ReversoClient::new(transport, ReversoConfig::default());

    let single = client.fetch_translation_api("bank", "english", "chinese").await;
    assert_eq!(single.unwrap().translation, "银行");

    let joined = client.fetch_translation_api("bank", "english", "chinese").await;
    assert_eq!(joined.unwrap().translation, "银行,河岸");

    for _ in 0..2 {
        let result = client.fetch_translation_api("bank", "english", "chinese").await;
        assert!(matches!(
            result,
            Err(TranslationError::MalformedResponseError(_))
        ));
    }
}
