//! 腾讯云机器翻译客户端
//!
//! 每次调用：序列化一次请求体 → 读一次时钟 → 签名 → POST。签名覆盖的字节就是发送的字节。
//! 默认不重试；配置了重试时，每次重试都重新读时钟并重新签名。

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{ProviderMetadata, Translation};
use crate::network::{HttpRequest, HttpResponse, HttpTransport};
use crate::signing::{Clock, CloudApiSigner, Credentials, SignedRequest, SigningContext, SystemClock};
use crate::translation::config::TencentConfig;
use crate::translation::error::{helpers, TranslationError, TranslationResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TextTranslateRequest<'a> {
    source_text: &'a str,
    source: &'a str,
    target: &'a str,
    project_id: i64,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: Option<ResponseBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseBody {
    target_text: Option<String>,
    source: Option<String>,
    target: Option<String>,
    request_id: Option<String>,
    error: Option<ServiceErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ServiceErrorBody {
    code: String,
    message: String,
}

/// 腾讯云机器翻译客户端
pub struct TencentClient {
    transport: Arc<dyn HttpTransport>,
    signer: CloudApiSigner,
    credentials: Credentials,
    config: TencentConfig,
    clock: Arc<dyn Clock>,
    max_retry_attempts: usize,
}

impl TencentClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        credentials: Credentials,
        config: TencentConfig,
    ) -> Self {
        Self {
            transport,
            signer: CloudApiSigner::default(),
            credentials,
            config,
            clock: Arc::new(SystemClock),
            max_retry_attempts: 0,
        }
    }

    /// 从配置创建客户端，缺少凭证时在这里失败而不是在第一次调用时
    pub fn from_config(
        transport: Arc<dyn HttpTransport>,
        config: &TencentConfig,
    ) -> TranslationResult<Self> {
        let credentials = config.credentials()?;
        Ok(Self::new(transport, credentials, config.clone()))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_max_retries(mut self, max_retry_attempts: usize) -> Self {
        self.max_retry_attempts = max_retry_attempts;
        self
    }

    pub fn config(&self) -> &TencentConfig {
        &self.config
    }

    /// 请求体字节，字段顺序固定为 `SourceText, Source, Target, ProjectId`
    pub fn build_payload(
        text: &str,
        source: &str,
        target: &str,
        project_id: i64,
    ) -> TranslationResult<Vec<u8>> {
        serde_json::to_vec(&TextTranslateRequest {
            source_text: text,
            source,
            target,
            project_id,
        })
        .map_err(|e| TranslationError::EncodingError(format!("请求体序列化失败: {}", e)))
    }

    pub fn signing_context(&self, timestamp: i64) -> SigningContext {
        SigningContext {
            timestamp,
            service: self.config.service.clone(),
            region: self.config.region.clone(),
            host: self.config.host.clone(),
            action: self.config.action.clone(),
            api_version: self.config.version.clone(),
        }
    }

    /// 用给定时间戳为请求体签名
    pub fn sign(&self, payload: &[u8], timestamp: i64) -> TranslationResult<SignedRequest> {
        self.signer
            .sign_request(&self.credentials, &self.signing_context(timestamp), payload)
    }

    /// 翻译一段文本
    pub async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
        project_id: i64,
    ) -> TranslationResult<Translation> {
        let payload = Self::build_payload(text, source, target, project_id)?;
        let response = self.send_signed(&payload).await?;

        info!(
            host = %self.config.host,
            action = %self.config.action,
            status = response.status,
            "腾讯云翻译请求完成"
        );

        if !response.is_success() {
            return helpers::log_error(TranslationError::RemoteRejectedError {
                status: response.status,
            });
        }

        decode_response(text, &response.body)
    }

    async fn send_signed(&self, payload: &[u8]) -> TranslationResult<HttpResponse> {
        let mut attempt = 0;
        loop {
            let signed = self.sign(payload, self.clock.now_unix())?;
            let request =
                HttpRequest::post(self.config.endpoint(), payload.to_vec()).headers(signed.headers);

            match self.transport.send(request).await {
                Ok(response) => return Ok(response),
                Err(error) if error.is_retryable() && attempt < self.max_retry_attempts => {
                    attempt += 1;
                    warn!(
                        "腾讯云请求失败，重新签名后重试 ({}/{}): {}",
                        attempt, self.max_retry_attempts, error
                    );
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// 解析响应信封 `{"Response": {...}}`
pub fn decode_response(source_text: &str, body: &[u8]) -> TranslationResult<Translation> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    let response = envelope.response.ok_or_else(|| {
        helpers::malformed_response("响应中缺少 Response 对象")
    })?;

    if let Some(error) = response.error {
        return Err(TranslationError::ServiceError {
            code: error.code,
            message: error.message,
            request_id: response.request_id,
        });
    }

    let translated_text = response.target_text.ok_or_else(|| {
        helpers::malformed_response("响应中缺少 TargetText 字段")
    })?;

    Ok(
        Translation::new(source_text, translated_text).with_metadata(ProviderMetadata::Tencent {
            source: response.source,
            target: response.target,
            request_id: response.request_id,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_field_order_is_fixed() {
        let payload = TencentClient::build_payload("bank", "en", "zh", 0).unwrap();
        assert_eq!(
            String::from_utf8(payload).unwrap(),
            r#"{"SourceText":"bank","Source":"en","Target":"zh","ProjectId":0}"#
        );
    }

    #[test]
    fn test_payload_escapes_quotes_and_keeps_unicode() {
        let payload = TencentClient::build_payload("say \"银行\"", "en", "zh", 7).unwrap();
        assert_eq!(
            String::from_utf8(payload).unwrap(),
            r#"{"SourceText":"say \"银行\"","Source":"en","Target":"zh","ProjectId":7}"#
        );
    }

    #[test]
    fn test_decode_success_envelope() {
        let body = r#"{"Response":{"TargetText":"银行","Source":"en","Target":"zh","RequestId":"req-1"}}"#;
        let translation = decode_response("bank", body.as_bytes()).unwrap();
        assert_eq!(translation.source_text, "bank");
        assert_eq!(translation.translated_text, "银行");
        assert_eq!(
            translation.metadata,
            Some(ProviderMetadata::Tencent {
                source: Some("en".to_string()),
                target: Some("zh".to_string()),
                request_id: Some("req-1".to_string()),
            })
        );
    }

    #[test]
    fn test_decode_service_error() {
        let body = br#"{"Response":{"Error":{"Code":"AuthFailure.SignatureFailure","Message":"bad signature"},"RequestId":"req-2"}}"#;
        assert_eq!(
            decode_response("bank", body),
            Err(TranslationError::ServiceError {
                code: "AuthFailure.SignatureFailure".to_string(),
                message: "bad signature".to_string(),
                request_id: Some("req-2".to_string()),
            })
        );
    }

    #[test]
    fn test_decode_malformed_envelopes() {
        for body in [
            br#"{"Response":{"RequestId":"req-3"}}"#.as_slice(),
            br#"{"Other":{}}"#.as_slice(),
            b"not json".as_slice(),
        ] {
            assert!(matches!(
                decode_response("bank", body),
                Err(TranslationError::MalformedResponseError(_))
            ));
        }
    }
}
