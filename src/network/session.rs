//! HTTP 会话
//!
//! [`HttpTransport`] 是翻译客户端唯一的网络出口。请求头按给定顺序原样发送，
//! 请求体按原始字节发送，签名覆盖的正是这些字节。

use std::time::Duration;

use async_trait::async_trait;
use encoding_rs::Encoding;
use tracing::debug;

use crate::core::parse_content_type;
use crate::translation::error::{helpers, TranslationError, TranslationResult};

/// 请求方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// 一次出站请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// 按名称查找请求头（忽略大小写）
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// 收到的响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// `Content-Type` 中声明的字符集，未声明时为空字符串
    pub fn charset(&self) -> String {
        self.header("content-type")
            .map(|content_type| parse_content_type(content_type).1)
            .unwrap_or_default()
    }

    /// 按声明的字符集解码响应体，无法识别时按 UTF-8 有损解码
    pub fn text(&self) -> String {
        let charset = self.charset();
        match Encoding::for_label(charset.as_bytes()) {
            Some(encoding) if !charset.is_empty() => {
                let (text, _, _) = encoding.decode(&self.body);
                text.into_owned()
            }
            _ => String::from_utf8_lossy(&self.body).into_owned(),
        }
    }
}

/// 网络传输
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> TranslationResult<HttpResponse>;
}

/// 会话选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// 零表示不设超时
    pub timeout: Duration,
    /// 未在请求中显式设置 User-Agent 时使用
    pub user_agent: Option<String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

/// 基于 reqwest 的 HTTP 会话
#[derive(Debug, Clone)]
pub struct Session {
    client: reqwest::Client,
    options: SessionOptions,
}

impl Session {
    pub fn new(options: SessionOptions) -> TranslationResult<Self> {
        let mut builder = reqwest::Client::builder();
        if !options.timeout.is_zero() {
            builder = builder.timeout(options.timeout);
        }
        if let Some(user_agent) = &options.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        let client = builder
            .build()
            .map_err(|e| helpers::config_error(format!("创建HTTP客户端失败: {}", e)))?;

        Ok(Self { client, options })
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }
}

#[async_trait]
impl HttpTransport for Session {
    async fn send(&self, request: HttpRequest) -> TranslationResult<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        debug!(method = request.method.as_str(), url = %request.url, "发送请求");
        let response = builder
            .send()
            .await
            .map_err(|e| TranslationError::from(e).with_context(&request.url))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_uses_declared_charset() {
        let (bytes, _, _) = encoding_rs::GBK.encode("银行");
        let response = HttpResponse::new(200, bytes.into_owned())
            .with_header("Content-Type", "text/html; charset=GBK");
        assert_eq!(response.charset(), "GBK");
        assert_eq!(response.text(), "银行");
    }

    #[test]
    fn test_response_text_falls_back_to_utf8() {
        let response = HttpResponse::new(200, "bank".as_bytes())
            .with_header("content-type", "text/html; charset=not-a-charset");
        assert_eq!(response.text(), "bank");
        assert_eq!(HttpResponse::new(200, vec![0x62, 0xff]).text(), "b\u{fffd}");
    }

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::new(200, Vec::new()).is_success());
        assert!(HttpResponse::new(204, Vec::new()).is_success());
        assert!(!HttpResponse::new(301, Vec::new()).is_success());
        assert!(!HttpResponse::new(403, Vec::new()).is_success());
    }

    #[test]
    fn test_request_builder_keeps_header_order() {
        let request = HttpRequest::post("https://example.com/", b"{}".to_vec())
            .header("B", "2")
            .headers(vec![("A", "1"), ("C", "3")]);
        let names: Vec<&str> = request.headers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(request.header_value("a"), Some("1"));
        assert_eq!(request.method.as_str(), "POST");
    }

    #[test]
    fn test_session_builds_with_zero_timeout() {
        let session = Session::new(SessionOptions {
            timeout: Duration::ZERO,
            user_agent: Some("reader-translators-test".to_string()),
        })
        .unwrap();
        assert!(session.options().timeout.is_zero());
    }
}
