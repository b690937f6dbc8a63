// 集成测试公共模块
//
// 提供内存中的传输层、可控时钟和页面样本，所有测试都不访问网络

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use reader_translators::network::{HttpRequest, HttpResponse, HttpTransport};
use reader_translators::signing::Clock;
use reader_translators::translation::error::helpers;
use reader_translators::translation::{TencentConfig, TranslationError, TranslationResult};

/// 记录请求并按顺序返回预设响应的传输层
#[derive(Default)]
pub struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<TranslationResult<HttpResponse>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, response: HttpResponse) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn with_error(self, error: TranslationError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> TranslationResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(helpers::transport_error("没有预设的响应")))
    }
}

/// 每读一次前进一秒的时钟
pub struct SteppingClock(AtomicI64);

impl SteppingClock {
    pub fn starting_at(timestamp: i64) -> Self {
        Self(AtomicI64::new(timestamp))
    }
}

impl Clock for SteppingClock {
    fn now_unix(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

pub const TEST_SECRET_ID: &str = "AKIDEXAMPLE";
pub const TEST_SECRET_KEY: &str = "SECRETEXAMPLE";
pub const BANK_PAYLOAD: &str = r#"{"SourceText":"bank","Source":"en","Target":"zh","ProjectId":0}"#;
pub const BANK_SIGNATURE: &str =
    "12c554806f50896570ab175e9224ec41da2260e637714bf7ac6b22265df6cd2a";

/// 带测试凭证的默认腾讯云配置
pub fn tencent_config() -> TencentConfig {
    TencentConfig {
        secret_id: Some(TEST_SECRET_ID.to_string()),
        secret_key: Some(TEST_SECRET_KEY.to_string()),
        ..TencentConfig::default()
    }
}

pub fn tencent_success_body(target_text: &str) -> HttpResponse {
    HttpResponse::new(
        200,
        format!(
            r#"{{"Response":{{"TargetText":"{}","Source":"en","Target":"zh","RequestId":"req-test"}}}}"#,
            target_text
        ),
    )
    .with_header("Content-Type", "application/json")
}

/// 上下文页面样本：两个译词，三个例句，其中只有一个的强调词能对上译词
pub const BANK_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>bank - Chinese translation</title></head>
<body>
  <div id="translations-content" class="wide-container">
    <a class="translation ltr dict n" href="/translation/chinese-english/%E9%93%B6%E8%A1%8C">
      <div class="pos-mark"><span class="n" title="noun"></span></div>
      <span class="display-term">银行</span>
    </a>
    <a class="translation ltr dict v" href="/translation/chinese-english/%E5%AD%98">
      <div class="pos-mark"><span class="v" title="verb"></span></div>
      <span class="display-term">存</span>
    </a>
  </div>
  <section id="examples-content">
    <div class="example">
      <div class="src ltr"><span class="text">She works at a <em>bank</em>.</span></div>
      <div class="trg ltr"><span class="text">她在<a class="link_highlighted" href="/translation/chinese-english/%E9%93%B6%E8%A1%8C"><em>银行</em></a>工作。</span></div>
    </div>
    <div class="example">
      <div class="src ltr"><span class="text">We sat on the river <em>bank</em>.</span></div>
      <div class="trg ltr"><span class="text">我们坐在河<em>岸</em>上。</span></div>
    </div>
    <div class="example">
      <div class="src ltr"><span class="text">The <em>bank</em> approved the loan after a long review of every document that the applicant had submitted over the previous several months.</span></div>
      <div class="trg ltr"><span class="text"><em>银行</em>批准了贷款。</span></div>
    </div>
  </section>
</body>
</html>"#;

pub fn html_response(body: &str) -> HttpResponse {
    HttpResponse::new(200, body.as_bytes().to_vec())
        .with_header("Content-Type", "text/html; charset=utf-8")
}
