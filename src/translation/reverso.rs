//! Reverso 翻译客户端
//!
//! 两个入口：
//!
//! - [`ReversoClient::fetch_context`] 抓取双语上下文页面，提取候选译词和例句，
//!   再用 [`ContextFilter`] 过滤例句；
//! - [`ReversoClient::fetch_translation_api`] 调用公开的句子翻译接口。
//!
//! 两者都不需要凭证，也不做重试。

use std::sync::Arc;

use markup5ever_rcdom::Handle;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::core::{TranslationContext, WordTranslation};
use crate::network::{random_user_agent, HttpRequest, HttpResponse, HttpTransport};
use crate::parsers::html::{
    find_all, find_first, get_node_attr, parse_html, text_of, text_with_emphasis, NodePredicate,
};
use crate::translation::config::ReversoConfig;
use crate::translation::error::{helpers, TranslationError, TranslationResult};
use crate::translation::filters::ContextFilter;

/// `encodeURIComponent` 保留的字符之外全部编码
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 页面上的 class 约定
mod classes {
    pub const TRANSLATION: &str = "translation";
    pub const DISPLAY_TERM: &str = "display-term";
    pub const POS_MARK: &str = "pos-mark";
    pub const EXAMPLE: &str = "example";
    pub const SOURCE: &str = "src ltr";
    pub const TARGET: &str = "trg ltr";
    pub const TEXT: &str = "text";
}

/// 上下文页面的提取结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextTranslation {
    pub original: String,
    pub translations: Vec<WordTranslation>,
    pub contexts: Vec<TranslationContext>,
}

/// 句子翻译结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceTranslation {
    pub original: String,
    pub translation: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    format: &'a str,
    from: String,
    input: &'a str,
    options: ApiOptions,
    to: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiOptions {
    context_results: bool,
    language_detection: bool,
    origin: &'static str,
    sentence_splitter: bool,
}

/// Reverso 客户端
pub struct ReversoClient {
    transport: Arc<dyn HttpTransport>,
    config: ReversoConfig,
    filter: ContextFilter,
}

impl ReversoClient {
    pub fn new(transport: Arc<dyn HttpTransport>, config: ReversoConfig) -> Self {
        let filter = ContextFilter::new(config.max_words_in_context);
        Self {
            transport,
            config,
            filter,
        }
    }

    pub fn config(&self) -> &ReversoConfig {
        &self.config
    }

    /// 上下文页面地址，`text` 按 `encodeURIComponent` 规则编码后放入路径
    pub fn context_url(&self, text: &str, source: &str, target: &str) -> String {
        format!(
            "https://{}/translation/{}-{}/{}",
            self.config.context_host,
            source,
            target,
            utf8_percent_encode(text, URI_COMPONENT)
        )
    }

    /// 抓取上下文页面并提取译词和过滤后的例句
    pub async fn fetch_context(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> TranslationResult<ContextTranslation> {
        let url = self.context_url(text, source, target);
        info!(host = %self.config.context_host, source, target, "请求上下文页面");

        let request = HttpRequest::get(url).headers(browser_headers());
        let response = ensure_success(self.transport.send(request).await?)?;

        let (translations, contexts) = parse_context_page(&response.text(), &self.filter)?;
        Ok(ContextTranslation {
            original: text.to_string(),
            translations,
            contexts,
        })
    }

    /// 调用句子翻译接口
    pub async fn fetch_translation_api(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> TranslationResult<SentenceTranslation> {
        let body = serde_json::to_vec(&ApiRequest {
            format: "text",
            from: api_language_code(source),
            input: text,
            options: ApiOptions {
                context_results: true,
                language_detection: true,
                origin: "reversomobile",
                sentence_splitter: false,
            },
            to: api_language_code(target),
        })
        .map_err(|e| TranslationError::EncodingError(format!("请求体序列化失败: {}", e)))?;

        info!(url = %self.config.api_url, source, target, "请求句子翻译接口");
        let request = HttpRequest::post(self.config.api_url.as_str(), body)
            .header("Content-Type", "application/json")
            .headers(browser_headers());
        let response = ensure_success(self.transport.send(request).await?)?;

        let envelope: Value = serde_json::from_slice(&response.body)?;
        let translation = match envelope.get("translation") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Some(Value::Null) | None => {
                return Err(helpers::malformed_response("响应中缺少 translation 字段"))
            }
            Some(other) => other.to_string(),
        };

        Ok(SentenceTranslation {
            original: text.to_string(),
            translation,
        })
    }
}

fn browser_headers() -> Vec<(&'static str, &'static str)> {
    vec![
        ("User-Agent", random_user_agent()),
        ("Accept", "*/*"),
        ("Connection", "keep-alive"),
    ]
}

fn ensure_success(response: HttpResponse) -> TranslationResult<HttpResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        helpers::log_error(TranslationError::RemoteRejectedError {
            status: response.status,
        })
    }
}

/// 解析上下文页面：提取译词、提取例句并过滤
pub fn parse_context_page(
    html: &str,
    filter: &ContextFilter,
) -> TranslationResult<(Vec<WordTranslation>, Vec<TranslationContext>)> {
    let dom = parse_html(html)?;
    let translations = extract_translations(&dom.document);
    let contexts = extract_contexts(&dom.document);
    debug!(
        translations = translations.len(),
        contexts = contexts.len(),
        "页面提取完成"
    );

    let contexts = filter.filter(contexts, &translations);
    Ok((translations, contexts))
}

/// class 包含 `translation` 的元素：`display-term` 为译词，`pos-mark` 内带 `title` 的 span 为词性
pub fn extract_translations(root: &Handle) -> Vec<WordTranslation> {
    let display_term = NodePredicate::class_equals(classes::DISPLAY_TERM);
    let pos_mark = NodePredicate::class_equals(classes::POS_MARK);
    let titled_span = NodePredicate::tag("span").and(NodePredicate::has_attr("title"));

    find_all(root, &NodePredicate::class_contains(classes::TRANSLATION))
        .iter()
        .filter_map(|element| {
            let word = find_first(element, &display_term)
                .map(|term| text_of(&term).trim().to_string())
                .unwrap_or_default();
            if word.is_empty() {
                return None;
            }

            let pos = find_first(element, &pos_mark)
                .and_then(|mark| find_first(&mark, &titled_span))
                .and_then(|span| get_node_attr(&span, "title"))
                .map(|title| title.trim().to_string())
                .unwrap_or_default();

            Some(WordTranslation { word, pos })
        })
        .collect()
}

/// class 包含 `example` 的元素：`src ltr` 与 `trg ltr` 中 `span.text` 的带强调文本
pub fn extract_contexts(root: &Handle) -> Vec<TranslationContext> {
    let source = NodePredicate::class_equals(classes::SOURCE);
    let target = NodePredicate::class_equals(classes::TARGET);

    find_all(root, &NodePredicate::class_contains(classes::EXAMPLE))
        .iter()
        .filter_map(|element| {
            let original = sentence_text(element, &source);
            let translation = sentence_text(element, &target);
            if original.is_empty() || translation.is_empty() {
                return None;
            }
            Some(TranslationContext {
                original,
                translation,
            })
        })
        .collect()
}

fn sentence_text(example: &Handle, side: &NodePredicate) -> String {
    let text_span = NodePredicate::tag("span").and(NodePredicate::class_equals(classes::TEXT));
    find_first(example, side)
        .and_then(|side_node| find_first(&side_node, &text_span))
        .map(|span| text_with_emphasis(&span).trim().to_string())
        .unwrap_or_default()
}

/// 上下文页面使用的语言名转换为接口的三字母代码，未知名称原样返回
pub fn api_language_code(language: &str) -> String {
    let code = match language.trim().to_lowercase().as_str() {
        "english" => "eng",
        "chinese" => "chi",
        "french" => "fra",
        "german" => "ger",
        "spanish" => "spa",
        "italian" => "ita",
        "portuguese" => "por",
        "russian" => "rus",
        "japanese" => "jpn",
        "korean" => "kor",
        "arabic" => "ara",
        "dutch" => "dut",
        "polish" => "pol",
        "hebrew" => "heb",
        "turkish" => "tur",
        "romanian" => "rum",
        "ukrainian" => "ukr",
        "swedish" => "swe",
        _ => return language.to_string(),
    };
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div id="translations-content">
            <a class="translation ltr dict n" href="/translation/chinese-english/银行">
              <div class="pos-mark"><span class="n" title=" noun "></span></div>
              <span class="display-term"> 银行 </span>
            </a>
            <a class="translation ltr dict v"><span class="display-term">存</span></a>
            <a class="translation ltr dict"><span class="display-term">  </span></a>
          </div>
          <div id="examples-content">
            <div class="example">
              <div class="src ltr"><span class="text">I went to the <em>bank</em>.</span></div>
              <div class="trg ltr"><span class="text">我去了<a class="link_highlighted" href="/x"><em>银行</em></a>。</span></div>
            </div>
            <div class="example">
              <div class="src ltr"><span class="text">The river <em>bank</em> was muddy.</span></div>
              <div class="trg ltr"><span class="text">河<em>岸</em>很泥泞。</span></div>
            </div>
            <div class="example">
              <div class="src ltr"><span class="text">Orphan source</span></div>
            </div>
          </div>
        </body></html>"#;

    fn root() -> Handle {
        parse_html(PAGE).unwrap().document
    }

    #[test]
    fn test_extract_translations_reads_word_and_pos() {
        let translations = extract_translations(&root());
        assert_eq!(
            translations,
            vec![
                WordTranslation {
                    word: "银行".to_string(),
                    pos: "noun".to_string()
                },
                WordTranslation {
                    word: "存".to_string(),
                    pos: String::new()
                },
            ]
        );
    }

    #[test]
    fn test_extract_contexts_keeps_emphasis_and_drops_incomplete_pairs() {
        let contexts = extract_contexts(&root());
        assert_eq!(contexts.len(), 2);
        assert_eq!(contexts[0].original, "I went to the <em>bank</em>.");
        assert_eq!(contexts[0].translation, "我去了<em>银行</em>。");
        assert_eq!(contexts[1].translation, "河<em>岸</em>很泥泞。");
    }

    #[test]
    fn test_parse_context_page_filters_unmatched_contexts() {
        let (translations, contexts) = parse_context_page(PAGE, &ContextFilter::default()).unwrap();
        assert_eq!(translations.len(), 2);
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].translation, "我去了<em>银行</em>。");
    }

    #[test]
    fn test_page_without_blocks_yields_empty_lists() {
        let (translations, contexts) =
            parse_context_page("<p>No results</p>", &ContextFilter::default()).unwrap();
        assert!(translations.is_empty());
        assert!(contexts.is_empty());
    }

    #[test]
    fn test_api_language_codes() {
        assert_eq!(api_language_code("english"), "eng");
        assert_eq!(api_language_code("Chinese"), "chi");
        assert_eq!(api_language_code("klingon"), "klingon");
    }

    #[test]
    fn test_uri_component_encoding() {
        assert_eq!(
            utf8_percent_encode("river bank's (edge)!", URI_COMPONENT).to_string(),
            "river%20bank's%20(edge)!"
        );
        assert_eq!(
            utf8_percent_encode("银行/a?b", URI_COMPONENT).to_string(),
            "%E9%93%B6%E8%A1%8C%2Fa%3Fb"
        );
    }
}
