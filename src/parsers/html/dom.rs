//! DOM 解析与只读遍历
//!
//! 解析交给 html5ever（宽容处理未闭合、错配的标签），遍历统一为深度优先的前序顺序。

use encoding_rs::Encoding;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::predicate::NodePredicate;
use crate::translation::error::{helpers, TranslationResult};

/// 强调标签名
pub const EMPHASIS_TAG: &str = "em";

/// 包裹强调词的高亮链接 class
pub const HIGHLIGHTED_LINK_CLASS: &str = "link_highlighted";

/// 将 HTML 字节转换为 DOM
///
/// `document_encoding` 是 encoding_rs 能识别的字符集标签，无法识别时按 UTF-8 有损解码。
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> TranslationResult<RcDom> {
    let s: String = if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        let (string, _, _) = encoding.decode(data);
        string.into_owned()
    } else {
        String::from_utf8_lossy(data).into_owned()
    };

    parse_html(&s)
}

/// 解析 HTML 文本
pub fn parse_html(html: &str) -> TranslationResult<RcDom> {
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| helpers::extraction_error(format!("HTML解析失败: {e}")))
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// 查找所有匹配的节点（包含 `node` 自身），前序遍历
///
/// 返回的节点只在其所属的 `RcDom` 存活期间有效，`RcDom` 析构时会清空所有子节点。
pub fn find_all(node: &Handle, predicate: &NodePredicate) -> Vec<Handle> {
    let mut found_nodes = Vec::new();
    collect_matching(node, predicate, &mut found_nodes);
    found_nodes
}

fn collect_matching(node: &Handle, predicate: &NodePredicate, found_nodes: &mut Vec<Handle>) {
    if predicate.matches(node) {
        found_nodes.push(node.clone());
    }

    for child_node in node.children.borrow().iter() {
        collect_matching(child_node, predicate, found_nodes);
    }
}

/// 在 `node` 的后代中查找第一个匹配节点（不含 `node` 自身），前序遍历
///
/// 与 [`find_all`] 一样，结果不能比 `RcDom` 活得更久。
pub fn find_first(node: &Handle, predicate: &NodePredicate) -> Option<Handle> {
    for child_node in node.children.borrow().iter() {
        if predicate.matches(child_node) {
            return Some(child_node.clone());
        }
        if let Some(found) = find_first(child_node, predicate) {
            return Some(found);
        }
    }
    None
}

/// 按文档顺序拼接所有后代文本节点，忽略标签
pub fn text_of(node: &Handle) -> String {
    let mut text = String::new();
    push_text(node, &mut text);
    text
}

fn push_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { .. } | NodeData::Document => {
            for child_node in node.children.borrow().iter() {
                push_text(child_node, out);
            }
        }
        _ => {}
    }
}

/// 渲染后代文本，并用 `<em>…</em>` 标出强调词
///
/// 强调词来自 `em` 元素，或 `a.link_highlighted` 内部的第一个 `em`。
/// 没有强调后代时结果与 [`text_of`] 完全一致；不做首尾空白裁剪。
pub fn text_with_emphasis(node: &Handle) -> String {
    let mut text = String::new();
    push_text_with_emphasis(node, &mut text);
    text
}

fn push_text_with_emphasis(node: &Handle, out: &mut String) {
    for child_node in node.children.borrow().iter() {
        match &child_node.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => {
                if is_emphasis(child_node) {
                    push_emphasized(&text_of(child_node), out);
                } else if is_highlighted_link(child_node) {
                    match find_first(child_node, &NodePredicate::tag(EMPHASIS_TAG)) {
                        Some(emphasis) => push_emphasized(&text_of(&emphasis), out),
                        None => push_text_with_emphasis(child_node, out),
                    }
                } else {
                    push_text_with_emphasis(child_node, out);
                }
            }
            _ => {}
        }
    }
}

fn push_emphasized(text: &str, out: &mut String) {
    out.push_str("<em>");
    out.push_str(text);
    out.push_str("</em>");
}

fn is_emphasis(node: &Handle) -> bool {
    get_node_name(node).is_some_and(|name| name.eq_ignore_ascii_case(EMPHASIS_TAG))
}

fn is_highlighted_link(node: &Handle) -> bool {
    NodePredicate::tag("a")
        .and(NodePredicate::class_equals(HIGHLIGHTED_LINK_CLASS))
        .matches(node)
}
