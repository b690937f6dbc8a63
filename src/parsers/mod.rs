//! # 解析器模块
//!
//! 翻译页面是手写的、结构松散的 HTML，这里提供把它解析为节点树并按谓词查询的能力。
//!
//! # 模块组织
//!
//! - `html` - HTML文档解析、节点谓词、带强调标记的文本提取

pub mod html;

pub use html::{find_all, find_first, html_to_dom, parse_html, text_of, text_with_emphasis, NodePredicate};
