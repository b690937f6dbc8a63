//! HTML解析和查询模块
//!
//! - `predicate`: 节点匹配谓词
//! - `dom`: DOM 解析、遍历与文本提取

pub mod dom;
pub mod predicate;

pub use dom::{
    find_all, find_first, get_node_attr, get_node_name, html_to_dom, parse_html, text_of,
    text_with_emphasis,
};
pub use predicate::NodePredicate;
