//! 节点谓词
//!
//! 提取器通过谓词描述“要找哪些元素”，而不是在遍历代码里写死条件。
//! 谓词只作用于元素节点，文本、注释和文档节点永远不匹配。
//!
//! ## 使用示例
//!
//! ```rust
//! use reader_translators::parsers::html::predicate::NodePredicate;
//!
//! // 匹配 class 中包含 "example" 的 div
//! let predicate = NodePredicate::tag("div").and(NodePredicate::class_contains("example"));
//! assert!(predicate.matches_element("div", &[("class", "example odd")]));
//! assert!(!predicate.matches_element("span", &[("class", "example")]));
//! ```

use markup5ever_rcdom::{Handle, NodeData};

/// 元素匹配条件
///
/// ## 变体说明
///
/// - `Tag`: 标签名相等（忽略 ASCII 大小写）
/// - `ClassContains`: `class` 属性值包含给定子串
/// - `ClassEquals`: `class` 属性值与给定字符串完全相等
/// - `HasAttr`: 存在给定名称的属性
/// - `All`: 所有子谓词都成立（空列表恒为真）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodePredicate {
    Tag(String),
    ClassContains(String),
    ClassEquals(String),
    HasAttr(String),
    All(Vec<NodePredicate>),
}

impl NodePredicate {
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    pub fn class_contains(fragment: impl Into<String>) -> Self {
        Self::ClassContains(fragment.into())
    }

    pub fn class_equals(class: impl Into<String>) -> Self {
        Self::ClassEquals(class.into())
    }

    pub fn has_attr(name: impl Into<String>) -> Self {
        Self::HasAttr(name.into())
    }

    /// 组合两个谓词，两者都成立时匹配
    pub fn and(self, other: NodePredicate) -> Self {
        match self {
            Self::All(mut predicates) => {
                predicates.push(other);
                Self::All(predicates)
            }
            first => Self::All(vec![first, other]),
        }
    }

    /// 判断 DOM 节点是否匹配
    pub fn matches(&self, node: &Handle) -> bool {
        match &node.data {
            NodeData::Element { name, attrs, .. } => {
                let attrs = attrs.borrow();
                let pairs: Vec<(&str, &str)> = attrs
                    .iter()
                    .map(|attr| (&*attr.name.local, &*attr.value))
                    .collect();
                self.matches_element(&name.local, &pairs)
            }
            _ => false,
        }
    }

    /// 按标签名和属性列表判断是否匹配
    pub fn matches_element(&self, tag: &str, attrs: &[(&str, &str)]) -> bool {
        let attr = |wanted: &str| {
            attrs
                .iter()
                .find(|(name, _)| *name == wanted)
                .map(|(_, value)| *value)
        };

        match self {
            Self::Tag(expected) => tag.eq_ignore_ascii_case(expected),
            Self::ClassContains(fragment) => {
                attr("class").is_some_and(|class| class.contains(fragment.as_str()))
            }
            Self::ClassEquals(expected) => {
                attr("class").is_some_and(|class| class == expected.as_str())
            }
            Self::HasAttr(name) => attr(name.as_str()).is_some(),
            Self::All(predicates) => predicates.iter().all(|p| p.matches_element(tag, attrs)),
        }
    }
}
