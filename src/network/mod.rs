//! # 网络模块
//!
//! 翻译客户端只通过 [`HttpTransport`] 与外部通信，便于在测试中替换为内存实现。
//!
//! # 模块组织
//!
//! - `session` - 请求/响应类型、传输特性和基于 reqwest 的会话
//! - `user_agent` - 随机浏览器 User-Agent

pub mod session;
pub mod user_agent;

pub use session::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, Session, SessionOptions};
pub use user_agent::random_user_agent;
