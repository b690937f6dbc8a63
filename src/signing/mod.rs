//! # 请求签名模块
//!
//! 云 API 的 TC3-HMAC-SHA256 请求签名，按以下顺序组合：
//!
//! - `canonical` - 规范请求串（方法、路径、签名头、负载哈希）
//! - `chain` - 日期/服务范围的 HMAC 密钥链与签名计算
//! - `signer` - 组装 `Authorization` 及配套请求头
//! - `clock` - 签名时间戳来源
//!
//! 整个模块不做任何网络 I/O，可以用固定时间戳和已知签名向量单独测试。

pub mod canonical;
pub mod chain;
pub mod clock;
pub mod signer;

pub use canonical::{build_canonical_request, sha256_hex, CanonicalRequest};
pub use chain::{
    build_string_to_sign, compute_signature, derive_signing_key, SigningKey, SigningScheme,
};
pub use clock::{utc_date, Clock, FixedClock, SystemClock};
pub use signer::{CloudApiSigner, Credentials, SignedRequest, SigningContext, JSON_CONTENT_TYPE};
