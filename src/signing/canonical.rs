//! Canonical request construction for TC3-style request signing.
//!
//! The canonical request is the exact byte string the signature is computed over:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n
//! SignedHeaders\n
//! HashedRequestPayload
//! ```
//!
//! `CanonicalHeaders` renders every signed header as `name:value\n`, so the header
//! block is followed by an empty line before the signed header list.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

use crate::translation::error::{TranslationError, TranslationResult};

/// A built canonical request together with the signed header list it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    canonical: String,
    signed_headers: String,
}

impl CanonicalRequest {
    /// The canonical string the string-to-sign hashes.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// `;`-joined, lexically sorted signed header names, e.g. `content-type;host`.
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// Lowercase-hex SHA-256 of the canonical string.
    pub fn hash(&self) -> String {
        sha256_hex(self.canonical.as_bytes())
    }
}

/// Build the canonical request from its components.
///
/// `headers` must contain exactly the headers that will be signed. Names are
/// lowercased and sorted, so insertion order does not affect the result. Values
/// are trimmed. An empty `uri_path` is normalized to `/`.
///
/// # Examples
///
/// ```
/// use reader_translators::signing::canonical::build_canonical_request;
///
/// let canonical = build_canonical_request(
///     "POST",
///     "/",
///     "",
///     &[("Host", "tmt.tencentcloudapi.com"), ("Content-Type", "application/json; charset=utf-8")],
///     b"{}",
/// )
/// .unwrap();
/// assert_eq!(canonical.signed_headers(), "content-type;host");
/// assert!(canonical.as_str().starts_with("POST\n/\n\ncontent-type:application/json; charset=utf-8\nhost:"));
/// ```
pub fn build_canonical_request(
    method: &str,
    uri_path: &str,
    query_string: &str,
    headers: &[(&str, &str)],
    payload: &[u8],
) -> TranslationResult<CanonicalRequest> {
    let method = method.trim().to_uppercase();
    if method.is_empty() {
        return Err(TranslationError::EncodingError(
            "HTTP method must not be empty".to_string(),
        ));
    }
    ensure_single_line("uri path", uri_path)?;
    ensure_single_line("query string", query_string)?;

    let canonical_uri = if uri_path.is_empty() { "/" } else { uri_path };
    let header_map = collect_headers(headers)?;
    let canonical_headers = build_canonical_headers(&header_map);
    let signed_headers = build_signed_headers_string(&header_map);
    let payload_hash = sha256_hex(payload);

    let canonical = format!(
        "{method}\n{canonical_uri}\n{query_string}\n{canonical_headers}\n{signed_headers}\n{payload_hash}"
    );

    Ok(CanonicalRequest {
        canonical,
        signed_headers,
    })
}

/// Lowercase-hex SHA-256 of `data`.
///
/// # Examples
///
/// ```
/// use reader_translators::signing::canonical::sha256_hex;
///
/// assert_eq!(
///     sha256_hex(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

fn collect_headers(headers: &[(&str, &str)]) -> TranslationResult<BTreeMap<String, String>> {
    let mut header_map = BTreeMap::new();
    for (name, value) in headers {
        let lower_name = name.trim().to_lowercase();
        if lower_name.is_empty() || lower_name.contains([':', ';', ' ']) {
            return Err(TranslationError::EncodingError(format!(
                "invalid header name: {name:?}"
            )));
        }
        ensure_single_line(&lower_name, value)?;
        if header_map
            .insert(lower_name.clone(), value.trim().to_string())
            .is_some()
        {
            return Err(TranslationError::EncodingError(format!(
                "duplicate signed header: {lower_name}"
            )));
        }
    }

    Ok(header_map)
}

fn build_canonical_headers(header_map: &BTreeMap<String, String>) -> String {
    header_map
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect()
}

fn build_signed_headers_string(header_map: &BTreeMap<String, String>) -> String {
    header_map.keys().map(String::as_str).collect::<Vec<_>>().join(";")
}

fn ensure_single_line(what: &str, value: &str) -> TranslationResult<()> {
    if value.chars().any(|c| c == '\n' || c == '\r' || c == '\0') {
        return Err(TranslationError::EncodingError(format!(
            "{what} contains a line break or NUL"
        )));
    }
    Ok(())
}
