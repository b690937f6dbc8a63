//! Signing key derivation and signature computation.
//!
//! ```text
//! kDate    = HMAC-SHA256(key_prefix + secret, date)
//! kService = HMAC-SHA256(kDate, service)
//! kSigning = HMAC-SHA256(kService, scope_suffix + "_request")
//! signature = hex(HMAC-SHA256(kSigning, string_to_sign))
//! ```
//!
//! The prefix, suffix, algorithm tag and header prefix are provider constants
//! carried by [`SigningScheme`].

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Provider-defined constants of a TC3-style signature scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningScheme {
    /// Algorithm tag, first line of the string to sign (`TC3-HMAC-SHA256`).
    pub algorithm: String,
    /// Prepended to the secret for the first HMAC (`TC3`).
    pub key_prefix: String,
    /// Credential scope terminator stem, rendered as `<suffix>_request` (`tc3`).
    pub scope_suffix: String,
    /// Prefix of the provider's companion headers (`X-TC`).
    pub header_prefix: String,
}

impl SigningScheme {
    /// Tencent Cloud API 3.0 (`TC3-HMAC-SHA256`).
    pub fn tc3() -> Self {
        Self {
            algorithm: "TC3-HMAC-SHA256".to_string(),
            key_prefix: "TC3".to_string(),
            scope_suffix: "tc3".to_string(),
            header_prefix: "X-TC".to_string(),
        }
    }

    /// The credential scope terminator, e.g. `tc3_request`.
    pub fn terminator(&self) -> String {
        format!("{}_request", self.scope_suffix)
    }

    /// `date/service/<suffix>_request`.
    pub fn credential_scope(&self, date: &str, service: &str) -> String {
        format!("{date}/{service}/{}", self.terminator())
    }

    /// A companion header name, e.g. `X-TC-Action`.
    pub fn header(&self, name: &str) -> String {
        format!("{}-{name}", self.header_prefix)
    }
}

impl Default for SigningScheme {
    fn default() -> Self {
        Self::tc3()
    }
}

/// A date and service scoped signing key.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Build the string to sign.
///
/// ```text
/// <algorithm>\n<timestamp>\n<credential_scope>\n<hex(SHA256(canonical_request))>
/// ```
#[must_use]
pub fn build_string_to_sign(
    scheme: &SigningScheme,
    timestamp: i64,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!(
        "{}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}",
        scheme.algorithm
    )
}

/// Derive the signing key through the three-step HMAC chain.
///
/// `date` is the UTC calendar date (`YYYY-MM-DD`) of the signing timestamp.
#[must_use]
pub fn derive_signing_key(
    scheme: &SigningScheme,
    secret: &str,
    date: &str,
    service: &str,
) -> SigningKey {
    let prefixed_secret = format!("{}{secret}", scheme.key_prefix);
    let k_date = hmac_sha256(prefixed_secret.as_bytes(), date.as_bytes());
    let k_service = hmac_sha256(&k_date, service.as_bytes());
    let k_signing = hmac_sha256(&k_service, scheme.terminator().as_bytes());
    SigningKey(k_signing)
}

/// Sign `string_to_sign` with the derived key, returning lowercase hex.
#[must_use]
pub fn compute_signature(signing_key: &SigningKey, string_to_sign: &str) -> String {
    hex::encode(hmac_sha256(signing_key.as_bytes(), string_to_sign.as_bytes()))
}

/// HMAC-SHA256 of `data` keyed by `key`.
#[must_use]
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_sha256_rfc4231_case_1() {
        let digest = hmac_sha256(&[0x0b; 20], b"Hi There");
        assert_eq!(
            hex::encode(digest),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );
    }

    #[test]
    fn test_hmac_sha256_rfc4231_case_2() {
        let digest = hmac_sha256(b"Jefe", b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(digest),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_compute_signature_matches_published_digest() {
        let key = SigningKey(b"Jefe".to_vec());
        assert_eq!(
            compute_signature(&key, "what do ya want for nothing?"),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_signature_for_cloud_api_example() {
        let scheme = SigningScheme::tc3();
        let scope = scheme.credential_scope("2019-02-25", "cvm");
        assert_eq!(scope, "2019-02-25/cvm/tc3_request");

        let string_to_sign = build_string_to_sign(
            &scheme,
            1551113065,
            &scope,
            "5ffe6a04c0664d6b969fab9a13bdab201d63ee709638e2749d62a09ca18d7031",
        );
        assert_eq!(
            string_to_sign,
            "TC3-HMAC-SHA256\n1551113065\n2019-02-25/cvm/tc3_request\n5ffe6a04c0664d6b969fab9a13bdab201d63ee709638e2749d62a09ca18d7031"
        );

        let key = derive_signing_key(
            &scheme,
            "Gu5t9xGARNpq86cd98joQYCN3EXAMPLE",
            "2019-02-25",
            "cvm",
        );
        assert_eq!(
            compute_signature(&key, &string_to_sign),
            "72e494ea809ad7a8c8f7a4507b9bddcbaa8e581f516e8da2f66e2c5a96525168"
        );
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let scheme = SigningScheme::tc3();
        let a = derive_signing_key(&scheme, "secret", "2024-01-01", "tmt");
        let b = derive_signing_key(&scheme, "secret", "2024-01-01", "tmt");
        let c = derive_signing_key(&scheme, "secret", "2024-01-02", "tmt");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_bytes().len(), 32);
    }

    #[test]
    fn test_scheme_constants_are_configurable() {
        let scheme = SigningScheme {
            algorithm: "ACME-HMAC-SHA256".to_string(),
            key_prefix: "ACME".to_string(),
            scope_suffix: "acme".to_string(),
            header_prefix: "X-Acme".to_string(),
        };
        assert_eq!(scheme.credential_scope("2024-01-01", "mt"), "2024-01-01/mt/acme_request");
        assert_eq!(scheme.header("Action"), "X-Acme-Action");
        assert_ne!(
            derive_signing_key(&scheme, "secret", "2024-01-01", "mt"),
            derive_signing_key(&SigningScheme::tc3(), "secret", "2024-01-01", "mt")
        );
    }

    #[test]
    fn test_signing_key_debug_is_redacted() {
        let key = derive_signing_key(&SigningScheme::tc3(), "secret", "2024-01-01", "tmt");
        assert_eq!(format!("{key:?}"), "SigningKey(<redacted>)");
    }
}
