//! Request signer for TC3-style cloud APIs.
//!
//! [`CloudApiSigner::sign_request`] is a pure function of its inputs: it performs
//! no I/O and reads no clock, so a fixed timestamp always produces the same
//! `Authorization` header.

use std::fmt;

use tracing::debug;

use super::canonical::build_canonical_request;
use super::chain::{build_string_to_sign, compute_signature, derive_signing_key, SigningScheme};
use super::clock::utc_date;
use crate::translation::error::{TranslationError, TranslationResult};

/// Content type of every signed JSON request.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Long-lived API credentials.
///
/// Immutable once constructed. `Debug` redacts the secret and the session token;
/// there is no `Serialize` impl.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_id: String,
    access_secret: String,
    session_token: Option<String>,
}

impl Credentials {
    pub fn new(access_id: impl Into<String>, access_secret: impl Into<String>) -> Self {
        Self {
            access_id: access_id.into(),
            access_secret: access_secret.into(),
            session_token: None,
        }
    }

    /// Attach a temporary session token. An empty token is treated as absent.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.session_token = if token.is_empty() { None } else { Some(token) };
        self
    }

    pub fn access_id(&self) -> &str {
        &self.access_id
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub(crate) fn access_secret(&self) -> &str {
        &self.access_secret
    }

    /// Fails with `MissingCredentialsError` when the id or the secret is empty.
    pub fn validate(&self) -> TranslationResult<()> {
        if self.access_id.trim().is_empty() {
            return Err(TranslationError::MissingCredentialsError(
                "access id is empty".to_string(),
            ));
        }
        if self.access_secret.trim().is_empty() {
            return Err(TranslationError::MissingCredentialsError(
                "access secret is empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_id", &self.access_id)
            .field("access_secret", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Per-call signing parameters. Build a fresh one for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningContext {
    /// Unix seconds; the credential scope date is derived from it.
    pub timestamp: i64,
    pub service: String,
    pub region: Option<String>,
    pub host: String,
    pub action: String,
    pub api_version: String,
}

/// Output of [`CloudApiSigner::sign_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Value of the `Authorization` header.
    pub authorization: String,
    /// `;`-joined signed header names referenced by the signature.
    pub signed_headers: String,
    /// Every header to send, in order, starting with `Authorization`.
    pub headers: Vec<(String, String)>,
}

impl SignedRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Stateless signer parameterized by a [`SigningScheme`].
#[derive(Debug, Clone, Default)]
pub struct CloudApiSigner {
    scheme: SigningScheme,
}

impl CloudApiSigner {
    pub fn new(scheme: SigningScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> &SigningScheme {
        &self.scheme
    }

    /// Sign one `POST /` JSON request.
    ///
    /// `payload` must be the exact bytes that will be sent.
    ///
    /// # Errors
    ///
    /// - `MissingCredentialsError` when the access id or secret is empty
    /// - `ClockError` when `context.timestamp` is not positive
    /// - `EncodingError` when the payload is not UTF-8 or a header value is malformed
    /// - `ConfigError` when a required context field is empty
    pub fn sign_request(
        &self,
        credentials: &Credentials,
        context: &SigningContext,
        payload: &[u8],
    ) -> TranslationResult<SignedRequest> {
        credentials.validate()?;
        let date = utc_date(context.timestamp)?;
        validate_context(context)?;
        std::str::from_utf8(payload).map_err(|e| {
            TranslationError::EncodingError(format!("payload is not valid UTF-8: {e}"))
        })?;

        let canonical = build_canonical_request(
            "POST",
            "/",
            "",
            &[
                ("content-type", JSON_CONTENT_TYPE),
                ("host", context.host.as_str()),
            ],
            payload,
        )?;
        debug!(canonical_request = canonical.as_str(), "Built canonical request");

        let credential_scope = self.scheme.credential_scope(&date, &context.service);
        let string_to_sign = build_string_to_sign(
            &self.scheme,
            context.timestamp,
            &credential_scope,
            &canonical.hash(),
        );
        debug!(string_to_sign, "Built string to sign");

        let signing_key = derive_signing_key(
            &self.scheme,
            credentials.access_secret(),
            &date,
            &context.service,
        );
        let signature = compute_signature(&signing_key, &string_to_sign);

        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            self.scheme.algorithm,
            credentials.access_id(),
            credential_scope,
            canonical.signed_headers(),
            signature
        );

        let mut headers = vec![
            ("Authorization".to_string(), authorization.clone()),
            ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
            ("Host".to_string(), context.host.clone()),
            (self.scheme.header("Action"), context.action.clone()),
            (
                self.scheme.header("Timestamp"),
                context.timestamp.to_string(),
            ),
            (self.scheme.header("Version"), context.api_version.clone()),
        ];
        if let Some(region) = context.region.as_deref().filter(|r| !r.is_empty()) {
            headers.push((self.scheme.header("Region"), region.to_string()));
        }
        if let Some(token) = credentials.session_token() {
            headers.push((self.scheme.header("Token"), token.to_string()));
        }

        Ok(SignedRequest {
            authorization,
            signed_headers: canonical.signed_headers().to_string(),
            headers,
        })
    }
}

fn validate_context(context: &SigningContext) -> TranslationResult<()> {
    for (field, value) in [
        ("host", &context.host),
        ("service", &context.service),
        ("action", &context.action),
        ("api_version", &context.api_version),
    ] {
        if value.trim().is_empty() {
            return Err(TranslationError::ConfigError(format!(
                "signing context field `{field}` is empty"
            )));
        }
    }
    // The Host header is sent as-is, so it must already equal the canonical (trimmed) value.
    if context.host.contains(char::is_whitespace) {
        return Err(TranslationError::ConfigError(format!(
            "signing context host {:?} contains whitespace",
            context.host
        )));
    }
    Ok(())
}
