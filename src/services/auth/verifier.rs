//! Access token (JWT) verification against the trusted RSA key.
//!
//! # Checks, in order
//!
//! 1. Size check (tokens over 8 KiB are rejected before parsing)
//! 2. JWS compact parsing
//! 3. RSA signature (RS256/384/512, PS256/384/512)
//! 4. `nbf` must not be later than `now`
//! 5. `exp` must be later than `now`
//!
//! Both time comparisons lean towards rejection: a token that expires exactly
//! at `now` is expired. There is no leeway and no `kid` based key selection.

use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::keystore::TrustedKey;

/// Maximum accepted credential size in bytes.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

const RSA_ALGORITHMS: [Algorithm; 6] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("token exceeds {MAX_TOKEN_SIZE_BYTES} bytes ({len} bytes)")]
    Oversized { len: usize },

    #[error("malformed token: {0}")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    #[error("token signature could not be verified: {0}")]
    BadSignature(#[source] jsonwebtoken::errors::Error),

    #[error("missing required claim: {0}")]
    MissingClaim(&'static str),

    #[error("too early, token not valid before {nbf} (now {now})")]
    TooEarly { nbf: i64, now: i64 },

    #[error("too late, token expired at {exp} (now {now})")]
    Expired { exp: i64, now: i64 },
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::BadSignature(e),
            _ => Self::Malformed(e),
        }
    }
}

/// Claims of a token whose signature has been verified.
///
/// Immutable once parsed. The subject is redacted in Debug output.
#[derive(Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    sub: Option<String>,

    #[serde(default, deserialize_with = "numeric_date")]
    iat: Option<i64>,

    #[serde(default, deserialize_with = "numeric_date")]
    nbf: Option<i64>,

    #[serde(default, deserialize_with = "numeric_date")]
    exp: Option<i64>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TokenClaims {
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    pub fn issued_at(&self) -> Option<i64> {
        self.iat
    }

    pub fn not_before(&self) -> Option<i64> {
        self.nbf
    }

    pub fn expiration(&self) -> Option<i64> {
        self.exp
    }

    /// Any claim other than `sub`, `iat`, `nbf` and `exp`.
    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// Look up a claim by a dot-separated path into nested objects,
    /// e.g. `realm_access.roles`.
    pub fn claim_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = self.claim(segments.next()?)?;
        segments.try_fold(first, |value, segment| value.get(segment))
    }
}

impl fmt::Debug for TokenClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenClaims")
            .field("sub", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("nbf", &self.nbf)
            .field("exp", &self.exp)
            .field("claims", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

// NumericDate may be fractional; whole seconds are enough here.
fn numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Number>::deserialize(deserializer)?;
    value
        .map(|n| {
            n.as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .ok_or_else(|| serde::de::Error::custom("NumericDate out of range"))
        })
        .transpose()
}

/// Verifies access tokens with the single trusted key.
///
/// Shared read-only across requests; key material is not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    fingerprint: String,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("key_fingerprint", &self.fingerprint)
            .field("algorithms", &self.validation.algorithms)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(key: TrustedKey) -> Self {
        let decoding_key = DecodingKey::from_rsa_der(key.pkcs1_der());

        // jsonwebtoken only checks the signature; time bounds are checked
        // against the caller's `now` in `verify`.
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = RSA_ALGORITHMS.to_vec();
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            decoding_key,
            validation,
            fingerprint: key.fingerprint().to_string(),
        }
    }

    /// Verify `credential` and return its claims.
    ///
    /// `now` is seconds since the Unix epoch.
    pub fn verify(&self, credential: &str, now: i64) -> Result<TokenClaims, VerifyError> {
        if credential.len() > MAX_TOKEN_SIZE_BYTES {
            return Err(VerifyError::Oversized {
                len: credential.len(),
            });
        }

        let data = jsonwebtoken::decode::<TokenClaims>(
            credential,
            &self.decoding_key,
            &self.validation,
        )?;
        let claims = data.claims;

        let nbf = claims.nbf.ok_or(VerifyError::MissingClaim("nbf"))?;
        let exp = claims.exp.ok_or(VerifyError::MissingClaim("exp"))?;

        if nbf > now {
            return Err(VerifyError::TooEarly { nbf, now });
        }
        if exp <= now {
            return Err(VerifyError::Expired { exp, now });
        }

        tracing::trace!(claims = ?claims, "JWT claims");
        Ok(claims)
    }
}
