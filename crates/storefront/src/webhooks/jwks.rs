//! Detached JWS verification of Saleor webhook payloads.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderMap;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey};
use moka::future::Cache;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::{Origin, Url};

/// Header carrying the detached JWS.
pub const SIGNATURE_HEADER: &str = "saleor-signature";
/// Header carrying the API URL of the sending Saleor instance.
pub const API_URL_HEADER: &str = "saleor-api-url";

const JWKS_PATH: &str = "/.well-known/jwks.json";
const KEY_SET_TTL: Duration = Duration::from_secs(600);
/// Minimum interval between refetches forced by an unknown `kid`.
const REFETCH_COOLDOWN: Duration = Duration::from_secs(30);

/// Reasons a webhook request is rejected.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Missing {SIGNATURE_HEADER} header")]
    MissingSignature,

    #[error("Signature is not a detached JWS")]
    MalformedSignature,

    #[error("Missing {API_URL_HEADER} header")]
    MissingApiUrl,

    #[error("{API_URL_HEADER} header is not a valid URL: {0}")]
    InvalidApiUrl(#[from] url::ParseError),

    #[error("{API_URL_HEADER} origin {received} does not match {expected}")]
    OriginMismatch { received: String, expected: String },

    #[error("Invalid protected header: {0}")]
    InvalidProtectedHeader(String),

    #[error("Failed to fetch key set: {0}")]
    KeySetFetch(String),

    #[error("No signing key matches the signature")]
    UnknownKey,

    #[error("Signature is invalid")]
    InvalidSignature,

    #[error("Body is not valid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

impl VerificationError {
    /// Short machine-readable reason for logs.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingSignature => "missing_signature",
            Self::MalformedSignature => "malformed_signature",
            Self::MissingApiUrl => "missing_api_url",
            Self::InvalidApiUrl(_) => "invalid_api_url",
            Self::OriginMismatch { .. } => "origin_mismatch",
            Self::InvalidProtectedHeader(_) => "invalid_protected_header",
            Self::KeySetFetch(_) => "key_set_fetch",
            Self::UnknownKey => "unknown_key",
            Self::InvalidSignature => "invalid_signature",
            Self::InvalidPayload(_) => "invalid_payload",
        }
    }
}

/// The three segments of a compact JWS with a detached payload.
#[derive(Debug, PartialEq, Eq)]
struct DetachedSignature<'a> {
    protected: &'a str,
    signature: &'a str,
}

impl<'a> DetachedSignature<'a> {
    /// Split `header..signature`. The payload segment must be empty.
    fn parse(value: &'a str) -> Result<Self, VerificationError> {
        let mut segments = value.split('.');
        match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(protected), Some(""), Some(signature), None)
                if !protected.is_empty() && !signature.is_empty() =>
            {
                Ok(Self {
                    protected,
                    signature,
                })
            }
            _ => Err(VerificationError::MalformedSignature),
        }
    }

    fn protected_header(&self) -> Result<ProtectedHeader, VerificationError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(self.protected)
            .map_err(|e| VerificationError::InvalidProtectedHeader(e.to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| VerificationError::InvalidProtectedHeader(e.to_string()))
    }

    /// JWS signing input over `body`, honouring the unencoded-payload option.
    fn signing_input(&self, header: &ProtectedHeader, body: &[u8]) -> Vec<u8> {
        let mut message = Vec::with_capacity(self.protected.len() + 1 + body.len() * 4 / 3 + 4);
        message.extend_from_slice(self.protected.as_bytes());
        message.push(b'.');
        if header.b64 {
            message.extend_from_slice(URL_SAFE_NO_PAD.encode(body).as_bytes());
        } else {
            message.extend_from_slice(body);
        }
        message
    }
}

#[derive(Debug, Deserialize)]
struct ProtectedHeader {
    alg: Algorithm,
    kid: Option<String>,
    /// RFC 7797; Saleor signs the raw body with `b64: false`.
    #[serde(default = "default_b64")]
    b64: bool,
}

const fn default_b64() -> bool {
    true
}

/// The JWS algorithm a JWK `alg` member names, `None` for encryption-only
/// algorithms.
const fn signing_algorithm(declared: &KeyAlgorithm) -> Option<Algorithm> {
    match declared {
        KeyAlgorithm::HS256 => Some(Algorithm::HS256),
        KeyAlgorithm::HS384 => Some(Algorithm::HS384),
        KeyAlgorithm::HS512 => Some(Algorithm::HS512),
        KeyAlgorithm::ES256 => Some(Algorithm::ES256),
        KeyAlgorithm::ES384 => Some(Algorithm::ES384),
        KeyAlgorithm::RS256 => Some(Algorithm::RS256),
        KeyAlgorithm::RS384 => Some(Algorithm::RS384),
        KeyAlgorithm::RS512 => Some(Algorithm::RS512),
        KeyAlgorithm::PS256 => Some(Algorithm::PS256),
        KeyAlgorithm::PS384 => Some(Algorithm::PS384),
        KeyAlgorithm::PS512 => Some(Algorithm::PS512),
        KeyAlgorithm::EdDSA => Some(Algorithm::EdDSA),
        KeyAlgorithm::RSA1_5 | KeyAlgorithm::RSA_OAEP | KeyAlgorithm::RSA_OAEP_256 => None,
    }
}

/// Whether `jwk` is a key of the family `alg` signs with.
fn key_supports(jwk: &Jwk, alg: Algorithm) -> bool {
    let family_matches = match &jwk.algorithm {
        AlgorithmParameters::RSA(_) => matches!(
            alg,
            Algorithm::RS256
                | Algorithm::RS384
                | Algorithm::RS512
                | Algorithm::PS256
                | Algorithm::PS384
                | Algorithm::PS512
        ),
        AlgorithmParameters::EllipticCurve(_) => {
            matches!(alg, Algorithm::ES256 | Algorithm::ES384)
        }
        AlgorithmParameters::OctetKeyPair(_) => alg == Algorithm::EdDSA,
        // Symmetric keys are never published for webhook signing.
        AlgorithmParameters::OctetKey(_) => false,
    };

    family_matches
        && jwk
            .common
            .key_algorithm
            .as_ref()
            .is_none_or(|declared| signing_algorithm(declared) == Some(alg))
}

/// Decode a verified body into the event payload: the `event` member when
/// present, the whole body otherwise.
fn event_payload(body: &[u8]) -> Result<Value, VerificationError> {
    let mut json: Value = serde_json::from_slice(body)?;
    if let Some(event) = json.get_mut("event") {
        return Ok(event.take());
    }
    Ok(json)
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Verifies webhook signatures against the key set of one trusted instance.
///
/// Cheap to clone; clones share the cached key set.
#[derive(Clone)]
pub struct WebhookVerifier {
    inner: Arc<VerifierInner>,
}

struct VerifierInner {
    client: reqwest::Client,
    trusted_origin: Origin,
    jwks_url: String,
    key_sets: Cache<String, Arc<JwkSet>>,
    /// Key set URLs refetched within the cooldown window.
    recent_refetches: Cache<String, ()>,
}

impl WebhookVerifier {
    /// Create a verifier trusting the origin of `instance_url`.
    #[must_use]
    pub fn new(instance_url: &Url) -> Self {
        let trusted_origin = instance_url.origin();
        let jwks_url = format!("{}{JWKS_PATH}", trusted_origin.ascii_serialization());

        Self {
            inner: Arc::new(VerifierInner {
                client: reqwest::Client::new(),
                trusted_origin,
                jwks_url,
                key_sets: Cache::builder()
                    .max_capacity(16)
                    .time_to_live(KEY_SET_TTL)
                    .build(),
                recent_refetches: Cache::builder()
                    .max_capacity(16)
                    .time_to_live(REFETCH_COOLDOWN)
                    .build(),
            }),
        }
    }

    /// Location of the trusted key set.
    #[must_use]
    pub fn jwks_url(&self) -> &str {
        &self.inner.jwks_url
    }

    /// Verify a webhook request and return its event payload.
    ///
    /// Header checks happen before any network access.
    ///
    /// # Errors
    ///
    /// Returns the first check that fails.
    pub async fn verify(
        &self,
        headers: &HeaderMap,
        body: &[u8],
    ) -> Result<Value, VerificationError> {
        let signature = header_value(headers, SIGNATURE_HEADER)
            .ok_or(VerificationError::MissingSignature)?;
        let detached = DetachedSignature::parse(signature)?;

        let api_url =
            header_value(headers, API_URL_HEADER).ok_or(VerificationError::MissingApiUrl)?;
        self.check_origin(api_url)?;

        let header = detached.protected_header()?;
        let message = detached.signing_input(&header, body);
        self.verify_signature(&header, detached.signature, &message)
            .await?;

        event_payload(body)
    }

    fn check_origin(&self, api_url: &str) -> Result<(), VerificationError> {
        let origin = Url::parse(api_url)?.origin();
        if origin == self.inner.trusted_origin {
            Ok(())
        } else {
            Err(VerificationError::OriginMismatch {
                received: origin.ascii_serialization(),
                expected: self.inner.trusted_origin.ascii_serialization(),
            })
        }
    }

    async fn verify_signature(
        &self,
        header: &ProtectedHeader,
        signature: &str,
        message: &[u8],
    ) -> Result<(), VerificationError> {
        let mut key_set = self.key_set(false).await?;

        // A kid we have not seen may be a rotated key.
        if header.kid.is_some()
            && candidates(&key_set, header).is_empty()
            && self.claim_refetch().await
        {
            debug!(kid = ?header.kid, "Signing key not in cached key set, refetching");
            key_set = self.key_set(true).await?;
        }

        let keys = candidates(&key_set, header);
        if keys.is_empty() {
            return Err(VerificationError::UnknownKey);
        }

        for jwk in keys {
            let Ok(key) = DecodingKey::from_jwk(jwk) else {
                continue;
            };
            if jsonwebtoken::crypto::verify(signature, message, &key, header.alg).unwrap_or(false)
            {
                return Ok(());
            }
        }

        Err(VerificationError::InvalidSignature)
    }

    /// Whether a forced refetch may run now. At most one caller wins per
    /// cooldown window.
    async fn claim_refetch(&self) -> bool {
        let claimed = self
            .inner
            .recent_refetches
            .entry(self.inner.jwks_url.clone())
            .or_insert(())
            .await
            .is_fresh();
        if !claimed {
            debug!("Key set refetched recently, skipping");
        }
        claimed
    }

    async fn key_set(&self, refresh: bool) -> Result<Arc<JwkSet>, VerificationError> {
        let url = &self.inner.jwks_url;
        if refresh {
            self.inner.key_sets.invalidate(url).await;
        }

        self.inner
            .key_sets
            .try_get_with(url.clone(), async {
                debug!(url = %url, "Fetching webhook key set");
                let key_set = self
                    .inner
                    .client
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<JwkSet>()
                    .await?;
                Ok::<_, reqwest::Error>(Arc::new(key_set))
            })
            .await
            .map_err(|e| VerificationError::KeySetFetch(e.to_string()))
    }
}

/// Keys of `key_set` that may have produced a signature under `header`.
fn candidates<'a>(key_set: &'a JwkSet, header: &ProtectedHeader) -> Vec<&'a Jwk> {
    let keys: Vec<&Jwk> = match &header.kid {
        Some(kid) => key_set.find(kid).into_iter().collect(),
        None => key_set.keys.iter().collect(),
    };

    keys.into_iter()
        .filter(|jwk| key_supports(jwk, header.alg))
        .collect()
}
