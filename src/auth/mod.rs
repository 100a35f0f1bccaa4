pub mod identity;
pub mod jwks;

use chrono::{Duration, Utc};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::AuthConfig;

pub use identity::{require_user_id, AuthUser, RequestContext};

/// Claims issued by the hosting shell. `sub` is the per-app opaque user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub aud: Audience,
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
}

/// `aud` may be a single string or an array of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::One(aud) => aud == audience,
            Audience::Many(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

impl Claims {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>, subject: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            iss: issuer.into(),
            aud: Audience::One(audience.into()),
            sub: subject.into(),
            exp: (now + ttl).timestamp(),
            iat: Some(now.timestamp()),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("No signing key configured (set AUTH_JWT_SECRET or AUTH_JWKS_URL)")]
    NoKeySource,

    #[error("Failed to load key set: {0}")]
    KeySet(String),

    #[error("Token header has no key id")]
    MissingKeyId,

    #[error("Unknown signing key '{0}'")]
    UnknownKey(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),
}

/// Mint an HS256 token. Production tokens come from the external issuer;
/// this is for local development and tests.
pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

enum KeySource {
    Secret(DecodingKey),
    Jwks(JwkSet),
}

/// Verifies bearer tokens against the configured issuer, audience and keys
pub struct TokenVerifier {
    keys: KeySource,
    issuer: String,
    audience: String,
}

impl TokenVerifier {
    pub fn with_secret(secret: &str, issuer: impl Into<String>, audience: impl Into<String>) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }
        Ok(Self {
            keys: KeySource::Secret(DecodingKey::from_secret(secret.as_bytes())),
            issuer: issuer.into(),
            audience: audience.into(),
        })
    }

    pub fn with_jwks(keys: JwkSet, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            keys: KeySource::Jwks(keys),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Build from configuration; a shared secret wins over a key set URL.
    pub async fn from_config(config: &AuthConfig) -> Result<Self, JwtError> {
        if let Some(secret) = &config.jwt_secret {
            info!("Verifying tokens with shared HS256 secret (issuer {})", config.issuer);
            return Self::with_secret(secret, &config.issuer, &config.audience);
        }

        let url = config.jwks_url.as_deref().ok_or(JwtError::NoKeySource)?;
        let keys = jwks::fetch_jwks(url).await?;
        info!("Loaded {} signing keys from {}", keys.keys.len(), url);
        Ok(Self::with_jwks(keys, &config.issuer, &config.audience))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let (key, algorithm) = match &self.keys {
            KeySource::Secret(key) => (key.clone(), Algorithm::HS256),
            KeySource::Jwks(set) => {
                let header = decode_header(token).map_err(|e| JwtError::InvalidToken(e.to_string()))?;
                let kid = header.kid.ok_or(JwtError::MissingKeyId)?;
                let jwk = set.find(&kid).ok_or_else(|| JwtError::UnknownKey(kid.clone()))?;
                let key = DecodingKey::from_jwk(jwk).map_err(|e| JwtError::KeySet(e.to_string()))?;
                (key, Algorithm::RS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";
    const ISS: &str = "https://issuer.test";
    const AUD: &str = "tenant:test";

    fn verifier() -> TokenVerifier {
        TokenVerifier::with_secret(SECRET, ISS, AUD).unwrap()
    }

    #[test]
    fn accepts_token_with_expected_claims() {
        let claims = Claims::new(ISS, AUD, "app_user_1", Duration::minutes(15));
        let token = generate_jwt(&claims, SECRET).unwrap();
        let verified = verifier().verify(&token).unwrap();
        assert_eq!(verified.sub, "app_user_1");
    }

    fn sign_raw(claims: serde_json::Value) -> String {
        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    fn in_fifteen_minutes() -> i64 {
        (Utc::now() + Duration::minutes(15)).timestamp()
    }

    #[test]
    fn issued_at_is_optional() {
        let token = sign_raw(serde_json::json!({
            "iss": ISS,
            "aud": AUD,
            "sub": "app_user_2",
            "exp": in_fifteen_minutes(),
        }));
        let verified = verifier().verify(&token).unwrap();
        assert_eq!(verified.sub, "app_user_2");
        assert_eq!(verified.iat, None);
    }

    #[test]
    fn audience_may_be_an_array() {
        let token = sign_raw(serde_json::json!({
            "iss": ISS,
            "aud": ["tenant:other", AUD],
            "sub": "app_user_3",
            "exp": in_fifteen_minutes(),
            "iat": Utc::now().timestamp(),
        }));
        let verified = verifier().verify(&token).unwrap();
        assert!(verified.aud.contains(AUD));
        assert_eq!(verified.sub, "app_user_3");

        let foreign = sign_raw(serde_json::json!({
            "iss": ISS,
            "aud": ["tenant:other"],
            "sub": "u",
            "exp": in_fifteen_minutes(),
        }));
        assert!(matches!(verifier().verify(&foreign), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn rejects_wrong_audience_and_issuer() {
        let wrong_aud = generate_jwt(&Claims::new(ISS, "tenant:other", "u", Duration::minutes(15)), SECRET).unwrap();
        assert!(matches!(verifier().verify(&wrong_aud), Err(JwtError::InvalidToken(_))));

        let wrong_iss = generate_jwt(&Claims::new("https://evil.test", AUD, "u", Duration::minutes(15)), SECRET).unwrap();
        assert!(matches!(verifier().verify(&wrong_iss), Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn rejects_expired_and_foreign_signatures() {
        let expired = generate_jwt(&Claims::new(ISS, AUD, "u", Duration::minutes(-30)), SECRET).unwrap();
        assert!(verifier().verify(&expired).is_err());

        let forged = generate_jwt(&Claims::new(ISS, AUD, "u", Duration::minutes(15)), "another-secret").unwrap();
        assert!(verifier().verify(&forged).is_err());
    }

    #[test]
    fn empty_secret_is_refused() {
        let claims = Claims::new(ISS, AUD, "u", Duration::minutes(15));
        assert!(matches!(generate_jwt(&claims, ""), Err(JwtError::InvalidSecret)));
        assert!(TokenVerifier::with_secret("", ISS, AUD).is_err());
    }

    #[test]
    fn key_set_requires_kid() {
        let set: JwkSet = serde_json::from_str(r#"{"keys": []}"#).unwrap();
        let verifier = TokenVerifier::with_jwks(set, ISS, AUD);
        let token = generate_jwt(&Claims::new(ISS, AUD, "u", Duration::minutes(15)), SECRET).unwrap();
        assert!(matches!(verifier.verify(&token), Err(JwtError::MissingKeyId)));
    }
}
