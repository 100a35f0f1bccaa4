use std::time::Duration;

use jsonwebtoken::jwk::JwkSet;

use super::JwtError;

/// Fetch the issuer's published key set (`/.well-known/jwks.json`)
pub async fn fetch_jwks(url: &str) -> Result<JwkSet, JwtError> {
    let client = reqwest::Client::new();
    let response = client
        .get(url)
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| JwtError::KeySet(format!("{}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(JwtError::KeySet(format!("{} returned {}", url, response.status())));
    }

    response
        .json::<JwkSet>()
        .await
        .map_err(|e| JwtError::KeySet(format!("{}: {}", url, e)))
}
