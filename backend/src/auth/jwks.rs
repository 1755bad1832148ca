use std::collections::HashMap;
use std::sync::Arc;

use axum::http::HeaderMap;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::auth::{AuthError, AuthIdentity};

#[derive(Debug, Deserialize)]
struct OidcConfig {
    jwks_uri: String,
}

/// JWKS key set response.
#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    n: Option<String>,
    e: Option<String>,
}

/// Session token claims issued by the identity provider.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[allow(dead_code)]
    exp: u64,
    #[allow(dead_code)]
    iat: u64,
}

/// Client for fetching and caching the identity provider's signing keys.
pub struct JwksClient {
    http_client: Client,
    jwks_uri: String,
    keys: Arc<RwLock<HashMap<String, DecodingKey>>>,
    issuer: String,
}

impl JwksClient {
    pub async fn new(issuer: &str) -> Result<Self, AuthError> {
        let http_client = Client::new();

        // Fetch OIDC configuration to get the JWKS URI
        let config_url = format!(
            "{}/.well-known/openid-configuration",
            issuer.trim_end_matches('/')
        );
        let config: OidcConfig = http_client
            .get(&config_url)
            .send()
            .await
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))?;

        let client = Self {
            http_client,
            jwks_uri: config.jwks_uri,
            keys: Arc::new(RwLock::new(HashMap::new())),
            issuer: issuer.to_string(),
        };

        client.refresh_keys().await?;

        Ok(client)
    }

    async fn refresh_keys(&self) -> Result<(), AuthError> {
        tracing::info!("Fetching JWKS from {}", self.jwks_uri);

        let response: JwksResponse = self
            .http_client
            .get(&self.jwks_uri)
            .send()
            .await
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))?;

        let mut keys = self.keys.write().await;
        keys.clear();

        for jwk in response.keys {
            if jwk.kty == "RSA" {
                if let (Some(n), Some(e)) = (&jwk.n, &jwk.e) {
                    match DecodingKey::from_rsa_components(n, e) {
                        Ok(key) => {
                            keys.insert(jwk.kid.clone(), key);
                        }
                        Err(e) => {
                            tracing::warn!("Failed to parse RSA key {}: {}", jwk.kid, e);
                        }
                    }
                }
            }
        }

        tracing::info!("Loaded {} JWKS keys", keys.len());
        Ok(())
    }

    /// Validate the Bearer token and return the caller's identity assertion.
    ///
    /// A missing Authorization header is reported as `MissingHeader` so
    /// routes can treat the caller as anonymous instead of rejecting.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthIdentity, AuthError> {
        let auth_header = headers
            .get("authorization")
            .ok_or(AuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidFormat)?;

        if !auth_header.starts_with("Bearer ") {
            return Err(AuthError::InvalidFormat);
        }

        let token = &auth_header[7..];

        // Decode header to get kid
        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("Missing kid in token header".to_string()))?;

        let keys = self.keys.read().await;
        let key = keys
            .get(&kid)
            .ok_or_else(|| AuthError::KeyNotFound(kid.clone()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        // Provider session tokens carry no audience claim
        validation.validate_aud = false;

        let token_data =
            decode::<Claims>(token, key, &validation).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(AuthIdentity {
            sub: token_data.claims.sub,
            email: token_data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_bearer_scheme_detection() {
        let headers = headers_with_auth("Bearer eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.test");
        let auth_header = headers.get("authorization").and_then(|v| v.to_str().ok());
        assert!(auth_header.unwrap().starts_with("Bearer "));

        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        let auth_header = headers.get("authorization").and_then(|v| v.to_str().ok());
        assert!(!auth_header.unwrap().starts_with("Bearer "));
    }

    #[test]
    fn test_empty_headers_have_no_auth() {
        assert!(HeaderMap::new().get("authorization").is_none());
    }

    #[test]
    fn test_claims_deserialize_without_email() {
        let claims: Claims =
            serde_json::from_str(r#"{"sub": "ext_1", "exp": 1, "iat": 0}"#).unwrap();
        assert_eq!(claims.sub, "ext_1");
        assert!(claims.email.is_none());
    }

    #[test]
    fn test_auth_identity_clone() {
        let original = AuthIdentity {
            sub: "ext_1".to_string(),
            email: Some("ada@example.com".to_string()),
        };
        let cloned = original.clone();
        assert_eq!(cloned.sub, original.sub);
        assert_eq!(cloned.email, original.email);
    }
}
