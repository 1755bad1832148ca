mod jwks;

pub use jwks::JwksClient;

/// Verified identity assertion for the current caller.
///
/// Only constructed after token validation; holding one means the bearer
/// token checked out against the provider's signing keys.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    /// Subject claim, the provider-issued external user id.
    pub sub: String,
    pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,
    #[error("Invalid Authorization header format")]
    InvalidFormat,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("JWKS fetch error: {0}")]
    JwksFetchError(String),
    #[error("Key not found for kid: {0}")]
    KeyNotFound(String),
}

impl AuthError {
    /// Whether this failure just means no credentials were presented,
    /// as opposed to credentials that failed verification.
    pub fn is_anonymous(&self) -> bool {
        matches!(self, AuthError::MissingHeader)
    }
}
