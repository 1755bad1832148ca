use std::sync::Arc;

use crate::auth::AuthIdentity;
use crate::config::{
    Config, CorsConfig, DatabaseConfig, LoggingConfig, OidcConfig, ServerConfig, WebhookConfig,
};
use crate::store::UserStore;

pub const TEST_WEBHOOK_SECRET: &str = "test-webhook-secret";

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        oidc: OidcConfig {
            issuer: "https://test-issuer".to_string(),
        },
        database: DatabaseConfig {
            url: ":memory:".to_string(),
        },
        webhook: WebhookConfig {
            secret: TEST_WEBHOOK_SECRET.to_string(),
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        cors: CorsConfig {
            origins: "*".to_string(),
        },
    }
}

pub fn test_store() -> Arc<UserStore> {
    Arc::new(UserStore::new(":memory:").unwrap())
}

pub fn test_identity(sub: &str) -> AuthIdentity {
    AuthIdentity {
        sub: sub.to_string(),
        email: None,
    }
}
