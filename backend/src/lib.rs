pub mod auth;
pub mod config;
pub mod identity;
pub mod logging;
pub mod models;
pub mod routes;
pub mod store;
pub mod test_util;

pub use auth::{AuthIdentity, JwksClient};
pub use config::Config;
pub use identity::{CurrentUserResolver, IdentityError, IdentityEventHandler};
pub use models::event::IdentityEvent;
pub use models::user::User;
pub use store::{StoreError, UserStore};

use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub jwks_client: JwksClient,
    pub event_handler: IdentityEventHandler,
    pub resolver: CurrentUserResolver,
}

impl AppState {
    pub fn new(config: Config, jwks_client: JwksClient, store: Arc<UserStore>) -> Self {
        Self {
            config,
            jwks_client,
            event_handler: IdentityEventHandler::new(store.clone()),
            resolver: CurrentUserResolver::new(store),
        }
    }
}
