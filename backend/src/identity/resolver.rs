use std::sync::Arc;

use crate::auth::AuthIdentity;
use crate::identity::IdentityError;
use crate::models::user::User;
use crate::store::{StoreError, UserStore};

/// Resolves the caller's identity assertion to the locally synced user.
///
/// Read-only: a valid identity with no matching record resolves to `None`
/// rather than creating one, since the corresponding sync event may simply
/// not have arrived yet.
pub struct CurrentUserResolver {
    store: Arc<UserStore>,
}

impl CurrentUserResolver {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }

    /// Resolve the current user, treating both anonymous callers and
    /// not-yet-synced identities as `None`.
    pub fn resolve(&self, identity: Option<&AuthIdentity>) -> Result<Option<User>, StoreError> {
        let Some(identity) = identity else {
            return Ok(None);
        };
        self.store.find_by_external_id(&identity.sub)
    }

    /// Strict variant for call sites that need a known actor. Never creates
    /// a record; the `None` case becomes `UserNotFound`.
    pub fn resolve_or_fail(&self, identity: Option<&AuthIdentity>) -> Result<User, IdentityError> {
        let subject = identity
            .map(|i| i.sub.clone())
            .unwrap_or_else(|| "anonymous".to_string());

        self.resolve(identity)?
            .ok_or(IdentityError::UserNotFound(subject))
    }
}
