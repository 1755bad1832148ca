use std::sync::Arc;

use chrono::Utc;

use crate::identity::IdentityError;
use crate::models::event::IdentityEvent;
use crate::models::user::User;
use crate::store::{StoreError, UserStore};

/// Applies identity lifecycle events from the provider to the user store.
///
/// Precondition: events are trusted as delivered. The webhook boundary
/// authenticates the provider and validates payload shape before calling in;
/// nothing is re-verified here. Events are applied in arrival order with no
/// reconciliation, so out-of-order delivery resolves as last write wins.
pub struct IdentityEventHandler {
    store: Arc<UserStore>,
}

impl IdentityEventHandler {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store }
    }

    /// Apply a single event.
    pub fn apply(&self, event: &IdentityEvent) -> Result<(), IdentityError> {
        match event {
            IdentityEvent::UserUpserted {
                external_id,
                given_name,
                family_name,
            } => {
                self.upsert(external_id, given_name, family_name)?;
                Ok(())
            }
            IdentityEvent::UserDeleted { external_id } => self.delete(external_id),
        }
    }

    /// Create or update the record for `external_id`.
    ///
    /// The display name is the literal space-separated concatenation of the
    /// provider's name parts, empty substrings included. Re-applying the same
    /// event is a no-op beyond the name overwrite: the record keeps its id
    /// and no duplicate is created.
    pub fn upsert(
        &self,
        external_id: &str,
        given_name: &str,
        family_name: &str,
    ) -> Result<User, StoreError> {
        let name = format!("{} {}", given_name, family_name);

        match self.store.find_by_external_id(external_id)? {
            Some(user) => {
                let updated_at = Utc::now();
                self.store.update_name(&user.id, &name, updated_at)?;
                Ok(User {
                    name,
                    updated_at,
                    ..user
                })
            }
            None => {
                let user = User::new(external_id.to_string(), name);
                self.store.insert(&user)?;
                tracing::info!("Created user {} for external id {}", user.id, external_id);
                Ok(user)
            }
        }
    }

    /// Permanently remove the record for `external_id`.
    ///
    /// Fails with `UserNotFound` when no record exists; the store is left
    /// untouched and the caller decides whether to retry or drop the event.
    pub fn delete(&self, external_id: &str) -> Result<(), IdentityError> {
        match self.store.find_by_external_id(external_id)? {
            Some(user) => {
                self.store.delete(&user.id)?;
                tracing::info!("Deleted user {} for external id {}", user.id, external_id);
                Ok(())
            }
            None => Err(IdentityError::UserNotFound(external_id.to_string())),
        }
    }
}
