mod resolver;
mod sync;

pub use resolver::CurrentUserResolver;
pub use sync::IdentityEventHandler;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("No user for external id: {0}")]
    UserNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
