use std::sync::Arc;

use axum::http::HeaderMap;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::models::user::User;
use crate::AppState;

/// GET /me - resolve the caller to the locally synced user.
///
/// Anonymous callers and authenticated callers whose sync event has not
/// arrived yet both get a JSON `null`; only a malformed or invalid token
/// is rejected.
async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Option<User>>, (StatusCode, String)> {
    let identity = match state.jwks_client.authenticate(&headers).await {
        Ok(identity) => Some(identity),
        Err(e) if e.is_anonymous() => None,
        Err(e) => return Err((StatusCode::UNAUTHORIZED, e.to_string())),
    };

    let user = state
        .resolver
        .resolve(identity.as_ref())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(user))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/me", get(me)).with_state(state)
}
