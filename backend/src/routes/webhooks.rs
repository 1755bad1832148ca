use std::sync::Arc;

use axum::http::HeaderMap;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::identity::IdentityError;
use crate::models::event::IdentityEvent;
use crate::AppState;

/// POST /webhooks/identity - inbound identity lifecycle events.
///
/// This route is the trust boundary for the sync handler: delivery must
/// present the shared webhook secret, and whatever arrives past that check
/// is applied as-is. A delete for an unknown user maps to 404 so the
/// delivery side can decide whether to retry, drop, or alert.
async fn identity_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(event): Json<IdentityEvent>,
) -> Result<StatusCode, (StatusCode, String)> {
    verify_delivery_secret(&headers, &state.config.webhook.secret)?;

    tracing::debug!("Received identity event for external id {}", event.external_id());

    match state.event_handler.apply(&event) {
        Ok(()) => Ok(StatusCode::OK),
        Err(e @ IdentityError::UserNotFound(_)) => Err((StatusCode::NOT_FOUND, e.to_string())),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

fn verify_delivery_secret(headers: &HeaderMap, secret: &str) -> Result<(), (StatusCode, String)> {
    let presented = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match presented {
        Some(presented) if presented == secret => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            "Invalid webhook secret".to_string(),
        )),
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhooks/identity", post(identity_event))
        .with_state(state)
}
