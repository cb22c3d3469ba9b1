//! Session lifecycle endpoints: pairing code, status, logout.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use chatlens_types::session::PairingQuery;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /qr - Current pairing image, or the linked flag once paired.
pub async fn get_qr(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    match state.session.pairing_status() {
        PairingQuery::Artifact(artifact) => Ok(Json(json!({ "pairingArtifact": artifact }))),
        PairingQuery::Authenticated => Ok(Json(json!({ "authenticated": true }))),
        PairingQuery::Unavailable => Err(AppError::NotFound(
            "Pairing code not available yet".to_string(),
        )),
    }
}

/// GET /status
pub async fn get_status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "authenticated": state.session.is_authenticated() }))
}

/// POST /logout - Unlink the account and restart pairing.
pub async fn logout(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.session.logout().await?;
    Ok(Json(json!({
        "message": "Session closed. Scan the new QR code to link again."
    })))
}
