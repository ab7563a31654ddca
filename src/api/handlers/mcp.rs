use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::rpc;

use super::super::state::AppState;

/// JSON-RPC endpoint. Notifications are answered with 202 and no body.
pub async fn handle_rpc(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    match rpc::handle_message(&state.dispatcher, &body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}
