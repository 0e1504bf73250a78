use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};

use vitrine_types::api::ContactSubmitRequest;

use crate::AppState;
use crate::error::ApiError;
use crate::session::Caller;
use crate::workflow;

/// Public contact form endpoint.
pub async fn submit(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<ContactSubmitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ack = workflow::submit_contact(state, &caller, req).await?;
    Ok((StatusCode::CREATED, Json(ack)))
}
