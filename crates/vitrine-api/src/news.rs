use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use vitrine_types::api::{CreateNewsRequest, UpdateNewsRequest};

use crate::AppState;
use crate::error::ApiError;
use crate::session::Caller;
use crate::workflow;

pub async fn list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    let items = workflow::list_published(state, &caller).await?;
    Ok(Json(items))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    let item = workflow::get_news(state, &caller, id).await?;
    Ok(Json(item))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<CreateNewsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ack = workflow::create_news(state, &caller, req).await?;
    Ok((StatusCode::CREATED, Json(ack)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(caller): Extension<Caller>,
    Json(req): Json<UpdateNewsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ack = workflow::update_news(state, &caller, id, req).await?;
    Ok(Json(ack))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    let ack = workflow::delete_news(state, &caller, id).await?;
    Ok(Json(ack))
}

pub async fn list_all(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<impl IntoResponse, ApiError> {
    let items = workflow::list_all_news(state, &caller).await?;
    Ok(Json(items))
}
