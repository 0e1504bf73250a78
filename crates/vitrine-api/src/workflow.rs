//! The two user-facing submission workflows plus the admin news operations.
//!
//! Every function runs validate → authorize → persist in that order, with the
//! caller identity as an explicit parameter. Side effects are best-effort:
//! owner notification fires only after the contact row is durable, and
//! thumbnail generation resolves (success or failure) before the news row is
//! written.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{error, info, warn};

use vitrine_db::models::NewsRow;
use vitrine_types::api::{Ack, ContactSubmitRequest, CreateNewsRequest, UpdateNewsRequest};
use vitrine_types::models::NewsItem;

use crate::AppState;
use crate::effects::{self, OwnerNote};
use crate::error::ApiError;
use crate::guard::{self, Operation};
use crate::session::Caller;
use crate::validate;

/// Submit a public contact inquiry. The submission is durable before the
/// notification attempt is issued, so a failed side call can never lose an
/// inquiry.
pub async fn submit_contact(
    state: AppState,
    caller: &Caller,
    req: ContactSubmitRequest,
) -> Result<Ack, ApiError> {
    validate::contact_submission(&req)?;
    guard::ensure_permitted(Operation::ContactSubmit, caller)?;

    let phone = validate::normalize_phone(req.phone.as_deref());

    let db = state.clone();
    let insert = req.clone();
    let contact_id = tokio::task::spawn_blocking(move || {
        db.db.create_contact(
            &insert.name,
            &insert.email,
            phone.as_deref(),
            &insert.subject,
            &insert.message,
        )
    })
    .await
    .map_err(join_error)??;

    // Best-effort: a failed notification never fails the submission.
    let note = OwnerNote::for_contact(&req);
    if let Err(e) = state.notifier.notify_owner(&note).await {
        warn!("failed to notify owner of contact {}: {}", contact_id, e);
    }

    Ok(Ack::ok())
}

/// Publish a news item. When the caller opted in, the thumbnail is resolved
/// before the row is written, so a published item never references an image
/// that was not produced; generation failure only means no thumbnail.
pub async fn create_news(
    state: AppState,
    caller: &Caller,
    req: CreateNewsRequest,
) -> Result<Ack, ApiError> {
    validate::news_creation(&req)?;
    let author = guard::require_admin(Operation::NewsCreate, caller)?;

    let thumbnail_url = if req.ai_generate_thumbnail {
        let prompt = effects::thumbnail_prompt(&req.title);
        match state.images.generate_image(&prompt).await {
            Ok(image) => Some(image.url),
            Err(e) => {
                warn!("failed to generate thumbnail: {}", e);
                None
            }
        }
    } else {
        None
    };

    let db = state.clone();
    let author_id = author.id;
    let news_id = tokio::task::spawn_blocking(move || {
        db.db.create_news(
            &req.title,
            &req.content,
            thumbnail_url.as_deref(),
            author_id,
            true,
        )
    })
    .await
    .map_err(join_error)??;

    info!("news item {} published by {}", news_id, author.username);
    Ok(Ack::ok())
}

pub async fn update_news(
    state: AppState,
    caller: &Caller,
    id: i64,
    req: UpdateNewsRequest,
) -> Result<Ack, ApiError> {
    validate::news_update(&req)?;
    guard::require_admin(Operation::NewsUpdate, caller)?;

    // Nothing to change: report success without touching the row.
    if req.title.is_none() && req.content.is_none() {
        return Ok(Ack::ok());
    }

    let db = state.clone();
    tokio::task::spawn_blocking(move || {
        db.db.update_news(id, req.title.as_deref(), req.content.as_deref())
    })
    .await
    .map_err(join_error)??;

    Ok(Ack::ok())
}

/// Deleting an id that no longer exists still succeeds; the second of two
/// identical deletes is a no-op.
pub async fn delete_news(state: AppState, caller: &Caller, id: i64) -> Result<Ack, ApiError> {
    guard::require_admin(Operation::NewsDelete, caller)?;

    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.delete_news(id))
        .await
        .map_err(join_error)??;

    Ok(Ack::ok())
}

/// Public listing: published items only, newest first.
pub async fn list_published(state: AppState, caller: &Caller) -> Result<Vec<NewsItem>, ApiError> {
    guard::ensure_permitted(Operation::NewsList, caller)?;

    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.get_published_news())
        .await
        .map_err(join_error)??;

    Ok(rows.into_iter().map(news_item_from_row).collect())
}

pub async fn get_news(state: AppState, caller: &Caller, id: i64) -> Result<NewsItem, ApiError> {
    guard::ensure_permitted(Operation::NewsGet, caller)?;

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_news_by_id(id))
        .await
        .map_err(join_error)??;

    row.map(news_item_from_row).ok_or(ApiError::NotFound)
}

/// Admin listing: every item, drafts included.
pub async fn list_all_news(state: AppState, caller: &Caller) -> Result<Vec<NewsItem>, ApiError> {
    guard::require_admin(Operation::NewsListAll, caller)?;

    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.get_all_news())
        .await
        .map_err(join_error)??;

    Ok(rows.into_iter().map(news_item_from_row).collect())
}

fn join_error(e: tokio::task::JoinError) -> ApiError {
    error!("spawn_blocking join error: {}", e);
    ApiError::Persistence(anyhow::anyhow!(e))
}

fn news_item_from_row(row: NewsRow) -> NewsItem {
    let created_at = parse_timestamp(&row.created_at, "news");
    let updated_at = parse_timestamp(&row.updated_at, "news");

    NewsItem {
        id: row.id,
        title: row.title,
        content: row.content,
        thumbnail_url: row.thumbnail_url,
        author_id: row.author_id,
        published: row.published,
        created_at,
        updated_at,
    }
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
/// Parse as naive UTC and convert; corrupt values degrade to the epoch.
pub(crate) fn parse_timestamp(raw: &str, what: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}' on {}: {}", raw, what, e);
            DateTime::default()
        })
}
