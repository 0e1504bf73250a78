use std::sync::LazyLock;

use regex::Regex;

use vitrine_types::api::{ContactSubmitRequest, CreateNewsRequest, UpdateNewsRequest};

use crate::error::ApiError;

/// Same address shape the contact form enforces client-side: local@domain.tld
/// with no whitespace or extra @ anywhere.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

const MAX_SHORT_FIELD: usize = 255;

pub fn contact_submission(req: &ContactSubmitRequest) -> Result<(), ApiError> {
    non_blank("name", &req.name)?;
    max_chars("name", &req.name)?;
    if !EMAIL_RE.is_match(&req.email) {
        return Err(ApiError::validation("email", "must be a valid email address"));
    }
    non_blank("subject", &req.subject)?;
    max_chars("subject", &req.subject)?;
    non_blank("message", &req.message)?;
    Ok(())
}

pub fn news_creation(req: &CreateNewsRequest) -> Result<(), ApiError> {
    non_blank("title", &req.title)?;
    max_chars("title", &req.title)?;
    non_blank("content", &req.content)?;
    Ok(())
}

/// Title and content are both optional on update, but when present they must
/// satisfy the same constraints as creation.
pub fn news_update(req: &UpdateNewsRequest) -> Result<(), ApiError> {
    if let Some(title) = &req.title {
        non_blank("title", title)?;
        max_chars("title", title)?;
    }
    if let Some(content) = &req.content {
        non_blank("content", content)?;
    }
    Ok(())
}

/// Phone is unvalidated free text; the only normalization is blank → absent,
/// so "no phone" is a single state downstream.
pub fn normalize_phone(phone: Option<&str>) -> Option<String> {
    phone
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

fn non_blank(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(field, "must not be empty"));
    }
    Ok(())
}

fn max_chars(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.chars().count() > MAX_SHORT_FIELD {
        return Err(ApiError::validation(field, "must be at most 255 characters"));
    }
    Ok(())
}
