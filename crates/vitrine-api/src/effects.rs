use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use vitrine_types::api::ContactSubmitRequest;

use crate::validate;

/// How long a side call may run before it counts as failed. The primary
/// operation never waits longer than this on a notification or image call.
const SIDE_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Message pushed to the site owner after a contact submission is persisted.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerNote {
    pub title: String,
    pub content: String,
}

impl OwnerNote {
    /// Compose the owner notification for a new inquiry. The 電話番号 line is
    /// omitted entirely when no phone number was supplied.
    pub fn for_contact(req: &ContactSubmitRequest) -> Self {
        let phone = validate::normalize_phone(req.phone.as_deref());
        let phone_info = match &phone {
            Some(p) => format!("\n電話番号: {}", p),
            None => String::new(),
        };

        Self {
            title: format!("新しいお問合せ: {}", req.subject),
            content: format!(
                "{} ({}){} からお問合せがありました。\n\nメッセージ:\n{}",
                req.name, req.email, phone_info, req.message
            ),
        }
    }
}

/// Prompt handed to the image service for a news thumbnail.
pub fn thumbnail_prompt(title: &str) -> String {
    format!(
        "Professional news thumbnail for: {}. Elegant corporate style, modern design.",
        title
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
}

/// Owner notification port. Called at most once per submission; failures are
/// the caller's to swallow.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_owner(&self, note: &OwnerNote) -> anyhow::Result<()>;
}

/// Thumbnail generation port: prompt in, hosted image URL out.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> anyhow::Result<GeneratedImage>;
}

/// Posts owner notes to a configured webhook endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SIDE_CALL_TIMEOUT)
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify_owner(&self, note: &OwnerNote) -> anyhow::Result<()> {
        self.client
            .post(&self.url)
            .json(note)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Fallback when no webhook is configured: the note only reaches the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_owner(&self, note: &OwnerNote) -> anyhow::Result<()> {
        info!("owner notification (no webhook configured): {}", note.title);
        Ok(())
    }
}

/// Calls an external prompt-in/URL-out image service.
pub struct HttpImageGenerator {
    client: reqwest::Client,
    url: String,
}

impl HttpImageGenerator {
    pub fn new(url: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SIDE_CALL_TIMEOUT)
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl ImageGenerator for HttpImageGenerator {
    async fn generate_image(&self, prompt: &str) -> anyhow::Result<GeneratedImage> {
        let image = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "prompt": prompt }))
            .send()
            .await?
            .error_for_status()?
            .json::<GeneratedImage>()
            .await?;
        Ok(image)
    }
}

/// Stands in when no image service is configured; every request degrades to
/// "no thumbnail".
pub struct DisabledImageGenerator;

#[async_trait]
impl ImageGenerator for DisabledImageGenerator {
    async fn generate_image(&self, _prompt: &str) -> anyhow::Result<GeneratedImage> {
        anyhow::bail!("image generation is not configured")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inquiry(phone: Option<&str>) -> ContactSubmitRequest {
        ContactSubmitRequest {
            name: "山田太郎".into(),
            email: "yamada@example.com".into(),
            phone: phone.map(str::to_string),
            subject: "相談".into(),
            message: "こんにちは".into(),
        }
    }

    #[test]
    fn note_without_phone_has_no_phone_line() {
        let note = OwnerNote::for_contact(&inquiry(None));
        assert_eq!(note.title, "新しいお問合せ: 相談");
        assert!(note.content.starts_with("山田太郎 (yamada@example.com) からお問合せがありました。"));
        assert!(!note.content.contains("電話番号"));
        assert!(note.content.ends_with("メッセージ:\nこんにちは"));
    }

    #[test]
    fn note_with_phone_carries_the_number() {
        let note = OwnerNote::for_contact(&inquiry(Some("090-1234-5678")));
        assert!(note.content.contains("\n電話番号: 090-1234-5678"));
    }

    #[test]
    fn blank_phone_is_treated_as_absent() {
        let note = OwnerNote::for_contact(&inquiry(Some("  ")));
        assert!(!note.content.contains("電話番号"));
    }

    #[test]
    fn prompt_embeds_the_title() {
        assert_eq!(
            thumbnail_prompt("新製品発表"),
            "Professional news thumbnail for: 新製品発表. Elegant corporate style, modern design."
        );
    }
}
