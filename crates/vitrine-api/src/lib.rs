pub mod contact;
pub mod effects;
pub mod error;
pub mod guard;
pub mod news;
pub mod session;
pub mod validate;
pub mod workflow;

use std::sync::Arc;

use vitrine_db::Database;

use crate::effects::{ImageGenerator, Notifier};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub notifier: Arc<dyn Notifier>,
    pub images: Arc<dyn ImageGenerator>,
}
