use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use vitrine_api::effects::{
    DisabledImageGenerator, HttpImageGenerator, ImageGenerator, LogNotifier, Notifier,
    WebhookNotifier,
};
use vitrine_api::{AppState, AppStateInner, contact, news, session};
use vitrine_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitrine=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("VITRINE_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("VITRINE_DB_PATH").unwrap_or_else(|_| "vitrine.db".into());
    let host = std::env::var("VITRINE_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("VITRINE_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let public_dir = std::env::var("VITRINE_PUBLIC_DIR").unwrap_or_else(|_| "public".into());

    // Init database
    let db = Database::open(&PathBuf::from(&db_path))?;

    seed_admin(&db)?;

    // External collaborators. Both are optional: without a webhook the owner
    // note only reaches the log, without an image service news items publish
    // without thumbnails.
    let notifier: Arc<dyn Notifier> = match std::env::var("VITRINE_NOTIFY_URL") {
        Ok(url) => Arc::new(WebhookNotifier::new(url)?),
        Err(_) => Arc::new(LogNotifier),
    };
    let images: Arc<dyn ImageGenerator> = match std::env::var("VITRINE_IMAGE_API_URL") {
        Ok(url) => Arc::new(HttpImageGenerator::new(url)?),
        Err(_) => Arc::new(DisabledImageGenerator),
    };

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret,
        notifier,
        images,
    });

    // Routes
    let api = Router::new()
        .route("/contact", post(contact::submit))
        .route("/news", get(news::list).post(news::create))
        .route(
            "/news/{id}",
            get(news::get_by_id).put(news::update).delete(news::remove),
        )
        .route("/admin/news", get(news::list_all))
        .route("/auth/login", post(session::login))
        .route("/auth/me", get(session::me))
        .layer(middleware::from_fn(session::resolve_caller))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api)
        .fallback_service(ServeDir::new(&public_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Vitrine server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the administrator account from the environment when it is missing.
/// There is no self-service registration; this is the only way accounts come
/// into existence.
fn seed_admin(db: &Database) -> anyhow::Result<()> {
    let (Ok(username), Ok(password)) = (
        std::env::var("VITRINE_ADMIN_USER"),
        std::env::var("VITRINE_ADMIN_PASSWORD"),
    ) else {
        return Ok(());
    };

    if db.get_user_by_username(&username)?.is_some() {
        return Ok(());
    }

    let hash = session::hash_password(&password)?;
    let id = db.create_user(&username, &hash, "admin")?;
    info!("Seeded admin account '{}' (user {})", username, id);
    Ok(())
}
