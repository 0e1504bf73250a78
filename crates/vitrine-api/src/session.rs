use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{debug, error, warn};

use vitrine_types::api::{Claims, LoginRequest, LoginResponse};
use vitrine_types::models::{Role, User};

use crate::AppState;

/// Identity of an authenticated caller, decoded from the session token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

/// The acting principal for a request: anonymous or an authenticated user.
/// Resolved once per request and passed explicitly into the workflows.
#[derive(Debug, Clone)]
pub struct Caller(Option<CurrentUser>);

impl Caller {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn authenticated(user: CurrentUser) -> Self {
        Self(Some(user))
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.0.as_ref()
    }
}

/// Resolve the optional bearer token into a `Caller` extension. A missing or
/// undecodable token resolves to the anonymous caller; privileged operations
/// are rejected later at the authorization guard.
pub async fn resolve_caller(mut req: Request, next: Next) -> Response {
    let caller = caller_from_headers(req.headers());
    req.extensions_mut().insert(caller);
    next.run(req).await
}

fn caller_from_headers(headers: &HeaderMap) -> Caller {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Caller::anonymous();
    };

    let secret =
        std::env::var("VITRINE_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());

    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(data) => Caller::authenticated(CurrentUser {
            id: data.claims.sub,
            username: data.claims.username,
            role: data.claims.role,
        }),
        Err(e) => {
            debug!("ignoring invalid bearer token: {}", e);
            Caller::anonymous()
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let username = req.username.clone();
    let user = tokio::task::spawn_blocking(move || db.db.get_user_by_username(&username))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Verify password
    let parsed_hash =
        PasswordHash::new(&user.password).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let role = parse_role(&user.role, user.id);

    let token = create_token(&state.jwt_secret, user.id, &user.username, role)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(LoginResponse {
        user_id: user.id,
        username: user.username,
        role,
        token,
    }))
}

/// Current session lookup: the stored user for an authenticated caller,
/// `null` for anonymous requests.
pub async fn me(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Option<User>>, StatusCode> {
    let Some(current) = caller.user() else {
        return Ok(Json(None));
    };

    let db = state.clone();
    let id = current.id;
    let row = tokio::task::spawn_blocking(move || db.db.get_user_by_id(id))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(row.map(|row| User {
        id: row.id,
        username: row.username,
        role: parse_role(&row.role, row.id),
        created_at: crate::workflow::parse_timestamp(&row.created_at, "user"),
    })))
}

/// Hash a password for storage. Used by the startup admin seeding.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();
    Ok(hash)
}

fn create_token(secret: &str, user_id: i64, username: &str, role: Role) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        role,
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

fn parse_role(raw: &str, user_id: i64) -> Role {
    Role::parse(raw).unwrap_or_else(|| {
        warn!("Unknown role '{}' on user {}; treating as user", raw, user_id);
        Role::User
    })
}
