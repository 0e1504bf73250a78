/// Database row types — these map directly to SQLite rows.
/// Distinct from vitrine-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub role: String,
    pub created_at: String,
}

pub struct NewsRow {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub thumbnail_url: Option<String>,
    pub author_id: i64,
    pub published: bool,
    pub created_at: String,
    pub updated_at: String,
}

pub struct ContactRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub read: bool,
    pub created_at: String,
}
