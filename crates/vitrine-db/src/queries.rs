use crate::Database;
use crate::models::{ContactRow, NewsRow, UserRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(&self, username: &str, password_hash: &str, role: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)",
                (username, password_hash, role),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    // -- Contact submissions --

    pub fn create_contact(
        &self,
        name: &str,
        email: &str,
        phone: Option<&str>,
        subject: &str,
        message: &str,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO contacts (name, email, phone, subject, message, read)
                 VALUES (?1, ?2, ?3, ?4, ?5, 0)",
                rusqlite::params![name, email, phone, subject, message],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_contact_by_id(&self, id: i64) -> Result<Option<ContactRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, email, phone, subject, message, read, created_at
                 FROM contacts WHERE id = ?1",
            )?;

            let row = stmt
                .query_row([id], |row| {
                    Ok(ContactRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        phone: row.get(3)?,
                        subject: row.get(4)?,
                        message: row.get(5)?,
                        read: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                })
                .optional()?;

            Ok(row)
        })
    }

    // -- News --

    pub fn create_news(
        &self,
        title: &str,
        content: &str,
        thumbnail_url: Option<&str>,
        author_id: i64,
        published: bool,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO news (title, content, thumbnail_url, author_id, published)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![title, content, thumbnail_url, author_id, published],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Partial update: absent fields keep their stored value. Updating an id
    /// that does not exist is a no-op, mirroring SQLite UPDATE semantics.
    pub fn update_news(&self, id: i64, title: Option<&str>, content: Option<&str>) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE news
                 SET title = COALESCE(?2, title),
                     content = COALESCE(?3, content),
                     updated_at = datetime('now')
                 WHERE id = ?1",
                rusqlite::params![id, title, content],
            )?;
            Ok(())
        })
    }

    /// Deleting an id that does not exist is a no-op, not an error.
    pub fn delete_news(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM news WHERE id = ?1", [id])?;
            Ok(())
        })
    }

    pub fn get_news_by_id(&self, id: i64) -> Result<Option<NewsRow>> {
        self.with_conn(|conn| query_news_by_id(conn, id))
    }

    pub fn get_published_news(&self) -> Result<Vec<NewsRow>> {
        self.with_conn(|conn| query_news_list(conn, true))
    }

    pub fn get_all_news(&self) -> Result<Vec<NewsRow>> {
        self.with_conn(|conn| query_news_list(conn, false))
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn
        .prepare("SELECT id, username, password, role, created_at FROM users WHERE username = ?1")?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                role: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password, role, created_at FROM users WHERE id = ?1")?;

    let row = stmt
        .query_row([id], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
                role: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_news_by_id(conn: &Connection, id: i64) -> Result<Option<NewsRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, title, content, thumbnail_url, author_id, published, created_at, updated_at
         FROM news WHERE id = ?1",
    )?;

    let row = stmt.query_row([id], map_news_row).optional()?;

    Ok(row)
}

fn query_news_list(conn: &Connection, only_published: bool) -> Result<Vec<NewsRow>> {
    // Newest first; id breaks ties within the same second.
    let sql = if only_published {
        "SELECT id, title, content, thumbnail_url, author_id, published, created_at, updated_at
         FROM news WHERE published = 1
         ORDER BY created_at DESC, id DESC"
    } else {
        "SELECT id, title, content, thumbnail_url, author_id, published, created_at, updated_at
         FROM news
         ORDER BY created_at DESC, id DESC"
    };

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], map_news_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn map_news_row(row: &rusqlite::Row<'_>) -> std::result::Result<NewsRow, rusqlite::Error> {
    Ok(NewsRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        thumbnail_url: row.get(3)?,
        author_id: row.get(4)?,
        published: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    fn db_with_admin() -> (Database, i64) {
        let db = Database::open_in_memory().unwrap();
        let admin_id = db.create_user("admin", "hash", "admin").unwrap();
        (db, admin_id)
    }

    #[test]
    fn contact_roundtrip() {
        let db = Database::open_in_memory().unwrap();

        let id = db
            .create_contact("山田太郎", "yamada@example.com", None, "相談", "こんにちは")
            .unwrap();

        let row = db.get_contact_by_id(id).unwrap().unwrap();
        assert_eq!(row.name, "山田太郎");
        assert_eq!(row.email, "yamada@example.com");
        assert_eq!(row.phone, None);
        assert!(!row.read);
    }

    #[test]
    fn published_listing_excludes_drafts_and_sorts_newest_first() {
        let (db, admin_id) = db_with_admin();

        let first = db.create_news("first", "c", None, admin_id, true).unwrap();
        let draft = db.create_news("draft", "c", None, admin_id, false).unwrap();
        let second = db.create_news("second", "c", None, admin_id, true).unwrap();

        let published = db.get_published_news().unwrap();
        let ids: Vec<i64> = published.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second, first]);

        let all = db.get_all_news().unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().any(|r| r.id == draft && !r.published));
    }

    #[test]
    fn delete_news_is_idempotent() {
        let (db, admin_id) = db_with_admin();

        let id = db.create_news("t", "c", None, admin_id, true).unwrap();
        db.delete_news(id).unwrap();
        db.delete_news(id).unwrap();

        assert!(db.get_news_by_id(id).unwrap().is_none());
    }

    #[test]
    fn update_news_merges_partial_fields() {
        let (db, admin_id) = db_with_admin();

        let id = db.create_news("old title", "old content", None, admin_id, true).unwrap();
        db.update_news(id, Some("new title"), None).unwrap();

        let row = db.get_news_by_id(id).unwrap().unwrap();
        assert_eq!(row.title, "new title");
        assert_eq!(row.content, "old content");
    }

    #[test]
    fn update_missing_news_is_noop() {
        let (db, _) = db_with_admin();
        db.update_news(9999, Some("t"), Some("c")).unwrap();
        assert!(db.get_news_by_id(9999).unwrap().is_none());
    }

    #[test]
    fn news_requires_existing_author() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.create_news("t", "c", None, 42, true).is_err());
    }
}
