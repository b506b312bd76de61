use super::BookmarkStore;
use crate::{
    Error, Result,
    types::{Bookmark, BookmarkPatch, NewBookmark},
};
use async_trait::async_trait;
use libsql::{Builder, Connection, Database, Value};
use serde_json::Number;
use std::path::Path;

const MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations_table.sql", include_str!("migrations/000_migrations_table.sql")),
    ("001_bookmarks.sql", include_str!("migrations/001_bookmarks.sql")),
];

const SELECT_BOOKMARK: &str = "SELECT id, title, url, description, rating FROM bookmarks";

/// Bookmark store backed by a local libsql database.
///
/// One connection is opened and shared by all requests; an in-memory
/// database only lives as long as that connection.
pub struct LibsqlStore {
    _db: Database,
    conn: Connection,
}

impl LibsqlStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new_local(path.as_ref()).build().await?;
        Self::from_database(db).await
    }

    pub async fn in_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        Self::from_database(db).await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        for (name, sql) in MIGRATIONS {
            Self::run_migration(&conn, name, sql).await?;
        }

        Ok(LibsqlStore { _db: db, conn })
    }

    async fn is_migration_applied(conn: &Connection, name: &str) -> Result<bool> {
        let query = "SELECT 1 FROM _migrations WHERE name = ?";
        match conn.query(query, libsql::params![name]).await {
            Ok(mut rows) => Ok(rows.next().await?.is_some()),
            Err(e) if e.to_string().contains("no such table") => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
        if Self::is_migration_applied(conn, name).await? {
            tracing::debug!("migration {} already applied, skipping", name);
            return Ok(());
        }

        tracing::info!("applying migration: {}", name);
        conn.execute_batch(sql)
            .await
            .map_err(|e| Error::Internal(format!("failed to execute migration {name}: {e}")))?;

        let record = r#"
            INSERT INTO _migrations (name, applied_at)
            VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        "#;
        conn.execute(record, libsql::params![name]).await?;
        Ok(())
    }

    fn row_to_bookmark(row: &libsql::Row) -> Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            description: row.get(3)?,
            rating: rating_from_value(row.get_value(4)?)?,
        })
    }
}

/// Whole ratings are stored as integers, fractional ones as reals.
fn rating_to_value(rating: Option<&Number>) -> Value {
    match rating {
        Some(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map(Value::Real).unwrap_or(Value::Null),
        },
        None => Value::Null,
    }
}

fn rating_from_value(value: Value) -> Result<Option<Number>> {
    match value {
        Value::Null => Ok(None),
        Value::Integer(i) => Ok(Some(Number::from(i))),
        Value::Real(f) => Number::from_f64(f)
            .map(Some)
            .ok_or_else(|| Error::Internal(format!("stored rating {f} is not finite"))),
        other => Err(Error::Internal(format!("unexpected rating column value: {:?}", other))),
    }
}

#[async_trait]
impl BookmarkStore for LibsqlStore {
    async fn list_all(&self) -> Result<Vec<Bookmark>> {
        let query = format!("{SELECT_BOOKMARK} ORDER BY id");
        let mut rows = self.conn.query(&query, ()).await?;

        let mut bookmarks = Vec::new();
        while let Some(row) = rows.next().await? {
            bookmarks.push(Self::row_to_bookmark(&row)?);
        }
        Ok(bookmarks)
    }

    async fn insert(&self, bookmark: NewBookmark) -> Result<Bookmark> {
        let query = r#"
            INSERT INTO bookmarks (title, url, description, rating)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, url, description, rating
        "#;

        let mut rows = self
            .conn
            .query(
                query,
                libsql::params![
                    bookmark.title,
                    bookmark.url,
                    bookmark.description,
                    rating_to_value(bookmark.rating.as_ref())
                ],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Self::row_to_bookmark(&row),
            None => Err(Error::Internal("insert returned no row".to_string())),
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Bookmark>> {
        let query = format!("{SELECT_BOOKMARK} WHERE id = ?");
        let mut rows = self.conn.query(&query, libsql::params![id]).await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Self::row_to_bookmark(&row)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, id: i64, patch: BookmarkPatch) -> Result<u64> {
        if patch.is_empty() {
            return Ok(0);
        }

        let mut updates = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if let Some(title) = patch.title {
            updates.push("title = ?");
            params.push(title.into());
        }
        if let Some(url) = patch.url {
            updates.push("url = ?");
            params.push(url.into());
        }
        if let Some(description) = patch.description {
            updates.push("description = ?");
            params.push(description.into());
        }
        if let Some(rating) = patch.rating {
            updates.push("rating = ?");
            params.push(rating_to_value(Some(&rating)));
        }

        params.push(id.into());
        let query = format!("UPDATE bookmarks SET {} WHERE id = ?", updates.join(", "));

        Ok(self.conn.execute(&query, params).await?)
    }

    async fn remove(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM bookmarks WHERE id = ?", libsql::params![id])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amazon() -> NewBookmark {
        NewBookmark {
            title: "Amazon".to_string(),
            url: "http://www.amazon.com".to_string(),
            description: "Shopping".to_string(),
            rating: Some(Number::from(4)),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_get_returns_it() {
        let store = LibsqlStore::in_memory().await.unwrap();

        let created = store.insert(amazon()).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.title, "Amazon");
        assert_eq!(created.rating, Some(Number::from(4)));

        let fetched = store.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = LibsqlStore::in_memory().await.unwrap();
        assert_eq!(store.get_by_id(123456).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_all_in_insertion_order() {
        let store = LibsqlStore::in_memory().await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());

        let first = store.insert(amazon()).await.unwrap();
        let second = store
            .insert(NewBookmark {
                title: "Google".to_string(),
                url: "http://www.google.com".to_string(),
                description: "Search".to_string(),
                rating: None,
            })
            .await
            .unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn test_partial_update_touches_only_given_fields() {
        let store = LibsqlStore::in_memory().await.unwrap();
        let created = store.insert(amazon()).await.unwrap();

        let patch = BookmarkPatch {
            title: Some("Amazon Prime".to_string()),
            ..Default::default()
        };
        assert_eq!(store.update(created.id, patch).await.unwrap(), 1);

        let fetched = store.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "Amazon Prime");
        assert_eq!(fetched.url, created.url);
        assert_eq!(fetched.description, created.description);
        assert_eq!(fetched.rating, created.rating);
    }

    #[tokio::test]
    async fn test_update_missing_or_empty_affects_nothing() {
        let store = LibsqlStore::in_memory().await.unwrap();
        let created = store.insert(amazon()).await.unwrap();

        let patch = BookmarkPatch {
            rating: Some(Number::from(1)),
            ..Default::default()
        };
        assert_eq!(store.update(created.id + 100, patch).await.unwrap(), 0);
        assert_eq!(store.update(created.id, BookmarkPatch::default()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = LibsqlStore::in_memory().await.unwrap();
        let first = store.insert(amazon()).await.unwrap();
        store.remove(first.id).await.unwrap();
        assert_eq!(store.get_by_id(first.id).await.unwrap(), None);

        let second = store.insert(amazon()).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.db");

        let created = {
            let store = LibsqlStore::open(&path).await.unwrap();
            store.insert(amazon()).await.unwrap()
        };

        let store = LibsqlStore::open(&path).await.unwrap();
        assert_eq!(store.get_by_id(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_fractional_rating_round_trips() {
        let store = LibsqlStore::in_memory().await.unwrap();
        let created = store
            .insert(NewBookmark {
                rating: Number::from_f64(4.5),
                ..amazon()
            })
            .await
            .unwrap();
        assert_eq!(created.rating, Number::from_f64(4.5));

        let patch = BookmarkPatch {
            rating: Some(Number::from(2)),
            ..Default::default()
        };
        store.update(created.id, patch).await.unwrap();
        let fetched = store.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.rating, Some(Number::from(2)));
    }
}
