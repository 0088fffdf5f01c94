//! JSON document store on top of SQLite.
//!
//! Every document lives in the single `documents` table, keyed by
//! `(collection, id)`. The stored body is the full JSON object including
//! its `id`, so reads deserialize straight into the persisted type.

use std::path::PathBuf;
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS documents (
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        body TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        PRIMARY KEY (collection, id)
    );
    CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
";

const INSERT_DOCUMENT: &str =
    "INSERT INTO documents (collection, id, body, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)";

/// Where a connection string points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    Memory,
    File(PathBuf),
}

impl DatabaseUrl {
    /// Accepts `sqlite://path`, `sqlite:path`, a bare path, or
    /// `:memory:` / `sqlite::memory:`.
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        if matches!(url, ":memory:" | "sqlite::memory:" | "sqlite://:memory:") {
            return Ok(DatabaseUrl::Memory);
        }
        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        if path.is_empty() || path.contains("://") {
            return Err(StoreError::InvalidUrl(url.to_string()));
        }
        Ok(DatabaseUrl::File(PathBuf::from(path)))
    }
}

/// Opens (creating if needed) the database a connection string names.
pub fn open(url: &str) -> Result<Connection> {
    let conn = match DatabaseUrl::parse(url)? {
        DatabaseUrl::Memory => Connection::open_in_memory()?,
        DatabaseUrl::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Connection::open(&path)?
        }
    };
    conn.busy_timeout(BUSY_TIMEOUT)?;
    initialize(&conn)?;
    Ok(conn)
}

pub fn initialize(conn: &Connection) -> Result<()> {
    // In-memory databases answer "memory" here; that's fine.
    let mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
    tracing::debug!(journal_mode = %mode, "Initializing document store");
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn with_id<T: Serialize>(doc: &T, id: &str) -> Result<String> {
    let mut value = serde_json::to_value(doc)?;
    let Value::Object(map) = &mut value else {
        return Err(StoreError::NotAnObject);
    };
    map.insert("id".to_string(), Value::String(id.to_string()));
    Ok(serde_json::to_string(&value)?)
}

/// Inserts one document and returns its freshly assigned id.
pub fn insert_one<T: Serialize>(conn: &Connection, collection: &str, doc: &T) -> Result<String> {
    let id = new_id();
    let body = with_id(doc, &id)?;
    conn.execute(INSERT_DOCUMENT, params![collection, id, body, now()])?;
    tracing::debug!(collection, id = %id, "Inserted document");
    Ok(id)
}

/// Inserts all documents in a single transaction. Either every document is
/// stored or none is.
pub fn insert_many<T: Serialize>(conn: &Connection, collection: &str, docs: &[T]) -> Result<Vec<String>> {
    let tx = conn.unchecked_transaction()?;
    let mut ids = Vec::with_capacity(docs.len());
    {
        let mut stmt = tx.prepare(INSERT_DOCUMENT)?;
        let created_at = now();
        for doc in docs {
            let id = new_id();
            stmt.execute(params![collection, id, with_id(doc, &id)?, created_at])?;
            ids.push(id);
        }
    }
    tx.commit()?;
    tracing::debug!(collection, count = ids.len(), "Bulk inserted documents");
    Ok(ids)
}

/// All documents of a collection in insertion order.
pub fn find_all<T: DeserializeOwned>(conn: &Connection, collection: &str) -> Result<Vec<T>> {
    let mut stmt = conn.prepare("SELECT body FROM documents WHERE collection = ?1 ORDER BY rowid ASC")?;
    let bodies = stmt
        .query_map([collection], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    bodies
        .iter()
        .map(|body| serde_json::from_str(body).map_err(StoreError::from))
        .collect()
}

pub fn find_by_id<T: DeserializeOwned>(conn: &Connection, collection: &str, id: &str) -> Result<Option<T>> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            |row| row.get(0),
        )
        .optional()?;
    match body {
        Some(body) => Ok(Some(serde_json::from_str(&body)?)),
        None => Ok(None),
    }
}

pub fn count(conn: &Connection, collection: &str) -> Result<u64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE collection = ?1",
        [collection],
        |row| row.get(0),
    )?;
    Ok(n as u64)
}

/// Merges `changes` into the stored document. The `id` field is never
/// overwritten. Returns `false` if no such document exists.
pub fn update_by_id(conn: &Connection, collection: &str, id: &str, changes: &Map<String, Value>) -> Result<bool> {
    let Some(mut doc) = find_by_id::<Value>(conn, collection, id)? else {
        return Ok(false);
    };
    let Value::Object(map) = &mut doc else {
        return Err(StoreError::NotAnObject);
    };
    for (key, value) in changes.iter().filter(|(key, _)| key.as_str() != "id") {
        map.insert(key.clone(), value.clone());
    }
    conn.execute(
        "UPDATE documents SET body = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4",
        params![serde_json::to_string(&doc)?, now(), collection, id],
    )?;
    tracing::debug!(collection, id, fields = changes.len(), "Updated document");
    Ok(true)
}

/// Returns `false` if no such document existed.
pub fn delete_by_id(conn: &Connection, collection: &str, id: &str) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
        params![collection, id],
    )?;
    Ok(deleted > 0)
}

/// Drops every collection, leaving an empty but usable database.
pub fn drop_database(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP TABLE IF EXISTS documents;")?;
    conn.execute_batch(SCHEMA)?;
    tracing::info!("Dropped database");
    Ok(())
}
