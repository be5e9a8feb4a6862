use crate::config::Config;
use anyhow::Result;
use libsql::{Builder, Connection, Database as LibsqlDatabase};
use tokio::sync::{Mutex, MutexGuard};

const TABLES: &[(&str, &str)] = &[
    ("001_books.sql", include_str!("migrations/001_books.sql")),
    ("002_pages.sql", include_str!("migrations/002_pages.sql")),
];

/// Columns introduced after a table first shipped, as (table, column, definition).
/// The definition must carry a default so existing rows stay valid.
const ADDITIVE_COLUMNS: &[(&str, &str, &str)] = &[("pages", "name", "TEXT NOT NULL DEFAULT ''")];

const INDEXES: &[(&str, &str)] = &[(
    "003_pages_book_number_idx.sql",
    include_str!("migrations/003_pages_book_number_idx.sql"),
)];

pub struct Database {
    _db: LibsqlDatabase,
    conn: Connection,
    conn_lock: Mutex<()>,
}

impl Database {
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Serializes use of the shared connection. Every store call holds this
    /// guard, so an open transaction is never observed or joined by another request.
    pub async fn lock_conn(&self) -> MutexGuard<'_, ()> {
        self.conn_lock.lock().await
    }

    pub async fn new(cfg: &Config) -> Result<Self> {
        tracing::info!(path = cfg.app.get_db(), "[db] opening local database");
        Self::open(cfg.app.get_db()).await
    }

    /// Opens (or creates) the database at `path` and brings its schema up to
    /// date. `":memory:"` gives a private in-memory store.
    pub async fn open(path: &str) -> Result<Self> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        Self::ensure_schema(&conn).await?;

        Ok(Database {
            _db: db,
            conn,
            conn_lock: Mutex::new(()),
        })
    }

    /// Creates missing tables, adds missing columns and indexes. Never drops or
    /// rewrites anything, so running it against an up-to-date store is a no-op.
    pub async fn ensure_schema(conn: &Connection) -> Result<()> {
        for (name, sql) in TABLES {
            tracing::debug!("ensuring table from {}", name);
            conn.execute_batch(sql)
                .await
                .map_err(|e| anyhow::anyhow!("failed to execute migration {name}: {e}"))?;
        }

        for (table, column, definition) in ADDITIVE_COLUMNS {
            if Self::column_exists(conn, table, column).await? {
                tracing::debug!("column {}.{} present, skipping", table, column);
                continue;
            }

            tracing::info!("adding column {}.{}", table, column);
            let alter = format!("ALTER TABLE {table} ADD COLUMN {column} {definition}");
            conn.execute(&alter, ())
                .await
                .map_err(|e| anyhow::anyhow!("failed to add column {table}.{column}: {e}"))?;
        }

        for (name, sql) in INDEXES {
            conn.execute_batch(sql)
                .await
                .map_err(|e| anyhow::anyhow!("failed to execute migration {name}: {e}"))?;
        }

        Ok(())
    }

    // Table and column names come from ADDITIVE_COLUMNS, never from requests.
    async fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
        let probe = format!("SELECT {column} FROM {table} LIMIT 1");
        match conn.query(&probe, ()).await {
            Ok(_) => Ok(true),
            Err(e) => {
                if e.to_string().contains("no such column") {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }
}
