//! Outlet catalog backed by SQLite.
//!
//! The daemon opens the catalog read-only; only `outletd import` opens it
//! for writing. A single connection sits behind a mutex and every call runs
//! on the blocking pool.

use outlet_common::Outlet;
use rusqlite::types::Value;
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const TABLE_NAME: &str = "subway_outlets";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS subway_outlets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    operating_hours TEXT,
    latitude REAL,
    longitude REAL,
    waze_link TEXT
)";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Only a single read-only SELECT statement may be executed, got: {0}")]
    NotReadOnly(String),

    #[error("Table {0} does not exist")]
    MissingTable(String),

    #[error("Database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result of an ad-hoc SELECT
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryRows {
    /// Render rows as a list of tuples, e.g. `[('Subway KLCC', 3.15), (2,)]`
    pub fn render(&self) -> String {
        let rows: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                let cells: Vec<String> = row.iter().map(render_value).collect();
                if cells.len() == 1 {
                    format!("({},)", cells[0])
                } else {
                    format!("({})", cells.join(", "))
                }
            })
            .collect();
        format!("[{}]", rows.join(", "))
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => format!("'{}'", s.replace('\'', "\\'")),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Text(s) => s.clone(),
        other => render_value(other),
    }
}

#[derive(Clone)]
pub struct OutletStore {
    conn: Arc<Mutex<Connection>>,
}

impl OutletStore {
    /// Open an existing catalog for serving
    pub async fn open_read_only(path: &Path) -> Result<Self, StoreError> {
        let path = path.to_path_buf();
        info!("Opening outlet catalog at: {}", path.display());

        let conn = tokio::task::spawn_blocking(move || {
            Connection::open_with_flags(
                &path,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
        })
        .await??;

        let store = Self::from_connection(conn);
        if !store.has_table().await? {
            return Err(StoreError::MissingTable(TABLE_NAME.to_string()));
        }
        Ok(store)
    }

    /// Open (or create) a catalog for importing
    pub async fn open_writable(path: &Path) -> Result<Self, StoreError> {
        let path = path.to_path_buf();
        info!("Opening outlet catalog for writing at: {}", path.display());

        let conn = tokio::task::spawn_blocking(move || -> Result<Connection, StoreError> {
            let conn = Connection::open(&path)?;
            conn.execute(SCHEMA, [])?;
            Ok(conn)
        })
        .await??;

        Ok(Self::from_connection(conn))
    }

    /// Empty in-memory catalog with the schema applied
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute(SCHEMA, [])?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.blocking_lock();
            f(&mut *conn)
        })
        .await?
    }

    async fn has_table(&self) -> Result<bool, StoreError> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![TABLE_NAME],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
    }

    /// Every outlet, ordered by id
    pub async fn all_outlets(&self) -> Result<Vec<Outlet>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, address, operating_hours, waze_link, latitude, longitude
                 FROM subway_outlets ORDER BY id",
            )?;
            let outlets = stmt
                .query_map([], |row| {
                    Ok(Outlet {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        address: row.get(2)?,
                        operating_hours: row.get(3)?,
                        waze_link: row.get(4)?,
                        latitude: row.get(5)?,
                        longitude: row.get(6)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            debug!("Loaded {} outlets", outlets.len());
            Ok(outlets)
        })
        .await
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM subway_outlets", [], |row| row.get(0))?;
            Ok(count as usize)
        })
        .await
    }

    /// Insert outlets in one transaction, keeping explicit ids when given
    pub async fn insert_outlets(&self, outlets: Vec<Outlet>) -> Result<usize, StoreError> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO subway_outlets
                     (id, name, address, operating_hours, latitude, longitude, waze_link)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )?;
                for o in &outlets {
                    stmt.execute(params![
                        o.id,
                        o.name,
                        o.address,
                        o.operating_hours,
                        o.latitude,
                        o.longitude,
                        o.waze_link
                    ])?;
                }
            }
            tx.commit()?;
            Ok(outlets.len())
        })
        .await
    }

    /// Table DDL followed by a few sample rows, for the translator prompt
    pub async fn table_info(&self, sample_rows: usize) -> Result<String, StoreError> {
        self.with_conn(move |conn| {
            let ddl: String = conn.query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?1",
                params![TABLE_NAME],
                |row| row.get(0),
            )?;

            let sample = select_rows(
                conn,
                &format!("SELECT * FROM {} LIMIT {}", TABLE_NAME, sample_rows),
            )?;

            let mut info = format!("{}\n\n/*\n{} rows from {} table:\n", ddl, sample_rows, TABLE_NAME);
            info.push_str(&sample.columns.join("\t"));
            info.push('\n');
            for row in &sample.rows {
                let cells: Vec<String> = row.iter().map(render_cell).collect();
                info.push_str(&cells.join("\t"));
                info.push('\n');
            }
            info.push_str("*/");
            Ok(info)
        })
        .await
    }

    /// Execute a model-written statement after the read-only guard
    pub async fn run_select(&self, sql: &str) -> Result<QueryRows, StoreError> {
        let sql = ensure_read_only(sql)?;
        debug!("Executing translated query: {}", sql);
        self.with_conn(move |conn| select_rows(conn, &sql)).await
    }
}

fn select_rows(conn: &Connection, sql: &str) -> Result<QueryRows, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let width = columns.len();

    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get::<_, Value>(i))
                .collect::<Result<Vec<_>, _>>()
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QueryRows { columns, rows })
}

/// Accept exactly one SELECT (or WITH ... SELECT) statement
pub fn ensure_read_only(sql: &str) -> Result<String, StoreError> {
    let trimmed = sql.trim().trim_end_matches(';').trim();
    let first = trimmed
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_ascii_uppercase();

    if trimmed.contains(';') || !(first == "SELECT" || first == "WITH") {
        return Err(StoreError::NotReadOnly(sql.trim().to_string()));
    }
    Ok(trimmed.to_string())
}
