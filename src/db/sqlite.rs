use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags};

use crate::db::{CategoryCount, Record, Records, Store};
use crate::error::StoreError;
use crate::logger::debug;

/// A SQLite database file opened for the lifetime of the value. The
/// connection is closed when the store is dropped.
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path`. `~` and `$VAR`
    /// components are expanded and missing parent directories are created.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let path = expand_path(path)
            .ok_or_else(|| StoreError::InvalidPath(path.display().to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Path {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        debug(&format!("sqlite: opening {}", path.display()));
        let conn = Connection::open(&path)?;
        debug("sqlite: opened");
        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Opens an existing database without write access; fails if the file
    /// does not exist.
    pub fn open_read_only(path: &Path) -> Result<Self, StoreError> {
        let path = expand_path(path)
            .ok_or_else(|| StoreError::InvalidPath(path.display().to_string()))?;
        debug(&format!("sqlite: opening {} read-only", path.display()));
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: None,
        })
    }

    /// Location of the database file; `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// User tables in the database, sorted by name.
    pub fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut tables = Vec::new();
        for r in rows {
            tables.push(r?);
        }
        Ok(tables)
    }

    /// Reads a page of `table` with every cell rendered as text.
    pub fn fetch_records(
        &self,
        table: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Records, StoreError> {
        let table = quote_ident(table);

        // columns
        let mut col_stmt = self.conn.prepare(&format!("PRAGMA table_info({});", table))?;
        let col_iter = col_stmt.query_map([], |row| row.get::<_, String>(1))?; // name is col 1
        let mut columns = Vec::new();
        for c in col_iter {
            columns.push(c?);
        }

        let mut rows_vec: Vec<Vec<String>> = Vec::new();
        let q = format!("SELECT * FROM {} LIMIT {} OFFSET {}", table, limit, offset);
        let mut stmt = self.conn.prepare(&q)?;
        let col_count = stmt.column_count();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut v = Vec::with_capacity(col_count);
            for i in 0..col_count {
                v.push(render_cell(row.get_ref(i)?));
            }
            rows_vec.push(v);
        }

        Ok(Records {
            columns,
            rows: rows_vec,
        })
    }
}

impl Store for SqliteStore {
    fn exists(&self, sql: &str) -> Result<bool, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        Ok(rows.next()?.is_some())
    }

    fn count(&self, sql: &str) -> Result<u64, StoreError> {
        let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(u64::try_from(n).unwrap_or_default())
    }

    fn execute(&self, sql: &str) -> Result<(), StoreError> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn insert_batch(&self, sql: &str, records: &[Record]) -> Result<usize, StoreError> {
        // all rows or none, so a failed batch leaves the table empty
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(sql)?;
            for record in records {
                stmt.execute(params![record.category, record.x, record.y])?;
            }
        }
        tx.commit()?;
        debug(&format!("sqlite: inserted {} rows", records.len()));
        Ok(records.len())
    }

    fn category_counts(&self, sql: &str) -> Result<Vec<CategoryCount>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            let category: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok(CategoryCount {
                category,
                count: u64::try_from(count).unwrap_or_default(),
            })
        })?;

        let mut counts = Vec::new();
        for r in rows {
            counts.push(r?);
        }
        Ok(counts)
    }
}

fn render_cell(cell: ValueRef<'_>) -> String {
    match cell {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Expands a leading `~` and `$VAR` (unix) or `%VAR%` (windows) components.
pub fn expand_path(path: &Path) -> Option<PathBuf> {
    let mut expanded_path = PathBuf::new();
    let mut path_iter = path.iter();
    if path.starts_with("~") {
        path_iter.next()?;
        expanded_path = expanded_path.join(dirs_next::home_dir()?);
    }
    for path in path_iter {
        let path = path.to_str()?;
        expanded_path = if cfg!(unix) && path.starts_with('$') {
            expanded_path.join(std::env::var(path.strip_prefix('$')?).unwrap_or_default())
        } else if cfg!(windows) && path.starts_with('%') && path.ends_with('%') {
            expanded_path
                .join(std::env::var(path.strip_prefix('%')?.strip_suffix('%')?).unwrap_or_default())
        } else {
            expanded_path.join(path)
        }
    }
    Some(expanded_path)
}
