//! Relational data source abstraction and its SQLite implementation.
//!
//! The engine interrogates the source through [`DataSource`] only; SQL lives
//! here. Identifiers are quoted before interpolation, and the checker only
//! passes table and column names it has verified against the source's own
//! schema listing.

use std::fmt;
use std::path::Path;

use rusqlite::Connection;
use thiserror::Error;

/// A value that appears more than once in a column, with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub value: String,
    pub count: u64,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open database at {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },
    #[error("{0}")]
    Query(#[from] rusqlite::Error),
}

/// Read-only view of a relational source, scoped to what the checks need.
///
/// A cell is blank when it is non-NULL and compares equal to the empty
/// string; whitespace-only values are not blank.
pub trait DataSource {
    /// Names of all user tables.
    fn table_names(&self) -> Result<Vec<String>, SourceError>;

    fn table_exists(&self, table: &str) -> Result<bool, SourceError>;

    /// Column names of a table, in schema order.
    fn column_names(&self, table: &str) -> Result<Vec<String>, SourceError>;

    fn column_exists(&self, table: &str, column: &str) -> Result<bool, SourceError>;

    fn count_rows(&self, table: &str) -> Result<u64, SourceError>;

    fn count_null(&self, table: &str, column: &str) -> Result<u64, SourceError>;

    fn count_blank(&self, table: &str, column: &str) -> Result<u64, SourceError>;

    fn count_non_blank(&self, table: &str, column: &str) -> Result<u64, SourceError>;

    /// Up to `limit` non-blank values in storage order.
    fn sample_non_blank(
        &self,
        table: &str,
        column: &str,
        limit: u64,
    ) -> Result<Vec<String>, SourceError>;

    /// Up to `limit` distinct non-blank values.
    fn sample_distinct_non_blank(
        &self,
        table: &str,
        column: &str,
        limit: u64,
    ) -> Result<Vec<String>, SourceError>;

    /// Non-null values occurring more than once, with counts, largest group
    /// first. Blank values participate like any other value.
    fn duplicate_groups(&self, table: &str, column: &str)
    -> Result<Vec<DuplicateGroup>, SourceError>;
}

/// Quote an identifier for interpolation into SQL, doubling any embedded
/// double quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Expression selecting the textual rendering of a column. `CAST` keeps the
/// probes type-agnostic for numeric and blob columns.
fn text_expr(column: &str) -> String {
    format!("CAST({} AS TEXT)", quote_ident(column))
}

/// [`DataSource`] over a SQLite database file.
pub struct SqliteSource {
    conn: Connection,
}

impl fmt::Debug for SqliteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteSource").finish_non_exhaustive()
    }
}

impl SqliteSource {
    /// Opens an existing database file read-only.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| SourceError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { conn })
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> Result<Self, SourceError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Wraps an already-open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Direct access to the underlying connection, mainly for test setup.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn count_query(&self, sql: &str) -> Result<u64, SourceError> {
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn sample_query(&self, sql: &str, limit: u64) -> Result<Vec<String>, SourceError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([limit], |row| row.get::<_, String>(0))?;
        let mut values = Vec::new();
        for value in rows {
            values.push(value?);
        }
        Ok(values)
    }
}

impl DataSource for SqliteSource {
    fn table_names(&self) -> Result<Vec<String>, SourceError> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut names = Vec::new();
        for name in rows {
            names.push(name?);
        }
        Ok(names)
    }

    fn table_exists(&self, table: &str) -> Result<bool, SourceError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn column_names(&self, table: &str) -> Result<Vec<String>, SourceError> {
        let sql = format!("PRAGMA table_info({})", quote_ident(table));
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
        let mut names = Vec::new();
        for name in rows {
            names.push(name?);
        }
        Ok(names)
    }

    fn column_exists(&self, table: &str, column: &str) -> Result<bool, SourceError> {
        Ok(self.column_names(table)?.iter().any(|name| name == column))
    }

    fn count_rows(&self, table: &str) -> Result<u64, SourceError> {
        self.count_query(&format!("SELECT COUNT(*) FROM {}", quote_ident(table)))
    }

    fn count_null(&self, table: &str, column: &str) -> Result<u64, SourceError> {
        self.count_query(&format!(
            "SELECT COUNT(*) FROM {} WHERE {} IS NULL",
            quote_ident(table),
            quote_ident(column)
        ))
    }

    fn count_blank(&self, table: &str, column: &str) -> Result<u64, SourceError> {
        self.count_query(&format!(
            "SELECT COUNT(*) FROM {table} WHERE {col} = ''",
            table = quote_ident(table),
            col = quote_ident(column)
        ))
    }

    fn count_non_blank(&self, table: &str, column: &str) -> Result<u64, SourceError> {
        self.count_query(&format!(
            "SELECT COUNT(*) FROM {table} WHERE {col} IS NOT NULL AND {col} != ''",
            table = quote_ident(table),
            col = quote_ident(column)
        ))
    }

    fn sample_non_blank(
        &self,
        table: &str,
        column: &str,
        limit: u64,
    ) -> Result<Vec<String>, SourceError> {
        self.sample_query(
            &format!(
                "SELECT {text} FROM {table} \
                 WHERE {col} IS NOT NULL AND {col} != '' LIMIT ?1",
                table = quote_ident(table),
                col = quote_ident(column),
                text = text_expr(column)
            ),
            limit,
        )
    }

    fn sample_distinct_non_blank(
        &self,
        table: &str,
        column: &str,
        limit: u64,
    ) -> Result<Vec<String>, SourceError> {
        self.sample_query(
            &format!(
                "SELECT DISTINCT {text} FROM {table} \
                 WHERE {col} IS NOT NULL AND {col} != '' LIMIT ?1",
                table = quote_ident(table),
                col = quote_ident(column),
                text = text_expr(column)
            ),
            limit,
        )
    }

    fn duplicate_groups(
        &self,
        table: &str,
        column: &str,
    ) -> Result<Vec<DuplicateGroup>, SourceError> {
        let sql = format!(
            "SELECT {text}, COUNT(*) FROM {table} WHERE {col} IS NOT NULL \
             GROUP BY {text} HAVING COUNT(*) > 1 ORDER BY COUNT(*) DESC",
            table = quote_ident(table),
            col = quote_ident(column),
            text = text_expr(column)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(DuplicateGroup {
                value: row.get::<_, String>(0)?,
                count: u64::try_from(row.get::<_, i64>(1)?).unwrap_or(0),
            })
        })?;
        let mut groups = Vec::new();
        for group in rows {
            groups.push(group?);
        }
        Ok(groups)
    }
}
