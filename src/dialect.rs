//! SQL dialects, translation directions and per-dialect DDL rendering.
//!
//! Each supported dialect implements [`Dialect`], which knows how to quote
//! identifiers, spell the auto-increment marker, render one column and
//! assemble a full `CREATE TABLE` statement from [`ColumnModel`]s.

use crate::error::{BridgeError, Result};
use crate::model::ColumnModel;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// A supported SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlDialect {
    MySql,
    Sqlite,
}

impl SqlDialect {
    /// Native spelling of the auto-increment marker
    pub fn auto_increment_keyword(self) -> &'static str {
        match self {
            SqlDialect::MySql => "AUTO_INCREMENT",
            SqlDialect::Sqlite => "AUTOINCREMENT",
        }
    }

    /// Whether an `extra` attribute string carries this dialect's auto-increment marker
    pub fn is_auto_increment(self, extra: &str) -> bool {
        extra
            .to_ascii_uppercase()
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .any(|word| word == self.auto_increment_keyword())
    }
}

impl std::str::FromStr for SqlDialect {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(SqlDialect::MySql),
            "sqlite" | "sqlite3" => Ok(SqlDialect::Sqlite),
            _ => Err(format!(
                "Unknown dialect: {}. Valid options: mysql, sqlite",
                s
            )),
        }
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlDialect::MySql => write!(f, "mysql"),
            SqlDialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Translation direction between the two dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    MySqlToSqlite,
    SqliteToMySql,
}

impl Direction {
    /// Resolve a (from, to) dialect pair. Same-dialect pairs have no translation.
    pub fn between(from: SqlDialect, to: SqlDialect) -> Result<Self> {
        match (from, to) {
            (SqlDialect::MySql, SqlDialect::Sqlite) => Ok(Direction::MySqlToSqlite),
            (SqlDialect::Sqlite, SqlDialect::MySql) => Ok(Direction::SqliteToMySql),
            _ => Err(BridgeError::UnsupportedDirection { from, to }),
        }
    }

    pub fn source(self) -> SqlDialect {
        match self {
            Direction::MySqlToSqlite => SqlDialect::MySql,
            Direction::SqliteToMySql => SqlDialect::Sqlite,
        }
    }

    pub fn target(self) -> SqlDialect {
        match self {
            Direction::MySqlToSqlite => SqlDialect::Sqlite,
            Direction::SqliteToMySql => SqlDialect::MySql,
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::MySqlToSqlite => Direction::SqliteToMySql,
            Direction::SqliteToMySql => Direction::MySqlToSqlite,
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let Some((from, to)) = lower.split_once("-to-").or_else(|| lower.split_once("2")) else {
            return Err(format!(
                "Unknown direction: {}. Valid options: mysql-to-sqlite, sqlite-to-mysql",
                s
            ));
        };
        let from: SqlDialect = from.parse()?;
        let to: SqlDialect = to.parse()?;
        Direction::between(from, to).map_err(|e| e.to_string())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-to-{}", self.source(), self.target())
    }
}

/// SQL syntax strategy for one dialect.
///
/// `create_table_sql` is a template method: implementors supply column
/// rendering and may opt into an inline primary key, the default assembles
/// the statement with a trailing composite `PRIMARY KEY (...)` clause.
pub trait Dialect {
    fn kind(&self) -> SqlDialect;

    fn quote_ident(&self, name: &str) -> String;

    fn auto_increment_keyword(&self) -> &'static str {
        self.kind().auto_increment_keyword()
    }

    /// Render one column definition (without trailing comma).
    ///
    /// `inline_primary_key` is true only for the column returned by
    /// [`Dialect::inline_primary_key`].
    fn format_column(&self, column: &ColumnModel, inline_primary_key: bool) -> String;

    /// Index of a column whose primary key must be declared inline instead of
    /// in a table-level clause
    fn inline_primary_key(&self, _columns: &[ColumnModel]) -> Option<usize> {
        None
    }

    /// Trailing table options appended after the closing parenthesis
    fn table_options(&self) -> Option<String> {
        None
    }

    /// Query returning this dialect's native column catalog for a table
    fn catalog_query(&self, table: &str) -> String;

    /// Assemble a complete CREATE TABLE statement
    fn create_table_sql(&self, table: &str, columns: &[ColumnModel]) -> String {
        let inline = self.inline_primary_key(columns);

        let mut defs: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| self.format_column(c, inline == Some(i)))
            .collect();

        if inline.is_none() {
            let pk: Vec<String> = columns
                .iter()
                .filter(|c| c.is_primary_key)
                .map(|c| self.quote_ident(&c.name))
                .collect();
            if !pk.is_empty() {
                defs.push(format!("PRIMARY KEY ({})", pk.join(", ")));
            }
        }

        let mut sql = format!(
            "CREATE TABLE {} (\n  {}\n)",
            self.quote_ident(table),
            defs.join(",\n  ")
        );
        if let Some(options) = self.table_options() {
            sql.push(' ');
            sql.push_str(&options);
        }
        sql.push(';');
        sql
    }
}

/// MySQL/MariaDB dialect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlDialect {
    pub engine: String,
    pub charset: String,
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self {
            engine: "InnoDB".to_string(),
            charset: "utf8".to_string(),
        }
    }
}

impl MySqlDialect {
    pub fn new(engine: impl Into<String>, charset: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            charset: charset.into(),
        }
    }

    /// `ENGINE=... DEFAULT CHARSET=...` without the terminating semicolon
    pub fn storage_clause(&self) -> String {
        format!("ENGINE={} DEFAULT CHARSET={}", self.engine, self.charset)
    }
}

impl Dialect for MySqlDialect {
    fn kind(&self) -> SqlDialect {
        SqlDialect::MySql
    }

    fn quote_ident(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }

    fn format_column(&self, column: &ColumnModel, _inline_primary_key: bool) -> String {
        let mut def = format!("{} {}", self.quote_ident(&column.name), column.declared_type);
        if !column.nullable {
            def.push_str(" NOT NULL");
        }
        if let Some(ref default) = column.default_value {
            def.push_str(" DEFAULT ");
            def.push_str(default);
        }
        if self.kind().is_auto_increment(&column.extra) {
            def.push(' ');
            def.push_str(self.auto_increment_keyword());
        }
        def
    }

    fn table_options(&self) -> Option<String> {
        Some(self.storage_clause())
    }

    fn catalog_query(&self, table: &str) -> String {
        format!(
            "SELECT COLUMN_NAME, COLUMN_TYPE, IS_NULLABLE, COLUMN_KEY, COLUMN_DEFAULT, EXTRA \
             FROM INFORMATION_SCHEMA.COLUMNS \
             WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = '{}' \
             ORDER BY ORDINAL_POSITION",
            table.replace('\'', "''")
        )
    }
}

/// SQLite dialect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn kind(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    fn quote_ident(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn format_column(&self, column: &ColumnModel, inline_primary_key: bool) -> String {
        let mut def = format!("{} {}", self.quote_ident(&column.name), column.declared_type);
        if !column.nullable {
            def.push_str(" NOT NULL");
        }
        if let Some(ref default) = column.default_value {
            def.push_str(" DEFAULT ");
            def.push_str(default);
        }
        if inline_primary_key {
            def.push_str(" PRIMARY KEY");
            if self.kind().is_auto_increment(&column.extra) {
                def.push(' ');
                def.push_str(self.auto_increment_keyword());
            }
        }
        def
    }

    /// SQLite only accepts AUTOINCREMENT on a lone inline `INTEGER PRIMARY KEY`
    fn inline_primary_key(&self, columns: &[ColumnModel]) -> Option<usize> {
        let pk: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_primary_key)
            .map(|(i, _)| i)
            .collect();

        match pk.as_slice() {
            [only] if self.kind().is_auto_increment(&columns[*only].extra) => Some(*only),
            _ => {
                for c in columns.iter().filter(|c| self.kind().is_auto_increment(&c.extra)) {
                    warn!(
                        "Dropping {} on column {}: SQLite requires it on a single-column primary key",
                        self.auto_increment_keyword(),
                        c.name
                    );
                }
                None
            }
        }
    }

    fn catalog_query(&self, table: &str) -> String {
        format!("PRAGMA table_info('{}');", table.replace('\'', "''"))
    }
}
