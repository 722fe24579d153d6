//! Decoding of native catalog rows into [`ColumnModel`].
//!
//! Adapters run the dialect's catalog query (see
//! [`Dialect::catalog_query`](crate::dialect::Dialect::catalog_query)) and
//! hand each row to these types. Both derive `Deserialize` with the column
//! names the catalogs use, so a driver that yields rows as maps or JSON can
//! decode them directly.

use crate::model::ColumnModel;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RE_NUMERIC_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").unwrap());

static RE_DEFAULT_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(NULL|TRUE|FALSE|CURRENT_TIMESTAMP|CURRENT_DATE|CURRENT_TIME|LOCALTIME|LOCALTIMESTAMP|NOW)(\(\d*\))?$",
    )
    .unwrap()
});

static RE_AUTOINCREMENT_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bAUTOINCREMENT\b").unwrap());

/// One row of `INFORMATION_SCHEMA.COLUMNS`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MySqlColumnRow {
    pub column_name: String,
    pub column_type: String,
    /// `YES` or `NO`
    pub is_nullable: String,
    /// `PRI`, `UNI`, `MUL` or empty
    pub column_key: String,
    /// Raw default as stored by the server; string defaults are unquoted
    pub column_default: Option<String>,
    pub extra: String,
}

impl From<MySqlColumnRow> for ColumnModel {
    fn from(row: MySqlColumnRow) -> Self {
        ColumnModel {
            name: row.column_name,
            declared_type: row.column_type,
            nullable: row.is_nullable.eq_ignore_ascii_case("YES"),
            default_value: row.column_default.as_deref().map(mysql_default_expr),
            is_primary_key: row.column_key.eq_ignore_ascii_case("PRI"),
            extra: row.extra,
        }
    }
}

/// One row of `PRAGMA table_info(...)`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SqlitePragmaRow {
    pub cid: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: String,
    /// 1 when the column is NOT NULL
    pub notnull: i64,
    /// Default as SQL expression text
    pub dflt_value: Option<String>,
    /// 1-based position in the primary key, 0 when not part of it
    pub pk: i64,
}

impl From<SqlitePragmaRow> for ColumnModel {
    fn from(row: SqlitePragmaRow) -> Self {
        ColumnModel {
            name: row.name,
            declared_type: row.declared_type,
            nullable: row.notnull == 0,
            default_value: row.dflt_value,
            is_primary_key: row.pk > 0,
            extra: String::new(),
        }
    }
}

/// Query for the stored `CREATE TABLE` text of a SQLite table.
///
/// `PRAGMA table_info` does not report AUTOINCREMENT, so adapters fetch the
/// original statement and pass it to [`sqlite_columns`].
pub fn sqlite_master_query(table: &str) -> String {
    format!(
        "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = '{}';",
        table.replace('\'', "''")
    )
}

/// Decode pragma rows, marking the primary key as AUTOINCREMENT when the
/// table's stored DDL declares it.
///
/// AUTOINCREMENT is only legal on a single-column `INTEGER PRIMARY KEY`, so
/// the marker is applied only when exactly one column is in the key.
pub fn sqlite_columns(rows: Vec<SqlitePragmaRow>, create_sql: Option<&str>) -> Vec<ColumnModel> {
    let mut rows = rows;
    rows.sort_by_key(|r| r.cid);

    let mut columns: Vec<ColumnModel> = rows.into_iter().map(ColumnModel::from).collect();

    let autoincrement = create_sql.is_some_and(|sql| RE_AUTOINCREMENT_WORD.is_match(sql));
    if autoincrement {
        let mut pk = columns.iter_mut().filter(|c| c.is_primary_key);
        if let (Some(only), None) = (pk.next(), pk.next()) {
            only.extra = "AUTOINCREMENT".to_string();
        }
    }

    columns
}

/// Turn MySQL's raw `COLUMN_DEFAULT` into an SQL expression.
///
/// Numbers, NULL and `CURRENT_TIMESTAMP`-style keywords are kept. Values that
/// are already quoted or parenthesized are kept. Anything else is a string
/// literal and gets single-quoted.
pub fn mysql_default_expr(raw: &str) -> String {
    let trimmed = raw.trim();
    let already_expr = RE_NUMERIC_LITERAL.is_match(trimmed)
        || RE_DEFAULT_KEYWORD.is_match(trimmed)
        || (trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\''))
        || (trimmed.starts_with('(') && trimmed.ends_with(')'));

    if already_expr {
        trimmed.to_string()
    } else {
        format!("'{}'", raw.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_default_expr() {
        assert_eq!(mysql_default_expr("0"), "0");
        assert_eq!(mysql_default_expr("-1.5"), "-1.5");
        assert_eq!(mysql_default_expr("CURRENT_TIMESTAMP"), "CURRENT_TIMESTAMP");
        assert_eq!(mysql_default_expr("current_timestamp(6)"), "current_timestamp(6)");
        assert_eq!(mysql_default_expr("NULL"), "NULL");
        assert_eq!(mysql_default_expr("(uuid())"), "(uuid())");
        assert_eq!(mysql_default_expr("'quoted'"), "'quoted'");
        assert_eq!(mysql_default_expr("active"), "'active'");
        assert_eq!(mysql_default_expr("it's"), "'it''s'");
        assert_eq!(mysql_default_expr(""), "''");
    }

    #[test]
    fn test_sqlite_master_query() {
        assert_eq!(
            sqlite_master_query("users"),
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'users';"
        );
        assert_eq!(
            sqlite_master_query("o'brien"),
            "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'o''brien';"
        );
    }

    #[test]
    fn test_mysql_row_into_column() {
        let row = MySqlColumnRow {
            column_name: "id".to_string(),
            column_type: "int(11)".to_string(),
            is_nullable: "NO".to_string(),
            column_key: "PRI".to_string(),
            column_default: None,
            extra: "auto_increment".to_string(),
        };
        let col = ColumnModel::from(row);
        assert_eq!(col.name, "id");
        assert_eq!(col.declared_type, "int(11)");
        assert!(!col.nullable);
        assert!(col.is_primary_key);
        assert_eq!(col.extra, "auto_increment");
    }

    #[test]
    fn test_mysql_row_deserializes_from_catalog_names() {
        let row: MySqlColumnRow = serde_json::from_str(
            r#"{"COLUMN_NAME": "status", "COLUMN_TYPE": "varchar(20)", "IS_NULLABLE": "YES",
                "COLUMN_KEY": "", "COLUMN_DEFAULT": "draft", "EXTRA": ""}"#,
        )
        .unwrap();
        let col = ColumnModel::from(row);
        assert!(col.nullable);
        assert_eq!(col.default_value.as_deref(), Some("'draft'"));
    }

    #[test]
    fn test_pragma_row_into_column() {
        let row: SqlitePragmaRow = serde_json::from_str(
            r#"{"cid": 1, "name": "name", "type": "TEXT", "notnull": 1, "dflt_value": "'x'", "pk": 0}"#,
        )
        .unwrap();
        let col = ColumnModel::from(row);
        assert_eq!(col.declared_type, "TEXT");
        assert!(!col.nullable);
        assert_eq!(col.default_value.as_deref(), Some("'x'"));
        assert!(!col.is_primary_key);
    }

    fn pragma(cid: i64, name: &str, ty: &str, pk: i64) -> SqlitePragmaRow {
        SqlitePragmaRow {
            cid,
            name: name.to_string(),
            declared_type: ty.to_string(),
            notnull: 0,
            dflt_value: None,
            pk,
        }
    }

    #[test]
    fn test_sqlite_columns_marks_single_autoincrement_key() {
        let rows = vec![pragma(1, "name", "TEXT", 0), pragma(0, "id", "INTEGER", 1)];
        let cols = sqlite_columns(
            rows,
            Some("CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT)"),
        );
        assert_eq!(cols[0].name, "id");
        assert_eq!(cols[0].extra, "AUTOINCREMENT");
        assert!(cols[1].extra.is_empty());
    }

    #[test]
    fn test_sqlite_columns_without_autoincrement() {
        let rows = vec![pragma(0, "a", "INTEGER", 1), pragma(1, "b", "INTEGER", 2)];
        let cols = sqlite_columns(rows.clone(), Some("CREATE TABLE t (a, b, PRIMARY KEY (a, b))"));
        assert!(cols.iter().all(|c| c.extra.is_empty()));

        let cols = sqlite_columns(rows, None);
        assert!(cols.iter().all(|c| c.is_primary_key));
    }
}
