//! Text-mode translation of `CREATE TABLE` statements between MySQL and SQLite.
//!
//! The rewrite is line oriented: one column or constraint definition per line.
//! For each definition line the first `name TYPE(size)` pair is remapped and
//! the auto-increment marker is respelled next to `PRIMARY KEY`. The MySQL
//! storage clause is stripped going to SQLite and appended going back.

mod types;
mod warnings;

pub use types::{
    map_type, MySqlKeyword, SqliteKeyword, TypeMapper, TypeMapping, DEFAULT_TEXT_LENGTH,
};
pub use warnings::{ConvertWarning, WarningCollector};

use crate::config::BridgeConfig;
use crate::dialect::{Direction, MySqlDialect};
use crate::error::{preview, BridgeError, Result};
use crate::parser::{self, StatementSplitter, StatementType};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use tracing::debug;

static RE_ENGINE_CLAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\)\s*ENGINE\s*=[^;]*;?").unwrap());

// First `identifier TYPE(size)?` pair on a line
static RE_COLUMN_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(`[^`]+`|"[^"]+"|\w+)\s+([A-Za-z]+)(\s*\(\s*\d+\s*(?:,\s*\d+\s*)?\))?"#).unwrap()
});

static RE_LEADING_IDENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(`[^`]+`|"[^"]+"|\w+)"#).unwrap());

static RE_MYSQL_AUTO_INCREMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\bAUTO_INCREMENT\b").unwrap());

static RE_SQLITE_AUTOINCREMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*\bAUTOINCREMENT\b").unwrap());

static RE_PRIMARY_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").unwrap());

static RE_TABLE_PRIMARY_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^PRIMARY\s+KEY\s*\(([^)]*)\)$").unwrap());

static RE_MYSQL_INDEX_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^(?:(?:FULLTEXT|SPATIAL)\s+)?(?:KEY|INDEX)\s+("[^"]+"|\w+)\s*\("#).unwrap()
});

static RE_MYSQL_UNIQUE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^UNIQUE\s+(?:KEY|INDEX)\s+(?:"[^"]+"|\w+)\s*\("#).unwrap()
});

static RE_MYSQL_COLUMN_ATTRS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+(?:UNSIGNED|ZEROFILL|CHARACTER\s+SET\s+\w+|COLLATE\s+\w+)\b").unwrap()
});

static RE_MYSQL_ON_UPDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s+ON\s+UPDATE\s+CURRENT_TIMESTAMP(?:\(\d*\))?").unwrap()
});

static RE_MYSQL_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+COMMENT\s+'(?:[^'\\]|\\.|'')*'").unwrap());

const CONSTRAINT_KEYWORDS: [&str; 9] = [
    "PRIMARY",
    "UNIQUE",
    "KEY",
    "INDEX",
    "CONSTRAINT",
    "FOREIGN",
    "CHECK",
    "FULLTEXT",
    "SPATIAL",
];

/// Statistics from a script conversion
#[derive(Debug, Default, Clone)]
pub struct ConvertStats {
    /// Total statements processed (comment-only fragments are not counted)
    pub statements_processed: u64,
    pub statements_converted: u64,
    /// Statements skipped because they are not CREATE TABLE
    pub statements_skipped: u64,
    pub warnings: Vec<ConvertWarning>,
}

/// Result of [`Converter::convert_script`]
#[derive(Debug, Clone)]
pub struct ScriptOutput {
    pub sql: String,
    pub stats: ConvertStats,
}

/// Rewrites `CREATE TABLE` text in one direction
pub struct Converter {
    direction: Direction,
    mapper: TypeMapper,
    mysql: MySqlDialect,
    warnings: WarningCollector,
    strict: bool,
}

impl Converter {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            mapper: TypeMapper::default(),
            mysql: MySqlDialect::default(),
            warnings: WarningCollector::new(),
            strict: false,
        }
    }

    /// Build from a validated configuration
    pub fn from_config(direction: Direction, config: &BridgeConfig) -> Self {
        Self::new(direction)
            .with_type_mapper(config.type_mapper())
            .with_mysql_dialect(config.mysql_dialect())
            .with_strict(config.strict)
    }

    /// In strict mode a lossy conversion is an error instead of a warning
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_type_mapper(mut self, mapper: TypeMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Storage clause appended when converting to MySQL
    pub fn with_mysql_dialect(mut self, mysql: MySqlDialect) -> Self {
        self.mysql = mysql;
        self
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Rewrite a single `CREATE TABLE` statement.
    ///
    /// Anything else (INSERT, ALTER, `CREATE TEMP TABLE`, a column list on
    /// the header line) fails with [`BridgeError::UnsupportedStatement`] and
    /// produces no output. Trailing `--` comments are dropped.
    pub fn convert_create_table(&mut self, sql: &str) -> Result<String> {
        let body = parser::strip_leading_sql_comments(sql);
        if !parser::is_create_table(body) {
            return Err(BridgeError::unsupported_statement(sql));
        }
        let table = parser::create_table_name(body);
        debug!(table = ?table, direction = %self.direction, "Rewriting CREATE TABLE");

        let stmt = match self.direction {
            Direction::MySqlToSqlite => {
                backticks_to_double_quotes(&RE_ENGINE_CLAUSE.replace(body, ");"))
            }
            Direction::SqliteToMySql => double_quotes_to_backticks(body),
        };

        let mut lines = stmt
            .lines()
            .map(|l| strip_trailing_comment(l.trim()))
            .filter(|l| !l.is_empty());
        let header = lines.next().unwrap_or_default();
        // Definitions must start on the line after the opening parenthesis
        if header
            .find('(')
            .is_some_and(|open| !header[open + 1..].trim().is_empty())
        {
            return Err(BridgeError::unsupported_statement(sql));
        }

        let mut defs = Vec::new();
        let mut auto_column: Option<String> = None;
        let mut closed = false;
        for line in lines {
            if line.starts_with(')') {
                self.check_table_options(line);
                closed = true;
                break;
            }
            let def = line.trim_end_matches(',').trim_end();
            if let Some(def) = self.rewrite_definition(def, table.as_deref(), &mut auto_column)? {
                defs.push(def);
            }
        }

        if let Some(ref auto) = auto_column {
            self.drop_redundant_primary_key(&mut defs, auto);
        }

        let mut out = String::with_capacity(stmt.len() + 64);
        out.push_str(header);
        if !defs.is_empty() {
            out.push_str("\n  ");
            out.push_str(&defs.join(",\n  "));
        }
        if closed {
            out.push_str("\n)");
        }

        match self.direction {
            Direction::MySqlToSqlite => {
                if !out.ends_with(';') {
                    out.push(';');
                }
            }
            Direction::SqliteToMySql => {
                let len = out.trim_end_matches(';').trim_end().len();
                out.truncate(len);
                out.push(' ');
                out.push_str(&self.mysql.storage_clause());
                out.push(';');
            }
        }

        Ok(out)
    }

    /// Convert every `CREATE TABLE` in a multi-statement script.
    ///
    /// Other statements are skipped with a warning. Comment-only fragments
    /// are dropped silently.
    pub fn convert_script(&mut self, script: &str) -> Result<ScriptOutput> {
        let mut stats = ConvertStats::default();
        let mut converted = Vec::new();

        for stmt in StatementSplitter::new(script) {
            if parser::strip_leading_sql_comments(stmt).is_empty() {
                continue;
            }
            stats.statements_processed += 1;

            let (stmt_type, _) = parser::parse_statement(stmt);
            if parser::is_create_table(stmt) {
                converted.push(self.convert_create_table(stmt)?);
                stats.statements_converted += 1;
            } else {
                let reason = if stmt_type == StatementType::CreateTable {
                    "temporary tables are not translated".to_string()
                } else {
                    format!("{} statements are not translated", stmt_type.as_str())
                };
                self.warnings.add(ConvertWarning::SkippedStatement {
                    reason,
                    statement_preview: preview(parser::strip_leading_sql_comments(stmt)),
                });
                stats.statements_skipped += 1;
            }
        }

        stats.warnings = self.warnings.warnings().to_vec();
        debug!(
            converted = stats.statements_converted,
            skipped = stats.statements_skipped,
            "Script conversion finished"
        );

        let mut sql = converted.join("\n\n");
        if !sql.is_empty() {
            sql.push('\n');
        }
        Ok(ScriptOutput { sql, stats })
    }

    /// Get collected warnings
    pub fn warnings(&self) -> &[ConvertWarning] {
        self.warnings.warnings()
    }

    /// Rewrite one definition line, `None` when the line is dropped
    fn rewrite_definition(
        &mut self,
        def: &str,
        table: Option<&str>,
        auto_column: &mut Option<String>,
    ) -> Result<Option<String>> {
        let mut def = def.to_string();

        if self.direction == Direction::MySqlToSqlite {
            if let Some(caps) = RE_MYSQL_INDEX_LINE.captures(&def) {
                let name = caps[1].to_ascii_uppercase();
                if MySqlKeyword::parse(&name).is_none() {
                    self.warnings.add(ConvertWarning::UnsupportedFeature {
                        feature: format!("inline index `{}`", def),
                        suggestion: Some("create it with a separate CREATE INDEX".to_string()),
                    });
                    return Ok(None);
                }
            }
            def = RE_MYSQL_UNIQUE_KEY
                .replace(&def, NoExpand("UNIQUE ("))
                .into_owned();
            if RE_MYSQL_ON_UPDATE.is_match(&def) {
                self.warnings.add(ConvertWarning::UnsupportedFeature {
                    feature: "ON UPDATE CURRENT_TIMESTAMP".to_string(),
                    suggestion: Some("use a trigger".to_string()),
                });
                def = RE_MYSQL_ON_UPDATE.replace_all(&def, "").into_owned();
            }
            def = RE_MYSQL_COMMENT.replace_all(&def, "").into_owned();
            def = RE_MYSQL_COLUMN_ATTRS.replace_all(&def, "").into_owned();
        }

        let mut def = self.rewrite_column_type(&def, table)?;

        if let Some(rewritten) = self.rewrite_auto_increment(&def) {
            if auto_column.is_none() {
                *auto_column = RE_LEADING_IDENT
                    .captures(&rewritten)
                    .map(|caps| unquote(&caps[1]).to_string());
            }
            def = rewritten;
        }

        Ok(Some(def))
    }

    /// Replace the first `name TYPE(size)` pair with its mapped type
    fn rewrite_column_type(&mut self, line: &str, table: Option<&str>) -> Result<String> {
        let Some(caps) = RE_COLUMN_TYPE.captures(line) else {
            return Ok(line.to_string());
        };
        let Some(keyword) = caps.get(2) else {
            return Ok(line.to_string());
        };
        let column = unquote(&caps[1]);
        let end = caps.get(3).map_or(keyword.end(), |m| m.end());
        let source_type = &line[keyword.start()..end];

        let mapping = self.mapper.map_type(source_type, self.direction);
        if !mapping.matched {
            if !is_constraint_keyword(column) {
                self.warnings.add(ConvertWarning::UnmappedType {
                    type_name: keyword.as_str().to_ascii_uppercase(),
                    table: table.map(str::to_string),
                    column: Some(column.to_string()),
                });
            }
            return Ok(line.to_string());
        }

        if mapping.lossy {
            self.record_lossy(ConvertWarning::LossyConversion {
                from_type: source_type.to_string(),
                to_type: mapping.target.clone(),
                table: table.map(str::to_string),
                column: Some(column.to_string()),
            })?;
        }

        Ok(format!(
            "{}{}{}",
            &line[..keyword.start()],
            mapping.target,
            &line[end..]
        ))
    }

    /// Respell the source auto-increment marker, `None` when the line has none
    fn rewrite_auto_increment(&self, line: &str) -> Option<String> {
        let target_kw = self.direction.target().auto_increment_keyword();
        let (marker, phrase) = match self.direction {
            Direction::MySqlToSqlite => {
                (&*RE_MYSQL_AUTO_INCREMENT, format!("PRIMARY KEY {}", target_kw))
            }
            Direction::SqliteToMySql => {
                (&*RE_SQLITE_AUTOINCREMENT, format!("{} PRIMARY KEY", target_kw))
            }
        };
        if !marker.is_match(line) {
            return None;
        }

        let stripped = marker.replace_all(line, "");
        if RE_PRIMARY_KEY.is_match(&stripped) {
            Some(RE_PRIMARY_KEY.replace(&stripped, NoExpand(&phrase)).into_owned())
        } else {
            Some(format!("{} {}", stripped, phrase))
        }
    }

    /// A table-level `PRIMARY KEY (col)` naming the auto-increment column now
    /// duplicates the inline key
    fn drop_redundant_primary_key(&mut self, defs: &mut Vec<String>, auto_column: &str) {
        let mut redundant = None;
        for (i, def) in defs.iter().enumerate() {
            let Some(caps) = RE_TABLE_PRIMARY_KEY.captures(def) else {
                continue;
            };
            let cols: Vec<&str> = caps[1].split(',').map(|c| unquote(c.trim())).collect();
            if cols == [auto_column] {
                redundant = Some(i);
            } else if cols.contains(&auto_column) {
                self.warnings.add(ConvertWarning::UnsupportedFeature {
                    feature: format!(
                        "auto-increment column {} inside composite primary key ({})",
                        auto_column,
                        cols.join(", ")
                    ),
                    suggestion: Some("text mode assumes a single-column surrogate key".to_string()),
                });
            }
        }
        if let Some(i) = redundant {
            debug!(column = auto_column, "Dropping table-level primary key now declared inline");
            defs.remove(i);
        }
    }

    fn check_table_options(&mut self, closing: &str) {
        let options = closing[1..].trim().trim_end_matches(';').trim();
        if !options.is_empty() {
            self.warnings.add(ConvertWarning::UnsupportedFeature {
                feature: format!("table options `{}`", options),
                suggestion: Some("dropped".to_string()),
            });
        }
    }

    fn record_lossy(&mut self, warning: ConvertWarning) -> Result<()> {
        if self.strict {
            return Err(BridgeError::LossyConversion(warning));
        }
        self.warnings.add(warning);
        Ok(())
    }
}

/// Rewrite one `CREATE TABLE` statement with default settings
pub fn convert_sql(sql: &str, direction: Direction) -> Result<String> {
    Converter::new(direction).convert_create_table(sql)
}

/// Convert backticks to double quotes outside string literals
pub fn backticks_to_double_quotes(stmt: &str) -> String {
    let mut result = String::with_capacity(stmt.len());
    let mut in_string = false;
    let mut in_backtick = false;

    for c in stmt.chars() {
        if c == '\'' && !in_backtick {
            in_string = !in_string;
            result.push(c);
        } else if c == '`' && !in_string {
            in_backtick = !in_backtick;
            result.push('"');
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert double quotes to backticks outside string literals
pub fn double_quotes_to_backticks(stmt: &str) -> String {
    let mut result = String::with_capacity(stmt.len());
    let mut in_string = false;
    let mut in_dquote = false;

    for c in stmt.chars() {
        if c == '\'' && !in_dquote {
            in_string = !in_string;
            result.push(c);
        } else if c == '"' && !in_string {
            in_dquote = !in_dquote;
            result.push('`');
        } else {
            result.push(c);
        }
    }
    result
}

/// Cut a trailing `-- comment` that starts outside quotes and identifiers
fn strip_trailing_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'-' if bytes.get(i + 1) == Some(&b'-') => return line[..i].trim_end(),
                _ => {}
            },
        }
        i += 1;
    }
    line
}

fn unquote(ident: &str) -> &str {
    ident.trim_matches(|c| c == '`' || c == '"')
}

fn is_constraint_keyword(word: &str) -> bool {
    CONSTRAINT_KEYWORDS
        .iter()
        .any(|kw| kw.eq_ignore_ascii_case(word))
}
