//! Statement splitting and classification for schema scripts.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementType {
    Unknown,
    CreateTable,
    Insert,
    CreateIndex,
    AlterTable,
    DropTable,
}

impl StatementType {
    pub fn as_str(self) -> &'static str {
        match self {
            StatementType::Unknown => "unknown",
            StatementType::CreateTable => "CREATE TABLE",
            StatementType::Insert => "INSERT",
            StatementType::CreateIndex => "CREATE INDEX",
            StatementType::AlterTable => "ALTER TABLE",
            StatementType::DropTable => "DROP TABLE",
        }
    }
}

static CREATE_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^\s*CREATE\s+(?:TEMP(?:ORARY)?\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?[`"]?([^\s`"(]+)[`"]?"#)
        .unwrap()
});

// Plain `CREATE TABLE`, no TEMP/TEMPORARY prefix
static PLAIN_CREATE_TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*CREATE\s+TABLE\b").unwrap());

static INSERT_INTO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)^\s*INSERT\s+(?:OR\s+\w+\s+)?INTO\s+[`"]?([^\s`"(]+)[`"]?"#).unwrap());

static CREATE_INDEX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^\s*CREATE\s+(?:UNIQUE\s+)?INDEX\b.*?\bON\s+[`"]?([^\s`"(;]+)[`"]?"#).unwrap()
});

static ALTER_TABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)^\s*ALTER\s+TABLE\s+[`"]?([^\s`";]+)[`"]?"#).unwrap());

static DROP_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^\s*DROP\s+TABLE\s+(?:IF\s+EXISTS\s+)?[`"]?([^\s`";]+)[`"]?"#).unwrap()
});

/// Classify a statement and extract the table it targets (empty when unknown)
pub fn parse_statement(stmt: &str) -> (StatementType, String) {
    let stmt = strip_leading_sql_comments(stmt);

    let patterns: [(&Lazy<Regex>, StatementType); 5] = [
        (&CREATE_TABLE_RE, StatementType::CreateTable),
        (&INSERT_INTO_RE, StatementType::Insert),
        (&CREATE_INDEX_RE, StatementType::CreateIndex),
        (&ALTER_TABLE_RE, StatementType::AlterTable),
        (&DROP_TABLE_RE, StatementType::DropTable),
    ];

    for (re, typ) in patterns {
        if let Some(caps) = re.captures(stmt) {
            return (typ, caps[1].to_string());
        }
    }

    (StatementType::Unknown, String::new())
}

/// Whether the statement (after leading comments) is a plain CREATE TABLE.
///
/// `CREATE TEMP TABLE` is classified as [`StatementType::CreateTable`] by
/// [`parse_statement`] but is not accepted here: MySQL spells it differently.
pub fn is_create_table(stmt: &str) -> bool {
    PLAIN_CREATE_TABLE_RE.is_match(strip_leading_sql_comments(stmt))
}

/// Name of the table declared by a CREATE TABLE statement
pub fn create_table_name(stmt: &str) -> Option<String> {
    CREATE_TABLE_RE
        .captures(strip_leading_sql_comments(stmt))
        .map(|caps| caps[1].to_string())
}

/// Strip leading SQL comments (-- and /* */) from a string
pub fn strip_leading_sql_comments(stmt: &str) -> &str {
    let mut result = stmt.trim();
    loop {
        if result.starts_with("--") {
            match result.find('\n') {
                Some(pos) => {
                    result = result[pos + 1..].trim();
                    continue;
                }
                None => return "",
            }
        }
        if result.starts_with("/*") {
            match result.find("*/") {
                Some(pos) => {
                    result = result[pos + 2..].trim();
                    continue;
                }
                None => return "",
            }
        }
        break;
    }
    result
}

/// Splits a script into statements on `;` outside quotes and comments.
///
/// Each item includes its terminating `;` (the last one may lack it) and is
/// trimmed. Whitespace-only fragments are not yielded.
pub struct StatementSplitter<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> StatementSplitter<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn next_end(&self) -> usize {
        let rest = &self.input[self.pos..];
        let bytes = rest.as_bytes();

        let mut inside_single_quote = false;
        let mut inside_double_quote = false;
        let mut inside_backtick = false;
        let mut escaped = false;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            let inside_string = inside_single_quote || inside_double_quote;

            if escaped {
                escaped = false;
                i += 1;
                continue;
            }

            if inside_string || inside_backtick {
                if b == b'\\' && inside_string {
                    escaped = true;
                } else if b == b'\'' && inside_single_quote {
                    inside_single_quote = false;
                } else if b == b'"' && inside_double_quote {
                    inside_double_quote = false;
                } else if b == b'`' && inside_backtick {
                    inside_backtick = false;
                }
                i += 1;
                continue;
            }

            match b {
                b'\'' => inside_single_quote = true,
                b'"' => inside_double_quote = true,
                b'`' => inside_backtick = true,
                b'-' if bytes.get(i + 1) == Some(&b'-') => {
                    // Line comment runs to end of line
                    i = rest[i..].find('\n').map(|p| i + p).unwrap_or(bytes.len());
                    continue;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    i = rest[i + 2..]
                        .find("*/")
                        .map(|p| i + 2 + p + 2)
                        .unwrap_or(bytes.len());
                    continue;
                }
                b';' => return self.pos + i + 1,
                _ => {}
            }
            i += 1;
        }

        self.input.len()
    }
}

impl<'a> Iterator for StatementSplitter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.input.len() {
            let end = self.next_end();
            let stmt = self.input[self.pos..end].trim();
            self.pos = end;
            if !stmt.is_empty() {
                return Some(stmt);
            }
        }
        None
    }
}
