//! Data type mapping between MySQL and SQLite.
//!
//! Each direction has one closed keyword set with an exhaustive match to the
//! other side:
//! - MySQL integer, boolean and year types collapse to INTEGER
//! - MySQL float and fixed-point types collapse to REAL
//! - MySQL string, date/time and JSON types collapse to TEXT
//! - MySQL binary and blob types collapse to BLOB
//!
//! Going back, SQLite's storage classes expand to one fixed MySQL type each,
//! so a round trip never restores the original length or precision.

use crate::dialect::Direction;
use once_cell::sync::Lazy;
use regex::Regex;

/// Length given to bounded text types produced from SQLite TEXT
pub const DEFAULT_TEXT_LENGTH: u32 = 255;

/// MySQL type keywords with a known SQLite counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MySqlKeyword {
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    Integer,
    BigInt,
    Bool,
    Boolean,
    Year,
    Float,
    Double,
    Real,
    Decimal,
    Char,
    Varchar,
    TinyText,
    Text,
    MediumText,
    LongText,
    Date,
    DateTime,
    Timestamp,
    Time,
    Json,
    Binary,
    VarBinary,
    TinyBlob,
    Blob,
    MediumBlob,
    LongBlob,
}

impl MySqlKeyword {
    /// Look up an uppercase keyword
    pub fn parse(keyword: &str) -> Option<Self> {
        use MySqlKeyword::*;
        let kw = match keyword {
            "TINYINT" => TinyInt,
            "SMALLINT" => SmallInt,
            "MEDIUMINT" => MediumInt,
            "INT" => Int,
            "INTEGER" => Integer,
            "BIGINT" => BigInt,
            "BOOL" => Bool,
            "BOOLEAN" => Boolean,
            "YEAR" => Year,
            "FLOAT" => Float,
            "DOUBLE" => Double,
            "REAL" => Real,
            "DECIMAL" => Decimal,
            "CHAR" => Char,
            "VARCHAR" => Varchar,
            "TINYTEXT" => TinyText,
            "TEXT" => Text,
            "MEDIUMTEXT" => MediumText,
            "LONGTEXT" => LongText,
            "DATE" => Date,
            "DATETIME" => DateTime,
            "TIMESTAMP" => Timestamp,
            "TIME" => Time,
            "JSON" => Json,
            "BINARY" => Binary,
            "VARBINARY" => VarBinary,
            "TINYBLOB" => TinyBlob,
            "BLOB" => Blob,
            "MEDIUMBLOB" => MediumBlob,
            "LONGBLOB" => LongBlob,
            _ => return None,
        };
        Some(kw)
    }

    pub fn to_sqlite(self) -> SqliteKeyword {
        use MySqlKeyword::*;
        match self {
            TinyInt | SmallInt | MediumInt | Int | Integer | BigInt | Bool | Boolean | Year => {
                SqliteKeyword::Integer
            }
            Float | Double | Real | Decimal => SqliteKeyword::Real,
            Char | Varchar | TinyText | Text | MediumText | LongText | Date | DateTime
            | Timestamp | Time | Json => SqliteKeyword::Text,
            Binary | VarBinary | TinyBlob | Blob | MediumBlob | LongBlob => SqliteKeyword::Blob,
        }
    }

    /// Whether SQLite's counterpart loses information even without a size suffix
    fn is_lossy_in_sqlite(self) -> bool {
        use MySqlKeyword::*;
        matches!(self, Decimal | Date | DateTime | Timestamp | Time | Year)
    }
}

/// SQLite storage-class keywords with a known MySQL counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqliteKeyword {
    Integer,
    Real,
    Text,
    Blob,
    Numeric,
}

impl SqliteKeyword {
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "INTEGER" => Some(SqliteKeyword::Integer),
            "REAL" => Some(SqliteKeyword::Real),
            "TEXT" => Some(SqliteKeyword::Text),
            "BLOB" => Some(SqliteKeyword::Blob),
            "NUMERIC" => Some(SqliteKeyword::Numeric),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SqliteKeyword::Integer => "INTEGER",
            SqliteKeyword::Real => "REAL",
            SqliteKeyword::Text => "TEXT",
            SqliteKeyword::Blob => "BLOB",
            SqliteKeyword::Numeric => "NUMERIC",
        }
    }

    /// MySQL spelling; text becomes a bounded VARCHAR of `text_length`
    pub fn to_mysql(self, text_length: u32) -> String {
        match self {
            SqliteKeyword::Integer => "INT".to_string(),
            SqliteKeyword::Real => "DOUBLE".to_string(),
            SqliteKeyword::Text => format!("VARCHAR({})", text_length),
            SqliteKeyword::Blob => "BLOB".to_string(),
            SqliteKeyword::Numeric => "DECIMAL".to_string(),
        }
    }

    /// 64-bit INTEGER narrows to INT, unbounded TEXT gets a length cap
    fn is_lossy_in_mysql(self) -> bool {
        matches!(
            self,
            SqliteKeyword::Integer | SqliteKeyword::Text | SqliteKeyword::Numeric
        )
    }
}

/// Result of mapping one declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    pub target: String,
    /// False when the keyword was unrecognised and `target` is the input unchanged
    pub matched: bool,
    /// True when the target cannot hold every value of the source type
    pub lossy: bool,
}

/// Type mapper for converting declared types between dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMapper {
    text_length: u32,
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self {
            text_length: DEFAULT_TEXT_LENGTH,
        }
    }
}

impl TypeMapper {
    pub fn new(text_length: u32) -> Self {
        Self { text_length }
    }

    pub fn text_length(&self) -> u32 {
        self.text_length
    }

    /// Map a declared type such as `varchar(100)` or `INT(11) UNSIGNED`.
    ///
    /// On a match everything after the keyword (size suffix, modifiers) is
    /// dropped. Unknown keywords come back unchanged with `matched = false`.
    pub fn map_type(&self, source_type: &str, direction: Direction) -> TypeMapping {
        let Some(caps) = RE_DECLARED_TYPE.captures(source_type) else {
            return Self::pass_through(source_type);
        };
        let keyword = caps[1].to_ascii_uppercase();
        let has_suffix = caps.get(2).is_some();

        match self.map_keyword(&keyword, direction) {
            Some(mut mapping) => {
                mapping.lossy |= has_suffix;
                mapping
            }
            None => Self::pass_through(source_type),
        }
    }

    /// Map a bare uppercase keyword, `None` when it is not in the table
    pub fn map_keyword(&self, keyword: &str, direction: Direction) -> Option<TypeMapping> {
        match direction {
            Direction::MySqlToSqlite => MySqlKeyword::parse(keyword).map(|kw| TypeMapping {
                target: kw.to_sqlite().as_str().to_string(),
                matched: true,
                lossy: kw.is_lossy_in_sqlite(),
            }),
            Direction::SqliteToMySql => SqliteKeyword::parse(keyword).map(|kw| TypeMapping {
                target: kw.to_mysql(self.text_length),
                matched: true,
                lossy: kw.is_lossy_in_mysql(),
            }),
        }
    }

    fn pass_through(source_type: &str) -> TypeMapping {
        TypeMapping {
            target: source_type.to_string(),
            matched: false,
            lossy: false,
        }
    }
}

/// Map a declared type with the default text length
pub fn map_type(source_type: &str, direction: Direction) -> TypeMapping {
    TypeMapper::default().map_type(source_type, direction)
}

// Leading keyword, then an optional size/precision suffix
static RE_DECLARED_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z]+)\s*(\(\s*\d+\s*(?:,\s*\d+\s*)?\))?").unwrap());
