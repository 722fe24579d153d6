//! Dialect-neutral column description shared by introspection and table creation.

use serde::{Deserialize, Serialize};

/// One column of a table, as reported by an introspector or handed to a creator.
///
/// `declared_type` is always spelled in the dialect the column currently
/// belongs to. `extra` carries dialect-specific attributes; the only one the
/// bridge interprets is the auto-increment marker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnModel {
    pub name: String,
    pub declared_type: String,
    pub nullable: bool,
    /// SQL expression text of the column default, if any
    pub default_value: Option<String>,
    pub is_primary_key: bool,
    pub extra: String,
}

impl ColumnModel {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            nullable: true,
            default_value: None,
            is_primary_key: false,
            extra: String::new(),
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn with_default(mut self, expr: impl Into<String>) -> Self {
        self.default_value = Some(expr.into());
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = extra.into();
        self
    }
}
