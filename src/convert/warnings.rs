//! Warning system for schema conversion.
//!
//! Tracks lossy type mappings, unrecognised types, skipped statements and
//! features the target dialect cannot express.

use tracing::warn;

/// Warning types that can occur during conversion
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertWarning {
    /// Feature not supported in target dialect
    UnsupportedFeature {
        feature: String,
        suggestion: Option<String>,
    },
    /// Data type conversion may lose precision or length
    LossyConversion {
        from_type: String,
        to_type: String,
        table: Option<String>,
        column: Option<String>,
    },
    /// Type keyword not in the mapping table, passed through unchanged
    UnmappedType {
        type_name: String,
        table: Option<String>,
        column: Option<String>,
    },
    /// Statement was skipped
    SkippedStatement {
        reason: String,
        statement_preview: String,
    },
}

fn write_location(
    f: &mut std::fmt::Formatter<'_>,
    table: &Option<String>,
    column: &Option<String>,
) -> std::fmt::Result {
    if let Some(t) = table {
        write!(f, " in table {}", t)?;
        if let Some(c) = column {
            write!(f, ".{}", c)?;
        }
    } else if let Some(c) = column {
        write!(f, " in column {}", c)?;
    }
    Ok(())
}

impl std::fmt::Display for ConvertWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertWarning::UnsupportedFeature {
                feature,
                suggestion,
            } => {
                write!(f, "Unsupported feature: {}", feature)?;
                if let Some(s) = suggestion {
                    write!(f, " ({})", s)?;
                }
                Ok(())
            }
            ConvertWarning::LossyConversion {
                from_type,
                to_type,
                table,
                column,
            } => {
                write!(f, "Lossy conversion: {} → {}", from_type, to_type)?;
                write_location(f, table, column)
            }
            ConvertWarning::UnmappedType {
                type_name,
                table,
                column,
            } => {
                write!(f, "Unmapped type {} kept as-is", type_name)?;
                write_location(f, table, column)
            }
            ConvertWarning::SkippedStatement {
                reason,
                statement_preview,
            } => {
                write!(f, "Skipped: {} ({})", reason, statement_preview)
            }
        }
    }
}

/// Collects warnings during conversion
#[derive(Debug)]
pub struct WarningCollector {
    warnings: Vec<ConvertWarning>,
    max_warnings: usize,
}

impl Default for WarningCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl WarningCollector {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            max_warnings: 100,
        }
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            warnings: Vec::new(),
            max_warnings: limit,
        }
    }

    /// Add a warning, emitting it through `tracing` as well
    pub fn add(&mut self, warning: ConvertWarning) {
        if self.warnings.len() < self.max_warnings
            && !self.warnings.iter().any(|w| Self::is_similar(w, &warning))
        {
            warn!("{}", warning);
            self.warnings.push(warning);
        }
    }

    /// Check if two warnings are similar enough to deduplicate
    fn is_similar(a: &ConvertWarning, b: &ConvertWarning) -> bool {
        match (a, b) {
            (
                ConvertWarning::UnsupportedFeature { feature: f1, .. },
                ConvertWarning::UnsupportedFeature { feature: f2, .. },
            ) => f1 == f2,
            (
                ConvertWarning::LossyConversion {
                    from_type: f1,
                    to_type: t1,
                    table: tb1,
                    ..
                },
                ConvertWarning::LossyConversion {
                    from_type: f2,
                    to_type: t2,
                    table: tb2,
                    ..
                },
            ) => f1 == f2 && t1 == t2 && tb1 == tb2,
            (
                ConvertWarning::UnmappedType {
                    type_name: n1,
                    table: tb1,
                    ..
                },
                ConvertWarning::UnmappedType {
                    type_name: n2,
                    table: tb2,
                    ..
                },
            ) => n1 == n2 && tb1 == tb2,
            _ => false,
        }
    }

    /// Get all collected warnings
    pub fn warnings(&self) -> &[ConvertWarning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn count(&self) -> usize {
        self.warnings.len()
    }

    /// Remove and return all collected warnings
    pub fn take(&mut self) -> Vec<ConvertWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn is_truncated(&self) -> bool {
        self.warnings.len() >= self.max_warnings
    }
}
