//! Structure-mode migration: introspect a table in one dialect and recreate
//! it in the other.
//!
//! Database access is supplied by the host through [`TableIntrospector`] and
//! [`TableCreator`]. The orchestrator makes exactly two calls, one to each,
//! and returns the first error unchanged. There is no retry and no rollback.

pub mod catalog;

use crate::config::BridgeConfig;
use crate::convert::TypeMapper;
use crate::dialect::{Direction, SqlDialect};
use crate::error::MigrateError;
use crate::model::ColumnModel;
use tracing::{debug, info, warn};

/// Reads a table's column list from a live database.
pub trait TableIntrospector {
    type Error: std::error::Error + 'static;

    fn dialect(&self) -> SqlDialect;

    /// Columns in declaration order, in this dialect's spelling.
    ///
    /// A missing table may be reported as an error or as an empty list.
    fn get_table_structure(&self, table: &str) -> Result<Vec<ColumnModel>, Self::Error>;
}

/// Creates a table from a column list.
///
/// Implementations usually render the statement with
/// [`Dialect::create_table_sql`](crate::dialect::Dialect::create_table_sql)
/// and execute it.
pub trait TableCreator {
    type Error: std::error::Error + 'static;

    fn dialect(&self) -> SqlDialect;

    fn create_table_from_columns(
        &self,
        table: &str,
        columns: &[ColumnModel],
    ) -> Result<(), Self::Error>;
}

/// Drives a single-table structure migration
#[derive(Debug, Clone, Default)]
pub struct Migrator {
    mapper: TypeMapper,
}

impl Migrator {
    pub fn new(mapper: TypeMapper) -> Self {
        Self { mapper }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.type_mapper())
    }

    /// Introspect `table` from `source`, translate it, and create it in `target`
    pub fn migrate_table<S, T>(
        &self,
        table: &str,
        source: &S,
        target: &T,
    ) -> Result<(), MigrateError<S::Error, T::Error>>
    where
        S: TableIntrospector + ?Sized,
        T: TableCreator + ?Sized,
    {
        let direction = Direction::between(source.dialect(), target.dialect())?;
        info!(table, %direction, "Migrating table structure");

        let columns = source
            .get_table_structure(table)
            .map_err(MigrateError::Introspect)?;
        if columns.is_empty() {
            return Err(MigrateError::EmptyTable(table.to_string()));
        }

        let translated = translate_columns(&columns, direction, &self.mapper);

        target
            .create_table_from_columns(table, &translated)
            .map_err(MigrateError::Create)?;

        info!(table, columns = translated.len(), "Table created");
        Ok(())
    }
}

/// Migrate one table with the default type mapper
pub fn migrate_table<S, T>(
    table: &str,
    source: &S,
    target: &T,
) -> Result<(), MigrateError<S::Error, T::Error>>
where
    S: TableIntrospector + ?Sized,
    T: TableCreator + ?Sized,
{
    Migrator::default().migrate_table(table, source, target)
}

/// Translate source-convention columns into the target dialect.
///
/// Types go through `mapper`. The first auto-increment column gets the
/// target's marker; any further ones lose theirs. Other `extra` attributes
/// are dialect specific and are dropped. Nullability, defaults and primary
/// key membership carry over unchanged.
pub fn translate_columns(
    columns: &[ColumnModel],
    direction: Direction,
    mapper: &TypeMapper,
) -> Vec<ColumnModel> {
    let source = direction.source();
    let target = direction.target();
    let mut seen_auto_increment = false;

    columns
        .iter()
        .map(|col| {
            let mapping = mapper.map_type(&col.declared_type, direction);
            if !mapping.matched {
                warn!(
                    column = %col.name,
                    declared_type = %col.declared_type,
                    "Unmapped type kept as-is"
                );
            } else if mapping.lossy {
                warn!(
                    column = %col.name,
                    from = %col.declared_type,
                    to = %mapping.target,
                    "Lossy type conversion"
                );
            }

            let extra = if source.is_auto_increment(&col.extra) {
                if seen_auto_increment {
                    warn!(
                        column = %col.name,
                        "Dropping auto-increment: only one surrogate key per table is kept"
                    );
                    String::new()
                } else {
                    seen_auto_increment = true;
                    target.auto_increment_keyword().to_string()
                }
            } else {
                if !col.extra.is_empty() {
                    debug!(column = %col.name, extra = %col.extra, "Dropping column extra");
                }
                String::new()
            };

            ColumnModel {
                name: col.name.clone(),
                declared_type: mapping.target,
                nullable: col.nullable,
                default_value: col.default_value.clone(),
                is_primary_key: col.is_primary_key,
                extra,
            }
        })
        .collect()
}
