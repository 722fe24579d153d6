//! Bidirectional MySQL / SQLite `CREATE TABLE` translation.
//!
//! Two modes:
//! - text mode rewrites DDL strings ([`convert_sql`], [`convert::Converter`])
//! - structure mode introspects a live table and recreates it in the other
//!   dialect through host-supplied adapters ([`migrate_table`])

pub mod config;
pub mod convert;
pub mod dialect;
pub mod error;
pub mod migrate;
pub mod model;
pub mod parser;

pub use config::BridgeConfig;
pub use convert::{convert_sql, ConvertWarning, Converter, TypeMapper};
pub use dialect::{Dialect, Direction, MySqlDialect, SqlDialect, SqliteDialect};
pub use error::{BridgeError, MigrateError, Result};
pub use migrate::{migrate_table, Migrator, TableCreator, TableIntrospector};
pub use model::ColumnModel;
