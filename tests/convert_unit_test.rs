//! Tests for text-mode CREATE TABLE rewriting and script conversion.

use schema_bridge::convert::{ConvertWarning, Converter};
use schema_bridge::{convert_sql, BridgeConfig, BridgeError, Direction};

const MYSQL_USERS: &str = "CREATE TABLE users (
  id INT AUTO_INCREMENT PRIMARY KEY,
  name VARCHAR(100),
  created_at DATETIME
) ENGINE=InnoDB DEFAULT CHARSET=utf8;";

const SQLITE_USERS: &str = "CREATE TABLE users (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  name TEXT,
  created_at TEXT
);";

#[test]
fn test_mysql_to_sqlite_users_table() {
    let output = convert_sql(MYSQL_USERS, Direction::MySqlToSqlite).unwrap();

    assert!(output.contains("CREATE TABLE users"));
    assert!(output.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
    assert!(output.contains("name TEXT"));
    assert!(output.contains("created_at TEXT"));
    assert!(!output.contains("ENGINE"));
    assert!(!output.contains("AUTO_INCREMENT"));
    assert_eq!(output, SQLITE_USERS);
}

#[test]
fn test_sqlite_to_mysql_users_table() {
    let output = convert_sql(SQLITE_USERS, Direction::SqliteToMySql).unwrap();

    assert!(output.contains("id INT AUTO_INCREMENT PRIMARY KEY"));
    assert!(output.contains("name VARCHAR(255)"));
    assert!(output.contains("created_at VARCHAR(255)"));
    assert!(output.ends_with(") ENGINE=InnoDB DEFAULT CHARSET=utf8;"));
    assert!(!output.contains("AUTOINCREMENT"));
}

#[test]
fn test_auto_increment_phrase_follows_mapped_type() {
    let output = convert_sql(
        "CREATE TABLE t (\n  id INT AUTO_INCREMENT PRIMARY KEY\n);",
        Direction::MySqlToSqlite,
    )
    .unwrap();
    let line = output
        .lines()
        .find(|l| l.trim_start().starts_with("id "))
        .unwrap();
    let type_pos = line.find("INTEGER").unwrap();
    let phrase_pos = line.find("PRIMARY KEY AUTOINCREMENT").unwrap();
    assert!(type_pos < phrase_pos);
}

#[test]
fn test_round_trip_is_lossy() {
    let original = "CREATE TABLE t (\n  title VARCHAR(100) NOT NULL\n);";
    let sqlite = convert_sql(original, Direction::MySqlToSqlite).unwrap();
    let back = convert_sql(&sqlite, Direction::MySqlToSqlite.reverse()).unwrap();

    assert!(sqlite.contains("title TEXT NOT NULL"));
    assert!(back.contains("title VARCHAR(255) NOT NULL"));
    assert!(!back.contains("VARCHAR(100)"));
}

#[test]
fn test_integer_family_collapses() {
    for ty in ["TINYINT", "SMALLINT", "MEDIUMINT", "INT", "BIGINT", "tinyint(1)", "bigint(20)"] {
        let sql = format!("CREATE TABLE t (\n  n {}\n);", ty);
        let output = convert_sql(&sql, Direction::MySqlToSqlite).unwrap();
        assert!(output.contains("n INTEGER"), "{} -> {}", ty, output);
    }
}

#[test]
fn test_canonical_target_types_are_unchanged() {
    let output = convert_sql(SQLITE_USERS, Direction::MySqlToSqlite).unwrap();
    assert!(output.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
    assert!(output.contains("name TEXT"));
    assert!(output.contains("created_at TEXT"));
}

#[test]
fn test_insert_is_rejected() {
    let err = convert_sql("INSERT INTO users VALUES (1, 'a');", Direction::MySqlToSqlite)
        .unwrap_err();
    assert!(matches!(err, BridgeError::UnsupportedStatement { .. }));
    assert!(err.to_string().contains("INSERT INTO users"));

    let err = convert_sql("ALTER TABLE users ADD x INT;", Direction::SqliteToMySql).unwrap_err();
    assert!(matches!(err, BridgeError::UnsupportedStatement { .. }));
}

#[test]
fn test_columns_on_header_line_are_rejected() {
    let err = convert_sql(
        "CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT);",
        Direction::SqliteToMySql,
    )
    .unwrap_err();
    assert!(matches!(err, BridgeError::UnsupportedStatement { .. }));

    let err = convert_sql(
        "CREATE TABLE t (id INT AUTO_INCREMENT PRIMARY KEY,\n  name VARCHAR(10)\n);",
        Direction::MySqlToSqlite,
    )
    .unwrap_err();
    assert!(matches!(err, BridgeError::UnsupportedStatement { .. }));
    assert!(err.to_string().contains("CREATE TABLE t"));
}

#[test]
fn test_temporary_table_is_rejected() {
    let err = convert_sql("CREATE TEMP TABLE t (\n  id INTEGER\n);", Direction::SqliteToMySql)
        .unwrap_err();
    assert!(matches!(err, BridgeError::UnsupportedStatement { .. }));

    let err = convert_sql(
        "CREATE TEMPORARY TABLE t (\n  id INT\n) ENGINE=MEMORY;",
        Direction::MySqlToSqlite,
    )
    .unwrap_err();
    assert!(matches!(err, BridgeError::UnsupportedStatement { .. }));
}

#[test]
fn test_trailing_comments_do_not_swallow_rewrites() {
    let sql = "CREATE TABLE t ( -- accounts\n  id INT NOT NULL AUTO_INCREMENT, -- surrogate\n  name VARCHAR(10) -- display name\n);";
    let output = convert_sql(sql, Direction::MySqlToSqlite).unwrap();
    assert_eq!(
        output,
        "CREATE TABLE t (\n  id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,\n  name TEXT\n);"
    );

    let sql = "CREATE TABLE t (\n  id INTEGER PRIMARY KEY AUTOINCREMENT, -- rowid alias\n  note TEXT DEFAULT '--'\n);";
    let output = convert_sql(sql, Direction::SqliteToMySql).unwrap();
    assert_eq!(
        output,
        "CREATE TABLE t (\n  id INT AUTO_INCREMENT PRIMARY KEY,\n  note VARCHAR(255) DEFAULT '--'\n) ENGINE=InnoDB DEFAULT CHARSET=utf8;"
    );
}

#[test]
fn test_case_insensitive_and_leading_comment() {
    let sql = "-- users table\ncreate table users (\n  id int auto_increment primary key\n);";
    let output = convert_sql(sql, Direction::MySqlToSqlite).unwrap();
    assert!(output.starts_with("create table users ("));
    assert!(output.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
}

#[test]
fn test_blank_and_comment_lines_are_dropped() {
    let sql = "CREATE TABLE t (\n\n  -- surrogate key\n  id INT,\n\n  name CHAR(10)\n);";
    let output = convert_sql(sql, Direction::MySqlToSqlite).unwrap();
    assert_eq!(output, "CREATE TABLE t (\n  id INTEGER,\n  name TEXT\n);");
}

#[test]
fn test_sqlite_double_quotes_become_backticks() {
    let sql = "CREATE TABLE \"events\" (\n  \"id\" INTEGER PRIMARY KEY AUTOINCREMENT,\n  \"payload\" BLOB DEFAULT 'none'\n);";
    let output = convert_sql(sql, Direction::SqliteToMySql).unwrap();
    assert!(output.starts_with("CREATE TABLE `events` ("));
    assert!(output.contains("`id` INT AUTO_INCREMENT PRIMARY KEY"));
    assert!(output.contains("`payload` BLOB DEFAULT 'none'"));
}

#[test]
fn test_warnings_are_collected() {
    let mut converter = Converter::new(Direction::MySqlToSqlite);
    converter.convert_create_table(MYSQL_USERS).unwrap();

    let warnings = converter.warnings();
    assert!(warnings.iter().any(|w| matches!(
        w,
        ConvertWarning::LossyConversion { from_type, to_type, column, .. }
            if from_type == "VARCHAR(100)" && to_type == "TEXT" && column.as_deref() == Some("name")
    )));
    assert!(warnings.iter().any(|w| matches!(
        w,
        ConvertWarning::LossyConversion { from_type, .. } if from_type == "DATETIME"
    )));
}

#[test]
fn test_config_controls_text_length_and_storage_clause() {
    let config = BridgeConfig {
        text_length: 1000,
        charset: "utf8mb4".to_string(),
        ..Default::default()
    };
    let mut converter = Converter::from_config(Direction::SqliteToMySql, &config);
    let output = converter.convert_create_table(SQLITE_USERS).unwrap();

    assert!(output.contains("name VARCHAR(1000)"));
    assert!(output.ends_with(") ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;"));
}

#[test]
fn test_strict_config_fails_on_lossy_type() {
    let config = BridgeConfig {
        strict: true,
        ..Default::default()
    };
    let mut converter = Converter::from_config(Direction::MySqlToSqlite, &config);
    let err = converter.convert_create_table(MYSQL_USERS).unwrap_err();
    assert!(matches!(err, BridgeError::LossyConversion(_)));
}

#[test]
fn test_convert_script_skips_other_statements() {
    let script = "-- Dump header\n\
                  SET NAMES utf8mb4;\n\
                  DROP TABLE IF EXISTS `users`;\n\
                  CREATE TABLE `users` (\n  `id` int(11) NOT NULL AUTO_INCREMENT,\n  `bio` text,\n  PRIMARY KEY (`id`)\n) ENGINE=InnoDB;\n\
                  INSERT INTO `users` VALUES (1,'semi;colon');\n\
                  CREATE TABLE tags (\n  name VARCHAR(30)\n);\n";

    let mut converter = Converter::new(Direction::MySqlToSqlite);
    let result = converter.convert_script(script).unwrap();

    assert_eq!(result.stats.statements_processed, 5);
    assert_eq!(result.stats.statements_converted, 2);
    assert_eq!(result.stats.statements_skipped, 3);
    assert_eq!(
        result.sql,
        "CREATE TABLE \"users\" (\n  \"id\" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,\n  \"bio\" TEXT\n);\n\n\
         CREATE TABLE tags (\n  name TEXT\n);\n"
    );
    assert_eq!(
        result
            .stats
            .warnings
            .iter()
            .filter(|w| matches!(w, ConvertWarning::SkippedStatement { .. }))
            .count(),
        3
    );
}

#[test]
fn test_convert_script_propagates_errors_in_strict_mode() {
    let mut converter = Converter::new(Direction::MySqlToSqlite).with_strict(true);
    let err = converter
        .convert_script("CREATE TABLE t (\n  d DATE\n);")
        .unwrap_err();
    assert!(matches!(err, BridgeError::LossyConversion(_)));
}

#[test]
fn test_convert_script_skips_temporary_tables() {
    let script = "CREATE TEMP TABLE scratch (\n  v INTEGER\n);\n\
                  CREATE TABLE kept (\n  v INTEGER\n);\n";

    let mut converter = Converter::new(Direction::SqliteToMySql);
    let result = converter.convert_script(script).unwrap();

    assert_eq!(result.stats.statements_converted, 1);
    assert_eq!(result.stats.statements_skipped, 1);
    assert_eq!(
        result.sql,
        "CREATE TABLE kept (\n  v INT\n) ENGINE=InnoDB DEFAULT CHARSET=utf8;\n"
    );
    assert!(result.stats.warnings.iter().any(|w| matches!(
        w,
        ConvertWarning::SkippedStatement { reason, .. } if reason.contains("temporary")
    )));
}

#[test]
fn test_convert_script_reports_unmapped_type_per_table() {
    let script = "CREATE TABLE places (\n  shape GEOMETRY\n);\n\
                  CREATE TABLE zones (\n  shape GEOMETRY,\n  border GEOMETRY\n);\n";

    let mut converter = Converter::new(Direction::MySqlToSqlite);
    let result = converter.convert_script(script).unwrap();

    let tables: Vec<&str> = result
        .stats
        .warnings
        .iter()
        .filter_map(|w| match w {
            ConvertWarning::UnmappedType { table, .. } => table.as_deref(),
            _ => None,
        })
        .collect();
    assert_eq!(tables, vec!["places", "zones"]);
}
