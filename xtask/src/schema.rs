// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-neutral schema snapshots used to check that the `SQLite` and
//! `MySQL` migration trees produce the same tables.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

use color_eyre::{Result, eyre::Context, eyre::eyre};
use diesel::sql_types::{Integer, Text};
use diesel::{MysqlConnection, QueryableByName, RunQueryDsl, SqliteConnection};

const MIGRATIONS_TABLE: &str = "__diesel_schema_migrations";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    pub tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: BTreeMap<String, Column>,
    pub primary_key: BTreeSet<String>,
    pub foreign_keys: BTreeSet<ForeignKey>,
    /// Column lists of unique constraints.
    pub unique: BTreeSet<Vec<String>>,
    /// Column lists of non-unique indexes. Names differ per backend.
    pub indexes: BTreeSet<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub kind: TypeClass,
    pub nullable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypeClass {
    Integer,
    Real,
    Text,
    Blob,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ForeignKey {
    pub column: String,
    pub references: (String, String),
}

/// Maps a declared `SQLite` column type onto a storage class using the
/// affinity rules.
pub fn sqlite_type_class(declared: &str) -> TypeClass {
    let upper = declared.to_uppercase();
    if upper.contains("INT") {
        TypeClass::Integer
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        TypeClass::Real
    } else if upper.contains("BLOB") {
        TypeClass::Blob
    } else {
        TypeClass::Text
    }
}

pub fn mysql_type_class(data_type: &str) -> TypeClass {
    match data_type.to_uppercase().as_str() {
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => TypeClass::Integer,
        "DECIMAL" | "NUMERIC" | "FLOAT" | "DOUBLE" | "REAL" => TypeClass::Real,
        "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" => {
            TypeClass::Blob
        }
        _ => TypeClass::Text,
    }
}

#[derive(QueryableByName)]
struct SqliteTable {
    #[diesel(sql_type = Text)]
    name: String,
}

#[derive(QueryableByName)]
struct SqliteColumn {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    r#type: String,
    #[diesel(sql_type = Integer)]
    notnull: i32,
    #[diesel(sql_type = Integer)]
    pk: i32,
}

#[derive(QueryableByName)]
struct SqliteForeignKey {
    #[diesel(sql_type = Text)]
    table: String,
    #[diesel(sql_type = Text)]
    from: String,
    #[diesel(sql_type = Text)]
    to: String,
}

#[derive(QueryableByName)]
struct SqliteIndex {
    #[diesel(sql_type = Text)]
    name: String,
    #[diesel(sql_type = Text)]
    origin: String,
}

#[derive(QueryableByName)]
struct SqliteIndexColumn {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Reads the schema of a migrated `SQLite` database.
pub fn introspect_sqlite(conn: &mut SqliteConnection) -> Result<Schema> {
    let names: Vec<SqliteTable> = diesel::sql_query(format!(
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != '{MIGRATIONS_TABLE}' \
         ORDER BY name"
    ))
    .load(conn)
    .wrap_err("Failed to list SQLite tables")?;

    let mut schema = Schema::default();
    for SqliteTable { name } in names {
        let mut table = Table::default();

        let columns: Vec<SqliteColumn> = diesel::sql_query(format!("PRAGMA table_info({name})"))
            .load(conn)
            .wrap_err_with(|| format!("Failed to read columns of {name}"))?;
        for col in columns {
            if col.pk > 0 {
                table.primary_key.insert(col.name.clone());
            }
            table.columns.insert(
                col.name,
                Column {
                    kind: sqlite_type_class(&col.r#type),
                    nullable: col.notnull == 0,
                },
            );
        }

        let fks: Vec<SqliteForeignKey> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({name})"))
                .load(conn)
                .wrap_err_with(|| format!("Failed to read foreign keys of {name}"))?;
        table.foreign_keys = fks
            .into_iter()
            .map(|fk| ForeignKey {
                column: fk.from,
                references: (fk.table, fk.to),
            })
            .collect();

        let indexes: Vec<SqliteIndex> = diesel::sql_query(format!("PRAGMA index_list({name})"))
            .load(conn)
            .wrap_err_with(|| format!("Failed to read indexes of {name}"))?;
        for index in indexes {
            let columns: Vec<SqliteIndexColumn> =
                diesel::sql_query(format!("PRAGMA index_info({})", index.name))
                    .load(conn)
                    .wrap_err_with(|| format!("Failed to read index {}", index.name))?;
            let columns: Vec<String> = columns.into_iter().map(|c| c.name).collect();

            // origin 'u' covers UNIQUE constraints, including autoindexes
            if index.origin == "u" {
                table.unique.insert(columns);
            } else if !index.name.starts_with("sqlite_autoindex_") {
                table.indexes.insert(columns);
            }
        }

        schema.tables.insert(name, table);
    }

    Ok(schema)
}

#[derive(QueryableByName)]
struct MysqlTable {
    #[diesel(sql_type = Text)]
    table_name: String,
}

#[derive(QueryableByName)]
struct MysqlColumn {
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    data_type: String,
    #[diesel(sql_type = Text)]
    is_nullable: String,
    #[diesel(sql_type = Text)]
    column_key: String,
}

#[derive(QueryableByName)]
#[allow(clippy::struct_field_names)]
struct MysqlForeignKey {
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Text)]
    referenced_table_name: String,
    #[diesel(sql_type = Text)]
    referenced_column_name: String,
}

#[derive(QueryableByName)]
struct MysqlIndexColumn {
    #[diesel(sql_type = Text)]
    index_name: String,
    #[diesel(sql_type = Text)]
    column_name: String,
    #[diesel(sql_type = Integer)]
    non_unique: i32,
}

/// Reads the schema of a migrated `MySQL`/`MariaDB` database named
/// `database`.
pub fn introspect_mysql(conn: &mut MysqlConnection, database: &str) -> Result<Schema> {
    let names: Vec<MysqlTable> = diesel::sql_query(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = ? AND table_name != ? ORDER BY table_name",
    )
    .bind::<Text, _>(database)
    .bind::<Text, _>(MIGRATIONS_TABLE)
    .load(conn)
    .wrap_err("Failed to list MySQL tables")?;

    let mut schema = Schema::default();
    for MysqlTable { table_name: name } in names {
        let mut table = Table::default();

        let columns: Vec<MysqlColumn> = diesel::sql_query(
            "SELECT column_name, data_type, is_nullable, column_key \
             FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to read columns of {name}"))?;
        for col in columns {
            if col.column_key == "PRI" {
                table.primary_key.insert(col.column_name.clone());
            }
            table.columns.insert(
                col.column_name,
                Column {
                    kind: mysql_type_class(&col.data_type),
                    nullable: col.is_nullable == "YES",
                },
            );
        }

        let fks: Vec<MysqlForeignKey> = diesel::sql_query(
            "SELECT column_name, referenced_table_name, referenced_column_name \
             FROM information_schema.key_column_usage \
             WHERE table_schema = ? AND table_name = ? AND referenced_table_name IS NOT NULL",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to read foreign keys of {name}"))?;
        table.foreign_keys = fks
            .into_iter()
            .map(|fk| ForeignKey {
                column: fk.column_name,
                references: (fk.referenced_table_name, fk.referenced_column_name),
            })
            .collect();

        // UNIQUE constraints and plain indexes both surface in statistics;
        // non_unique separates them.
        let index_columns: Vec<MysqlIndexColumn> = diesel::sql_query(
            "SELECT index_name, column_name, non_unique FROM information_schema.statistics \
             WHERE table_schema = ? AND table_name = ? AND index_name != 'PRIMARY' \
             ORDER BY index_name, seq_in_index",
        )
        .bind::<Text, _>(database)
        .bind::<Text, _>(&name)
        .load(conn)
        .wrap_err_with(|| format!("Failed to read indexes of {name}"))?;

        let mut grouped: BTreeMap<String, (bool, Vec<String>)> = BTreeMap::new();
        for row in index_columns {
            grouped
                .entry(row.index_name)
                .or_insert_with(|| (row.non_unique == 0, Vec::new()))
                .1
                .push(row.column_name);
        }
        for (is_unique, columns) in grouped.into_values() {
            if is_unique {
                table.unique.insert(columns);
            } else {
                table.indexes.insert(columns);
            }
        }

        schema.tables.insert(name, table);
    }

    Ok(schema)
}

/// Lists every difference between the two schemas.
///
/// `MySQL` creates an index for each foreign key column on its own, so an
/// extra single-column index on a foreign key column is not a difference.
pub fn schema_differences(sqlite: &Schema, mysql: &Schema) -> Vec<String> {
    let mut diffs = Vec::new();

    for name in sqlite.tables.keys() {
        if !mysql.tables.contains_key(name) {
            diffs.push(format!("table '{name}' is missing in MySQL"));
        }
    }
    for name in mysql.tables.keys() {
        if !sqlite.tables.contains_key(name) {
            diffs.push(format!("table '{name}' is missing in SQLite"));
        }
    }

    for (name, lite) in &sqlite.tables {
        let Some(my) = mysql.tables.get(name) else {
            continue;
        };
        table_differences(name, lite, my, &mut diffs);
    }

    diffs
}

fn table_differences(name: &str, lite: &Table, my: &Table, diffs: &mut Vec<String>) {
    for (col, lite_col) in &lite.columns {
        match my.columns.get(col) {
            None => diffs.push(format!("{name}.{col} is missing in MySQL")),
            Some(my_col) if my_col.kind != lite_col.kind => diffs.push(format!(
                "{name}.{col} type differs: SQLite {:?}, MySQL {:?}",
                lite_col.kind, my_col.kind
            )),
            Some(my_col) if my_col.nullable != lite_col.nullable => diffs.push(format!(
                "{name}.{col} nullability differs: SQLite {}, MySQL {}",
                lite_col.nullable, my_col.nullable
            )),
            Some(_) => {}
        }
    }
    for col in my.columns.keys() {
        if !lite.columns.contains_key(col) {
            diffs.push(format!("{name}.{col} is missing in SQLite"));
        }
    }

    if lite.primary_key != my.primary_key {
        diffs.push(format!(
            "{name} primary key differs: SQLite {:?}, MySQL {:?}",
            lite.primary_key, my.primary_key
        ));
    }
    if lite.foreign_keys != my.foreign_keys {
        diffs.push(format!(
            "{name} foreign keys differ: SQLite {:?}, MySQL {:?}",
            lite.foreign_keys, my.foreign_keys
        ));
    }
    if lite.unique != my.unique {
        diffs.push(format!(
            "{name} unique constraints differ: SQLite {:?}, MySQL {:?}",
            lite.unique, my.unique
        ));
    }

    for columns in lite.indexes.difference(&my.indexes) {
        diffs.push(format!("{name} index on {columns:?} is missing in MySQL"));
    }
    for columns in my.indexes.difference(&lite.indexes) {
        let implicit_fk_index = matches!(
            columns.as_slice(),
            [only] if my.foreign_keys.iter().any(|fk| &fk.column == only)
        );
        if !implicit_fk_index {
            diffs.push(format!("{name} index on {columns:?} is missing in SQLite"));
        }
    }
}

/// Fails with every difference listed if the schemas are not equivalent.
pub fn ensure_parity(sqlite: &Schema, mysql: &Schema) -> Result<()> {
    let diffs = schema_differences(sqlite, mysql);
    if diffs.is_empty() {
        return Ok(());
    }
    let mut report = format!("Schema parity check failed ({} differences):", diffs.len());
    for diff in &diffs {
        let _ = write!(report, "\n  - {diff}");
    }
    Err(eyre!(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bookings_table() -> Table {
        let mut table = Table::default();
        table.columns.insert(
            String::from("booking_id"),
            Column {
                kind: TypeClass::Integer,
                nullable: false,
            },
        );
        table.columns.insert(
            String::from("room_id"),
            Column {
                kind: TypeClass::Integer,
                nullable: true,
            },
        );
        table.primary_key.insert(String::from("booking_id"));
        table.foreign_keys.insert(ForeignKey {
            column: String::from("room_id"),
            references: (String::from("rooms"), String::from("room_id")),
        });
        table
    }

    fn schema_with(table: Table) -> Schema {
        let mut schema = Schema::default();
        schema.tables.insert(String::from("bookings"), table);
        schema
    }

    #[test]
    fn type_classes_line_up_across_backends() {
        assert_eq!(sqlite_type_class("BIGINT"), mysql_type_class("bigint"));
        assert_eq!(sqlite_type_class("VARCHAR(64)"), mysql_type_class("varchar"));
        assert_eq!(sqlite_type_class("DOUBLE"), mysql_type_class("double"));
        assert_eq!(sqlite_type_class("BLOB"), TypeClass::Blob);
    }

    #[test]
    fn identical_schemas_have_parity() {
        let schema = schema_with(bookings_table());
        assert!(ensure_parity(&schema, &schema.clone()).is_ok());
    }

    #[test]
    fn implicit_foreign_key_index_is_ignored() {
        let lite = schema_with(bookings_table());
        let mut my_table = bookings_table();
        my_table.indexes.insert(vec![String::from("room_id")]);
        let my = schema_with(my_table);

        assert!(schema_differences(&lite, &my).is_empty());
    }

    #[test]
    fn every_difference_is_reported() {
        let lite = schema_with(bookings_table());
        let mut my_table = bookings_table();
        my_table.columns.insert(
            String::from("room_id"),
            Column {
                kind: TypeClass::Text,
                nullable: true,
            },
        );
        my_table.unique.insert(vec![String::from("booking_id")]);
        let mut my = schema_with(my_table);
        my.tables.insert(String::from("rooms"), Table::default());

        let diffs = schema_differences(&lite, &my);

        assert_eq!(diffs.len(), 3);
        assert!(diffs.iter().any(|d| d.contains("'rooms' is missing in SQLite")));
        assert!(diffs.iter().any(|d| d.contains("bookings.room_id type differs")));
        assert!(diffs.iter().any(|d| d.contains("unique constraints differ")));
    }
}
