//! JSON snapshots of a whole [Database].
//!
//! Layout:
//! ```text
//! {
//!   "format_version": "1.0",
//!   "database_name": "main",
//!   "tables": {
//!     "users": {
//!       "name": "users",
//!       "schema": [{ "name": "id", "type": "int" }, { "name": "name", "type": "str" }],
//!       "data": [[1, "Alice"]]
//!     }
//!   }
//! }
//! ```
//! Importing rebuilds the database through [Database::create_table] and
//! [Database::insert_row], so a snapshot is held to the same rules as SQL input.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::database::Database;
use crate::error::PersistenceError;
use crate::table::{ColumnDef, Row};

pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    format_version: String,
    database_name: String,
    tables: BTreeMap<String, TableSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TableSnapshot {
    name: String,
    schema: Vec<ColumnDef>,
    data: Vec<Row>,
}

/// Serializes every table, schema and row to pretty-printed JSON.
pub fn export(db: &Database) -> Result<Vec<u8>, PersistenceError> {
    let mut tables = BTreeMap::new();
    for name in db.list_tables() {
        let table = db
            .get_table(name)
            .map_err(|e| PersistenceError::Invalid(e.to_string()))?;
        tables.insert(
            name.to_string(),
            TableSnapshot {
                name: name.to_string(),
                schema: table.schema.columns.clone(),
                data: table.rows().to_vec(),
            },
        );
    }

    let snapshot = Snapshot {
        format_version: FORMAT_VERSION.to_string(),
        database_name: db.name().to_string(),
        tables,
    };
    Ok(serde_json::to_vec_pretty(&snapshot)?)
}

/// Rebuilds a database from [export]ed JSON.
///
/// # Errors
/// * [PersistenceError::Json] for malformed JSON or a wrong shape
/// * [PersistenceError::UnsupportedVersion] for any version other than `1.0`
/// * [PersistenceError::Invalid] when a table or row breaks the storage rules
pub fn import(bytes: &[u8]) -> Result<Database, PersistenceError> {
    let snapshot: Snapshot = serde_json::from_slice(bytes)?;
    if snapshot.format_version != FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion(snapshot.format_version));
    }

    let mut db = Database::with_name(snapshot.database_name);
    for (key, table) in snapshot.tables {
        if key != table.name {
            return Err(PersistenceError::Invalid(format!(
                "table stored under '{key}' is named '{}'",
                table.name
            )));
        }
        db.create_table(table.name.clone(), table.schema)
            .map_err(|e| PersistenceError::Invalid(e.to_string()))?;
        for (i, row) in table.data.into_iter().enumerate() {
            db.insert_row(&table.name, row).map_err(|e| {
                PersistenceError::Invalid(format!("table '{}', row {i}: {e}", table.name))
            })?;
        }
    }
    Ok(db)
}

pub fn save(db: &Database, path: &Path) -> Result<(), PersistenceError> {
    let bytes = export(db)?;
    fs::write(path, bytes)?;
    let stats = db.stats();
    info!(
        path = %path.display(),
        tables = stats.table_count,
        rows = stats.total_rows,
        "exported database"
    );
    Ok(())
}

pub fn load(path: &Path) -> Result<Database, PersistenceError> {
    let bytes = fs::read(path)?;
    let db = import(&bytes)?;
    let stats = db.stats();
    info!(
        path = %path.display(),
        tables = stats.table_count,
        rows = stats.total_rows,
        "imported database"
    );
    Ok(db)
}
