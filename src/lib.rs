//! An in-memory SQL engine: tokenizer, recursive-descent parser, condition
//! evaluator and an executor with nested-loop `INNER JOIN`.
//!
//! ```
//! use rowdb::{Database, Value};
//!
//! let mut db = Database::new();
//! db.execute_script(
//!     "CREATE TABLE t (id int, name str);
//!      INSERT INTO t VALUES (1, 'Alice');",
//! )
//! .unwrap();
//!
//! let result = db.query("SELECT name FROM t WHERE id = 1").unwrap();
//! assert_eq!(result.rows, vec![vec![Value::from("Alice")]]);
//! ```

pub mod ast;
pub mod condition;
pub mod data_type;
pub mod database;
pub mod error;
pub mod executor;
pub mod parser;
pub mod persistence;
pub mod render;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use data_type::DataType;
pub use database::Database;
pub use error::{Error, ExecutionError, LexError, ParseError, PersistenceError, Result};
pub use executor::{ExecutionResult, QueryResult};
pub use table::{ColumnDef, Row, Schema, Table};
pub use value::Value;
