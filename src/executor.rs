//! Runs parsed statements against a [Database].
//!
//! Reads go through [execute_select], which never needs mutable access.
//! Joins are nested loops: every combination of one row from the base table
//! and one from each joined table is concatenated, and kept when all `ON`
//! conditions accept it. Each `ON` condition sees the full concatenated
//! schema, so it may name any table of the statement. `WHERE` filters the
//! joined rows afterwards.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::ast::{ColumnName, ColumnsSelect, Delete, Expr, Insert, Select, Statement, Update};
use crate::condition::{Condition, evaluate};
use crate::database::Database;
use crate::error::ExecutionError;
use crate::table::{Row, Schema};
use crate::value::Value;

/// Represents the result of a successful `SELECT` query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryResult {
    /// The names of the columns included in the result set.
    pub columns: Vec<String>,
    /// The actual data, returned as a vector of rows, where each row is a vector of [Value].
    pub rows: Vec<Row>,
}

/// Outcome of one executed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// `SELECT`
    Rows(QueryResult),
    /// `INSERT`, `UPDATE` and `DELETE`
    RowsAffected(usize),
    /// `CREATE TABLE`
    Success,
}

/// Executes one statement.
///
/// # Errors
/// Any [ExecutionError]; a failed statement leaves the database as it was.
pub fn execute(statement: &Statement, db: &mut Database) -> Result<ExecutionResult, ExecutionError> {
    debug!(kind = statement.kind(), table = statement.table(), "executing statement");

    match statement {
        Statement::CreateTable(create) => {
            db.create_table(create.name.clone(), create.columns.clone())?;
            Ok(ExecutionResult::Success)
        }
        Statement::Insert(insert) => execute_insert(insert, db),
        Statement::Select(select) => Ok(ExecutionResult::Rows(execute_select(select, db)?)),
        Statement::Update(update) => execute_update(update, db),
        Statement::Delete(delete) => execute_delete(delete, db),
    }
}

/// Value of an expression evaluated without a row: only literals qualify.
fn literal_value(expr: &Expr) -> Result<Value, ExecutionError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Column(name) => Err(ExecutionError::ColumnWithoutRow(name.to_string())),
    }
}

fn matches_where(
    where_clause: Option<&Condition>,
    row: &[Value],
    schema: &Schema,
) -> Result<bool, ExecutionError> {
    match where_clause {
        Some(condition) => evaluate(condition, row, schema),
        None => Ok(true),
    }
}

/// Puts values given with an explicit column list back into schema order.
/// Every column must be named exactly once.
fn reorder_insert_values(
    schema: &Schema,
    columns: &[String],
    values: Vec<Value>,
) -> Result<Row, ExecutionError> {
    if columns.len() != values.len() {
        return Err(ExecutionError::ArityMismatch {
            expected: columns.len(),
            found: values.len(),
        });
    }

    let mut provided: HashMap<&str, Value> = HashMap::with_capacity(columns.len());
    for (name, value) in columns.iter().zip(values) {
        if schema.index_of(name).is_none() {
            return Err(ExecutionError::ColumnNotFound(name.clone()));
        }
        if provided.insert(name.as_str(), value).is_some() {
            return Err(ExecutionError::DuplicateInsertColumn(name.clone()));
        }
    }

    schema
        .columns
        .iter()
        .map(|column| {
            provided
                .remove(column.name.as_str())
                .ok_or_else(|| ExecutionError::MissingInsertColumn(column.name.clone()))
        })
        .collect()
}

fn execute_insert(insert: &Insert, db: &mut Database) -> Result<ExecutionResult, ExecutionError> {
    let values = insert
        .values
        .iter()
        .map(literal_value)
        .collect::<Result<Vec<_>, _>>()?;

    let row = match &insert.columns {
        None => values,
        Some(columns) => {
            let table = db.get_table(&insert.table)?;
            reorder_insert_values(&table.schema, columns, values)?
        }
    };

    db.insert_row(&insert.table, row)?;
    Ok(ExecutionResult::RowsAffected(1))
}

/// Evaluates a SET list in source order, checking every value against its
/// column. A column may be assigned only once.
fn resolve_assignments(
    assignments: &[(String, Expr)],
    schema: &Schema,
) -> Result<HashMap<String, Value>, ExecutionError> {
    let mut updates = HashMap::with_capacity(assignments.len());
    for (name, expr) in assignments {
        let value = literal_value(expr)?;
        let column = schema
            .columns
            .iter()
            .find(|c| c.name == *name)
            .ok_or_else(|| ExecutionError::ColumnNotFound(name.clone()))?;
        if column.data_type != value.data_type() {
            return Err(ExecutionError::TypeMismatch {
                context: format!("column '{name}'"),
                expected: column.data_type,
                found: value.data_type(),
            });
        }
        if updates.insert(name.clone(), value).is_some() {
            return Err(ExecutionError::DuplicateAssignment(name.clone()));
        }
    }
    Ok(updates)
}

fn execute_update(update: &Update, db: &mut Database) -> Result<ExecutionResult, ExecutionError> {
    let schema = &db.get_table(&update.table)?.schema;
    let updates = resolve_assignments(&update.assignments, schema)?;

    let where_clause = update.where_clause.as_ref();
    let count = db.update_rows(
        &update.table,
        |row, schema| matches_where(where_clause, row, schema),
        &updates,
    )?;
    debug!(table = %update.table, rows = count, "updated rows");
    Ok(ExecutionResult::RowsAffected(count))
}

fn execute_delete(delete: &Delete, db: &mut Database) -> Result<ExecutionResult, ExecutionError> {
    let where_clause = delete.where_clause.as_ref();
    let count = db.delete_rows(&delete.table, |row, schema| {
        matches_where(where_clause, row, schema)
    })?;
    debug!(table = %delete.table, rows = count, "deleted rows");
    Ok(ExecutionResult::RowsAffected(count))
}

/// Column positions and display names of a projection.
struct Projection {
    names: Vec<String>,
    indices: Vec<usize>,
}

impl Projection {
    fn apply(&self, rows: Vec<Row>) -> Vec<Row> {
        rows.into_iter()
            .map(|row| self.indices.iter().map(|&idx| row[idx].clone()).collect())
            .collect()
    }
}

/// Projection over a single table. A qualifier, when given, must name that table.
fn project_single(select: &Select, schema: &Schema) -> Result<Projection, ExecutionError> {
    match &select.columns {
        ColumnsSelect::Star => Ok(Projection {
            names: schema.names(),
            indices: (0..schema.len()).collect(),
        }),
        ColumnsSelect::Columns(columns) => {
            let mut projection = Projection {
                names: Vec::with_capacity(columns.len()),
                indices: Vec::with_capacity(columns.len()),
            };
            for name in columns {
                let idx = match &name.table {
                    Some(table) if *table != select.table => None,
                    _ => schema.index_of(&name.column),
                }
                .ok_or_else(|| ExecutionError::ColumnNotFound(name.to_string()))?;
                projection.names.push(name.to_string());
                projection.indices.push(idx);
            }
            Ok(projection)
        }
    }
}

/// Projection over joined rows. `origins[i]` is the table column `i` came from.
/// A qualified name must match table and column; a bare name takes the first
/// column with that name.
fn project_joined(
    columns: &ColumnsSelect,
    schema: &Schema,
    origins: &[&str],
) -> Result<Projection, ExecutionError> {
    match columns {
        ColumnsSelect::Star => Ok(Projection {
            names: schema
                .columns
                .iter()
                .zip(origins)
                .map(|(column, table)| format!("{table}.{}", column.name))
                .collect(),
            indices: (0..schema.len()).collect(),
        }),
        ColumnsSelect::Columns(columns) => {
            let mut projection = Projection {
                names: Vec::with_capacity(columns.len()),
                indices: Vec::with_capacity(columns.len()),
            };
            for name in columns {
                let idx = find_joined_column(name, schema, origins)
                    .ok_or_else(|| ExecutionError::ColumnNotFound(name.to_string()))?;
                projection.names.push(name.to_string());
                projection.indices.push(idx);
            }
            Ok(projection)
        }
    }
}

fn find_joined_column(name: &ColumnName, schema: &Schema, origins: &[&str]) -> Option<usize> {
    schema
        .columns
        .iter()
        .zip(origins)
        .position(|(column, table)| {
            column.name == name.column && name.table.as_deref().is_none_or(|t| t == *table)
        })
}

/// Nested-loop `INNER JOIN`: every combination of one row per table,
/// concatenated in table order, kept when all `on` conditions accept it.
/// Conditions see the whole concatenated `schema`.
fn nested_loop_join(
    tables: &[&[Row]],
    schema: &Schema,
    on: &[&Condition],
) -> Result<Vec<Row>, ExecutionError> {
    let mut joined = Vec::new();
    let mut row = Vec::with_capacity(schema.len());
    join_rows(tables, schema, on, &mut row, &mut joined)?;
    trace!(
        tables = tables.len(),
        candidates = tables.iter().map(|rows| rows.len()).product::<usize>(),
        matched = joined.len(),
        "nested-loop join"
    );
    Ok(joined)
}

fn join_rows(
    tables: &[&[Row]],
    schema: &Schema,
    on: &[&Condition],
    row: &mut Row,
    joined: &mut Vec<Row>,
) -> Result<(), ExecutionError> {
    let Some((rows, rest)) = tables.split_first() else {
        for condition in on {
            if !evaluate(condition, row, schema)? {
                return Ok(());
            }
        }
        joined.push(row.clone());
        return Ok(());
    };

    let prefix = row.len();
    for candidate in *rows {
        row.extend(candidate.iter().cloned());
        join_rows(rest, schema, on, row, joined)?;
        row.truncate(prefix);
    }
    Ok(())
}

/// Executes a `SELECT`, including any joins.
///
/// Without joins the result columns are named as written (`*` expands to
/// the bare column names). With joins, `*` expands to `table.column` names.
pub fn execute_select(select: &Select, db: &Database) -> Result<QueryResult, ExecutionError> {
    let base = db.get_table(&select.table)?;
    let where_clause = select.where_clause.as_ref();

    if select.joins.is_empty() {
        let projection = project_single(select, &base.schema)?;
        let rows = db.select_rows(&select.table, |row, schema| {
            matches_where(where_clause, row, schema)
        })?;
        return Ok(QueryResult {
            columns: projection.names.clone(),
            rows: projection.apply(rows),
        });
    }

    let mut schema = base.schema.clone();
    let mut origins: Vec<&str> = vec![base.name.as_str(); base.schema.len()];
    let mut tables: Vec<&[Row]> = vec![base.rows()];
    for join in &select.joins {
        let right = db.get_table(&join.table)?;
        schema.columns.extend(right.schema.columns.iter().cloned());
        origins.extend(std::iter::repeat_n(right.name.as_str(), right.schema.len()));
        tables.push(right.rows());
    }

    let on: Vec<&Condition> = select.joins.iter().map(|join| &join.on).collect();
    let rows = nested_loop_join(&tables, &schema, &on)?;

    let projection = project_joined(&select.columns, &schema, &origins)?;

    let mut filtered = Vec::with_capacity(rows.len());
    for row in rows {
        if matches_where(where_clause, &row, &schema)? {
            filtered.push(row);
        }
    }

    Ok(QueryResult {
        columns: projection.names.clone(),
        rows: projection.apply(filtered),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_type::DataType;
    use crate::error::Error;
    use proptest::prelude::*;

    fn run(db: &mut Database, sql: &str) -> ExecutionResult {
        db.execute(sql).unwrap()
    }

    fn query(db: &Database, sql: &str) -> QueryResult {
        db.query(sql).unwrap()
    }

    fn exec_err(db: &mut Database, sql: &str) -> ExecutionError {
        match db.execute(sql) {
            Err(Error::Execution(err)) => err,
            other => panic!("Expected execution error, got {other:?}"),
        }
    }

    fn ints(rows: &[Row], col: usize) -> Vec<i64> {
        rows.iter().map(|r| r[col].as_int().unwrap()).collect()
    }

    fn users_db() -> Database {
        let mut db = Database::new();
        run(&mut db, "CREATE TABLE users (id int, name str, age int)");
        run(&mut db, "INSERT INTO users VALUES (1, 'Alice', 30)");
        run(&mut db, "INSERT INTO users VALUES (2, 'Bob', 25)");
        run(&mut db, "INSERT INTO users VALUES (3, 'Carol', 35)");
        db
    }

    fn orders_db() -> Database {
        let mut db = users_db();
        run(&mut db, "CREATE TABLE orders (order_id int, user_id int, amount int)");
        run(&mut db, "INSERT INTO orders VALUES (10, 1, 250)");
        run(&mut db, "INSERT INTO orders VALUES (11, 3, 75)");
        run(&mut db, "INSERT INTO orders VALUES (12, 1, 40)");
        run(&mut db, "INSERT INTO orders VALUES (13, 9, 500)");
        db
    }

    // ─────────────────────────────────────────────────────────────
    // Test 1 : CREATE / INSERT / SELECT round trip
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_create_insert_select() {
        let mut db = Database::new();
        assert_eq!(
            run(&mut db, "CREATE TABLE users (id int, name str)"),
            ExecutionResult::Success
        );
        assert_eq!(
            run(&mut db, "INSERT INTO users VALUES (1, 'Alice')"),
            ExecutionResult::RowsAffected(1)
        );

        let result = query(&db, "SELECT * FROM users");
        assert_eq!(result.columns, ["id", "name"]);
        assert_eq!(result.rows, vec![vec![Value::Int(1), Value::from("Alice")]]);
    }

    #[test]
    fn test_select_where_and_projection() {
        let db = users_db();
        let result = query(&db, "SELECT name, users.age FROM users WHERE age >= 30");
        assert_eq!(result.columns, ["name", "users.age"]);
        assert_eq!(
            result.rows,
            vec![
                vec![Value::from("Alice"), Value::Int(30)],
                vec![Value::from("Carol"), Value::Int(35)],
            ]
        );
    }

    #[test]
    fn test_select_precedence_and_parentheses() {
        let db = users_db();
        let result = query(&db, "SELECT id FROM users WHERE id = 1 OR id = 2 AND age > 30");
        assert_eq!(ints(&result.rows, 0), [1]);

        let result = query(&db, "SELECT id FROM users WHERE (id = 1 OR id = 2) AND age < 30");
        assert_eq!(ints(&result.rows, 0), [2]);
    }

    #[test]
    fn test_select_errors() {
        let mut db = users_db();
        assert_eq!(
            exec_err(&mut db, "SELECT email FROM users"),
            ExecutionError::ColumnNotFound("email".into())
        );
        assert_eq!(
            exec_err(&mut db, "SELECT other.id FROM users"),
            ExecutionError::ColumnNotFound("other.id".into())
        );
        assert!(matches!(
            exec_err(&mut db, "SELECT * FROM users WHERE name = 1"),
            ExecutionError::TypeMismatch { .. }
        ));
        assert_eq!(
            exec_err(&mut db, "SELECT * FROM nope"),
            ExecutionError::TableNotFound("nope".into())
        );
    }

    #[test]
    fn test_unknown_projection_fails_on_empty_table() {
        let mut db = Database::new();
        run(&mut db, "CREATE TABLE t (id int)");
        assert_eq!(
            exec_err(&mut db, "SELECT missing FROM t"),
            ExecutionError::ColumnNotFound("missing".into())
        );
    }

    // ─────────────────────────────────────────────────────────────
    // Test 2 : INSERT
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_insert_errors_leave_table_unchanged() {
        let mut db = users_db();
        assert!(matches!(
            exec_err(&mut db, "INSERT INTO users VALUES (4, 'Dan')"),
            ExecutionError::ArityMismatch { .. }
        ));
        assert!(matches!(
            exec_err(&mut db, "INSERT INTO users VALUES ('4', 'Dan', 20)"),
            ExecutionError::TypeMismatch { .. }
        ));
        assert_eq!(
            exec_err(&mut db, "INSERT INTO users VALUES (id, 'Dan', 20)"),
            ExecutionError::ColumnWithoutRow("id".into())
        );
        assert_eq!(db.get_table("users").unwrap().row_count(), 3);
    }

    #[test]
    fn test_insert_with_column_list_reorders() {
        let mut db = users_db();
        run(&mut db, "INSERT INTO users (age, id, name) VALUES (41, 4, 'Dan')");
        let result = query(&db, "SELECT * FROM users WHERE id = 4");
        assert_eq!(
            result.rows,
            vec![vec![Value::Int(4), Value::from("Dan"), Value::Int(41)]]
        );
    }

    #[test]
    fn test_insert_column_list_errors() {
        let mut db = users_db();
        assert_eq!(
            exec_err(&mut db, "INSERT INTO users (id, name) VALUES (4, 'Dan')"),
            ExecutionError::MissingInsertColumn("age".into())
        );
        assert_eq!(
            exec_err(&mut db, "INSERT INTO users (id, id, age) VALUES (4, 5, 6)"),
            ExecutionError::DuplicateInsertColumn("id".into())
        );
        assert_eq!(
            exec_err(&mut db, "INSERT INTO users (id, name, email) VALUES (4, 'D', 'x')"),
            ExecutionError::ColumnNotFound("email".into())
        );
        assert!(matches!(
            exec_err(&mut db, "INSERT INTO users (id, name, age) VALUES (4, 'D')"),
            ExecutionError::ArityMismatch { expected: 3, found: 2 }
        ));
        assert_eq!(db.get_table("users").unwrap().row_count(), 3);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 3 : UPDATE / DELETE
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_update_where() {
        let mut db = users_db();
        assert_eq!(
            run(&mut db, "UPDATE users SET age = 26, name = 'Bobby' WHERE id = 2"),
            ExecutionResult::RowsAffected(1)
        );
        let result = query(&db, "SELECT name, age FROM users WHERE id = 2");
        assert_eq!(result.rows, vec![vec![Value::from("Bobby"), Value::Int(26)]]);
    }

    #[test]
    fn test_update_without_where_touches_every_row() {
        let mut db = users_db();
        assert_eq!(
            run(&mut db, "UPDATE users SET age = 0"),
            ExecutionResult::RowsAffected(3)
        );
        assert_eq!(ints(&query(&db, "SELECT age FROM users").rows, 0), [0, 0, 0]);
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let mut db = users_db();
        assert!(matches!(
            exec_err(&mut db, "UPDATE users SET age = 1, name = 2"),
            ExecutionError::TypeMismatch { .. }
        ));
        assert_eq!(
            exec_err(&mut db, "UPDATE users SET salary = 1"),
            ExecutionError::ColumnNotFound("salary".into())
        );
        assert!(matches!(
            exec_err(&mut db, "UPDATE users SET age = 1 WHERE name > 3"),
            ExecutionError::TypeMismatch { .. }
        ));
        assert_eq!(
            exec_err(&mut db, "UPDATE users SET age = id"),
            ExecutionError::ColumnWithoutRow("id".into())
        );
        assert_eq!(ints(&query(&db, "SELECT age FROM users").rows, 0), [30, 25, 35]);
    }

    #[test]
    fn test_update_checks_every_assignment_in_order() {
        let mut db = users_db();
        assert_eq!(
            exec_err(&mut db, "UPDATE users SET age = 'x', age = 5"),
            ExecutionError::TypeMismatch {
                context: "column 'age'".into(),
                expected: DataType::Int,
                found: DataType::Str,
            }
        );
        assert_eq!(
            exec_err(&mut db, "UPDATE users SET age = 1, name = 2, id = 'x'"),
            ExecutionError::TypeMismatch {
                context: "column 'name'".into(),
                expected: DataType::Str,
                found: DataType::Int,
            }
        );
        assert_eq!(
            exec_err(&mut db, "UPDATE users SET age = 1, age = 2 WHERE id = 1"),
            ExecutionError::DuplicateAssignment("age".into())
        );
        assert_eq!(ints(&query(&db, "SELECT age FROM users").rows, 0), [30, 25, 35]);
    }

    #[test]
    fn test_delete_preserves_order() {
        let mut db = users_db();
        run(&mut db, "INSERT INTO users VALUES (4, 'Dan', 50)");
        assert_eq!(
            run(&mut db, "DELETE FROM users WHERE id = 1 OR id = 3"),
            ExecutionResult::RowsAffected(2)
        );
        assert_eq!(ints(&query(&db, "SELECT id FROM users").rows, 0), [2, 4]);

        assert_eq!(run(&mut db, "DELETE FROM users"), ExecutionResult::RowsAffected(2));
        assert!(query(&db, "SELECT * FROM users").rows.is_empty());
    }

    #[test]
    fn test_delete_type_error_deletes_nothing() {
        let mut db = users_db();
        assert!(matches!(
            exec_err(&mut db, "DELETE FROM users WHERE name = 5"),
            ExecutionError::TypeMismatch { .. }
        ));
        assert_eq!(db.get_table("users").unwrap().row_count(), 3);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 4 : INNER JOIN
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_inner_join() {
        let db = orders_db();
        let result = query(
            &db,
            "SELECT users.name, orders.amount FROM users \
             INNER JOIN orders ON users.id = orders.user_id",
        );
        assert_eq!(result.columns, ["users.name", "orders.amount"]);
        assert_eq!(
            result.rows,
            vec![
                vec![Value::from("Alice"), Value::Int(250)],
                vec![Value::from("Alice"), Value::Int(40)],
                vec![Value::from("Carol"), Value::Int(75)],
            ]
        );
    }

    #[test]
    fn test_join_with_where() {
        let db = orders_db();
        let result = query(
            &db,
            "SELECT name, order_id FROM users INNER JOIN orders ON id = user_id \
             WHERE amount > 50 AND name = 'Alice'",
        );
        assert_eq!(result.rows, vec![vec![Value::from("Alice"), Value::Int(10)]]);
    }

    #[test]
    fn test_join_star_uses_qualified_names() {
        let db = orders_db();
        let result = query(
            &db,
            "SELECT * FROM users INNER JOIN orders ON users.id = orders.user_id WHERE order_id = 11",
        );
        assert_eq!(
            result.columns,
            [
                "users.id",
                "users.name",
                "users.age",
                "orders.order_id",
                "orders.user_id",
                "orders.amount"
            ]
        );
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.rows[0].len(), 6);
    }

    #[test]
    fn test_chained_joins() {
        let mut db = orders_db();
        run(&mut db, "CREATE TABLE items (item_order int, sku str)");
        run(&mut db, "INSERT INTO items VALUES (10, 'pen')");
        run(&mut db, "INSERT INTO items VALUES (10, 'ink')");
        run(&mut db, "INSERT INTO items VALUES (11, 'pad')");

        let result = query(
            &db,
            "SELECT name, sku FROM users \
             INNER JOIN orders ON users.id = orders.user_id \
             INNER JOIN items ON orders.order_id = items.item_order",
        );
        assert_eq!(
            result.rows,
            vec![
                vec![Value::from("Alice"), Value::from("pen")],
                vec![Value::from("Alice"), Value::from("ink")],
                vec![Value::from("Carol"), Value::from("pad")],
            ]
        );
    }

    #[test]
    fn test_on_condition_sees_every_joined_table() {
        let mut db = orders_db();
        run(&mut db, "CREATE TABLE items (item_order int, sku str)");
        run(&mut db, "INSERT INTO items VALUES (10, 'pen')");
        run(&mut db, "INSERT INTO items VALUES (11, 'pad')");

        let result = query(
            &db,
            "SELECT name, sku FROM users \
             INNER JOIN orders ON orders.order_id = items.item_order \
             INNER JOIN items ON users.id = orders.user_id",
        );
        assert_eq!(
            result.rows,
            vec![
                vec![Value::from("Alice"), Value::from("pen")],
                vec![Value::from("Carol"), Value::from("pad")],
            ]
        );
    }

    #[test]
    fn test_join_errors() {
        let mut db = orders_db();
        assert_eq!(
            exec_err(&mut db, "SELECT * FROM users INNER JOIN ghosts ON id = id"),
            ExecutionError::TableNotFound("ghosts".into())
        );
        assert_eq!(
            exec_err(
                &mut db,
                "SELECT * FROM users INNER JOIN orders ON users.id = orders.customer"
            ),
            ExecutionError::ColumnNotFound("orders.customer".into())
        );
        assert_eq!(
            exec_err(
                &mut db,
                "SELECT users.amount FROM users INNER JOIN orders ON id = user_id"
            ),
            ExecutionError::ColumnNotFound("users.amount".into())
        );
    }

    #[test]
    fn test_shared_column_name_resolves_to_first_table() {
        let mut db = Database::new();
        run(&mut db, "CREATE TABLE a (id int, v int)");
        run(&mut db, "CREATE TABLE b (id int, w int)");
        run(&mut db, "INSERT INTO a VALUES (1, 10)");
        run(&mut db, "INSERT INTO a VALUES (2, 20)");
        run(&mut db, "INSERT INTO b VALUES (2, 200)");
        run(&mut db, "INSERT INTO b VALUES (3, 300)");

        // `b.id` in a condition reads a.id, so `a.id = b.id` holds for every pair.
        let result = query(&db, "SELECT a.id, b.id FROM a INNER JOIN b ON a.id = b.id");
        assert_eq!(result.rows.len(), 4);

        // Projection does honor the qualifier.
        assert_eq!(ints(&result.rows, 1), [2, 3, 2, 3]);
        assert_eq!(ints(&result.rows, 0), [1, 1, 2, 2]);
    }

    proptest! {
        #[test]
        fn test_always_true_join_is_cross_product(left in 0usize..6, right in 0usize..6) {
            let mut db = Database::new();
            run(&mut db, "CREATE TABLE l (x int)");
            run(&mut db, "CREATE TABLE r (y int)");
            for i in 0..left {
                run(&mut db, &format!("INSERT INTO l VALUES ({i})"));
            }
            for i in 0..right {
                run(&mut db, &format!("INSERT INTO r VALUES ({i})"));
            }

            let result = query(&db, "SELECT * FROM l INNER JOIN r ON l.x = l.x");
            prop_assert_eq!(result.rows.len(), left * right);
        }
    }
}
