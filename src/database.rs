use std::collections::HashMap;

use tracing::{debug, info};

use crate::{
    ast::Statement,
    error::{ExecutionError, Result},
    executor::{self, ExecutionResult, QueryResult},
    parser::Parser,
    table::{ColumnDef, Row, Schema, Table},
    tokenizer::Tokenizer,
    value::Value,
};

/// The main entry point for the in-memory database engine.
/// It manages a collection of tables and orchestrates query execution.
#[derive(Debug, Clone)]
pub struct Database {
    name: String,
    /// A map of table names to their respective [Table] structures.
    tables: HashMap<String, Table>,
}

/// Table and row counts, as shown by the shell's `.stats` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseStats {
    pub table_count: usize,
    pub total_rows: usize,
    /// `(name, row count)`, sorted by name.
    pub tables: Vec<(String, usize)>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

/// A table name starts with a letter or `_` and continues with letters,
/// digits or `_`.
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl Database {
    /// Creates a new, empty database instance named `main`.
    pub fn new() -> Self {
        Self::with_name("main")
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: HashMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates a new table in the database.
    ///
    /// # Errors
    /// * [ExecutionError::InvalidTableName] when `name` is not an identifier
    /// * [ExecutionError::TableExists] when the name is taken
    /// * [ExecutionError::EmptySchema] without any column
    /// * [ExecutionError::DuplicateColumn] when two columns share a name
    pub fn create_table(&mut self, name: String, columns: Vec<ColumnDef>) -> Result<(), ExecutionError> {
        if !is_valid_table_name(&name) {
            return Err(ExecutionError::InvalidTableName(name));
        }
        if self.tables.contains_key(&name) {
            return Err(ExecutionError::TableExists(name));
        }
        if columns.is_empty() {
            return Err(ExecutionError::EmptySchema(name));
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(ExecutionError::DuplicateColumn(column.name.clone()));
            }
        }

        debug!(table = %name, columns = columns.len(), "creating table");
        let table = Table::new(name.clone(), Schema::new(columns));
        self.tables.insert(name, table);
        Ok(())
    }

    /// Removes a table from the database by its name.
    ///
    /// # Errors
    /// Returns an error if the table does not exist.
    pub fn drop_table(&mut self, name: &str) -> Result<(), ExecutionError> {
        match self.tables.remove(name) {
            Some(_) => {
                info!(table = name, "dropped table");
                Ok(())
            }
            None => Err(ExecutionError::TableNotFound(name.to_string())),
        }
    }

    /// Retrieves a reference to a table by name.
    pub fn get_table(&self, name: &str) -> Result<&Table, ExecutionError> {
        self.tables
            .get(name)
            .ok_or_else(|| ExecutionError::TableNotFound(name.to_string()))
    }

    /// Retrieves a mutable reference to a table by name.
    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut Table, ExecutionError> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| ExecutionError::TableNotFound(name.to_string()))
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Returns the names of all tables, sorted.
    pub fn list_tables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Appends a row after checking it against the table's schema.
    pub fn insert_row(&mut self, table: &str, values: Row) -> Result<(), ExecutionError> {
        self.get_table_mut(table)?.insert(values)
    }

    /// Returns copies of the rows of `table` accepted by `predicate`, in
    /// storage order.
    pub fn select_rows<P>(&self, table: &str, predicate: P) -> Result<Vec<Row>, ExecutionError>
    where
        P: FnMut(&[Value], &Schema) -> Result<bool, ExecutionError>,
    {
        self.get_table(table)?.select(predicate)
    }

    /// Applies `updates` (column name to new value) to every accepted row and
    /// returns how many rows matched. Nothing is written on error.
    pub fn update_rows<P>(
        &mut self,
        table: &str,
        predicate: P,
        updates: &HashMap<String, Value>,
    ) -> Result<usize, ExecutionError>
    where
        P: FnMut(&[Value], &Schema) -> Result<bool, ExecutionError>,
    {
        self.get_table_mut(table)?.update(predicate, updates)
    }

    /// Deletes every accepted row and returns how many were removed. Nothing
    /// is removed on error.
    pub fn delete_rows<P>(&mut self, table: &str, predicate: P) -> Result<usize, ExecutionError>
    where
        P: FnMut(&[Value], &Schema) -> Result<bool, ExecutionError>,
    {
        self.get_table_mut(table)?.delete(predicate)
    }

    /// Removes all rows of a table, keeping its schema.
    pub fn truncate_table(&mut self, table: &str) -> Result<usize, ExecutionError> {
        Ok(self.get_table_mut(table)?.clear())
    }

    pub fn stats(&self) -> DatabaseStats {
        let tables: Vec<(String, usize)> = self
            .list_tables()
            .into_iter()
            .map(|name| (name.to_string(), self.tables[name].row_count()))
            .collect();
        DatabaseStats {
            table_count: tables.len(),
            total_rows: tables.iter().map(|(_, rows)| rows).sum(),
            tables,
        }
    }

    /// Tokenizes, parses and runs a single SQL statement.
    ///
    /// # Errors
    /// Returns an error if tokenization, parsing, or execution fails.
    ///
    /// # Example
    /// ```
    /// use rowdb::{Database, ExecutionResult, Value};
    /// let mut db = Database::new();
    /// db.execute("CREATE TABLE users (id INT)").unwrap();
    /// db.execute("INSERT INTO users VALUES (1)").unwrap();
    /// let deleted = db.execute("DELETE FROM users WHERE id > 12").unwrap();
    /// assert_eq!(deleted, ExecutionResult::RowsAffected(0));
    ///
    /// let result = db.query("SELECT * FROM users").unwrap();
    /// assert_eq!(result.rows[0][0], Value::Int(1));
    /// ```
    pub fn execute(&mut self, sql: &str) -> Result<ExecutionResult> {
        let tokens = Tokenizer::new(sql).tokenize()?;
        let statement = Parser::new(tokens).parse()?;
        Ok(executor::execute(&statement, self)?)
    }

    /// Runs every statement of a script in order and collects the results.
    ///
    /// Each statement is tokenized, parsed and run before the next one is
    /// scanned. The first failure stops the script, including a lexical
    /// error; the effects of earlier statements remain.
    pub fn execute_script(&mut self, sql: &str) -> Result<Vec<ExecutionResult>> {
        let mut tokenizer = Tokenizer::new(sql);
        let mut results = Vec::new();
        while let Some(tokens) = tokenizer.next_statement() {
            for statement in Parser::new(tokens?) {
                results.push(executor::execute(&statement?, self)?);
            }
        }
        Ok(results)
    }

    /// Runs a `SELECT` without mutable access to the database.
    ///
    /// # Example
    ///
    /// ```
    /// use rowdb::{Database, Value};
    ///
    /// let mut db = Database::new();
    /// db.execute("CREATE TABLE products (name str, price int)").unwrap();
    /// db.execute("INSERT INTO products VALUES ('Laptop', 1200)").unwrap();
    /// db.execute("INSERT INTO products VALUES ('Mouse', 25)").unwrap();
    ///
    /// let result = db.query("SELECT name FROM products").unwrap();
    ///
    /// assert_eq!(result.columns, vec!["name"]);
    /// assert_eq!(result.rows.len(), 2);
    /// assert_eq!(result.rows[0][0], Value::from("Laptop"));
    /// ```
    ///
    /// # Errors
    /// Fails with [ExecutionError::NotAQuery] for any other statement kind.
    pub fn query(&self, sql: &str) -> Result<QueryResult> {
        let tokens = Tokenizer::new(sql).tokenize()?;
        match Parser::new(tokens).parse()? {
            Statement::Select(select) => Ok(executor::execute_select(&select, self)?),
            other => Err(ExecutionError::NotAQuery(other.kind()).into()),
        }
    }
}
