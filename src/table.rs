use std::collections::HashMap;

use bitvec::vec::BitVec;
use serde::{Deserialize, Serialize};

use crate::data_type::DataType;
use crate::error::ExecutionError;
use crate::value::Value;

/// One row, values in schema order.
pub type Row = Vec<Value>;

/// Column definition in the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered column definitions of a table, or of a joined row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    pub columns: Vec<ColumnDef>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnDef>) -> Self {
        Self { columns }
    }

    /// Position of the first column called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Checks arity, then the type of every value against its column.
    pub fn validate_row(&self, values: &[Value]) -> Result<(), ExecutionError> {
        if values.len() != self.columns.len() {
            return Err(ExecutionError::ArityMismatch {
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        for (value, column) in values.iter().zip(&self.columns) {
            if value.data_type() != column.data_type {
                return Err(ExecutionError::TypeMismatch {
                    context: format!("column '{}'", column.name),
                    expected: column.data_type,
                    found: value.data_type(),
                });
            }
        }
        Ok(())
    }
}

/// A named table holding its rows in insertion order.
///
/// Every stored row matches the schema in length and in per-column type.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub schema: Schema,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(name: String, schema: Schema) -> Self {
        Self {
            name,
            schema,
            rows: Vec::new(),
        }
    }

    /// insert a new row
    pub fn insert(&mut self, values: Row) -> Result<(), ExecutionError> {
        self.schema.validate_row(&values)?;
        self.rows.push(values);
        Ok(())
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn get_row(&self, row_idx: usize) -> Option<&Row> {
        self.rows.get(row_idx)
    }

    /// Clones out the rows accepted by `predicate`, in storage order.
    pub fn select<P>(&self, mut predicate: P) -> Result<Vec<Row>, ExecutionError>
    where
        P: FnMut(&[Value], &Schema) -> Result<bool, ExecutionError>,
    {
        let mut selected = Vec::new();
        for row in &self.rows {
            if predicate(row, &self.schema)? {
                selected.push(row.clone());
            }
        }
        Ok(selected)
    }

    /// One bit per row, set where `predicate` holds. Stops at the first error.
    fn match_mask<P>(&self, mut predicate: P) -> Result<BitVec, ExecutionError>
    where
        P: FnMut(&[Value], &Schema) -> Result<bool, ExecutionError>,
    {
        self.rows
            .iter()
            .map(|row| predicate(row, &self.schema))
            .collect()
    }

    /// Overwrites the given columns in every row accepted by `predicate`.
    ///
    /// Runs in two phases: the assignments are checked against the schema
    /// and all rows are matched first, then the matching rows are written.
    /// An error in either check leaves the table untouched.
    pub fn update<P>(
        &mut self,
        predicate: P,
        updates: &HashMap<String, Value>,
    ) -> Result<usize, ExecutionError>
    where
        P: FnMut(&[Value], &Schema) -> Result<bool, ExecutionError>,
    {
        let mut assignments = Vec::with_capacity(updates.len());
        for (name, value) in updates {
            let idx = self
                .schema
                .index_of(name)
                .ok_or_else(|| ExecutionError::ColumnNotFound(name.clone()))?;
            let column = &self.schema.columns[idx];
            if column.data_type != value.data_type() {
                return Err(ExecutionError::TypeMismatch {
                    context: format!("column '{}'", column.name),
                    expected: column.data_type,
                    found: value.data_type(),
                });
            }
            assignments.push((idx, value));
        }

        let mask = self.match_mask(predicate)?;
        for row_idx in mask.iter_ones() {
            let row = &mut self.rows[row_idx];
            for (idx, value) in &assignments {
                row[*idx] = (*value).clone();
            }
        }
        Ok(mask.count_ones())
    }

    /// Removes every row accepted by `predicate`; survivors keep their order.
    ///
    /// All rows are matched before any is removed, so an error deletes nothing.
    pub fn delete<P>(&mut self, predicate: P) -> Result<usize, ExecutionError>
    where
        P: FnMut(&[Value], &Schema) -> Result<bool, ExecutionError>,
    {
        let mask = self.match_mask(predicate)?;
        let mut doomed = mask.iter().by_vals();
        self.rows.retain(|_| !doomed.next().unwrap_or(false));
        Ok(mask.count_ones())
    }

    /// Removes all rows, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.rows.len();
        self.rows.clear();
        count
    }
}
