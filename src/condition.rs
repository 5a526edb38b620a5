//! Boolean conditions used by `WHERE` and `JOIN ... ON`, and their evaluation
//! against a row.

use std::fmt;

use crate::ast::ColumnName;
use crate::error::ExecutionError;
use crate::table::Schema;
use crate::value::Value;

/// Leaf operand of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    Literal(Value),
    Column(ColumnName),
}

impl ConditionValue {
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// A column reference; `table.column` is split into qualifier and name.
    pub fn column(name: &str) -> Self {
        Self::Column(ColumnName::parse(name))
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.write_str(&value.to_sql_literal()),
            Self::Column(name) => name.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl ComparisonOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Ge => ">=",
        }
    }

    /// Applies the operator to two values of the same type.
    ///
    /// # Errors
    /// [ExecutionError::TypeMismatch] when the tags differ, whatever the operator.
    pub fn apply(self, left: &Value, right: &Value) -> Result<bool, ExecutionError> {
        let Some(ordering) = left.partial_cmp(right) else {
            return Err(ExecutionError::TypeMismatch {
                context: format!("comparison '{}'", self.as_str()),
                expected: left.data_type(),
                found: right.data_type(),
            });
        };

        Ok(match self {
            Self::Eq => ordering.is_eq(),
            Self::Ne => ordering.is_ne(),
            Self::Lt => ordering.is_lt(),
            Self::Gt => ordering.is_gt(),
            Self::Le => ordering.is_le(),
            Self::Ge => ordering.is_ge(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// A condition tree. `And`/`Or` always carry both operands and `Not` exactly
/// one, so malformed logical nodes cannot be built.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Comparison {
        left: ConditionValue,
        op: ComparisonOp,
        right: ConditionValue,
    },
    Logical {
        left: Box<Condition>,
        op: LogicalOp,
        right: Box<Condition>,
    },
    /// Only reachable through [Condition::not]; the SQL grammar has no `NOT`.
    Not(Box<Condition>),
}

impl Condition {
    pub fn compare(left: ConditionValue, op: ComparisonOp, right: ConditionValue) -> Self {
        Self::Comparison { left, op, right }
    }

    pub fn and(left: Condition, right: Condition) -> Self {
        Self::Logical {
            left: Box::new(left),
            op: LogicalOp::And,
            right: Box::new(right),
        }
    }

    pub fn or(left: Condition, right: Condition) -> Self {
        Self::Logical {
            left: Box::new(left),
            op: LogicalOp::Or,
            right: Box::new(right),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(condition: Condition) -> Self {
        Self::Not(Box::new(condition))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comparison { left, op, right } => write!(f, "{left} {} {right}", op.as_str()),
            Self::Logical { left, op, right } => {
                let op = match op {
                    LogicalOp::And => "AND",
                    LogicalOp::Or => "OR",
                };
                write!(f, "({left} {op} {right})")
            }
            Self::Not(inner) => write!(f, "NOT ({inner})"),
        }
    }
}

/// Finds the position of a column in `schema`.
///
/// The table qualifier is ignored: `b.id` resolves to the first column named
/// `id`, even when several joined tables have one. Every column lookup made by
/// condition evaluation goes through here.
pub fn resolve_column(name: &ColumnName, schema: &Schema) -> Result<usize, ExecutionError> {
    schema
        .index_of(&name.column)
        .ok_or_else(|| ExecutionError::ColumnNotFound(name.to_string()))
}

fn operand_value<'a>(
    operand: &'a ConditionValue,
    row: &'a [Value],
    schema: &Schema,
) -> Result<&'a Value, ExecutionError> {
    match operand {
        ConditionValue::Literal(value) => Ok(value),
        ConditionValue::Column(name) => {
            let idx = resolve_column(name, schema)?;
            row.get(idx)
                .ok_or_else(|| ExecutionError::ColumnNotFound(name.to_string()))
        }
    }
}

/// Evaluates a condition tree against a row laid out according to `schema`.
///
/// `AND` and `OR` short-circuit, so an error in the right operand only
/// surfaces when that operand is actually needed.
///
/// # Errors
/// * [ExecutionError::ColumnNotFound] for a column missing from `schema`
/// * [ExecutionError::TypeMismatch] when a comparison mixes `int` and `str`
pub fn evaluate(condition: &Condition, row: &[Value], schema: &Schema) -> Result<bool, ExecutionError> {
    match condition {
        Condition::Comparison { left, op, right } => {
            let left = operand_value(left, row, schema)?;
            let right = operand_value(right, row, schema)?;
            op.apply(left, right)
        }
        Condition::Logical {
            left,
            op: LogicalOp::And,
            right,
        } => Ok(evaluate(left, row, schema)? && evaluate(right, row, schema)?),
        Condition::Logical {
            left,
            op: LogicalOp::Or,
            right,
        } => Ok(evaluate(left, row, schema)? || evaluate(right, row, schema)?),
        Condition::Not(inner) => Ok(!evaluate(inner, row, schema)?),
    }
}
