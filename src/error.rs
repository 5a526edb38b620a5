//! Error types for every phase of a statement: lexing, parsing, execution and persistence.

use thiserror::Error;

use crate::data_type::DataType;
use crate::tokenizer::Token;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error returned by the public entry points.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Lex error: {0}")]
    Lex(#[from] LexError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// A failure while turning source text into tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at line {line}, column {column}")]
pub struct LexError {
    pub message: String,
    /// Byte offset into the source text.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

/// A grammar violation, positioned at the offending token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at line {line}, column {column}")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn at(message: impl Into<String>, token: &Token) -> Self {
        Self {
            message: message.into(),
            offset: token.offset,
            line: token.line,
            column: token.column,
        }
    }

    /// "expected X, found Y" at the given token.
    pub fn unexpected(expected: &str, token: &Token) -> Self {
        Self::at(format!("expected {expected}, found {}", token.kind), token)
    }
}

/// Semantic failures raised while running a statement against storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("table '{0}' does not exist")]
    TableNotFound(String),

    #[error("table '{0}' already exists")]
    TableExists(String),

    #[error("invalid table name '{0}'")]
    InvalidTableName(String),

    #[error("table '{0}' must have at least one column")]
    EmptySchema(String),

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: DataType,
        found: DataType,
    },

    #[error("row has {found} values, but table has {expected} columns")]
    ArityMismatch { expected: usize, found: usize },

    #[error("column reference '{0}' cannot be evaluated without a row")]
    ColumnWithoutRow(String),

    #[error("column '{0}' listed more than once")]
    DuplicateInsertColumn(String),

    #[error("missing value for column '{0}'")]
    MissingInsertColumn(String),

    #[error("column '{0}' assigned more than once")]
    DuplicateAssignment(String),

    #[error("{0} is not a query")]
    NotAQuery(&'static str),
}

/// Failures of the JSON snapshot codec.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported format version '{0}'")]
    UnsupportedVersion(String),

    #[error("invalid snapshot: {0}")]
    Invalid(String),
}
