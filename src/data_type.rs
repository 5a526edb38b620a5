use std::fmt;

use serde::{Deserialize, Serialize};

/// Represents the supported data types in the database schema.
/// These types define the structure of columns and the expected format of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// A 64-bit signed integer, spelled `int`.
    Int,
    /// A variable-length UTF-8 character string, spelled `str`.
    Str,
}

impl DataType {
    /// The SQL spelling used in `CREATE TABLE`.
    pub fn sql_name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Str => "str",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_name() {
        assert_eq!(DataType::Int.sql_name(), "int");
        assert_eq!(DataType::Str.to_string(), "str");
    }

    #[test]
    fn test_serde_spelling() {
        assert_eq!(serde_json::to_string(&DataType::Int).unwrap(), "\"int\"");
        let ty: DataType = serde_json::from_str("\"str\"").unwrap();
        assert_eq!(ty, DataType::Str);
    }
}
