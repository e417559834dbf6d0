//! Change operations handed to the external runner.

use std::fmt;

/// One schema change produced by a migration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// A SQL statement (or batch) to execute verbatim.
    Sql(String),
}

impl Operation {
    pub fn sql(statement: impl Into<String>) -> Self {
        Operation::Sql(statement.into())
    }

    pub fn as_sql(&self) -> &str {
        match self {
            Operation::Sql(sql) => sql,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}
