//! Target database conventions for placeholders and identifier quoting.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// SQL dialect a statement is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// PostgreSQL: `$1, $2, ...` placeholders, `"double quoted"` identifiers.
    #[default]
    Postgres,
    /// MySQL / MariaDB: `?` placeholders, `` `backtick` `` identifiers.
    #[serde(rename = "mysql")]
    MySql,
    /// SQLite: `?` placeholders, `` `backtick` `` identifiers.
    Sqlite,
}

impl Dialect {
    /// Character used to open and close a quoted identifier.
    pub fn quote_char(self) -> char {
        match self {
            Dialect::Postgres => '"',
            Dialect::MySql | Dialect::Sqlite => '`',
        }
    }

    /// Write the placeholder for the `position`-th (1-based) bound parameter.
    pub fn write_placeholder(self, out: &mut String, position: usize) {
        match self {
            Dialect::Postgres => {
                let _ = write!(out, "${position}");
            }
            Dialect::MySql | Dialect::Sqlite => out.push('?'),
        }
    }

    /// Render the placeholder for the `position`-th (1-based) bound parameter.
    pub fn placeholder(self, position: usize) -> String {
        let mut out = String::with_capacity(4);
        self.write_placeholder(&mut out, position);
        out
    }

    /// Whether string literals treat backslash as an escape character.
    pub fn escapes_backslash(self) -> bool {
        matches!(self, Dialect::MySql)
    }

    /// Whether cancelling an in-flight query is possible for this dialect.
    pub fn supports_cancel(self) -> bool {
        matches!(self, Dialect::Postgres | Dialect::MySql)
    }
}
