//! Raw SQL statements.
//!
//! A [`RawStatement`] is a SQL template plus bindings. Compiling it resolves the
//! template's placeholders against the bindings and returns a
//! [`CompiledStatement`](crate::CompiledStatement) ready for a driver.
//!
//! # Example
//!
//! ```ignore
//! use rawsql::{raw, named};
//!
//! let stmt = raw("select ?? from users where id = ?", vec![Value::from("name"), 7.into()])
//!     .compile()?;
//! assert_eq!(stmt.sql, r#"select "name" from users where id = $1"#);
//!
//! let stmt = raw("select * from users where id = :id", named([("id", 7)])).compile()?;
//! assert_eq!(stmt.sql, "select * from users where id = $1");
//! ```

mod statement;


pub use statement::{RawStatement, TimeoutOptions};

use crate::bindings::Bindings;

/// Create a raw statement for the default (Postgres) client.
pub fn raw(template: impl Into<String>, bindings: impl Into<Bindings>) -> RawStatement {
    RawStatement::new().set(template, bindings)
}
