//! # rawsql
//!
//! Compile raw SQL templates into a driver-ready statement plus ordered bindings.
//!
//! ## Placeholders
//!
//! - **Positional** (`Vec`/array bindings): `?` binds a value, `??` binds an
//!   identifier; `\?` and `\??` are literal text.
//! - **Named** (map bindings): `:name` binds a value, `:name:` binds an
//!   identifier; `\:name` is literal text.
//!
//! ```ignore
//! use rawsql::{raw, named, Value};
//!
//! let stmt = raw("select ?? from users where id = ?", vec![Value::from("email"), 7.into()])
//!     .timeout(5_000, Default::default())?
//!     .compile()?;
//! assert_eq!(stmt.sql, r#"select "email" from users where id = $1"#);
//!
//! // Ready for tokio-postgres
//! let rows = client.query(&stmt.sql, &stmt.params_ref()).await?;
//! ```
//!
//! ## Dialects
//!
//! Placeholders and identifier quoting follow the statement's [`Client`]. The
//! default client targets Postgres; use [`DialectClient`] with a
//! [`ClientConfig`] for MySQL or SQLite.

pub mod bindings;
pub mod client;
pub mod compiled;
pub mod config;
pub mod dialect;
pub mod error;
pub mod formatter;
pub mod ident;
pub mod raw;
pub mod resolve;
pub mod value;

pub use bindings::Bindings;
pub use client::{Client, DialectClient};
pub use compiled::{CompiledStatement, Method};
pub use config::ClientConfig;
pub use dialect::Dialect;
pub use error::{RawError, RawResult};
pub use formatter::{DialectFormatter, Formatter, LiteralFormatter};
pub use ident::wrap_identifier;
pub use raw::{RawStatement, TimeoutOptions, raw};
pub use resolve::{resolve_named, resolve_positional};
pub use value::{Value, list, named};
