//! The compiled form of a raw statement, handed to the execution layer.

use crate::value::Value;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tokio_postgres::types::ToSql;
use uuid::Uuid;

/// Kind of statement that produced a [`CompiledStatement`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// A raw template.
    Raw,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Raw => "raw",
        }
    }
}

/// A fully resolved statement.
///
/// `sql` contains no unresolved placeholders of the template grammar; its
/// dialect placeholders (`$1`, `?`) line up with `bindings` by position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledStatement {
    pub method: Method,
    pub sql: String,
    pub bindings: Vec<Value>,
    pub options: BTreeMap<String, serde_json::Value>,
    /// Execution timeout hint; serialized in milliseconds.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_millis"
    )]
    pub timeout: Option<Duration>,
    /// Cancel the query server-side when `timeout` elapses.
    #[serde(skip_serializing_if = "is_false")]
    pub cancel_on_timeout: bool,
    /// Fresh per compile; correlates and cancels in-flight executions.
    pub uid: Uuid,
}

impl CompiledStatement {
    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.bindings
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect()
    }

    /// Look up a merged option.
    pub fn option(&self, key: &str) -> Option<&serde_json::Value> {
        self.options.get(key)
    }
}

impl fmt::Display for CompiledStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

fn serialize_millis<S: Serializer>(timeout: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
    match timeout {
        Some(d) => s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
        None => s.serialize_none(),
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}
