//! Binding containers accepted by [`RawStatement::set`](crate::RawStatement::set).
//!
//! The container shape is decided once, when the bindings are converted, and
//! selects the resolution algorithm at compile time:
//!
//! - sequences (`Vec`, arrays, [`Value::List`]) → positional `?` / `??`
//! - maps (`BTreeMap`, `HashMap`, JSON objects) → named `:name` / `:name:`
//! - any other single value → a one-element positional sequence
//! - `()` or [`Value::Undefined`] → no bindings

use crate::raw::RawStatement;
use crate::value::Value;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Bindings attached to a raw statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Bindings {
    /// No bindings: the template is emitted verbatim.
    #[default]
    None,
    /// A single value that bypasses substitution: the template is emitted
    /// verbatim and the value becomes the only binding.
    Scalar(Value),
    /// Values consumed in order by `?` and `??`.
    Positional(Vec<Value>),
    /// Values looked up by `:name` and `:name:`.
    Named(BTreeMap<String, Value>),
}

impl Bindings {
    /// Number of values held.
    pub fn len(&self) -> usize {
        match self {
            Bindings::None => 0,
            Bindings::Scalar(_) => 1,
            Bindings::Positional(values) => values.len(),
            Bindings::Named(values) => values.len(),
        }
    }

    /// Check if no values are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<()> for Bindings {
    fn from(_: ()) -> Self {
        Bindings::None
    }
}

impl From<Value> for Bindings {
    fn from(value: Value) -> Self {
        match value {
            Value::Undefined => Bindings::None,
            Value::List(values) => Bindings::Positional(values),
            other => Bindings::Positional(vec![other]),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Bindings {
    fn from(values: Vec<T>) -> Self {
        Bindings::Positional(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Bindings {
    fn from(values: [T; N]) -> Self {
        Bindings::Positional(values.into_iter().map(Into::into).collect())
    }
}

impl From<&[Value]> for Bindings {
    fn from(values: &[Value]) -> Self {
        Bindings::Positional(values.to_vec())
    }
}

impl<K: Into<String>, V: Into<Value>> From<BTreeMap<K, V>> for Bindings {
    fn from(values: BTreeMap<K, V>) -> Self {
        Bindings::Named(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Value>> From<HashMap<K, V>> for Bindings {
    fn from(values: HashMap<K, V>) -> Self {
        Bindings::Named(
            values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Bindings {
    fn from(values: serde_json::Map<String, serde_json::Value>) -> Self {
        Bindings::Named(
            values
                .into_iter()
                .map(|(k, v)| {
                    let v = match v {
                        serde_json::Value::Null => Value::Null,
                        serde_json::Value::Bool(b) => Value::Bool(b),
                        serde_json::Value::String(s) => Value::Text(s),
                        serde_json::Value::Number(n) => match n.as_i64() {
                            Some(i) => Value::Int(i),
                            None => n.as_f64().map_or(Value::Json(n.into()), Value::Float),
                        },
                        other => Value::Json(other),
                    };
                    (k, v)
                })
                .collect(),
        )
    }
}

macro_rules! impl_single_value_bindings {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Bindings {
                fn from(value: $ty) -> Self {
                    Bindings::from(Value::from(value))
                }
            }
        )*
    };
}

impl_single_value_bindings!(
    bool,
    i16,
    i32,
    i64,
    u32,
    f32,
    f64,
    String,
    &str,
    Uuid,
    DateTime<Utc>,
    RawStatement,
);
