//! Value and identifier rendering during resolution.
//!
//! A [`Formatter`] turns each consumed binding into SQL text and accumulates the
//! ordered list of values that end up bound to the statement. One formatter is
//! created per compile and must not be shared between compiles.

use crate::dialect::Dialect;
use crate::error::RawResult;
use crate::ident::write_identifier;
use crate::value::Value;
use std::fmt::Write as _;

/// Renders bindings as SQL text while accumulating bound values.
pub trait Formatter {
    /// The dialect this formatter renders for.
    fn dialect(&self) -> Dialect;

    /// Render `value` as a value placeholder, recording it as a binding.
    ///
    /// Nested raw statements are compiled in place with this same formatter.
    fn parameter(&mut self, value: &Value) -> RawResult<String>;

    /// Render `value` as a quoted identifier (or identifier list). Never binds.
    fn columnize(&mut self, value: &Value) -> RawResult<String>;

    /// Record a binding without rendering anything.
    fn push_binding(&mut self, value: Value);

    /// Bindings accumulated so far, in placeholder order.
    fn bindings(&self) -> &[Value];

    /// Consume the formatter, returning the accumulated bindings.
    fn into_bindings(self: Box<Self>) -> Vec<Value>;
}

/// Formatter that emits dialect placeholders (`$1` / `?`).
#[derive(Debug, Clone, Default)]
pub struct DialectFormatter {
    dialect: Dialect,
    bindings: Vec<Value>,
}

impl DialectFormatter {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            bindings: Vec::new(),
        }
    }
}

impl Formatter for DialectFormatter {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn parameter(&mut self, value: &Value) -> RawResult<String> {
        if let Value::Raw(stmt) = value {
            return stmt.resolve_into(self);
        }
        self.bindings.push(value.clone());
        Ok(self.dialect.placeholder(self.bindings.len()))
    }

    fn columnize(&mut self, value: &Value) -> RawResult<String> {
        columnize_value(self, value)
    }

    fn push_binding(&mut self, value: Value) {
        self.bindings.push(value);
    }

    fn bindings(&self) -> &[Value] {
        &self.bindings
    }

    fn into_bindings(self: Box<Self>) -> Vec<Value> {
        self.bindings
    }
}

/// Formatter that inlines values as escaped SQL literals.
///
/// Used for display rendering only; the output is not meant for execution.
#[derive(Debug, Clone, Default)]
pub struct LiteralFormatter {
    dialect: Dialect,
    bindings: Vec<Value>,
}

impl LiteralFormatter {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            bindings: Vec::new(),
        }
    }

    fn literal(&mut self, value: &Value, out: &mut String) -> RawResult<()> {
        match value {
            Value::Undefined | Value::Null => out.push_str("NULL"),
            Value::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            Value::Int(v) => {
                let _ = write!(out, "{v}");
            }
            Value::Float(v) if v.is_finite() => {
                let _ = write!(out, "{v}");
            }
            Value::Float(v) => {
                let text = if v.is_nan() {
                    "NaN"
                } else if v.is_sign_positive() {
                    "Infinity"
                } else {
                    "-Infinity"
                };
                self.quoted(text, out);
            }
            Value::Text(v) => self.quoted(v, out),
            Value::Bytes(v) => self.hex(v, out),
            Value::Json(v) => self.quoted(&v.to_string(), out),
            Value::Uuid(v) => self.quoted(&v.hyphenated().to_string(), out),
            Value::Timestamp(v) => {
                self.quoted(&v.format("%Y-%m-%d %H:%M:%S%.3f%:z").to_string(), out)
            }
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.literal(item, out)?;
                }
            }
            Value::Raw(stmt) => out.push_str(&stmt.resolve_into(self)?),
        }
        Ok(())
    }

    fn quoted(&self, text: &str, out: &mut String) {
        out.push('\'');
        for ch in text.chars() {
            match ch {
                '\'' => out.push_str("''"),
                '\\' if self.dialect.escapes_backslash() => out.push_str("\\\\"),
                _ => out.push(ch),
            }
        }
        out.push('\'');
    }

    fn hex(&self, bytes: &[u8], out: &mut String) {
        match self.dialect {
            Dialect::Postgres => out.push_str("'\\x"),
            Dialect::MySql | Dialect::Sqlite => out.push_str("X'"),
        }
        for b in bytes {
            let _ = write!(out, "{b:02x}");
        }
        out.push('\'');
    }
}

impl Formatter for LiteralFormatter {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn parameter(&mut self, value: &Value) -> RawResult<String> {
        if let Value::Raw(stmt) = value {
            return stmt.resolve_into(self);
        }
        self.bindings.push(value.clone());
        let mut out = String::new();
        self.literal(value, &mut out)?;
        Ok(out)
    }

    fn columnize(&mut self, value: &Value) -> RawResult<String> {
        columnize_value(self, value)
    }

    fn push_binding(&mut self, value: Value) {
        self.bindings.push(value);
    }

    fn bindings(&self) -> &[Value] {
        &self.bindings
    }

    fn into_bindings(self: Box<Self>) -> Vec<Value> {
        self.bindings
    }
}

fn columnize_value<F: Formatter>(formatter: &mut F, value: &Value) -> RawResult<String> {
    let dialect = formatter.dialect();
    let mut out = String::new();
    match value {
        Value::Undefined | Value::Null => {}
        Value::Text(name) => write_identifier(dialect, name, &mut out),
        Value::List(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&columnize_value(formatter, item)?);
            }
        }
        Value::Raw(stmt) => out.push_str(&stmt.resolve_into(formatter)?),
        Value::Json(serde_json::Value::String(name)) => write_identifier(dialect, name, &mut out),
        Value::Json(v) => write_identifier(dialect, &v.to_string(), &mut out),
        Value::Bool(v) => write_identifier(dialect, &v.to_string(), &mut out),
        Value::Int(v) => write_identifier(dialect, &v.to_string(), &mut out),
        Value::Float(v) => write_identifier(dialect, &v.to_string(), &mut out),
        Value::Bytes(v) => write_identifier(dialect, &String::from_utf8_lossy(v), &mut out),
        Value::Uuid(v) => write_identifier(dialect, &v.to_string(), &mut out),
        Value::Timestamp(v) => write_identifier(dialect, &v.to_rfc3339(), &mut out),
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::list;

    #[test]
    fn postgres_parameters_are_numbered_by_binding_position() {
        let mut f = DialectFormatter::new(Dialect::Postgres);
        assert_eq!(f.parameter(&Value::from(1)).unwrap(), "$1");
        assert_eq!(f.parameter(&Value::from("x")).unwrap(), "$2");
        assert_eq!(f.bindings(), &[Value::from(1), Value::from("x")]);
    }

    #[test]
    fn pushed_bindings_shift_later_placeholders() {
        let mut f = DialectFormatter::new(Dialect::Postgres);
        f.push_binding(Value::Undefined);
        assert_eq!(f.parameter(&Value::from(1)).unwrap(), "$2");
    }

    #[test]
    fn columnize_never_binds() {
        let mut f = DialectFormatter::new(Dialect::MySql);
        assert_eq!(f.columnize(&Value::from("users.id")).unwrap(), "`users`.`id`");
        assert!(f.bindings().is_empty());
    }

    #[test]
    fn columnize_list_joins_identifiers() {
        let mut f = DialectFormatter::new(Dialect::Postgres);
        let cols = list(["id", "name as n"]);
        assert_eq!(f.columnize(&cols).unwrap(), r#""id", "name" as "n""#);
    }

    #[test]
    fn list_parameter_is_a_single_binding() {
        let mut f = DialectFormatter::new(Dialect::Postgres);
        assert_eq!(f.parameter(&list([1, 2, 3])).unwrap(), "$1");
        assert_eq!(f.bindings().len(), 1);
    }

    #[test]
    fn literals_escape_quotes() {
        let mut f = LiteralFormatter::new(Dialect::Postgres);
        assert_eq!(f.parameter(&Value::from("it's")).unwrap(), "'it''s'");
        assert_eq!(f.parameter(&Value::Null).unwrap(), "NULL");
        assert_eq!(f.parameter(&Value::from(true)).unwrap(), "true");
        assert_eq!(f.parameter(&Value::from(1.5)).unwrap(), "1.5");
        assert_eq!(f.bindings().len(), 4);
    }

    #[test]
    fn mysql_literals_escape_backslash() {
        let mut f = LiteralFormatter::new(Dialect::MySql);
        assert_eq!(f.parameter(&Value::from(r"a\b")).unwrap(), r"'a\\b'");

        let mut f = LiteralFormatter::new(Dialect::Postgres);
        assert_eq!(f.parameter(&Value::from(r"a\b")).unwrap(), r"'a\b'");
    }

    #[test]
    fn byte_literals_are_hex_encoded() {
        let mut f = LiteralFormatter::new(Dialect::Postgres);
        assert_eq!(f.parameter(&Value::from(vec![0xde, 0xad])).unwrap(), r"'\xdead'");

        let mut f = LiteralFormatter::new(Dialect::Sqlite);
        assert_eq!(f.parameter(&Value::from(vec![0x01])).unwrap(), "X'01'");
    }

    #[test]
    fn non_finite_floats_are_quoted() {
        let mut f = LiteralFormatter::new(Dialect::Postgres);
        assert_eq!(f.parameter(&Value::from(f64::NAN)).unwrap(), "'NaN'");
        assert_eq!(f.parameter(&Value::from(f64::NEG_INFINITY)).unwrap(), "'-Infinity'");
    }

    #[test]
    fn list_literal_is_comma_joined() {
        let mut f = LiteralFormatter::new(Dialect::Postgres);
        assert_eq!(f.parameter(&list([1, 2])).unwrap(), "1, 2");
    }
}
