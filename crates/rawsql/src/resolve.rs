//! Placeholder resolution.
//!
//! Two independent grammars:
//!
//! - positional: `?` binds a value, `??` binds an identifier, `\?` and `\??`
//!   are literal text;
//! - named: `:name` binds a value, `:name:` binds an identifier, a leading
//!   backslash makes the marker literal text.
//!
//! Both write the resolved SQL and leave the bound values in the formatter.

use crate::error::{RawError, RawResult};
use crate::formatter::Formatter;
use crate::value::Value;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn positional_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\?\?\??").expect("invalid built-in positional regex"))
}

fn named_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\?:[A-Za-z0-9_]+:?").expect("invalid built-in named regex"))
}

/// Resolve `?` / `??` placeholders against `values`, consumed in order.
///
/// Every supplied value must be consumed exactly once; otherwise the result is
/// [`RawError::BindingCountMismatch`].
pub fn resolve_positional(
    template: &str,
    values: &[Value],
    formatter: &mut dyn Formatter,
) -> RawResult<String> {
    let undefined = Value::Undefined;
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    let mut consumed = 0;

    for m in positional_re().find_iter(template) {
        out.push_str(&template[last..m.start()]);
        last = m.end();

        let marker = m.as_str();
        if let Some(escaped) = marker.strip_prefix('\\') {
            out.push_str(escaped);
            continue;
        }

        let value = values.get(consumed).unwrap_or(&undefined);
        consumed += 1;

        let rendered = if marker == "??" {
            formatter.columnize(value)?
        } else {
            formatter.parameter(value)?
        };
        out.push_str(&rendered);
    }
    out.push_str(&template[last..]);

    if consumed != values.len() {
        return Err(RawError::binding_count_mismatch(values.len(), consumed));
    }
    Ok(out)
}

/// Resolve `:name` / `:name:` placeholders by key lookup in `values`.
///
/// Missing keys leave the marker in place and record [`Value::Undefined`] in the
/// formatter, so the caller's undefined-binding check rejects the statement.
/// Keys that no marker references are ignored.
pub fn resolve_named(
    template: &str,
    values: &BTreeMap<String, Value>,
    formatter: &mut dyn Formatter,
) -> RawResult<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for m in named_re().find_iter(template) {
        out.push_str(&template[last..m.start()]);
        last = m.end();

        let marker = m.as_str();
        if let Some(escaped) = marker.strip_prefix('\\') {
            out.push_str(escaped);
            continue;
        }

        // Markers always start with ':'.
        let body = &marker[1..];
        let (key, identifier) = match body.strip_suffix(':') {
            Some(key) => (key, true),
            None => (body, false),
        };

        match values.get(key) {
            None | Some(Value::Undefined) => {
                formatter.push_binding(Value::Undefined);
                out.push_str(marker);
            }
            Some(value) if identifier => out.push_str(&formatter.columnize(value)?),
            Some(value) => out.push_str(&formatter.parameter(value)?),
        }
    }
    out.push_str(&template[last..]);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::formatter::DialectFormatter;
    use crate::value::named;

    fn pg() -> DialectFormatter {
        DialectFormatter::new(Dialect::Postgres)
    }

    #[test]
    fn positional_values_and_identifiers() {
        let mut f = pg();
        let sql = resolve_positional(
            "select ?? from t where a = ?",
            &["name".into(), 5.into()],
            &mut f,
        )
        .unwrap();
        assert_eq!(sql, r#"select "name" from t where a = $1"#);
        assert_eq!(f.bindings(), &[Value::Int(5)]);
    }

    #[test]
    fn positional_escapes_are_literal() {
        let mut f = pg();
        let sql = resolve_positional(r"select \? , ?", &[5.into()], &mut f).unwrap();
        assert_eq!(sql, "select ? , $1");
        assert_eq!(f.bindings(), &[Value::Int(5)]);

        let mut f = pg();
        let sql = resolve_positional(r"select \?? , ??", &["c".into()], &mut f).unwrap();
        assert_eq!(sql, r#"select ?? , "c""#);
        assert!(f.bindings().is_empty());
    }

    #[test]
    fn positional_too_many_bindings() {
        let mut f = pg();
        let err = resolve_positional("select ?", &[1.into(), 2.into()], &mut f).unwrap_err();
        assert_eq!(err, RawError::binding_count_mismatch(2, 1));
    }

    #[test]
    fn positional_too_few_bindings() {
        let mut f = pg();
        let err = resolve_positional("select ?, ?, ?", &[1.into()], &mut f).unwrap_err();
        assert_eq!(err, RawError::binding_count_mismatch(1, 3));
    }

    #[test]
    fn positional_template_without_markers() {
        let mut f = pg();
        assert_eq!(resolve_positional("select 1", &[], &mut f).unwrap(), "select 1");
    }

    #[test]
    fn positional_triple_question_mark_is_identifier_then_value() {
        let mut f = pg();
        let sql = resolve_positional("???", &["a".into(), 1.into()], &mut f).unwrap();
        assert_eq!(sql, r#""a"$1"#);
    }

    #[test]
    fn named_values_and_identifiers() {
        let mut f = pg();
        let values = named([("id", Value::from(7)), ("col", Value::from("flag"))]);
        let sql = resolve_named(
            "select * from t where id = :id and :col: = 1",
            &values,
            &mut f,
        )
        .unwrap();
        assert_eq!(sql, r#"select * from t where id = $1 and "flag" = 1"#);
        assert_eq!(f.bindings(), &[Value::Int(7)]);
    }

    #[test]
    fn named_missing_key_is_left_in_place() {
        let mut f = pg();
        let sql = resolve_named("where x = :missing", &BTreeMap::new(), &mut f).unwrap();
        assert_eq!(sql, "where x = :missing");
        assert_eq!(f.bindings(), &[Value::Undefined]);
    }

    #[test]
    fn named_explicit_undefined_counts_as_missing() {
        let mut f = pg();
        let values = named([("a", Value::Undefined)]);
        let sql = resolve_named("x = :a:", &values, &mut f).unwrap();
        assert_eq!(sql, "x = :a:");
        assert_eq!(f.bindings(), &[Value::Undefined]);
    }

    #[test]
    fn named_escape_strips_backslash() {
        let mut f = pg();
        let values = named([("id", 1)]);
        let sql = resolve_named(r"select '\:id', \:id: , :id", &values, &mut f).unwrap();
        assert_eq!(sql, "select ':id', :id: , $1");
        assert_eq!(f.bindings(), &[Value::Int(1)]);
    }

    #[test]
    fn named_reuse_binds_each_occurrence() {
        let mut f = pg();
        let values = named([("v", 3)]);
        let sql = resolve_named("a = :v or b = :v", &values, &mut f).unwrap();
        assert_eq!(sql, "a = $1 or b = $2");
        assert_eq!(f.bindings(), &[Value::Int(3), Value::Int(3)]);
    }

    #[test]
    fn named_extra_keys_are_ignored() {
        let mut f = pg();
        let values = named([("a", 1), ("unused", 2)]);
        assert_eq!(resolve_named("x = :a", &values, &mut f).unwrap(), "x = $1");
        assert_eq!(f.bindings().len(), 1);
    }

    #[test]
    fn named_ignores_question_marks() {
        let mut f = pg();
        let values = named([("a", 1)]);
        assert_eq!(resolve_named("x = ? and y = :a", &values, &mut f).unwrap(), "x = ? and y = $1");
    }
}
