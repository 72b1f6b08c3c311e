//! Identifier wrapping for `??` and `:name:` placeholders.
//!
//! Unlike a validating parser, wrapping never fails: any text becomes a quoted
//! identifier, with the dialect's quote character escaped by doubling.
//!
//! - `users` → `"users"`
//! - `public.users` → `"public"."users"`
//! - `users.*` → `"users".*`
//! - `users.name as n` → `"users"."name" as "n"`

use crate::dialect::Dialect;

/// Wrap a (possibly dotted and aliased) identifier for `dialect`.
pub fn wrap_identifier(dialect: Dialect, name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    write_identifier(dialect, name, &mut out);
    out
}

pub(crate) fn write_identifier(dialect: Dialect, name: &str, out: &mut String) {
    let name = name.trim();
    if let Some((target, alias)) = split_alias(name) {
        write_dotted(dialect, target, out);
        out.push_str(" as ");
        write_dotted(dialect, alias, out);
        return;
    }
    write_dotted(dialect, name, out);
}

/// Split `expr as alias` on the last case-insensitive ` as `.
fn split_alias(name: &str) -> Option<(&str, &str)> {
    let lower = name.to_ascii_lowercase();
    let pos = lower.rfind(" as ")?;
    let target = name[..pos].trim_end();
    let alias = name[pos + 4..].trim_start();
    if target.is_empty() || alias.is_empty() {
        return None;
    }
    Some((target, alias))
}

fn write_dotted(dialect: Dialect, name: &str, out: &mut String) {
    for (i, part) in name.split('.').enumerate() {
        if i > 0 {
            out.push('.');
        }
        write_part(dialect, part, out);
    }
}

fn write_part(dialect: Dialect, part: &str, out: &mut String) {
    if part == "*" {
        out.push('*');
        return;
    }
    let quote = dialect.quote_char();
    out.push(quote);
    for ch in part.chars() {
        if ch == quote {
            out.push(quote);
        }
        out.push(ch);
    }
    out.push(quote);
}
