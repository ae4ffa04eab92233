//! MySQL identifier and literal escaping.
//!
//! [`Escape`] is the escaping half of a connection: the default method bodies
//! implement MySQL quoting rules, so most drivers only override them when the
//! server needs something different.
//!
//! - Identifiers are wrapped in backticks, embedded backticks are doubled.
//! - Strings are single-quoted with backslash escapes.
//! - Arrays become comma separated lists (nested arrays become `(..)` groups).
//! - Objects become `` `key` = value `` assignment lists, which is what makes
//!   `INSERT INTO t SET :record` work.

use crate::param::Params;
use serde_json::Value;
use std::sync::{Arc, OnceLock};

/// Escaping functions a connection exposes to the compiler.
pub trait Escape {
    /// Quote a single identifier part (no dot splitting).
    fn escape_identifier(&self, name: &str) -> String {
        escape_id(name)
    }

    /// Render a value as a SQL literal.
    fn escape_literal(&self, value: &Value) -> String {
        escape_value(value)
    }
}

/// Plain MySQL escaping rules, usable without a connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlEscape;

impl Escape for MysqlEscape {}

impl<T: Escape + ?Sized> Escape for &T {
    fn escape_identifier(&self, name: &str) -> String {
        (**self).escape_identifier(name)
    }

    fn escape_literal(&self, value: &Value) -> String {
        (**self).escape_literal(value)
    }
}

impl<T: Escape + ?Sized> Escape for Arc<T> {
    fn escape_identifier(&self, name: &str) -> String {
        (**self).escape_identifier(name)
    }

    fn escape_literal(&self, value: &Value) -> String {
        (**self).escape_literal(value)
    }
}

/// Quote an identifier with backticks.
pub fn escape_id(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('`');
    for ch in name.chars() {
        if ch == '`' {
            out.push_str("``");
        } else {
            out.push(ch);
        }
    }
    out.push('`');
    out
}

/// Render a JSON value as a MySQL literal.
pub fn escape_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, false);
    out
}

fn write_value(out: &mut String, value: &Value, nested: bool) {
    match value {
        Value::Null => out.push_str("NULL"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                match item {
                    Value::Array(_) => {
                        out.push('(');
                        write_value(out, item, true);
                        out.push(')');
                    }
                    _ => write_value(out, item, true),
                }
            }
        }
        // Objects inside lists or assignments are stored as JSON text.
        Value::Object(_) if nested => write_string(out, &value.to_string()),
        Value::Object(map) => {
            for (i, (key, val)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&escape_id(key));
                out.push_str(" = ");
                write_value(out, val, true);
            }
        }
    }
}

fn write_string(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{1a}' => out.push_str("\\Z"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            c => out.push(c),
        }
    }
    out.push('\'');
}

/// Substitute `:name` placeholders with escaped literals.
///
/// Tokens without a bound value are left untouched. This is the client-side
/// formatting step for drivers that have no native named parameters.
pub fn format_named<E: Escape + ?Sized>(sql: &str, params: Option<&Params>, escaper: &E) -> String {
    let Some(params) = params else {
        return sql.to_string();
    };
    static PLACEHOLDER_RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = PLACEHOLDER_RE.get_or_init(|| {
        regex::Regex::new(r":(\w+)").expect("invalid built-in placeholder regex")
    });
    re.replace_all(sql, |caps: &regex::Captures<'_>| match params.get(&caps[1]) {
        Some(value) => escaper.escape_literal(value),
        None => caps[0].to_string(),
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_is_backticked() {
        assert_eq!(escape_id("user"), "`user`");
        assert_eq!(escape_id("we`ird"), "`we``ird`");
    }

    #[test]
    fn scalar_literals() {
        assert_eq!(escape_value(&json!(null)), "NULL");
        assert_eq!(escape_value(&json!(true)), "true");
        assert_eq!(escape_value(&json!(166)), "166");
        assert_eq!(escape_value(&json!(1.5)), "1.5");
        assert_eq!(escape_value(&json!("doge")), "'doge'");
    }

    #[test]
    fn string_escapes() {
        assert_eq!(escape_value(&json!("it's")), r"'it\'s'");
        assert_eq!(escape_value(&json!("a\nb")), r"'a\nb'");
        assert_eq!(escape_value(&json!(r"c:\x")), r"'c:\\x'");
        assert_eq!(escape_value(&json!("say \"hi\"")), r#"'say \"hi\"'"#);
    }

    #[test]
    fn arrays_and_nested_arrays() {
        assert_eq!(escape_value(&json!(["a", "b", 3])), "'a', 'b', 3");
        assert_eq!(escape_value(&json!([[1, 2], [3]])), "(1, 2), (3)");
    }

    #[test]
    fn object_becomes_assignment_list() {
        let v = json!({"user_id": "Enoch", "user_height": 180, "user_phone": null});
        assert_eq!(
            escape_value(&v),
            "`user_id` = 'Enoch', `user_height` = 180, `user_phone` = NULL"
        );
    }

    #[test]
    fn nested_object_is_json_text() {
        let v = json!({"meta": {"a": 1}});
        assert_eq!(escape_value(&v), r#"`meta` = '{\"a\":1}'"#);
    }

    #[test]
    fn format_named_replaces_known_tokens_only() {
        let mut params = Params::new();
        let p = params.bind("user_id", json!("Enoch"));
        let sql = format!("SELECT * FROM `user` WHERE `user_id` = {p} AND x = :unknown");
        assert_eq!(
            format_named(&sql, Some(&params), &MysqlEscape),
            "SELECT * FROM `user` WHERE `user_id` = 'Enoch' AND x = :unknown"
        );
    }

    #[test]
    fn format_named_without_params_is_identity() {
        assert_eq!(format_named("SELECT :a", None, &MysqlEscape), "SELECT :a");
    }
}
