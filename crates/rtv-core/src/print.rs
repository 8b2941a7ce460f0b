//! # Diagnostic Printing
//!
//! Human-readable renderings of values and typesets for error messages and
//! error paths. Output is never used for control flow.
//!
//! Strings print quoted (`"bad"`), numbers print the way a JavaScript
//! engine would (`1`, `0.5`, `NaN`, `Infinity`), and containers print as
//! compact JSON-like text.

use chrono::SecondsFormat;

use crate::typeset::Typeset;
use crate::value::Value;

/// Renders `value` for diagnostics.
pub fn print_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Renders `typeset` for diagnostics; custom validators print as
/// `"<validator>"`.
pub fn print_typeset(typeset: &Typeset) -> String {
    typeset.to_json().to_string()
}

/// Formats a number the way JavaScript's `String(n)` does for the common
/// cases: integers without a fractional part, `NaN`, `Infinity`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Undefined => out.push_str("undefined"),
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(*n)),
        Value::String(s) => write_quoted(out, s),
        Value::Array(items) => write_list(out, "[", items.iter(), "]"),
        Value::Set(items) => write_list(out, "Set[", items.iter(), "]"),
        Value::Object(obj) => {
            if let Some(class) = &obj.class {
                out.push_str(class);
            }
            out.push('{');
            for (i, (k, v)) in obj.props.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_quoted(out, k);
                out.push(':');
                write_value(out, v);
            }
            out.push('}');
        }
        Value::Map(entries) => {
            out.push_str("Map[");
            for (i, (k, v)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('[');
                write_value(out, k);
                out.push(',');
                write_value(out, v);
                out.push(']');
            }
            out.push(']');
        }
        Value::Date(d) => {
            write_quoted(out, &d.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
        Value::RegExp(re) => {
            out.push('/');
            out.push_str(re.as_str());
            out.push('/');
        }
        Value::Error(e) => {
            out.push_str(&e.name);
            out.push_str(": ");
            out.push_str(&e.message);
        }
        Value::Function(_) => out.push_str("<function>"),
    }
}

fn write_list<'v>(out: &mut String, open: &str, items: impl Iterator<Item = &'v Value>, close: &str) {
    out.push_str(open);
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(out, item);
    }
    out.push_str(close);
}

fn write_quoted(out: &mut String, s: &str) {
    // serde_json escaping matches JSON.stringify for strings
    out.push_str(&serde_json::Value::String(s.to_string()).to_string());
}
