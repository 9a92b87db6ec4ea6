//! Host values as seen by filters and expression tests.
//!
//! The surrounding template engine hands us JSON documents, so the value
//! model is [`serde_json::Value`]. Attribute lookups that find nothing yield
//! [`Value::Null`], which doubles as "undefined".

pub use serde_json::{Map, Value};

/// Named filter arguments, forwarded untouched to render tracing.
pub type Kwargs = Map<String, Value>;

/// Template truthiness: null, false, zero, and empty strings, arrays and
/// objects are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Short lowercase name of the value's type, used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Renders an argument list the way render summaries show it: `[a, b, c]`,
/// with strings unquoted.
pub fn display_args(args: &[Value]) -> String {
    let items: Vec<String> = args
        .iter()
        .map(|a| match a {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    format!("[{}]", items.join(", "))
}
