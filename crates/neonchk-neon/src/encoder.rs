//! # Encoder
//!
//! Renders a [`Value`] as single-line (inline) NEON. Used for display only,
//! e.g. to show the offending value of a strict-scalar violation.
//!
//! Strings are written bare when decoding the bare text would yield the same
//! string; otherwise they are double-quoted with JSON escaping, which NEON
//! double-quoted strings accept.

use crate::literal::parse_literal;
use crate::value::{Entity, Object, Scalar, Value};

/// Encode a value as inline NEON.
pub fn encode(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Scalar(s) => write_scalar(out, s),
        Value::Sequence(items) => {
            out.push('[');
            write_items(out, items.iter().map(|v| (None, v)));
            out.push(']');
        }
        Value::Mapping(map) => {
            out.push('{');
            write_items(out, map.iter().map(|(k, v)| (Some(k), v)));
            out.push('}');
        }
        Value::Object(Object::Entity(entity)) => write_entity(out, entity),
        Value::Object(Object::Chain(chain)) => {
            for entity in chain {
                write_entity(out, entity);
            }
        }
        Value::Object(Object::DateTime(dt)) => out.push_str(&dt.to_string()),
    }
}

fn write_items<'a>(out: &mut String, items: impl Iterator<Item = (Option<&'a str>, &'a Value)>) {
    for (i, (key, value)) in items.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if let Some(key) = key {
            write_key(out, key);
            out.push_str(": ");
        }
        write_value(out, value);
    }
}

fn write_entity(out: &mut String, entity: &Entity) {
    write_value(out, &entity.value);
    out.push('(');
    match entity.attributes.as_ref() {
        Value::Sequence(items) => write_items(out, items.iter().map(|v| (None, v))),
        Value::Mapping(map) => write_items(out, map.iter().map(|(k, v)| (Some(k), v))),
        other => write_value(out, other),
    }
    out.push(')');
}

fn write_scalar(out: &mut String, scalar: &Scalar) {
    match scalar {
        Scalar::Null => out.push_str("null"),
        Scalar::Bool(true) => out.push_str("true"),
        Scalar::Bool(false) => out.push_str("false"),
        Scalar::Int(n) => out.push_str(&n.to_string()),
        Scalar::Float(f) => {
            let text = f.to_string();
            out.push_str(&text);
            if f.is_finite() && !text.contains(['.', 'e', 'E']) {
                out.push_str(".0");
            }
        }
        Scalar::String(s) => write_string(out, s),
    }
}

fn write_string(out: &mut String, s: &str) {
    if is_bare_safe(s) {
        out.push_str(s);
    } else {
        // serde_json escaping is a valid NEON double-quoted string.
        out.push_str(&serde_json::Value::String(s.to_string()).to_string());
    }
}

/// Keys keep their raw spelling when decoded, so only the character set
/// matters.
fn write_key(out: &mut String, key: &str) {
    if is_plain(key) {
        out.push_str(key);
    } else {
        write_string(out, key);
    }
}

fn is_plain(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('-')
        && s.chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '/' | '\\' | '@' | '$' | '-'))
}

/// True if `s` can be written without quotes and decode back to itself.
fn is_bare_safe(s: &str) -> bool {
    is_plain(s) && parse_literal(s) == Value::string(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;
    use crate::value::Mapping;

    #[test]
    fn scalars() {
        assert_eq!(encode(&Value::null()), "null");
        assert_eq!(encode(&Value::from(true)), "true");
        assert_eq!(encode(&Value::from(-3)), "-3");
        assert_eq!(encode(&Value::from(2.0)), "2.0");
        assert_eq!(encode(&Value::from(0.25)), "0.25");
    }

    #[test]
    fn strings_are_quoted_only_when_needed() {
        assert_eq!(encode(&Value::string("hello")), "hello");
        assert_eq!(encode(&Value::string("a.b/c")), "a.b/c");
        assert_eq!(encode(&Value::string("yes")), "\"yes\"");
        assert_eq!(encode(&Value::string("42")), "\"42\"");
        assert_eq!(encode(&Value::string("two words")), "\"two words\"");
        assert_eq!(encode(&Value::string("")), "\"\"");
        assert_eq!(encode(&Value::string("line\nbreak")), "\"line\\nbreak\"");
    }

    #[test]
    fn collections() {
        let mut map = Mapping::new();
        map.insert("a", Value::from(1));
        map.insert("b", Value::Sequence(vec![Value::string("x"), Value::null()]));
        assert_eq!(encode(&Value::Mapping(map)), "{a: 1, b: [x, null]}");
        assert_eq!(encode(&Value::Mapping(Mapping::new())), "{}");
    }

    #[test]
    fn entities_and_datetimes_use_decoder_spelling() {
        let decoded = decode("- Foo(bar, size: 2)\n- now()\n- 2024-01-15 12:30:00").unwrap();
        let items = decoded.as_sequence().unwrap();
        assert_eq!(encode(&items[0]), "Foo(0: bar, size: 2)");
        assert_eq!(encode(&items[1]), "now()");
        assert_eq!(encode(&items[2]), "2024-01-15 12:30:00");
    }

    #[test]
    fn encoded_inline_values_decode_back() {
        let src = "{name: \"yes\", list: [1, 2.5, null], nested: {deep: \"a b\"}}";
        let value = decode(src).unwrap();
        assert_eq!(decode(&encode(&value)).unwrap(), value);
    }
}
