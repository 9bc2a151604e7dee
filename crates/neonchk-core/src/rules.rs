//! # Rule Parsing
//!
//! Two rule forms are accepted on the command line:
//!
//! - key rule `a:b:c`: the key-path `["a", "b", "c"]` must not exist;
//! - value rule `a:b:c:literal`: the path must not hold that value.
//!
//! Segments are taken verbatim; there is no escaping, so a key containing
//! `:` cannot be expressed. The literal after the last `:` is decoded with
//! the NEON unquoted-literal grammar (`yes` is `true`, `42` is an integer).
//!
//! Value-rule fragments are assembled structurally as nested single-key
//! mappings. No NEON text is synthesized and re-parsed, so segments that
//! happen to contain NEON syntax cannot change the shape of the fragment.

use std::fmt;

use neonchk_neon::{parse_literal, Value};

use crate::error::RuleSpecError;

/// A non-empty sequence of non-empty key segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Build a path from segments, rejecting an empty path or empty segment.
    pub fn new(segments: Vec<String>) -> Result<Self, RuleSpecError> {
        if segments.is_empty() {
            return Err(RuleSpecError::EmptyPath);
        }
        if segments.iter().any(String::is_empty) {
            return Err(RuleSpecError::EmptySegment(segments.join(":")));
        }
        Ok(Self(segments))
    }

    /// The segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments (always at least one).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the path has no segments, which a constructed path never has.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(":"))
    }
}

/// A key-path together with the value it must not hold.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRule {
    /// Where the value lives.
    pub path: KeyPath,
    /// Nested single-key mappings along `path`, ending in the literal.
    pub fragment: Value,
    /// The rule as written, used in reports.
    pub spec: String,
}

/// Parse `a:b:c` into a key-path.
pub fn parse_key_rule(spec: &str) -> Result<KeyPath, RuleSpecError> {
    if spec.is_empty() {
        return Err(RuleSpecError::EmptyPath);
    }
    KeyPath::new(spec.split(':').map(str::to_string).collect())
        .map_err(|_| RuleSpecError::EmptySegment(spec.to_string()))
}

/// Parse `a:b:c:literal` into a value rule.
///
/// Everything before the final `:` is the path; the remainder, trimmed, is
/// the literal.
pub fn parse_value_rule(spec: &str) -> Result<ValueRule, RuleSpecError> {
    let (path_text, literal) = spec
        .rsplit_once(':')
        .ok_or_else(|| RuleSpecError::MissingPath(spec.to_string()))?;

    let literal = literal.trim();
    if literal.is_empty() {
        return Err(RuleSpecError::MissingLiteral(spec.to_string()));
    }

    let path = parse_key_rule(path_text)
        .map_err(|_| RuleSpecError::EmptySegment(spec.to_string()))?;

    let fragment = path
        .segments()
        .iter()
        .rev()
        .fold(parse_literal(literal), |inner, segment| {
            Value::single(segment.clone(), inner)
        });

    Ok(ValueRule {
        path,
        fragment,
        spec: spec.to_string(),
    })
}

/// The full set of rules for one rule-check run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    /// Key-paths that must not exist.
    pub keys: Vec<KeyPath>,
    /// Path/value combinations that must not exist.
    pub values: Vec<ValueRule>,
}

impl RuleSet {
    /// Parse both rule lists. Any malformed rule rejects the whole set, as
    /// does supplying no rules at all.
    pub fn parse<K, V>(keys: &[K], values: &[V]) -> Result<Self, RuleSpecError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if keys.is_empty() && values.is_empty() {
            return Err(RuleSpecError::NoRules);
        }
        let keys = keys
            .iter()
            .map(|k| parse_key_rule(k.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let values = values
            .iter()
            .map(|v| parse_value_rule(v.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { keys, values })
    }

    /// Total number of rules.
    pub fn len(&self) -> usize {
        self.keys.len() + self.values.len()
    }

    /// True when the set holds no rules.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
