//! Primitive type inference for raw markup attribute literals.
//!
//! Classification is a naming heuristic, not a type check: the first matching
//! rule wins, in the order boolean, enum-like, integer, string. Explicit
//! Razor expressions are recognised by the scanner, not from the text.
use crate::model::{AttributeAssignment, InferredValue, ValueKind};
use regex::Regex;

#[derive(Debug)]
pub struct InferencePatterns {
    pub integer: Regex,
    pub type_prefix: Regex,
}

impl InferencePatterns {
    /// # Panics
    /// Never in practice: the patterns are fixed and known to compile.
    #[must_use]
    pub fn compile() -> Self {
        let integer = Regex::new(r"^[+-]?[0-9]+$").expect("integer pattern");
        let type_prefix = Regex::new(r"^[A-Z][A-Za-z0-9_]*$").expect("type prefix pattern");
        Self { integer, type_prefix }
    }
}

impl Default for InferencePatterns {
    fn default() -> Self {
        Self::compile()
    }
}

#[derive(Debug, Default)]
pub struct ValueInferencer {
    patterns: InferencePatterns,
}

impl ValueInferencer {
    #[must_use]
    pub fn new() -> Self {
        Self { patterns: InferencePatterns::compile() }
    }

    /// Classify one raw attribute value (sigil already stripped).
    #[must_use]
    pub fn infer(&self, raw: &str) -> InferredValue {
        if raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("false") {
            return InferredValue { kind: ValueKind::Boolean, literal: raw.to_ascii_lowercase() };
        }
        if raw.contains('.') && raw.chars().next().is_some_and(char::is_uppercase) {
            return InferredValue {
                kind: ValueKind::EnumLike { type_name: self.enum_type(raw) },
                literal: raw.to_string(),
            };
        }
        let trimmed = raw.trim();
        if self.patterns.integer.is_match(trimmed) {
            return InferredValue { kind: ValueKind::Integer, literal: trimmed.to_string() };
        }
        InferredValue { kind: ValueKind::String, literal: quote(raw) }
    }

    /// Classify a scanned attribute. Explicit `@( ... )` expressions are kept
    /// verbatim as `Unknown`; everything else goes through [`Self::infer`].
    #[must_use]
    pub fn infer_attribute(&self, attr: &AttributeAssignment) -> InferredValue {
        if attr.is_expression {
            let literal = attr.raw_value.trim().to_string();
            return InferredValue { kind: ValueKind::Unknown, literal };
        }
        self.infer(&attr.raw_value)
    }

    /// Segment before the first `.`, when it looks like a type name.
    fn enum_type(&self, raw: &str) -> Option<String> {
        let prefix = raw.split('.').next()?;
        self.patterns.type_prefix.is_match(prefix).then(|| prefix.to_string())
    }
}

fn quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for c in raw.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
