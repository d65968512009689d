//! Data model shared by the extraction, inference and composition stages.
//!
//! Everything here is built fresh for a single `generate` call and never
//! mutated afterwards; the types derive `Serialize` so the CLI can dump any
//! intermediate stage as JSON.
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Other,
}

/// One property-like member of the component class.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MemberDescriptor {
    pub name: String,
    pub visibility: Visibility,
    pub is_bindable_parameter: bool,
    pub order: usize,
}

impl MemberDescriptor {
    /// Public and not supplied by the owner: the members the scenarios assert on.
    #[must_use]
    pub fn is_observable(&self) -> bool {
        self.visibility == Visibility::Public && !self.is_bindable_parameter
    }
}

/// The first class declaration found in the class text.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct SourceClass {
    pub name: String,
    pub members: Vec<MemberDescriptor>,
}

impl SourceClass {
    /// Public, non-parameter members in declaration order.
    pub fn observable_members(&self) -> impl Iterator<Item = &MemberDescriptor> {
        self.members.iter().filter(|m| m.is_observable())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AttributeAssignment {
    pub key: String,
    pub raw_value: String,
    /// The value was written as an explicit `@( ... )` Razor expression.
    pub is_expression: bool,
}

/// An opening tag that captures its rendered instance through `@ref`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MarkupElement {
    pub tag: String,
    pub reference: String,
    pub attributes: Vec<AttributeAssignment>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueKind {
    Boolean,
    /// `type_name` is `None` when no plausible type prefix could be extracted.
    EnumLike { type_name: Option<String> },
    Integer,
    String,
    Unknown,
}

/// Placeholder emitted in place of an enum type that could not be inferred.
pub const UNKNOWN_ENUM_TYPE: &str = "/* UnknownEnumType */";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InferredValue {
    #[serde(flatten)]
    pub kind: ValueKind,
    pub literal: String,
}

impl InferredValue {
    /// Type name used in the expected-value declaration.
    #[must_use]
    pub fn type_hint(&self) -> &str {
        match &self.kind {
            ValueKind::Boolean => "bool",
            ValueKind::EnumLike { type_name: Some(t) } => t,
            ValueKind::EnumLike { type_name: None } => UNKNOWN_ENUM_TYPE,
            ValueKind::Integer => "int",
            ValueKind::String => "string",
            ValueKind::Unknown => "var",
        }
    }
}

/// One harvested `(reference, key, value)` fact from the markup.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RefAssertion {
    pub reference: String,
    pub key: String,
    pub value: InferredValue,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    DefaultValues,
    RenderNonNull,
    RenderWithRefAttributes,
}

/// One generated test unit.
///
/// `setup` holds arrange lines, `action` the construct/render step and
/// `assertions` the checks, each in emission order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TestScenario {
    pub kind: ScenarioKind,
    pub name: String,
    pub setup: Vec<String>,
    pub action: Vec<String>,
    pub assertions: Vec<String>,
}
