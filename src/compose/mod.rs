//! Test scenario composition and the `generate` entry point.
//!
//! Three scenarios are always produced, in this order:
//! 1. default values of a freshly constructed instance,
//! 2. non-null members after rendering,
//! 3. `@ref` element attributes equal to their markup literals.
//!
//! Each scenario is built as a standalone value and the text is assembled
//! only at the end.
use crate::errors::ExtractError;
use crate::infer::ValueInferencer;
use crate::markup::{harvest, MarkupScanner, RazorScanner};
use crate::model::{MarkupElement, RefAssertion, ScenarioKind, SourceClass, TestScenario};
use crate::parser::{CSharpParser, MemberExtractor, DEFAULT_PARAMETER_MARKER};
use serde::Serialize;

/// Line substituted for member assertions when the class text has no class.
pub const CLASS_NOT_FOUND_PLACEHOLDER: &str = "// Could not find class declaration.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Attribute line placed above every test method.
    pub test_marker: String,
    /// Spaces per indentation level inside a test body.
    pub indent: usize,
    /// Attribute-name substring that marks a bindable parameter.
    pub parameter_marker: String,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            test_marker: "[Fact]".to_string(),
            indent: 4,
            parameter_marker: DEFAULT_PARAMETER_MARKER.to_string(),
        }
    }
}

/// Intermediate results of one run, before composition.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub class: Option<SourceClass>,
    pub elements: Vec<MarkupElement>,
    pub facts: Vec<RefAssertion>,
}

impl Analysis {
    /// Extract members and harvest ref attributes from the two inputs.
    #[must_use]
    pub fn run(options: &ComposeOptions, class_text: &str, markup_text: &str) -> Self {
        let parser = CSharpParser::with_parameter_marker(options.parameter_marker.clone());
        let class = match parser.parse_members(class_text) {
            Ok(class) => Some(class),
            Err(ExtractError::ClassNotFound) => {
                tracing::warn!("no class declaration found in class text");
                None
            }
        };
        let elements = RazorScanner::new().scan(markup_text);
        let facts = harvest(&elements, &ValueInferencer::new());
        Self { class, elements, facts }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScenarioComposer {
    options: ComposeOptions,
}

impl ScenarioComposer {
    #[must_use]
    pub fn new(options: ComposeOptions) -> Self {
        Self { options }
    }

    /// Build the three scenarios for `component`.
    #[must_use]
    pub fn compose(
        &self,
        class: Option<&SourceClass>,
        component: &str,
        facts: &[RefAssertion],
    ) -> Vec<TestScenario> {
        let rendered = format!("this.rendered{component}");
        let render = format!("{rendered} = RenderComponent<{component}>();");
        let initial = format!("initial{component}");

        let defaults = TestScenario {
            kind: ScenarioKind::DefaultValues,
            name: "ShouldInitializeDefaultComponentValues".to_string(),
            setup: Vec::new(),
            action: vec![format!("var {initial} = new {component}();")],
            assertions: member_lines(class, |name| format!("{initial}.{name}.Should().BeNull();")),
        };

        let non_null = TestScenario {
            kind: ScenarioKind::RenderNonNull,
            name: format!("ShouldRender{component}OnInitialized"),
            setup: Vec::new(),
            action: vec![render.clone()],
            assertions: member_lines(class, |name| {
                format!("{rendered}.Instance.{name}.Should().NotBeNull();")
            }),
        };

        let declarations = facts
            .iter()
            .map(|f| {
                let var = expected_var_name(&f.reference, &f.key);
                format!("{} {var} = {};", f.value.type_hint(), f.value.literal)
            })
            .collect();
        let checks = facts
            .iter()
            .map(|f| {
                let var = expected_var_name(&f.reference, &f.key);
                format!("{rendered}.Instance.{}.{}.Should().Be({var});", f.reference, f.key)
            })
            .collect();
        let with_refs = TestScenario {
            kind: ScenarioKind::RenderWithRefAttributes,
            name: format!("ShouldRender{component}WithStyles"),
            setup: declarations,
            action: vec![render],
            assertions: checks,
        };

        tracing::debug!(
            component,
            ref_assertions = facts.len(),
            "composed test scenarios"
        );
        vec![defaults, non_null, with_refs]
    }

    /// Render scenarios as test source, separated by blank lines.
    #[must_use]
    pub fn render(&self, scenarios: &[TestScenario]) -> String {
        scenarios.iter().map(|s| self.render_one(s)).collect::<Vec<_>>().join("\n")
    }

    fn render_one(&self, scenario: &TestScenario) -> String {
        let pad = " ".repeat(self.options.indent);
        let block = |lines: &[String]| -> String {
            lines.iter().map(|l| format!("{pad}{l}\n")).collect()
        };
        let arrange_act = match scenario.kind {
            ScenarioKind::DefaultValues | ScenarioKind::RenderNonNull => {
                format!("{pad}// given . when\n{}", block(&scenario.action))
            }
            ScenarioKind::RenderWithRefAttributes => format!(
                "{pad}// given\n{}\n{pad}// when\n{}",
                block(&scenario.setup),
                block(&scenario.action)
            ),
        };
        format!(
            "{marker}\npublic void {name}()\n{{\n{arrange_act}\n{pad}// then\n{asserts}}}\n",
            marker = self.options.test_marker,
            name = scenario.name,
            asserts = block(&scenario.assertions),
        )
    }
}

/// One line per observable member, or the not-found placeholder.
fn member_lines(class: Option<&SourceClass>, line: impl Fn(&str) -> String) -> Vec<String> {
    match class {
        Some(class) => class.observable_members().map(|m| line(&m.name)).collect(),
        None => vec![CLASS_NOT_FOUND_PLACEHOLDER.to_string()],
    }
}

/// Convert `data-id` / `aria_label` style keys to `DataId` / `AriaLabel`.
#[must_use]
pub fn to_pascal_case(input: &str) -> String {
    input
        .split(['-', '_'])
        .filter(|p| !p.is_empty())
        .map(|p| {
            let mut chars = p.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// `expected` + reference without a trailing `Ref` + PascalCase key.
#[must_use]
pub fn expected_var_name(reference: &str, key: &str) -> String {
    let cleaned = reference.strip_suffix("Ref").unwrap_or(reference);
    format!("expected{cleaned}{}", to_pascal_case(key))
}

/// Generate test source for a component from its class and markup text.
#[must_use]
pub fn generate(class_text: &str, markup_text: &str, component_name: &str) -> String {
    generate_with(&ComposeOptions::default(), class_text, markup_text, component_name)
}

/// `generate` with explicit options.
#[must_use]
pub fn generate_with(
    options: &ComposeOptions,
    class_text: &str,
    markup_text: &str,
    component_name: &str,
) -> String {
    let analysis = Analysis::run(options, class_text, markup_text);
    let composer = ScenarioComposer::new(options.clone());
    let scenarios = composer.compose(analysis.class.as_ref(), component_name, &analysis.facts);
    composer.render(&scenarios)
}
