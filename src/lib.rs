//! litmus: unit-test scaffolding for Razor components
//!
//! Reads a component class (C#) and its markup template (Razor) and emits three
//! test scenarios: default member values, non-null members after render, and
//! equality between `@ref` element attributes and their markup literals.
//!
//! # Pipeline
//! - [`parser`]: first class declaration → public property members
//! - [`markup`]: `@ref`-bound elements → attribute literals
//! - [`infer`]: literal → boolean / enum-like / integer / string
//! - [`compose`]: facts → scenarios → text
//!
//! # Quickstart (Library)
//! ```
//! let class = "public class Title { public string Text { get; set; } }";
//! let markup = r#"<Label @ref=@HeadingRef text="Hi" disabled="true" />"#;
//! let tests = litmus::generate(class, markup, "Title");
//! assert!(tests.contains("string expectedHeadingText = \"Hi\";"));
//! assert!(tests.contains("bool expectedHeadingDisabled = true;"));
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! litmus generate Title.razor.cs Title.razor
//! litmus inspect --format json
//! litmus batch --path src/Components --out-dir tests/Generated
//! ```
//!
//! # Limitations
//! Only the first class in the class text is read, and a member counts as a
//! bindable parameter when any of its attribute names contains `Parameter`.
pub mod app;
pub mod cli;
pub mod compose;
pub mod errors;
pub mod infer;
pub mod markup;
pub mod model;
pub mod parser;
pub mod utils;

pub use compose::{generate, generate_with, ComposeOptions};
