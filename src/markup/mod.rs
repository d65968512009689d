//! Razor markup scanning for `@ref`-bound elements.
//!
//! A small hand-written tag scanner rather than a regex over raw text, so
//! quoted values may contain `>`, tags may span lines and self-closing tags
//! terminate correctly. HTML comments, Razor comments and closing tags are
//! skipped.
use crate::infer::ValueInferencer;
use crate::model::{AttributeAssignment, MarkupElement, RefAssertion};

/// Anything that can list the ref-bound elements of a markup template.
pub trait MarkupScanner {
    fn scan(&self, text: &str) -> Vec<MarkupElement>;
}

/// Attribute that binds an element's rendered instance to a field.
pub const REF_ATTRIBUTE: &str = "@ref";

// Any spelling of this key (sigil trimmed, any case) never becomes an assertion.
const REF_KEY: &str = "ref";

#[derive(Debug, Default, Clone, Copy)]
pub struct RazorScanner;

impl RazorScanner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MarkupScanner for RazorScanner {
    fn scan(&self, text: &str) -> Vec<MarkupElement> {
        let chars: Vec<char> = text.chars().collect();
        let mut cursor = Cursor { chars: &chars, pos: 0 };
        let mut out = Vec::new();
        while let Some(tag) = cursor.next_open_tag() {
            if let Some(element) = tag.into_ref_element() {
                out.push(element);
            }
        }
        tracing::debug!(elements = out.len(), "scanned ref-bound elements");
        out
    }
}

/// Flatten scanned elements into inferred `(reference, key, value)` facts,
/// preserving element and attribute order.
#[must_use]
pub fn harvest(elements: &[MarkupElement], inferencer: &ValueInferencer) -> Vec<RefAssertion> {
    elements
        .iter()
        .flat_map(|el| {
            el.attributes.iter().map(|attr| RefAssertion {
                reference: el.reference.clone(),
                key: attr.key.clone(),
                value: inferencer.infer_attribute(attr),
            })
        })
        .collect()
}

#[derive(Debug)]
struct RawValue {
    text: String,
    expression: bool,
}

#[derive(Debug)]
struct RawTag {
    name: String,
    attributes: Vec<(String, Option<RawValue>)>,
}

impl RawTag {
    fn into_ref_element(self) -> Option<MarkupElement> {
        let (ref_idx, reference) =
            self.attributes.iter().enumerate().find_map(|(i, (name, value))| {
                if name != REF_ATTRIBUTE {
                    return None;
                }
                let ident = value.as_ref()?.text.trim().strip_prefix('@')?;
                is_identifier(ident).then(|| (i, ident.to_string()))
            })?;
        let attributes = self
            .attributes
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != ref_idx)
            .filter_map(|(_, (name, value))| {
                let key = name.trim_start_matches('@');
                let raw = value?;
                if key.is_empty() || key.eq_ignore_ascii_case(REF_KEY) {
                    return None;
                }
                Some(AttributeAssignment {
                    key: key.to_string(),
                    raw_value: raw.text.trim_start_matches('@').to_string(),
                    is_expression: raw.expression,
                })
            })
            .collect();
        Some(MarkupElement { tag: self.name, reference, attributes })
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c == '_' || c.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

fn is_tag_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | ':' | '-')
}

struct Cursor<'a> {
    chars: &'a [char],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.peek_at(i) == Some(c))
    }

    /// Move just past the next occurrence of `end`, or to end of input.
    fn skip_past(&mut self, end: &str) {
        while self.pos < self.chars.len() {
            if self.starts_with(end) {
                self.pos += end.chars().count();
                return;
            }
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn next_open_tag(&mut self) -> Option<RawTag> {
        while self.pos < self.chars.len() {
            if self.starts_with("@*") {
                self.skip_past("*@");
            } else if self.starts_with("<!--") {
                self.skip_past("-->");
            } else if self.peek() == Some('<')
                && self.peek_at(1).is_some_and(|c| c == '_' || c.is_alphabetic())
            {
                if let Some(tag) = self.open_tag() {
                    return Some(tag);
                }
            } else {
                self.pos += 1;
            }
        }
        None
    }

    /// Parse an opening tag at `<`. `None` when it is cut short.
    fn open_tag(&mut self) -> Option<RawTag> {
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(is_tag_name_char) {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        let mut attributes = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek()? {
                '>' => {
                    self.pos += 1;
                    return Some(RawTag { name, attributes });
                }
                '/' if self.peek_at(1) == Some('>') => {
                    self.pos += 2;
                    return Some(RawTag { name, attributes });
                }
                // a new tag began before this one closed
                '<' => return None,
                q @ ('"' | '\'') => {
                    self.quoted(q)?;
                }
                _ => {
                    let attr = self.attribute()?;
                    attributes.push(attr);
                }
            }
        }
    }

    fn attribute(&mut self) -> Option<(String, Option<RawValue>)> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            let ends = c.is_whitespace()
                || matches!(c, '=' | '>' | '"' | '\'' | '<')
                || (c == '/' && self.peek_at(1) == Some('>'));
            if ends {
                break;
            }
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        if name.is_empty() {
            // lone `=`
            self.pos += 1;
            return Some((name, None));
        }
        let before_eq = self.pos;
        self.skip_whitespace();
        if self.peek() != Some('=') {
            self.pos = before_eq;
            return Some((name, None));
        }
        self.pos += 1;
        self.skip_whitespace();
        let text = match self.peek()? {
            q @ ('"' | '\'') => self.quoted(q)?,
            _ => self.bare(),
        };
        let expression = text.trim_start().starts_with("@(");
        Some((name, Some(RawValue { text, expression })))
    }

    /// Content of a quoted run starting at its opening quote.
    fn quoted(&mut self, quote: char) -> Option<String> {
        self.pos += 1;
        let start = self.pos;
        while self.peek()? != quote {
            self.pos += 1;
        }
        let value = self.chars[start..self.pos].iter().collect();
        self.pos += 1;
        Some(value)
    }

    /// Unquoted value: an `@( ... )` expression or a run up to whitespace/`>`.
    fn bare(&mut self) -> String {
        let start = self.pos;
        if self.starts_with("@(") {
            let mut depth = 0usize;
            while let Some(c) = self.peek() {
                self.pos += 1;
                match c {
                    '(' => depth += 1,
                    ')' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }
        while let Some(c) = self.peek() {
            if c.is_whitespace() || c == '>' || (c == '/' && self.peek_at(1) == Some('>')) {
                break;
            }
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValueKind;

    fn scan(text: &str) -> Vec<MarkupElement> {
        RazorScanner::new().scan(text)
    }

    fn pairs(el: &MarkupElement) -> Vec<(&str, &str)> {
        el.attributes.iter().map(|a| (a.key.as_str(), a.raw_value.as_str())).collect()
    }

    #[test]
    fn test_ref_bound_element_with_mixed_quoting() {
        let els = scan(r#"<Label @ref=@TitleRef text="Hi" size='3' Color=@Color.Red disabled>Hello</Label>"#);
        assert_eq!(els.len(), 1);
        assert_eq!(els[0].tag, "Label");
        assert_eq!(els[0].reference, "TitleRef");
        assert_eq!(pairs(&els[0]), vec![("text", "Hi"), ("size", "3"), ("Color", "Color.Red")]);
    }

    #[test]
    fn test_elements_without_ref_are_ignored() {
        let els = scan(r#"<div class="x"><span id="y">a</span></div>"#);
        assert!(els.is_empty());
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_ref_value_requires_sigil_and_identifier() {
        assert!(scan(r#"<Foo @ref="Plain" a="1">"#).is_empty());
        assert!(scan(r#"<Foo @ref=@1bad a="1">"#).is_empty());
        let quoted = scan(r#"<Foo @ref="@Quoted" a="1">"#);
        assert_eq!(quoted[0].reference, "Quoted");
    }

    #[test]
    fn test_multiline_self_closing_and_gt_inside_quotes() {
        let text = r#"
            <MudButton
                @ref=@SaveRef
                Title="a > b"
                Variant="@Variant.Filled" />
            <Input @ref=@FieldRef Value=@(x > 1 ? "y" : "n")/>
        "#;
        let els = scan(text);
        assert_eq!(els.len(), 2);
        assert_eq!(els[0].reference, "SaveRef");
        assert_eq!(pairs(&els[0]), vec![("Title", "a > b"), ("Variant", "Variant.Filled")]);
        assert_eq!(els[1].reference, "FieldRef");
        assert_eq!(pairs(&els[1]), vec![("Value", r#"(x > 1 ? "y" : "n")"#)]);
    }

    #[test]
    fn test_comments_are_skipped() {
        let text = r#"
            <!-- <Old @ref=@OldRef a="1"> -->
            @* <Older @ref=@OlderRef b="2"> *@
            <New @ref=@NewRef c="3">
        "#;
        let refs: Vec<String> = scan(text).into_iter().map(|e| e.reference).collect();
        assert_eq!(refs, vec!["NewRef"]);
    }

    #[test]
    fn test_unterminated_tag_is_dropped() {
        assert!(scan(r#"<Foo @ref=@FooRef a="1""#).is_empty());
        assert!(scan(r#"<Foo @ref=@FooRef a="1"#).is_empty());
    }

    #[test]
    fn test_document_order_and_sigil_stripped_keys() {
        let text = r#"<A @ref=@ARef @onclick="@Go" x="1"></A><B y="2" @ref=@BRef>"#;
        let els = scan(text);
        let refs: Vec<&str> = els.iter().map(|e| e.reference.as_str()).collect();
        assert_eq!(refs, vec!["ARef", "BRef"]);
        assert_eq!(pairs(&els[0]), vec![("onclick", "Go"), ("x", "1")]);
        assert_eq!(pairs(&els[1]), vec![("y", "2")]);
    }

    #[test]
    fn test_other_ref_spellings_are_not_attributes() {
        let els = scan(r#"<Foo @ref=@FooRef ref="x" @Ref=@Other REF="y" a="1">"#);
        assert_eq!(els.len(), 1);
        assert_eq!(els[0].reference, "FooRef");
        assert_eq!(pairs(&els[0]), vec![("a", "1")]);
    }

    #[test]
    fn test_only_explicit_expressions_are_flagged() {
        let els = scan(r#"<Foo @ref=@FooRef a=@(n + 1) b="@(Count)" c="(optional)" d=@Name>"#);
        let flags: Vec<(&str, bool)> =
            els[0].attributes.iter().map(|a| (a.key.as_str(), a.is_expression)).collect();
        assert_eq!(flags, vec![("a", true), ("b", true), ("c", false), ("d", false)]);
    }

    #[test]
    fn test_harvest_keeps_parenthesised_text_as_string() {
        let els = scan(r#"<Label @ref=@TitleRef text="(optional)" size=@(Width * 2)>"#);
        let facts = harvest(&els, &ValueInferencer::new());
        assert_eq!(facts[0].value.kind, ValueKind::String);
        assert_eq!(facts[0].value.literal, "\"(optional)\"");
        assert_eq!(facts[1].value.kind, ValueKind::Unknown);
        assert_eq!(facts[1].value.literal, "(Width * 2)");
    }

    #[test]
    fn test_harvest_infers_in_scan_order() {
        let els = scan(r#"<Label @ref=@TitleRef text="Hi" disabled="true">"#);
        let facts = harvest(&els, &ValueInferencer::new());
        let got: Vec<(&str, &str, &ValueKind)> =
            facts.iter().map(|f| (f.reference.as_str(), f.key.as_str(), &f.value.kind)).collect();
        assert_eq!(
            got,
            vec![
                ("TitleRef", "text", &ValueKind::String),
                ("TitleRef", "disabled", &ValueKind::Boolean),
            ]
        );
    }
}
