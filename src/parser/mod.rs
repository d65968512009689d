use crate::errors::ExtractError;
use crate::model::{MemberDescriptor, SourceClass, Visibility};
use lexer::Token;

pub mod lexer;

/// Anything that can turn class source text into a `SourceClass`.
pub trait MemberExtractor {
    /// # Errors
    /// Returns `ExtractError::ClassNotFound` when the text declares no class.
    fn parse_members(&self, text: &str) -> Result<SourceClass, ExtractError>;
}

/// Attribute-name substring that marks a bindable parameter by default.
pub const DEFAULT_PARAMETER_MARKER: &str = "Parameter";

// Header words that rule out a property declaration.
const NON_PROPERTY_KEYWORDS: &[&str] = &[
    "class",
    "struct",
    "interface",
    "enum",
    "record",
    "namespace",
    "delegate",
    "event",
    "operator",
    "where",
];

/// Token-based extractor for C# component classes.
///
/// Only the first class declaration in document order is considered; later
/// classes are ignored.
#[derive(Debug, Clone)]
pub struct CSharpParser {
    parameter_marker: String,
}

impl Default for CSharpParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CSharpParser {
    #[must_use]
    pub fn new() -> Self {
        Self { parameter_marker: DEFAULT_PARAMETER_MARKER.to_string() }
    }

    /// Use a different case-sensitive substring to detect bindable parameters.
    #[must_use]
    pub fn with_parameter_marker(marker: impl Into<String>) -> Self {
        Self { parameter_marker: marker.into() }
    }

    /// Name of the first declared class, if any.
    #[must_use]
    pub fn detect_class_name(&self, text: &str) -> Option<String> {
        let tokens = lexer::tokenize(text);
        find_first_class(&tokens).map(|(name, _)| name)
    }

    fn is_parameter_attribute(&self, name: &str) -> bool {
        name.contains(self.parameter_marker.as_str())
    }

    fn collect_members(&self, body: &[Token]) -> Vec<MemberDescriptor> {
        let mut out = Vec::new();
        let mut order = 0;
        let mut i = 0;
        while i < body.len() {
            if body[i].is_punct('}') {
                break;
            }
            if body[i].is_punct(';') {
                i += 1;
                continue;
            }
            let mut attributes = Vec::new();
            while i < body.len() && body[i].is_punct('[') {
                let end = matching(body, i, '[', ']');
                attributes.extend(attribute_names(&body[i + 1..end.min(body.len())]));
                i = end + 1;
            }
            let header_start = i.min(body.len());
            let (header_end, terminator, next) = split_member(body, header_start);
            if terminator == Terminator::EndOfBody {
                break;
            }
            i = next.max(header_start + 1);
            let header = &body[header_start..header_end];
            let Some(name) = property_name(header, terminator) else {
                continue;
            };
            let visibility = if header.iter().any(|t| t.is_ident("public")) {
                Visibility::Public
            } else {
                Visibility::Other
            };
            let is_bindable_parameter = attributes.iter().any(|a| self.is_parameter_attribute(a));
            let index = order;
            order += 1;
            if visibility != Visibility::Public {
                tracing::trace!(member = %name, "skipping non-public property");
                continue;
            }
            out.push(MemberDescriptor { name, visibility, is_bindable_parameter, order: index });
        }
        out
    }
}

impl MemberExtractor for CSharpParser {
    fn parse_members(&self, text: &str) -> Result<SourceClass, ExtractError> {
        let tokens = lexer::tokenize(text);
        let (name, body_start) = find_first_class(&tokens).ok_or(ExtractError::ClassNotFound)?;
        let members = match body_start {
            Some(start) => self.collect_members(&tokens[start..]),
            None => Vec::new(),
        };
        tracing::debug!(class = %name, members = members.len(), "extracted class members");
        Ok(SourceClass { name, members })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Semicolon,
    Block,
    Arrow,
    EndOfBody,
}

/// Locate `class <Name>` and the index just past its opening brace.
///
/// `record class` declarations are records, not classes, and are passed over.
/// The body index is `None` for brace-less declarations (`class C;`).
fn find_first_class(tokens: &[Token]) -> Option<(String, Option<usize>)> {
    let pos = (0..tokens.len().saturating_sub(1)).find(|&i| {
        tokens[i].is_ident("class")
            && !(i > 0 && tokens[i - 1].is_ident("record"))
            && matches!(&tokens[i + 1], Token::Ident(n) if !NON_PROPERTY_KEYWORDS.contains(&n.as_str()))
    })?;
    let Token::Ident(name) = &tokens[pos + 1] else {
        return None;
    };
    let mut depth = 0usize;
    let mut body = None;
    for (i, tok) in tokens.iter().enumerate().skip(pos + 2) {
        match tok {
            Token::Punct('(') => depth += 1,
            Token::Punct(')') => depth = depth.saturating_sub(1),
            Token::Punct('{') if depth == 0 => {
                body = Some(i + 1);
                break;
            }
            Token::Punct(';') if depth == 0 => break,
            _ => {}
        }
    }
    Some((name.clone(), body))
}

/// Index of the token closing the group opened at `open_idx`, or `tokens.len()`.
fn matching(tokens: &[Token], open_idx: usize, open: char, close: char) -> usize {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(open_idx) {
        if tok.is_punct(open) {
            depth += 1;
        } else if tok.is_punct(close) {
            depth -= 1;
            if depth == 0 {
                return i;
            }
        }
    }
    tokens.len()
}

/// Index just past the next `;` outside any bracket group.
fn skip_statement(tokens: &[Token], mut i: usize) -> usize {
    let mut depth = 0usize;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Punct('(' | '[' | '{') => depth += 1,
            Token::Punct(')' | ']' | '}') if depth == 0 => return i,
            Token::Punct(')' | ']' | '}') => depth -= 1,
            Token::Punct(';') if depth == 0 => return i + 1,
            _ => {}
        }
        i += 1;
    }
    tokens.len()
}

/// Split one member declaration starting at `start`.
///
/// Returns `(header_end, terminator, next_member_start)`.
fn split_member(tokens: &[Token], start: usize) -> (usize, Terminator, usize) {
    let mut depth = 0usize;
    let mut i = start;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Punct('(' | '[') => depth += 1,
            Token::Punct(')' | ']') => depth = depth.saturating_sub(1),
            Token::Punct(';') if depth == 0 => return (i, Terminator::Semicolon, i + 1),
            Token::Punct('}') if depth == 0 => return (i, Terminator::EndOfBody, i),
            Token::Arrow if depth == 0 => {
                return (i, Terminator::Arrow, skip_statement(tokens, i + 1));
            }
            Token::Punct('{') if depth == 0 => {
                let mut next = matching(tokens, i, '{', '}') + 1;
                if tokens.get(next).is_some_and(|t| t.is_punct('=')) {
                    next = skip_statement(tokens, next);
                } else if tokens.get(next).is_some_and(|t| t.is_punct(';')) {
                    next += 1;
                }
                return (i, Terminator::Block, next);
            }
            _ => {}
        }
        i += 1;
    }
    (tokens.len(), Terminator::EndOfBody, tokens.len())
}

/// The declared name when `header` introduces a property.
fn property_name(header: &[Token], terminator: Terminator) -> Option<String> {
    if !matches!(terminator, Terminator::Block | Terminator::Arrow) || header.len() < 2 {
        return None;
    }
    let excluded = header.iter().any(|t| {
        t.is_punct('=') || matches!(t, Token::Ident(w) if NON_PROPERTY_KEYWORDS.contains(&w.as_str()))
    });
    if excluded {
        return None;
    }
    match header.last() {
        Some(Token::Ident(name)) if name != "this" => Some(name.clone()),
        _ => None,
    }
}

/// Attribute names (without arguments) declared in one `[...]` list.
fn attribute_names(list: &[Token]) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut segments: Vec<&[Token]> = Vec::new();
    let mut seg_start = 0;
    for (i, tok) in list.iter().enumerate() {
        match tok {
            Token::Punct('(' | '[' | '{') => depth += 1,
            Token::Punct(')' | ']' | '}') => depth = depth.saturating_sub(1),
            Token::Punct(',') if depth == 0 => {
                segments.push(&list[seg_start..i]);
                seg_start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&list[seg_start..]);
    for mut seg in segments {
        // `field: Foo` target specifier
        if seg.len() > 2
            && matches!(seg[0], Token::Ident(_))
            && seg[1].is_punct(':')
            && !seg[2].is_punct(':')
        {
            seg = &seg[2..];
        }
        let mut name = String::new();
        for tok in seg {
            match tok {
                Token::Punct('(') => break,
                Token::Ident(s) => name.push_str(s),
                Token::Punct(c) => name.push(*c),
                Token::Arrow | Token::Literal => {}
            }
        }
        if !name.is_empty() {
            out.push(name);
        }
    }
    out
}
