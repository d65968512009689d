//! Minimal C# tokenizer.
//!
//! Only what the member walk needs survives: identifiers, punctuation and the
//! `=>` arrow. Comments, preprocessor lines and every literal form (regular,
//! verbatim, interpolated, raw, char, numeric) collapse to `Token::Literal` or
//! disappear, so braces inside them never disturb depth tracking.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Identifier or keyword; verbatim identifiers keep their `@`.
    Ident(String),
    Punct(char),
    Arrow,
    Literal,
}

impl Token {
    #[must_use]
    pub fn is_ident(&self, word: &str) -> bool {
        matches!(self, Token::Ident(s) if s == word)
    }

    #[must_use]
    pub fn is_punct(&self, c: char) -> bool {
        matches!(self, Token::Punct(p) if *p == c)
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Tokenize C# source. Never fails: malformed input degrades to fewer tokens.
#[must_use]
pub fn tokenize(src: &str) -> Vec<Token> {
    let chars: Vec<char> = src.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    let mut line_start = true;
    while i < chars.len() {
        let c = chars[i];
        if c == '\n' {
            line_start = true;
            i += 1;
            continue;
        }
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if line_start && c == '#' {
            i = skip_line(&chars, i);
            continue;
        }
        line_start = false;
        let next = chars.get(i + 1).copied();
        if c == '/' && next == Some('/') {
            i = skip_line(&chars, i);
        } else if c == '/' && next == Some('*') {
            i = skip_block_comment(&chars, i + 2);
        } else if starts_string(&chars, i) {
            i = skip_string(&chars, i);
            out.push(Token::Literal);
        } else if c == '\'' {
            i = skip_char_literal(&chars, i);
            out.push(Token::Literal);
        } else if c == '@' && next.is_some_and(is_ident_start) {
            let end = ident_end(&chars, i + 1);
            out.push(Token::Ident(chars[i..end].iter().collect()));
            i = end;
        } else if is_ident_start(c) {
            let end = ident_end(&chars, i);
            out.push(Token::Ident(chars[i..end].iter().collect()));
            i = end;
        } else if c.is_ascii_digit() {
            while i < chars.len() && (is_ident_continue(chars[i]) || chars[i] == '.') {
                i += 1;
            }
            out.push(Token::Literal);
        } else if c == '=' && next == Some('>') {
            out.push(Token::Arrow);
            i += 2;
        } else {
            out.push(Token::Punct(c));
            i += 1;
        }
    }
    out
}

fn ident_end(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && is_ident_continue(chars[i]) {
        i += 1;
    }
    i
}

fn skip_line(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i] != '\n' {
        i += 1;
    }
    i
}

fn skip_block_comment(chars: &[char], mut i: usize) -> usize {
    while i + 1 < chars.len() {
        if chars[i] == '*' && chars[i + 1] == '/' {
            return i + 2;
        }
        i += 1;
    }
    chars.len()
}

fn skip_char_literal(chars: &[char], mut i: usize) -> usize {
    i += 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '\'' => return i + 1,
            '\n' => return i,
            _ => i += 1,
        }
    }
    chars.len()
}

/// `"`, or a run of `$`/`@` prefixes directly followed by `"`.
fn starts_string(chars: &[char], i: usize) -> bool {
    let mut j = i;
    while j < chars.len() && (chars[j] == '$' || chars[j] == '@') {
        j += 1;
    }
    chars.get(j) == Some(&'"')
}

fn skip_string(chars: &[char], i: usize) -> usize {
    let mut j = i;
    let mut interpolated = false;
    let mut verbatim = false;
    while chars[j] != '"' {
        interpolated |= chars[j] == '$';
        verbatim |= chars[j] == '@';
        j += 1;
    }
    let mut quotes = 0;
    while j + quotes < chars.len() && chars[j + quotes] == '"' {
        quotes += 1;
    }
    if quotes >= 3 && !verbatim {
        return skip_raw_string(chars, j + quotes, quotes);
    }
    if quotes == 2 && !verbatim {
        return j + 2;
    }
    let mut k = j + 1;
    while k < chars.len() {
        match chars[k] {
            '\\' if !verbatim => k += 2,
            '"' if verbatim && chars.get(k + 1) == Some(&'"') => k += 2,
            '"' => return k + 1,
            '\n' if !verbatim => return k,
            '{' if interpolated && chars.get(k + 1) == Some(&'{') => k += 2,
            '{' if interpolated => k = skip_hole(chars, k + 1),
            _ => k += 1,
        }
    }
    chars.len()
}

fn skip_raw_string(chars: &[char], mut i: usize, quotes: usize) -> usize {
    while i < chars.len() {
        if chars[i] == '"' {
            let mut run = 0;
            while i + run < chars.len() && chars[i + run] == '"' {
                run += 1;
            }
            if run >= quotes {
                return i + run;
            }
            i += run;
        } else {
            i += 1;
        }
    }
    chars.len()
}

/// Skip an interpolation hole; `i` points just past its opening `{`.
fn skip_hole(chars: &[char], mut i: usize) -> usize {
    let mut depth = 1usize;
    while i < chars.len() {
        if starts_string(chars, i) {
            i = skip_string(chars, i);
            continue;
        }
        match chars[i] {
            '\'' => {
                i = skip_char_literal(chars, i);
                continue;
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    chars.len()
}
