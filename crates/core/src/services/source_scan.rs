//! Static scan of contract source for `emit` statements per function.
//!
//! The scanner tokenizes the source (skipping comments and string literals),
//! then matches `function <name> ( ... ) ... { ... }` with depth counters, so
//! bodies nest to any depth. Malformed input never panics: an unterminated
//! definition simply ends the scan.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::EmissionMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'a> {
    Ident(&'a str),
    Punct(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub span: (usize, usize),
}

impl<'a> Token<'a> {
    fn is_ident(&self, word: &str) -> bool {
        matches!(self.kind, TokenKind::Ident(w) if w == word)
    }

    fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct(c)
    }

    fn ident(&self) -> Option<&'a str> {
        match self.kind {
            TokenKind::Ident(w) => Some(w),
            TokenKind::Punct(_) => None,
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Split source into identifiers and punctuation, dropping whitespace,
/// comments, and string literals.
pub(crate) fn tokenize(source: &str) -> Vec<Token<'_>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c.is_whitespace() {
            continue;
        }

        if c == '/' && bytes.get(start + 1) == Some(&b'/') {
            for (_, n) in chars.by_ref() {
                if n == '\n' {
                    break;
                }
            }
            continue;
        }

        if c == '/' && bytes.get(start + 1) == Some(&b'*') {
            chars.next();
            let mut prev = '\0';
            for (_, n) in chars.by_ref() {
                if prev == '*' && n == '/' {
                    break;
                }
                prev = n;
            }
            continue;
        }

        if c == '"' || c == '\'' {
            let mut escaped = false;
            for (_, n) in chars.by_ref() {
                if escaped {
                    escaped = false;
                } else if n == '\\' {
                    escaped = true;
                } else if n == c {
                    break;
                }
            }
            continue;
        }

        if is_ident_char(c) {
            let mut end = start + c.len_utf8();
            while let Some(&(i, n)) = chars.peek() {
                if !is_ident_char(n) {
                    break;
                }
                end = i + n.len_utf8();
                chars.next();
            }
            tokens.push(Token { kind: TokenKind::Ident(&source[start..end]), span: (start, end) });
            continue;
        }

        tokens.push(Token { kind: TokenKind::Punct(c), span: (start, start + c.len_utf8()) });
    }

    tokens
}

/// Given `tokens[open]` is `open_c`, return the index just past its matching
/// `close_c`, or `None` when the input ends first.
fn skip_balanced(tokens: &[Token<'_>], open: usize, open_c: char, close_c: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, tok) in tokens.iter().enumerate().skip(open) {
        if tok.is_punct(open_c) {
            depth += 1;
        } else if tok.is_punct(close_c) {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(i + 1);
            }
        }
    }
    None
}

/// A function definition found in source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFunction {
    pub name: String,
    /// Distinct emitted event names, first-seen order.
    pub events: Vec<String>,
    /// Byte range of the whole definition in the source.
    pub span: Range<usize>,
}

/// Event names from `emit <Name>(` statements in `body`. Qualified names such
/// as `emit Lib.Transfer(` yield the last segment.
fn collect_emits(body: &[Token<'_>]) -> Vec<String> {
    let mut events: Vec<String> = Vec::new();
    let mut i = 0;
    while i < body.len() {
        if !body[i].is_ident("emit") {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        let mut last = None;
        while let Some(name) = body.get(j).and_then(|t| t.ident()) {
            last = Some(name);
            j += 1;
            if body.get(j).is_some_and(|t| t.is_punct('.')) {
                j += 1;
            } else {
                break;
            }
        }
        if let (Some(name), Some(tok)) = (last, body.get(j)) {
            if tok.is_punct('(') && !events.iter().any(|e| e == name) {
                events.push(name.to_string());
            }
        }
        i = j.max(i + 1);
    }
    events
}

/// Every function definition with a body, in source order.
pub fn scan_functions(source: &str) -> Vec<SourceFunction> {
    let tokens = tokenize(source);
    let mut out = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let name = match (tokens.get(i + 1), tokens.get(i + 2)) {
            (Some(name_tok), Some(paren)) if tokens[i].is_ident("function") && paren.is_punct('(') => {
                match name_tok.ident() {
                    Some(name) => name,
                    None => {
                        i += 1;
                        continue;
                    }
                }
            }
            _ => {
                i += 1;
                continue;
            }
        };

        let Some(after_params) = skip_balanced(&tokens, i + 2, '(', ')') else {
            break;
        };

        // Header: visibility, modifiers, returns clause. A `;` means no body.
        let Some(open) = tokens[after_params..]
            .iter()
            .position(|t| t.is_punct('{') || t.is_punct(';'))
            .map(|p| p + after_params)
        else {
            break;
        };
        if tokens[open].is_punct(';') {
            i = open + 1;
            continue;
        }

        let Some(after_body) = skip_balanced(&tokens, open, '{', '}') else {
            break;
        };

        out.push(SourceFunction {
            name: name.to_string(),
            events: collect_emits(&tokens[open + 1..after_body - 1]),
            span: tokens[i].span.0..tokens[after_body - 1].span.1,
        });
        i = after_body;
    }

    out
}

/// Map each function that emits at least one event to its events. Overloads
/// sharing a name have their lists unioned in source order.
pub fn parse_emissions(source: &str) -> EmissionMap {
    let functions = scan_functions(source);
    let mut map = EmissionMap::new();
    for function in &functions {
        for event in &function.events {
            map.push_unique(&function.name, event);
        }
    }
    debug!(functions = functions.len(), emitting = map.len(), "scanned contract source");
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idents(source: &str) -> Vec<&str> {
        tokenize(source).iter().filter_map(|t| t.ident()).collect()
    }

    #[test]
    fn tokenizer_skips_comments_and_strings() {
        let src = r#"
            // function hidden() { emit Nope(); }
            /* emit AlsoNope(); */
            string s = "emit Quoted(";
            bytes1 c = '\'';
            uint x;
        "#;
        assert_eq!(idents(src), vec!["string", "s", "bytes1", "c", "uint", "x"]);
    }

    #[test]
    fn tokenizer_tolerates_unterminated_comment_and_string() {
        assert_eq!(idents("a /* never closed"), vec!["a"]);
        assert_eq!(idents("b \"never closed"), vec!["b"]);
    }

    #[test]
    fn tokenizer_handles_multibyte_text() {
        let toks = tokenize("é x");
        assert_eq!(toks.len(), 2);
        assert_eq!(toks[0].kind, TokenKind::Punct('é'));
        assert_eq!(toks[1].kind, TokenKind::Ident("x"));
    }

    #[test]
    fn skip_balanced_reports_unclosed() {
        let toks = tokenize("{ { }");
        assert_eq!(skip_balanced(&toks, 0, '{', '}'), None);
        let toks = tokenize("{ { } } x");
        assert_eq!(skip_balanced(&toks, 0, '{', '}'), Some(4));
    }

    #[test]
    fn collect_emits_takes_last_segment_of_qualified_name() {
        let toks = tokenize("emit Lib.Transfer(a); emit Transfer(b); emit Other (c);");
        assert_eq!(collect_emits(&toks), vec!["Transfer", "Other"]);
    }
}
