//! C braced-initializer parsing.
//!
//! Decomposes a designated initializer into entries of optional designator
//! (`.member` or `[index]`) plus either a scalar expression or a nested
//! compound. Depth of parens, brackets, and braces is tracked so that commas
//! inside `func(a, b)` or an inner `(int){0}` compound literal stay part of a
//! single scalar.

use super::{Error, Token};

/// The value side of an initializer entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitValue {
    /// A scalar expression, captured verbatim with whitespace collapsed.
    Scalar(String),
    /// A nested `{ ... }` compound.
    Compound(InitList),
}

/// One `designator = value` entry (the designator may be absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitEntry {
    /// `.name` or `[expr]`, when designated.
    pub designator: Option<String>,
    /// The initializer value.
    pub value: InitValue,
}

/// A parsed `{ ... }` initializer list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitList {
    /// Entries in source order.
    pub entries: Vec<InitEntry>,
}

/// Captures a scalar expression starting at `pos`, stopping at a `,` or `}`
/// at depth zero. Token texts are joined without whitespace.
fn capture_scalar(tokens: &[Token], mut pos: usize) -> Result<(String, usize), Error> {
    let mut depth_paren = 0i32;
    let mut depth_bracket = 0i32;
    let mut depth_brace = 0i32;
    let mut text = String::new();

    while pos < tokens.len() {
        let tok = &tokens[pos];
        if depth_paren == 0 && depth_bracket == 0 && depth_brace == 0 {
            if tok.is_punct(',') || tok.is_punct('}') {
                break;
            }
        }
        match tok.text.as_str() {
            "(" => depth_paren += 1,
            ")" => depth_paren -= 1,
            "[" => depth_bracket += 1,
            "]" => depth_bracket -= 1,
            "{" => depth_brace += 1,
            "}" => depth_brace -= 1,
            _ => {}
        }
        text.push_str(&tok.text);
        pos += 1;
    }

    if depth_paren != 0 || depth_bracket != 0 || depth_brace != 0 {
        return Err(Error::UnterminatedInitializer);
    }
    Ok((text, pos))
}

/// Parses a braced initializer from `tokens` starting at `start`.
///
/// `tokens[start]` must be `{`. Returns the parsed list and the number of
/// tokens consumed (up to and including the closing `}`). Trailing commas are
/// permitted.
pub fn parse_initializer(tokens: &[Token], start: usize) -> Result<(InitList, usize), Error> {
    let open = tokens.get(start).ok_or(Error::ExpectedBrace)?;
    if !open.is_punct('{') {
        return Err(Error::ExpectedBrace);
    }

    let mut list = InitList::default();
    let mut pos = start + 1;

    loop {
        let tok = tokens.get(pos).ok_or(Error::UnterminatedInitializer)?;
        if tok.is_punct('}') {
            pos += 1;
            break;
        }

        // Optional designator.
        let mut designator = None;
        if tok.is_punct('.')
            && tokens
                .get(pos + 2)
                .is_some_and(|t| t.is_punct('='))
        {
            let name = tokens
                .get(pos + 1)
                .ok_or(Error::UnterminatedInitializer)?;
            designator = Some(format!(".{}", name.text));
            pos += 3; // '.', name, '='
        } else if tok.is_punct('[') {
            let mut depth = 1i32;
            let mut text = String::from("[");
            let mut j = pos + 1;
            while depth > 0 {
                let t = tokens.get(j).ok_or(Error::UnterminatedInitializer)?;
                if t.is_punct('[') {
                    depth += 1;
                } else if t.is_punct(']') {
                    depth -= 1;
                }
                text.push_str(&t.text);
                j += 1;
            }
            let eq = tokens.get(j).ok_or(Error::UnterminatedInitializer)?;
            if !eq.is_punct('=') {
                return Err(Error::MalformedDecl(text));
            }
            designator = Some(text);
            pos = j + 1;
        }

        // Value: nested compound or scalar expression.
        let tok = tokens.get(pos).ok_or(Error::UnterminatedInitializer)?;
        let value = if tok.is_punct('{') {
            let (sub, consumed) = parse_initializer(tokens, pos)?;
            pos += consumed;
            InitValue::Compound(sub)
        } else {
            let (text, end) = capture_scalar(tokens, pos)?;
            if text.is_empty() {
                return Err(Error::UnterminatedInitializer);
            }
            pos = end;
            InitValue::Scalar(text)
        };

        list.entries.push(InitEntry { designator, value });

        let tok = tokens.get(pos).ok_or(Error::UnterminatedInitializer)?;
        if tok.is_punct(',') {
            pos += 1;
        } else if !tok.is_punct('}') {
            return Err(Error::MalformedDecl(tok.text.clone()));
        }
    }

    Ok((list, pos - start))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cparse::tokenize;

    fn parse(src: &str) -> InitList {
        let tokens = tokenize(src).unwrap();
        parse_initializer(&tokens, 0).unwrap().0
    }

    fn scalar(entry: &InitEntry) -> &str {
        match &entry.value {
            InitValue::Scalar(s) => s,
            InitValue::Compound(_) => panic!("expected scalar"),
        }
    }

    #[test]
    fn simple_positional() {
        let list = parse("{ 1, 2, 3 }");
        assert_eq!(list.entries.len(), 3);
        assert_eq!(list.entries[0].designator, None);
        assert_eq!(scalar(&list.entries[0]), "1");
        assert_eq!(scalar(&list.entries[1]), "2");
        assert_eq!(scalar(&list.entries[2]), "3");
    }

    #[test]
    fn designated_fields() {
        let list = parse("{ .x = 10, .y = 20 }");
        assert_eq!(list.entries[0].designator.as_deref(), Some(".x"));
        assert_eq!(scalar(&list.entries[0]), "10");
        assert_eq!(list.entries[1].designator.as_deref(), Some(".y"));
        assert_eq!(scalar(&list.entries[1]), "20");
    }

    #[test]
    fn array_index_designators() {
        let list = parse("{ [0] = 1, [5] = 2 }");
        assert_eq!(list.entries[0].designator.as_deref(), Some("[0]"));
        assert_eq!(scalar(&list.entries[0]), "1");
        assert_eq!(list.entries[1].designator.as_deref(), Some("[5]"));
        assert_eq!(scalar(&list.entries[1]), "2");
    }

    #[test]
    fn nested_compound() {
        let list = parse("{ .pt = { .x = 1, .y = 2 }, .flag = 1 }");
        assert_eq!(list.entries.len(), 2);
        assert_eq!(list.entries[0].designator.as_deref(), Some(".pt"));
        match &list.entries[0].value {
            InitValue::Compound(sub) => {
                assert_eq!(sub.entries.len(), 2);
                assert_eq!(sub.entries[0].designator.as_deref(), Some(".x"));
                assert_eq!(scalar(&sub.entries[0]), "1");
            }
            InitValue::Scalar(other) => panic!("expected compound, got {other}"),
        }
        assert_eq!(scalar(&list.entries[1]), "1");
    }

    #[test]
    fn expressions_keep_balanced_delimiters() {
        let list = parse("{ .a = 1 + 2, .b = func(x, y), .c = (int){ 0 } }");
        assert_eq!(list.entries.len(), 3);
        assert_eq!(scalar(&list.entries[0]), "1+2");
        // The comma inside the call does not split the entry.
        assert_eq!(scalar(&list.entries[1]), "func(x,y)");
        // A compound literal after a cast is one scalar, not a sub-list.
        assert_eq!(scalar(&list.entries[2]), "(int){0}");
    }

    #[test]
    fn trailing_comma() {
        let list = parse("{ 1, }");
        assert_eq!(list.entries.len(), 1);
    }

    #[test]
    fn missing_braces_rejected() {
        let tokens = tokenize("1, 2").unwrap();
        assert_eq!(
            parse_initializer(&tokens, 0).unwrap_err(),
            Error::ExpectedBrace
        );

        let tokens = tokenize("{ 1, 2").unwrap();
        assert_eq!(
            parse_initializer(&tokens, 0).unwrap_err(),
            Error::UnterminatedInitializer
        );
    }
}
