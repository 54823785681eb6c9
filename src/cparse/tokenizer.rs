//! A small C lexer.
//!
//! Produces just enough structure for the initializer parser and the header
//! walker: identifiers, numbers, string/char literals, and single-character
//! punctuation. Comments and preprocessor lines are skipped.

use super::Error;

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword.
    Ident,
    /// Numeric literal (verbatim text, including suffixes).
    Number,
    /// String literal, quotes included.
    Str,
    /// Character literal, quotes included.
    Char,
    /// Single punctuation character.
    Punct,
}

/// A lexed token with its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Classification.
    pub kind: TokenKind,
    /// Verbatim source text.
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// `true` when this is the punctuation character `c`.
    pub fn is_punct(&self, c: char) -> bool {
        self.kind == TokenKind::Punct && self.text.len() == 1 && self.text.starts_with(c)
    }
}

/// Tokenizes C source text.
///
/// `//` and `/* */` comments are dropped, as are preprocessor lines (`#` to
/// end of line).
pub fn tokenize(src: &str) -> Result<Vec<Token>, Error> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        // Preprocessor directives span to end of line.
        if c == '#' {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }

        if c == '/' && i + 1 < bytes.len() {
            match bytes[i + 1] {
                b'/' => {
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                    continue;
                }
                b'*' => {
                    let mut j = i + 2;
                    loop {
                        if j + 1 >= bytes.len() {
                            return Err(Error::Unterminated("comment"));
                        }
                        if bytes[j] == b'*' && bytes[j + 1] == b'/' {
                            break;
                        }
                        j += 1;
                    }
                    i = j + 2;
                    continue;
                }
                _ => {}
            }
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < bytes.len()
                && ((bytes[i] as char).is_ascii_alphanumeric() || bytes[i] == b'_')
            {
                i += 1;
            }
            tokens.push(Token::new(TokenKind::Ident, &src[start..i]));
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && i + 1 < bytes.len() && bytes[i + 1].is_ascii_digit())
        {
            // Numbers keep their suffixes and exponents as one token; `e+1`
            // style exponent signs are part of the literal.
            let start = i;
            i += 1;
            while i < bytes.len() {
                let ch = bytes[i] as char;
                if ch.is_ascii_alphanumeric() || ch == '.' || ch == '_' {
                    i += 1;
                } else if (ch == '+' || ch == '-')
                    && matches!(bytes[i - 1], b'e' | b'E' | b'p' | b'P')
                {
                    i += 1;
                } else {
                    break;
                }
            }
            tokens.push(Token::new(TokenKind::Number, &src[start..i]));
            continue;
        }

        if c == '"' || c == '\'' {
            let quote = bytes[i];
            let start = i;
            i += 1;
            loop {
                if i >= bytes.len() {
                    return Err(Error::Unterminated(if quote == b'"' {
                        "string"
                    } else {
                        "character"
                    }));
                }
                if bytes[i] == b'\\' {
                    i += 2;
                    continue;
                }
                if bytes[i] == quote {
                    i += 1;
                    break;
                }
                i += 1;
            }
            let kind = if quote == b'"' {
                TokenKind::Str
            } else {
                TokenKind::Char
            };
            tokens.push(Token::new(kind, &src[start..i]));
            continue;
        }

        tokens.push(Token::new(TokenKind::Punct, &src[i..i + 1]));
        i += 1;
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn texts(src: &str) -> Vec<String> {
        tokenize(src).unwrap().into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn splits_idents_numbers_punct() {
        assert_eq!(texts("int x = 42;"), ["int", "x", "=", "42", ";"]);
    }

    #[test]
    fn numbers_keep_suffix_and_exponent() {
        assert_eq!(texts("1ul 1.5e-2 0x1.8p1"), ["1ul", "1.5e-2", "0x1.8p1"]);
    }

    #[test]
    fn comments_and_preprocessor_skipped() {
        assert_eq!(
            texts("#include <x.h>\nint a; // trailing\n/* b */ int c;"),
            ["int", "a", ";", "int", "c", ";"]
        );
    }

    #[test]
    fn string_literals_kept_verbatim() {
        assert_eq!(texts(r#"s = "a \"b\", c";"#), ["s", "=", r#""a \"b\", c""#, ";"]);
    }

    #[test]
    fn unterminated_comment_rejected() {
        assert_eq!(tokenize("/* nope"), Err(Error::Unterminated("comment")));
    }
}
