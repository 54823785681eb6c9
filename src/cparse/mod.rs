//! Parsing of C source fragments.
//!
//! Covers the reverse direction of the tool: a light tokenizer for C header
//! text, a numeric-literal parser, a designated-initializer parser, and the
//! header walker behind the `code2schema` command.

use derive_more::derive::{Display, Error};

mod header;
mod initializer;
mod numeric;
mod tokenizer;

pub use self::{
    header::{header_to_schema, CDecl, CField},
    initializer::{parse_initializer, InitEntry, InitList, InitValue},
    numeric::{parse_numeric_literal, Dfp, NumericValue},
    tokenizer::{tokenize, Token, TokenKind},
};

/// C parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum Error {
    /// Empty numeric literal.
    #[display("empty numeric literal")]
    EmptyLiteral,

    /// A digit outside the literal's radix.
    #[display("invalid digit in {_0} literal")]
    InvalidDigit(#[error(not(source))] &'static str),

    /// A suffix the C grammar does not know.
    #[display("unrecognized literal suffix: {_0}")]
    UnknownSuffix(#[error(not(source))] String),

    /// A mantissa or exponent that does not parse.
    #[display("malformed mantissa or exponent: {_0}")]
    MalformedNumber(#[error(not(source))] String),

    /// Unterminated string or character literal.
    #[display("unterminated {_0} literal")]
    Unterminated(#[error(not(source))] &'static str),

    /// An initializer that does not start with `{`.
    #[display("expected '{{' to open initializer")]
    ExpectedBrace,

    /// An initializer missing its closing `}`.
    #[display("unterminated initializer list")]
    UnterminatedInitializer,

    /// A declaration the header walker cannot make sense of.
    #[display("malformed declaration: {_0}")]
    MalformedDecl(#[error(not(source))] String),
}
