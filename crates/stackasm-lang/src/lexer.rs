//! Lexical analysis for StackAssembly scripts.
//!
//! Tokens are maximal runs of non-whitespace text. Classification follows
//! the language's ordered rules: a trailing `:` makes a label, a leading `@`
//! makes a reference, digit-shaped text is an integer literal, and anything
//! else is an identifier. The identifier rule is a fallback, so the lexer
//! never rejects a token for being unknown; only integer literals that do
//! not fit in a 32-bit word fail here.
//!
//! `#` starts a comment that runs to the end of the line. It terminates the
//! current token even without surrounding whitespace: `3 #5 8` lexes as the
//! single integer `3`.
//!
//! # Examples
//!
//! ```
//! use logos::Logos;
//! use stackasm_lang::lexer::Token;
//!
//! let tokens: Vec<_> = Token::lexer("loop: 0 @loop jump_if").collect();
//! assert_eq!(tokens.len(), 4);
//! assert_eq!(tokens[0], Ok(Token::Label("loop".into())));
//! ```

use logos::{Lexer, Logos};

use crate::word::Word;

/// The one way lexing can fail: a token that is digit-shaped but whose value
/// does not fit in a 32-bit word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LexError {
    /// Integer literal outside the representable range.
    #[default]
    IntegerOutOfRange,
}

/// A classified script token.
///
/// Pattern priorities encode the classification order: label before
/// reference before integer before the identifier fallback. Longest match
/// wins first, so a `:` or `@` in the middle of a token never splits it.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"\s+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    /// `name:` — names the operator that follows. Not an operator itself.
    #[regex(r"[^\s#]+:", label_name, priority = 5)]
    Label(String),

    /// `@name` — stands for the index of the operator that `name` labels.
    #[regex(r"@[^\s#]+", reference_name, priority = 4)]
    Reference(String),

    /// Integer literal, decimal or hexadecimal.
    ///
    /// Decimal accepts [-2^31, 2^32 - 1]; values above `i32::MAX` store
    /// their two's-complement bit pattern. Hexadecimal accepts the unsigned
    /// 32-bit range and no sign.
    #[regex(r"-?[0-9]+", parse_decimal, priority = 3)]
    #[regex(r"0[xX][0-9a-fA-F]+", parse_hex, priority = 3)]
    Integer(Word),

    /// Any other run of non-whitespace text, operators like `+` and
    /// `jump_if` included. Looked up against the operator set at parse time.
    #[regex(r"[^\s#]+", |lex| lex.slice().to_string(), priority = 2)]
    Identifier(String),
}

fn label_name(lex: &mut Lexer<'_, Token>) -> String {
    let slice = lex.slice();
    slice[..slice.len() - 1].to_string()
}

fn reference_name(lex: &mut Lexer<'_, Token>) -> String {
    lex.slice()[1..].to_string()
}

fn parse_decimal(lex: &mut Lexer<'_, Token>) -> Result<Word, LexError> {
    // i64 holds the whole accepted range with room to spare; anything that
    // overflows the parse itself is out of range too.
    let value: i64 = lex
        .slice()
        .parse()
        .map_err(|_| LexError::IntegerOutOfRange)?;

    if value < i64::from(i32::MIN) || value > i64::from(u32::MAX) {
        return Err(LexError::IntegerOutOfRange);
    }

    Ok(Word::from(value as u32))
}

fn parse_hex(lex: &mut Lexer<'_, Token>) -> Result<Word, LexError> {
    let digits = &lex.slice()[2..];
    let value = u32::from_str_radix(digits, 16).map_err(|_| LexError::IntegerOutOfRange)?;
    Ok(Word::from(value))
}
