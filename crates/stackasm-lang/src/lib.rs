//! Front end for the StackAssembly language.
//!
//! StackAssembly is a minimalist, stack-based, assembly-like language. This
//! crate turns script text into a [`Program`]: an immutable vector of
//! operators plus a table mapping label names to operator indices. The
//! evaluation machine lives in the `stackasm-runtime` crate.
//!
//! # Design
//!
//! - Tokens are maximal runs of non-whitespace text, classified by shape
//!   (label / reference / integer / identifier) — see [`lexer`]
//! - Labels are resolved away at parse time; the runtime operator vector
//!   contains no label no-ops
//! - Every operator keeps its source [`Span`] so diagnostics can point back
//!   at the script
//!
//! # Examples
//!
//! ```
//! use stackasm_lang::{parse, Operator};
//!
//! let program = parse("start: 1 2 + @start").unwrap();
//!
//! assert_eq!(program.operator_count(), 4);
//! assert_eq!(program.label_target("start"), Some(0));
//! assert_eq!(program.get(3), Some(&Operator::Reference(0)));
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod program;
pub mod span;
pub mod word;

pub use self::{
    error::{ParseError, ParseErrorKind},
    parser::parse,
    program::{Builtin, Operator, Program},
    span::{LineIndex, Span},
    word::Word,
};
