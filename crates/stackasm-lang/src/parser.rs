//! Two-pass parsing and label resolution.
//!
//! Pass one walks the token stream, collecting operators and recording each
//! label against the index of the next operator. Labels are elided: they
//! exist in the label table and in no other place. Pass two resolves every
//! reference against that table and classifies identifiers against the
//! operator set.
//!
//! Unknown identifiers are *not* rejected here. They parse into
//! [`Operator::Unknown`] and trigger an effect if evaluation ever reaches
//! them, so a script can carry host-specific or future identifiers on paths
//! it never takes.

use indexmap::map::Entry;
use indexmap::IndexMap;
use logos::Logos;
use tracing::debug;

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::Token;
use crate::program::{Builtin, Operator, Program};
use crate::span::Span;
use crate::word::Word;

/// A non-label token waiting for the resolution pass.
enum Pending {
    Integer(Word),
    Reference(String),
    Identifier(String),
}

/// Parse a script into a [`Program`].
///
/// This is a pure function over the source text: no I/O, no side effects,
/// same output for the same input. Errors carry the span of the offending
/// token.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    let mut pending: Vec<(Pending, Span)> = Vec::new();
    let mut labels: IndexMap<String, u32> = IndexMap::new();
    let mut label_spans: Vec<Span> = Vec::new();

    for (token, range) in Token::lexer(source).spanned() {
        let span = Span::from(range);

        let token = match token {
            Ok(token) => token,
            Err(_) => {
                return Err(ParseError::new(ParseErrorKind::MalformedInteger, span));
            }
        };

        match token {
            Token::Label(name) => match labels.entry(name) {
                Entry::Occupied(entry) => {
                    return Err(ParseError::new(
                        ParseErrorKind::DuplicateLabel(entry.key().clone()),
                        span,
                    ));
                }
                Entry::Vacant(entry) => {
                    entry.insert(pending.len() as u32);
                    label_spans.push(span);
                }
            },
            Token::Integer(value) => pending.push((Pending::Integer(value), span)),
            Token::Reference(name) => pending.push((Pending::Reference(name), span)),
            Token::Identifier(text) => pending.push((Pending::Identifier(text), span)),
        }
    }

    // Operator indices travel as 32-bit words; a script can't address more.
    assert!(
        pending.len() < u32::MAX as usize,
        "script has too many operators to address"
    );
    let operator_count = pending.len() as u32;

    // A label at the end of the stream has no operator to name.
    for (idx, (name, &index)) in labels.iter().enumerate() {
        if index == operator_count {
            return Err(ParseError::new(
                ParseErrorKind::DanglingLabel(name.clone()),
                label_spans[idx],
            ));
        }
    }

    let mut operators = Vec::with_capacity(pending.len());
    let mut spans = Vec::with_capacity(pending.len());

    for (token, span) in pending {
        let operator = match token {
            Pending::Integer(value) => Operator::Integer(value),
            Pending::Reference(name) => match labels.get(&name) {
                Some(&index) => Operator::Reference(index),
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnresolvedReference(name),
                        span,
                    ));
                }
            },
            Pending::Identifier(text) => match Builtin::lookup(&text) {
                Some(builtin) => Operator::Builtin(builtin),
                None => Operator::Unknown(text),
            },
        };

        operators.push(operator);
        spans.push(span);
    }

    debug!(
        operators = operators.len(),
        labels = labels.len(),
        "parsed script"
    );

    Ok(Program::new(operators, labels, spans))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_elided_and_resolved() {
        let program = parse("start: 1 2 + @start jump").unwrap();

        assert_eq!(program.operator_count(), 5);
        assert_eq!(program.label_target("start"), Some(0));
        assert_eq!(program.get(3), Some(&Operator::Reference(0)));
        assert_eq!(program.get(4), Some(&Operator::Builtin(Builtin::Jump)));
    }

    #[test]
    fn consecutive_labels_share_a_target() {
        let program = parse("a: b: 7").unwrap();

        assert_eq!(program.label_target("a"), Some(0));
        assert_eq!(program.label_target("b"), Some(0));
        assert_eq!(program.operator_count(), 1);
    }

    #[test]
    fn label_points_past_preceding_labels() {
        let program = parse("1 mid: 2 3").unwrap();
        assert_eq!(program.label_target("mid"), Some(1));
    }

    #[test]
    fn duplicate_label_is_rejected() {
        let err = parse("a: a: 0 jump").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DuplicateLabel("a".into()));
        // The span points at the second occurrence.
        assert_eq!(err.span, Span::new(3, 5));
    }

    #[test]
    fn dangling_label_is_rejected() {
        let err = parse("1 2 end:").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DanglingLabel("end".into()));

        let err = parse("only:").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::DanglingLabel("only".into()));
    }

    #[test]
    fn unresolved_reference_is_rejected() {
        let err = parse("@missing jump").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnresolvedReference("missing".into())
        );
        assert_eq!(err.span, Span::new(0, 8));
    }

    #[test]
    fn malformed_integer_is_rejected_with_its_span() {
        let err = parse("1 4294967296").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MalformedInteger);
        assert_eq!(err.span, Span::new(2, 12));
    }

    #[test]
    fn unknown_identifiers_parse() {
        let program = parse("foo").unwrap();
        assert_eq!(program.get(0), Some(&Operator::Unknown("foo".into())));
    }

    #[test]
    fn empty_script_parses_to_an_empty_program() {
        let program = parse("").unwrap();
        assert_eq!(program.operator_count(), 0);

        let program = parse("   \n\t # just a comment\n").unwrap();
        assert_eq!(program.operator_count(), 0);
    }

    #[test]
    fn spans_follow_operators_not_labels() {
        let program = parse("skip: 42").unwrap();
        assert_eq!(program.span_of(0), Some(Span::new(6, 8)));
    }
}
