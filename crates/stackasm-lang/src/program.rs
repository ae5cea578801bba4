//! The compiled program model.
//!
//! A [`Program`] is what the parser produces and what the evaluation machine
//! consumes: an immutable operator vector, the label table, and one source
//! span per operator. Programs are cheap to share; every execution state
//! holds a reference to the same parsed program.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::span::Span;
use crate::word::Word;

/// One of the fixed, known operations.
///
/// The identifier spelling each variant answers to is defined by
/// [`Builtin::lookup`] and [`Builtin::as_str`], which must agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Builtin {
    /// `+` — wrapping addition.
    Add,
    /// `-` — wrapping subtraction.
    Sub,
    /// `*` — wrapping multiplication.
    Mul,
    /// `/` — signed truncated division; pushes quotient, then remainder.
    Div,
    /// `and` — bitwise AND.
    And,
    /// `or` — bitwise OR.
    Or,
    /// `xor` — bitwise XOR.
    Xor,
    /// `count_ones` — population count.
    CountOnes,
    /// `leading_zeros` — leading zero bits, 32 for zero.
    LeadingZeros,
    /// `trailing_zeros` — trailing zero bits, 32 for zero.
    TrailingZeros,
    /// `rotate_left` — bit rotation, count taken modulo 32.
    RotateLeft,
    /// `rotate_right` — bit rotation, count taken modulo 32.
    RotateRight,
    /// `shift_left` — logical shift, count taken modulo 32.
    ShiftLeft,
    /// `shift_right` — arithmetic (sign-extending) shift, count modulo 32.
    ShiftRight,
    /// `=` — signed equality, pushes 1 or 0.
    Eq,
    /// `>` — signed greater-than.
    Gt,
    /// `>=` — signed greater-or-equal.
    Ge,
    /// `<` — signed less-than.
    Lt,
    /// `<=` — signed less-or-equal.
    Le,
    /// `jump` — unconditional branch to a popped operator index.
    Jump,
    /// `jump_if` — branch if a popped condition is non-zero.
    JumpIf,
    /// `call` — branch, remembering the return address on the call stack.
    Call,
    /// `call_either` — conditional call with two candidate targets.
    CallEither,
    /// `return` — branch back to the most recent call site.
    Return,
    /// `copy` — push a duplicate of the value at a popped stack depth.
    Copy,
    /// `drop` — remove the value at a popped stack depth.
    Drop,
    /// `read` — push the memory word at a popped address.
    Read,
    /// `write` — store a popped value at a popped address.
    Write,
    /// `assert` — raise an effect if a popped condition is zero.
    Assert,
    /// `yield` — suspend, handing control to the host.
    Yield,
}

impl Builtin {
    /// Look an identifier up against the operator set.
    pub fn lookup(identifier: &str) -> Option<Builtin> {
        let builtin = match identifier {
            "+" => Builtin::Add,
            "-" => Builtin::Sub,
            "*" => Builtin::Mul,
            "/" => Builtin::Div,
            "and" => Builtin::And,
            "or" => Builtin::Or,
            "xor" => Builtin::Xor,
            "count_ones" => Builtin::CountOnes,
            "leading_zeros" => Builtin::LeadingZeros,
            "trailing_zeros" => Builtin::TrailingZeros,
            "rotate_left" => Builtin::RotateLeft,
            "rotate_right" => Builtin::RotateRight,
            "shift_left" => Builtin::ShiftLeft,
            "shift_right" => Builtin::ShiftRight,
            "=" => Builtin::Eq,
            ">" => Builtin::Gt,
            ">=" => Builtin::Ge,
            "<" => Builtin::Lt,
            "<=" => Builtin::Le,
            "jump" => Builtin::Jump,
            "jump_if" => Builtin::JumpIf,
            "call" => Builtin::Call,
            "call_either" => Builtin::CallEither,
            "return" => Builtin::Return,
            "copy" => Builtin::Copy,
            "drop" => Builtin::Drop,
            "read" => Builtin::Read,
            "write" => Builtin::Write,
            "assert" => Builtin::Assert,
            "yield" => Builtin::Yield,
            _ => return None,
        };

        Some(builtin)
    }

    /// The identifier this operation is written as in scripts.
    pub fn as_str(self) -> &'static str {
        match self {
            Builtin::Add => "+",
            Builtin::Sub => "-",
            Builtin::Mul => "*",
            Builtin::Div => "/",
            Builtin::And => "and",
            Builtin::Or => "or",
            Builtin::Xor => "xor",
            Builtin::CountOnes => "count_ones",
            Builtin::LeadingZeros => "leading_zeros",
            Builtin::TrailingZeros => "trailing_zeros",
            Builtin::RotateLeft => "rotate_left",
            Builtin::RotateRight => "rotate_right",
            Builtin::ShiftLeft => "shift_left",
            Builtin::ShiftRight => "shift_right",
            Builtin::Eq => "=",
            Builtin::Gt => ">",
            Builtin::Ge => ">=",
            Builtin::Lt => "<",
            Builtin::Le => "<=",
            Builtin::Jump => "jump",
            Builtin::JumpIf => "jump_if",
            Builtin::Call => "call",
            Builtin::CallEither => "call_either",
            Builtin::Return => "return",
            Builtin::Copy => "copy",
            Builtin::Drop => "drop",
            Builtin::Read => "read",
            Builtin::Write => "write",
            Builtin::Assert => "assert",
            Builtin::Yield => "yield",
        }
    }
}

impl std::fmt::Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An executable operator.
///
/// Labels never appear here; the parser resolves them into indices and
/// elides them from the vector, so the machine's dispatch loop has no
/// "is this a label?" branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operator {
    /// Pushes the literal word.
    Integer(Word),
    /// Pushes the operator index its label resolved to at parse time.
    Reference(u32),
    /// One of the known operations.
    Builtin(Builtin),
    /// An identifier outside the operator set. Parsing keeps it as written;
    /// evaluating it raises the unknown-identifier effect.
    Unknown(String),
}

/// A parsed script, ready to evaluate.
///
/// Immutable after parsing. Every [`Operator::Reference`] inside is
/// guaranteed to carry an index that points into the operator vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    operators: Vec<Operator>,
    labels: IndexMap<String, u32>,
    spans: Vec<Span>,
}

impl Program {
    pub(crate) fn new(
        operators: Vec<Operator>,
        labels: IndexMap<String, u32>,
        spans: Vec<Span>,
    ) -> Self {
        debug_assert_eq!(operators.len(), spans.len());
        Self {
            operators,
            labels,
            spans,
        }
    }

    /// The operator vector.
    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    /// Number of operators, as the unsigned word the jump family compares
    /// targets against.
    pub fn operator_count(&self) -> u32 {
        self.operators.len() as u32
    }

    /// The operator at `index`, if the index is in bounds.
    pub fn get(&self, index: u32) -> Option<&Operator> {
        self.operators.get(index as usize)
    }

    /// The operator index a label resolves to.
    pub fn label_target(&self, name: &str) -> Option<u32> {
        self.labels.get(name).copied()
    }

    /// All labels with their operator indices, in script order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, u32)> {
        self.labels.iter().map(|(name, &index)| (name.as_str(), index))
    }

    /// The source span of the operator at `index`.
    pub fn span_of(&self, index: u32) -> Option<Span> {
        self.spans.get(index as usize).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_and_as_str_round_trip() {
        for identifier in [
            "+",
            "-",
            "*",
            "/",
            "and",
            "or",
            "xor",
            "count_ones",
            "leading_zeros",
            "trailing_zeros",
            "rotate_left",
            "rotate_right",
            "shift_left",
            "shift_right",
            "=",
            ">",
            ">=",
            "<",
            "<=",
            "jump",
            "jump_if",
            "call",
            "call_either",
            "return",
            "copy",
            "drop",
            "read",
            "write",
            "assert",
            "yield",
        ] {
            let builtin = Builtin::lookup(identifier).unwrap();
            assert_eq!(builtin.as_str(), identifier);
        }
    }

    #[test]
    fn unknown_identifiers_do_not_resolve() {
        assert_eq!(Builtin::lookup("abort"), None);
        assert_eq!(Builtin::lookup("%"), None);
        assert_eq!(Builtin::lookup(""), None);
    }
}
