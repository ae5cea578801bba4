//! The effect channel between script and host.

use thiserror::Error;

/// Why evaluation paused.
///
/// An effect is the value [`Machine::step`](crate::Machine::step) and
/// [`Machine::run`](crate::Machine::run) hand back when evaluation cannot
/// silently continue. It only relays *which* condition triggered; any
/// parameters travel over the operand stack and memory, which the host can
/// inspect in full.
///
/// Only [`Effect::Yield`] is recoverable: the script suspended itself on
/// purpose and expects to continue after
/// [`Machine::resume`](crate::Machine::resume). [`Effect::Finished`] is the
/// normal terminal state. Every other variant is a failure that halts the
/// machine for good; a host that wants to retry builds a fresh machine
/// from the same program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Effect {
    /// Evaluation reached the end of the program.
    #[error("evaluation finished")]
    Finished,

    /// The script suspended itself with `yield`.
    #[error("script yielded control to the host")]
    Yield,

    /// Evaluated an identifier outside the operator set.
    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(String),

    /// An operator needed more inputs than the stack held, or `copy`/`drop`
    /// addressed a depth past the bottom. Raised before anything is popped
    /// for the operator's arity, so the stack is left as it was.
    #[error("stack underflow: needed {needed} operands, had {had}")]
    StackUnderflow {
        /// Operands the operator needed.
        needed: usize,
        /// Operands that were available.
        had: usize,
    },

    /// A push went past the configured operand stack cap.
    #[error("operand stack overflowed its configured limit")]
    StackOverflow,

    /// `read` or `write` addressed a word outside memory.
    #[error("memory address {addr} out of bounds (memory holds {size} words)")]
    MemoryOutOfBounds {
        /// The offending address.
        addr: u32,
        /// Memory size in words.
        size: u32,
    },

    /// A branch target does not point at an operator.
    #[error("jump target {target} out of bounds (program has {program_size} operators)")]
    BadJumpTarget {
        /// The offending target index.
        target: u32,
        /// Number of operators in the program.
        program_size: u32,
    },

    /// `/` with a zero divisor.
    #[error("division by zero")]
    DivideByZero,

    /// `/` with the one quotient that does not fit: `i32::MIN / -1`.
    ///
    /// Every other arithmetic operator wraps instead of triggering this.
    #[error("division overflowed")]
    DivideOverflow,

    /// `assert` consumed a zero.
    #[error("assertion failed")]
    AssertionFailed,
}

impl Effect {
    /// Whether this effect reports a failure, as opposed to regular
    /// completion or a cooperative suspension.
    pub fn is_error(&self) -> bool {
        !matches!(self, Effect::Finished | Effect::Yield)
    }
}

/// `resume` was called on a machine that is not suspended at a `yield`.
///
/// This is host-side misuse of the library, not a script condition, so it
/// surfaces as an error instead of an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("machine is not suspended at a yield")]
pub struct ResumeError;
