//! The untyped 32-bit value model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single 32-bit word.
///
/// StackAssembly is untyped: every value on the operand stack and in memory
/// is a bare 32-bit pattern. No tag travels with the value; each operator
/// decides whether to read its inputs as signed integers, unsigned integers,
/// or raw bits.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Word(u32);

impl Word {
    /// The all-zero word.
    pub const ZERO: Word = Word(0);

    /// View the bits as a signed (two's complement) integer.
    pub fn to_i32(self) -> i32 {
        self.0 as i32
    }

    /// View the bits as an unsigned integer.
    pub fn to_u32(self) -> u32 {
        self.0
    }

    /// The truth test used by conditional operators: any non-zero word is
    /// true.
    pub fn to_bool(self) -> bool {
        self.0 != 0
    }
}

impl From<i32> for Word {
    fn from(value: i32) -> Self {
        Word(value as u32)
    }
}

impl From<u32> for Word {
    fn from(value: u32) -> Self {
        Word(value)
    }
}

impl From<bool> for Word {
    fn from(value: bool) -> Self {
        Word(value as u32)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The wrapper is not interesting in debug output; show the bits as
        // an unsigned integer, matching how references and addresses read.
        self.0.fmt(f)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Signed display: arithmetic results are what hosts usually print.
        self.to_i32().fmt(f)
    }
}
