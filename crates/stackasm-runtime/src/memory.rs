//! Word-addressed linear memory.

use stackasm_lang::Word;

use crate::effect::Effect;

/// A finite sequence of words, indexed by unsigned 32-bit addresses.
///
/// Sized once at machine construction; every word starts at zero. Scripts
/// reach it through the `read` and `write` operators, hosts through the
/// machine's accessors.
#[derive(Debug, Clone)]
pub(crate) struct Memory {
    values: Vec<Word>,
}

impl Memory {
    pub(crate) fn new(words: usize) -> Self {
        // Addresses are 32-bit words; a larger memory could never be reached.
        assert!(
            words <= u32::MAX as usize,
            "memory size must be addressable by a 32-bit word"
        );

        Self {
            values: vec![Word::ZERO; words],
        }
    }

    /// Size in words.
    pub(crate) fn size(&self) -> u32 {
        self.values.len() as u32
    }

    /// All words, in address order.
    pub(crate) fn values(&self) -> &[Word] {
        &self.values
    }

    /// The word at `addr`.
    pub(crate) fn read(&self, addr: u32) -> Result<Word, Effect> {
        self.values
            .get(addr as usize)
            .copied()
            .ok_or(Effect::MemoryOutOfBounds {
                addr,
                size: self.size(),
            })
    }

    /// Store `value` at `addr`.
    pub(crate) fn write(&mut self, addr: u32, value: Word) -> Result<(), Effect> {
        let size = self.size();
        match self.values.get_mut(addr as usize) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Effect::MemoryOutOfBounds { addr, size }),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.values.fill(Word::ZERO);
    }
}
