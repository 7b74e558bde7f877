//! Mock transport implementation used in testing the accessors

use super::{
    Error,
    Transport,
    TransportResult,
};
use crate::{
    consts::WORD,
    core::{
        Register,
        REGISTERS,
    },
};
use std::collections::HashMap;

/// A register window that lives in memory, useful for testing
#[derive(Debug, Default)]
pub struct Mock {
    memory: HashMap<usize, u32>,
    writes: Vec<(usize, u32)>,
}

impl Mock {
    /// Construct a new mock window backing the words of `registers`
    #[must_use]
    pub fn new<I>(registers: I) -> Self
    where
        I: IntoIterator<Item = Register>,
    {
        // We'll represent each word lazily instead of having a dense array
        let mut memory = HashMap::default();
        for Register { addr, length } in registers {
            for word in (addr..addr + length).step_by(WORD) {
                memory.insert(word, 0u32);
            }
        }
        Self {
            memory,
            writes: vec![],
        }
    }

    /// A zeroed mock of the full generator register map
    #[must_use]
    pub fn generator() -> Self {
        Self::new(REGISTERS)
    }

    /// Every write performed so far, as `(offset, word)` in issue order
    #[must_use]
    pub fn writes(&self) -> &[(usize, u32)] {
        &self.writes
    }

    /// Forget the recorded writes, keeping the memory contents
    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }
}

impl Transport for Mock {
    fn read_word(&self, offset: usize) -> TransportResult<u32> {
        self.memory
            .get(&offset)
            .copied()
            .ok_or(Error::OutOfBounds { offset, len: WORD })
    }

    fn write_word(&mut self, offset: usize, word: u32) -> TransportResult<()> {
        let slot = self
            .memory
            .get_mut(&offset)
            .ok_or(Error::OutOfBounds { offset, len: WORD })?;
        *slot = word;
        self.writes.push((offset, word));
        Ok(())
    }
}
