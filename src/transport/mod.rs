//! Defines the transport mechanisms through which the generator registers are accessed

pub mod local;
pub mod mock;

use crate::{
    consts::WORD,
    core::Register,
};
use fixed::{
    types::extra::LeEqU32,
    FixedI32,
};
use packed_struct::PackingError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Couldn't open device `{}`", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Couldn't map the register window of `{}`", path.display())]
    Map {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Access of {len} bytes at offset {offset:#x} is outside the register window")]
    OutOfBounds { offset: usize, len: usize },
    #[error("Register offset {0:#x} is not word aligned")]
    Misaligned(usize),
    #[error("Couldn't pack a register word")]
    Packing(#[from] PackingError),
}

pub type TransportResult<T> = Result<T, Error>;

/// Types that implement this trait can be written into a 32-bit register
pub trait Serialize {
    fn serialize(&self) -> TransportResult<u32>;
}

/// Types that implement this trait can be read from a 32-bit register
pub trait Deserialize: Sized {
    fn deserialize(word: u32) -> TransportResult<Self>;
}

macro_rules! serde_word {
    ($num:ty) => {
        impl Serialize for $num {
            fn serialize(&self) -> TransportResult<u32> {
                Ok(u32::from_ne_bytes(self.to_ne_bytes()))
            }
        }

        impl Deserialize for $num {
            fn deserialize(word: u32) -> TransportResult<Self> {
                Ok(<$num>::from_ne_bytes(word.to_ne_bytes()))
            }
        }
    };
}

serde_word!(u32);
serde_word!(i32);

// Samples are sign extended into the full word and truncated on the way back
impl Serialize for i16 {
    fn serialize(&self) -> TransportResult<u32> {
        i32::from(*self).serialize()
    }
}

impl Deserialize for i16 {
    fn deserialize(word: u32) -> TransportResult<Self> {
        let [lo, hi, ..] = word.to_le_bytes();
        Ok(i16::from_le_bytes([lo, hi]))
    }
}

impl<Frac: LeEqU32> Serialize for FixedI32<Frac> {
    fn serialize(&self) -> TransportResult<u32> {
        Ok(u32::from_ne_bytes(self.to_ne_bytes()))
    }
}

impl<Frac: LeEqU32> Deserialize for FixedI32<Frac> {
    fn deserialize(word: u32) -> TransportResult<Self> {
        Ok(Self::from_ne_bytes(word.to_ne_bytes()))
    }
}

/// The trait implemented by anything that can hold the generator register window.
/// Offsets passed to the word methods are absolute byte offsets into the window.
pub trait Transport {
    /// Read the 32-bit word at byte offset `offset`
    fn read_word(&self, offset: usize) -> TransportResult<u32>;

    /// Write the 32-bit word `word` at byte offset `offset`
    fn write_word(&mut self, offset: usize, word: u32) -> TransportResult<()>;

    /// Generically read a `Deserialize` type `T` from `register` at byte offset `offset` within it
    fn read<T>(&self, register: &Register, offset: usize) -> TransportResult<T>
    where
        T: Deserialize,
    {
        let word = self.read_word(resolve(register, offset)?)?;
        T::deserialize(word)
    }

    /// Generically write a `Serialize` type `T` into `register` at byte offset `offset` within it
    fn write<T>(&mut self, register: &Register, offset: usize, data: &T) -> TransportResult<()>
    where
        T: Serialize,
    {
        let word = data.serialize()?;
        self.write_word(resolve(register, offset)?, word)
    }
}

/// Turn a register relative offset into a window offset, checking it stays inside the register
fn resolve(register: &Register, offset: usize) -> TransportResult<usize> {
    match offset.checked_add(WORD) {
        Some(end) if end <= register.length => Ok(register.addr + offset),
        _ => Err(Error::OutOfBounds {
            offset: register.addr.saturating_add(offset),
            len: WORD,
        }),
    }
}
