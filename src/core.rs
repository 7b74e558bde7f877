//! The register map of the generator core
//!
//! Offsets are byte offsets into the mapped window and must match the bitstream exactly.

use crate::{
    consts::{
        TABLE_LEN,
        WORD,
    },
    transport::{
        Deserialize,
        Serialize,
        TransportResult,
    },
};
use packed_struct::prelude::*;

/// The representation of a register (or register array) in the window
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Register {
    /// The byte offset of this register in the window
    pub addr: usize,
    /// The number of bytes stored at this location
    pub length: usize,
}

impl Register {
    const fn word(addr: usize) -> Self {
        Self { addr, length: WORD }
    }
}

/// State machine control
pub const CTL_SYS: Register = Register::word(0x00);
/// Table size, `(len << CWM) - 1`
pub const CFG_SIZ: Register = Register::word(0x04);
/// Phase accumulator step
pub const CFG_STP: Register = Register::word(0x08);
/// Phase accumulator initial offset
pub const CFG_OFF: Register = Register::word(0x0C);
/// Burst data length in samples
pub const CFG_BDL: Register = Register::word(0x10);
/// Burst idle length in samples
pub const CFG_BIL: Register = Register::word(0x14);
/// Burst repetitions
pub const CFG_BNM: Register = Register::word(0x18);
/// Trigger mask
pub const CFG_TRG: Register = Register::word(0x1C);
/// Waveform table, one sample per word
pub const TABLE: Register = Register {
    addr: 0x1_0000,
    length: TABLE_LEN * WORD,
};
/// Linear stage multiplier
pub const LIN_MUL: Register = Register::word(0x2_0000);
/// Linear stage summand
pub const LIN_SUM: Register = Register::word(0x2_0004);

/// Every register in the window, in address order
pub const REGISTERS: [Register; 11] = [
    CTL_SYS, CFG_SIZ, CFG_STP, CFG_OFF, CFG_BDL, CFG_BIL, CFG_BNM, CFG_TRG, TABLE, LIN_MUL,
    LIN_SUM,
];

/// The state machine control word
#[derive(Debug, PackedStruct, Default, Copy, Clone, PartialEq, Eq)]
#[packed_struct(bit_numbering = "lsb0", size_bytes = "4")]
pub struct Control {
    /// Restart the generator state machine
    #[packed_field(bits = "0")]
    pub reset: bool,
}

impl Serialize for Control {
    fn serialize(&self) -> TransportResult<u32> {
        Ok(u32::from_be_bytes(self.pack()?))
    }
}

impl Deserialize for Control {
    fn deserialize(word: u32) -> TransportResult<Self> {
        Ok(Self::unpack(&word.to_be_bytes())?)
    }
}
