//! Compile-time constants describing the generator hardware.
//!
//! These are part of the contract with the FPGA bitstream. The fixed-point formats are expressed
//! as [`fixed`] types and the bit widths are derived from them, so changing a format is a single
//! edit here.

use fixed::FixedI32;
use typenum::U14;

/// Fixed-point format of the linear stage multiplier (amplitude)
pub type Multiplier = FixedI32<U14>;

/// Fixed-point format of the linear stage summand (offset)
pub type Summand = FixedI32<U14>;

/// Fractional bits of the amplitude multiplier
pub const RP_GEN_DWM: u32 = Multiplier::FRAC_NBITS;

/// Fractional bits of the offset summand
pub const RP_GEN_DWS: u32 = Summand::FRAC_NBITS;

/// Width of a waveform sample as seen by the DAC
pub const RP_GEN_DWO: u32 = 14;

/// Address width of the waveform table, log2 of its capacity in samples
pub const RP_GEN_CWM: u32 = 14;

/// DAC sample rate in Hz
pub const RP_GEN_SR: f64 = 125_000_000.0;

/// Lowest frequency accepted by the phase accumulator
pub const FREQUENCY_MIN: f64 = 0.0;

/// Highest frequency accepted by the phase accumulator (Nyquist)
pub const FREQUENCY_MAX: f64 = RP_GEN_SR / 2.0;

/// Capacity of the waveform table in samples
pub const TABLE_LEN: usize = 1 << RP_GEN_CWM;

/// Smallest representable waveform sample
#[allow(clippy::cast_possible_truncation)]
pub const SAMPLE_MIN: i16 = -(1 << (RP_GEN_DWO - 1)) as i16;

/// Largest representable waveform sample
#[allow(clippy::cast_possible_truncation)]
pub const SAMPLE_MAX: i16 = ((1 << (RP_GEN_DWO - 1)) - 1) as i16;

/// Length in bytes of the mapped register window
pub const GENERATE_BASE_SIZE: usize = 0x0003_0000;

/// Size of one register word in bytes
pub const WORD: usize = std::mem::size_of::<u32>();
