//! The arbitrary signal generator core and its linear output stage.
//!
//! A [`Generator`] owns a [`Transport`] holding the register window. Accessors for each register
//! group live in the submodules and translate between engineering units and register words.
//!
//! ```no_run
//! # fn main() -> Result<(), rp_gen::generator::Error> {
//! use rp_gen::generator::Generator;
//!
//! let mut gen = Generator::open("/dev/uio/generate")?;
//! gen.reset()?;
//! gen.set_freq_phase(10_000.0, 90.0)?;
//! gen.set_linear(0.5, 0.0)?;
//! gen.release();
//! # Ok(())
//! # }
//! ```

mod burst;
mod freq_phase;
mod linear;
mod waveform;

pub use burst::Burst;

use crate::{
    consts::TABLE_LEN,
    core::{
        Control,
        CTL_SYS,
    },
    transport::{
        local::Local,
        Transport,
    },
};
use std::path::Path;
use thiserror::Error;
use tracing::{
    debug,
    info,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] crate::transport::Error),
    #[error("Frequency {0} Hz is outside of the supported range")]
    OutOfRange(f64),
    #[error("Sample {value} at index {index} doesn't fit the output width")]
    Normalization { index: usize, value: i16 },
    #[error("A waveform of {0} samples doesn't fit the table")]
    TableSize(usize),
    #[error("Value is not a finite number")]
    NonFinite,
}

/// Output modes of the generator
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Repeat the table forever
    #[default]
    Continuous,
    /// Emit bursts as configured with [`Generator::set_burst`]
    Burst,
    /// Stream samples from an external source
    Stream,
}

/// A handle on one generator register window
#[derive(Debug)]
pub struct Generator<T> {
    transport: T,
}

impl Generator<Local> {
    /// Open the device node at `path` and map its register window
    /// # Errors
    /// Returns an error if the device can't be opened or mapped
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(Self::new(Local::new(path)?))
    }

    /// The device path this generator was opened from
    #[must_use]
    pub fn path(&self) -> &Path {
        self.transport.path()
    }

    /// Unmap the register window and close the device. Dropping the generator does the same.
    pub fn release(self) {
        info!(path = %self.path().display(), "releasing generator");
    }
}

impl<T> Generator<T>
where
    T: Transport,
{
    /// Wrap an already established `transport`
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Borrow the underlying transport
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Give back the underlying transport
    #[must_use]
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Restart the generator state machine and restore the power-on configuration: an all zero
    /// table of full length, 1 kHz at 0°, no trigger sources, no bursts and unity gain.
    /// # Errors
    /// Returns an error on bad transport
    pub fn reset(&mut self) -> Result<(), Error> {
        debug!("resetting generator");
        self.transport
            .write(&CTL_SYS, 0, &Control { reset: true })?;
        self.set_waveform(&vec![0i16; TABLE_LEN])?;
        self.set_freq_phase(1000.0, 0.0)?;
        self.set_trigger_mask(0)?;
        self.set_burst(0, 0, 0)?;
        self.set_linear(1.0, 0.0)?;
        Ok(())
    }

    /// Select the output mode. The hardware doesn't expose this yet, so the request is accepted
    /// and ignored.
    /// # Errors
    /// Never, kept fallible for when the hardware grows the register
    #[allow(clippy::unnecessary_wraps)]
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error> {
        debug!(?mode, "mode selection is not supported by this core, ignoring");
        Ok(())
    }

    /// The output mode. Without hardware support this is always [`Mode::Continuous`].
    /// # Errors
    /// Never, kept fallible for when the hardware grows the register
    #[allow(clippy::unnecessary_wraps, clippy::unused_self)]
    pub fn mode(&self) -> Result<Mode, Error> {
        Ok(Mode::Continuous)
    }

    /// Issue a software trigger. Not supported by this core, accepted and ignored.
    /// # Errors
    /// Never, kept fallible for when the hardware grows the register
    #[allow(clippy::unnecessary_wraps)]
    pub fn trigger(&mut self) -> Result<(), Error> {
        debug!("software trigger is not supported by this core, ignoring");
        Ok(())
    }
}
