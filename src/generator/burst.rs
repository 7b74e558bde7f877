//! Burst timing and trigger selection. These registers are plain words with no encoding.

use super::{
    Error,
    Generator,
};
use crate::{
    core::{
        CFG_BDL,
        CFG_BIL,
        CFG_BNM,
        CFG_TRG,
    },
    transport::Transport,
};
use tracing::debug;

/// Burst configuration. All zeros disables bursts.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Burst {
    /// Samples emitted per burst
    pub len_data: u32,
    /// Idle samples between bursts
    pub len_idle: u32,
    /// Number of bursts
    pub repetitions: u32,
}

impl<T> Generator<T>
where
    T: Transport,
{
    /// Set the burst data length, idle length (both in samples) and repetition count
    /// # Errors
    /// Returns an error on bad transport
    pub fn set_burst(
        &mut self,
        len_data: u32,
        len_idle: u32,
        repetitions: u32,
    ) -> Result<(), Error> {
        debug!(len_data, len_idle, repetitions, "set burst");
        self.transport.write(&CFG_BDL, 0, &len_data)?;
        self.transport.write(&CFG_BIL, 0, &len_idle)?;
        self.transport.write(&CFG_BNM, 0, &repetitions)?;
        Ok(())
    }

    /// Get the burst configuration
    /// # Errors
    /// Returns an error on bad transport
    pub fn burst(&self) -> Result<Burst, Error> {
        Ok(Burst {
            len_data: self.transport.read(&CFG_BDL, 0)?,
            len_idle: self.transport.read(&CFG_BIL, 0)?,
            repetitions: self.transport.read(&CFG_BNM, 0)?,
        })
    }

    /// Select the trigger sources, one bit per source
    /// # Errors
    /// Returns an error on bad transport
    pub fn set_trigger_mask(&mut self, mask: u32) -> Result<(), Error> {
        debug!(mask, "set trigger mask");
        Ok(self.transport.write(&CFG_TRG, 0, &mask)?)
    }

    /// Get the selected trigger sources
    /// # Errors
    /// Returns an error on bad transport
    pub fn trigger_mask(&self) -> Result<u32, Error> {
        Ok(self.transport.read(&CFG_TRG, 0)?)
    }
}
