//! Frequency and phase, encoded as the step and initial offset of the phase accumulator.
//!
//! Neither is stored directly. Both are fractions of the table size currently programmed in
//! `cfg_siz`, so the resolution changes with the waveform length: program the waveform first.

use super::{
    Error,
    Generator,
};
use crate::{
    consts::{
        FREQUENCY_MAX,
        FREQUENCY_MIN,
        RP_GEN_SR,
    },
    core::{
        CFG_OFF,
        CFG_SIZ,
        CFG_STP,
    },
    transport::Transport,
};
use num_traits::ToPrimitive;
use tracing::{
    debug,
    warn,
};

impl<T> Generator<T>
where
    T: Transport,
{
    /// The phase accumulator range, `cfg_siz + 1`, without wrapping
    #[allow(clippy::cast_precision_loss)]
    fn accumulator_size(&self) -> Result<f64, Error> {
        let siz: u32 = self.transport.read(&CFG_SIZ, 0)?;
        Ok((u64::from(siz) + 1) as f64)
    }

    /// Set the output frequency in Hz and the starting phase in degrees.
    ///
    /// The phase may be any finite value and is wrapped into `[0, 360)`, negative phases included.
    /// # Errors
    /// Returns [`Error::OutOfRange`] if the frequency is outside
    /// [`FREQUENCY_MIN`]..=[`FREQUENCY_MAX`], [`Error::NonFinite`] for a NaN or infinite phase, or
    /// an error on bad transport. Nothing is written when the arguments are rejected.
    pub fn set_freq_phase(&mut self, frequency: f64, phase: f64) -> Result<(), Error> {
        if !(FREQUENCY_MIN..=FREQUENCY_MAX).contains(&frequency) {
            warn!(frequency, "rejecting out of range frequency");
            return Err(Error::OutOfRange(frequency));
        }
        if !phase.is_finite() {
            warn!(phase, "rejecting non-finite phase");
            return Err(Error::NonFinite);
        }
        let size = self.accumulator_size()?;
        let step = (size * frequency / RP_GEN_SR)
            .round()
            .to_u32()
            .ok_or(Error::OutOfRange(frequency))?;
        // A phase just shy of 360 can round up to a full turn
        let offset = (size * phase.rem_euclid(360.0) / 360.0)
            .round()
            .rem_euclid(size)
            .to_u32()
            .ok_or(Error::NonFinite)?;
        debug!(frequency, phase, step, offset, "set frequency and phase");
        self.transport.write(&CFG_STP, 0, &step)?;
        self.transport.write(&CFG_OFF, 0, &offset)?;
        Ok(())
    }

    /// Get the output frequency in Hz and the starting phase in degrees, as quantized by the
    /// hardware
    /// # Errors
    /// Returns an error on bad transport
    pub fn freq_phase(&self) -> Result<(f64, f64), Error> {
        let size = self.accumulator_size()?;
        let step: u32 = self.transport.read(&CFG_STP, 0)?;
        let offset: u32 = self.transport.read(&CFG_OFF, 0)?;
        Ok((
            f64::from(step) / size * RP_GEN_SR,
            f64::from(offset) / size * 360.0,
        ))
    }

    /// The smallest frequency increment available with the current table size, in Hz
    /// # Errors
    /// Returns an error on bad transport
    pub fn frequency_resolution(&self) -> Result<f64, Error> {
        Ok(RP_GEN_SR / self.accumulator_size()?)
    }

    /// The smallest phase increment available with the current table size, in degrees
    /// # Errors
    /// Returns an error on bad transport
    pub fn phase_resolution(&self) -> Result<f64, Error> {
        Ok(360.0 / self.accumulator_size()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        consts::TABLE_LEN,
        transport::mock::Mock,
    };

    fn full_table() -> Generator<Mock> {
        let mut gen = Generator::new(Mock::generator());
        gen.set_waveform(&vec![0i16; TABLE_LEN]).unwrap();
        gen
    }

    #[test]
    fn test_freq_phase_roundtrip() {
        let mut gen = full_table();
        let df = gen.frequency_resolution().unwrap();
        let dp = gen.phase_resolution().unwrap();
        for (freq, phase) in [
            (FREQUENCY_MIN, 0.0),
            (1000.0, 45.0),
            (1_234_567.89, 359.9),
            (FREQUENCY_MAX, 180.0),
        ] {
            gen.set_freq_phase(freq, phase).unwrap();
            let (f, p) = gen.freq_phase().unwrap();
            assert!((f - freq).abs() <= df, "{f} vs {freq}");
            assert!((p - phase).abs() <= dp, "{p} vs {phase}");
        }
    }

    #[test]
    fn test_phase_wraps() {
        let mut gen = full_table();
        let dp = gen.phase_resolution().unwrap();
        for (phase, expected) in [(-90.0, 270.0), (720.0 + 30.0, 30.0), (-360.0, 0.0)] {
            gen.set_freq_phase(1000.0, phase).unwrap();
            let (_, p) = gen.freq_phase().unwrap();
            assert!((p - expected).abs() <= dp, "{phase} gave {p}");
            assert!((0.0..360.0).contains(&p));
        }
    }

    #[test]
    fn test_phase_full_turn_rounds_to_zero() {
        let mut gen = full_table();
        gen.set_freq_phase(1000.0, 360.0 - 1e-9).unwrap();
        assert_eq!(gen.transport().read::<u32>(&CFG_OFF, 0).unwrap(), 0);
    }

    #[test]
    fn test_step_encoding() {
        let mut gen = full_table();
        // size = 2^28, 2^28 * 1000 / 125e6 = 2147.48
        gen.set_freq_phase(1000.0, 90.0).unwrap();
        assert_eq!(gen.transport().read::<u32>(&CFG_STP, 0).unwrap(), 2147);
        assert_eq!(gen.transport().read::<u32>(&CFG_OFF, 0).unwrap(), 1 << 26);
    }

    #[test]
    fn test_out_of_range_leaves_state() {
        let mut gen = full_table();
        gen.set_freq_phase(5000.0, 10.0).unwrap();
        let before = gen.freq_phase().unwrap();
        for freq in [FREQUENCY_MAX + 1.0, -1.0, f64::NAN] {
            assert!(matches!(
                gen.set_freq_phase(freq, 0.0),
                Err(Error::OutOfRange(_))
            ));
        }
        assert_eq!(gen.freq_phase().unwrap(), before);
    }

    #[test]
    fn test_non_finite_phase_rejected() {
        let mut gen = full_table();
        let mut mock = gen.into_inner();
        mock.clear_writes();
        gen = Generator::new(mock);
        for phase in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                gen.set_freq_phase(10.0, phase),
                Err(Error::NonFinite)
            ));
        }
        assert!(gen.transport().writes().is_empty());
    }

    #[test]
    fn test_resolution_follows_table() {
        let mut gen = Generator::new(Mock::generator());
        gen.set_waveform(&[0i16; 1024]).unwrap();
        gen.set_freq_phase(1000.0, 0.0).unwrap();
        let coarse = gen.frequency_resolution().unwrap();
        gen.set_waveform(&vec![0i16; TABLE_LEN]).unwrap();
        assert!(gen.frequency_resolution().unwrap() < coarse);
    }
}
