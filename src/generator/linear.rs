//! The linear output stage, `out = table * amplitude + offset`, in signed fixed point

use super::{
    Error,
    Generator,
};
use crate::{
    consts::{
        Multiplier,
        Summand,
    },
    core::{
        LIN_MUL,
        LIN_SUM,
    },
    transport::Transport,
};
use fixed::traits::Fixed;
use tracing::{
    debug,
    warn,
};

/// Round `value` onto the grid of `F` with ties away from zero, wrapping what doesn't fit
fn encode<F: Fixed>(value: f32) -> F {
    let scale = f64::from(F::FRAC_NBITS).exp2();
    // Scaling by a power of two is exact, so `fixed` only ever sees a value on its grid
    F::wrapping_from_num((f64::from(value) * scale).round() / scale)
}

impl<T> Generator<T>
where
    T: Transport,
{
    /// Set the output amplitude and offset.
    ///
    /// Both are rounded to the nearest fixed-point step. Values beyond what the 32-bit registers
    /// hold wrap around, which is what the hardware would do with them anyway.
    /// # Errors
    /// Returns an error on bad transport or if either value is NaN or infinite
    pub fn set_linear(&mut self, amplitude: f32, offset: f32) -> Result<(), Error> {
        if !amplitude.is_finite() || !offset.is_finite() {
            warn!(amplitude, offset, "rejecting non-finite linear stage setting");
            return Err(Error::NonFinite);
        }
        let mul: Multiplier = encode(amplitude);
        let sum: Summand = encode(offset);
        debug!(amplitude, offset, mul = mul.to_bits(), sum = sum.to_bits(), "set linear");
        self.transport.write(&LIN_MUL, 0, &mul)?;
        self.transport.write(&LIN_SUM, 0, &sum)?;
        Ok(())
    }

    /// Get the output amplitude and offset
    /// # Errors
    /// Returns an error on bad transport
    pub fn linear(&self) -> Result<(f32, f32), Error> {
        let mul: Multiplier = self.transport.read(&LIN_MUL, 0)?;
        let sum: Summand = self.transport.read(&LIN_SUM, 0)?;
        Ok((mul.to_num(), sum.to_num()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        consts::{
            RP_GEN_DWM,
            RP_GEN_DWS,
        },
        transport::mock::Mock,
    };

    #[test]
    fn test_linear_roundtrip() {
        let mut gen = Generator::new(Mock::generator());
        let step_mul = 1.0 / f32::from(1u16 << RP_GEN_DWM);
        let step_sum = 1.0 / f32::from(1u16 << RP_GEN_DWS);
        for (amplitude, offset) in [(-1.0, 0.0), (-0.333, 0.1), (0.0, -0.75), (0.999, 0.123_45)] {
            gen.set_linear(amplitude, offset).unwrap();
            let (a, o) = gen.linear().unwrap();
            assert!((a - amplitude).abs() <= step_mul, "{a} vs {amplitude}");
            assert!((o - offset).abs() <= step_sum, "{o} vs {offset}");
        }
    }

    #[test]
    fn test_linear_encoding() {
        let mut gen = Generator::new(Mock::generator());
        gen.set_linear(0.5, -0.25).unwrap();
        assert_eq!(gen.transport().read::<i32>(&LIN_MUL, 0).unwrap(), 1 << 13);
        assert_eq!(gen.transport().read::<i32>(&LIN_SUM, 0).unwrap(), -(1 << 12));
    }

    #[test]
    fn test_linear_rounds_to_nearest() {
        let mut gen = Generator::new(Mock::generator());
        // 0.7 * 2^14 = 11468.8
        gen.set_linear(0.7, 0.0).unwrap();
        assert_eq!(gen.transport().read::<i32>(&LIN_MUL, 0).unwrap(), 11469);
        // Exact half steps round away from zero
        gen.set_linear(2.5 / 16384.0, 0.5 / 16384.0).unwrap();
        assert_eq!(gen.transport().read::<i32>(&LIN_MUL, 0).unwrap(), 3);
        assert_eq!(gen.transport().read::<i32>(&LIN_SUM, 0).unwrap(), 1);
        gen.set_linear(-2.5 / 16384.0, -1.5 / 16384.0).unwrap();
        assert_eq!(gen.transport().read::<i32>(&LIN_MUL, 0).unwrap(), -3);
        assert_eq!(gen.transport().read::<i32>(&LIN_SUM, 0).unwrap(), -2);
    }

    #[test]
    fn test_linear_wraps() {
        let mut gen = Generator::new(Mock::generator());
        // 2^17 * 2^14 is one past i32::MAX
        gen.set_linear(131_072.0, 0.0).unwrap();
        assert_eq!(gen.transport().read::<i32>(&LIN_MUL, 0).unwrap(), i32::MIN);
    }

    #[test]
    fn test_linear_rejects_nan() {
        let mut gen = Generator::new(Mock::generator());
        assert!(matches!(
            gen.set_linear(f32::NAN, 0.0),
            Err(Error::NonFinite)
        ));
        assert!(gen.transport().writes().is_empty());
    }
}
