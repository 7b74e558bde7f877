//! Transfer of the waveform lookup table

use super::{
    Error,
    Generator,
};
use crate::{
    consts::{
        RP_GEN_CWM,
        SAMPLE_MAX,
        SAMPLE_MIN,
        TABLE_LEN,
        WORD,
    },
    core::{
        CFG_SIZ,
        TABLE,
    },
    transport::Transport,
};
use tracing::{
    debug,
    warn,
};

impl<T> Generator<T>
where
    T: Transport,
{
    /// Load `samples` into the waveform table and program the table size.
    ///
    /// Every sample must fit the signed output width ([`SAMPLE_MIN`]..=[`SAMPLE_MAX`]). The whole
    /// waveform is checked before the first write, so a rejected waveform leaves the table as it
    /// was. The length should be a power of two no larger than [`TABLE_LEN`].
    /// # Errors
    /// Returns [`Error::TableSize`] for an empty or oversized waveform, [`Error::Normalization`]
    /// for the first sample out of range, or an error on bad transport
    pub fn set_waveform(&mut self, samples: &[i16]) -> Result<(), Error> {
        if samples.is_empty() || samples.len() > TABLE_LEN {
            warn!(len = samples.len(), "rejecting waveform that doesn't fit the table");
            return Err(Error::TableSize(samples.len()));
        }
        if let Some((index, &value)) = samples
            .iter()
            .enumerate()
            .find(|(_, s)| !(SAMPLE_MIN..=SAMPLE_MAX).contains(*s))
        {
            warn!(index, value, "rejecting unnormalized waveform");
            return Err(Error::Normalization { index, value });
        }
        let len = u32::try_from(samples.len()).map_err(|_| Error::TableSize(samples.len()))?;
        for (i, sample) in samples.iter().enumerate() {
            self.transport.write(&TABLE, i * WORD, sample)?;
        }
        let siz = (len << RP_GEN_CWM) - 1;
        debug!(len, siz, "set waveform");
        self.transport.write(&CFG_SIZ, 0, &siz)?;
        Ok(())
    }

    /// Read back the waveform table, as long as the currently programmed table size
    /// # Errors
    /// Returns an error on bad transport
    pub fn waveform(&self) -> Result<Vec<i16>, Error> {
        let siz: u32 = self.transport.read(&CFG_SIZ, 0)?;
        let len = usize::try_from((u64::from(siz) + 1) >> RP_GEN_CWM)
            .unwrap_or(TABLE_LEN)
            .min(TABLE_LEN);
        (0..len)
            .map(|i| self.transport.read(&TABLE, i * WORD).map_err(Error::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        consts::RP_GEN_DWO,
        transport::mock::Mock,
    };

    #[test]
    fn test_zeros_roundtrip() {
        let mut gen = Generator::new(Mock::generator());
        gen.set_waveform(&vec![0i16; TABLE_LEN]).unwrap();
        let table = gen.waveform().unwrap();
        assert_eq!(table.len(), TABLE_LEN);
        assert!(table.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_ramp_roundtrip() {
        let mut gen = Generator::new(Mock::generator());
        let ramp: Vec<i16> = (SAMPLE_MIN..=SAMPLE_MAX).step_by(64).collect();
        assert_eq!(ramp.len(), 256);
        gen.set_waveform(&ramp).unwrap();
        assert_eq!(gen.waveform().unwrap(), ramp);
        assert_eq!(
            gen.transport().read::<u32>(&CFG_SIZ, 0).unwrap(),
            (256 << RP_GEN_CWM) - 1
        );
    }

    #[test]
    fn test_unnormalized_rejected() {
        let mut gen = Generator::new(Mock::generator());
        let mut samples = vec![1i16; 64];
        samples[40] = 1 << RP_GEN_DWO;
        assert!(matches!(
            gen.set_waveform(&samples),
            Err(Error::Normalization {
                index: 40,
                value: 16384
            })
        ));
        // Validation happens up front, nothing reaches the table
        assert!(gen.transport().writes().is_empty());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let mut gen = Generator::new(Mock::generator());
        gen.set_waveform(&[SAMPLE_MIN, SAMPLE_MAX]).unwrap();
        assert!(gen.set_waveform(&[SAMPLE_MAX + 1]).is_err());
        assert!(gen.set_waveform(&[SAMPLE_MIN - 1]).is_err());
        assert_eq!(gen.waveform().unwrap(), [SAMPLE_MIN, SAMPLE_MAX]);
    }

    #[test]
    fn test_table_size_rejected() {
        let mut gen = Generator::new(Mock::generator());
        assert!(matches!(gen.set_waveform(&[]), Err(Error::TableSize(0))));
        assert!(matches!(
            gen.set_waveform(&vec![0i16; TABLE_LEN + 1]),
            Err(Error::TableSize(_))
        ));
    }

    #[test]
    fn test_unprogrammed_table_reads_empty() {
        let gen = Generator::new(Mock::generator());
        // cfg_siz = 0 means a single accumulator step, less than one sample
        assert!(gen.waveform().unwrap().is_empty());
    }
}
