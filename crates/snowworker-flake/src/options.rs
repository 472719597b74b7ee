use crate::{error::ConfigError, id::IdLayout};
use jiff::Timestamp;
use typed_builder::TypedBuilder;

/// `2020-02-20T02:20:02.020Z`
pub const DEFAULT_BASE_TIME: Timestamp = Timestamp::constant(1_582_165_202, 20_000_000);

pub const DEFAULT_WORKER_ID_BITS: u8 = 6;
pub const DEFAULT_SEQ_BITS: u8 = 6;

pub(crate) const MIN_WORKER_ID_BITS: u8 = 1;
pub(crate) const MAX_WORKER_ID_BITS: u8 = 15;
pub(crate) const MIN_SEQ_BITS: u8 = 3;
pub(crate) const MAX_SEQ_BITS: u8 = 21;
/// Worker id and sequence share this many bits; the rest of the 63 usable
/// bits belong to the tick.
pub(crate) const MAX_WORKER_AND_SEQ_BITS: u8 = 22;

/// How the sequence counter is seeded at the start of every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SequenceStrategy {
    /// Every tick starts at exactly `min_seq_number`.
    #[default]
    Baseline,
    /// Every tick starts at `min_seq_number + r`, with `r` drawn uniformly
    /// from `0..=max_offset`.
    Randomized { max_offset: u32 },
}

impl SequenceStrategy {
    pub fn max_offset(&self) -> u32 {
        match self {
            SequenceStrategy::Baseline => 0,
            SequenceStrategy::Randomized { max_offset } => *max_offset,
        }
    }
}

/// Configures a [`Snowflake`](crate::Snowflake) generator instance.
///
/// Options are checked once by [`GeneratorOptions::validate`] when the
/// generator is built and never change afterwards. A different worker
/// identity needs a new generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct GeneratorOptions {
    /// Identity of this process among its peers, in `0..2^worker_id_bits`.
    pub worker_id: u32,
    #[builder(default = DEFAULT_WORKER_ID_BITS)]
    pub worker_id_bits: u8,
    #[builder(default = DEFAULT_SEQ_BITS)]
    pub seq_bits: u8,
    /// Zero point of the tick field.
    #[builder(default = DEFAULT_BASE_TIME)]
    pub base_time: Timestamp,
    /// Milliseconds covered by one tick.
    #[builder(default = 1)]
    pub time_unit_millis: u32,
    #[builder(default = 0)]
    pub min_seq_number: u32,
    #[builder(default)]
    pub strategy: SequenceStrategy,
}

impl GeneratorOptions {
    pub fn max_worker_id(&self) -> u32 {
        (1_u32 << self.worker_id_bits) - 1
    }

    pub fn max_seq_number(&self) -> u32 {
        (1_u32 << self.seq_bits) - 1
    }

    pub fn layout(&self) -> IdLayout {
        IdLayout::new(self.worker_id_bits, self.seq_bits)
    }

    /// Checks every field against the others.
    ///
    /// Bit widths are checked first so the derived maxima below never shift
    /// out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_WORKER_ID_BITS..=MAX_WORKER_ID_BITS).contains(&self.worker_id_bits) {
            return Err(ConfigError::InvalidWorkerIdBits {
                bits: self.worker_id_bits,
                min: MIN_WORKER_ID_BITS,
                max: MAX_WORKER_ID_BITS,
            });
        }

        if !(MIN_SEQ_BITS..=MAX_SEQ_BITS).contains(&self.seq_bits) {
            return Err(ConfigError::InvalidSeqBits {
                bits: self.seq_bits,
                min: MIN_SEQ_BITS,
                max: MAX_SEQ_BITS,
            });
        }

        if self.worker_id_bits + self.seq_bits > MAX_WORKER_AND_SEQ_BITS {
            return Err(ConfigError::BitBudgetExceeded {
                worker_id_bits: self.worker_id_bits,
                seq_bits: self.seq_bits,
                max: MAX_WORKER_AND_SEQ_BITS,
            });
        }

        if self.worker_id > self.max_worker_id() {
            return Err(ConfigError::InvalidWorkerId {
                worker_id: self.worker_id,
                max_worker_id: self.max_worker_id(),
            });
        }

        if self.time_unit_millis == 0 {
            return Err(ConfigError::ZeroTimeUnit);
        }

        let max_offset = self.strategy.max_offset();
        let highest_start = u64::from(self.min_seq_number) + u64::from(max_offset);
        if highest_start > u64::from(self.max_seq_number()) {
            return Err(ConfigError::EmptySequenceRange {
                min_seq_number: self.min_seq_number,
                max_offset,
                max_seq_number: self.max_seq_number(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(worker_id: u32) -> GeneratorOptions {
        GeneratorOptions::builder().worker_id(worker_id).build()
    }

    #[test]
    fn defaults_are_valid() {
        let options = options(0);
        assert_eq!(options.worker_id_bits, 6);
        assert_eq!(options.seq_bits, 6);
        assert_eq!(options.time_unit_millis, 1);
        assert_eq!(options.min_seq_number, 0);
        assert_eq!(options.strategy, SequenceStrategy::Baseline);
        assert_eq!(
            options.base_time,
            "2020-02-20T02:20:02.020Z".parse::<Timestamp>().unwrap()
        );
        assert_eq!(options.validate(), Ok(()));
    }

    #[test]
    fn derived_maxima_follow_bit_widths() {
        let options = GeneratorOptions::builder()
            .worker_id(0)
            .worker_id_bits(10)
            .seq_bits(12)
            .build();
        assert_eq!(options.max_worker_id(), 1023);
        assert_eq!(options.max_seq_number(), 4095);
    }

    #[test]
    fn worker_id_must_fit_its_bits() {
        assert_eq!(options(63).validate(), Ok(()));
        assert_eq!(
            options(64).validate(),
            Err(ConfigError::InvalidWorkerId {
                worker_id: 64,
                max_worker_id: 63,
            })
        );
    }

    #[test]
    fn bit_widths_are_range_checked() {
        let no_worker_bits = GeneratorOptions::builder()
            .worker_id(0)
            .worker_id_bits(0)
            .build();
        assert!(matches!(
            no_worker_bits.validate(),
            Err(ConfigError::InvalidWorkerIdBits { bits: 0, .. })
        ));

        let tiny_seq = GeneratorOptions::builder().worker_id(0).seq_bits(2).build();
        assert!(matches!(
            tiny_seq.validate(),
            Err(ConfigError::InvalidSeqBits { bits: 2, .. })
        ));
    }

    #[test]
    fn combined_bits_respect_budget() {
        let at_budget = GeneratorOptions::builder()
            .worker_id(0)
            .worker_id_bits(10)
            .seq_bits(12)
            .build();
        assert_eq!(at_budget.validate(), Ok(()));

        let over_budget = GeneratorOptions::builder()
            .worker_id(0)
            .worker_id_bits(10)
            .seq_bits(13)
            .build();
        assert_eq!(
            over_budget.validate(),
            Err(ConfigError::BitBudgetExceeded {
                worker_id_bits: 10,
                seq_bits: 13,
                max: 22,
            })
        );
    }

    #[test]
    fn zero_time_unit_is_rejected() {
        let options = GeneratorOptions::builder()
            .worker_id(0)
            .time_unit_millis(0)
            .build();
        assert_eq!(options.validate(), Err(ConfigError::ZeroTimeUnit));
    }

    #[test]
    fn randomized_offset_must_leave_a_sequence_range() {
        let fits = GeneratorOptions::builder()
            .worker_id(0)
            .min_seq_number(5)
            .strategy(SequenceStrategy::Randomized { max_offset: 58 })
            .build();
        assert_eq!(fits.validate(), Ok(()));

        let too_wide = GeneratorOptions::builder()
            .worker_id(0)
            .min_seq_number(5)
            .strategy(SequenceStrategy::Randomized { max_offset: 59 })
            .build();
        assert_eq!(
            too_wide.validate(),
            Err(ConfigError::EmptySequenceRange {
                min_seq_number: 5,
                max_offset: 59,
                max_seq_number: 63,
            })
        );
    }
}
