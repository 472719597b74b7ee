use crate::options::{GeneratorOptions, SequenceStrategy};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Result of asking the allocator for a sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    Sequence(u32),
    /// The current tick has no sequence numbers left.
    Overflow,
}

#[derive(Debug)]
enum Seed {
    Fixed,
    Random { rng: StdRng, max_offset: u32 },
}

/// Per-tick sequence counter.
///
/// Only [`Snowflake`](crate::Snowflake) drives it, and only while holding
/// its lock.
#[derive(Debug)]
pub struct SequenceAllocator {
    min_seq_number: u32,
    max_seq_number: u32,
    current: u32,
    seed: Seed,
}

impl SequenceAllocator {
    /// Every tick starts at exactly `min_seq_number`.
    pub fn baseline(min_seq_number: u32, max_seq_number: u32) -> Self {
        Self {
            min_seq_number,
            max_seq_number,
            current: min_seq_number,
            seed: Seed::Fixed,
        }
    }

    /// Every tick starts at `min_seq_number` plus a fresh offset in
    /// `0..=max_offset`, drawn from an rng seeded by the thread rng.
    pub fn randomized(min_seq_number: u32, max_seq_number: u32, max_offset: u32) -> Self {
        Self::randomized_with_rng(
            min_seq_number,
            max_seq_number,
            max_offset,
            StdRng::from_rng(&mut rand::rng()),
        )
    }

    pub fn randomized_with_rng(
        min_seq_number: u32,
        max_seq_number: u32,
        max_offset: u32,
        rng: StdRng,
    ) -> Self {
        Self {
            min_seq_number,
            max_seq_number,
            current: min_seq_number,
            seed: Seed::Random { rng, max_offset },
        }
    }

    pub fn from_options(options: &GeneratorOptions) -> Self {
        match options.strategy {
            SequenceStrategy::Baseline => {
                Self::baseline(options.min_seq_number, options.max_seq_number())
            }
            SequenceStrategy::Randomized { max_offset } => Self::randomized(
                options.min_seq_number,
                options.max_seq_number(),
                max_offset,
            ),
        }
    }

    pub fn min_seq_number(&self) -> u32 {
        self.min_seq_number
    }

    pub fn max_seq_number(&self) -> u32 {
        self.max_seq_number
    }

    /// The last sequence number handed out.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Picks the sequence number for `current_tick`.
    ///
    /// A tick other than `last_tick` always starts fresh and never overflows.
    /// On overflow the counter is left as is; the caller waits for a later
    /// tick and calls [`reset`](Self::reset).
    pub fn allocate(&mut self, current_tick: i64, last_tick: Option<i64>) -> Allocation {
        if last_tick != Some(current_tick) {
            return Allocation::Sequence(self.reset());
        }

        match self.current.checked_add(1) {
            Some(next) if next <= self.max_seq_number => {
                self.current = next;
                Allocation::Sequence(next)
            }
            _ => Allocation::Overflow,
        }
    }

    /// Starts a new tick and returns its first sequence number.
    pub fn reset(&mut self) -> u32 {
        self.current = match &mut self.seed {
            Seed::Fixed => self.min_seq_number,
            Seed::Random { rng, max_offset } => {
                self.min_seq_number + rng.random_range(0..=*max_offset)
            }
        };
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn seeded(min: u32, max: u32, offset: u32) -> SequenceAllocator {
        SequenceAllocator::randomized_with_rng(min, max, offset, StdRng::seed_from_u64(7))
    }

    #[test]
    fn new_tick_starts_at_min() {
        let mut allocator = SequenceAllocator::baseline(0, 7);
        assert_eq!(allocator.allocate(10, None), Allocation::Sequence(0));
        assert_eq!(allocator.allocate(10, Some(10)), Allocation::Sequence(1));
        assert_eq!(allocator.allocate(11, Some(10)), Allocation::Sequence(0));
    }

    #[test]
    fn same_tick_overflows_past_max() {
        let mut allocator = SequenceAllocator::baseline(0, 3);
        assert_eq!(allocator.allocate(10, None), Allocation::Sequence(0));
        for expected in 1..=3 {
            assert_eq!(
                allocator.allocate(10, Some(10)),
                Allocation::Sequence(expected)
            );
        }
        assert_eq!(allocator.allocate(10, Some(10)), Allocation::Overflow);
        // still exhausted, counter untouched
        assert_eq!(allocator.allocate(10, Some(10)), Allocation::Overflow);
        assert_eq!(allocator.current(), 3);

        assert_eq!(allocator.reset(), 0);
        assert_eq!(allocator.allocate(11, Some(11)), Allocation::Sequence(1));
    }

    #[test]
    fn baseline_respects_configured_min() {
        let mut allocator = SequenceAllocator::baseline(5, 7);
        assert_eq!(allocator.allocate(1, None), Allocation::Sequence(5));
        assert_eq!(allocator.allocate(1, Some(1)), Allocation::Sequence(6));
        assert_eq!(allocator.allocate(1, Some(1)), Allocation::Sequence(7));
        assert_eq!(allocator.allocate(1, Some(1)), Allocation::Overflow);
        assert_eq!(allocator.allocate(2, Some(1)), Allocation::Sequence(5));
    }

    #[test]
    fn baseline_start_is_always_min() {
        let mut allocator = SequenceAllocator::baseline(0, 63);
        for tick in 0..100 {
            assert_eq!(allocator.allocate(tick, Some(tick - 1)), Allocation::Sequence(0));
        }
    }

    #[test]
    fn randomized_start_varies_within_offset() {
        let mut allocator = seeded(2, 63, 7);
        let starts: HashSet<u32> = (0..200)
            .map(|tick| match allocator.allocate(tick, Some(tick - 1)) {
                Allocation::Sequence(seq) => seq,
                Allocation::Overflow => panic!("fresh tick must not overflow"),
            })
            .collect();

        assert!(starts.len() > 1, "start values should not be constant");
        assert!(starts.iter().all(|seq| (2..=9).contains(seq)));
    }

    #[test]
    fn randomized_overflow_matches_baseline() {
        let mut allocator = seeded(0, 15, 3);
        let Allocation::Sequence(start) = allocator.allocate(1, None) else {
            panic!("fresh tick must not overflow");
        };
        for expected in start + 1..=15 {
            assert_eq!(
                allocator.allocate(1, Some(1)),
                Allocation::Sequence(expected)
            );
        }
        assert_eq!(allocator.allocate(1, Some(1)), Allocation::Overflow);
        assert!((0..=3).contains(&allocator.reset()));
    }

    #[test]
    fn from_options_picks_strategy() {
        let options = GeneratorOptions::builder()
            .worker_id(0)
            .seq_bits(4)
            .min_seq_number(1)
            .build();
        let allocator = SequenceAllocator::from_options(&options);
        assert_eq!(allocator.min_seq_number(), 1);
        assert_eq!(allocator.max_seq_number(), 15);
        assert!(matches!(allocator.seed, Seed::Fixed));

        let options = GeneratorOptions::builder()
            .worker_id(0)
            .strategy(SequenceStrategy::Randomized { max_offset: 4 })
            .build();
        let allocator = SequenceAllocator::from_options(&options);
        assert!(matches!(
            allocator.seed,
            Seed::Random { max_offset: 4, .. }
        ));
    }
}
