use crate::{
    clock::{Clock, SystemClock, TickClock},
    error::{ConfigError, GeneratorError},
    id::{IdLayout, IdParts, SnowflakeId},
    options::GeneratorOptions,
    sequence::{Allocation, SequenceAllocator},
};
use jiff::Timestamp;
use parking_lot::Mutex;
use tracing::{debug, warn};

#[derive(Debug)]
struct GeneratorState {
    last_tick: Option<i64>,
    allocator: SequenceAllocator,
}

/// Snowflake id generator for one worker id.
///
/// Ids from one instance are strictly increasing no matter how many threads
/// share it. Run one instance per worker id; never run two live instances
/// with the same worker id.
pub struct Snowflake<C: Clock> {
    options: GeneratorOptions,
    layout: IdLayout,
    clock: TickClock<C>,
    state: Mutex<GeneratorState>,
}

impl Snowflake<SystemClock> {
    /// Creates a generator backed by the real system clock.
    pub fn new(options: GeneratorOptions) -> Result<Self, ConfigError> {
        Self::with_clock(options, SystemClock)
    }
}

impl<C: Clock> Snowflake<C> {
    pub fn with_clock(options: GeneratorOptions, clock: C) -> Result<Self, ConfigError> {
        Self::with_allocator(options, clock, SequenceAllocator::from_options(&options))
    }

    pub(crate) fn with_allocator(
        options: GeneratorOptions,
        clock: C,
        allocator: SequenceAllocator,
    ) -> Result<Self, ConfigError> {
        options.validate()?;

        let now = clock.now();
        if options.base_time > now {
            return Err(ConfigError::EpochAhead {
                base_time: options.base_time,
                now,
            });
        }

        let layout = options.layout();
        let clock = TickClock::new(clock, options.base_time, options.time_unit_millis);
        let tick = clock.current_tick();
        if tick > layout.max_tick() {
            return Err(ConfigError::EpochExhausted {
                tick,
                max_tick: layout.max_tick(),
            });
        }

        debug!(
            worker_id = options.worker_id,
            worker_id_bits = options.worker_id_bits,
            seq_bits = options.seq_bits,
            time_unit_millis = options.time_unit_millis,
            strategy = ?options.strategy,
            "snowflake generator ready"
        );

        Ok(Self {
            options,
            layout,
            clock,
            state: Mutex::new(GeneratorState {
                last_tick: None,
                allocator,
            }),
        })
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn worker_id(&self) -> u32 {
        self.options.worker_id
    }

    pub fn layout(&self) -> IdLayout {
        self.layout
    }

    /// Generates the next id.
    ///
    /// - if the tick's sequence space is used up, wait for the next tick
    /// - if the clock moved backwards, fail without touching any state
    ///
    /// Before the first id the floor is tick 0, so a clock that falls behind
    /// the base time is reported as a regression too.
    pub fn next_id(&self) -> Result<SnowflakeId, GeneratorError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let mut tick = self.clock.current_tick();

        let floor = state.last_tick.unwrap_or(0);
        if tick < floor {
            warn!(
                worker_id = self.options.worker_id,
                last_tick = floor,
                current_tick = tick,
                "clock moved backwards"
            );
            return Err(GeneratorError::ClockRegression {
                delta_ticks: floor - tick,
                last_tick: floor,
                current_tick: tick,
            });
        }

        let sequence = match state.allocator.allocate(tick, state.last_tick) {
            Allocation::Sequence(sequence) => sequence,
            Allocation::Overflow => {
                debug!(tick, "sequence exhausted, waiting for next tick");
                tick = self.clock.next_tick(tick);
                state.allocator.reset()
            }
        };

        let id = self
            .layout
            .compose(tick, self.options.worker_id, sequence)
            .ok_or(GeneratorError::EpochExhausted {
                tick,
                max_tick: self.layout.max_tick(),
            })?;

        state.last_tick = Some(tick);

        Ok(id)
    }

    pub fn decompose(&self, id: SnowflakeId) -> IdParts {
        self.layout.decompose(id)
    }

    /// Start of the tick encoded in `id`.
    pub fn timestamp_of(&self, id: SnowflakeId) -> Option<Timestamp> {
        self.clock.timestamp_of(self.layout.decompose(id).tick)
    }
}
