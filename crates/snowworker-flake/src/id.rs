use serde::{Deserialize, Serialize};
use std::fmt;

/// A generated id.
///
/// Compare and store it as an opaque 64-bit key; the sign bit is always
/// clear, so the `u64` and `i64` views agree.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnowflakeId(u64);

impl SnowflakeId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    pub const fn as_i64(self) -> i64 {
        self.0 as i64
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SnowflakeId").field(&self.0).finish()
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.as_u64()
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.as_i64()
    }
}

/// The fields packed into a [`SnowflakeId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IdParts {
    pub tick: i64,
    pub worker_id: u32,
    pub sequence: u32,
}

/// Bit layout of an id, most to least significant:
/// `tick | worker_id | sequence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdLayout {
    worker_id_bits: u8,
    seq_bits: u8,
}

impl IdLayout {
    pub const fn new(worker_id_bits: u8, seq_bits: u8) -> Self {
        Self {
            worker_id_bits,
            seq_bits,
        }
    }

    pub const fn worker_id_bits(&self) -> u8 {
        self.worker_id_bits
    }

    pub const fn seq_bits(&self) -> u8 {
        self.seq_bits
    }

    /// Bits left for the tick once the sign bit is reserved.
    pub const fn tick_bits(&self) -> u8 {
        63 - self.worker_id_bits - self.seq_bits
    }

    pub const fn max_tick(&self) -> i64 {
        (1_i64 << self.tick_bits()) - 1
    }

    /// Packs the three fields, or `None` if any of them does not fit its
    /// width (including a negative tick).
    pub fn compose(&self, tick: i64, worker_id: u32, sequence: u32) -> Option<SnowflakeId> {
        let fits_tick = (0..=self.max_tick()).contains(&tick);
        let fits_worker = u64::from(worker_id) < (1_u64 << self.worker_id_bits);
        let fits_sequence = u64::from(sequence) < (1_u64 << self.seq_bits);
        if !(fits_tick && fits_worker && fits_sequence) {
            return None;
        }

        let raw = ((tick as u64) << (self.worker_id_bits + self.seq_bits))
            | (u64::from(worker_id) << self.seq_bits)
            | u64::from(sequence);
        Some(SnowflakeId(raw))
    }

    pub fn decompose(&self, id: SnowflakeId) -> IdParts {
        let raw = id.as_u64();
        let seq_mask = (1_u64 << self.seq_bits) - 1;
        let worker_mask = (1_u64 << self.worker_id_bits) - 1;
        IdParts {
            tick: (raw >> (self.worker_id_bits + self.seq_bits)) as i64,
            worker_id: ((raw >> self.seq_bits) & worker_mask) as u32,
            sequence: (raw & seq_mask) as u32,
        }
    }
}
