use crate::{error::CliError, settings::LayoutArgs};
use jiff::Timestamp;
use serde::Serialize;
use snowworker_flake::{Clock, Snowflake, SnowflakeId, SystemClock, TickClock};
use std::io::Write;
use tracing::debug;

/// Writes `count` fresh ids, one per line.
pub fn write_ids<C: Clock>(
    generator: &Snowflake<C>,
    count: usize,
    out: &mut impl Write,
) -> Result<(), CliError> {
    for _ in 0..count {
        let id = generator.next_id()?;
        writeln!(out, "{id}")?;
    }
    debug!(count, worker_id = generator.worker_id(), "ids written");
    Ok(())
}

/// The fields of an id, resolved against a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedId {
    pub id: SnowflakeId,
    pub tick: i64,
    pub worker_id: u32,
    pub sequence: u32,
    pub timestamp: Option<Timestamp>,
}

/// Fails if the layout flags are not a layout the generator would accept.
pub fn decode(layout: &LayoutArgs, id: SnowflakeId) -> Result<DecodedId, CliError> {
    layout.options(0).validate()?;
    let parts = layout.layout().decompose(id);
    let timestamp = TickClock::new(SystemClock, layout.base_time, layout.time_unit_millis)
        .timestamp_of(parts.tick);

    Ok(DecodedId {
        id,
        tick: parts.tick,
        worker_id: parts.worker_id,
        sequence: parts.sequence,
        timestamp,
    })
}

pub fn write_decoded(
    decoded: &[DecodedId],
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if json {
        serde_json::to_writer_pretty(&mut *out, decoded)?;
        writeln!(out)?;
        return Ok(());
    }

    for entry in decoded {
        let timestamp = entry
            .timestamp
            .map_or_else(|| "-".to_string(), |ts| ts.to_string());
        writeln!(
            out,
            "{}\ttick={}\tworker_id={}\tsequence={}\ttimestamp={}",
            entry.id, entry.tick, entry.worker_id, entry.sequence, timestamp
        )?;
    }
    Ok(())
}
