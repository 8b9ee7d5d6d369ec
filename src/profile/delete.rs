use std::fmt::{Display, Formatter};

use log::debug;

use crate::profile::chunks::Chunk;
use crate::profile::records::{DayRecords, HalfHourlyRecord};
use crate::time_util::slot_time::SlotTime;

/// Why a delete left the records as they were.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteRejected {
    NoRecords,
    /// Nothing precedes the first chunk to merge it into.
    FirstChunk,
    /// The editing surface keeps the last chunk so the day still ends on a chosen band.
    LastChunk,
    UnknownChunk { index: usize },
    /// No record starts where the chunk does.
    NotInRecords { start: SlotTime },
}

impl Display for DeleteRejected {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteRejected::NoRecords => write!(f, "There are no records to delete from."),
            DeleteRejected::FirstChunk => write!(f, "The first period of the day cannot be deleted."),
            DeleteRejected::LastChunk => write!(f, "The last period of the day cannot be deleted."),
            DeleteRejected::UnknownChunk { index } => write!(f, "There is no period {}.", index + 1),
            DeleteRejected::NotInRecords { start } => write!(f, "No record starts at {}.", start),
        }
    }
}

impl std::error::Error for DeleteRejected {}

/// Extend the band of the record just before `start` over every record from `start`
/// through `end` inclusive.
pub fn merge_into_previous(
    records: &[HalfHourlyRecord],
    start: SlotTime,
    end: SlotTime,
) -> Result<Vec<HalfHourlyRecord>, DeleteRejected> {
    if records.is_empty() {
        return Err(DeleteRejected::NoRecords);
    }
    let position = records
        .iter()
        .position(|record| record.get_from_time() == start)
        .ok_or(DeleteRejected::NotInRecords { start })?;
    if position == 0 {
        return Err(DeleteRejected::FirstChunk);
    }

    let merge_band = records[position - 1].band();
    debug!("Merging {}-{} into previous band {}", start, end, merge_band);
    Ok(records
        .iter()
        .map(|record| {
            let from = record.get_from_time();
            if from >= start && from <= end {
                record.with_band(merge_band)
            } else {
                *record
            }
        })
        .collect())
}

/// Delete a chunk by absorbing it into the chunk before it.
pub fn delete_chunk(records: &DayRecords, chunk: &Chunk) -> Result<DayRecords, DeleteRejected> {
    merge_into_previous(records.records(), chunk.get_start_time(), chunk.get_end_time())
        .map(DayRecords::from_full_day)
}
