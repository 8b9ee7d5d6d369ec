use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::profile::records::{HalfHourlyRecord, TemperatureBand};
use crate::time_util::slot_time::SlotTime;

/// A maximal run of consecutive records sharing one temperature band.
/// Derived from the records each time they change, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Position in the chunk sequence it was computed in.
    index: usize,
    start_time: SlotTime,
    /// Start of the last slot in the run, not the end of it.
    end_time: SlotTime,
    band: TemperatureBand,
    is_first: bool,
    is_last: bool,
}

impl Chunk {
    pub fn get_index(&self) -> usize {
        self.index
    }

    pub fn get_start_time(&self) -> SlotTime {
        self.start_time
    }

    pub fn get_end_time(&self) -> SlotTime {
        self.end_time
    }

    /// When the last slot of this chunk finishes, `00:00` for a chunk running to the end of the day.
    pub fn get_exclusive_end(&self) -> SlotTime {
        self.end_time.end_of_slot()
    }

    pub fn get_band(&self) -> TemperatureBand {
        self.band
    }

    pub fn is_first(&self) -> bool {
        self.is_first
    }

    pub fn is_last(&self) -> bool {
        self.is_last
    }

    /// Slots covered. A chunk from out of order records ends before it starts and counts one.
    pub fn slot_count(&self) -> usize {
        self.end_time.index().saturating_sub(self.start_time.index()) + 1
    }

    pub fn contains(&self, slot: SlotTime) -> bool {
        self.start_time <= slot && slot <= self.end_time
    }
}

impl Display for Chunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{},{}]@{}", self.start_time, self.end_time, self.band)
    }
}

/// Group consecutive records with identical bands into chunks, in record order.
/// The records should be in slot order, as [`DayRecords`](crate::profile::records::DayRecords) keeps them.
pub fn compress(records: &[HalfHourlyRecord]) -> Vec<Chunk> {
    let grouped = records.iter().group_by(|record| record.band());
    let runs: Vec<(TemperatureBand, SlotTime, SlotTime)> = (&grouped)
        .into_iter()
        .filter_map(|(band, mut run)| {
            let first = run.next()?;
            let last = run.last().unwrap_or(first);
            Some((band, first.get_from_time(), last.get_from_time()))
        })
        .collect();

    let count = runs.len();
    runs.into_iter()
        .enumerate()
        .map(|(index, (band, start_time, end_time))| Chunk {
            index,
            start_time,
            end_time,
            band,
            is_first: index == 0,
            is_last: index + 1 == count,
        })
        .collect()
}

/// Expand chunks back out to one band per slot.
pub fn expand(chunks: &[Chunk]) -> Vec<TemperatureBand> {
    chunks
        .iter()
        .flat_map(|chunk| std::iter::repeat(chunk.band).take(chunk.slot_count()))
        .collect()
}

/// The chunk covering the given slot, for turning a click on the chart into a chunk.
pub fn chunk_at(chunks: &[Chunk], slot: SlotTime) -> Option<&Chunk> {
    chunks.iter().find(|chunk| chunk.contains(slot))
}
