use std::fmt::{Display, Formatter};

use log::debug;

use crate::profile::chunks::{compress, Chunk};
use crate::profile::records::{DayRecords, HalfHourlyRecord, TemperatureBand};
use crate::time_util::slot_time::SlotTime;

/// Smallest allowed gap between the low and high temperature of a band, in degrees.
pub const DEFAULT_MIN_BAND_WIDTH: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    /// The chunk at this index of the current chunk sequence.
    Existing(usize),
    New,
}

/// A proposed time range and band, covering every slot from `start` up to but not including `end`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkEdit {
    target: EditTarget,
    start: SlotTime,
    end: SlotTime,
    band: TemperatureBand,
}

impl ChunkEdit {
    pub fn new(target: EditTarget, start: SlotTime, end: SlotTime, band: TemperatureBand) -> Self {
        Self {
            target,
            start,
            end,
            band,
        }
    }

    /// An edit pre-filled with a chunk's current range and band.
    pub fn for_chunk(chunk: &Chunk) -> Self {
        Self::new(
            EditTarget::Existing(chunk.get_index()),
            chunk.get_start_time(),
            chunk.get_exclusive_end(),
            chunk.get_band(),
        )
    }

    pub fn get_target(&self) -> EditTarget {
        self.target
    }

    pub fn get_start(&self) -> SlotTime {
        self.start
    }

    pub fn get_end(&self) -> SlotTime {
        self.end
    }

    pub fn get_band(&self) -> TemperatureBand {
        self.band
    }

    pub fn set_range(&mut self, start: SlotTime, end: SlotTime) {
        self.start = start;
        self.end = end;
    }

    pub fn set_band(&mut self, band: TemperatureBand) {
        self.band = band;
    }

    /// Whether the edit covers the slot. An end of `00:00` runs to the end of the day.
    pub fn covers(&self, slot: SlotTime) -> bool {
        slot >= self.start && slot.index() < self.end.exclusive_end_index()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    StartNotBeforeEnd { start: SlotTime, end: SlotTime },
    BandTooNarrow { band: TemperatureBand, min_width: f32 },
    UnknownChunk { index: usize, chunk_count: usize },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::StartNotBeforeEnd { .. } => write!(f, "Start time must be before end time."),
            ValidationError::BandTooNarrow { min_width, .. } if *min_width == 1.0 => {
                write!(f, "Max temp must be at least 1 degree higher than min.")
            }
            ValidationError::BandTooNarrow { min_width, .. } => {
                write!(f, "Max temp must be at least {} degrees higher than min.", min_width)
            }
            ValidationError::UnknownChunk { index, chunk_count } => {
                write!(f, "There is no period {} (only {} exist), please reload the profile.", index + 1, chunk_count)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub struct ChunkEditor {
    min_band_width: f32,
}

impl Default for ChunkEditor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_BAND_WIDTH)
    }
}

impl ChunkEditor {
    pub fn new(min_band_width: f32) -> Self {
        Self { min_band_width }
    }

    pub fn get_min_band_width(&self) -> f32 {
        self.min_band_width
    }

    /// Check an edit against the time ordering and band width rules, and that
    /// an existing target is part of `chunks`.
    pub fn validate(&self, edit: &ChunkEdit, chunks: &[Chunk]) -> Result<(), ValidationError> {
        if edit.start >= edit.end && !edit.end.is_midnight() {
            return Err(ValidationError::StartNotBeforeEnd {
                start: edit.start,
                end: edit.end,
            });
        }
        if edit.band.width() < self.min_band_width {
            return Err(ValidationError::BandTooNarrow {
                band: edit.band,
                min_width: self.min_band_width,
            });
        }
        if let EditTarget::Existing(index) = edit.target {
            if index >= chunks.len() {
                return Err(ValidationError::UnknownChunk {
                    index,
                    chunk_count: chunks.len(),
                });
            }
        }
        Ok(())
    }

    /// Validate then apply an edit, producing a new day.
    /// Records outside the edit's range keep their band; on error nothing is produced.
    pub fn apply(&self, records: &DayRecords, edit: &ChunkEdit) -> Result<DayRecords, ValidationError> {
        self.validate(edit, &compress(records.records()))?;

        debug!("Setting {}-{} to {}", edit.start, edit.end, edit.band);
        let updated: Vec<HalfHourlyRecord> = records
            .records()
            .iter()
            .map(|record| {
                if edit.covers(record.get_from_time()) {
                    record.with_band(edit.band)
                } else {
                    *record
                }
            })
            .collect();
        Ok(DayRecords::from_full_day(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::test_utils::{band, day_of};
    use crate::time_util::test_utils::slot;

    fn new_edit(start: SlotTime, end: SlotTime, band: TemperatureBand) -> ChunkEdit {
        ChunkEdit::new(EditTarget::New, start, end, band)
    }

    #[test]
    fn test_rejects_start_after_end() {
        let editor = ChunkEditor::default();
        let edit = new_edit(slot(10, 0), slot(9, 0), band(18.0, 21.0));
        let result = editor.validate(&edit, &[]);
        assert_eq!(
            result,
            Err(ValidationError::StartNotBeforeEnd {
                start: slot(10, 0),
                end: slot(9, 0)
            })
        );
        assert_eq!(result.unwrap_err().to_string(), "Start time must be before end time.");
    }

    #[test]
    fn test_rejects_empty_range() {
        let editor = ChunkEditor::default();
        let edit = new_edit(slot(9, 0), slot(9, 0), band(18.0, 21.0));
        assert!(matches!(editor.validate(&edit, &[]), Err(ValidationError::StartNotBeforeEnd { .. })));
    }

    #[test]
    fn test_accepts_midnight_end() {
        let editor = ChunkEditor::default();
        let edit = new_edit(slot(23, 0), slot(0, 0), band(18.0, 21.0));
        assert_eq!(editor.validate(&edit, &[]), Ok(()));
    }

    #[test]
    fn test_band_width() {
        let editor = ChunkEditor::default();
        let narrow = new_edit(slot(8, 0), slot(9, 0), band(20.0, 20.5));
        let result = editor.validate(&narrow, &[]);
        assert!(matches!(result, Err(ValidationError::BandTooNarrow { .. })));
        assert_eq!(result.unwrap_err().to_string(), "Max temp must be at least 1 degree higher than min.");

        let ok = new_edit(slot(8, 0), slot(9, 0), band(20.0, 21.0));
        assert_eq!(editor.validate(&ok, &[]), Ok(()));
    }

    #[test]
    fn test_configured_band_width() {
        let editor = ChunkEditor::new(2.0);
        let edit = new_edit(slot(8, 0), slot(9, 0), band(20.0, 21.5));
        let result = editor.validate(&edit, &[]);
        assert_eq!(result.unwrap_err().to_string(), "Max temp must be at least 2 degrees higher than min.");
    }

    #[test]
    fn test_time_checked_before_band() {
        let editor = ChunkEditor::default();
        let edit = new_edit(slot(10, 0), slot(9, 0), band(20.0, 20.0));
        assert!(matches!(editor.validate(&edit, &[]), Err(ValidationError::StartNotBeforeEnd { .. })));
    }

    #[test]
    fn test_rejects_unknown_chunk() {
        let editor = ChunkEditor::default();
        let day = DayRecords::uniform(band(18.0, 21.0));
        let edit = ChunkEdit::new(EditTarget::Existing(1), slot(8, 0), slot(9, 0), band(18.0, 21.0));
        assert_eq!(
            editor.apply(&day, &edit),
            Err(ValidationError::UnknownChunk { index: 1, chunk_count: 1 })
        );
    }

    #[test]
    fn test_edit_splits_uniform_day_into_three() {
        let editor = ChunkEditor::default();
        let day = DayRecords::uniform(band(18.0, 21.0));
        let edit = new_edit(slot(8, 0), slot(17, 0), band(19.0, 23.0));

        let edited = editor.apply(&day, &edit).unwrap();

        let summary: Vec<String> = compress(edited.records()).iter().map(|c| c.to_string()).collect();
        assert_eq!(
            summary,
            vec![
                "[00:00,07:30]@(18.0,21.0)",
                "[08:00,16:30]@(19.0,23.0)",
                "[17:00,23:30]@(18.0,21.0)",
            ]
        );
        // The original day is left alone.
        assert_eq!(day, DayRecords::uniform(band(18.0, 21.0)));
    }

    #[test]
    fn test_edit_existing_chunk_band() {
        let editor = ChunkEditor::default();
        let day = day_of(&[
            (0, band(16.0, 18.0)),
            (16, band(18.0, 21.0)),
            (34, band(17.0, 19.0)),
        ]);
        let chunks = compress(day.records());
        let mut edit = ChunkEdit::for_chunk(&chunks[1]);
        assert_eq!(edit.get_start(), slot(8, 0));
        assert_eq!(edit.get_end(), slot(17, 0));
        edit.set_band(band(19.0, 23.0));

        let edited = editor.apply(&day, &edit).unwrap();
        let new_chunks = compress(edited.records());

        assert_eq!(new_chunks.len(), 3);
        assert_eq!(new_chunks[0], chunks[0]);
        assert_eq!(new_chunks[1].get_start_time(), slot(8, 0));
        assert_eq!(new_chunks[1].get_end_time(), slot(16, 30));
        assert_eq!(new_chunks[1].get_band(), band(19.0, 23.0));
        assert_eq!(new_chunks[2], chunks[2]);
    }

    #[test]
    fn test_edit_to_midnight_reaches_last_slot() {
        let editor = ChunkEditor::default();
        let day = DayRecords::uniform(band(18.0, 21.0));
        let edit = new_edit(slot(22, 0), slot(0, 0), band(15.0, 17.0));

        let edited = editor.apply(&day, &edit).unwrap();

        assert_eq!(edited.band_at(slot(21, 30)), band(18.0, 21.0));
        assert_eq!(edited.band_at(slot(22, 0)), band(15.0, 17.0));
        assert_eq!(edited.band_at(slot(23, 30)), band(15.0, 17.0));
        assert_eq!(edited.band_at(slot(0, 0)), band(18.0, 21.0));
    }

    #[test]
    fn test_edit_spanning_chunks_merges_with_neighbour() {
        let editor = ChunkEditor::default();
        let day = day_of(&[
            (0, band(16.0, 18.0)),
            (10, band(18.0, 21.0)),
            (20, band(19.0, 22.0)),
            (30, band(16.0, 18.0)),
        ]);
        let edit = new_edit(slot(5, 0), slot(15, 0), band(16.0, 18.0));

        let edited = editor.apply(&day, &edit).unwrap();
        let summary: Vec<String> = compress(edited.records()).iter().map(|c| c.to_string()).collect();
        assert_eq!(summary, vec!["[00:00,23:30]@(16.0,18.0)"]);
    }

    #[test]
    fn test_failed_edit_leaves_day_alone() {
        let editor = ChunkEditor::default();
        let day = DayRecords::uniform(band(18.0, 21.0));
        let edit = new_edit(slot(8, 0), slot(17, 0), band(19.0, 19.5));
        assert!(editor.apply(&day, &edit).is_err());
        assert_eq!(day, DayRecords::uniform(band(18.0, 21.0)));
    }
}
