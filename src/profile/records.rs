use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::time_util::slot_time::{ParseSlotTimeError, SlotTime, SLOTS_PER_DAY};

/// The temperature range the heating aims to hold during a slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureBand {
    low: f32,
    high: f32,
}

impl TemperatureBand {
    pub fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    pub fn get_low(&self) -> f32 {
        self.low
    }

    pub fn get_high(&self) -> f32 {
        self.high
    }

    pub fn width(&self) -> f32 {
        self.high - self.low
    }
}

impl Display for TemperatureBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1},{:.1})", self.low, self.high)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HalfHourlyRecord {
    from_time: SlotTime,
    low_temp: f32,
    high_temp: f32,
}

impl HalfHourlyRecord {
    pub fn new(from_time: SlotTime, band: TemperatureBand) -> Self {
        Self {
            from_time,
            low_temp: band.low,
            high_temp: band.high,
        }
    }

    pub fn get_from_time(&self) -> SlotTime {
        self.from_time
    }

    pub fn get_low_temp(&self) -> f32 {
        self.low_temp
    }

    pub fn get_high_temp(&self) -> f32 {
        self.high_temp
    }

    pub fn band(&self) -> TemperatureBand {
        TemperatureBand::new(self.low_temp, self.high_temp)
    }

    pub fn with_band(&self, band: TemperatureBand) -> Self {
        Self::new(self.from_time, band)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordsError {
    WrongCount { found: usize },
    OutOfOrder { position: usize, expected: SlotTime, found: SlotTime },
    InvalidTime { position: usize, error: ParseSlotTimeError },
    InvalidTemperature { position: usize, value: String },
}

impl Display for RecordsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordsError::WrongCount { found } => {
                write!(f, "Expected {} half hourly records, got {}", SLOTS_PER_DAY, found)
            }
            RecordsError::OutOfOrder { position, expected, found } => {
                write!(f, "Record {} should start at {} but starts at {}", position, expected, found)
            }
            RecordsError::InvalidTime { position, error } => {
                write!(f, "Record {} has an invalid time: {}", position, error)
            }
            RecordsError::InvalidTemperature { position, value } => {
                write!(f, "Record {} has an invalid temperature '{}'", position, value)
            }
        }
    }
}

impl std::error::Error for RecordsError {}

/// A whole day of half hourly records.
/// Always exactly 48 records, one per slot, in slot order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DayRecords {
    records: Vec<HalfHourlyRecord>,
}

impl DayRecords {
    /// A day where every slot has the same band.
    pub fn uniform(band: TemperatureBand) -> Self {
        Self {
            records: SlotTime::all().map(|slot| HalfHourlyRecord::new(slot, band)).collect(),
        }
    }

    pub fn try_from_records(records: Vec<HalfHourlyRecord>) -> Result<Self, RecordsError> {
        if records.len() != SLOTS_PER_DAY {
            return Err(RecordsError::WrongCount { found: records.len() });
        }
        for (position, (record, expected)) in records.iter().zip(SlotTime::all()).enumerate() {
            if record.from_time != expected {
                return Err(RecordsError::OutOfOrder {
                    position,
                    expected,
                    found: record.from_time,
                });
            }
        }
        Ok(Self { records })
    }

    /// Rebuild from records derived one to one from an existing `DayRecords`.
    pub(crate) fn from_full_day(records: Vec<HalfHourlyRecord>) -> Self {
        debug_assert_eq!(records.len(), SLOTS_PER_DAY);
        Self { records }
    }

    pub fn records(&self) -> &[HalfHourlyRecord] {
        &self.records
    }

    pub fn band_at(&self, slot: SlotTime) -> TemperatureBand {
        self.records[slot.index()].band()
    }

    pub fn bands(&self) -> impl Iterator<Item = TemperatureBand> + '_ {
        self.records.iter().map(HalfHourlyRecord::band)
    }

    /// Lowest low and highest high across the day.
    pub fn temperature_span(&self) -> Option<(f32, f32)> {
        temperature_span(&self.records)
    }
}

impl TryFrom<Vec<HalfHourlyRecord>> for DayRecords {
    type Error = RecordsError;

    fn try_from(records: Vec<HalfHourlyRecord>) -> Result<Self, Self::Error> {
        Self::try_from_records(records)
    }
}

/// Lowest low and highest high temperature over the records.
/// `None` when there are no records, rather than an infinite placeholder.
pub fn temperature_span(records: &[HalfHourlyRecord]) -> Option<(f32, f32)> {
    let first = records.first()?;
    Some(records.iter().skip(1).fold(
        (first.low_temp, first.high_temp),
        |(min, max), record| (min.min(record.low_temp), max.max(record.high_temp)),
    ))
}
