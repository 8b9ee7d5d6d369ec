use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde_with::{DeserializeFromStr, SerializeDisplay};

/// Number of half hour slots in a day.
pub const SLOTS_PER_DAY: usize = 48;

const MINUTES_PER_SLOT: u32 = 30;

/// The start of one half hour slot of the day, written `HH:MM` on the wire.
/// Only the 48 values `00:00`, `00:30` .. `23:30` exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct SlotTime {
    index: u8,
}

impl SlotTime {
    pub const MIDNIGHT: SlotTime = SlotTime { index: 0 };

    pub fn from_index(index: usize) -> Option<SlotTime> {
        if index < SLOTS_PER_DAY {
            Some(SlotTime { index: index as u8 })
        } else {
            None
        }
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<SlotTime> {
        if hour >= 24 || minute % MINUTES_PER_SLOT != 0 || minute >= 60 {
            return None;
        }
        Self::from_index((hour * 2 + minute / MINUTES_PER_SLOT) as usize)
    }

    /// Every slot of the day, in order.
    pub fn all() -> impl Iterator<Item = SlotTime> {
        (0..SLOTS_PER_DAY).filter_map(SlotTime::from_index)
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn hour(&self) -> u32 {
        self.index as u32 / 2
    }

    pub fn minute(&self) -> u32 {
        (self.index as u32 % 2) * MINUTES_PER_SLOT
    }

    pub fn is_midnight(&self) -> bool {
        self.index == 0
    }

    /// The following slot, or `None` for `23:30`.
    pub fn next(&self) -> Option<SlotTime> {
        Self::from_index(self.index() + 1)
    }

    /// The instant this slot ends, wrapping `23:30` round to `00:00`.
    pub fn end_of_slot(&self) -> SlotTime {
        self.next().unwrap_or(SlotTime::MIDNIGHT)
    }

    /// Index one past the last slot covered by a range ending (exclusively) at this time.
    /// `00:00` as an end means the end of the day.
    pub fn exclusive_end_index(&self) -> usize {
        if self.is_midnight() {
            SLOTS_PER_DAY
        } else {
            self.index()
        }
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or_default()
    }
}

impl TryFrom<NaiveTime> for SlotTime {
    type Error = ParseSlotTimeError;

    fn try_from(time: NaiveTime) -> Result<Self, Self::Error> {
        if time.second() != 0 || time.nanosecond() != 0 {
            return Err(ParseSlotTimeError::NotOnSlotBoundary(time));
        }
        SlotTime::from_hm(time.hour(), time.minute())
            .ok_or(ParseSlotTimeError::NotOnSlotBoundary(time))
    }
}

impl FromStr for SlotTime {
    type Err = ParseSlotTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // The store sometimes includes seconds.
        let time = NaiveTime::parse_from_str(trimmed, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map_err(|_| ParseSlotTimeError::Malformed(s.to_owned()))?;
        SlotTime::try_from(time)
    }
}

impl Display for SlotTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0>2}:{:0>2}", self.hour(), self.minute())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseSlotTimeError {
    Malformed(String),
    NotOnSlotBoundary(NaiveTime),
}

impl Display for ParseSlotTimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseSlotTimeError::Malformed(s) => write!(f, "'{}' is not a HH:MM time", s),
            ParseSlotTimeError::NotOnSlotBoundary(t) => write!(f, "{} is not on a half hour boundary", t),
        }
    }
}

impl std::error::Error for ParseSlotTimeError {}
