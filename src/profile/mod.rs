use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};

use records::DayRecords;

pub mod chunks;
pub mod delete;
pub mod edit;
pub mod priority;
pub mod records;
pub mod session;

#[cfg(test)]
pub mod test_utils;

/// Profiles with this in their name are the locked fallback profile.
pub const DEFAULT_PROFILE_MARKER: &str = "Default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumIter, EnumString, strum_macros::Display)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Mon",
            DayOfWeek::Tuesday => "Tue",
            DayOfWeek::Wednesday => "Wed",
            DayOfWeek::Thursday => "Thu",
            DayOfWeek::Friday => "Fri",
            DayOfWeek::Saturday => "Sat",
            DayOfWeek::Sunday => "Sun",
        }
    }
}

/// A named heating schedule: when it applies, and the day of bands it applies.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    key: String,
    name: String,
    priority: i64,
    from_date: NaiveDate,
    to_date: NaiveDate,
    days: BTreeSet<DayOfWeek>,
    records: DayRecords,
}

impl Profile {
    pub fn new(
        key: String,
        name: String,
        priority: i64,
        from_date: NaiveDate,
        to_date: NaiveDate,
        days: BTreeSet<DayOfWeek>,
        records: DayRecords,
    ) -> Self {
        Self {
            key,
            name,
            priority,
            from_date,
            to_date,
            days,
            records,
        }
    }

    pub fn get_key(&self) -> &str {
        &self.key
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_priority(&self) -> i64 {
        self.priority
    }

    pub fn get_from_date(&self) -> NaiveDate {
        self.from_date
    }

    pub fn get_to_date(&self) -> NaiveDate {
        self.to_date
    }

    pub fn get_days(&self) -> &BTreeSet<DayOfWeek> {
        &self.days
    }

    pub fn get_records(&self) -> &DayRecords {
        &self.records
    }

    /// The default profile cannot be reordered, and its days and bands are fixed.
    pub fn is_default(&self) -> bool {
        self.name.contains(DEFAULT_PROFILE_MARKER)
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_priority(&mut self, priority: i64) {
        self.priority = priority;
    }

    pub(crate) fn set_dates(&mut self, from_date: NaiveDate, to_date: NaiveDate) {
        self.from_date = from_date;
        self.to_date = to_date;
    }

    pub(crate) fn days_mut(&mut self) -> &mut BTreeSet<DayOfWeek> {
        &mut self.days
    }

    pub(crate) fn set_records(&mut self, records: DayRecords) {
        self.records = records;
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' (priority {}, {} to {}", self.name, self.priority, self.from_date, self.to_date)?;
        if !self.days.is_empty() {
            let days: Vec<&str> = self.days.iter().map(DayOfWeek::abbreviation).collect();
            write!(f, ", {}", days.join(" "))?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_days_round_trip() {
        let days: Vec<DayOfWeek> = DayOfWeek::iter().collect();
        assert_eq!(days.len(), 7);
        for day in days {
            let same_day: DayOfWeek = day.to_string().parse().unwrap();
            assert_eq!(day, same_day, "Expected day '{}' to transform back into itself.", day);
        }
        let json: Vec<DayOfWeek> = serde_json::from_str(r#"["Monday", "Sunday"]"#).unwrap();
        assert_eq!(json, vec![DayOfWeek::Monday, DayOfWeek::Sunday]);
    }
}
