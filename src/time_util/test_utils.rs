use chrono::NaiveDate;

use crate::time_util::slot_time::SlotTime;

pub fn slot(hour: u32, minute: u32) -> SlotTime {
    SlotTime::from_hm(hour, minute).expect(&format!("Expected {:0>2}:{:0>2} to be a valid slot", hour, minute))
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect(&format!("Expected {:0>4}-{:0>2}-{:0>2} to be a valid date", year, month, day))
}
