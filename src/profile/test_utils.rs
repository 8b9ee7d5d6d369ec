use crate::profile::records::{DayRecords, HalfHourlyRecord, TemperatureBand};
use crate::time_util::slot_time::SlotTime;

pub fn band(low: f32, high: f32) -> TemperatureBand {
    TemperatureBand::new(low, high)
}

/// Build a day from (first slot index, band) change points.
/// The first change point must be slot 0.
pub fn day_of(changes: &[(usize, TemperatureBand)]) -> DayRecords {
    let records = SlotTime::all()
        .map(|slot| {
            let (_, band) = changes
                .iter()
                .rev()
                .find(|(from, _)| *from <= slot.index())
                .expect("First change should be at slot 0");
            HalfHourlyRecord::new(slot, *band)
        })
        .collect();
    DayRecords::try_from_records(records).expect("Should be a full day")
}
