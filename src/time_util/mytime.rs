use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

pub trait TimeProvider {
    fn get_utc_time(&self) -> DateTime<Utc>;

    fn get_local_time(&self) -> DateTime<Local>;

    /// The calendar date the user is in, used for date defaults of new profiles.
    fn get_local_date(&self) -> NaiveDate {
        self.get_local_time().date_naive()
    }
}

#[derive(Default)]
pub struct RealTimeProvider {}

impl TimeProvider for RealTimeProvider {
    fn get_utc_time(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn get_local_time(&self) -> DateTime<Local> {
        Local::now()
    }
}

#[derive(Debug)]
pub struct DummyTimeProvider {
    utc_time: DateTime<Utc>,
}

impl DummyTimeProvider {
    pub fn new(utc_time: DateTime<Utc>) -> Self {
        Self { utc_time }
    }

    /// A provider fixed at midday UTC of the given date, far enough from midnight
    /// that the local date is the same in any European timezone.
    pub fn at_date(date: NaiveDate) -> Self {
        let midday = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
        Self::new(Utc.from_utc_datetime(&midday))
    }

    /// Change the time returned by this dummy time provider.
    pub fn set(&mut self, utc_time: DateTime<Utc>) {
        self.utc_time = utc_time;
    }
}

impl TimeProvider for DummyTimeProvider {
    fn get_utc_time(&self) -> DateTime<Utc> {
        self.utc_time
    }

    fn get_local_time(&self) -> DateTime<Local> {
        Local.from_utc_datetime(&self.utc_time.naive_utc())
    }

    fn get_local_date(&self) -> NaiveDate {
        self.utc_time.date_naive()
    }
}
