use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::profile::records::{DayRecords, HalfHourlyRecord, RecordsError, TemperatureBand};
use crate::profile::session::EditingSession;
use crate::profile::priority::ProfileList;
use crate::profile::{DayOfWeek, Profile};
use crate::time_util::slot_time::SlotTime;

/// The list endpoint either returns the profile map directly, or an envelope
/// whose `body` is that map encoded as a JSON string.
/// Profiles stay untyped here so one unreadable profile does not sink the rest.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum ProfilesResponse {
    Enveloped { body: String },
    Direct(BTreeMap<String, Value>),
}

/// Temperatures and priorities arrive as numbers or as numeric strings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum WireNumber {
    Number(f64),
    Text(String),
}

impl WireNumber {
    fn as_f64(&self) -> Option<f64> {
        match self {
            WireNumber::Number(n) => Some(*n),
            WireNumber::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct WireProfile {
    #[serde(default)]
    profile_key: Option<String>,
    priority_name: String,
    #[serde(default)]
    priority_num: Option<WireNumber>,
    from_date: NaiveDate,
    to_date: NaiveDate,
    #[serde(default)]
    days_of_week: Vec<DayOfWeek>,
    #[serde(default)]
    half_hourly_records: Vec<WireRecord>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct WireRecord {
    from_time: String,
    #[serde(alias = "LowTemp")]
    temp_demand_low: WireNumber,
    #[serde(alias = "HighTemp")]
    temp_demand_high: WireNumber,
}

impl WireRecord {
    fn into_record(self, position: usize) -> Result<HalfHourlyRecord, RecordsError> {
        let from_time: SlotTime = self
            .from_time
            .parse()
            .map_err(|error| RecordsError::InvalidTime { position, error })?;
        let low = temperature(&self.temp_demand_low, position)?;
        let high = temperature(&self.temp_demand_high, position)?;
        Ok(HalfHourlyRecord::new(from_time, TemperatureBand::new(low, high)))
    }
}

fn temperature(value: &WireNumber, position: usize) -> Result<f32, RecordsError> {
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .map(|n| n as f32)
        .ok_or_else(|| RecordsError::InvalidTemperature {
            position,
            value: format!("{:?}", value),
        })
}

impl WireProfile {
    /// Convert into a [`Profile`], using `key` when the document does not carry its own.
    pub fn into_profile(self, key: String) -> Result<Profile, RecordsError> {
        let records = self
            .half_hourly_records
            .into_iter()
            .enumerate()
            .map(|(position, record)| record.into_record(position))
            .collect::<Result<Vec<_>, _>>()?;
        let records = DayRecords::try_from_records(records)?;

        let priority = self
            .priority_num
            .as_ref()
            .and_then(WireNumber::as_f64)
            .map(|n| n as i64)
            .unwrap_or(0);

        Ok(Profile::new(
            self.profile_key.unwrap_or(key),
            self.priority_name,
            priority,
            self.from_date,
            self.to_date,
            self.days_of_week.into_iter().collect::<BTreeSet<_>>(),
            records,
        ))
    }
}

/// Parse the list endpoint's response. Profiles that cannot be read or whose
/// records cannot be normalized are left out, with an error logged.
pub fn parse_profiles(json: &str) -> Result<Vec<Profile>, serde_json::Error> {
    let profiles = match serde_json::from_str::<ProfilesResponse>(json)? {
        ProfilesResponse::Direct(profiles) => profiles,
        ProfilesResponse::Enveloped { body } => serde_json::from_str(&body)?,
    };

    Ok(profiles
        .into_iter()
        .filter_map(|(key, value)| {
            let wire = match serde_json::from_value::<WireProfile>(value) {
                Ok(wire) => wire,
                Err(e) => {
                    error!("Rejecting unreadable profile {}: {}", key, e);
                    return None;
                }
            };
            let name = wire.priority_name.clone();
            match wire.into_profile(key.clone()) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    error!("Rejecting profile '{}' ({}): {}", name, key, e);
                    None
                }
            }
        })
        .collect())
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveProfileRequest<'a> {
    profile_key: &'a str,
    priority_num: i64,
    profile_name: &'a str,
    /// The name as loaded, so the store can find a renamed profile. `null` for new profiles.
    original_profile_name: Option<&'a str>,
    from_date: NaiveDate,
    to_date: NaiveDate,
    active_days: Vec<DayOfWeek>,
    half_hourly_records: &'a DayRecords,
}

impl<'a> From<&'a EditingSession> for SaveProfileRequest<'a> {
    fn from(session: &'a EditingSession) -> Self {
        let profile = session.get_profile();
        Self {
            profile_key: profile.get_key(),
            priority_num: profile.get_priority(),
            profile_name: profile.get_name(),
            original_profile_name: session.get_original_name(),
            from_date: profile.get_from_date(),
            to_date: profile.get_to_date(),
            active_days: profile.get_days().iter().copied().collect(),
            half_hourly_records: profile.get_records(),
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProfileRequest<'a> {
    profile_key: &'a str,
    profile_name: &'a str,
}

impl<'a> From<&'a Profile> for DeleteProfileRequest<'a> {
    fn from(profile: &'a Profile) -> Self {
        Self {
            profile_key: profile.get_key(),
            profile_name: profile.get_name(),
        }
    }
}

#[derive(Serialize, Debug, PartialEq)]
pub struct PriorityRequest<'a> {
    profiles: Vec<PriorityEntry<'a>>,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriorityEntry<'a> {
    profile_key: &'a str,
    profile_name: &'a str,
    priority_num: i64,
}

impl<'a> From<&'a ProfileList> for PriorityRequest<'a> {
    fn from(list: &'a ProfileList) -> Self {
        Self {
            profiles: list
                .get_ordered()
                .iter()
                .enumerate()
                .map(|(position, profile)| PriorityEntry {
                    profile_key: profile.get_key(),
                    profile_name: profile.get_name(),
                    priority_num: list.position_priority(position),
                })
                .collect(),
        }
    }
}
