use std::fmt::{Display, Formatter};
use std::sync::Arc;

use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::io::transport::{get_json, post_json, AuthenticatedTransport, TransportError};

/// Which boost, if any, is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostState {
    None,
    Heating,
    HotWater,
}

impl BoostState {
    fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("H") => BoostState::Heating,
            Some("W") => BoostState::HotWater,
            _ => BoostState::None,
        }
    }
}

/// How full the hot water tank is, in the words the dashboard uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TankLevel {
    Empty,
    HalfFull,
    Full,
}

impl TankLevel {
    /// Up to 30% is empty, up to 69% half full, anything above full.
    pub fn from_percentage(percentage: f32) -> Self {
        if percentage <= 30.0 {
            TankLevel::Empty
        } else if percentage <= 69.0 {
            TankLevel::HalfFull
        } else {
            TankLevel::Full
        }
    }
}

impl Display for TankLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TankLevel::Empty => write!(f, "You have an empty Tank of Hot Water"),
            TankLevel::HalfFull => write!(f, "You have a half full Tank of Hot Water"),
            TankLevel::Full => write!(f, "You have a full Tank of Hot Water"),
        }
    }
}

/// What to ask the controller to do. Serialized as the single letter code the endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoostRequest {
    #[serde(rename = "H")]
    Heating,
    #[serde(rename = "W")]
    HotWater,
    #[serde(rename = "C")]
    Cancel,
}

impl BoostRequest {
    /// Pressing the button for the boost that is already running cancels it.
    pub fn toggle(current: BoostState, wanted: BoostRequest) -> BoostRequest {
        match (current, wanted) {
            (BoostState::Heating, BoostRequest::Heating) => BoostRequest::Cancel,
            (BoostState::HotWater, BoostRequest::HotWater) => BoostRequest::Cancel,
            _ => wanted,
        }
    }

    /// The state the controller should be in once this request has been applied.
    pub fn resulting_state(&self) -> BoostState {
        match self {
            BoostRequest::Heating => BoostState::Heating,
            BoostRequest::HotWater => BoostState::HotWater,
            BoostRequest::Cancel => BoostState::None,
        }
    }
}

#[derive(Serialize, Debug)]
struct BoostPayload {
    heatwater: BoostRequest,
}

#[derive(Deserialize, Debug)]
struct StatusResponse {
    content: Vec<RawStatus>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
struct RawStatus {
    name: Option<String>,
    gascost: Option<String>,
    actcost: Option<String>,
    roomtemp: Option<String>,
    watertemp: Option<String>,
    currrunning: Option<String>,
    destemplow: Option<String>,
    destemphigh: Option<String>,
    boosttype: Option<String>,
    watervol: Option<String>,
    tankcapacity: Option<String>,
}

fn parse_number(value: &Option<String>) -> Option<f32> {
    value.as_deref().and_then(|s| s.trim().parse().ok())
}

/// Live readings shown on the dashboard. Readings the endpoint did not supply are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    user_name: String,
    weekly_savings: Option<f32>,
    room_temperature: Option<f32>,
    water_temperature: Option<f32>,
    running: Option<String>,
    target_low: Option<f32>,
    target_high: Option<f32>,
    boost: BoostState,
    water_volume: Option<f32>,
    tank_capacity: Option<f32>,
}

impl From<RawStatus> for StatusReport {
    fn from(raw: RawStatus) -> Self {
        let weekly_savings = match (parse_number(&raw.gascost), parse_number(&raw.actcost)) {
            (Some(gas), Some(actual)) => Some(gas - actual),
            _ => None,
        };
        Self {
            user_name: raw.name.clone().filter(|n| !n.is_empty()).unwrap_or_else(|| "User".to_owned()),
            weekly_savings,
            room_temperature: parse_number(&raw.roomtemp),
            water_temperature: parse_number(&raw.watertemp),
            running: raw.currrunning.clone(),
            target_low: parse_number(&raw.destemplow),
            target_high: parse_number(&raw.destemphigh),
            boost: BoostState::from_code(raw.boosttype.as_deref()),
            water_volume: parse_number(&raw.watervol),
            tank_capacity: parse_number(&raw.tankcapacity),
        }
    }
}

impl StatusReport {
    pub fn get_user_name(&self) -> &str {
        &self.user_name
    }

    pub fn get_weekly_savings(&self) -> Option<f32> {
        self.weekly_savings
    }

    pub fn get_room_temperature(&self) -> Option<f32> {
        self.room_temperature
    }

    pub fn get_water_temperature(&self) -> Option<f32> {
        self.water_temperature
    }

    pub fn get_running(&self) -> Option<&str> {
        self.running.as_deref()
    }

    pub fn get_target_low(&self) -> Option<f32> {
        self.target_low
    }

    pub fn get_target_high(&self) -> Option<f32> {
        self.target_high
    }

    pub fn get_boost(&self) -> BoostState {
        self.boost
    }

    /// How full the hot water tank is, from 0 to 1.
    pub fn get_tank_fraction(&self) -> Option<f32> {
        match (self.water_volume, self.tank_capacity) {
            (Some(volume), Some(capacity)) if capacity > 0.0 => Some((volume / capacity).clamp(0.0, 1.0)),
            _ => None,
        }
    }

    pub fn get_tank_level(&self) -> Option<TankLevel> {
        self.get_tank_fraction().map(|fraction| TankLevel::from_percentage(fraction * 100.0))
    }
}

impl Display for StatusReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let show = |v: Option<f32>| v.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "?".to_owned());
        write!(
            f,
            "Room {}C, Water {}C, Target {}-{}C, Boost {:?}",
            show(self.room_temperature),
            show(self.water_temperature),
            show(self.target_low),
            show(self.target_high),
            self.boost
        )
    }
}

#[derive(Debug)]
pub enum StatusError {
    Transport(TransportError),
    NoContent,
}

impl Display for StatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusError::Transport(e) => write!(f, "{}", e),
            StatusError::NoContent => write!(f, "API returned no content."),
        }
    }
}

impl std::error::Error for StatusError {}

impl From<TransportError> for StatusError {
    fn from(e: TransportError) -> Self {
        StatusError::Transport(e)
    }
}

#[async_trait]
pub trait StatusSource {
    async fn get_status(&self) -> Result<StatusReport, StatusError>;

    async fn set_boost(&self, request: BoostRequest) -> Result<(), StatusError>;
}

pub struct HttpStatusSource {
    transport: Arc<dyn AuthenticatedTransport>,
    api: ApiConfig,
}

impl HttpStatusSource {
    pub fn new(transport: Arc<dyn AuthenticatedTransport>, api: ApiConfig) -> Self {
        Self { transport, api }
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn get_status(&self) -> Result<StatusReport, StatusError> {
        let response: StatusResponse = get_json(&*self.transport, self.api.get_status_url()).await?;
        if response.content.len() > 1 {
            warn!("Status returned {} entries, using the first", response.content.len());
        }
        let raw = response.content.into_iter().next().ok_or(StatusError::NoContent)?;
        Ok(raw.into())
    }

    async fn set_boost(&self, request: BoostRequest) -> Result<(), StatusError> {
        post_json(&*self.transport, self.api.get_boost_url(), &BoostPayload { heatwater: request }).await?;
        info!("Requested boost {:?}", request);
        Ok(())
    }
}
