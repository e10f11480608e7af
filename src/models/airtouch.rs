//! Raw device-level state of an AirTouch system as cached by the driver.
//!
//! Notes
//! - Enums mirror the protocol vocabulary; nothing here is consumer-facing.
//! - Values that the console has not reported yet are `Option`s and stay `None`
//!   until the first status update arrives.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

// =====================
// Scalar ID newtype wrappers
// =====================

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcId(pub u8);

/// Zone IDs are unique across every AC of an AirTouch system.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub u8);

// =====================
// Core enums
// =====================

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcMode {
    Auto,
    Heat,
    Dry,
    Fan,
    Cool,
}

impl AcMode {
    pub const ALL: [AcMode; 5] = [AcMode::Auto, AcMode::Heat, AcMode::Dry, AcMode::Fan, AcMode::Cool];
}

/// Fan speeds, declared in the order the console advertises them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcFanSpeed {
    Auto,
    Quiet,
    Low,
    Medium,
    High,
    Powerful,
    Turbo,
    IntelligentAuto,
}

impl AcFanSpeed {
    pub const ALL: [AcFanSpeed; 8] = [
        AcFanSpeed::Auto,
        AcFanSpeed::Quiet,
        AcFanSpeed::Low,
        AcFanSpeed::Medium,
        AcFanSpeed::High,
        AcFanSpeed::Powerful,
        AcFanSpeed::Turbo,
        AcFanSpeed::IntelligentAuto,
    ];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcPowerState {
    Off,
    On,
    OffAway,
    OnAway,
    Sleep,
    /// Protective shutdown initiated by the unit itself.
    OffForced,
}

impl AcPowerState {
    pub const ALL: [AcPowerState; 6] = [
        AcPowerState::Off,
        AcPowerState::On,
        AcPowerState::OffAway,
        AcPowerState::OnAway,
        AcPowerState::Sleep,
        AcPowerState::OffForced,
    ];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcPowerControl {
    TurnOff,
    TurnOn,
    SetToAway,
    SetToSleep,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcSpillState {
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "SPILL")]
    Spill,
    #[serde(rename = "BYPASS")]
    Bypass,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcTimerType {
    OffTimer,
    OnTimer,
}

impl AcTimerType {
    pub const ALL: [AcTimerType; 2] = [AcTimerType::OffTimer, AcTimerType::OnTimer];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZonePowerState {
    Off,
    On,
    Turbo,
}

impl ZonePowerState {
    pub const ALL: [ZonePowerState; 3] = [ZonePowerState::Off, ZonePowerState::On, ZonePowerState::Turbo];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneControlMethod {
    Temperature,
    Percentage,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorBatteryStatus {
    Normal,
    Low,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AirTouchModel {
    #[serde(rename = "AIRTOUCH_4")]
    AirTouch4,
    #[serde(rename = "AIRTOUCH_5")]
    AirTouch5,
}

// =====================
// Device state
// =====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcError {
    pub code: u16,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcState {
    pub ac_id: AcId,
    pub name: String,
    pub supported_modes: Vec<AcMode>,
    pub supported_fan_speeds: Vec<AcFanSpeed>,
    pub supported_power_controls: Vec<AcPowerControl>,
    pub power_state: AcPowerState,
    #[serde(default)]
    pub selected_mode: Option<AcMode>,
    /// May lag `selected_mode` while the unit transitions.
    #[serde(default)]
    pub active_mode: Option<AcMode>,
    #[serde(default)]
    pub selected_fan_speed: Option<AcFanSpeed>,
    #[serde(default)]
    pub current_temperature: Option<f64>,
    #[serde(default)]
    pub target_temperature: Option<f64>,
    pub min_target_temperature: f64,
    pub max_target_temperature: f64,
    pub target_temperature_resolution: f64,
    pub spill_state: AcSpillState,
    #[serde(default)]
    pub error: Option<AcError>,
    #[serde(default)]
    pub next_on_timer: Option<NaiveTime>,
    #[serde(default)]
    pub next_off_timer: Option<NaiveTime>,
}

impl AcState {
    pub fn next_quick_timer(&self, timer_type: AcTimerType) -> Option<NaiveTime> {
        match timer_type {
            AcTimerType::OnTimer => self.next_on_timer,
            AcTimerType::OffTimer => self.next_off_timer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneState {
    pub zone_id: ZoneId,
    /// Parent AC. A back-reference by ID only; the zone never owns its AC.
    pub ac_id: AcId,
    pub name: String,
    pub power_state: ZonePowerState,
    pub supported_power_states: Vec<ZonePowerState>,
    /// `None` when the zone has no temperature sensor.
    #[serde(default)]
    pub current_temperature: Option<f64>,
    #[serde(default)]
    pub target_temperature: Option<f64>,
    /// Last reported damper opening, 0..=100.
    pub current_damper_percentage: u8,
    #[serde(default)]
    pub spill_active: bool,
    #[serde(default)]
    pub sensor_battery_status: Option<SensorBatteryStatus>,
    pub control_method: ZoneControlMethod,
}

impl ZoneState {
    pub fn has_temp_sensor(&self) -> bool {
        self.current_temperature.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleState {
    pub airtouch_id: String,
    pub name: String,
    pub model: AirTouchModel,
    /// The first entry is the master console.
    #[serde(default)]
    pub console_versions: Vec<String>,
    #[serde(default)]
    pub update_available: bool,
}
