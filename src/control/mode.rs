//! Translation between AC modes/power states and the thermostat vocabulary.
//!
//! All tables are exhaustive `match`es, so a new protocol variant fails to compile
//! until it is mapped.

use crate::driver::api::AcCommand;
use crate::models::airtouch::{AcFanSpeed, AcMode, AcPowerControl, AcPowerState, AcState, ZonePowerState};
use crate::models::climate::{HvacAction, HvacMode, Preset};
use std::error::Error;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ModeError {
    /// The requested HVAC mode has no AC-level mode (i.e. `off`).
    NoAcEquivalent(HvacMode),
}

impl Display for ModeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ModeError::NoAcEquivalent(m) => write!(f, "hvac mode {} has no AC mode equivalent", m),
        }
    }
}

impl Error for ModeError {}

pub fn hvac_mode_for(mode: AcMode) -> HvacMode {
    match mode {
        AcMode::Auto => HvacMode::HeatCool,
        AcMode::Heat => HvacMode::Heat,
        AcMode::Dry => HvacMode::Dry,
        AcMode::Fan => HvacMode::FanOnly,
        AcMode::Cool => HvacMode::Cool,
    }
}

/// Action for the *active* mode. In auto the unit decides, so it reports idle.
pub fn hvac_action_for(mode: AcMode) -> HvacAction {
    match mode {
        AcMode::Auto => HvacAction::Idle,
        AcMode::Heat => HvacAction::Heating,
        AcMode::Dry => HvacAction::Drying,
        AcMode::Fan => HvacAction::Fan,
        AcMode::Cool => HvacAction::Cooling,
    }
}

pub fn ac_mode_for(mode: HvacMode) -> Option<AcMode> {
    match mode {
        HvacMode::Off => None,
        HvacMode::HeatCool => Some(AcMode::Auto),
        HvacMode::Heat => Some(AcMode::Heat),
        HvacMode::Dry => Some(AcMode::Dry),
        HvacMode::FanOnly => Some(AcMode::Fan),
        HvacMode::Cool => Some(AcMode::Cool),
    }
}

/// Off as far as the user is concerned. A forced shutdown is transient and is not.
pub fn is_user_off(power: AcPowerState) -> bool {
    matches!(power, AcPowerState::Off | AcPowerState::OffAway)
}

pub fn ac_hvac_mode(ac: &AcState) -> Option<HvacMode> {
    if is_user_off(ac.power_state) {
        return Some(HvacMode::Off);
    }
    ac.selected_mode.map(hvac_mode_for)
}

pub fn ac_hvac_action(ac: &AcState) -> Option<HvacAction> {
    match ac.power_state {
        AcPowerState::Off | AcPowerState::OffAway => Some(HvacAction::Off),
        AcPowerState::OffForced => Some(HvacAction::Idle),
        AcPowerState::On | AcPowerState::OnAway | AcPowerState::Sleep => ac.active_mode.map(hvac_action_for),
    }
}

pub fn preset_for(power: AcPowerState) -> Preset {
    match power {
        AcPowerState::Off | AcPowerState::On | AcPowerState::OffForced => Preset::None,
        AcPowerState::OffAway | AcPowerState::OnAway => Preset::Away,
        AcPowerState::Sleep => Preset::Sleep,
    }
}

pub fn power_control_for_preset(preset: Preset) -> Option<AcPowerControl> {
    match preset {
        Preset::None => None,
        Preset::Away => Some(AcPowerControl::SetToAway),
        Preset::Sleep => Some(AcPowerControl::SetToSleep),
    }
}

/// `[off]` followed by every supported AC mode.
pub fn supported_hvac_modes(ac: &AcState) -> Vec<HvacMode> {
    std::iter::once(HvacMode::Off)
        .chain(ac.supported_modes.iter().copied().map(hvac_mode_for))
        .collect()
}

/// `[none]` followed by the presets the AC has power controls for.
pub fn supported_presets(ac: &AcState) -> Vec<Preset> {
    std::iter::once(Preset::None)
        .chain([Preset::Away, Preset::Sleep].into_iter().filter(|p| {
            power_control_for_preset(*p).is_some_and(|c| ac.supported_power_controls.contains(&c))
        }))
        .collect()
}

/// `off` powers the unit down; anything else selects the mode and powers on.
pub fn plan_hvac_mode(mode: HvacMode) -> AcCommand {
    match ac_mode_for(mode) {
        None => AcCommand::SetPower(AcPowerControl::TurnOff),
        Some(mode) => AcCommand::SetMode { mode, power_on: true },
    }
}

/// Changes the mode without touching the power state.
pub fn plan_mode_only(mode: HvacMode) -> Result<AcCommand, ModeError> {
    let ac_mode = ac_mode_for(mode).ok_or(ModeError::NoAcEquivalent(mode))?;
    Ok(AcCommand::SetMode {
        mode: ac_mode,
        power_on: false,
    })
}

pub fn fan_mode_name(speed: AcFanSpeed) -> &'static str {
    match speed {
        AcFanSpeed::Auto => "auto",
        AcFanSpeed::Quiet => "quiet",
        AcFanSpeed::Low => "low",
        AcFanSpeed::Medium => "medium",
        AcFanSpeed::High => "high",
        AcFanSpeed::Powerful => "powerful",
        AcFanSpeed::Turbo => "turbo",
        AcFanSpeed::IntelligentAuto => "intelligent",
    }
}

pub fn fan_speed_from_name(name: &str) -> Option<AcFanSpeed> {
    AcFanSpeed::ALL.into_iter().find(|s| fan_mode_name(*s) == name)
}

/// Zones expose their power state as the fan mode.
pub fn zone_fan_mode_name(state: ZonePowerState) -> &'static str {
    match state {
        ZonePowerState::Off => "off",
        ZonePowerState::On => "on",
        ZonePowerState::Turbo => "turbo",
    }
}

pub fn zone_power_from_fan_mode(name: &str) -> Option<ZonePowerState> {
    ZonePowerState::ALL.into_iter().find(|s| zone_fan_mode_name(*s) == name)
}
