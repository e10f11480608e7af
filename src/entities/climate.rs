//! Thermostat entities for ACs and for zones with a temperature sensor.

use crate::control::mode::{
    ac_hvac_action, ac_hvac_mode, fan_mode_name, fan_speed_from_name, hvac_mode_for, plan_hvac_mode, plan_mode_only,
    power_control_for_preset, preset_for, supported_hvac_modes, supported_presets, zone_fan_mode_name,
    zone_power_from_fan_mode, ModeError,
};
use crate::control::zone::{plan_zone_hvac_mode, zone_hvac_action, zone_hvac_mode, zone_hvac_modes};
use crate::devices::Device;
use crate::driver::api::{send_ac, send_zone, AcCommand, AirConditioner, DriverError, Zone, ZoneCommand};
use crate::entities::base::{Entity, EntityCore, UpdateCallback};
use crate::models::airtouch::{AcPowerControl, ZonePowerState};
use crate::models::climate::{HvacAction, HvacMode, Preset};
use crate::utils::lower_enum_name;
use log::warn;
use serde_json::json;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum ClimateError {
    /// The mode is not among the modes the entity advertises.
    UnsupportedHvacMode(HvacMode),
    /// The fan mode is unknown or not advertised by the device.
    UnsupportedFanMode(String),
    Mode(ModeError),
    /// The AC has not reported its selected mode yet.
    UnknownAcMode,
    NoTemperatureSensor,
    Driver(DriverError),
}

impl Display for ClimateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ClimateError::UnsupportedHvacMode(m) => write!(f, "unsupported hvac mode: {}", m),
            ClimateError::UnsupportedFanMode(m) => write!(f, "unsupported fan mode: {}", m),
            ClimateError::Mode(e) => write!(f, "{}", e),
            ClimateError::UnknownAcMode => write!(f, "AC mode is unknown"),
            ClimateError::NoTemperatureSensor => write!(f, "zone has no temperature sensor"),
            ClimateError::Driver(e) => write!(f, "driver error: {}", e),
        }
    }
}

impl Error for ClimateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClimateError::Mode(e) => Some(e),
            ClimateError::Driver(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DriverError> for ClimateError {
    fn from(value: DriverError) -> Self {
        ClimateError::Driver(value)
    }
}

impl From<ModeError> for ClimateError {
    fn from(value: ModeError) -> Self {
        ClimateError::Mode(value)
    }
}

fn target_step(resolution: f64, min_step: f64) -> f64 {
    resolution.max(min_step)
}

// =====================
// AC climate
// =====================

pub struct AcClimateEntity {
    core: EntityCore,
    ac: Rc<dyn AirConditioner>,
    target_temperature_step: f64,
}

impl AcClimateEntity {
    pub fn new(device: &Device, ac: Rc<dyn AirConditioner>, min_target_temperature_step: f64) -> Self {
        let resolution = ac.state().target_temperature_resolution;
        AcClimateEntity {
            core: EntityCore::new(device, "", None),
            ac,
            target_temperature_step: target_step(resolution, min_target_temperature_step),
        }
    }

    pub fn hvac_modes(&self) -> Vec<HvacMode> {
        supported_hvac_modes(&self.ac.state())
    }

    pub fn fan_modes(&self) -> Vec<&'static str> {
        self.ac.state().supported_fan_speeds.into_iter().map(fan_mode_name).collect()
    }

    pub fn preset_modes(&self) -> Vec<Preset> {
        supported_presets(&self.ac.state())
    }

    pub fn current_temperature(&self) -> Option<f64> {
        self.ac.state().current_temperature
    }

    pub fn target_temperature(&self) -> Option<f64> {
        self.ac.state().target_temperature
    }

    pub fn min_temp(&self) -> f64 {
        self.ac.state().min_target_temperature
    }

    pub fn max_temp(&self) -> f64 {
        self.ac.state().max_target_temperature
    }

    pub fn target_temperature_step(&self) -> f64 {
        self.target_temperature_step
    }

    pub fn fan_mode(&self) -> Option<&'static str> {
        self.ac.state().selected_fan_speed.map(fan_mode_name)
    }

    pub fn hvac_mode(&self) -> Option<HvacMode> {
        ac_hvac_mode(&self.ac.state())
    }

    pub fn hvac_action(&self) -> Option<HvacAction> {
        ac_hvac_action(&self.ac.state())
    }

    pub fn preset_mode(&self) -> Preset {
        preset_for(self.ac.state().power_state)
    }

    /// The selected mode even while the AC is off.
    pub fn last_active_hvac_mode(&self) -> Option<HvacMode> {
        self.ac.state().selected_mode.map(hvac_mode_for)
    }

    pub fn update_min_target_temperature_step(&mut self, min_step: f64) {
        self.target_temperature_step = target_step(self.ac.state().target_temperature_resolution, min_step);
    }

    fn ensure_supported(&self, mode: HvacMode) -> Result<(), ClimateError> {
        if self.hvac_modes().contains(&mode) {
            Ok(())
        } else {
            Err(ClimateError::UnsupportedHvacMode(mode))
        }
    }

    pub fn set_fan_mode(&self, fan_mode: &str) -> Result<(), ClimateError> {
        let supported = self.ac.state().supported_fan_speeds;
        let speed = fan_speed_from_name(fan_mode)
            .filter(|s| supported.contains(s))
            .ok_or_else(|| ClimateError::UnsupportedFanMode(fan_mode.to_string()))?;
        send_ac(self.ac.as_ref(), AcCommand::SetFanSpeed(speed))?;
        Ok(())
    }

    pub fn set_hvac_mode(&self, mode: HvacMode) -> Result<(), ClimateError> {
        self.ensure_supported(mode)?;
        send_ac(self.ac.as_ref(), plan_hvac_mode(mode))?;
        Ok(())
    }

    /// Powers on in the last used mode.
    pub fn turn_on(&self) -> Result<(), ClimateError> {
        send_ac(self.ac.as_ref(), AcCommand::SetPower(AcPowerControl::TurnOn))?;
        Ok(())
    }

    pub fn turn_off(&self) -> Result<(), ClimateError> {
        send_ac(self.ac.as_ref(), AcCommand::SetPower(AcPowerControl::TurnOff))?;
        Ok(())
    }

    /// Unknown preset names are logged and ignored.
    pub fn set_preset_mode(&self, preset: &str) -> Result<(), ClimateError> {
        match preset.parse::<Preset>() {
            Ok(p) => {
                if let Some(control) = power_control_for_preset(p) {
                    send_ac(self.ac.as_ref(), AcCommand::SetPower(control))?;
                }
            }
            Err(_) => warn!("Unsupported preset mode: {}", preset),
        }
        Ok(())
    }

    pub fn set_temperature(&self, temperature: f64, hvac_mode: Option<HvacMode>) -> Result<(), ClimateError> {
        send_ac(self.ac.as_ref(), AcCommand::SetTargetTemperature(temperature))?;
        if let Some(mode) = hvac_mode {
            self.set_hvac_mode(mode)?;
        }
        Ok(())
    }

    /// Changes the mode but leaves the power state alone: an AC that is off stays off.
    pub fn set_hvac_mode_only(&self, mode: HvacMode) -> Result<(), ClimateError> {
        let command = plan_mode_only(mode)?;
        self.ensure_supported(mode)?;
        send_ac(self.ac.as_ref(), command)?;
        Ok(())
    }
}

impl Entity for AcClimateEntity {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn subscribe(&mut self, on_update: &UpdateCallback) {
        self.core.watch_ac(&self.ac, on_update);
    }

    fn state(&self) -> serde_json::Value {
        json!({
            "hvac_mode": self.hvac_mode(),
            "hvac_action": self.hvac_action(),
            "hvac_modes": self.hvac_modes(),
            "current_temperature": self.current_temperature(),
            "target_temperature": self.target_temperature(),
            "target_temperature_step": self.target_temperature_step,
            "min_temp": self.min_temp(),
            "max_temp": self.max_temp(),
            "fan_mode": self.fan_mode(),
            "fan_modes": self.fan_modes(),
            "preset_mode": self.preset_mode(),
            "preset_modes": self.preset_modes(),
            "last_active_hvac_mode": self.last_active_hvac_mode(),
        })
    }
}

// =====================
// Zone climate
// =====================

pub struct ZoneClimateEntity {
    core: EntityCore,
    ac: Rc<dyn AirConditioner>,
    zone: Rc<dyn Zone>,
    target_temperature_step: f64,
    allow_zone_hvac_mode_changes: bool,
}

impl ZoneClimateEntity {
    pub fn new(
        device: &Device,
        ac: Rc<dyn AirConditioner>,
        zone: Rc<dyn Zone>,
        min_target_temperature_step: f64,
        allow_zone_hvac_mode_changes: bool,
    ) -> Self {
        let resolution = ac.state().target_temperature_resolution;
        ZoneClimateEntity {
            core: EntityCore::new(device, "", None),
            ac,
            zone,
            target_temperature_step: target_step(resolution, min_target_temperature_step),
            allow_zone_hvac_mode_changes,
        }
    }

    pub fn hvac_modes(&self) -> Vec<HvacMode> {
        zone_hvac_modes(&self.ac.state(), self.allow_zone_hvac_mode_changes)
    }

    pub fn current_temperature(&self) -> Option<f64> {
        self.zone.state().current_temperature
    }

    pub fn target_temperature(&self) -> Option<f64> {
        self.zone.state().target_temperature
    }

    pub fn min_temp(&self) -> f64 {
        self.ac.state().min_target_temperature
    }

    pub fn max_temp(&self) -> f64 {
        self.ac.state().max_target_temperature
    }

    pub fn target_temperature_step(&self) -> f64 {
        self.target_temperature_step
    }

    pub fn allow_zone_hvac_mode_changes(&self) -> bool {
        self.allow_zone_hvac_mode_changes
    }

    pub fn fan_mode(&self) -> &'static str {
        zone_fan_mode_name(self.zone.state().power_state)
    }

    pub fn fan_modes(&self) -> Vec<&'static str> {
        self.zone
            .state()
            .supported_power_states
            .into_iter()
            .map(zone_fan_mode_name)
            .collect()
    }

    pub fn hvac_mode(&self) -> Option<HvacMode> {
        zone_hvac_mode(&self.zone.state(), &self.ac.state())
    }

    pub fn hvac_action(&self) -> Option<HvacAction> {
        zone_hvac_action(&self.zone.state(), &self.ac.state())
    }

    pub fn control_method(&self) -> String {
        lower_enum_name(&self.zone.state().control_method).unwrap_or_default()
    }

    pub fn update_min_target_temperature_step(&mut self, min_step: f64) {
        self.target_temperature_step = target_step(self.ac.state().target_temperature_resolution, min_step);
    }

    pub fn update_allow_zone_hvac_mode_changes(&mut self, allow_mode_changes: bool) {
        self.allow_zone_hvac_mode_changes = allow_mode_changes;
    }

    pub fn set_temperature(&self, temperature: f64, hvac_mode: Option<HvacMode>) -> Result<(), ClimateError> {
        if !self.zone.state().has_temp_sensor() {
            return Err(ClimateError::NoTemperatureSensor);
        }
        send_zone(self.zone.as_ref(), &[ZoneCommand::SetTargetTemperature(temperature)])?;
        if let Some(mode) = hvac_mode {
            self.set_hvac_mode(mode)?;
        }
        Ok(())
    }

    pub fn set_fan_mode(&self, fan_mode: &str) -> Result<(), ClimateError> {
        let supported = self.zone.state().supported_power_states;
        let power = zone_power_from_fan_mode(fan_mode)
            .filter(|p| supported.contains(p))
            .ok_or_else(|| ClimateError::UnsupportedFanMode(fan_mode.to_string()))?;
        send_zone(self.zone.as_ref(), &[ZoneCommand::SetPower(power)])?;
        Ok(())
    }

    /// Any mode other than `off` turns the zone on.
    ///
    /// The sub-commands are sent one by one; a failure stops the sequence with every
    /// command sent so far already applied.
    pub fn set_hvac_mode(&self, mode: HvacMode) -> Result<(), ClimateError> {
        let ac = self.ac.state();
        if !zone_hvac_modes(&ac, self.allow_zone_hvac_mode_changes).contains(&mode) {
            return Err(ClimateError::UnsupportedHvacMode(mode));
        }
        let plan = plan_zone_hvac_mode(mode, &self.zone.state(), &ac, self.allow_zone_hvac_mode_changes);
        if let Some(command) = plan.ac {
            send_ac(self.ac.as_ref(), command)?;
        }
        send_zone(self.zone.as_ref(), &plan.zone)?;
        Ok(())
    }

    /// Activates the zone in the AC's current mode, even if the AC is off.
    pub fn turn_on(&self) -> Result<(), ClimateError> {
        let mode = self.ac.state().selected_mode.ok_or(ClimateError::UnknownAcMode)?;
        self.set_hvac_mode(hvac_mode_for(mode))
    }

    pub fn turn_off(&self) -> Result<(), ClimateError> {
        send_zone(self.zone.as_ref(), &[ZoneCommand::SetPower(ZonePowerState::Off)])?;
        Ok(())
    }
}

impl Entity for ZoneClimateEntity {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn subscribe(&mut self, on_update: &UpdateCallback) {
        self.core.watch_zone(&self.zone, on_update);
        // Mode and action follow the parent AC.
        self.core.watch_ac(&self.ac, on_update);
    }

    fn state(&self) -> serde_json::Value {
        json!({
            "hvac_mode": self.hvac_mode(),
            "hvac_action": self.hvac_action(),
            "hvac_modes": self.hvac_modes(),
            "current_temperature": self.current_temperature(),
            "target_temperature": self.target_temperature(),
            "target_temperature_step": self.target_temperature_step,
            "min_temp": self.min_temp(),
            "max_temp": self.max_temp(),
            "fan_mode": self.fan_mode(),
            "fan_modes": self.fan_modes(),
            "control_method": self.control_method(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::MemoryRegistry;
    use crate::driver::api::IssuedCommand;
    use crate::driver::memory::MemorySystem;
    use crate::driver::subscription::StateField;
    use crate::models::airtouch::{AcFanSpeed, AcId, AcMode, AcPowerState, ZoneId};
    use crate::snapshot::tests::sample_snapshot;
    use std::cell::RefCell;

    struct Fixture {
        system: MemorySystem,
        registry: MemoryRegistry,
        ac_device: Device,
    }

    fn fixture() -> Fixture {
        let snapshot = sample_snapshot();
        let system = MemorySystem::from_snapshot(snapshot.clone());
        let mut registry = MemoryRegistry::default();
        let console = Device::console(&mut registry, &snapshot.console);
        let ac_device = console.air_conditioner(&mut registry, &snapshot.air_conditioners[0]);
        Fixture {
            system,
            registry,
            ac_device,
        }
    }

    impl Fixture {
        fn ac(&self) -> Rc<dyn AirConditioner> {
            Rc::clone(self.system.ac(AcId(0)).expect("ac 0")) as Rc<dyn AirConditioner>
        }

        fn ac_entity(&self, min_step: f64) -> AcClimateEntity {
            AcClimateEntity::new(&self.ac_device, self.ac(), min_step)
        }

        fn zone_entity(&mut self, zone_id: u8, allow: bool) -> ZoneClimateEntity {
            let zone = Rc::clone(self.system.zone(ZoneId(zone_id)).expect("zone")) as Rc<dyn Zone>;
            let device = self.ac_device.zone(&mut self.registry, &zone.state());
            ZoneClimateEntity::new(&device, self.ac(), zone, 0.1, allow)
        }
    }

    #[test]
    fn unsupported_fan_mode_fails_before_dispatch() {
        let f = fixture();
        let entity = f.ac_entity(0.1);
        assert_eq!(entity.hvac_mode(), Some(HvacMode::Cool));

        let err = entity.set_fan_mode("turbo").unwrap_err();
        assert_eq!(err, ClimateError::UnsupportedFanMode("turbo".to_string()));
        assert!(entity.set_fan_mode("ludicrous").is_err());
        assert!(f.system.commands().is_empty());

        entity.set_fan_mode("high").unwrap();
        assert_eq!(
            f.system.commands(),
            vec![IssuedCommand::Ac(AcId(0), AcCommand::SetFanSpeed(AcFanSpeed::High))]
        );
        assert_eq!(entity.fan_mode(), Some("high"));
    }

    #[test]
    fn hvac_mode_requests() {
        let f = fixture();
        let entity = f.ac_entity(0.1);

        entity.set_hvac_mode(HvacMode::Off).unwrap();
        assert_eq!(entity.hvac_mode(), Some(HvacMode::Off));
        assert_eq!(entity.hvac_action(), Some(HvacAction::Off));
        assert_eq!(entity.last_active_hvac_mode(), Some(HvacMode::Cool));

        entity.set_hvac_mode(HvacMode::Heat).unwrap();
        assert_eq!(
            f.system.commands(),
            vec![
                IssuedCommand::Ac(AcId(0), AcCommand::SetPower(AcPowerControl::TurnOff)),
                IssuedCommand::Ac(
                    AcId(0),
                    AcCommand::SetMode {
                        mode: AcMode::Heat,
                        power_on: true
                    }
                ),
            ]
        );
        assert_eq!(entity.hvac_action(), Some(HvacAction::Heating));
    }

    #[test]
    fn unadvertised_hvac_mode_is_rejected() {
        let f = fixture();
        f.system
            .ac(AcId(0))
            .unwrap()
            .update(StateField::Mode, |s| s.supported_modes = vec![AcMode::Cool]);
        let entity = f.ac_entity(0.1);
        assert_eq!(
            entity.set_hvac_mode(HvacMode::Heat),
            Err(ClimateError::UnsupportedHvacMode(HvacMode::Heat))
        );
        assert!(f.system.commands().is_empty());
    }

    #[test]
    fn presets_are_soft() {
        let f = fixture();
        let entity = f.ac_entity(0.1);

        entity.set_preset_mode("boost").unwrap();
        entity.set_preset_mode("none").unwrap();
        assert!(f.system.commands().is_empty());

        entity.set_preset_mode("sleep").unwrap();
        assert_eq!(entity.preset_mode(), Preset::Sleep);
        entity.set_preset_mode("away").unwrap();
        assert_eq!(entity.preset_mode(), Preset::Away);
        assert_eq!(f.system.commands().len(), 2);
    }

    #[test]
    fn mode_only_keeps_power_state() {
        let f = fixture();
        let entity = f.ac_entity(0.1);
        entity.turn_off().unwrap();
        f.system.clear_commands();

        assert_eq!(
            entity.set_hvac_mode_only(HvacMode::Off),
            Err(ClimateError::Mode(ModeError::NoAcEquivalent(HvacMode::Off)))
        );
        entity.set_hvac_mode_only(HvacMode::Dry).unwrap();
        assert_eq!(
            f.system.commands(),
            vec![IssuedCommand::Ac(
                AcId(0),
                AcCommand::SetMode {
                    mode: AcMode::Dry,
                    power_on: false
                }
            )]
        );
        assert_eq!(entity.hvac_mode(), Some(HvacMode::Off));
        assert_eq!(entity.last_active_hvac_mode(), Some(HvacMode::Dry));
    }

    #[test]
    fn temperature_with_mode() {
        let f = fixture();
        let entity = f.ac_entity(0.1);
        entity.set_temperature(23.5, Some(HvacMode::HeatCool)).unwrap();
        assert_eq!(entity.target_temperature(), Some(23.5));
        assert_eq!(entity.hvac_mode(), Some(HvacMode::HeatCool));
        assert_eq!(f.system.commands().len(), 2);
    }

    #[test]
    fn temperature_step_respects_minimum() {
        let f = fixture();
        let mut entity = f.ac_entity(0.5);
        assert_eq!(entity.target_temperature_step(), 0.5);
        entity.update_min_target_temperature_step(0.1);
        assert_eq!(entity.target_temperature_step(), 0.1);
        entity.update_min_target_temperature_step(1.0);
        assert_eq!(entity.target_temperature_step(), 1.0);
    }

    #[test]
    fn derived_state_follows_driver_updates() {
        let f = fixture();
        let entity = f.ac_entity(0.1);
        let ac = f.system.ac(AcId(0)).unwrap();

        ac.update(StateField::Power, |s| s.power_state = AcPowerState::OffForced);
        assert_eq!(entity.hvac_mode(), Some(HvacMode::Cool));
        assert_eq!(entity.hvac_action(), Some(HvacAction::Idle));

        ac.update(StateField::Mode, |s| {
            s.power_state = AcPowerState::On;
            s.active_mode = None;
        });
        assert_eq!(entity.hvac_action(), None);
        assert_eq!(entity.state()["hvac_action"], serde_json::Value::Null);
    }

    #[test]
    fn zone_toggles_when_ac_is_off() {
        let mut f = fixture();
        f.system
            .ac(AcId(0))
            .unwrap()
            .update(StateField::Power, |s| s.power_state = AcPowerState::Off);
        let zone = f.zone_entity(0, false);

        zone.set_hvac_mode(HvacMode::Cool).unwrap();
        assert_eq!(
            f.system.commands(),
            vec![
                IssuedCommand::Zone(ZoneId(0), ZoneCommand::SetPower(ZonePowerState::Off)),
                IssuedCommand::Zone(ZoneId(0), ZoneCommand::SetPower(ZonePowerState::On)),
            ]
        );
    }

    #[test]
    fn zone_mode_change_goes_to_ac_first() {
        let mut f = fixture();
        let zone = f.zone_entity(2, true);
        assert_eq!(zone.hvac_mode(), Some(HvacMode::Off));
        assert_eq!(zone.hvac_modes().len(), 6);

        zone.set_hvac_mode(HvacMode::Heat).unwrap();
        assert_eq!(
            f.system.commands(),
            vec![
                IssuedCommand::Ac(
                    AcId(0),
                    AcCommand::SetMode {
                        mode: AcMode::Heat,
                        power_on: false
                    }
                ),
                IssuedCommand::Zone(ZoneId(2), ZoneCommand::SetPower(ZonePowerState::On)),
            ]
        );
        assert_eq!(zone.hvac_mode(), Some(HvacMode::Heat));
    }

    #[test]
    fn zone_modes_without_permission() {
        let mut f = fixture();
        let mut zone = f.zone_entity(0, false);
        assert_eq!(zone.hvac_modes(), vec![HvacMode::Off, HvacMode::Cool]);
        zone.update_allow_zone_hvac_mode_changes(true);
        assert!(zone.hvac_modes().contains(&HvacMode::Dry));
    }

    #[test]
    fn zone_rejects_modes_it_does_not_offer() {
        let mut f = fixture();
        let zone = f.zone_entity(2, false);
        assert_eq!(zone.hvac_modes(), vec![HvacMode::Off, HvacMode::Cool]);

        assert_eq!(
            zone.set_hvac_mode(HvacMode::Heat),
            Err(ClimateError::UnsupportedHvacMode(HvacMode::Heat))
        );
        assert!(f.system.commands().is_empty());
        assert_eq!(zone.hvac_mode(), Some(HvacMode::Off));
    }

    #[test]
    fn zone_turn_on_needs_known_mode() {
        let mut f = fixture();
        f.system.ac(AcId(0)).unwrap().update(StateField::Mode, |s| s.selected_mode = None);
        let zone = f.zone_entity(2, false);
        assert_eq!(zone.turn_on(), Err(ClimateError::UnknownAcMode));
        assert!(f.system.commands().is_empty());
    }

    #[test]
    fn zone_driver_failure_is_returned() {
        let mut f = fixture();
        let zone = f.zone_entity(2, false);
        f.system.set_offline(true);
        assert!(matches!(zone.turn_on(), Err(ClimateError::Driver(DriverError::Offline(_)))));
        assert_eq!(zone.hvac_mode(), Some(HvacMode::Off));
    }

    #[test]
    fn zone_fan_modes_come_from_power_states() {
        let mut f = fixture();
        let zone = f.zone_entity(0, false);
        assert_eq!(zone.fan_modes(), vec!["off", "on", "turbo"]);
        zone.set_fan_mode("turbo").unwrap();
        assert_eq!(zone.fan_mode(), "turbo");
        assert_eq!(zone.hvac_mode(), Some(HvacMode::Cool));
        assert_eq!(zone.control_method(), "temperature");

        let kitchen = f.zone_entity(1, false);
        assert!(kitchen.set_fan_mode("turbo").is_err());
        assert_eq!(kitchen.set_temperature(21.0, None), Err(ClimateError::NoTemperatureSensor));
    }

    #[test]
    fn zone_entity_watches_zone_and_ac() {
        let mut f = fixture();
        let mut zone = f.zone_entity(0, false);
        let seen = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&seen);
        let on_update: UpdateCallback = Rc::new(move |_: &str| *counter.borrow_mut() += 1);

        zone.attach(&on_update);
        zone.attach(&on_update);
        f.system.ac(AcId(0)).unwrap().update(StateField::Mode, |_| {});
        f.system.zone(ZoneId(0)).unwrap().update(StateField::Damper, |_| {});
        assert_eq!(*seen.borrow(), 2);

        zone.detach();
        f.system.ac(AcId(0)).unwrap().update(StateField::Mode, |_| {});
        assert_eq!(*seen.borrow(), 2);
        assert_eq!(f.system.ac(AcId(0)).unwrap().subscriber_count(), 0);
    }
}
