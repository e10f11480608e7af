//! Synthetic AirTouch systems for running the bridge without a console.

use crate::driver::memory::MemorySystem;
use crate::driver::subscription::StateField;
use crate::models::airtouch::{
    AcFanSpeed, AcId, AcMode, AcPowerControl, AcPowerState, AcSpillState, AcState, AirTouchModel, ConsoleState,
    SensorBatteryStatus, ZoneControlMethod, ZoneId, ZonePowerState, ZoneState,
};
use crate::snapshot::SystemSnapshot;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const ZONE_NAMES: [&str; 8] = [
    "Living Room",
    "Kitchen",
    "Bedroom 1",
    "Bedroom 2",
    "Home Office",
    "Bathroom",
    "Hallway",
    "Nursery",
];

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A plausible single-AC system. The same seed always yields the same system.
pub fn generate_system(seed: u64) -> SystemSnapshot {
    let mut rng = SmallRng::seed_from_u64(seed);
    let model = if rng.random_bool(0.5) {
        AirTouchModel::AirTouch5
    } else {
        AirTouchModel::AirTouch4
    };

    let console = ConsoleState {
        airtouch_id: format!("sim-{:04x}", rng.random_range(0..=0xffffu32)),
        name: match model {
            AirTouchModel::AirTouch4 => "AirTouch 4".to_string(),
            AirTouchModel::AirTouch5 => "AirTouch 5".to_string(),
        },
        model,
        console_versions: vec![format!("1.{}.{}", rng.random_range(0..=4u8), rng.random_range(0..=9u8))],
        update_available: rng.random_bool(0.2),
    };

    let mode = AcMode::ALL[rng.random_range(0..AcMode::ALL.len())];
    let on = rng.random_bool(0.7);
    let ac = AcState {
        ac_id: AcId(0),
        name: "Ducted".to_string(),
        supported_modes: AcMode::ALL.to_vec(),
        supported_fan_speeds: vec![AcFanSpeed::Auto, AcFanSpeed::Low, AcFanSpeed::Medium, AcFanSpeed::High],
        supported_power_controls: vec![
            AcPowerControl::TurnOff,
            AcPowerControl::TurnOn,
            AcPowerControl::SetToAway,
            AcPowerControl::SetToSleep,
        ],
        power_state: if on { AcPowerState::On } else { AcPowerState::Off },
        selected_mode: Some(mode),
        active_mode: Some(mode),
        selected_fan_speed: Some(AcFanSpeed::Auto),
        current_temperature: Some(round_tenth(rng.random_range(16.0..=30.0))),
        target_temperature: Some(rng.random_range(20..=25) as f64),
        min_target_temperature: 16.0,
        max_target_temperature: 30.0,
        target_temperature_resolution: match model {
            AirTouchModel::AirTouch4 => 1.0,
            AirTouchModel::AirTouch5 => 0.1,
        },
        spill_state: AcSpillState::None,
        error: None,
        next_on_timer: None,
        next_off_timer: None,
    };

    let zone_count = rng.random_range(3..=ZONE_NAMES.len());
    let zones = ZONE_NAMES[..zone_count]
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let has_sensor = rng.random_bool(0.6);
            let power_state = if rng.random_bool(0.75) {
                ZonePowerState::On
            } else {
                ZonePowerState::Off
            };
            ZoneState {
                zone_id: ZoneId(index as u8),
                ac_id: AcId(0),
                name: name.to_string(),
                power_state,
                supported_power_states: vec![ZonePowerState::Off, ZonePowerState::On, ZonePowerState::Turbo],
                current_temperature: has_sensor.then(|| round_tenth(rng.random_range(17.0..=28.0))),
                target_temperature: has_sensor.then(|| rng.random_range(19..=24) as f64),
                current_damper_percentage: rng.random_range(0..=20u8) * 5,
                spill_active: false,
                sensor_battery_status: has_sensor.then(|| {
                    if rng.random_bool(0.1) {
                        SensorBatteryStatus::Low
                    } else {
                        SensorBatteryStatus::Normal
                    }
                }),
                control_method: if has_sensor {
                    ZoneControlMethod::Temperature
                } else {
                    ZoneControlMethod::Percentage
                },
            }
        })
        .collect();

    SystemSnapshot {
        console,
        air_conditioners: vec![ac],
        zones,
    }
}

/// Drives random state changes through a memory system, as a console would report them.
pub struct Simulator {
    rng: SmallRng,
}

impl Simulator {
    pub fn new(seed: u64) -> Self {
        Simulator {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Drifts one temperature reading by up to half a degree.
    pub fn step(&mut self, system: &MemorySystem) {
        let drift = round_tenth(self.rng.random_range(-0.5..=0.5));
        let pick = self.rng.random_range(0..=system.zones.len());
        match pick.checked_sub(1).and_then(|i| system.zones.get(i)) {
            Some(zone) => zone.update(StateField::Temperature, |s| {
                if let Some(t) = s.current_temperature.as_mut() {
                    *t = round_tenth(*t + drift);
                    debug!("Simulated zone {} temperature {}", s.zone_id.0, t);
                }
            }),
            None => {
                for ac in &system.air_conditioners {
                    ac.update(StateField::Temperature, |s| {
                        if let Some(t) = s.current_temperature.as_mut() {
                            *t = round_tenth(*t + drift);
                            debug!("Simulated AC {} temperature {}", s.ac_id.0, t);
                        }
                    });
                }
            }
        }
    }
}
