//! Read-only measurement entities.

use crate::control::spill::spill_percentage;
use crate::control::zone::displayed_damper_percentage;
use crate::devices::Device;
use crate::driver::api::{AirConditioner, Zone};
use crate::entities::base::{Entity, EntityCore, UpdateCallback};
use serde_json::json;
use std::rc::Rc;

pub struct AcTemperatureEntity {
    core: EntityCore,
    ac: Rc<dyn AirConditioner>,
}

impl AcTemperatureEntity {
    pub fn new(device: &Device, ac: Rc<dyn AirConditioner>) -> Self {
        AcTemperatureEntity {
            core: EntityCore::new(device, "_temperature", Some("Temperature")),
            ac,
        }
    }

    pub fn native_value(&self) -> Option<f64> {
        self.ac.state().current_temperature
    }
}

impl Entity for AcTemperatureEntity {
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
        json!({ "native_value": self.native_value(), "unit": "°C" })
    }
}

pub struct ZoneTemperatureEntity {
    core: EntityCore,
    zone: Rc<dyn Zone>,
}

impl ZoneTemperatureEntity {
    pub fn new(device: &Device, zone: Rc<dyn Zone>) -> Self {
        ZoneTemperatureEntity {
            core: EntityCore::new(device, "_temperature", Some("Temperature")),
            zone,
        }
    }

    pub fn native_value(&self) -> Option<f64> {
        self.zone.state().current_temperature
    }
}

impl Entity for ZoneTemperatureEntity {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn subscribe(&mut self, on_update: &UpdateCallback) {
        self.core.watch_zone(&self.zone, on_update);
    }

    fn state(&self) -> serde_json::Value {
        json!({ "native_value": self.native_value(), "unit": "°C" })
    }
}

pub struct ZoneDamperPercentageEntity {
    core: EntityCore,
    zone: Rc<dyn Zone>,
}

impl ZoneDamperPercentageEntity {
    pub fn new(device: &Device, zone: Rc<dyn Zone>) -> Self {
        ZoneDamperPercentageEntity {
            core: EntityCore::new(device, "_open_percentage", Some("Damper Open Percentage")),
            zone,
        }
    }

    pub fn native_value(&self) -> u8 {
        displayed_damper_percentage(&self.zone.state())
    }
}

impl Entity for ZoneDamperPercentageEntity {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn subscribe(&mut self, on_update: &UpdateCallback) {
        self.core.watch_zone(&self.zone, on_update);
    }

    fn state(&self) -> serde_json::Value {
        json!({ "native_value": self.native_value(), "unit": "%" })
    }
}

/// Airflow the AC spills, across `spill_zone_count` spill zones.
pub struct SpillPercentageEntity {
    core: EntityCore,
    ac: Rc<dyn AirConditioner>,
    zones: Vec<Rc<dyn Zone>>,
    spill_zone_count: usize,
}

impl SpillPercentageEntity {
    pub fn new(device: &Device, ac: Rc<dyn AirConditioner>, zones: Vec<Rc<dyn Zone>>, spill_zone_count: usize) -> Self {
        SpillPercentageEntity {
            core: EntityCore::new(device, "_spill_percentage", Some("Spill Percentage")),
            ac,
            zones,
            spill_zone_count,
        }
    }

    pub fn native_value(&self) -> u32 {
        let zones: Vec<_> = self.zones.iter().map(|z| z.state()).collect();
        spill_percentage(&self.ac.state(), &zones, self.spill_zone_count)
    }
}

impl Entity for SpillPercentageEntity {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn subscribe(&mut self, on_update: &UpdateCallback) {
        self.core.watch_ac(&self.ac, on_update);
        for zone in &self.zones {
            self.core.watch_zone(zone, on_update);
        }
    }

    fn state(&self) -> serde_json::Value {
        json!({ "native_value": self.native_value(), "unit": "%" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::MemoryRegistry;
    use crate::driver::memory::MemorySystem;
    use crate::driver::subscription::StateField;
    use crate::models::airtouch::{AcId, AcPowerState, ZoneId, ZonePowerState};
    use crate::snapshot::tests::sample_snapshot;
    use std::cell::Cell;

    fn ac_device() -> (MemoryRegistry, Device) {
        let snapshot = sample_snapshot();
        let mut registry = MemoryRegistry::default();
        let console = Device::console(&mut registry, &snapshot.console);
        let ac = console.air_conditioner(&mut registry, &snapshot.air_conditioners[0]);
        (registry, ac)
    }

    #[test]
    fn damper_percentage_reads_zero_when_off() {
        let system = MemorySystem::from_snapshot(sample_snapshot());
        let (mut registry, ac) = ac_device();
        let zone = system.zone(ZoneId(0)).expect("zone 0");
        let device = ac.zone(&mut registry, &zone.state());
        let sensor = ZoneDamperPercentageEntity::new(&device, Rc::clone(zone) as Rc<dyn Zone>);

        assert_eq!(sensor.unique_id(), "at5-2a1f_ac0_zone0_open_percentage");
        assert_eq!(sensor.native_value(), 40);
        zone.update(StateField::Power, |s| s.power_state = ZonePowerState::Off);
        assert_eq!(sensor.native_value(), 0);
    }

    #[test]
    fn temperatures() {
        let system = MemorySystem::from_snapshot(sample_snapshot());
        let (mut registry, ac) = ac_device();
        let memory_ac = system.ac(AcId(0)).expect("ac 0");
        let ac_sensor = AcTemperatureEntity::new(&ac, Rc::clone(memory_ac) as Rc<dyn AirConditioner>);
        assert_eq!(ac_sensor.native_value(), Some(24.3));
        assert_eq!(ac_sensor.unique_id(), "at5-2a1f_ac0_temperature");

        let zone = system.zone(ZoneId(2)).expect("zone 2");
        let device = ac.zone(&mut registry, &zone.state());
        let zone_sensor = ZoneTemperatureEntity::new(&device, Rc::clone(zone) as Rc<dyn Zone>);
        assert_eq!(zone_sensor.native_value(), Some(24.0));
        assert_eq!(zone_sensor.state()["native_value"], json!(24.0));
    }

    #[test]
    fn spill_percentage_tracks_ac_and_zones() {
        let system = MemorySystem::from_snapshot(sample_snapshot());
        let (_, ac) = ac_device();
        let handle = system.handle();
        let ac_handle = &handle.air_conditioners[0];
        let mut sensor = SpillPercentageEntity::new(&ac, Rc::clone(&ac_handle.ac), ac_handle.zones.clone(), 2);
        assert_eq!(sensor.unique_id(), "at5-2a1f_ac0_spill_percentage");
        assert_eq!(sensor.native_value(), 30);

        let updates = Rc::new(Cell::new(0));
        let counter = Rc::clone(&updates);
        let on_update: UpdateCallback = Rc::new(move |_: &str| counter.set(counter.get() + 1));
        sensor.attach(&on_update);

        let zone = system.zone(ZoneId(3)).expect("zone 3");
        zone.update(StateField::Damper, |s| s.current_damper_percentage = 50);
        assert_eq!(sensor.native_value(), 80);

        system
            .ac(AcId(0))
            .expect("ac 0")
            .update(StateField::Power, |s| s.power_state = AcPowerState::Off);
        assert_eq!(sensor.native_value(), 0);
        assert_eq!(updates.get(), 2);

        sensor.detach();
        assert_eq!(zone.subscriber_count(), 0);
    }
}
