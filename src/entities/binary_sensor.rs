//! On/off indicators: AC spill or bypass, zone spill, and zone sensor battery.

use crate::config::SpillBypass;
use crate::devices::Device;
use crate::driver::api::{AirConditioner, Zone};
use crate::entities::base::{Entity, EntityCore, UpdateCallback};
use crate::models::airtouch::{AcSpillState, SensorBatteryStatus};
use serde_json::json;
use std::rc::Rc;

pub struct AcSpillBypassEntity {
    core: EntityCore,
    ac: Rc<dyn AirConditioner>,
}

impl AcSpillBypassEntity {
    pub fn new(device: &Device, ac: Rc<dyn AirConditioner>, spill_bypass: SpillBypass) -> Self {
        let core = match spill_bypass {
            SpillBypass::Spill => EntityCore::new(device, "_spill", Some("Spill")),
            SpillBypass::Bypass => EntityCore::new(device, "_bypass", Some("Bypass")),
        };
        AcSpillBypassEntity { core, ac }
    }

    pub fn is_on(&self) -> bool {
        self.ac.state().spill_state != AcSpillState::None
    }
}

impl Entity for AcSpillBypassEntity {
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
        json!({ "is_on": self.is_on() })
    }
}

pub struct ZoneSpillEntity {
    core: EntityCore,
    zone: Rc<dyn Zone>,
}

impl ZoneSpillEntity {
    pub fn new(device: &Device, zone: Rc<dyn Zone>) -> Self {
        ZoneSpillEntity {
            core: EntityCore::new(device, "_spill", Some("Spill")),
            zone,
        }
    }

    pub fn is_on(&self) -> bool {
        self.zone.state().spill_active
    }
}

impl Entity for ZoneSpillEntity {
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
        json!({ "is_on": self.is_on() })
    }
}

/// On when the zone's temperature sensor reports a low battery.
pub struct ZoneBatteryEntity {
    core: EntityCore,
    zone: Rc<dyn Zone>,
}

impl ZoneBatteryEntity {
    pub fn new(device: &Device, zone: Rc<dyn Zone>) -> Self {
        ZoneBatteryEntity {
            core: EntityCore::new(device, "_battery", Some("Battery")),
            zone,
        }
    }

    pub fn is_on(&self) -> bool {
        self.zone.state().sensor_battery_status == Some(SensorBatteryStatus::Low)
    }
}

impl Entity for ZoneBatteryEntity {
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
        json!({ "is_on": self.is_on() })
    }
}
