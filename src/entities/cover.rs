//! Zone damper exposed as a positionable cover.

use crate::control::damper::plan_damper_position;
use crate::control::zone::{displayed_damper_percentage, is_damper_closed};
use crate::devices::Device;
use crate::driver::api::{send_zone, DriverError, Zone, ZoneCommand};
use crate::entities::base::{Entity, EntityCore, UpdateCallback};
use crate::models::airtouch::ZonePowerState;
use serde_json::json;
use std::rc::Rc;

pub struct ZoneDamperEntity {
    core: EntityCore,
    zone: Rc<dyn Zone>,
}

impl ZoneDamperEntity {
    pub fn new(device: &Device, zone: Rc<dyn Zone>) -> Self {
        ZoneDamperEntity {
            core: EntityCore::new(device, "_damper", Some("Damper")),
            zone,
        }
    }

    pub fn current_position(&self) -> u8 {
        displayed_damper_percentage(&self.zone.state())
    }

    pub fn is_closed(&self) -> bool {
        is_damper_closed(&self.zone.state())
    }

    pub fn open(&self) -> Result<(), DriverError> {
        send_zone(self.zone.as_ref(), &[ZoneCommand::SetPower(ZonePowerState::On)])
    }

    pub fn close(&self) -> Result<(), DriverError> {
        send_zone(self.zone.as_ref(), &[ZoneCommand::SetPower(ZonePowerState::Off)])
    }

    pub fn set_position(&self, position: u8) -> Result<(), DriverError> {
        send_zone(self.zone.as_ref(), &plan_damper_position(position, &self.zone.state()))
    }
}

impl Entity for ZoneDamperEntity {
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
        json!({
            "current_position": self.current_position(),
            "is_closed": self.is_closed(),
        })
    }
}
