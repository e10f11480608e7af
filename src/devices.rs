//! Device registration and unique-id composition.
//!
//! Every platform builds its entities from the same `Device` values so that IDs
//! and device information stay consistent across entity kinds.

use crate::area::{find_area, LocationRecord};
use crate::models::airtouch::{AcState, AirTouchModel, ConsoleState, ZoneState};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

pub const MANUFACTURER: &str = "Polyaire";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifier: String,
    pub name: String,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    /// Identifier of the parent device.
    pub via_device: Option<String>,
    pub suggested_area: Option<String>,
}

/// The host's device and area registries.
pub trait DeviceRegistry {
    fn contains(&self, identifier: &str) -> bool;
    fn create(&mut self, info: DeviceInfo);
    fn areas(&self) -> &[LocationRecord];
}

#[derive(Debug, Default)]
pub struct MemoryRegistry {
    devices: BTreeMap<String, DeviceInfo>,
    areas: Vec<LocationRecord>,
}

impl MemoryRegistry {
    pub fn new(areas: Vec<LocationRecord>) -> Self {
        MemoryRegistry {
            devices: BTreeMap::new(),
            areas,
        }
    }

    pub fn device(&self, identifier: &str) -> Option<&DeviceInfo> {
        self.devices.get(identifier)
    }

    pub fn devices(&self) -> impl Iterator<Item = &DeviceInfo> {
        self.devices.values()
    }
}

impl DeviceRegistry for MemoryRegistry {
    fn contains(&self, identifier: &str) -> bool {
        self.devices.contains_key(identifier)
    }

    fn create(&mut self, info: DeviceInfo) {
        self.devices.insert(info.identifier.clone(), info);
    }

    fn areas(&self) -> &[LocationRecord] {
        &self.areas
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    info: DeviceInfo,
}

impl Device {
    /// Registers the device unless the registry already knows it.
    ///
    /// Only a newly created device gets an area, and only one that already exists.
    fn register(registry: &mut dyn DeviceRegistry, mut info: DeviceInfo) -> Device {
        if !registry.contains(&info.identifier) {
            if let Some(suggested) = info.suggested_area.take() {
                info.suggested_area = match find_area(&suggested, registry.areas()) {
                    Some(m) => {
                        debug!(
                            "Device {}: area '{}' matched '{}' (distance {})",
                            info.identifier, m.area.name, suggested, m.distance
                        );
                        Some(m.area.name.clone())
                    }
                    None => {
                        debug!("Device {}: no area matches '{}'", info.identifier, suggested);
                        None
                    }
                };
            }
            registry.create(info.clone());
        }
        Device { info }
    }

    pub fn console(registry: &mut dyn DeviceRegistry, console: &ConsoleState) -> Device {
        // Serial numbers are not unique on every AirTouch 4, the AirTouch ID is.
        let model = match console.model {
            AirTouchModel::AirTouch4 => "AirTouch 4",
            AirTouchModel::AirTouch5 => "AirTouch 5",
        };
        Device::register(
            registry,
            DeviceInfo {
                identifier: console.airtouch_id.clone(),
                name: console.name.clone(),
                manufacturer: Some(MANUFACTURER.to_string()),
                model: Some(model.to_string()),
                via_device: None,
                suggested_area: None,
            },
        )
    }

    /// AC IDs are only sequential within a console, hence the console prefix.
    pub fn air_conditioner(&self, registry: &mut dyn DeviceRegistry, ac: &AcState) -> Device {
        Device::register(
            registry,
            DeviceInfo {
                identifier: format!("{}_ac{}", self.unique_id(), ac.ac_id.0),
                name: ac.name.clone(),
                manufacturer: None,
                model: None,
                via_device: Some(self.unique_id().to_string()),
                suggested_area: None,
            },
        )
    }

    /// Zones are named by their occupants, so the name doubles as the area hint.
    pub fn zone(&self, registry: &mut dyn DeviceRegistry, zone: &ZoneState) -> Device {
        Device::register(
            registry,
            DeviceInfo {
                identifier: format!("{}_zone{}", self.unique_id(), zone.zone_id.0),
                name: zone.name.clone(),
                manufacturer: Some(MANUFACTURER.to_string()),
                model: None,
                via_device: Some(self.unique_id().to_string()),
                suggested_area: Some(zone.name.clone()),
            },
        )
    }

    pub fn unique_id(&self) -> &str {
        &self.info.identifier
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }
}
