//! Entity discovery for one AirTouch system.

use crate::config::{Options, SpillBypass};
use crate::devices::{Device, DeviceRegistry};
use crate::driver::api::AirTouchSystem;
use crate::entities::base::{Entity, UpdateCallback};
use crate::entities::binary_sensor::{AcSpillBypassEntity, ZoneBatteryEntity, ZoneSpillEntity};
use crate::entities::climate::{AcClimateEntity, ZoneClimateEntity};
use crate::entities::cover::ZoneDamperEntity;
use crate::entities::sensor::{
    AcTemperatureEntity, SpillPercentageEntity, ZoneDamperPercentageEntity, ZoneTemperatureEntity,
};
use crate::entities::timer::AcQuickTimerEntity;
use crate::entities::update::ConsoleUpdateEntity;
use crate::models::airtouch::{AcTimerType, AirTouchModel};
use log::debug;
use std::rc::Rc;

/// Every entity created for a system, grouped by kind.
#[derive(Default)]
pub struct EntitySet {
    pub ac_climates: Vec<AcClimateEntity>,
    pub zone_climates: Vec<ZoneClimateEntity>,
    pub dampers: Vec<ZoneDamperEntity>,
    pub ac_temperatures: Vec<AcTemperatureEntity>,
    pub zone_temperatures: Vec<ZoneTemperatureEntity>,
    pub damper_percentages: Vec<ZoneDamperPercentageEntity>,
    pub spill_percentages: Vec<SpillPercentageEntity>,
    pub ac_spill_bypass: Vec<AcSpillBypassEntity>,
    pub zone_spills: Vec<ZoneSpillEntity>,
    pub zone_batteries: Vec<ZoneBatteryEntity>,
    pub quick_timers: Vec<AcQuickTimerEntity>,
    pub updates: Vec<ConsoleUpdateEntity>,
}

pub fn setup_entities(system: &AirTouchSystem, options: &Options, registry: &mut dyn DeviceRegistry) -> EntitySet {
    let mut set = EntitySet::default();
    let console = system.console.state();
    let console_device = Device::console(registry, &console);

    set.updates
        .push(ConsoleUpdateEntity::new(&console_device, Rc::clone(&system.console)));

    let spill_zones = options.spill_zones();
    // AirTouch 4 does not report bypass status.
    let has_spill_bypass_sensor =
        options.spill_bypass == SpillBypass::Spill || console.model != AirTouchModel::AirTouch4;

    for handle in &system.air_conditioners {
        let ac_state = handle.ac.state();
        let ac_device = console_device.air_conditioner(registry, &ac_state);

        set.ac_climates.push(AcClimateEntity::new(
            &ac_device,
            Rc::clone(&handle.ac),
            options.min_target_temperature_step,
        ));
        set.ac_temperatures
            .push(AcTemperatureEntity::new(&ac_device, Rc::clone(&handle.ac)));
        for timer_type in AcTimerType::ALL {
            set.quick_timers
                .push(AcQuickTimerEntity::new(&ac_device, Rc::clone(&handle.ac), timer_type));
        }
        if has_spill_bypass_sensor {
            set.ac_spill_bypass.push(AcSpillBypassEntity::new(
                &ac_device,
                Rc::clone(&handle.ac),
                options.spill_bypass,
            ));
        }

        let mut spill_zone_count = 0;
        for zone in &handle.zones {
            let zone_state = zone.state();
            let zone_device = ac_device.zone(registry, &zone_state);

            set.dampers.push(ZoneDamperEntity::new(&zone_device, Rc::clone(zone)));
            set.damper_percentages
                .push(ZoneDamperPercentageEntity::new(&zone_device, Rc::clone(zone)));

            if zone_state.has_temp_sensor() {
                set.zone_climates.push(ZoneClimateEntity::new(
                    &zone_device,
                    Rc::clone(&handle.ac),
                    Rc::clone(zone),
                    options.min_target_temperature_step,
                    options.allow_zone_hvac_mode_changes,
                ));
                set.zone_temperatures
                    .push(ZoneTemperatureEntity::new(&zone_device, Rc::clone(zone)));
                set.zone_batteries
                    .push(ZoneBatteryEntity::new(&zone_device, Rc::clone(zone)));
            }

            // An empty list means spill zones were never selected, so every zone gets one.
            if options.spill_bypass == SpillBypass::Spill
                && (spill_zones.is_empty() || spill_zones.contains(&zone_state.zone_id))
            {
                set.zone_spills.push(ZoneSpillEntity::new(&zone_device, Rc::clone(zone)));
            }

            if spill_zones.contains(&zone_state.zone_id) {
                spill_zone_count += 1;
            }
        }

        if spill_zone_count > 0 {
            set.spill_percentages.push(SpillPercentageEntity::new(
                &ac_device,
                Rc::clone(&handle.ac),
                handle.zones.clone(),
                spill_zone_count,
            ));
        }
    }

    debug!(
        "Found entities: {:?}",
        set.entities().iter().map(|e| e.core().to_string()).collect::<Vec<_>>()
    );
    set
}

impl EntitySet {
    pub fn entities(&self) -> Vec<&dyn Entity> {
        let mut all: Vec<&dyn Entity> = Vec::new();
        all.extend(self.ac_climates.iter().map(|e| e as &dyn Entity));
        all.extend(self.zone_climates.iter().map(|e| e as &dyn Entity));
        all.extend(self.dampers.iter().map(|e| e as &dyn Entity));
        all.extend(self.ac_temperatures.iter().map(|e| e as &dyn Entity));
        all.extend(self.zone_temperatures.iter().map(|e| e as &dyn Entity));
        all.extend(self.damper_percentages.iter().map(|e| e as &dyn Entity));
        all.extend(self.spill_percentages.iter().map(|e| e as &dyn Entity));
        all.extend(self.ac_spill_bypass.iter().map(|e| e as &dyn Entity));
        all.extend(self.zone_spills.iter().map(|e| e as &dyn Entity));
        all.extend(self.zone_batteries.iter().map(|e| e as &dyn Entity));
        all.extend(self.quick_timers.iter().map(|e| e as &dyn Entity));
        all.extend(self.updates.iter().map(|e| e as &dyn Entity));
        all
    }

    fn entities_mut(&mut self) -> Vec<&mut dyn Entity> {
        let mut all: Vec<&mut dyn Entity> = Vec::new();
        all.extend(self.ac_climates.iter_mut().map(|e| e as &mut dyn Entity));
        all.extend(self.zone_climates.iter_mut().map(|e| e as &mut dyn Entity));
        all.extend(self.dampers.iter_mut().map(|e| e as &mut dyn Entity));
        all.extend(self.ac_temperatures.iter_mut().map(|e| e as &mut dyn Entity));
        all.extend(self.zone_temperatures.iter_mut().map(|e| e as &mut dyn Entity));
        all.extend(self.damper_percentages.iter_mut().map(|e| e as &mut dyn Entity));
        all.extend(self.spill_percentages.iter_mut().map(|e| e as &mut dyn Entity));
        all.extend(self.ac_spill_bypass.iter_mut().map(|e| e as &mut dyn Entity));
        all.extend(self.zone_spills.iter_mut().map(|e| e as &mut dyn Entity));
        all.extend(self.zone_batteries.iter_mut().map(|e| e as &mut dyn Entity));
        all.extend(self.quick_timers.iter_mut().map(|e| e as &mut dyn Entity));
        all.extend(self.updates.iter_mut().map(|e| e as &mut dyn Entity));
        all
    }

    pub fn len(&self) -> usize {
        self.entities().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn attach_all(&mut self, on_update: &UpdateCallback) {
        for entity in self.entities_mut() {
            entity.attach(on_update);
        }
    }

    pub fn detach_all(&mut self) {
        for entity in self.entities_mut() {
            entity.detach();
        }
    }

    /// Applies changed options to existing climate entities.
    ///
    /// Spill settings decide which entities exist, so they only take effect on the next setup.
    pub fn apply_options(&mut self, options: &Options) {
        for climate in &mut self.ac_climates {
            climate.update_min_target_temperature_step(options.min_target_temperature_step);
        }
        for climate in &mut self.zone_climates {
            climate.update_min_target_temperature_step(options.min_target_temperature_step);
            climate.update_allow_zone_hvac_mode_changes(options.allow_zone_hvac_mode_changes);
        }
    }
}
