//! Coupling between a zone and its parent AC.
//!
//! A zone has no mode of its own: when powered it mirrors the AC, when off it is off.

use crate::control::mode::{ac_hvac_action, ac_hvac_mode, ac_mode_for, hvac_mode_for, supported_hvac_modes};
use crate::driver::api::{AcCommand, ZoneCommand};
use crate::models::airtouch::{AcPowerState, AcState, ZonePowerState, ZoneState};
use crate::models::climate::{HvacAction, HvacMode};

pub fn zone_hvac_mode(zone: &ZoneState, ac: &AcState) -> Option<HvacMode> {
    if zone.power_state == ZonePowerState::Off {
        return Some(HvacMode::Off);
    }
    ac_hvac_mode(ac)
}

pub fn zone_hvac_action(zone: &ZoneState, ac: &AcState) -> Option<HvacAction> {
    if zone.power_state == ZonePowerState::Off {
        return Some(HvacAction::Off);
    }
    ac_hvac_action(ac)
}

/// Modes offered for a zone.
///
/// Without zone-level mode changes a zone can only be off or on in whatever mode
/// the AC has selected.
pub fn zone_hvac_modes(ac: &AcState, allow_mode_changes: bool) -> Vec<HvacMode> {
    if allow_mode_changes {
        return supported_hvac_modes(ac);
    }
    match ac.selected_mode {
        Some(mode) => vec![HvacMode::Off, hvac_mode_for(mode)],
        None => vec![HvacMode::Off],
    }
}

/// A powered-off zone always reports a closed damper, whatever was last reported.
pub fn displayed_damper_percentage(zone: &ZoneState) -> u8 {
    match zone.power_state {
        ZonePowerState::Off => 0,
        ZonePowerState::On | ZonePowerState::Turbo => zone.current_damper_percentage,
    }
}

pub fn is_damper_closed(zone: &ZoneState) -> bool {
    zone.power_state == ZonePowerState::Off
}

/// Commands for a zone-level HVAC mode request, in the order they must be sent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZoneModePlan {
    pub ac: Option<AcCommand>,
    pub zone: Vec<ZoneCommand>,
}

pub fn plan_zone_hvac_mode(target: HvacMode, zone: &ZoneState, ac: &AcState, allow_mode_changes: bool) -> ZoneModePlan {
    let power = match target {
        HvacMode::Off => ZonePowerState::Off,
        _ => ZonePowerState::On,
    };

    let ac_command = if allow_mode_changes && power == ZonePowerState::On {
        ac_mode_for(target).map(|mode| AcCommand::SetMode { mode, power_on: false })
    } else {
        None
    };

    let zone_commands = if zone.power_state != power {
        vec![ZoneCommand::SetPower(power)]
    } else if power == ZonePowerState::On && ac.power_state == AcPowerState::Off {
        // Toggling an already-on zone is what makes the console power the AC up,
        // matching the official app.
        vec![
            ZoneCommand::SetPower(ZonePowerState::Off),
            ZoneCommand::SetPower(ZonePowerState::On),
        ]
    } else {
        Vec::new()
    };

    ZoneModePlan {
        ac: ac_command,
        zone: zone_commands,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::airtouch::AcMode;
    use crate::snapshot::tests::sample_snapshot;

    fn states() -> (ZoneState, AcState) {
        let mut snapshot = sample_snapshot();
        (snapshot.zones.remove(0), snapshot.air_conditioners.remove(0))
    }

    #[test]
    fn off_zone_is_off_regardless_of_ac() {
        let (mut zone, mut ac) = states();
        zone.power_state = ZonePowerState::Off;
        for power in AcPowerState::ALL {
            ac.power_state = power;
            assert_eq!(zone_hvac_mode(&zone, &ac), Some(HvacMode::Off));
            assert_eq!(zone_hvac_action(&zone, &ac), Some(HvacAction::Off));
        }
    }

    #[test]
    fn on_zone_mirrors_ac() {
        let (mut zone, mut ac) = states();
        zone.power_state = ZonePowerState::Turbo;
        ac.selected_mode = Some(AcMode::Heat);
        ac.active_mode = Some(AcMode::Heat);
        assert_eq!(zone_hvac_mode(&zone, &ac), Some(HvacMode::Heat));
        assert_eq!(zone_hvac_action(&zone, &ac), Some(HvacAction::Heating));

        ac.power_state = AcPowerState::OffAway;
        assert_eq!(zone_hvac_mode(&zone, &ac), Some(HvacMode::Off));
    }

    #[test]
    fn mode_list_depends_on_permission() {
        let (_, mut ac) = states();
        assert_eq!(zone_hvac_modes(&ac, false), vec![HvacMode::Off, HvacMode::Cool]);
        assert_eq!(zone_hvac_modes(&ac, true).len(), 1 + ac.supported_modes.len());
        ac.selected_mode = None;
        assert_eq!(zone_hvac_modes(&ac, false), vec![HvacMode::Off]);
    }

    #[test]
    fn off_zone_damper_reads_closed() {
        let (mut zone, _) = states();
        zone.current_damper_percentage = 65;
        assert_eq!(displayed_damper_percentage(&zone), 65);
        assert!(!is_damper_closed(&zone));

        zone.power_state = ZonePowerState::Off;
        assert_eq!(displayed_damper_percentage(&zone), 0);
        assert!(is_damper_closed(&zone));
    }

    #[test]
    fn toggles_on_zone_when_ac_is_off() {
        let (zone, mut ac) = states();
        ac.power_state = AcPowerState::Off;
        let plan = plan_zone_hvac_mode(HvacMode::Cool, &zone, &ac, false);
        assert_eq!(plan.ac, None);
        assert_eq!(
            plan.zone,
            vec![
                ZoneCommand::SetPower(ZonePowerState::Off),
                ZoneCommand::SetPower(ZonePowerState::On)
            ]
        );
    }

    #[test]
    fn already_on_zone_with_running_ac_is_a_no_op() {
        let (zone, ac) = states();
        assert_eq!(plan_zone_hvac_mode(HvacMode::Cool, &zone, &ac, false), ZoneModePlan::default());
    }

    #[test]
    fn mode_change_precedes_power_on() {
        let (mut zone, ac) = states();
        zone.power_state = ZonePowerState::Off;
        let plan = plan_zone_hvac_mode(HvacMode::Heat, &zone, &ac, true);
        assert_eq!(
            plan.ac,
            Some(AcCommand::SetMode {
                mode: AcMode::Heat,
                power_on: false
            })
        );
        assert_eq!(plan.zone, vec![ZoneCommand::SetPower(ZonePowerState::On)]);
    }

    #[test]
    fn off_request_never_touches_ac() {
        let (zone, ac) = states();
        let plan = plan_zone_hvac_mode(HvacMode::Off, &zone, &ac, true);
        assert_eq!(plan.ac, None);
        assert_eq!(plan.zone, vec![ZoneCommand::SetPower(ZonePowerState::Off)]);
    }
}
