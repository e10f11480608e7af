//! Damper position commands.

use crate::driver::api::ZoneCommand;
use crate::models::airtouch::{ZonePowerState, ZoneState};

/// The console does not clamp damper-increase requests above 95%, so positions
/// are only ever sent as multiples of this step.
pub const DAMPER_STEP: u8 = 5;

/// Rounds to the nearest multiple of [`DAMPER_STEP`], capped at 100.
pub fn quantize(percentage: u8) -> u8 {
    let p = percentage.min(100);
    (p + DAMPER_STEP / 2) / DAMPER_STEP * DAMPER_STEP
}

/// Commands for a requested damper position.
///
/// Opening the damper of an off zone also powers it on, otherwise the new position
/// would never show up in a state update.
pub fn plan_damper_position(requested: u8, zone: &ZoneState) -> Vec<ZoneCommand> {
    let percentage = quantize(requested);
    let mut commands = vec![ZoneCommand::SetDamperPercentage(percentage)];
    if percentage > 0 && zone.power_state == ZonePowerState::Off {
        commands.push(ZoneCommand::SetPower(ZonePowerState::On));
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::tests::sample_snapshot;

    #[test]
    fn quantizes_to_nearest_step() {
        assert_eq!(quantize(0), 0);
        assert_eq!(quantize(2), 0);
        assert_eq!(quantize(3), 5);
        assert_eq!(quantize(47), 45);
        assert_eq!(quantize(48), 50);
        assert_eq!(quantize(97), 95);
        assert_eq!(quantize(98), 100);
        assert_eq!(quantize(100), 100);
        assert_eq!(quantize(250), 100);
    }

    #[test]
    fn every_request_lands_on_the_grid() {
        for p in 0..=100u8 {
            let q = quantize(p);
            assert_eq!(q % DAMPER_STEP, 0);
            assert!(q.abs_diff(p) <= 2);
        }
    }

    #[test]
    fn opening_off_zone_powers_it_on() {
        let mut zone = sample_snapshot().zones.remove(2);
        assert_eq!(zone.power_state, ZonePowerState::Off);
        assert_eq!(
            plan_damper_position(33, &zone),
            vec![
                ZoneCommand::SetDamperPercentage(35),
                ZoneCommand::SetPower(ZonePowerState::On)
            ]
        );
        // rounds down to zero: nothing to power on for
        assert_eq!(plan_damper_position(2, &zone), vec![ZoneCommand::SetDamperPercentage(0)]);

        zone.power_state = ZonePowerState::On;
        assert_eq!(plan_damper_position(33, &zone), vec![ZoneCommand::SetDamperPercentage(35)]);
    }
}
