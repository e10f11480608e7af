//! Spill airflow derived from zone damper positions.
//!
//! The console keeps the sum of open percentages across powered zones at no less
//! than 100% per spill zone; whatever the zones do not take is spilled.

use crate::control::mode::is_user_off;
use crate::models::airtouch::{AcState, ZonePowerState, ZoneState};

/// Spill percentage for an AC with `spill_zone_count` spill zones.
///
/// May exceed 100 with several spill zones; never negative.
pub fn spill_percentage(ac: &AcState, zones: &[ZoneState], spill_zone_count: usize) -> u32 {
    if is_user_off(ac.power_state) {
        return 0;
    }
    let required = 100 * spill_zone_count as u32;
    let open: u32 = zones
        .iter()
        .filter(|z| z.power_state != ZonePowerState::Off)
        .map(|z| u32::from(z.current_damper_percentage))
        .sum();
    required.saturating_sub(open)
}
