use serde::Serialize;

/// Serialize a serde-backed enum into its string name (e.g. SCREAMING_SNAKE_CASE).
pub fn serde_enum_name<T: Serialize>(val: &T) -> Option<String> {
    serde_json::to_value(val).ok()?.as_str().map(|s| s.to_string())
}

/// Lowercase serde name, as used in entity ids and attributes (e.g. `OFF_TIMER` -> `off_timer`).
pub fn lower_enum_name<T: Serialize>(val: &T) -> Option<String> {
    serde_enum_name(val).map(|s| s.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::airtouch::{AcSpillState, AcTimerType, AirTouchModel, ZoneControlMethod};

    #[test]
    fn enum_names() {
        assert_eq!(serde_enum_name(&AcTimerType::OffTimer).as_deref(), Some("OFF_TIMER"));
        assert_eq!(serde_enum_name(&AirTouchModel::AirTouch4).as_deref(), Some("AIRTOUCH_4"));
        assert_eq!(lower_enum_name(&ZoneControlMethod::Percentage).as_deref(), Some("percentage"));
        assert_eq!(lower_enum_name(&AcTimerType::OnTimer).as_deref(), Some("on_timer"));
    }

    #[test]
    fn spill_state_none_keeps_its_wire_name() {
        assert_eq!(serde_enum_name(&AcSpillState::None).as_deref(), Some("NONE"));
        let parsed: AcSpillState = serde_json::from_str("\"NONE\"").unwrap();
        assert_eq!(parsed, AcSpillState::None);
    }

    #[test]
    fn non_string_values_have_no_name() {
        assert_eq!(serde_enum_name(&42u8), None);
    }
}
