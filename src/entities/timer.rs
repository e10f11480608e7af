//! AC quick timers as time-of-day entities.

use crate::devices::Device;
use crate::driver::api::{send_ac, AcCommand, AirConditioner, DriverError, QuickTimer};
use crate::entities::base::{Entity, EntityCore, UpdateCallback};
use crate::models::airtouch::AcTimerType;
use crate::utils::lower_enum_name;
use chrono::{NaiveTime, TimeDelta};
use core::fmt;
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum TimerError {
    /// Delays must be strictly positive.
    NonPositiveDelay(TimeDelta),
    Driver(DriverError),
}

impl Display for TimerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::NonPositiveDelay(d) => write!(f, "timer delay must be positive, got {}s", d.num_seconds()),
            TimerError::Driver(e) => write!(f, "driver error: {}", e),
        }
    }
}

impl Error for TimerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            TimerError::Driver(e) => Some(e),
            TimerError::NonPositiveDelay(_) => None,
        }
    }
}

impl From<DriverError> for TimerError {
    fn from(value: DriverError) -> Self {
        TimerError::Driver(value)
    }
}

fn timer_name(timer_type: AcTimerType) -> &'static str {
    match timer_type {
        AcTimerType::OffTimer => "Off Timer",
        AcTimerType::OnTimer => "On Timer",
    }
}

pub struct AcQuickTimerEntity {
    core: EntityCore,
    ac: Rc<dyn AirConditioner>,
    timer_type: AcTimerType,
}

impl AcQuickTimerEntity {
    pub fn new(device: &Device, ac: Rc<dyn AirConditioner>, timer_type: AcTimerType) -> Self {
        let suffix = format!("_{}", lower_enum_name(&timer_type).unwrap_or_default());
        AcQuickTimerEntity {
            core: EntityCore::new(device, &suffix, Some(timer_name(timer_type))),
            ac,
            timer_type,
        }
    }

    pub fn timer_type(&self) -> AcTimerType {
        self.timer_type
    }

    /// Next time the timer fires, if one is set.
    pub fn native_value(&self) -> Option<NaiveTime> {
        self.ac.state().next_quick_timer(self.timer_type)
    }

    pub fn set_value(&self, value: NaiveTime) -> Result<(), TimerError> {
        send_ac(self.ac.as_ref(), AcCommand::SetQuickTimer(self.timer_type, QuickTimer::At(value)))?;
        Ok(())
    }

    pub fn set_timer_from_delay(&self, delay: TimeDelta) -> Result<(), TimerError> {
        if delay <= TimeDelta::zero() {
            return Err(TimerError::NonPositiveDelay(delay));
        }
        send_ac(self.ac.as_ref(), AcCommand::SetQuickTimer(self.timer_type, QuickTimer::After(delay)))?;
        Ok(())
    }

    pub fn clear_timer(&self) -> Result<(), TimerError> {
        send_ac(self.ac.as_ref(), AcCommand::ClearQuickTimer(self.timer_type))?;
        Ok(())
    }
}

impl Entity for AcQuickTimerEntity {
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
        json!({ "native_value": self.native_value().map(|t| t.format("%H:%M:%S").to_string()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::MemoryRegistry;
    use crate::driver::api::IssuedCommand;
    use crate::driver::memory::MemorySystem;
    use crate::models::airtouch::AcId;
    use crate::snapshot::tests::sample_snapshot;

    fn timers(system: &MemorySystem) -> Vec<AcQuickTimerEntity> {
        let snapshot = sample_snapshot();
        let mut registry = MemoryRegistry::default();
        let console = Device::console(&mut registry, &snapshot.console);
        let device = console.air_conditioner(&mut registry, &snapshot.air_conditioners[0]);
        let ac = Rc::clone(system.ac(AcId(0)).expect("ac 0")) as Rc<dyn AirConditioner>;
        AcTimerType::ALL
            .into_iter()
            .map(|t| AcQuickTimerEntity::new(&device, Rc::clone(&ac), t))
            .collect()
    }

    #[test]
    fn ids_and_values() {
        let system = MemorySystem::from_snapshot(sample_snapshot());
        let timers = timers(&system);
        let (off, on) = (&timers[0], &timers[1]);
        assert_eq!(off.unique_id(), "at5-2a1f_ac0_off_timer");
        assert_eq!(on.name(), "Ducted On Timer");
        assert_eq!(off.native_value(), NaiveTime::from_hms_opt(22, 30, 0));
        assert_eq!(off.state(), json!({ "native_value": "22:30:00" }));
        assert_eq!(on.native_value(), None);
    }

    #[test]
    fn set_and_clear() {
        let system = MemorySystem::from_snapshot(sample_snapshot());
        let timers = timers(&system);
        let on = &timers[1];
        let at = NaiveTime::from_hms_opt(6, 45, 0).unwrap();

        on.set_value(at).unwrap();
        assert_eq!(on.native_value(), Some(at));
        on.clear_timer().unwrap();
        assert_eq!(on.native_value(), None);
        assert_eq!(
            system.commands(),
            vec![
                IssuedCommand::Ac(AcId(0), AcCommand::SetQuickTimer(AcTimerType::OnTimer, QuickTimer::At(at))),
                IssuedCommand::Ac(AcId(0), AcCommand::ClearQuickTimer(AcTimerType::OnTimer)),
            ]
        );
    }

    #[test]
    fn delay_must_be_positive() {
        let system = MemorySystem::from_snapshot(sample_snapshot());
        let timers = timers(&system);
        let off = &timers[0];

        assert_eq!(
            off.set_timer_from_delay(TimeDelta::zero()),
            Err(TimerError::NonPositiveDelay(TimeDelta::zero()))
        );
        assert!(off.set_timer_from_delay(TimeDelta::minutes(-5)).is_err());
        assert!(system.commands().is_empty());

        off.set_timer_from_delay(TimeDelta::minutes(90)).unwrap();
        assert_eq!(
            system.commands(),
            vec![IssuedCommand::Ac(
                AcId(0),
                AcCommand::SetQuickTimer(AcTimerType::OffTimer, QuickTimer::After(TimeDelta::minutes(90)))
            )]
        );
    }
}
