//! In-memory driver: applies commands to its own cached state, notifies
//! subscribers, and keeps an ordered log of every command it was asked to send.

use crate::driver::api::{
    AcCommand, AcHandle, AirConditioner, AirTouchSystem, Console, DriverError, IssuedCommand, QuickTimer, Zone,
    ZoneCommand,
};
use crate::driver::subscription::{Listener, StateField, Subscribers, SubscriptionId};
use crate::models::airtouch::{
    AcFanSpeed, AcId, AcMode, AcPowerControl, AcPowerState, AcState, AcTimerType, ConsoleState, ZoneId,
    ZonePowerState, ZoneState,
};
use crate::snapshot::SystemSnapshot;
use chrono::Local;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type CommandLog = Rc<RefCell<Vec<IssuedCommand>>>;

/// Shared between every device of one system.
#[derive(Clone, Default)]
struct Link {
    log: CommandLog,
    offline: Rc<Cell<bool>>,
}

impl Link {
    fn issue(&self, command: IssuedCommand) -> Result<(), DriverError> {
        if self.offline.get() {
            return Err(DriverError::Offline(format!("{:?} not sent", command)));
        }
        self.log.borrow_mut().push(command);
        Ok(())
    }
}

pub struct MemoryAirConditioner {
    state: RefCell<AcState>,
    subscribers: Subscribers,
    link: Link,
}

impl MemoryAirConditioner {
    /// Applies a driver-side state update and notifies subscribers.
    pub fn update(&self, field: StateField, f: impl FnOnce(&mut AcState)) {
        {
            let mut state = self.state.borrow_mut();
            f(&mut state);
        }
        self.subscribers.notify(field);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn command(&self, command: AcCommand) -> Result<(), DriverError> {
        let ac_id = self.state.borrow().ac_id;
        self.link.issue(IssuedCommand::Ac(ac_id, command))
    }
}

fn next_power_state(current: AcPowerState, control: AcPowerControl) -> AcPowerState {
    match control {
        AcPowerControl::TurnOff => AcPowerState::Off,
        AcPowerControl::TurnOn => AcPowerState::On,
        AcPowerControl::SetToAway => match current {
            AcPowerState::Off | AcPowerState::OffAway | AcPowerState::OffForced => AcPowerState::OffAway,
            AcPowerState::On | AcPowerState::OnAway | AcPowerState::Sleep => AcPowerState::OnAway,
        },
        AcPowerControl::SetToSleep => AcPowerState::Sleep,
    }
}

impl AirConditioner for MemoryAirConditioner {
    fn state(&self) -> AcState {
        self.state.borrow().clone()
    }

    fn set_power(&self, control: AcPowerControl) -> Result<(), DriverError> {
        self.command(AcCommand::SetPower(control))?;
        self.update(StateField::Power, |s| s.power_state = next_power_state(s.power_state, control));
        Ok(())
    }

    fn set_mode(&self, mode: AcMode, power_on: bool) -> Result<(), DriverError> {
        self.command(AcCommand::SetMode { mode, power_on })?;
        self.update(StateField::Mode, |s| {
            s.selected_mode = Some(mode);
            s.active_mode = Some(mode);
            if power_on {
                s.power_state = AcPowerState::On;
            }
        });
        Ok(())
    }

    fn set_fan_speed(&self, speed: AcFanSpeed) -> Result<(), DriverError> {
        self.command(AcCommand::SetFanSpeed(speed))?;
        self.update(StateField::FanSpeed, |s| s.selected_fan_speed = Some(speed));
        Ok(())
    }

    fn set_target_temperature(&self, value: f64) -> Result<(), DriverError> {
        self.command(AcCommand::SetTargetTemperature(value))?;
        self.update(StateField::Temperature, |s| s.target_temperature = Some(value));
        Ok(())
    }

    fn set_quick_timer(&self, timer_type: AcTimerType, timer: QuickTimer) -> Result<(), DriverError> {
        self.command(AcCommand::SetQuickTimer(timer_type, timer))?;
        let at = match timer {
            QuickTimer::At(time) => time,
            QuickTimer::After(delay) => Local::now().time() + delay,
        };
        self.update(StateField::Timer, |s| match timer_type {
            AcTimerType::OnTimer => s.next_on_timer = Some(at),
            AcTimerType::OffTimer => s.next_off_timer = Some(at),
        });
        Ok(())
    }

    fn clear_quick_timer(&self, timer_type: AcTimerType) -> Result<(), DriverError> {
        self.command(AcCommand::ClearQuickTimer(timer_type))?;
        self.update(StateField::Timer, |s| match timer_type {
            AcTimerType::OnTimer => s.next_on_timer = None,
            AcTimerType::OffTimer => s.next_off_timer = None,
        });
        Ok(())
    }

    fn subscribe_state(&self, listener: Listener) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    fn unsubscribe_state(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}

pub struct MemoryZone {
    state: RefCell<ZoneState>,
    subscribers: Subscribers,
    link: Link,
}

impl MemoryZone {
    pub fn update(&self, field: StateField, f: impl FnOnce(&mut ZoneState)) {
        {
            let mut state = self.state.borrow_mut();
            f(&mut state);
        }
        self.subscribers.notify(field);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn command(&self, command: ZoneCommand) -> Result<(), DriverError> {
        let zone_id = self.state.borrow().zone_id;
        self.link.issue(IssuedCommand::Zone(zone_id, command))
    }
}

impl Zone for MemoryZone {
    fn state(&self) -> ZoneState {
        self.state.borrow().clone()
    }

    fn set_power(&self, state: ZonePowerState) -> Result<(), DriverError> {
        self.command(ZoneCommand::SetPower(state))?;
        self.update(StateField::Power, |s| s.power_state = state);
        Ok(())
    }

    fn set_damper_percentage(&self, value: u8) -> Result<(), DriverError> {
        self.command(ZoneCommand::SetDamperPercentage(value))?;
        self.update(StateField::Damper, |s| s.current_damper_percentage = value.min(100));
        Ok(())
    }

    fn set_target_temperature(&self, value: f64) -> Result<(), DriverError> {
        self.command(ZoneCommand::SetTargetTemperature(value))?;
        self.update(StateField::Temperature, |s| s.target_temperature = Some(value));
        Ok(())
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}

pub struct MemoryConsole {
    state: RefCell<ConsoleState>,
    subscribers: Subscribers,
}

impl MemoryConsole {
    pub fn update(&self, f: impl FnOnce(&mut ConsoleState)) {
        {
            let mut state = self.state.borrow_mut();
            f(&mut state);
        }
        self.subscribers.notify(StateField::Console);
    }
}

impl Console for MemoryConsole {
    fn state(&self) -> ConsoleState {
        self.state.borrow().clone()
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.subscribers.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }
}

pub struct MemorySystem {
    pub console: Rc<MemoryConsole>,
    pub air_conditioners: Vec<Rc<MemoryAirConditioner>>,
    pub zones: Vec<Rc<MemoryZone>>,
    link: Link,
}

impl MemorySystem {
    pub fn from_snapshot(snapshot: SystemSnapshot) -> Self {
        let link = Link::default();
        let console = Rc::new(MemoryConsole {
            state: RefCell::new(snapshot.console),
            subscribers: Subscribers::new(),
        });
        let air_conditioners = snapshot
            .air_conditioners
            .into_iter()
            .map(|state| {
                Rc::new(MemoryAirConditioner {
                    state: RefCell::new(state),
                    subscribers: Subscribers::new(),
                    link: link.clone(),
                })
            })
            .collect();
        let zones = snapshot
            .zones
            .into_iter()
            .map(|state| {
                Rc::new(MemoryZone {
                    state: RefCell::new(state),
                    subscribers: Subscribers::new(),
                    link: link.clone(),
                })
            })
            .collect();

        MemorySystem {
            console,
            air_conditioners,
            zones,
            link,
        }
    }

    /// The system as seen through the driver traits.
    pub fn handle(&self) -> AirTouchSystem {
        let air_conditioners = self
            .air_conditioners
            .iter()
            .map(|ac| {
                let ac_id = ac.state.borrow().ac_id;
                let zones = self
                    .zones
                    .iter()
                    .filter(|z| z.state.borrow().ac_id == ac_id)
                    .map(|z| Rc::clone(z) as Rc<dyn Zone>)
                    .collect();
                AcHandle {
                    ac: Rc::clone(ac) as Rc<dyn AirConditioner>,
                    zones,
                }
            })
            .collect();

        AirTouchSystem {
            console: Rc::clone(&self.console) as Rc<dyn Console>,
            air_conditioners,
        }
    }

    pub fn ac(&self, ac_id: AcId) -> Option<&Rc<MemoryAirConditioner>> {
        self.air_conditioners.iter().find(|ac| ac.state.borrow().ac_id == ac_id)
    }

    pub fn zone(&self, zone_id: ZoneId) -> Option<&Rc<MemoryZone>> {
        self.zones.iter().find(|z| z.state.borrow().zone_id == zone_id)
    }

    pub fn commands(&self) -> Vec<IssuedCommand> {
        self.link.log.borrow().clone()
    }

    pub fn clear_commands(&self) {
        self.link.log.borrow_mut().clear();
    }

    /// While offline every command fails and leaves state untouched.
    pub fn set_offline(&self, offline: bool) {
        self.link.offline.set(offline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::tests::sample_snapshot;

    #[test]
    fn applies_and_logs_commands() {
        let system = MemorySystem::from_snapshot(sample_snapshot());
        let ac = system.ac(AcId(0)).expect("ac 0");

        ac.set_mode(AcMode::Heat, true).unwrap();
        ac.set_power(AcPowerControl::SetToAway).unwrap();

        let state = ac.state();
        assert_eq!(state.selected_mode, Some(AcMode::Heat));
        assert_eq!(state.power_state, AcPowerState::OnAway);
        assert_eq!(
            system.commands(),
            vec![
                IssuedCommand::Ac(AcId(0), AcCommand::SetMode { mode: AcMode::Heat, power_on: true }),
                IssuedCommand::Ac(AcId(0), AcCommand::SetPower(AcPowerControl::SetToAway)),
            ]
        );
    }

    #[test]
    fn offline_commands_fail_without_side_effects() {
        let system = MemorySystem::from_snapshot(sample_snapshot());
        let zone = system.zone(ZoneId(0)).expect("zone 0");
        let before = zone.state();

        system.set_offline(true);
        let err = zone.set_power(ZonePowerState::Off).unwrap_err();
        assert!(matches!(err, DriverError::Offline(_)));
        assert_eq!(zone.state(), before);
        assert!(system.commands().is_empty());
    }

    #[test]
    fn handle_groups_zones_by_parent() {
        let system = MemorySystem::from_snapshot(sample_snapshot());
        let handle = system.handle();
        assert_eq!(handle.air_conditioners.len(), 1);
        let zone_acs: Vec<AcId> = handle.air_conditioners[0].zones.iter().map(|z| z.state().ac_id).collect();
        assert!(!zone_acs.is_empty());
        assert!(zone_acs.iter().all(|id| *id == AcId(0)));
    }

    #[test]
    fn delay_timer_is_scheduled() {
        let system = MemorySystem::from_snapshot(sample_snapshot());
        let ac = system.ac(AcId(0)).expect("ac 0");
        ac.set_quick_timer(AcTimerType::OnTimer, QuickTimer::After(chrono::TimeDelta::minutes(30)))
            .unwrap();
        assert!(ac.state().next_on_timer.is_some());
        ac.clear_quick_timer(AcTimerType::OnTimer).unwrap();
        assert!(ac.state().next_on_timer.is_none());
    }
}
