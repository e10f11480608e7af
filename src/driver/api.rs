//! Interface of the external AirTouch driver, as consumed by this crate.
//!
//! - Readable fields are returned as owned snapshots on every call, so derived
//!   values are always recomputed from the latest cached state.
//! - Commands are fire-and-forget: the driver's subscription mechanism delivers the
//!   resulting state later. Nothing here retries or reconciles acknowledgements.

use crate::driver::subscription::{Listener, SubscriptionId};
use crate::models::airtouch::{
    AcFanSpeed, AcId, AcMode, AcPowerControl, AcState, AcTimerType, ConsoleState, ZoneId, ZonePowerState, ZoneState,
};
use chrono::{NaiveTime, TimeDelta};
use log::debug;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum DriverError {
    /// The console connection is unavailable.
    Offline(String),
    /// The console refused the request.
    Rejected(String),
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DriverError::Offline(s) => write!(f, "console offline: {}", s),
            DriverError::Rejected(s) => write!(f, "request rejected: {}", s),
        }
    }
}

impl std::error::Error for DriverError {}

/// A quick timer is either an absolute time of day or a delay from now.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QuickTimer {
    At(NaiveTime),
    After(TimeDelta),
}

pub trait AirConditioner {
    fn state(&self) -> AcState;
    fn set_power(&self, control: AcPowerControl) -> Result<(), DriverError>;
    fn set_mode(&self, mode: AcMode, power_on: bool) -> Result<(), DriverError>;
    fn set_fan_speed(&self, speed: AcFanSpeed) -> Result<(), DriverError>;
    fn set_target_temperature(&self, value: f64) -> Result<(), DriverError>;
    fn set_quick_timer(&self, timer_type: AcTimerType, timer: QuickTimer) -> Result<(), DriverError>;
    fn clear_quick_timer(&self, timer_type: AcTimerType) -> Result<(), DriverError>;
    fn subscribe_state(&self, listener: Listener) -> SubscriptionId;
    fn unsubscribe_state(&self, id: SubscriptionId) -> bool;
}

pub trait Zone {
    fn state(&self) -> ZoneState;
    fn set_power(&self, state: ZonePowerState) -> Result<(), DriverError>;
    fn set_damper_percentage(&self, value: u8) -> Result<(), DriverError>;
    fn set_target_temperature(&self, value: f64) -> Result<(), DriverError>;
    fn subscribe(&self, listener: Listener) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

pub trait Console {
    fn state(&self) -> ConsoleState;
    fn subscribe(&self, listener: Listener) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// An AC together with the zones it owns, in console order.
#[derive(Clone)]
pub struct AcHandle {
    pub ac: Rc<dyn AirConditioner>,
    pub zones: Vec<Rc<dyn Zone>>,
}

/// Everything the driver discovered for one AirTouch console.
#[derive(Clone)]
pub struct AirTouchSystem {
    pub console: Rc<dyn Console>,
    pub air_conditioners: Vec<AcHandle>,
}

// =====================
// Commands as values
// =====================

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum AcCommand {
    SetPower(AcPowerControl),
    SetMode { mode: AcMode, power_on: bool },
    SetFanSpeed(AcFanSpeed),
    SetTargetTemperature(f64),
    SetQuickTimer(AcTimerType, QuickTimer),
    ClearQuickTimer(AcTimerType),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ZoneCommand {
    SetPower(ZonePowerState),
    SetDamperPercentage(u8),
    SetTargetTemperature(f64),
}

/// A command as issued to a specific device, in issue order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum IssuedCommand {
    Ac(AcId, AcCommand),
    Zone(ZoneId, ZoneCommand),
}

pub fn send_ac(ac: &dyn AirConditioner, command: AcCommand) -> Result<(), DriverError> {
    debug!("AC command: {:?}", command);
    match command {
        AcCommand::SetPower(control) => ac.set_power(control),
        AcCommand::SetMode { mode, power_on } => ac.set_mode(mode, power_on),
        AcCommand::SetFanSpeed(speed) => ac.set_fan_speed(speed),
        AcCommand::SetTargetTemperature(value) => ac.set_target_temperature(value),
        AcCommand::SetQuickTimer(timer_type, timer) => ac.set_quick_timer(timer_type, timer),
        AcCommand::ClearQuickTimer(timer_type) => ac.clear_quick_timer(timer_type),
    }
}

/// Sends the commands in order, stopping at the first failure.
pub fn send_zone(zone: &dyn Zone, commands: &[ZoneCommand]) -> Result<(), DriverError> {
    for command in commands {
        debug!("Zone command: {:?}", command);
        match *command {
            ZoneCommand::SetPower(state) => zone.set_power(state)?,
            ZoneCommand::SetDamperPercentage(value) => zone.set_damper_percentage(value)?,
            ZoneCommand::SetTargetTemperature(value) => zone.set_target_temperature(value)?,
        }
    }
    Ok(())
}
