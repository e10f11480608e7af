//! Derived-state translation layer for Polyaire AirTouch air-conditioning systems.
//!
//! Raw device state (as cached by the external AirTouch driver) is mapped onto a
//! simplified thermostat/sensor model; user requests flow back as driver commands.

pub mod models {
    pub mod airtouch;
    pub mod climate;
}

pub mod area;
pub mod config;
pub mod control {
    pub mod damper;
    pub mod mode;
    pub mod spill;
    pub mod zone;
}
pub mod devices;
pub mod driver {
    pub mod api;
    pub mod memory;
    pub mod subscription;
}
pub mod entities {
    pub mod base;
    pub mod binary_sensor;
    pub mod climate;
    pub mod cover;
    pub mod sensor;
    pub mod timer;
    pub mod update;
}
pub mod platform;
pub mod simulate;
pub mod snapshot;
pub mod utils;
