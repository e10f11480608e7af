//! Console firmware update indicator.

use crate::devices::Device;
use crate::driver::api::Console;
use crate::entities::base::{Entity, EntityCore, UpdateCallback};
use serde_json::json;
use std::rc::Rc;

/// The console never reports the available version number, only that one exists.
pub const UPDATE_AVAILABLE: &str = "<Update available>";

pub struct ConsoleUpdateEntity {
    core: EntityCore,
    console: Rc<dyn Console>,
}

impl ConsoleUpdateEntity {
    pub fn new(device: &Device, console: Rc<dyn Console>) -> Self {
        ConsoleUpdateEntity {
            core: EntityCore::new(device, "", Some("Console")),
            console,
        }
    }

    /// Version of the master console.
    pub fn installed_version(&self) -> Option<String> {
        self.console.state().console_versions.into_iter().next()
    }

    pub fn latest_version(&self) -> Option<String> {
        if self.console.state().update_available {
            return Some(UPDATE_AVAILABLE.to_string());
        }
        self.installed_version()
    }
}

impl Entity for ConsoleUpdateEntity {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn subscribe(&mut self, on_update: &UpdateCallback) {
        self.core.watch_console(&self.console, on_update);
    }

    fn state(&self) -> serde_json::Value {
        json!({
            "installed_version": self.installed_version(),
            "latest_version": self.latest_version(),
        })
    }
}
