//! Bookkeeping shared by every entity: identity and state subscriptions.
//!
//! Concrete entities hold an [`EntityCore`] rather than inheriting behaviour.
//! Subscriptions live until [`Entity::detach`] is called; dropping an entity
//! without detaching leaves its listeners registered with the driver.

use crate::devices::Device;
use crate::driver::api::{AirConditioner, Console, Zone};
use crate::driver::subscription::{Listener, StateField, SubscriptionId};
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// Called with an entity's unique id whenever its derived state may have changed.
pub type UpdateCallback = Rc<dyn Fn(&str)>;

enum Watch {
    Ac(Rc<dyn AirConditioner>, SubscriptionId),
    Zone(Rc<dyn Zone>, SubscriptionId),
    Console(Rc<dyn Console>, SubscriptionId),
}

pub struct EntityCore {
    unique_id: String,
    device_name: String,
    name: Option<&'static str>,
    watches: Vec<Watch>,
}

impl EntityCore {
    /// `name` is appended to the device name; `None` uses the device name alone.
    pub fn new(device: &Device, id_suffix: &str, name: Option<&'static str>) -> Self {
        EntityCore {
            unique_id: format!("{}{}", device.unique_id(), id_suffix),
            device_name: device.name().to_string(),
            name,
            watches: Vec::new(),
        }
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn name(&self) -> String {
        match self.name {
            Some(name) => format!("{} {}", self.device_name, name),
            None => self.device_name.clone(),
        }
    }

    fn forward(&self, on_update: &UpdateCallback) -> Listener {
        let on_update = Rc::clone(on_update);
        let unique_id = self.unique_id.clone();
        Rc::new(move |_: StateField| on_update(&unique_id))
    }

    pub fn watch_ac(&mut self, ac: &Rc<dyn AirConditioner>, on_update: &UpdateCallback) {
        let id = ac.subscribe_state(self.forward(on_update));
        self.watches.push(Watch::Ac(Rc::clone(ac), id));
    }

    pub fn watch_zone(&mut self, zone: &Rc<dyn Zone>, on_update: &UpdateCallback) {
        let id = zone.subscribe(self.forward(on_update));
        self.watches.push(Watch::Zone(Rc::clone(zone), id));
    }

    pub fn watch_console(&mut self, console: &Rc<dyn Console>, on_update: &UpdateCallback) {
        let id = console.subscribe(self.forward(on_update));
        self.watches.push(Watch::Console(Rc::clone(console), id));
    }

    pub fn is_attached(&self) -> bool {
        !self.watches.is_empty()
    }

    pub fn release(&mut self) {
        for watch in self.watches.drain(..) {
            match watch {
                Watch::Ac(ac, id) => ac.unsubscribe_state(id),
                Watch::Zone(zone, id) => zone.unsubscribe(id),
                Watch::Console(console, id) => console.unsubscribe(id),
            };
        }
    }
}

impl Display for EntityCore {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{} ({})>", self.name(), self.unique_id)
    }
}

pub trait Entity {
    fn core(&self) -> &EntityCore;
    fn core_mut(&mut self) -> &mut EntityCore;

    /// Registers listeners on every device the entity derives state from.
    fn subscribe(&mut self, on_update: &UpdateCallback);

    /// Current derived state, recomputed from the driver's cached fields.
    fn state(&self) -> serde_json::Value;

    fn unique_id(&self) -> &str {
        self.core().unique_id()
    }

    fn name(&self) -> String {
        self.core().name()
    }

    fn attach(&mut self, on_update: &UpdateCallback) {
        self.core_mut().release();
        self.subscribe(on_update);
    }

    fn detach(&mut self) {
        self.core_mut().release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::MemoryRegistry;
    use crate::driver::memory::MemorySystem;
    use crate::models::airtouch::AcId;
    use crate::snapshot::tests::sample_snapshot;
    use std::cell::RefCell;

    #[test]
    fn forwards_updates_until_released() {
        let snapshot = sample_snapshot();
        let system = MemorySystem::from_snapshot(snapshot.clone());
        let mut registry = MemoryRegistry::default();
        let device = Device::console(&mut registry, &snapshot.console);
        let mut core = EntityCore::new(&device, "_lamp", Some("Lamp"));

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let on_update: UpdateCallback = Rc::new(move |id: &str| sink.borrow_mut().push(id.to_string()));

        let memory_ac = system.ac(AcId(0)).expect("ac 0");
        let ac: Rc<dyn AirConditioner> = Rc::clone(memory_ac) as Rc<dyn AirConditioner>;
        core.watch_ac(&ac, &on_update);
        assert!(core.is_attached());

        memory_ac.update(StateField::Power, |_| {});
        core.release();
        memory_ac.update(StateField::Power, |_| {});

        assert_eq!(*seen.borrow(), vec!["at5-2a1f_lamp".to_string()]);
        assert_eq!(memory_ac.subscriber_count(), 0);
        assert_eq!(core.name(), "AirTouch 5 Lamp");
    }
}
