//! Session driver tying the world to a persistence store.

use world_of_bits_core::{Command, Event};
use world_of_bits_persistence::{
    clear_saved_state, create_fresh, load_or_fresh, save_state, Store,
};
use world_of_bits_world::{self as world, World};

/// Owns the running world and persists it after every mutation.
pub(crate) struct Session {
    world: World,
    store: Box<dyn Store>,
}

impl Session {
    /// Resumes the saved session, or starts a fresh one when none is readable.
    pub(crate) fn resume(store: Box<dyn Store>) -> Self {
        let world = load_or_fresh(store.as_ref());
        Self { world, store }
    }

    /// Discards any saved session and starts from a fresh world.
    pub(crate) fn start_fresh(mut store: Box<dyn Store>) -> Self {
        clear_saved_state(store.as_mut());
        let world = create_fresh();
        save_state(store.as_mut(), &world);
        Self { world, store }
    }

    /// Read access for renderers.
    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Applies a command and persists the outcome when anything changed.
    ///
    /// The returned events double as the redraw notification.
    pub(crate) fn handle(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        if events.is_empty() {
            return events;
        }

        if events.contains(&Event::WorldReset) {
            clear_saved_state(self.store.as_mut());
        }
        save_state(self.store.as_mut(), &self.world);
        events
    }
}
