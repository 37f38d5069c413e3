#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persistence adapter that makes a World of Bits session resumable.
//!
//! The whole session lives in a single JSON snapshot stored under
//! [`SAVE_KEY`]. Saving and loading are best effort: a failing store or a
//! corrupt payload is logged and the session carries on in memory.

mod error;
mod snapshot;
mod store;

use tracing::{debug, warn};
use world_of_bits_world::World;

pub use error::{PersistenceError, StoreError};
pub use snapshot::{PartialSnapshot, SavedCell, Snapshot};
pub use store::{FileStore, MemoryStore, Store};

/// Name of the slot holding the persisted snapshot.
pub const SAVE_KEY: &str = "world-of-bits-save";

/// Creates the state of a brand-new session.
#[must_use]
pub fn create_fresh() -> World {
    World::new()
}

/// Flattens the world into its durable snapshot.
#[must_use]
pub fn serialize(world: &World) -> Snapshot {
    Snapshot::capture(world)
}

/// Rebuilds a world from a snapshot, applying the defaulting rules.
///
/// Returns `None` when the snapshot describes an impossible session.
#[must_use]
pub fn deserialize(snapshot: PartialSnapshot) -> Option<World> {
    match World::restore(snapshot.into_parts()) {
        Ok(world) => Some(world),
        Err(error) => {
            warn!(%error, "discarding invalid snapshot");
            None
        }
    }
}

/// Encodes the world as a JSON payload.
pub fn encode(world: &World) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(&serialize(world))?)
}

/// Decodes a JSON payload produced by [`encode`] or by an older release.
pub fn decode(payload: &str) -> Result<World, PersistenceError> {
    let snapshot: PartialSnapshot = serde_json::from_str(payload)?;
    Ok(World::restore(snapshot.into_parts())?)
}

/// Writes the world into the save slot, propagating failures.
pub fn try_save(store: &mut dyn Store, world: &World) -> Result<(), PersistenceError> {
    let payload = encode(world)?;
    store.set(SAVE_KEY, &payload)?;
    debug!(bytes = payload.len(), "saved world snapshot");
    Ok(())
}

/// Reads the world from the save slot, propagating failures.
///
/// Returns `Ok(None)` when nothing was saved yet.
pub fn try_load(store: &dyn Store) -> Result<Option<World>, PersistenceError> {
    let Some(payload) = store.get(SAVE_KEY)? else {
        return Ok(None);
    };
    let world = decode(&payload)?;
    debug!(bytes = payload.len(), "loaded world snapshot");
    Ok(Some(world))
}

/// Writes the world into the save slot, logging and ignoring failures.
pub fn save_state(store: &mut dyn Store, world: &World) {
    if let Err(error) = try_save(store, world) {
        warn!(%error, "failed to save world; continuing without persistence");
    }
}

/// Reads the saved world, treating any failure as "nothing saved".
#[must_use]
pub fn load_state(store: &dyn Store) -> Option<World> {
    match try_load(store) {
        Ok(world) => world,
        Err(error) => {
            warn!(%error, "ignoring unreadable saved world");
            None
        }
    }
}

/// Deletes the saved world, logging and ignoring failures.
pub fn clear_saved_state(store: &mut dyn Store) {
    if let Err(error) = store.remove(SAVE_KEY) {
        warn!(%error, "failed to clear saved world");
    }
}

/// Loads the saved world or falls back to a fresh session.
#[must_use]
pub fn load_or_fresh(store: &dyn Store) -> World {
    load_state(store).unwrap_or_else(create_fresh)
}
