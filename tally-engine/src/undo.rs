//! Per-actor undo slots.
//!
//! Each actor holds at most one slot pointing at their most recent
//! add. Lives only in process memory; lost on restart. That loss is a
//! documented limitation of the design, not silently worked around.

use std::collections::HashMap;
use std::sync::RwLock;
use tally_domain::ActorId;

/// Points at the record an actor's next undo would remove.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoSlot {
    /// Sheet the add was recorded against. An undo against a different
    /// live sheet is stale and must be refused.
    pub sheet: String,
    /// Sequence number of the added record
    pub seq: u32,
}

/// Process-wide undo state, keyed by actor.
#[derive(Debug, Default)]
pub struct UndoStore {
    slots: RwLock<HashMap<ActorId, UndoSlot>>,
}

impl UndoStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the actor's slot with a new target
    pub fn remember(&self, actor: ActorId, slot: UndoSlot) {
        self.slots.write().unwrap().insert(actor, slot);
    }

    /// Read the actor's slot without consuming it
    pub fn peek(&self, actor: ActorId) -> Option<UndoSlot> {
        self.slots.read().unwrap().get(&actor).cloned()
    }

    /// Drop the actor's slot after a successful undo
    pub fn clear(&self, actor: ActorId) {
        self.slots.write().unwrap().remove(&actor);
    }

    /// Number of actors currently holding a slot
    pub fn len(&self) -> usize {
        self.slots.read().unwrap().len()
    }

    /// Whether no actor holds a slot
    pub fn is_empty(&self) -> bool {
        self.slots.read().unwrap().is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
