//! Mechanism pairs (trigger tile + target tile) and their per-level activation state.

use std::collections::BTreeMap;

use bevy_ecs::resource::Resource;
use glam::IVec2;
use strum_macros::{AsRefStr, EnumString};
use tracing::debug;

/// The kind of a mechanism, supplied per id through the level legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum MechanismKind {
    Door,
    Trap,
    Bridge,
    Lever,
}

impl MechanismKind {
    /// Kind used when the legend does not tag a mechanism id.
    pub fn default_for(id: char) -> MechanismKind {
        match id.to_ascii_lowercase() {
            't' => MechanismKind::Trap,
            'b' => MechanismKind::Bridge,
            'l' => MechanismKind::Lever,
            _ => MechanismKind::Door,
        }
    }
}

/// A trigger/target pair sharing a (lowercase) id, as found in the level text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MechanismPair {
    pub id: char,
    pub kind: MechanismKind,
    pub trigger: IVec2,
    pub target: IVec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MechanismState {
    pub pair: MechanismPair,
    pub active: bool,
}

/// Activation state of every mechanism in the current level, keyed by id.
///
/// Deactivation is one-way: a level never re-arms a mechanism.
#[derive(Resource, Debug, Clone, Default)]
pub struct MechanismRegistry {
    mechanisms: BTreeMap<char, MechanismState>,
}

impl MechanismRegistry {
    pub fn new(pairs: &[MechanismPair]) -> Self {
        let mechanisms = pairs
            .iter()
            .map(|pair| (pair.id, MechanismState { pair: *pair, active: true }))
            .collect();
        Self { mechanisms }
    }

    pub fn get(&self, id: char) -> Option<&MechanismState> {
        self.mechanisms.get(&id)
    }

    pub fn is_active(&self, id: char) -> bool {
        self.mechanisms.get(&id).is_some_and(|m| m.active)
    }

    /// Returns true if an active target occupies `tile`. Triggers never block.
    pub fn is_blocking_cell(&self, tile: IVec2) -> bool {
        self.mechanisms.values().any(|m| m.active && m.pair.target == tile)
    }

    /// Deactivates the mechanism `id`.
    ///
    /// Returns true only on the transition from active to inactive; unknown ids
    /// and already inactive mechanisms are left untouched.
    pub fn deactivate(&mut self, id: char) -> bool {
        match self.mechanisms.get_mut(&id) {
            Some(state) if state.active => {
                state.active = false;
                debug!(id = %id, kind = ?state.pair.kind, "Mechanism deactivated");
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &MechanismState> {
        self.mechanisms.values()
    }

    pub fn len(&self) -> usize {
        self.mechanisms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mechanisms.is_empty()
    }
}
