//! Bookkeeping of the dialog ids in use while authoring a graph.

use bevy::utils::HashSet;

use super::{DialogGraph, DialogId};

/// The set of dialog ids already handed out.
#[derive(Debug, Default, Clone)]
pub struct IdReservations {
    /// The reserved ids.
    reserved: HashSet<DialogId>,
}

impl IdReservations {
    /// Reservations for every dialog of a graph.
    pub fn from_graph(graph: &DialogGraph) -> Self {
        Self {
            reserved: graph.nodes().map(|d| d.id).collect(),
        }
    }

    /// Reserves the lowest free id.
    pub fn reserve(&mut self) -> DialogId {
        let mut id = 0;
        while self.reserved.contains(&id) {
            id += 1;
        }
        self.reserved.insert(id);
        id
    }

    /// Reserves a specific id. Returns `false` if it was already taken
    /// or is negative.
    pub fn reserve_exact(&mut self, id: DialogId) -> bool {
        id >= 0 && self.reserved.insert(id)
    }

    /// Frees an id. Returns `false` if it was not reserved.
    pub fn release(&mut self, id: DialogId) -> bool {
        self.reserved.remove(&id)
    }

    /// Whether an id is in use.
    pub fn is_reserved(&self, id: DialogId) -> bool {
        self.reserved.contains(&id)
    }

    /// The number of reserved ids.
    pub fn len(&self) -> usize {
        self.reserved.len()
    }

    /// Whether no id is reserved.
    pub fn is_empty(&self) -> bool {
        self.reserved.is_empty()
    }
}
