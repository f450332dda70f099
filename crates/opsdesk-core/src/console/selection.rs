//! Multi-select state of the console table.

use std::collections::BTreeSet;

use crate::models::ReservationId;

/// Selected reservation ids, independent of pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<ReservationId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips one id and returns whether it is now selected.
    pub fn toggle(&mut self, id: &ReservationId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    pub fn select(&mut self, id: ReservationId) {
        self.ids.insert(id);
    }

    pub fn deselect(&mut self, id: &ReservationId) {
        self.ids.remove(id);
    }

    /// Replaces the selection with `ids`.
    pub fn select_all<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a ReservationId>,
    {
        self.ids = ids.into_iter().cloned().collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &ReservationId) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ReservationId> {
        self.ids.iter()
    }
}
