//! The ordered index of saved networks.
//!
//! `NetIndex` is the in-memory form of `nets.json`: a list of
//! [`NetworkSummary`] values in insertion order.  Order is what the UI shows
//! in its sidebar, so it is preserved on rename and only shrinks on delete.
//!
//! A `Vec` is used rather than a map.  Indexes hold a handful of entries and
//! linear lookup by id is cheaper than keeping a second structure in sync
//! with the ordering.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use super::net::{NetId, NetworkSummary};

/// Errors returned by index mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("network {0} is not in the index")]
    UnknownId(NetId),

    #[error("network {0} is already in the index")]
    DuplicateId(NetId),
}

/// Insertion-ordered list of network summaries, unique by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetIndex {
    entries: Vec<NetworkSummary>,
}

impl NetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[NetworkSummary] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<NetworkSummary> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: NetId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: NetId) -> Option<&NetworkSummary> {
        self.entries.iter().find(|net| net.id == id)
    }

    /// Position of `id` in insertion order.
    pub fn position(&self, id: NetId) -> Option<usize> {
        self.entries.iter().position(|net| net.id == id)
    }

    /// Appends a summary at the end of the index.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateId`] if the id is already present.
    pub fn push(&mut self, summary: NetworkSummary) -> Result<(), IndexError> {
        if self.contains(summary.id) {
            return Err(IndexError::DuplicateId(summary.id));
        }
        self.entries.push(summary);
        Ok(())
    }

    /// Changes the name of an entry in place, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::UnknownId`] if `id` is absent.  The index is left
    /// unchanged in that case; no entry is created.
    pub fn rename(&mut self, id: NetId, name: &str) -> Result<&NetworkSummary, IndexError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|net| net.id == id)
            .ok_or(IndexError::UnknownId(id))?;
        entry.name = name.to_string();
        Ok(entry)
    }

    /// Removes and returns the entry for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::UnknownId`] if `id` is absent.
    pub fn remove(&mut self, id: NetId) -> Result<NetworkSummary, IndexError> {
        let pos = self.position(id).ok_or(IndexError::UnknownId(id))?;
        Ok(self.entries.remove(pos))
    }

    /// Draws a random v4 UUID that is not yet used by any entry.
    pub fn allocate_id(&self) -> NetId {
        self.allocate_id_with(Uuid::new_v4)
    }

    /// Draws ids from `generate` until one is not present in the index.
    pub fn allocate_id_with(&self, mut generate: impl FnMut() -> NetId) -> NetId {
        let mut id = generate();
        while self.contains(id) {
            warn!(%id, "generated network id collides with an existing entry, redrawing");
            id = generate();
        }
        id
    }
}

impl From<Vec<NetworkSummary>> for NetIndex {
    fn from(entries: Vec<NetworkSummary>) -> Self {
        Self { entries }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ModelType;

    fn summary(name: &str) -> NetworkSummary {
        NetworkSummary {
            name: name.to_string(),
            id: Uuid::new_v4(),
            model_type: ModelType::MultilayerPerceptron,
        }
    }

    fn index_of(names: &[&str]) -> NetIndex {
        NetIndex::from(names.iter().map(|n| summary(n)).collect::<Vec<_>>())
    }

    #[test]
    fn test_index_starts_empty() {
        let index = NetIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_push_appends_in_insertion_order() {
        // Arrange
        let mut index = NetIndex::new();
        let a = summary("a");
        let b = summary("b");

        // Act
        index.push(a.clone()).unwrap();
        index.push(b.clone()).unwrap();

        // Assert
        assert_eq!(index.entries(), &[a, b]);
    }

    #[test]
    fn test_push_rejects_duplicate_id() {
        let mut index = NetIndex::new();
        let a = summary("a");
        index.push(a.clone()).unwrap();

        let result = index.push(a.clone());

        assert_eq!(result, Err(IndexError::DuplicateId(a.id)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_rename_keeps_position() {
        // Arrange
        let mut index = index_of(&["a", "b", "c"]);
        let id = index.entries()[1].id;

        // Act
        index.rename(id, "renamed").unwrap();

        // Assert
        assert_eq!(index.position(id), Some(1));
        assert_eq!(index.get(id).unwrap().name, "renamed");
    }

    #[test]
    fn test_rename_unknown_id_does_not_create_entry() {
        let mut index = index_of(&["a"]);
        let missing = Uuid::new_v4();

        let result = index.rename(missing, "ghost");

        assert_eq!(result.unwrap_err(), IndexError::UnknownId(missing));
        assert_eq!(index.len(), 1);
        assert!(!index.contains(missing));
    }

    #[test]
    fn test_remove_preserves_order_of_remaining_entries() {
        // Arrange
        let mut index = index_of(&["a", "b", "c"]);
        let ids: Vec<NetId> = index.entries().iter().map(|n| n.id).collect();

        // Act
        let removed = index.remove(ids[1]).unwrap();

        // Assert
        assert_eq!(removed.name, "b");
        let remaining: Vec<NetId> = index.entries().iter().map(|n| n.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2]]);
    }

    #[test]
    fn test_remove_unknown_id_returns_error() {
        let mut index = index_of(&["a"]);
        let missing = Uuid::new_v4();
        assert_eq!(index.remove(missing), Err(IndexError::UnknownId(missing)));
    }

    #[test]
    fn test_allocate_id_redraws_on_collision() {
        // Arrange: the generator first returns an id already in the index.
        let index = index_of(&["a"]);
        let taken = index.entries()[0].id;
        let fresh = Uuid::new_v4();
        let mut draws = vec![fresh, taken];

        // Act
        let id = index.allocate_id_with(|| draws.pop().expect("generator exhausted"));

        // Assert
        assert_eq!(id, fresh);
        assert!(draws.is_empty(), "both candidates must have been drawn");
    }

    #[test]
    fn test_allocate_id_is_not_in_index() {
        let index = index_of(&["a", "b"]);
        let id = index.allocate_id();
        assert!(!index.contains(id));
    }

    #[test]
    fn test_index_serialises_as_plain_json_array() {
        let index = index_of(&["a"]);
        let json = serde_json::to_value(&index).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["name"], "a");
        assert_eq!(json[0]["modelType"], "multilayerPerceptron");
    }
}
