//! Instance ownership and lookup
//!
//! One [`InstanceRegistry`] owns every concurrent game instance, keyed by
//! the channel each instance is bound to. The host constructs a single
//! registry at startup and routes all channel-scoped events through it;
//! instances never live in module-level globals.

use std::collections::HashMap;

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    constants::lobby::MAX_INSTANCES,
    instance::{GameInstance, GameState},
};

/// Failures surfaced by registry operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The channel already hosts an instance
    #[error("channel already has a game instance")]
    ChannelOccupied,
    /// The registry is at its instance capacity
    #[error("maximum number of game instances ({0}) reached")]
    CapacityReached(usize),
    /// No instance exists for the channel
    #[error("no game instance for this channel")]
    UnknownChannel,
}

/// Owns every concurrent game instance, keyed by channel id
#[derive(Debug)]
pub struct InstanceRegistry {
    instances: HashMap<String, GameInstance>,
    capacity: usize,
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceRegistry {
    /// Creates a registry with the default instance capacity
    pub fn new() -> Self {
        Self::with_capacity(MAX_INSTANCES)
    }

    /// Creates a registry holding at most `capacity` instances
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: HashMap::new(),
            capacity,
        }
    }

    /// Creates a new instance bound to a channel
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelOccupied`] when the channel already hosts an
    /// instance, and [`Error::CapacityReached`] when the registry is full.
    pub fn create(
        &mut self,
        channel_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<&mut GameInstance, Error> {
        let channel_id = channel_id.into();

        if self.instances.contains_key(&channel_id) {
            return Err(Error::ChannelOccupied);
        }
        if self.instances.len() >= self.capacity {
            return Err(Error::CapacityReached(self.capacity));
        }

        let name = name.into();
        info!(channel = %channel_id, name = %name, "instance created");

        Ok(self
            .instances
            .entry(channel_id.clone())
            .or_insert_with(|| GameInstance::new(channel_id, name)))
    }

    /// Looks up the instance bound to a channel
    pub fn get(&self, channel_id: &str) -> Option<&GameInstance> {
        self.instances.get(channel_id)
    }

    /// Looks up the instance bound to a channel, mutably
    pub fn get_mut(&mut self, channel_id: &str) -> Option<&mut GameInstance> {
        self.instances.get_mut(channel_id)
    }

    /// Removes and returns the instance bound to a channel
    ///
    /// The removed instance is handed back so the host can release its
    /// channel and report final state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownChannel`] when no instance exists there.
    pub fn destroy(&mut self, channel_id: &str) -> Result<GameInstance, Error> {
        let instance = self
            .instances
            .remove(channel_id)
            .ok_or(Error::UnknownChannel)?;
        debug!(channel = %channel_id, "instance destroyed");
        Ok(instance)
    }

    /// The channel of a waiting instance with room for more players
    ///
    /// The waitlist allocator uses this to place queued players; picks the
    /// lowest channel id so allocation is deterministic.
    pub fn waiting_channel(&self) -> Option<&str> {
        self.instances
            .iter()
            .filter(|(_, instance)| instance.state() == GameState::Waiting)
            .map(|(channel_id, _)| channel_id.as_str())
            .sorted()
            .next()
    }

    /// Number of instances currently registered
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the registry holds no instances
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Iterates over all instances with their channel ids
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GameInstance)> {
        self.instances
            .iter()
            .map(|(channel_id, instance)| (channel_id.as_str(), instance))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_lookup() {
        let mut registry = InstanceRegistry::new();
        registry.create("C001", "Epic Quest").unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("C001").unwrap().name(), "Epic Quest");
        assert!(registry.get("C999").is_none());
    }

    #[test]
    fn test_create_rejects_occupied_channel() {
        let mut registry = InstanceRegistry::new();
        registry.create("C001", "Epic Quest").unwrap();

        assert_eq!(
            registry.create("C001", "Silent Odyssey").unwrap_err(),
            Error::ChannelOccupied
        );
    }

    #[test]
    fn test_create_rejects_at_capacity() {
        let mut registry = InstanceRegistry::with_capacity(2);
        registry.create("C001", "One").unwrap();
        registry.create("C002", "Two").unwrap();

        assert_eq!(
            registry.create("C003", "Three").unwrap_err(),
            Error::CapacityReached(2)
        );
    }

    #[test]
    fn test_destroy_returns_instance() {
        let mut registry = InstanceRegistry::new();
        registry.create("C001", "Epic Quest").unwrap();

        let instance = registry.destroy("C001").unwrap();
        assert_eq!(instance.name(), "Epic Quest");
        assert!(registry.is_empty());

        assert_eq!(registry.destroy("C001").unwrap_err(), Error::UnknownChannel);
    }

    #[test]
    fn test_waiting_channel_skips_started_games() {
        let mut registry = InstanceRegistry::new();
        registry.create("C002", "Two").unwrap();
        registry.create("C001", "One").unwrap();

        // Lowest waiting channel wins
        assert_eq!(registry.waiting_channel(), Some("C001"));

        let instance = registry.get_mut("C001").unwrap();
        instance.add_player("A");
        instance.start_game(None).unwrap();

        assert_eq!(registry.waiting_channel(), Some("C002"));
    }

    #[test]
    fn test_iter_visits_all_instances() {
        let mut registry = InstanceRegistry::new();
        registry.create("C001", "One").unwrap();
        registry.create("C002", "Two").unwrap();

        assert_eq!(registry.iter().count(), 2);
    }
}
