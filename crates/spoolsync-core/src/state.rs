//! State type representing an entity's reported state

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{attrs, EntityId, STATE_UNAVAILABLE, STATE_UNKNOWN};

/// The state of one entity in a registry snapshot
///
/// Deserializes directly from the records returned by the Home Assistant
/// `/api/states` endpoint; fields SpoolSync does not use (such as the
/// context) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityState {
    /// The entity this state belongs to
    pub entity_id: EntityId,

    /// The state value (e.g., "running", "23.5", "unavailable")
    pub state: String,

    /// Additional attributes associated with the state
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,

    /// When the state value last changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_changed: Option<DateTime<Utc>>,

    /// When the state was last written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl EntityState {
    /// Create a state without timestamps
    pub fn new(
        entity_id: EntityId,
        state: impl Into<String>,
        attributes: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            entity_id,
            state: state.into(),
            attributes,
            last_changed: None,
            last_updated: None,
        }
    }

    /// Check if the state value represents an unavailable entity
    pub fn is_unavailable(&self) -> bool {
        self.state == STATE_UNAVAILABLE
    }

    /// Check if the state value represents an unknown state
    pub fn is_unknown(&self) -> bool {
        self.state == STATE_UNKNOWN
    }

    /// Whether the entity currently reports a usable value
    pub fn is_available(&self) -> bool {
        !self.is_unavailable() && !self.is_unknown()
    }

    /// Get an attribute value by key
    pub fn attribute<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Get a non-empty string attribute
    ///
    /// Numbers are rendered to strings; empty strings count as absent.
    pub fn text_attribute(&self, key: &str) -> Option<String> {
        match self.attributes.get(key)? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// The friendly name assigned by the registry, if any
    pub fn friendly_name(&self) -> Option<String> {
        self.text_attribute(attrs::FRIENDLY_NAME)
    }
}

impl PartialEq for EntityState {
    fn eq(&self, other: &Self) -> bool {
        // Timestamps are not compared
        self.entity_id == other.entity_id
            && self.state == other.state
            && self.attributes == other.attributes
    }
}
