//! Read-only view of the host's live state and registries.
//!
//! Field names follow the host's JSON so a shell can forward its objects
//! without reshaping them. Unknown fields are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::event::{AreaId, DeviceId, EntityId};

/// Current state of one entity on the host's state bus.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EntityState {
    pub entity_id: EntityId,
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    pub fn new(entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            entity_id: EntityId::new(entity_id),
            state: state.into(),
            attributes: Map::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// The `friendly_name` attribute, if it is a non-empty string.
    pub fn friendly_name(&self) -> Option<&str> {
        self.attributes
            .get("friendly_name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct EntityRegistryEntry {
    #[serde(default)]
    pub area_id: Option<AreaId>,
    #[serde(default)]
    pub device_id: Option<DeviceId>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct DeviceRegistryEntry {
    #[serde(default)]
    pub area_id: Option<AreaId>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct AreaEntry {
    #[serde(default)]
    pub name: Option<String>,
}

/// Everything the card reads from the host for one render pass.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct HassSnapshot {
    #[serde(default)]
    pub states: HashMap<EntityId, EntityState>,
    #[serde(default)]
    pub entities: HashMap<EntityId, EntityRegistryEntry>,
    #[serde(default)]
    pub devices: HashMap<DeviceId, DeviceRegistryEntry>,
    #[serde(default)]
    pub areas: HashMap<AreaId, AreaEntry>,
}

impl HassSnapshot {
    pub fn state(&self, id: &EntityId) -> Option<&EntityState> {
        self.states.get(id)
    }

    pub fn entity(&self, id: &EntityId) -> Option<&EntityRegistryEntry> {
        self.entities.get(id)
    }

    pub fn device(&self, id: &DeviceId) -> Option<&DeviceRegistryEntry> {
        self.devices.get(id)
    }

    pub fn area(&self, id: &AreaId) -> Option<&AreaEntry> {
        self.areas.get(id)
    }

    // --- Builders for shells and tests ---

    #[must_use]
    pub fn with_state(mut self, state: EntityState) -> Self {
        self.states.insert(state.entity_id.clone(), state);
        self
    }

    #[must_use]
    pub fn with_entity(
        mut self,
        entity_id: &str,
        area_id: Option<&str>,
        device_id: Option<&str>,
    ) -> Self {
        self.entities.insert(
            EntityId::new(entity_id),
            EntityRegistryEntry {
                area_id: area_id.map(AreaId::new),
                device_id: device_id.map(DeviceId::new),
            },
        );
        self
    }

    #[must_use]
    pub fn with_device(mut self, device_id: &str, area_id: Option<&str>) -> Self {
        self.devices.insert(
            DeviceId::new(device_id),
            DeviceRegistryEntry {
                area_id: area_id.map(AreaId::new),
            },
        );
        self
    }

    #[must_use]
    pub fn with_area(mut self, area_id: &str, name: &str) -> Self {
        self.areas.insert(
            AreaId::new(area_id),
            AreaEntry {
                name: Some(name.to_owned()),
            },
        );
        self
    }
}
