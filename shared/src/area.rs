use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::collate;
use crate::event::{AreaId, EntityId};
use crate::snapshot::HassSnapshot;

/// Grouping key for the card. `NoArea` is a stable key, not a display
/// string; the presenter picks its label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum GroupKey {
    Area(String),
    NoArea,
}

impl GroupKey {
    pub fn area_name(&self) -> Option<&str> {
        match self {
            Self::Area(name) => Some(name),
            Self::NoArea => None,
        }
    }
}

// Named areas in collation order, the sentinel group always last.
impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Area(a), Self::Area(b)) => collate::compare(a, b),
            (Self::Area(_), Self::NoArea) => Ordering::Less,
            (Self::NoArea, Self::Area(_)) => Ordering::Greater,
            (Self::NoArea, Self::NoArea) => Ordering::Equal,
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Resolves `entity → (entity area | device area) → area name`.
///
/// The entity's own area reference wins; the device is only consulted when
/// the entity has none. A dangling link anywhere yields [`GroupKey::NoArea`].
#[must_use]
pub fn resolve_area(entity_id: &EntityId, registry: &HassSnapshot) -> GroupKey {
    area_ref(entity_id, registry)
        .and_then(|area_id| registry.area(area_id))
        .and_then(|area| area.name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .map_or(GroupKey::NoArea, |name| GroupKey::Area(name.to_owned()))
}

fn area_ref<'a>(entity_id: &EntityId, registry: &'a HassSnapshot) -> Option<&'a AreaId> {
    let entry = registry.entity(entity_id)?;

    if let Some(area_id) = entry.area_id.as_ref().filter(|id| !id.is_blank()) {
        return Some(area_id);
    }

    let device_id = entry.device_id.as_ref().filter(|id| !id.is_blank())?;
    registry
        .device(device_id)?
        .area_id
        .as_ref()
        .filter(|id| !id.is_blank())
}
