use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use crate::area::{resolve_area, GroupKey};
use crate::collate;
use crate::event::EntityId;
use crate::snapshot::HassSnapshot;

pub const SENSOR_DOMAIN_PREFIX: &str = "sensor.";
pub const COMPANION_SUFFIX: &str = "_last_battery_change";
/// State published by the backend for a battery that was never replaced.
pub const NEVER_CHANGED: &str = "Non changée";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEntity {
    pub entity_id: EntityId,
    pub name: String,
    /// Raw state of the battery sensor; see [`crate::icon::classify`].
    pub battery_level: String,
    /// Raw state of the companion sensor: a timestamp or [`NEVER_CHANGED`].
    pub last_changed: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub key: GroupKey,
    pub members: Vec<TrackedEntity>,
}

/// `sensor.x` → `sensor.x_last_battery_change`
#[must_use]
pub fn companion_id_for(base: &EntityId) -> EntityId {
    EntityId::new(format!("{}{COMPANION_SUFFIX}", base.as_str()))
}

/// `sensor.x_last_battery_change` → `sensor.x`; `None` for anything that
/// is not a companion sensor.
#[must_use]
pub fn base_id_for(companion: &EntityId) -> Option<EntityId> {
    let raw = companion.as_str();
    if !raw.starts_with(SENSOR_DOMAIN_PREFIX) {
        return None;
    }
    let base = raw.strip_suffix(COMPANION_SUFFIX)?;
    if base.len() <= SENSOR_DOMAIN_PREFIX.len() {
        return None;
    }
    Some(EntityId::new(base))
}

/// Builds the grouped, ordered entity list for one snapshot.
///
/// Orphaned companions (no base state) are dropped. Members are ordered by
/// name, groups by area name with [`GroupKey::NoArea`] last. An empty result
/// means there is nothing to track.
#[instrument(skip_all, fields(states = snapshot.states.len()))]
pub fn build_groups(snapshot: &HassSnapshot) -> Vec<Group> {
    let mut grouped: BTreeMap<GroupKey, Vec<TrackedEntity>> = BTreeMap::new();

    for (companion_id, companion) in &snapshot.states {
        let Some(base_id) = base_id_for(companion_id) else {
            continue;
        };
        let Some(base) = snapshot.state(&base_id) else {
            debug!(companion = %companion_id, "dropping companion without base sensor");
            continue;
        };

        let key = resolve_area(&base_id, snapshot);
        let name = base
            .friendly_name()
            .map_or_else(|| base_id.to_string(), str::to_owned);

        grouped.entry(key).or_default().push(TrackedEntity {
            entity_id: base_id,
            name,
            battery_level: base.state.clone(),
            last_changed: companion.state.clone(),
        });
    }

    let groups: Vec<Group> = grouped
        .into_iter()
        .map(|(key, mut members)| {
            members.sort_by(|a, b| {
                collate::compare(&a.name, &b.name).then_with(|| a.entity_id.cmp(&b.entity_id))
            });
            Group { key, members }
        })
        .collect();

    debug!(
        groups = groups.len(),
        entities = groups.iter().map(|g| g.members.len()).sum::<usize>(),
        "rebuilt battery groups"
    );

    groups
}
