use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::CardConfig;
use crate::snapshot::HassSnapshot;

// --- Typed IDs ---

macro_rules! typed_id {
    ($name:ident) => {
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
            /// Host registries use an empty string where they mean "unset".
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

typed_id!(EntityId);
typed_id!(DeviceId);
typed_id!(AreaId);

// --- Event enum: large variants boxed ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Host lifecycle
    ConfigChanged(Box<CardConfig>),
    SnapshotUpdated(Box<HassSnapshot>),
    /// IANA zone name, e.g. `Europe/Paris`.
    TimeZoneChanged {
        zone: String,
    },

    // Date dialog
    BatteryChangeRequested {
        entity_id: EntityId,
    },
    DateDialogCancelled,
    DateDialogConfirmed {
        date: Option<String>,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ConfigChanged(_) => "config_changed",
            Self::SnapshotUpdated(_) => "snapshot_updated",
            Self::TimeZoneChanged { .. } => "time_zone_changed",
            Self::BatteryChangeRequested { .. } => "battery_change_requested",
            Self::DateDialogCancelled => "date_dialog_cancelled",
            Self::DateDialogConfirmed { .. } => "date_dialog_confirmed",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::BatteryChangeRequested { .. }
                | Self::DateDialogCancelled
                | Self::DateDialogConfirmed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_ids_are_not_interchangeable() {
        let entity = EntityId::new("abc");
        let area = AreaId::new("abc");
        // Different types; the compiler rejects mixing them.
        assert_eq!(entity.as_str(), area.as_str());
    }

    #[test]
    fn blank_ids_are_detected() {
        assert!(AreaId::new("").is_blank());
        assert!(AreaId::new("  ").is_blank());
        assert!(!AreaId::new("kitchen").is_blank());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&EntityId::new("sensor.x")).unwrap();
        assert_eq!(json, "\"sensor.x\"");
    }

    #[test]
    fn only_dialog_events_are_user_initiated() {
        assert!(Event::DateDialogCancelled.is_user_initiated());
        assert!(Event::BatteryChangeRequested {
            entity_id: "sensor.x".into()
        }
        .is_user_initiated());
        assert!(!Event::TimeZoneChanged {
            zone: "UTC".into()
        }
        .is_user_initiated());
    }

    #[test]
    fn event_size_is_reasonable() {
        // Ensure boxing keeps the enum small.
        let size = std::mem::size_of::<Event>();
        assert!(
            size <= 64,
            "Event enum is {} bytes, too large, box more variants",
            size
        );
    }
}
