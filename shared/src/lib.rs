// lib.rs - Battery tracker card core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod aggregate;
pub mod area;
pub mod capabilities;
pub mod collate;
pub mod config;
pub mod edit;
pub mod event;
pub mod icon;
pub mod model;
pub mod presenter;
pub mod snapshot;

pub use aggregate::{build_groups, Group, TrackedEntity};
pub use app::App;
pub use area::{resolve_area, GroupKey};
pub use capabilities::{Capabilities, Effect, HassOperation, ServiceCall};
pub use config::{CardConfig, ConfigError, Language};
pub use crux_core::{render::Render, App as CruxApp};
pub use edit::{BatteryChangeCommand, DateInputError, EditSession};
pub use event::{AreaId, DeviceId, EntityId, Event};
pub use icon::{classify, BatteryIcon, BatteryIndicator, IconColor};
pub use model::Model;
pub use presenter::ViewModel;
pub use snapshot::HassSnapshot;

pub mod app {
    use chrono_tz::Tz;
    use tracing::{debug, info, instrument, warn};

    use super::*;

    #[derive(Default)]
    pub struct App;

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        #[instrument(skip_all, fields(event = event.name()))]
        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            model.update_timestamp();
            debug!(user_initiated = event.is_user_initiated(), "handling event");

            match event {
                Event::ConfigChanged(config) => {
                    if let Err(e) = config.validate() {
                        warn!(error = %e, "keeping previous card config");
                        return;
                    }
                    model.config = *config;
                }

                Event::SnapshotUpdated(snapshot) => {
                    model.groups = build_groups(&snapshot);
                    model.has_snapshot = true;
                    debug!(tracked = model.tracked_count(), "snapshot applied");
                }

                Event::TimeZoneChanged { zone } => {
                    let time_zone = match zone.parse::<Tz>() {
                        Ok(time_zone) => time_zone,
                        Err(e) => {
                            warn!(zone = %zone, error = %e, "ignoring unknown time zone");
                            return;
                        }
                    };
                    model.time_zone = time_zone;
                    model.update_timestamp();
                }

                Event::BatteryChangeRequested { entity_id } => {
                    model.edit.open(entity_id);
                }

                Event::DateDialogCancelled => {
                    model.edit.cancel();
                }

                Event::DateDialogConfirmed { date } => {
                    if let Some(command) = model.edit.confirm(date.as_deref(), &model.now) {
                        info!(
                            entity = %command.entity_id,
                            changed_at = %command.changed_at,
                            "recording battery change"
                        );
                        caps.hass.call_service(command);
                    }
                }
            }

            caps.render.render();
        }

        fn view(&self, model: &Model) -> ViewModel {
            presenter::present(model)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crux_core::testing::AppTester;

    fn tracked_snapshot() -> HassSnapshot {
        HassSnapshot::default()
            .with_state(snapshot::EntityState::new("sensor.x", "42"))
            .with_state(snapshot::EntityState::new(
                "sensor.x_last_battery_change",
                "2023-01-01T00:00:00Z",
            ))
    }

    #[test]
    fn snapshot_replaces_groups_wholesale() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        let _ = app.update(Event::SnapshotUpdated(Box::new(tracked_snapshot())), &mut model);
        assert_eq!(model.tracked_count(), 1);

        let _ = app.update(
            Event::SnapshotUpdated(Box::new(HassSnapshot::default())),
            &mut model,
        );
        assert!(model.has_snapshot);
        assert_eq!(model.tracked_count(), 0);
    }

    #[test]
    fn unknown_time_zone_is_ignored() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        let update = app.update(
            Event::TimeZoneChanged {
                zone: "Europe/Paris".into(),
            },
            &mut model,
        );
        assert_eq!(model.time_zone, chrono_tz::Europe::Paris);
        assert_eq!(model.now.timezone(), chrono_tz::Europe::Paris);
        assert!(update.effects.iter().any(|e| matches!(e, Effect::Render(_))));

        let update = app.update(
            Event::TimeZoneChanged {
                zone: "Mars/Olympus_Mons".into(),
            },
            &mut model,
        );
        assert_eq!(model.time_zone, chrono_tz::Europe::Paris);
        assert!(update.effects.is_empty());
    }

    #[test]
    fn foreign_config_is_rejected() {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        let config = CardConfig {
            card_type: Some("entities".into()),
            title: Some("Nope".into()),
            ..CardConfig::default()
        };
        let _ = app.update(Event::ConfigChanged(Box::new(config)), &mut model);

        assert_eq!(model.config, CardConfig::default());
    }
}
