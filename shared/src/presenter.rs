//! Turns the model into what the shell paints.

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Group, TrackedEntity, NEVER_CHANGED};
use crate::area::GroupKey;
use crate::config::{Labels, TimeUnit};
use crate::edit::EditSession;
use crate::icon::{classify, parse_level};
use crate::model::Model;

/// Layout hint reported to the dashboard masonry.
pub const CARD_SIZE: u32 = 3;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub title: String,
    pub content: CardContent,
    pub dialog: Option<DateDialogView>,
    pub card_size: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CardContent {
    /// No snapshot delivered yet.
    Loading,
    Empty {
        message: String,
    },
    Groups {
        groups: Vec<GroupView>,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GroupView {
    pub key: GroupKey,
    pub heading: String,
    pub rows: Vec<RowView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RowView {
    pub entity_id: String,
    pub name: String,
    pub icon: String,
    pub icon_color: String,
    pub state_text: String,
    pub last_changed: LastChangedView,
    pub action_label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LastChangedView {
    Never {
        label: String,
    },
    Changed {
        date_text: String,
        relative_text: String,
        timestamp: String,
    },
    Unrecognized {
        raw: String,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DateDialogView {
    pub entity_id: String,
    pub title: String,
    /// `YYYY-MM-DD`, today in the user's zone.
    pub initial_date: String,
    pub cancel_label: String,
    pub confirm_label: String,
}

#[must_use]
pub fn present(model: &Model) -> ViewModel {
    let labels = model.config.labels();

    let content = if !model.has_snapshot {
        CardContent::Loading
    } else if model.groups.is_empty() {
        CardContent::Empty {
            message: labels.no_entities.to_owned(),
        }
    } else {
        CardContent::Groups {
            groups: model
                .groups
                .iter()
                .map(|group| group_view(group, labels, model.now))
                .collect(),
        }
    };

    ViewModel {
        title: model.config.display_title(),
        content,
        dialog: dialog_view(&model.edit, labels, model.now),
        card_size: CARD_SIZE,
    }
}

fn group_view(group: &Group, labels: &Labels, now: DateTime<Tz>) -> GroupView {
    let heading = group.key.area_name().unwrap_or(labels.no_area).to_owned();

    GroupView {
        key: group.key.clone(),
        heading,
        rows: group
            .members
            .iter()
            .map(|entity| row_view(entity, labels, now))
            .collect(),
    }
}

fn row_view(entity: &TrackedEntity, labels: &Labels, now: DateTime<Tz>) -> RowView {
    let indicator = classify(&entity.battery_level);

    let state_text = match parse_level(&entity.battery_level) {
        Some(_) => format!("{}%", entity.battery_level.trim()),
        None => entity.battery_level.clone(),
    };

    RowView {
        entity_id: entity.entity_id.to_string(),
        name: entity.name.clone(),
        icon: indicator.icon.mdi_name(),
        icon_color: indicator.color.css_var().to_owned(),
        state_text,
        last_changed: last_changed_view(&entity.last_changed, labels, now),
        action_label: labels.mark_changed.to_owned(),
    }
}

fn last_changed_view(raw: &str, labels: &Labels, now: DateTime<Tz>) -> LastChangedView {
    if raw == NEVER_CHANGED {
        return LastChangedView::Never {
            label: labels.never_changed.to_owned(),
        };
    }

    match parse_timestamp(raw) {
        Some(at) => {
            let local = at.with_timezone(&now.timezone());
            LastChangedView::Changed {
                date_text: local.format(labels.date_format).to_string(),
                relative_text: format_relative(at, &now, labels),
                timestamp: raw.to_owned(),
            }
        }
        None => LastChangedView::Unrecognized {
            raw: raw.to_owned(),
        },
    }
}

/// RFC 3339, also accepting the space separator the host sometimes uses.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .ok()
}

fn dialog_view(
    session: &EditSession,
    labels: &Labels,
    now: DateTime<Tz>,
) -> Option<DateDialogView> {
    let target = session.target()?;
    Some(DateDialogView {
        entity_id: target.to_string(),
        title: labels.dialog_title.to_owned(),
        initial_date: now.date_naive().format("%Y-%m-%d").to_string(),
        cancel_label: labels.cancel.to_owned(),
        confirm_label: labels.confirm.to_owned(),
    })
}

/// "il y a 3 jours" / "3 days ago", or the future form for clock skew.
#[must_use]
pub fn format_relative<Z: TimeZone>(
    then: DateTime<FixedOffset>,
    now: &DateTime<Z>,
    labels: &Labels,
) -> String {
    let delta = now.naive_utc().signed_duration_since(then.naive_utc());
    let in_future = delta < TimeDelta::zero();
    let secs = delta.num_seconds().unsigned_abs();

    let (n, unit) = match secs {
        0..=44 => return labels.just_now.to_owned(),
        45..=3_599 => ((secs / 60).max(1), TimeUnit::Minute),
        3_600..=86_399 => (secs / 3_600, TimeUnit::Hour),
        86_400..=2_591_999 => (secs / 86_400, TimeUnit::Day),
        2_592_000..=31_535_999 => (secs / 2_592_000, TimeUnit::Month),
        _ => (secs / 31_536_000, TimeUnit::Year),
    };

    if in_future {
        (labels.ahead)(n, unit)
    } else {
        (labels.ago)(n, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CardConfig, Language};
    use crate::event::EntityId;
    use assert_matches::assert_matches;
    use chrono_tz::Europe::Paris;

    fn at(raw: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(raw).unwrap()
    }

    fn at_in(raw: &str, zone: Tz) -> DateTime<Tz> {
        at(raw).with_timezone(&zone)
    }

    fn entity(id: &str, level: &str, last_changed: &str) -> TrackedEntity {
        TrackedEntity {
            entity_id: EntityId::new(id),
            name: id.trim_start_matches("sensor.").to_owned(),
            battery_level: level.into(),
            last_changed: last_changed.into(),
        }
    }

    fn model_with(groups: Vec<Group>) -> Model {
        let mut model = Model::new();
        model.has_snapshot = true;
        model.groups = groups;
        model.now = at_in("2024-06-10T12:00:00+00:00", Tz::UTC);
        model
    }

    #[test]
    fn loading_before_first_snapshot() {
        let view = present(&Model::new());
        assert_eq!(view.content, CardContent::Loading);
        assert_eq!(view.title, "Suivi des Piles");
        assert_eq!(view.card_size, 3);
        assert_eq!(view.dialog, None);
    }

    #[test]
    fn empty_groups_render_placeholder() {
        let view = present(&model_with(Vec::new()));
        assert_eq!(
            view.content,
            CardContent::Empty {
                message: "Aucun capteur de batterie suivi trouvé.".into()
            }
        );
    }

    #[test]
    fn no_area_heading_is_localized() {
        let mut model = model_with(vec![Group {
            key: GroupKey::NoArea,
            members: vec![entity("sensor.x", "42", NEVER_CHANGED)],
        }]);

        let CardContent::Groups { groups } = present(&model).content else {
            panic!("expected groups");
        };
        assert_eq!(groups[0].heading, "Sans pièce");

        model.config = CardConfig {
            language: Language::En,
            ..CardConfig::default()
        };
        let CardContent::Groups { groups } = present(&model).content else {
            panic!("expected groups");
        };
        assert_eq!(groups[0].heading, "No area");
        assert_eq!(groups[0].rows[0].last_changed, LastChangedView::Never {
            label: "Never changed".into()
        });
    }

    #[test]
    fn row_carries_indicator_and_dates() {
        let model = model_with(vec![Group {
            key: GroupKey::Area("Kitchen".into()),
            members: vec![entity("sensor.x", "42", "2024-06-07T08:00:00+00:00")],
        }]);

        let CardContent::Groups { groups } = present(&model).content else {
            panic!("expected groups");
        };
        let row = &groups[0].rows[0];

        assert_eq!(groups[0].heading, "Kitchen");
        assert_eq!(row.entity_id, "sensor.x");
        assert_eq!(row.icon, "mdi:battery-50");
        assert_eq!(row.icon_color, "var(--label-badge-yellow)");
        assert_eq!(row.state_text, "42%");
        assert_eq!(row.action_label, "Changée");
        assert_eq!(
            row.last_changed,
            LastChangedView::Changed {
                date_text: "07/06/2024".into(),
                relative_text: "il y a 3 jours".into(),
                timestamp: "2024-06-07T08:00:00+00:00".into(),
            }
        );
    }

    #[test]
    fn dates_render_with_the_rules_of_their_own_season() {
        // Late on Jan 14 in Paris (+01:00), while "now" is in summer (+02:00).
        let mut model = model_with(vec![Group {
            key: GroupKey::Area("Kitchen".into()),
            members: vec![entity("sensor.x", "42", "2024-01-14T22:30:00.000Z")],
        }]);
        model.now = at_in("2024-06-10T12:00:00+02:00", Paris);

        let CardContent::Groups { groups } = present(&model).content else {
            panic!("expected groups");
        };
        assert_matches!(
            &groups[0].rows[0].last_changed,
            LastChangedView::Changed { date_text, .. } if date_text == "14/01/2024"
        );
    }

    #[test]
    fn unparsable_values_are_shown_raw() {
        let model = model_with(vec![Group {
            key: GroupKey::NoArea,
            members: vec![entity("sensor.x", "unavailable", "unknown")],
        }]);

        let CardContent::Groups { groups } = present(&model).content else {
            panic!("expected groups");
        };
        let row = &groups[0].rows[0];

        assert_eq!(row.icon, "mdi:battery-unknown");
        assert_eq!(row.state_text, "unavailable");
        assert_eq!(
            row.last_changed,
            LastChangedView::Unrecognized {
                raw: "unknown".into()
            }
        );
    }

    #[test]
    fn dialog_prefills_today_in_user_zone() {
        let mut model = model_with(Vec::new());
        model.now = at_in("2024-06-10T23:30:00+02:00", Paris);
        model.edit.open(EntityId::new("sensor.x"));

        let dialog = present(&model).dialog.unwrap();

        assert_eq!(dialog.entity_id, "sensor.x");
        assert_eq!(dialog.initial_date, "2024-06-10");
        assert_eq!(dialog.title, "Quand la pile a-t-elle été changée ?");
        assert_eq!((dialog.cancel_label.as_str(), dialog.confirm_label.as_str()), ("Annuler", "Confirmer"));
    }

    #[test]
    fn accepts_space_separated_timestamps() {
        assert_eq!(
            parse_timestamp("2024-06-07 08:00:00.123456+00:00"),
            Some(at("2024-06-07T08:00:00.123456+00:00"))
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn relative_time_buckets() {
        let labels = Labels::for_language(Language::En);
        let now = at("2024-06-10T12:00:00+00:00");

        assert_eq!(format_relative(at("2024-06-10T11:59:30+00:00"), &now, labels), "just now");
        assert_eq!(format_relative(at("2024-06-10T11:55:00+00:00"), &now, labels), "5 minutes ago");
        assert_eq!(format_relative(at("2024-06-10T10:00:00+00:00"), &now, labels), "2 hours ago");
        assert_eq!(format_relative(at("2024-06-09T12:00:00+00:00"), &now, labels), "1 day ago");
        assert_eq!(format_relative(at("2024-03-10T12:00:00+00:00"), &now, labels), "3 months ago");
        assert_eq!(format_relative(at("2022-06-01T12:00:00+00:00"), &now, labels), "2 years ago");
        assert_eq!(format_relative(at("2024-06-12T12:00:00+00:00"), &now, labels), "in 2 days");
    }
}
