//! Date dialog state and the command it produces.

use chrono::{DateTime, LocalResult, NaiveDate, Offset, SecondsFormat, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::event::EntityId;

pub const SERVICE_DOMAIN: &str = "battery_tracker";
pub const SERVICE_SET_CHANGED_DATE: &str = "set_battery_changed_date";

// Longest forward jump in the tz database is a full day (Samoa, 2011).
const GAP_LOOKBACK_HOURS: i64 = 25;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateInputError {
    #[error("expected a YYYY-MM-DD date, got {0:?}")]
    Malformed(String),
    #[error("{0} is not a calendar date")]
    InvalidCalendarDate(String),
    #[error("selected date cannot be combined with the current time")]
    TimeOutOfRange,
}

/// Payload for `battery_tracker.set_battery_changed_date`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryChangeCommand {
    pub entity_id: EntityId,
    /// UTC, RFC 3339 with milliseconds, e.g. `2024-03-15T10:22:33.123Z`.
    pub changed_at: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditSession {
    #[default]
    Idle,
    Editing {
        target: EntityId,
    },
}

impl EditSession {
    pub fn target(&self) -> Option<&EntityId> {
        match self {
            Self::Idle => None,
            Self::Editing { target } => Some(target),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// Starts editing `entity_id`, silently replacing any open edit.
    pub fn open(&mut self, entity_id: EntityId) {
        if let Self::Editing { target } = self {
            debug!(previous = %target, next = %entity_id, "replacing open edit");
        }
        *self = Self::Editing { target: entity_id };
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    /// Closes the dialog. Returns a command only when an entity was being
    /// edited and a valid date was selected.
    pub fn confirm<Z: TimeZone>(
        &mut self,
        selected_date: Option<&str>,
        now: &DateTime<Z>,
    ) -> Option<BatteryChangeCommand> {
        let target = match std::mem::take(self) {
            Self::Idle => return None,
            Self::Editing { target } => target,
        };

        let raw = selected_date.filter(|d| !d.trim().is_empty())?;

        match parse_selected_date(raw).and_then(|date| changed_at(date, now)) {
            Ok(changed_at) => Some(BatteryChangeCommand {
                entity_id: target,
                changed_at: changed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            }),
            Err(e) => {
                warn!(entity = %target, error = %e, "ignoring battery change date");
                None
            }
        }
    }
}

/// Parses the dialog's `YYYY-MM-DD` value. Nothing looser is accepted.
pub fn parse_selected_date(raw: &str) -> Result<NaiveDate, DateInputError> {
    let malformed = || DateInputError::Malformed(raw.to_owned());

    let bytes = raw.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shape_ok {
        return Err(malformed());
    }

    let year: i32 = raw[0..4].parse().map_err(|_| malformed())?;
    let month: u32 = raw[5..7].parse().map_err(|_| malformed())?;
    let day: u32 = raw[8..10].parse().map_err(|_| malformed())?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DateInputError::InvalidCalendarDate(raw.to_owned()))
}

/// The selected calendar day at `now`'s wall-clock time, resolved with the
/// zone rules in force on that day. Repeated local times take the earlier
/// instant; skipped ones keep the offset from before the jump.
pub fn changed_at<Z: TimeZone>(
    date: NaiveDate,
    now: &DateTime<Z>,
) -> Result<DateTime<Utc>, DateInputError> {
    let zone = now.timezone();
    let local = date.and_time(now.time());

    let resolved = match zone.from_local_datetime(&local) {
        LocalResult::Single(at) | LocalResult::Ambiguous(at, _) => Some(at.with_timezone(&Utc)),
        LocalResult::None => zone
            .offset_from_local_datetime(&(local - TimeDelta::hours(GAP_LOOKBACK_HOURS)))
            .earliest()
            .and_then(|offset| {
                local.checked_sub_signed(TimeDelta::seconds(i64::from(
                    offset.fix().local_minus_utc(),
                )))
            })
            .map(|utc| Utc.from_utc_datetime(&utc)),
    };
    resolved.ok_or(DateInputError::TimeOutOfRange)
}
