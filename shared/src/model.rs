use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::aggregate::Group;
use crate::config::CardConfig;
use crate::edit::EditSession;

/// Core state between events. Groups are replaced wholesale on every
/// snapshot; only the edit session, config and time zone carry over.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    pub config: CardConfig,

    /// `false` until the host delivers its first snapshot.
    pub has_snapshot: bool,
    pub groups: Vec<Group>,

    pub edit: EditSession,

    /// The user's IANA zone, supplied by the shell.
    pub time_zone: Tz,
    /// Wall clock captured at the start of the last update.
    pub now: DateTime<Tz>,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    pub fn new() -> Self {
        Self {
            config: CardConfig::default(),
            has_snapshot: false,
            groups: Vec::new(),
            edit: EditSession::Idle,
            time_zone: Tz::UTC,
            now: DateTime::<Utc>::default().with_timezone(&Tz::UTC),
        }
    }

    pub fn update_timestamp(&mut self) {
        self.now = Utc::now().with_timezone(&self.time_zone);
    }

    pub fn tracked_count(&self) -> usize {
        self.groups.iter().map(|g| g.members.len()).sum()
    }
}
