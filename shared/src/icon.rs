//! Battery level → icon and color.

use serde::{Deserialize, Serialize};

pub const LOW_ALERT_MAX: f64 = 10.0;
pub const ALERT_MAX: f64 = 30.0;
pub const WARNING_MAX: f64 = 50.0;
pub const GRADED_MAX: f64 = 90.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "step", rename_all = "snake_case")]
pub enum BatteryIcon {
    Unknown,
    Outline,
    /// Graded icon; always a multiple of ten in `30..=90`.
    Level(u8),
    Full,
}

impl BatteryIcon {
    #[must_use]
    pub fn mdi_name(self) -> String {
        match self {
            Self::Unknown => "mdi:battery-unknown".into(),
            Self::Outline => "mdi:battery-outline".into(),
            Self::Level(step) => format!("mdi:battery-{step}"),
            Self::Full => "mdi:battery".into(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconColor {
    Disabled,
    Alert,
    Warning,
    Neutral,
}

impl IconColor {
    #[must_use]
    pub const fn css_var(self) -> &'static str {
        match self {
            Self::Disabled => "var(--state-disabled-color)",
            Self::Alert => "var(--label-badge-red)",
            Self::Warning => "var(--label-badge-yellow)",
            Self::Neutral => "var(--state-icon-color)",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatteryIndicator {
    pub icon: BatteryIcon,
    pub color: IconColor,
}

impl BatteryIndicator {
    pub const UNKNOWN: Self = Self {
        icon: BatteryIcon::Unknown,
        color: IconColor::Disabled,
    };
}

/// Parses a raw state value as a percentage. `None` for blank text,
/// anything non-numeric, and NaN. Blank stays unknown rather than reading
/// as 0%, and `inf` reads as full; both are intentional.
#[must_use]
pub fn parse_level(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|level| !level.is_nan())
}

/// Never fails: unparsable input maps to [`BatteryIndicator::UNKNOWN`].
#[must_use]
pub fn classify(level: &str) -> BatteryIndicator {
    match parse_level(level) {
        Some(level) => classify_numeric(level),
        None => BatteryIndicator::UNKNOWN,
    }
}

#[must_use]
pub fn classify_numeric(level: f64) -> BatteryIndicator {
    if level.is_nan() {
        return BatteryIndicator::UNKNOWN;
    }

    let (icon, color) = if level <= LOW_ALERT_MAX {
        (BatteryIcon::Outline, IconColor::Alert)
    } else if level <= ALERT_MAX {
        (BatteryIcon::Level(30), IconColor::Alert)
    } else if level <= WARNING_MAX {
        (BatteryIcon::Level(50), IconColor::Warning)
    } else if level <= GRADED_MAX {
        (BatteryIcon::Level(nearest_step(level)), IconColor::Neutral)
    } else {
        (BatteryIcon::Full, IconColor::Neutral)
    };

    BatteryIndicator { icon, color }
}

// Only called for (50, 90]; halves round up (55 -> 60).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn nearest_step(level: f64) -> u8 {
    let step = (level / 10.0 + 0.5).floor() * 10.0;
    step.clamp(50.0, 90.0) as u8
}
