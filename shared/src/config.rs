use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CARD_TYPE: &str = "custom:battery-tracker-card";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid card configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported card type {0:?}, expected \"custom:battery-tracker-card\"")]
    UnsupportedCardType(String),
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

/// Card options as written in the dashboard YAML.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfig {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub language: Language,
}

impl CardConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.card_type.as_deref() {
            None | Some(CARD_TYPE) => Ok(()),
            Some(other) => Err(ConfigError::UnsupportedCardType(other.to_owned())),
        }
    }

    /// Configured title, or the localized default when unset or blank.
    pub fn display_title(&self) -> String {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map_or_else(|| self.labels().default_title.to_owned(), str::to_owned)
    }

    pub fn labels(&self) -> &'static Labels {
        Labels::for_language(self.language)
    }
}

/// Every user-facing string the card renders.
#[derive(Debug)]
pub struct Labels {
    pub default_title: &'static str,
    pub no_area: &'static str,
    pub no_entities: &'static str,
    pub never_changed: &'static str,
    pub mark_changed: &'static str,
    pub dialog_title: &'static str,
    pub cancel: &'static str,
    pub confirm: &'static str,
    pub date_format: &'static str,
    pub just_now: &'static str,
    pub ago: fn(u64, TimeUnit) -> String,
    pub ahead: fn(u64, TimeUnit) -> String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

static FR: Labels = Labels {
    default_title: "Suivi des Piles",
    no_area: "Sans pièce",
    no_entities: "Aucun capteur de batterie suivi trouvé.",
    never_changed: "Non changée",
    mark_changed: "Changée",
    dialog_title: "Quand la pile a-t-elle été changée ?",
    cancel: "Annuler",
    confirm: "Confirmer",
    date_format: "%d/%m/%Y",
    just_now: "à l'instant",
    ago: fr_ago,
    ahead: fr_ahead,
};

static EN: Labels = Labels {
    default_title: "Battery Tracker",
    no_area: "No area",
    no_entities: "No tracked battery sensors found.",
    never_changed: "Never changed",
    mark_changed: "Changed",
    dialog_title: "When was the battery changed?",
    cancel: "Cancel",
    confirm: "Confirm",
    date_format: "%Y-%m-%d",
    just_now: "just now",
    ago: en_ago,
    ahead: en_ahead,
};

impl Labels {
    #[must_use]
    pub fn for_language(language: Language) -> &'static Self {
        match language {
            Language::Fr => &FR,
            Language::En => &EN,
        }
    }
}

fn fr_ago(n: u64, unit: TimeUnit) -> String {
    format!("il y a {}", fr_quantity(n, unit))
}

fn fr_ahead(n: u64, unit: TimeUnit) -> String {
    format!("dans {}", fr_quantity(n, unit))
}

fn en_ago(n: u64, unit: TimeUnit) -> String {
    format!("{} ago", en_quantity(n, unit))
}

fn en_ahead(n: u64, unit: TimeUnit) -> String {
    format!("in {}", en_quantity(n, unit))
}

fn fr_quantity(n: u64, unit: TimeUnit) -> String {
    let word = match unit {
        TimeUnit::Second => "seconde",
        TimeUnit::Minute => "minute",
        TimeUnit::Hour => "heure",
        TimeUnit::Day => "jour",
        TimeUnit::Month => return format!("{n} mois"),
        TimeUnit::Year => "an",
    };
    if n > 1 {
        format!("{n} {word}s")
    } else {
        format!("{n} {word}")
    }
}

fn en_quantity(n: u64, unit: TimeUnit) -> String {
    let word = match unit {
        TimeUnit::Second => "second",
        TimeUnit::Minute => "minute",
        TimeUnit::Hour => "hour",
        TimeUnit::Day => "day",
        TimeUnit::Month => "month",
        TimeUnit::Year => "year",
    };
    if n == 1 {
        format!("1 {word}")
    } else {
        format!("{n} {word}s")
    }
}
