//! User-facing texts and status styling

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::trigger::SyncAction;

/// Display language of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    En,
}

/// Visual tone of a status line. Neither tone is error-styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Success,
}

impl StatusTone {
    pub fn css_class(self) -> &'static str {
        match self {
            StatusTone::Info => "mt-2 text-sm text-blue-600",
            StatusTone::Success => "mt-2 text-sm text-green-600",
        }
    }
}

/// Status line shown under a sync button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub text: String,
    pub tone: StatusTone,
}

impl SyncStatus {
    pub fn in_progress(action: SyncAction, locale: Locale) -> Self {
        let text = match (action, locale) {
            (SyncAction::Leagues, Locale::Fr) => "Synchronisation des ligues en cours...",
            (SyncAction::Leagues, Locale::En) => "Syncing leagues...",
            (SyncAction::Matches, Locale::Fr) => "Synchronisation des matchs en cours...",
            (SyncAction::Matches, Locale::En) => "Syncing matches...",
        };
        SyncStatus { text: text.to_string(), tone: StatusTone::Info }
    }

    pub fn completed(action: SyncAction, locale: Locale) -> Self {
        let text = match (action, locale) {
            (SyncAction::Leagues, Locale::Fr) => "Synchronisation terminée avec succès",
            (SyncAction::Leagues, Locale::En) => "Leagues synchronized successfully",
            (SyncAction::Matches, Locale::Fr) => "Synchronisation des matchs terminée avec succès",
            (SyncAction::Matches, Locale::En) => "Matches synchronized successfully",
        };
        SyncStatus { text: text.to_string(), tone: StatusTone::Success }
    }

    /// Shown when the request failed; deliberately neutral
    pub fn finished(action: SyncAction, locale: Locale) -> Self {
        let text = match (action, locale) {
            (SyncAction::Leagues, Locale::Fr) => "La synchronisation est terminée",
            (SyncAction::Leagues, Locale::En) => "Leagues synchronization finished",
            (SyncAction::Matches, Locale::Fr) => "La synchronisation des matchs est terminée",
            (SyncAction::Matches, Locale::En) => "Matches synchronization finished",
        };
        SyncStatus { text: text.to_string(), tone: StatusTone::Info }
    }
}

pub fn card_title(action: SyncAction, locale: Locale) -> &'static str {
    match (action, locale) {
        (SyncAction::Leagues, Locale::Fr) => "Ligues",
        (SyncAction::Leagues, Locale::En) => "Leagues",
        (SyncAction::Matches, Locale::Fr) => "Matchs",
        (SyncAction::Matches, Locale::En) => "Matches",
    }
}

pub fn button_label(action: SyncAction, locale: Locale) -> &'static str {
    match (action, locale) {
        (SyncAction::Leagues, Locale::Fr) => "Synchroniser les ligues",
        (SyncAction::Leagues, Locale::En) => "Sync leagues",
        (SyncAction::Matches, Locale::Fr) => "Synchroniser les matchs",
        (SyncAction::Matches, Locale::En) => "Sync matches",
    }
}

pub fn not_available(locale: Locale) -> &'static str {
    match locale {
        Locale::Fr => "Non disponible",
        Locale::En => "Not available",
    }
}

/// Timestamp in the style the browser uses for the locale
pub fn format_timestamp(locale: Locale, at: NaiveDateTime) -> String {
    match locale {
        Locale::Fr => at.format("%d/%m/%Y %H:%M:%S").to_string(),
        Locale::En => at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
    }
}

/// "Last sync" label text around an already formatted value
pub fn last_sync_label(locale: Locale, value: &str) -> String {
    match locale {
        Locale::Fr => format!("Dernière sync: {}", value),
        Locale::En => format!("Last sync: {}", value),
    }
}

pub fn last_sync_at(locale: Locale, at: NaiveDateTime) -> String {
    last_sync_label(locale, &format_timestamp(locale, at))
}

pub struct StatsTexts {
    pub leagues: &'static str,
    pub last_sync: &'static str,
    pub api_calls: &'static str,
}

pub fn stats_texts(locale: Locale) -> StatsTexts {
    match locale {
        Locale::Fr => StatsTexts {
            leagues: "Ligues synchronisées",
            last_sync: "Dernière synchronisation",
            api_calls: "Appels API aujourd'hui",
        },
        Locale::En => StatsTexts {
            leagues: "Synchronized leagues",
            last_sync: "Last synchronization",
            api_calls: "API calls today",
        },
    }
}

pub fn show_logs_label(locale: Locale, open: bool) -> &'static str {
    match (locale, open) {
        (Locale::Fr, false) => "Afficher les journaux",
        (Locale::Fr, true) => "Masquer les journaux",
        (Locale::En, false) => "Show logs",
        (Locale::En, true) => "Hide logs",
    }
}
