//! Panel configuration
//!
//! Read from `<meta name="sync-admin-config" content="{...}">` when the hosting
//! page provides it. Every field is optional.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::messages::Locale;
use crate::trigger::SyncAction;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid panel configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdminConfig {
    /// Prefix for endpoint paths; empty means same origin
    pub base_url: String,
    pub leagues_path: String,
    pub matches_path: String,
    pub locale: Locale,
    /// `EnvFilter` directives for the console logger
    pub log_filter: String,
    pub log_buffer_bytes: usize,
    pub show_diagnostics: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        AdminConfig {
            base_url: String::new(),
            leagues_path: SyncAction::Leagues.default_path().to_string(),
            matches_path: SyncAction::Matches.default_path().to_string(),
            locale: Locale::default(),
            log_filter: "info".to_string(),
            log_buffer_bytes: rolling_logger::DEFAULT_MAX_BYTES,
            show_diagnostics: false,
        }
    }
}

impl AdminConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn path_for(&self, action: SyncAction) -> &str {
        match action {
            SyncAction::Leagues => &self.leagues_path,
            SyncAction::Matches => &self.matches_path,
        }
    }

    /// Full request URL for an action
    pub fn endpoint_url(&self, action: SyncAction) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.path_for(action);
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}
