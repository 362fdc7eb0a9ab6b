//! Dashboard summary figures provided by the hosting page

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_CALLS_PER_DAY: u64 = 75_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub leagues_count: u64,
    /// Server-formatted time of the last league sync
    pub last_sync: Option<String>,
    pub calls_made_today: u64,
    pub max_calls_per_day: u64,
}

impl Default for DashboardStats {
    fn default() -> Self {
        DashboardStats {
            leagues_count: 0,
            last_sync: None,
            calls_made_today: 0,
            max_calls_per_day: DEFAULT_MAX_CALLS_PER_DAY,
        }
    }
}

impl DashboardStats {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Share of today's API quota used, rounded, capped at 100
    pub fn usage_percent(&self) -> u64 {
        if self.max_calls_per_day == 0 {
            return 0;
        }
        let rounded = self
            .calls_made_today
            .saturating_mul(100)
            .saturating_add(self.max_calls_per_day / 2)
            / self.max_calls_per_day;
        rounded.min(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_percent() {
        let mut stats = DashboardStats { calls_made_today: 1_500, ..Default::default() };
        assert_eq!(stats.usage_percent(), 2);

        stats.calls_made_today = 1_100;
        assert_eq!(stats.usage_percent(), 1);

        stats.calls_made_today = 90_000;
        assert_eq!(stats.usage_percent(), 100);

        stats.calls_made_today = u64::MAX;
        assert_eq!(stats.usage_percent(), 100);

        stats.max_calls_per_day = 0;
        assert_eq!(stats.usage_percent(), 0);
    }

    #[test]
    fn test_payload_with_missing_fields() {
        let stats = DashboardStats::from_json(r#"{ "leagues_count": 42, "last_sync": "2026-10-18 22:10" }"#).unwrap();
        assert_eq!(stats.leagues_count, 42);
        assert_eq!(stats.last_sync.as_deref(), Some("2026-10-18 22:10"));
        assert_eq!(stats.max_calls_per_day, DEFAULT_MAX_CALLS_PER_DAY);
    }

    #[test]
    fn test_null_last_sync() {
        let stats = DashboardStats::from_json(r#"{ "last_sync": null }"#).unwrap();
        assert_eq!(stats, DashboardStats::default());
    }
}
