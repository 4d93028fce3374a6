use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::aggregator::{DISPLAY_TOP_N, MIN_SERVICE_COST, STORAGE_TOP_N};
use crate::core::notify::webhook::validate_endpoint;
use crate::core::store::json_file::JsonFileStore;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Totals strictly above this amount are reported as alerts.
    #[serde(default = "default_threshold")]
    pub alert_threshold: f64,
    #[serde(default = "default_display_top_n")]
    pub display_top_n: usize,
    #[serde(default = "default_storage_top_n")]
    pub storage_top_n: usize,
    #[serde(default = "default_min_service_cost")]
    pub min_service_cost: f64,
    /// Days queried back from today to ride out billing latency.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

fn default_threshold() -> f64 {
    5.0
}
fn default_display_top_n() -> usize {
    DISPLAY_TOP_N
}
fn default_storage_top_n() -> usize {
    STORAGE_TOP_N
}
fn default_min_service_cost() -> f64 {
    MIN_SERVICE_COST
}
fn default_lookback_days() -> u32 {
    7
}

/// Cost Explorer keeps daily granularity for roughly the last 14 months.
pub const MAX_LOOKBACK_DAYS: u32 = 400;

fn valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn valid_floor(value: f64) -> bool {
    value.is_finite() && value >= MIN_SERVICE_COST
}

fn valid_lookback(days: u32) -> bool {
    (1..=MAX_LOOKBACK_DAYS).contains(&days)
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            alert_threshold: default_threshold(),
            display_top_n: default_display_top_n(),
            storage_top_n: default_storage_top_n(),
            min_service_cost: default_min_service_cost(),
            lookback_days: default_lookback_days(),
        }
    }
}

impl ReportSettings {
    /// Copy with every out-of-range field replaced by its default.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        Self {
            alert_threshold: if valid_amount(self.alert_threshold) {
                self.alert_threshold
            } else {
                defaults.alert_threshold
            },
            display_top_n: if self.display_top_n > 0 {
                self.display_top_n
            } else {
                defaults.display_top_n
            },
            storage_top_n: if self.storage_top_n > 0 {
                self.storage_top_n
            } else {
                defaults.storage_top_n
            },
            min_service_cost: if valid_floor(self.min_service_cost) {
                self.min_service_cost
            } else {
                defaults.min_service_cost
            },
            lookback_days: if valid_lookback(self.lookback_days) {
                self.lookback_days
            } else {
                defaults.lookback_days
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingSettings {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_metric")]
    pub metric: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}
fn default_metric() -> String {
    "UnblendedCost".to_string()
}

impl Default for BillingSettings {
    fn default() -> Self {
        Self {
            region: default_region(),
            metric: default_metric(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifySettings {
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub billing: BillingSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub notify: NotifySettings,
}

impl AppConfig {
    /// Get the config file path, respecting XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("costwatch").join("config.toml")
    }

    /// Load config from the default path, falling back to defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Serialize and write this config to the config file path.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// Where history is stored: the configured path or the default data dir.
    pub fn history_path(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(JsonFileStore::default_path)
    }

    /// Validate the config
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let report = &self.report;
        if !valid_amount(report.alert_threshold) {
            issues.push(format!(
                "Invalid alert_threshold: {} (must be a non-negative amount)",
                report.alert_threshold
            ));
        }
        if report.display_top_n == 0 {
            issues.push("display_top_n must be at least 1".to_string());
        }
        if report.storage_top_n == 0 {
            issues.push("storage_top_n must be at least 1".to_string());
        }
        if !valid_floor(report.min_service_cost) {
            issues.push(format!(
                "Invalid min_service_cost: {} (must be at least {})",
                report.min_service_cost, MIN_SERVICE_COST
            ));
        }
        if !valid_lookback(report.lookback_days) {
            issues.push(format!(
                "Invalid lookback_days: {} (must be between 1 and {})",
                report.lookback_days, MAX_LOOKBACK_DAYS
            ));
        }
        if self.billing.region.trim().is_empty() {
            issues.push("billing.region must not be empty".to_string());
        }
        if self.billing.metric.trim().is_empty() {
            issues.push("billing.metric must not be empty".to_string());
        }
        if let Some(url) = &self.notify.webhook_url {
            if let Err(e) = validate_endpoint(url) {
                issues.push(format!("notify.webhook_url: {}", e));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        let issues = config.validate();
        assert!(issues.is_empty(), "Default config should be valid, got: {:?}", issues);
    }

    #[test]
    fn default_report_settings() {
        let report = ReportSettings::default();
        assert_eq!(report.alert_threshold, 5.0);
        assert_eq!(report.display_top_n, 5);
        assert_eq!(report.storage_top_n, 10);
        assert_eq!(report.min_service_cost, 0.01);
        assert_eq!(report.lookback_days, 7);
    }

    #[test]
    fn default_billing_targets_cost_explorer_region() {
        let billing = BillingSettings::default();
        assert_eq!(billing.region, "us-east-1");
        assert_eq!(billing.metric, "UnblendedCost");
    }

    #[test]
    fn validate_catches_negative_threshold() {
        let mut config = AppConfig::default();
        config.report.alert_threshold = -1.0;
        assert!(config.validate().iter().any(|i| i.contains("alert_threshold")));
    }

    #[test]
    fn validate_catches_zero_limits() {
        let mut config = AppConfig::default();
        config.report.display_top_n = 0;
        config.report.storage_top_n = 0;
        config.report.lookback_days = 0;
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("display_top_n")));
        assert!(issues.iter().any(|i| i.contains("storage_top_n")));
        assert!(issues.iter().any(|i| i.contains("lookback_days")));
    }

    #[test]
    fn validate_catches_lookback_out_of_range() {
        let mut config = AppConfig::default();
        config.report.lookback_days = 200_000_000;
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("lookback_days")));

        config.report.lookback_days = MAX_LOOKBACK_DAYS;
        assert!(config.validate().is_empty());
    }

    #[test]
    fn validate_catches_floor_below_minimum() {
        let mut config = AppConfig::default();
        config.report.min_service_cost = 0.0;
        assert!(config
            .validate()
            .iter()
            .any(|i| i.contains("min_service_cost")));
    }

    #[test]
    fn sanitized_replaces_only_bad_fields() {
        let report = ReportSettings {
            alert_threshold: 25.0,
            display_top_n: 0,
            storage_top_n: 3,
            min_service_cost: 0.0,
            lookback_days: 200_000_000,
        };
        let fixed = report.sanitized();
        assert_eq!(fixed.alert_threshold, 25.0);
        assert_eq!(fixed.display_top_n, DISPLAY_TOP_N);
        assert_eq!(fixed.storage_top_n, 3);
        assert_eq!(fixed.min_service_cost, MIN_SERVICE_COST);
        assert_eq!(fixed.lookback_days, 7);
    }

    #[test]
    fn sanitized_replaces_non_finite_threshold() {
        let report = ReportSettings {
            alert_threshold: f64::NAN,
            min_service_cost: 0.5,
            ..Default::default()
        };
        let fixed = report.sanitized();
        assert_eq!(fixed.alert_threshold, 5.0);
        assert_eq!(fixed.min_service_cost, 0.5);
    }

    #[test]
    fn validate_catches_plain_http_webhook() {
        let mut config = AppConfig::default();
        config.notify.webhook_url = Some("http://hooks.example.com".to_string());
        assert!(config.validate().iter().any(|i| i.contains("webhook_url")));
    }

    #[test]
    fn validate_catches_empty_region() {
        let mut config = AppConfig::default();
        config.billing.region = " ".to_string();
        assert!(config.validate().iter().any(|i| i.contains("region")));
    }

    #[test]
    fn parse_partial_toml() {
        let toml = r#"
[report]
alert_threshold = 25.0

[notify]
webhook_url = "https://hooks.example.com/costs"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.report.alert_threshold, 25.0);
        assert_eq!(config.report.display_top_n, 5);
        assert_eq!(config.billing.region, "us-east-1");
        assert_eq!(
            config.notify.webhook_url.as_deref(),
            Some("https://hooks.example.com/costs")
        );
    }

    #[test]
    fn parse_empty_toml_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.report.storage_top_n, 10);
        assert!(config.store.path.is_none());
        assert!(config.notify.webhook_url.is_none());
    }

    #[test]
    fn load_from_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.report.lookback_days, 7);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[report\nalert_threshold = ").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn history_path_prefers_configured_path() {
        let mut config = AppConfig::default();
        config.store.path = Some(PathBuf::from("/var/lib/costwatch/history.json"));
        assert_eq!(
            config.history_path(),
            PathBuf::from("/var/lib/costwatch/history.json")
        );
    }

    #[test]
    fn config_path_uses_xdg_when_set() {
        std::env::set_var("XDG_CONFIG_HOME", "/tmp/test_xdg_config");
        let path = AppConfig::config_path();
        std::env::remove_var("XDG_CONFIG_HOME");
        assert_eq!(path, PathBuf::from("/tmp/test_xdg_config/costwatch/config.toml"));
    }
}
