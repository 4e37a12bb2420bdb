use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_POLL_SECS: u64 = 60;
const DEFAULT_COOLDOWN_SECS: u64 = 5 * 60;
const DEFAULT_LIST_DRAG_PREFIX: &str = "list-";
// chrono::Duration is bounded to i64::MAX milliseconds.
const MAX_COOLDOWN_SECS: u64 = (i64::MAX / 1000) as u64;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    #[serde(default)]
    pub reminder_poll_secs: Option<u64>,
    #[serde(default)]
    pub reminder_cooldown_secs: Option<u64>,
    #[serde(default)]
    pub list_drag_prefix: Option<String>,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// `[notifications]` table: initial notification settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Show reminders as desktop notifications.
    #[serde(default)]
    pub desktop: Option<bool>,
    #[serde(default)]
    pub board_activity: Option<bool>,
    /// `"HH:MM-HH:MM"`, local time. Setting it enables quiet hours.
    #[serde(default)]
    pub quiet_hours: Option<String>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/taskboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("taskboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("taskboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                if let Ok(content) = std::fs::read_to_string(&config_path) {
                    return Self::from_toml_str(&content);
                }
            }
        }
        Self::default()
    }

    /// Parse a config document, falling back to defaults when it is malformed.
    pub fn from_toml_str(content: &str) -> Self {
        toml::from_str(content).unwrap_or_default()
    }

    /// Interval between two reminder polls. Zero is treated as unset.
    pub fn reminder_poll_interval(&self) -> std::time::Duration {
        let secs = self
            .reminder_poll_secs
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_POLL_SECS);
        std::time::Duration::from_secs(secs)
    }

    /// How long a fired reminder stays silenced before it may fire again.
    pub fn reminder_cooldown(&self) -> chrono::Duration {
        let secs = self
            .reminder_cooldown_secs
            .unwrap_or(DEFAULT_COOLDOWN_SECS)
            .min(MAX_COOLDOWN_SECS);
        chrono::Duration::seconds(secs as i64)
    }

    pub fn effective_list_drag_prefix(&self) -> &str {
        self.list_drag_prefix
            .as_deref()
            .unwrap_or(DEFAULT_LIST_DRAG_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(
            config.reminder_poll_interval(),
            std::time::Duration::from_secs(60)
        );
        assert_eq!(config.reminder_cooldown(), chrono::Duration::minutes(5));
        assert_eq!(config.effective_list_drag_prefix(), "list-");
    }

    #[test]
    fn test_from_toml_overrides() {
        let config = AppConfig::from_toml_str(
            r#"
            reminder_poll_secs = 15
            reminder_cooldown_secs = 120
            list_drag_prefix = "column:"
            "#,
        );
        assert_eq!(
            config.reminder_poll_interval(),
            std::time::Duration::from_secs(15)
        );
        assert_eq!(config.reminder_cooldown(), chrono::Duration::minutes(2));
        assert_eq!(config.effective_list_drag_prefix(), "column:");
    }

    #[test]
    fn test_malformed_toml_falls_back_to_defaults() {
        let config = AppConfig::from_toml_str("reminder_poll_secs = \"soon\"");
        assert!(config.reminder_poll_secs.is_none());
        assert_eq!(
            config.reminder_poll_interval(),
            std::time::Duration::from_secs(60)
        );
    }

    #[test]
    fn test_notifications_table() {
        let config = AppConfig::from_toml_str(
            r#"
            [notifications]
            desktop = false
            quiet_hours = "22:00-07:30"
            "#,
        );
        assert_eq!(config.notifications.desktop, Some(false));
        assert_eq!(config.notifications.quiet_hours.as_deref(), Some("22:00-07:30"));
        assert!(config.notifications.board_activity.is_none());
    }

    #[test]
    fn test_zero_poll_interval_uses_default() {
        let config = AppConfig {
            reminder_poll_secs: Some(0),
            ..AppConfig::default()
        };
        assert_eq!(
            config.reminder_poll_interval(),
            std::time::Duration::from_secs(60)
        );
    }
}
