use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::notification::NotificationKind;

/// Window during which native notifications are suppressed.
///
/// A start later than the end spans midnight (e.g. 22:00 to 08:00). Both
/// bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    pub enabled: bool,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl QuietHours {
    pub fn contains(&self, time: NaiveTime) -> bool {
        if !self.enabled {
            return false;
        }
        if self.start_time > self.end_time {
            time >= self.start_time || time <= self.end_time
        } else {
            time >= self.start_time && time <= self.end_time
        }
    }
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or_default(),
            end_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub browser_notifications: bool,
    pub email_notifications: bool,
    pub reminder_notifications: bool,
    pub board_activity_notifications: bool,
    pub mention_notifications: bool,
    pub quiet_hours: QuietHours,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            browser_notifications: true,
            email_notifications: false,
            reminder_notifications: true,
            board_activity_notifications: true,
            mention_notifications: true,
            quiet_hours: QuietHours::default(),
        }
    }
}

impl NotificationSettings {
    /// Whether notifications of this kind are enqueued at all.
    pub fn allows(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Reminder => self.reminder_notifications,
            NotificationKind::BoardActivity => self.board_activity_notifications,
            NotificationKind::Mention => self.mention_notifications,
            NotificationKind::System => true,
        }
    }

    /// Whether a native (desktop) notification may be shown at this local time.
    pub fn allows_native_at(&self, local_time: NaiveTime) -> bool {
        self.browser_notifications && !self.quiet_hours.contains(local_time)
    }

    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(v) = patch.browser_notifications {
            self.browser_notifications = v;
        }
        if let Some(v) = patch.email_notifications {
            self.email_notifications = v;
        }
        if let Some(v) = patch.reminder_notifications {
            self.reminder_notifications = v;
        }
        if let Some(v) = patch.board_activity_notifications {
            self.board_activity_notifications = v;
        }
        if let Some(v) = patch.mention_notifications {
            self.mention_notifications = v;
        }
        if let Some(v) = patch.quiet_hours {
            self.quiet_hours = v;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub browser_notifications: Option<bool>,
    pub email_notifications: Option<bool>,
    pub reminder_notifications: Option<bool>,
    pub board_activity_notifications: Option<bool>,
    pub mention_notifications: Option<bool>,
    pub quiet_hours: Option<QuietHours>,
}

/// `"HH:MM"` wire format for quiet-hour bounds.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_overnight_quiet_hours() {
        let quiet = QuietHours {
            enabled: true,
            ..QuietHours::default()
        };
        assert!(quiet.contains(at(23, 30)));
        assert!(quiet.contains(at(7, 59)));
        assert!(quiet.contains(at(8, 0)));
        assert!(!quiet.contains(at(12, 0)));
    }

    #[test]
    fn test_same_day_quiet_hours() {
        let quiet = QuietHours {
            enabled: true,
            start_time: at(12, 0),
            end_time: at(14, 0),
        };
        assert!(quiet.contains(at(13, 0)));
        assert!(!quiet.contains(at(15, 0)));
    }

    #[test]
    fn test_disabled_quiet_hours_never_match() {
        assert!(!QuietHours::default().contains(at(23, 0)));
    }

    #[test]
    fn test_defaults_and_gating() {
        let mut settings = NotificationSettings::default();
        assert!(settings.allows(NotificationKind::Reminder));
        assert!(!settings.email_notifications);

        settings.apply(SettingsPatch {
            reminder_notifications: Some(false),
            browser_notifications: Some(false),
            ..SettingsPatch::default()
        });
        assert!(!settings.allows(NotificationKind::Reminder));
        assert!(settings.allows(NotificationKind::System));
        assert!(!settings.allows_native_at(at(12, 0)));
    }

    #[test]
    fn test_quiet_hours_wire_format() {
        let json = serde_json::to_value(QuietHours::default()).unwrap();
        assert_eq!(json["start_time"], "22:00");
        let parsed: QuietHours = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, QuietHours::default());
    }
}
