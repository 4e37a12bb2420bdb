use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use parking_lot::Mutex;
use taskboard_core::{AppConfig, Clock, TaskboardResult};
use taskboard_domain::{
    AppNotification, NotificationCenter, NotificationDraft, NotificationFilter, NotificationId,
    NotificationSettings, QuietHours, SettingsPatch,
};
use uuid::Uuid;

/// Shared handle to the notification center.
///
/// Stamps new notifications with an id and the clock's current time.
pub struct NotificationHub {
    center: Mutex<NotificationCenter>,
    clock: Arc<dyn Clock>,
}

impl NotificationHub {
    pub fn new(settings: NotificationSettings, clock: Arc<dyn Clock>) -> Self {
        Self::from_center(NotificationCenter::new(settings), clock)
    }

    pub fn from_center(center: NotificationCenter, clock: Arc<dyn Clock>) -> Self {
        Self {
            center: Mutex::new(center),
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    /// Returns the stored notification, or `None` if its kind is turned off.
    pub fn add(&self, draft: NotificationDraft) -> Option<AppNotification> {
        let now = self.clock.now();
        let added = self.center.lock().add(draft, Uuid::new_v4(), now).cloned();
        if let Some(n) = &added {
            tracing::debug!("Added {:?} notification '{}'", n.kind, n.title);
        }
        added
    }

    pub fn mark_read(&self, id: NotificationId) -> bool {
        let now = self.clock.now();
        self.center.lock().mark_read(id, now)
    }

    pub fn mark_all_read(&self) {
        let now = self.clock.now();
        self.center.lock().mark_all_read(now);
    }

    pub fn dismiss(&self, id: NotificationId) -> bool {
        let now = self.clock.now();
        self.center.lock().dismiss(id, now)
    }

    pub fn snooze(&self, id: NotificationId, minutes: i64) -> TaskboardResult<bool> {
        let now = self.clock.now();
        self.center.lock().snooze(id, minutes, now)
    }

    pub fn update_settings(&self, patch: SettingsPatch) {
        self.center.lock().update_settings(patch);
    }

    pub fn settings(&self) -> NotificationSettings {
        *self.center.lock().settings()
    }

    pub fn unread_count(&self) -> usize {
        self.center.lock().unread_count()
    }

    pub fn visible(&self, filter: NotificationFilter) -> Vec<AppNotification> {
        let now = self.clock.now();
        self.center
            .lock()
            .visible(filter, now)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> NotificationCenter {
        self.center.lock().clone()
    }
}

/// Initial notification settings from the `[notifications]` config table.
///
/// An unparsable quiet-hours range is logged and left disabled.
pub fn settings_from_config(config: &AppConfig) -> NotificationSettings {
    let mut settings = NotificationSettings::default();
    let table = &config.notifications;
    if let Some(desktop) = table.desktop {
        settings.browser_notifications = desktop;
    }
    if let Some(activity) = table.board_activity {
        settings.board_activity_notifications = activity;
    }
    if let Some(range) = &table.quiet_hours {
        match parse_quiet_hours(range) {
            Some(quiet_hours) => settings.quiet_hours = quiet_hours,
            None => tracing::warn!("Ignoring malformed quiet_hours '{}'", range),
        }
    }
    settings
}

fn parse_quiet_hours(range: &str) -> Option<QuietHours> {
    let (start, end) = range.split_once('-')?;
    let parse = |raw: &str| NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok();
    Some(QuietHours {
        enabled: true,
        start_time: parse(start)?,
        end_time: parse(end)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_core::ManualClock;

    #[test]
    fn test_settings_from_config() {
        let config = AppConfig::from_toml_str(
            r#"
            [notifications]
            desktop = false
            quiet_hours = "22:30-07:00"
            "#,
        );
        let settings = settings_from_config(&config);
        assert!(!settings.browser_notifications);
        assert!(settings.quiet_hours.enabled);
        assert!(settings
            .quiet_hours
            .contains(NaiveTime::from_hms_opt(23, 0, 0).unwrap()));
    }

    #[test]
    fn test_malformed_quiet_hours_stay_disabled() {
        let config = AppConfig::from_toml_str("[notifications]\nquiet_hours = \"late\"");
        assert!(!settings_from_config(&config).quiet_hours.enabled);
    }

    #[test]
    fn test_snooze_follows_clock() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let hub = NotificationHub::new(NotificationSettings::default(), clock.clone());
        let n = hub.add(NotificationDraft::welcome()).unwrap();

        assert!(hub.snooze(n.id, 15).unwrap());
        assert!(hub.visible(NotificationFilter::All).is_empty());

        clock.advance(chrono::Duration::minutes(15));
        assert_eq!(hub.visible(NotificationFilter::All).len(), 1);
        assert_eq!(hub.unread_count(), 1);

        hub.mark_all_read();
        assert_eq!(hub.unread_count(), 0);
    }
}
