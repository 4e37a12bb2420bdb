//! Notification center state: the newest-first notification list plus the
//! user's notification settings.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use taskboard_core::{TaskboardError, TaskboardResult};

use crate::notification::{AppNotification, NotificationDraft, NotificationId, NotificationKind};
use crate::settings::{NotificationSettings, SettingsPatch};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
    Reminders,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationCenter {
    notifications: Vec<AppNotification>,
    #[serde(default)]
    settings: NotificationSettings,
}

impl NotificationCenter {
    pub fn new(settings: NotificationSettings) -> Self {
        Self {
            notifications: Vec::new(),
            settings,
        }
    }

    /// Enqueue a notification at the front of the list.
    ///
    /// Returns `None` without enqueuing when the user turned this kind off.
    pub fn add(
        &mut self,
        draft: NotificationDraft,
        id: NotificationId,
        now: DateTime<Utc>,
    ) -> Option<&AppNotification> {
        if !self.settings.allows(draft.kind) {
            tracing::debug!("Dropping {:?} notification: disabled in settings", draft.kind);
            return None;
        }
        self.notifications.insert(0, draft.into_notification(id, now));
        self.notifications.first()
    }

    /// Returns `false` for an unknown id.
    pub fn mark_read(&mut self, id: NotificationId, now: DateTime<Utc>) -> bool {
        self.with(id, |n| {
            n.read_at.get_or_insert(now);
        })
    }

    pub fn mark_all_read(&mut self, now: DateTime<Utc>) {
        for n in &mut self.notifications {
            n.read_at.get_or_insert(now);
        }
    }

    pub fn dismiss(&mut self, id: NotificationId, now: DateTime<Utc>) -> bool {
        self.with(id, |n| {
            n.dismissed_at.get_or_insert(now);
        })
    }

    /// Hide a notification for `minutes`. Returns whether it exists.
    pub fn snooze(
        &mut self,
        id: NotificationId,
        minutes: i64,
        now: DateTime<Utc>,
    ) -> TaskboardResult<bool> {
        let until = Duration::try_minutes(minutes)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(|| {
                TaskboardError::Validation(format!("Snooze of {} minutes is out of range", minutes))
            })?;
        Ok(self.with(id, |n| n.snoozed_until = Some(until)))
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.settings.apply(patch);
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| n.is_unread()).count()
    }

    pub fn get(&self, id: NotificationId) -> Option<&AppNotification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    /// Every notification ever added, dismissed ones included.
    pub fn all(&self) -> &[AppNotification] {
        &self.notifications
    }

    /// Notifications to display: never dismissed ones, nor those snoozed
    /// past `now`.
    pub fn visible(&self, filter: NotificationFilter, now: DateTime<Utc>) -> Vec<&AppNotification> {
        self.notifications
            .iter()
            .filter(|n| !n.is_dismissed() && !n.is_snoozed(now))
            .filter(|n| match filter {
                NotificationFilter::All => true,
                NotificationFilter::Unread => n.read_at.is_none(),
                NotificationFilter::Reminders => n.kind == NotificationKind::Reminder,
            })
            .collect()
    }

    fn with(&mut self, id: NotificationId, f: impl FnOnce(&mut AppNotification)) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                f(n);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn add_system(center: &mut NotificationCenter, title: &str, now: DateTime<Utc>) -> NotificationId {
        let id = Uuid::new_v4();
        center.add(NotificationDraft::system(title, "body"), id, now);
        id
    }

    #[test]
    fn test_newest_first() {
        let now = Utc::now();
        let mut center = NotificationCenter::default();
        add_system(&mut center, "first", now);
        add_system(&mut center, "second", now);
        assert_eq!(center.all()[0].title, "second");
    }

    #[test]
    fn test_unread_count_scenario() {
        let now = Utc::now();
        let mut center = NotificationCenter::default();
        let ids: Vec<_> = (0..3)
            .map(|i| add_system(&mut center, &format!("n{}", i), now))
            .collect();
        assert_eq!(center.unread_count(), 3);

        center.mark_read(ids[0], now);
        assert_eq!(center.unread_count(), 2);

        center.dismiss(ids[1], now);
        assert_eq!(center.unread_count(), 1);
        assert_eq!(center.visible(NotificationFilter::All, now).len(), 2);
    }

    #[test]
    fn test_mark_all_read_keeps_first_read_time() {
        let now = Utc::now();
        let mut center = NotificationCenter::default();
        let id = add_system(&mut center, "a", now);
        center.mark_read(id, now);
        center.mark_all_read(now + Duration::minutes(1));
        assert_eq!(center.get(id).unwrap().read_at, Some(now));
        assert_eq!(center.unread_count(), 0);
    }

    #[test]
    fn test_snooze_hides_until_expiry() {
        let now = Utc::now();
        let mut center = NotificationCenter::default();
        let id = add_system(&mut center, "a", now);
        assert!(center.snooze(id, 10, now).unwrap());

        assert!(center.visible(NotificationFilter::All, now).is_empty());
        assert_eq!(
            center
                .visible(NotificationFilter::All, now + Duration::minutes(10))
                .len(),
            1
        );
        assert_eq!(center.unread_count(), 1);
    }

    #[test]
    fn test_snooze_out_of_range_is_rejected() {
        let now = Utc::now();
        let mut center = NotificationCenter::default();
        let id = add_system(&mut center, "a", now);

        let result = center.snooze(id, i64::MAX, now);
        assert!(matches!(result, Err(TaskboardError::Validation(_))));
        assert!(center.get(id).unwrap().snoozed_until.is_none());
        assert_eq!(center.visible(NotificationFilter::All, now).len(), 1);
    }

    #[test]
    fn test_filters() {
        let now = Utc::now();
        let mut center = NotificationCenter::default();
        let read = add_system(&mut center, "read", now);
        center.mark_read(read, now);
        center.add(
            NotificationDraft::due_date("x", now, Uuid::new_v4(), Uuid::new_v4(), true),
            Uuid::new_v4(),
            now,
        );

        assert_eq!(center.visible(NotificationFilter::Unread, now).len(), 1);
        let reminders = center.visible(NotificationFilter::Reminders, now);
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].kind, NotificationKind::Reminder);
    }

    #[test]
    fn test_disabled_kind_is_not_enqueued() {
        let now = Utc::now();
        let mut center = NotificationCenter::default();
        center.update_settings(SettingsPatch {
            reminder_notifications: Some(false),
            ..SettingsPatch::default()
        });
        let draft = NotificationDraft::due_date("x", now, Uuid::new_v4(), Uuid::new_v4(), false);
        assert!(center.add(draft, Uuid::new_v4(), now).is_none());
        assert!(center.all().is_empty());
    }

    #[test]
    fn test_unknown_id_is_reported() {
        let mut center = NotificationCenter::default();
        assert!(!center.mark_read(Uuid::new_v4(), Utc::now()));
        assert!(!center.dismiss(Uuid::new_v4(), Utc::now()));
    }
}
