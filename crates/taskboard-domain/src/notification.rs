//! In-app notifications and the factories that build them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::BoardId;
use crate::card::{Card, CardId};
use crate::list::ListId;

pub type NotificationId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Reminder,
    System,
    BoardActivity,
    Mention,
}

impl NotificationKind {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Reminder => "🔔",
            Self::System => "ℹ️",
            Self::BoardActivity => "📋",
            Self::Mention => "👋",
        }
    }

    fn urgency_weight(&self) -> f64 {
        match self {
            Self::Reminder => 50.0,
            Self::Mention => 30.0,
            Self::BoardActivity => 10.0,
            Self::System => 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl NotificationPriority {
    fn urgency_weight(&self) -> f64 {
        match self {
            Self::High => 100.0,
            Self::Medium => 50.0,
            Self::Low => 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppNotification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_id: Option<CardId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<BoardId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<ListId>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub dismissed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub snoozed_until: Option<DateTime<Utc>>,
    pub priority: NotificationPriority,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl AppNotification {
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none() && self.dismissed_at.is_none()
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed_at.is_some()
    }

    pub fn is_snoozed(&self, now: DateTime<Utc>) -> bool {
        self.snoozed_until.is_some_and(|until| until > now)
    }

    pub fn icon(&self) -> &'static str {
        self.kind.icon()
    }

    /// Ranking used to order the notification list.
    ///
    /// Priority and kind weights minus five points per hour of age, never
    /// below 1.
    pub fn urgency_score(&self, now: DateTime<Utc>) -> u32 {
        let base = self.priority.urgency_weight() + self.kind.urgency_weight();
        let age_hours = (now - self.created_at).num_milliseconds() as f64 / 3_600_000.0;
        (base - age_hours * 5.0).max(1.0).round() as u32
    }
}

/// A notification that has not been assigned an id or timestamp yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub card_id: Option<CardId>,
    pub board_id: Option<BoardId>,
    pub list_id: Option<ListId>,
    pub priority: NotificationPriority,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardActivity {
    CardCreated,
    CardMoved,
    CardUpdated,
    ListCreated,
    ListMoved,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityDetails {
    pub board_id: BoardId,
    pub board_title: Option<String>,
    pub card_id: Option<CardId>,
    pub card_title: Option<String>,
    pub list_id: Option<ListId>,
    pub list_title: Option<String>,
}

impl NotificationDraft {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            card_id: None,
            board_id: None,
            list_id: None,
            priority: NotificationPriority::default(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_priority(mut self, priority: NotificationPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// In-app notification for a card whose reminder came due.
    pub fn reminder_due(card: &Card, board_id: BoardId) -> Self {
        let mut draft = Self::new(
            NotificationKind::Reminder,
            "🔔 Reminder Due",
            format!("Don't forget: {}", card.title),
        )
        .with_priority(NotificationPriority::High)
        .with_meta("cardTitle", card.title.clone());
        if let Some(at) = card.reminder_date {
            draft = draft.with_meta("reminderDate", at.to_rfc3339());
        }
        draft.card_id = Some(card.id);
        draft.board_id = Some(board_id);
        draft.list_id = Some(card.list_id);
        draft
    }

    pub fn due_date(
        card_title: &str,
        due: DateTime<Utc>,
        card_id: CardId,
        board_id: BoardId,
        overdue: bool,
    ) -> Self {
        let (title, message, priority) = if overdue {
            (
                "⚠️ Overdue Reminder",
                format!("\"{}\" is overdue!", card_title),
                NotificationPriority::High,
            )
        } else {
            (
                "⏰ Due Soon",
                format!("\"{}\" is due soon", card_title),
                NotificationPriority::Medium,
            )
        };
        let mut draft = Self::new(NotificationKind::Reminder, title, message)
            .with_priority(priority)
            .with_meta("reminderDate", due.to_rfc3339())
            .with_meta("cardTitle", card_title);
        draft.card_id = Some(card_id);
        draft.board_id = Some(board_id);
        draft
    }

    pub fn system(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::System, title, message)
    }

    pub fn welcome() -> Self {
        Self::system(
            "👋 Welcome to Taskboard!",
            "Get started by creating your first board and organizing your tasks.",
        )
    }

    pub fn board_activity(activity: BoardActivity, details: ActivityDetails) -> Self {
        let card = details.card_title.as_deref().unwrap_or_default();
        let list = details.list_title.as_deref().unwrap_or_default();
        let (title, message) = match activity {
            BoardActivity::CardCreated => (
                "📝 New Card Created",
                format!("\"{}\" was added to {}", card, list),
            ),
            BoardActivity::CardMoved => {
                ("🔄 Card Moved", format!("\"{}\" was moved to {}", card, list))
            }
            BoardActivity::CardUpdated => ("✏️ Card Updated", format!("\"{}\" was updated", card)),
            BoardActivity::ListCreated => (
                "📋 New List Created",
                format!("\"{}\" was added to the board", list),
            ),
            BoardActivity::ListMoved => ("🔄 List Moved", format!("\"{}\" was reordered", list)),
        };

        let mut draft = Self::new(NotificationKind::BoardActivity, title, message)
            .with_priority(NotificationPriority::Low);
        for (key, value) in [
            ("cardTitle", details.card_title),
            ("listTitle", details.list_title),
            ("boardTitle", details.board_title),
        ] {
            if let Some(value) = value {
                draft = draft.with_meta(key, value);
            }
        }
        draft.board_id = Some(details.board_id);
        draft.card_id = details.card_id;
        draft.list_id = details.list_id;
        draft
    }

    pub fn into_notification(self, id: NotificationId, created_at: DateTime<Utc>) -> AppNotification {
        AppNotification {
            id,
            kind: self.kind,
            title: self.title,
            message: self.message,
            card_id: self.card_id,
            board_id: self.board_id,
            list_id: self.list_id,
            created_at,
            read_at: None,
            dismissed_at: None,
            snoozed_until: None,
            priority: self.priority,
            metadata: self.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_reminder_due_carries_board_and_card() {
        let board_id = Uuid::new_v4();
        let mut card = Card::new(Uuid::new_v4(), "Renew passport".to_string(), 1);
        card.set_reminder(Utc::now());

        let draft = NotificationDraft::reminder_due(&card, board_id);
        assert_eq!(draft.kind, NotificationKind::Reminder);
        assert_eq!(draft.message, "Don't forget: Renew passport");
        assert_eq!(draft.priority, NotificationPriority::High);
        assert_eq!(draft.board_id, Some(board_id));
        assert_eq!(draft.card_id, Some(card.id));
        assert!(draft.metadata.contains_key("reminderDate"));
    }

    #[test]
    fn test_due_date_variants() {
        let id = Uuid::new_v4();
        let overdue = NotificationDraft::due_date("Ship", Utc::now(), id, id, true);
        assert_eq!(overdue.title, "⚠️ Overdue Reminder");
        assert_eq!(overdue.priority, NotificationPriority::High);

        let soon = NotificationDraft::due_date("Ship", Utc::now(), id, id, false);
        assert_eq!(soon.message, "\"Ship\" is due soon");
        assert_eq!(soon.priority, NotificationPriority::Medium);
    }

    #[test]
    fn test_board_activity_messages() {
        let details = ActivityDetails {
            board_id: Uuid::new_v4(),
            board_title: Some("Sprint 1".to_string()),
            card_title: Some("A".to_string()),
            list_title: Some("Doing".to_string()),
            ..ActivityDetails::default()
        };
        let draft = NotificationDraft::board_activity(BoardActivity::CardMoved, details);
        assert_eq!(draft.title, "🔄 Card Moved");
        assert_eq!(draft.message, "\"A\" was moved to Doing");
        assert_eq!(draft.priority, NotificationPriority::Low);
        assert_eq!(draft.metadata.get("boardTitle").map(String::as_str), Some("Sprint 1"));
    }

    #[test]
    fn test_urgency_score_decays_with_age() {
        let now = Utc::now();
        let fresh = NotificationDraft::system("t", "m").into_notification(Uuid::new_v4(), now);
        assert_eq!(fresh.urgency_score(now), 55);
        assert_eq!(fresh.urgency_score(now + Duration::hours(2)), 45);
        assert_eq!(fresh.urgency_score(now + Duration::days(30)), 1);

        let reminder = NotificationDraft::due_date("x", now, Uuid::new_v4(), Uuid::new_v4(), true)
            .into_notification(Uuid::new_v4(), now);
        assert_eq!(reminder.urgency_score(now), 150);
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let n = NotificationDraft::welcome().into_notification(Uuid::new_v4(), Utc::now());
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "system");
        assert_eq!(json["priority"], "medium");
        assert_eq!(n.icon(), "ℹ️");
    }
}
