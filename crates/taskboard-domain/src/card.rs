use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_core::{TaskboardError, TaskboardResult};
use uuid::Uuid;

use crate::field_update::FieldUpdate;
use crate::list::ListId;
use crate::position::Positioned;

pub type CardId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub list_id: ListId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub reminder_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reminder_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCard {
    pub list_id: ListId,
    pub title: String,
    pub description: Option<String>,
    /// Left empty, the store appends after the last card of the list.
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
    pub reminder_date: FieldUpdate<DateTime<Utc>>,
    pub reminder_enabled: Option<bool>,
}

/// One entry of a card position batch; `list_id` is set when the card
/// changed lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPosition {
    pub id: CardId,
    pub position: i32,
    #[serde(default)]
    pub list_id: Option<ListId>,
}

impl Card {
    pub fn new(list_id: ListId, title: String, position: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            list_id,
            title,
            description: None,
            position,
            created_at: now,
            updated_at: now,
            reminder_date: None,
            reminder_enabled: false,
        }
    }

    /// Apply a partial update.
    ///
    /// Rejected without touching the card when it would leave an enabled
    /// reminder with no date.
    pub fn update(&mut self, patch: CardPatch) -> TaskboardResult<()> {
        let enabled = patch.reminder_enabled.unwrap_or(self.reminder_enabled);
        let date = patch.reminder_date.resolve(self.reminder_date.as_ref());
        if enabled && date.is_none() {
            return Err(TaskboardError::Validation(format!(
                "card {} has reminders enabled but no reminder date",
                self.id
            )));
        }

        if let Some(title) = patch.title {
            self.title = title;
        }
        patch.description.apply_to(&mut self.description);
        patch.reminder_date.apply_to(&mut self.reminder_date);
        self.reminder_enabled = enabled;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn set_reminder(&mut self, at: DateTime<Utc>) {
        self.reminder_date = Some(at);
        self.reminder_enabled = true;
        self.updated_at = Utc::now();
    }

    /// Turn the reminder off, keeping the last date for the editor.
    pub fn disable_reminder(&mut self) {
        self.reminder_enabled = false;
        self.updated_at = Utc::now();
    }

    pub fn is_reminder_due(&self, now: DateTime<Utc>) -> bool {
        self.reminder_enabled && self.reminder_date.is_some_and(|at| at <= now)
    }
}

impl Positioned for Card {
    fn position(&self) -> i32 {
        self.position
    }

    fn set_position(&mut self, position: i32) {
        self.position = position;
    }
}
