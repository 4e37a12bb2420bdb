//! Per-card reminder de-duplication.
//!
//! A card moves `Idle -> Due -> Notified { until } -> Idle`. The tracker only
//! remembers cards in the `Notified` phase; everything else is derived from
//! the card and the current instant.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::card::{Card, CardId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderPhase {
    Idle,
    Due,
    Notified { until: DateTime<Utc> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cooldown {
    until: DateTime<Utc>,
    /// Reminder date at the time it fired; a different date re-arms the card.
    reminder_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ReminderTracker {
    cooldown: Duration,
    notified: HashMap<CardId, Cooldown>,
}

impl ReminderTracker {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            notified: HashMap::new(),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn phase(&self, card: &Card, now: DateTime<Utc>) -> ReminderPhase {
        if let Some(entry) = self.notified.get(&card.id) {
            if self.still_silenced(entry, card, now) {
                return ReminderPhase::Notified { until: entry.until };
            }
        }
        if card.is_reminder_due(now) {
            ReminderPhase::Due
        } else {
            ReminderPhase::Idle
        }
    }

    /// Cards that should fire now, recording each one as notified.
    ///
    /// Expired cool-downs are dropped first, as are those whose card is in
    /// `cards` but was edited (date changed or reminder turned off). Entries
    /// for cards outside `cards`, such as those on another board, are kept
    /// until they expire.
    pub fn collect_due<'a, I>(&mut self, cards: I, now: DateTime<Utc>) -> Vec<&'a Card>
    where
        I: IntoIterator<Item = &'a Card>,
    {
        let cards: Vec<&'a Card> = cards.into_iter().collect();

        let by_id: HashMap<CardId, &Card> = cards.iter().map(|c| (c.id, *c)).collect();
        self.notified.retain(|id, entry| {
            entry.until > now && by_id.get(id).map_or(true, |card| matches_entry(entry, card))
        });

        let mut due = Vec::new();
        for card in cards {
            if !card.is_reminder_due(now) || self.notified.contains_key(&card.id) {
                continue;
            }
            if let Some(reminder_date) = card.reminder_date {
                self.notified.insert(
                    card.id,
                    Cooldown {
                        until: now + self.cooldown,
                        reminder_date,
                    },
                );
                due.push(card);
            }
        }
        due
    }

    /// Forget a card's cool-down so it may fire on the next check.
    pub fn rearm(&mut self, card_id: CardId) {
        self.notified.remove(&card_id);
    }

    pub fn clear(&mut self) {
        self.notified.clear();
    }

    pub fn notified_count(&self) -> usize {
        self.notified.len()
    }

    fn still_silenced(&self, entry: &Cooldown, card: &Card, now: DateTime<Utc>) -> bool {
        entry.until > now && matches_entry(entry, card)
    }
}

fn matches_entry(entry: &Cooldown, card: &Card) -> bool {
    card.reminder_enabled && card.reminder_date == Some(entry.reminder_date)
}

impl Default for ReminderTracker {
    fn default() -> Self {
        Self::new(Duration::minutes(5))
    }
}
