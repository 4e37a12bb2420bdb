//! Reminder polling loop.
//!
//! Scans every card of the open board on a fixed interval and fires each due
//! reminder at most once per cool-down, both natively (best effort) and into
//! the notification center.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use taskboard_domain::{AppNotification, BoardId, Card, CardId, NotificationDraft, ReminderTracker};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::hub::NotificationHub;
use crate::notifier::{ensure_permission, NativeNotification, NativeNotifier};
use crate::store::BoardStore;

/// Outcome of one fired reminder.
#[derive(Debug, Clone, Serialize)]
pub struct FiredReminder {
    pub card_id: CardId,
    pub card_title: String,
    pub reminder_date: Option<DateTime<Utc>>,
    pub native_shown: bool,
    /// `None` when reminder notifications are turned off.
    pub notification: Option<AppNotification>,
}

pub struct ReminderScheduler {
    store: Arc<BoardStore>,
    hub: Arc<NotificationHub>,
    notifier: Arc<dyn NativeNotifier>,
    tracker: Mutex<ReminderTracker>,
    poll_interval: Duration,
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl ReminderScheduler {
    pub fn new(
        store: Arc<BoardStore>,
        hub: Arc<NotificationHub>,
        notifier: Arc<dyn NativeNotifier>,
        poll_interval: Duration,
        cooldown: chrono::Duration,
    ) -> Self {
        Self {
            store,
            hub,
            notifier,
            tracker: Mutex::new(ReminderTracker::new(cooldown)),
            poll_interval,
            task_handle: Mutex::new(None),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Run one scan of the open board now.
    pub fn check_now(&self) -> Vec<FiredReminder> {
        let now = self.hub.now();
        let Some((board_id, cards)) = self.store.read(|state| {
            state
                .current_board()
                .map(|board| (board.id, board.cards().cloned().collect::<Vec<Card>>()))
        }) else {
            return Vec::new();
        };

        let due: Vec<Card> = {
            let mut tracker = self.tracker.lock();
            tracker
                .collect_due(cards.iter(), now)
                .into_iter()
                .cloned()
                .collect()
        };
        if due.is_empty() {
            return Vec::new();
        }
        tracing::info!("{} reminder(s) due on board {}", due.len(), board_id);

        due.iter()
            .map(|card| self.fire(card, board_id, now))
            .collect()
    }

    /// Queue the in-app notification, then try the native one.
    fn fire(&self, card: &Card, board_id: BoardId, now: DateTime<Utc>) -> FiredReminder {
        let notification = self.hub.add(NotificationDraft::reminder_due(card, board_id));
        let native_shown = catch_unwind(AssertUnwindSafe(|| self.show_native(card, now)))
            .unwrap_or_else(|_| {
                tracing::warn!("Native reminder for card {} panicked", card.id);
                false
            });
        FiredReminder {
            card_id: card.id,
            card_title: card.title.clone(),
            reminder_date: card.reminder_date,
            native_shown,
            notification,
        }
    }

    /// Best effort; failures degrade to in-app only.
    fn show_native(&self, card: &Card, now: DateTime<Utc>) -> bool {
        let settings = self.hub.settings();
        if !settings.reminder_notifications {
            return false;
        }
        if !settings.allows_native_at(now.with_timezone(&Local).time()) {
            tracing::debug!("Native reminder for card {} suppressed by settings", card.id);
            return false;
        }
        if !ensure_permission(self.notifier.as_ref()) {
            tracing::debug!("Native notifications not permitted; in-app only");
            return false;
        }
        match self.notifier.show(&NativeNotification::reminder(card.id, &card.title)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Native reminder for card {} failed: {}", card.id, e);
                false
            }
        }
    }

    /// Let a card fire again on the next check, e.g. after its reminder was
    /// edited.
    pub fn rearm(&self, card_id: CardId) {
        self.tracker.lock().rearm(card_id);
    }

    /// Start (or restart) the polling loop.
    ///
    /// The first check runs immediately. Opening a different board restarts
    /// the interval with another immediate check. Any loop started earlier is
    /// cancelled first.
    pub fn start(self: &Arc<Self>) {
        let mut handle = self.task_handle.lock();
        if let Some(previous) = handle.take() {
            previous.abort();
            tracing::debug!("Cancelled previous reminder loop");
        }

        let weak: Weak<Self> = Arc::downgrade(self);
        let mut board_rx = self.store.subscribe_current();
        let period = self.poll_interval;

        *handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    changed = board_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        tracing::debug!("Open board changed; restarting reminder poll");
                        ticker.reset_immediately();
                        continue;
                    }
                }
                let Some(scheduler) = weak.upgrade() else {
                    break;
                };
                scheduler.check_now();
            }
        }));
        tracing::info!("Started reminder loop every {:?}", period);
    }

    pub fn stop(&self) {
        if let Some(handle) = self.task_handle.lock().take() {
            handle.abort();
            tracing::info!("Stopped reminder loop");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task_handle
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.get_mut().take() {
            handle.abort();
        }
    }
}
