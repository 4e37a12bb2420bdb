//! Application layer of taskboard: the board store, async board actions,
//! drag handling and the reminder scheduler.

pub mod controller;
pub mod drag;
pub mod hub;
pub mod notifier;
pub mod scheduler;
pub mod store;

pub use controller::BoardController;
pub use drag::DragController;
pub use hub::{settings_from_config, NotificationHub};
#[cfg(feature = "desktop")]
pub use notifier::DesktopNotifier;
pub use notifier::{
    ensure_permission, NativeNotification, NativeNotifier, NoopNotifier, NotificationPermission,
};
pub use scheduler::{FiredReminder, ReminderScheduler};
pub use store::BoardStore;
