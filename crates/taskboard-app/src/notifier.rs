//! Native (OS-level) notification seam.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use taskboard_core::TaskboardResult;
use taskboard_domain::CardId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    Granted,
    Denied,
    /// Not decided yet; the user can still be asked.
    Default,
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeNotification {
    pub title: String,
    pub body: String,
    /// Notifications sharing a tag replace each other.
    pub tag: String,
    pub require_interaction: bool,
    /// Close hint for notifications that do not require interaction.
    pub auto_close: Option<Duration>,
}

const AUTO_CLOSE: Duration = Duration::from_secs(5);

impl NativeNotification {
    pub fn new(title: impl Into<String>, body: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tag: tag.into(),
            require_interaction: false,
            auto_close: Some(AUTO_CLOSE),
        }
    }

    /// Sticky reminder for a due card.
    pub fn reminder(card_id: CardId, card_title: &str) -> Self {
        Self {
            require_interaction: true,
            auto_close: None,
            ..Self::new(
                "🔔 Taskboard Reminder",
                format!("Don't forget: {}", card_title),
                format!("reminder-{}", card_id),
            )
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait NativeNotifier: Send + Sync {
    fn permission(&self) -> NotificationPermission;

    /// Ask the user for permission; returns the resulting state.
    fn request_permission(&self) -> NotificationPermission;

    fn show(&self, notification: &NativeNotification) -> TaskboardResult<()>;
}

/// Resolve permission, asking once when it is still undecided.
pub fn ensure_permission(notifier: &dyn NativeNotifier) -> bool {
    match notifier.permission() {
        NotificationPermission::Granted => true,
        NotificationPermission::Default => {
            notifier.request_permission() == NotificationPermission::Granted
        }
        NotificationPermission::Denied | NotificationPermission::Unsupported => false,
    }
}

/// For environments without a notification service.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl NativeNotifier for NoopNotifier {
    fn permission(&self) -> NotificationPermission {
        NotificationPermission::Unsupported
    }

    fn request_permission(&self) -> NotificationPermission {
        NotificationPermission::Unsupported
    }

    fn show(&self, _notification: &NativeNotification) -> TaskboardResult<()> {
        Ok(())
    }
}

#[cfg(feature = "desktop")]
pub use desktop::DesktopNotifier;

#[cfg(feature = "desktop")]
mod desktop {
    use super::*;
    use taskboard_core::TaskboardError;

    /// Desktop notifications through the platform notification daemon.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct DesktopNotifier;

    impl NativeNotifier for DesktopNotifier {
        fn permission(&self) -> NotificationPermission {
            if cfg!(any(target_os = "linux", target_os = "macos", target_os = "windows")) {
                NotificationPermission::Granted
            } else {
                NotificationPermission::Unsupported
            }
        }

        fn request_permission(&self) -> NotificationPermission {
            self.permission()
        }

        fn show(&self, notification: &NativeNotification) -> TaskboardResult<()> {
            let timeout = match notification.auto_close {
                Some(after) if !notification.require_interaction => {
                    notify_rust::Timeout::Milliseconds(after.as_millis().min(u32::MAX as u128) as u32)
                }
                _ => notify_rust::Timeout::Never,
            };

            notify_rust::Notification::new()
                .summary(&notification.title)
                .body(&notification.body)
                .appname("taskboard")
                .icon("dialog-information")
                .timeout(timeout)
                .show()
                .map_err(|e| TaskboardError::Notification(e.to_string()))?;

            tracing::debug!(tag = %notification.tag, "desktop notification sent");
            Ok(())
        }
    }
}
