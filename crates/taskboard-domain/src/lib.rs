pub mod board;
pub mod card;
pub mod drag;
pub mod field_update;
pub mod list;
pub mod notification;
pub mod notification_center;
pub mod position;
pub mod reminder;
pub mod settings;
pub mod state;

pub use board::{Board, BoardId, BoardPatch, NewBoard};
pub use card::{Card, CardId, CardPatch, CardPosition, NewCard};
pub use drag::{DragEnd, DragKind, DragLocation, DropPlan};
pub use field_update::FieldUpdate;
pub use list::{List, ListId, ListPatch, ListPosition, NewList};
pub use notification::{
    ActivityDetails, AppNotification, BoardActivity, NotificationDraft, NotificationId,
    NotificationKind, NotificationPriority,
};
pub use notification_center::{NotificationCenter, NotificationFilter};
pub use position::Positioned;
pub use reminder::{ReminderPhase, ReminderTracker};
pub use settings::{NotificationSettings, QuietHours, SettingsPatch};
pub use state::{BoardAction, BoardState};
