pub mod board;
pub mod card;
pub mod drag;
pub mod list;
pub mod reminders;

use taskboard_domain::FieldUpdate;

/// `--description X` sets, `--clear-description` clears, neither leaves it alone.
pub(crate) fn description_update(value: Option<String>, clear: bool) -> FieldUpdate<String> {
    match (value, clear) {
        (Some(description), _) => FieldUpdate::Set(description),
        (None, true) => FieldUpdate::Clear,
        (None, false) => FieldUpdate::NoChange,
    }
}
