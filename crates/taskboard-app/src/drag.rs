use taskboard_core::TaskboardResult;
use taskboard_domain::{BoardAction, DragEnd, DropPlan};

use crate::controller::BoardController;

/// Drop handler: turns a finished drag into a reorder and persists it.
pub struct DragController<'a> {
    board: &'a BoardController,
    list_prefix: String,
}

impl<'a> DragController<'a> {
    pub fn new(board: &'a BoardController, list_prefix: impl Into<String>) -> Self {
        Self {
            board,
            list_prefix: list_prefix.into(),
        }
    }

    /// Apply a drag-end event.
    ///
    /// Drops outside any container or back onto the starting slot change
    /// nothing and make no remote call. Malformed ids land in the error slot.
    pub async fn handle_drag_end(&self, drag: &DragEnd) -> TaskboardResult<DropPlan> {
        let plan = match drag.plan(&self.list_prefix) {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!("Rejected drag of '{}': {}", drag.draggable_id, e);
                self.board
                    .store()
                    .dispatch(BoardAction::SetError(Some(e.user_message())));
                return Err(e);
            }
        };

        match plan {
            DropPlan::Ignore => {
                tracing::debug!("Drag of '{}' changed nothing", drag.draggable_id);
            }
            DropPlan::MoveCard {
                card_id,
                source_list_id,
                dest_list_id,
                index,
            } => {
                self.board
                    .move_card(card_id, source_list_id, dest_list_id, index)
                    .await?;
            }
            DropPlan::MoveList { list_id, index } => {
                self.board.move_list(list_id, index).await?;
            }
        }
        Ok(plan)
    }
}
