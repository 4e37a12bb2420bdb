use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use taskboard_app::{
    settings_from_config, BoardController, BoardStore, DragController, NativeNotifier,
    NotificationHub, ReminderScheduler,
};
use taskboard_core::{AppConfig, Repository, SystemClock, TaskboardError, TaskboardResult};
use taskboard_domain::{Board, BoardId, Card, CardId, ListId};
use taskboard_persistence::{Backend, MemoryStore};

/// Everything one CLI invocation works with: the file-backed store, the
/// board controller in front of it and the notification hub.
pub struct CliContext {
    pub config: AppConfig,
    backend: Backend,
    pub controller: BoardController,
    pub hub: Arc<NotificationHub>,
}

impl CliContext {
    pub async fn load(file_path: &Path, config: AppConfig) -> TaskboardResult<Self> {
        let store = Arc::new(MemoryStore::open(file_path).await?);
        tracing::info!("Opened board file {}", file_path.display());

        let backend = Backend::from_store(store);
        let controller = BoardController::new(backend.clone(), Arc::new(BoardStore::new()));
        let hub = Arc::new(NotificationHub::new(
            settings_from_config(&config),
            Arc::new(SystemClock),
        ));
        Ok(Self {
            config,
            backend,
            controller,
            hub,
        })
    }

    /// Load a board and make it the open one.
    pub async fn open_board(&self, id: BoardId) -> TaskboardResult<Board> {
        self.controller
            .load_board(id)
            .await?
            .ok_or_else(|| TaskboardError::NotFound(format!("board {}", id)))
    }

    pub async fn open_board_of_list(&self, list_id: ListId) -> TaskboardResult<Board> {
        let list = self
            .backend
            .lists
            .get_by_id(list_id)
            .await?
            .ok_or_else(|| TaskboardError::NotFound(format!("list {}", list_id)))?;
        self.open_board(list.board_id).await
    }

    pub async fn open_board_of_card(&self, card_id: CardId) -> TaskboardResult<(Board, Card)> {
        let card = self
            .backend
            .cards
            .get_by_id(card_id)
            .await?
            .ok_or_else(|| TaskboardError::NotFound(format!("card {}", card_id)))?;
        let board = self.open_board_of_list(card.list_id).await?;
        Ok((board, card))
    }

    /// The open board as it stands after the last action.
    pub fn current_board(&self) -> TaskboardResult<Board> {
        self.controller
            .store()
            .read(|state| state.current_board().cloned())
            .ok_or_else(|| TaskboardError::Internal("no board is open".into()))
    }

    pub fn drag_controller(&self) -> DragController<'_> {
        DragController::new(&self.controller, self.config.effective_list_drag_prefix())
    }

    pub fn reminder_scheduler(&self, poll_interval: Option<Duration>) -> Arc<ReminderScheduler> {
        Arc::new(ReminderScheduler::new(
            self.controller.store().clone(),
            self.hub.clone(),
            native_notifier(),
            poll_interval.unwrap_or_else(|| self.config.reminder_poll_interval()),
            self.config.reminder_cooldown(),
        ))
    }
}

#[cfg(feature = "desktop")]
fn native_notifier() -> Arc<dyn NativeNotifier> {
    Arc::new(taskboard_app::DesktopNotifier)
}

#[cfg(not(feature = "desktop"))]
fn native_notifier() -> Arc<dyn NativeNotifier> {
    Arc::new(taskboard_app::NoopNotifier)
}
