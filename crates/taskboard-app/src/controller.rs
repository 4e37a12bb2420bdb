//! Async board actions.
//!
//! Creates, updates and deletes are pessimistic: the store is only touched
//! once the remote call succeeded. Reorders are optimistic: the move is
//! applied locally, then persisted as one position batch. A failed batch is
//! not rolled back; the affected ids are marked unsynced instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use taskboard_core::{PositionRepository, Repository, TaskboardError, TaskboardResult};
use taskboard_domain::{
    ActivityDetails, Board, BoardAction, BoardActivity, BoardId, BoardPatch, Card, CardId,
    CardPatch, List, ListId, ListPatch, NewBoard, NewCard, NewList, NotificationDraft,
};
use taskboard_persistence::Backend;
use uuid::Uuid;

use crate::hub::NotificationHub;
use crate::store::BoardStore;

pub struct BoardController {
    backend: Backend,
    store: Arc<BoardStore>,
    activity: Option<Arc<NotificationHub>>,
    load_generation: AtomicU64,
}

impl BoardController {
    pub fn new(backend: Backend, store: Arc<BoardStore>) -> Self {
        Self {
            backend,
            store,
            activity: None,
            load_generation: AtomicU64::new(0),
        }
    }

    /// Post board activity (card created, moved, ...) to the notification hub.
    pub fn with_activity_notifications(mut self, hub: Arc<NotificationHub>) -> Self {
        self.activity = Some(hub);
        self
    }

    pub fn store(&self) -> &Arc<BoardStore> {
        &self.store
    }

    pub async fn load_boards(&self) -> TaskboardResult<Vec<Board>> {
        self.store.dispatch(BoardAction::SetLoading(true));
        let result = self.backend.boards.get_all().await;
        if let Ok(boards) = &result {
            tracing::info!("Loaded {} boards", boards.len());
            self.store.dispatch(BoardAction::SetBoards(boards.clone()));
        }
        let result = self.settle(result);
        self.store.dispatch(BoardAction::SetLoading(false));
        result
    }

    /// Fetch a board and make it the open one.
    ///
    /// If another `load_board` started while this one was in flight, the
    /// older response is dropped and `Ok(None)` is returned.
    pub async fn load_board(&self, id: BoardId) -> TaskboardResult<Option<Board>> {
        let generation = self.load_generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.store.dispatch(BoardAction::SetLoading(true));

        let result = self.backend.boards.get_by_id(id).await;

        if self.load_generation.load(Ordering::SeqCst) != generation {
            tracing::debug!("Discarding stale load of board {}", id);
            return Ok(None);
        }
        if let Ok(board) = &result {
            self.store
                .dispatch(BoardAction::SetCurrentBoard(board.clone()));
        }
        let result = self.settle(result);
        self.store.dispatch(BoardAction::SetLoading(false));
        result
    }

    pub async fn create_board(&self, title: &str, description: Option<String>) -> TaskboardResult<Board> {
        let result = self
            .backend
            .boards
            .create(NewBoard {
                title: title.to_string(),
                description,
            })
            .await;
        if let Ok(board) = &result {
            self.store.dispatch(BoardAction::AddBoard(board.clone()));
        }
        self.settle(result)
    }

    pub async fn update_board(&self, id: BoardId, patch: BoardPatch) -> TaskboardResult<Board> {
        let result = self.backend.boards.update(id, patch).await;
        if let Ok(board) = &result {
            self.store.dispatch(BoardAction::UpdateBoard(board.clone()));
        }
        self.settle(result)
    }

    pub async fn delete_board(&self, id: BoardId) -> TaskboardResult<()> {
        let result = self.backend.boards.delete(id).await;
        if result.is_ok() {
            self.store.dispatch(BoardAction::DeleteBoard(id));
        }
        self.settle(result)
    }

    pub async fn create_list(&self, board_id: BoardId, title: &str) -> TaskboardResult<List> {
        let result = self
            .backend
            .lists
            .create(NewList {
                board_id,
                title: title.to_string(),
                position: None,
            })
            .await;
        if let Ok(list) = &result {
            self.store.dispatch(BoardAction::AddList(list.clone()));
            self.notify_activity(BoardActivity::ListCreated, board_id, None, Some(list));
        }
        self.settle(result)
    }

    pub async fn update_list(&self, id: ListId, patch: ListPatch) -> TaskboardResult<List> {
        let result = self.backend.lists.update(id, patch).await;
        if let Ok(list) = &result {
            self.store.dispatch(BoardAction::UpdateList(list.clone()));
        }
        self.settle(result)
    }

    pub async fn delete_list(&self, id: ListId) -> TaskboardResult<()> {
        let result = self.backend.lists.delete(id).await;
        if result.is_ok() {
            self.store.dispatch(BoardAction::DeleteList(id));
        }
        self.settle(result)
    }

    pub async fn create_card(
        &self,
        list_id: ListId,
        title: &str,
        description: Option<String>,
    ) -> TaskboardResult<Card> {
        let result = self
            .backend
            .cards
            .create(NewCard {
                list_id,
                title: title.to_string(),
                description,
                position: None,
            })
            .await;
        if let Ok(card) = &result {
            self.store.dispatch(BoardAction::AddCard(card.clone()));
            let list = self.current_list(list_id);
            if let Some(board_id) = self.current_board_id() {
                self.notify_activity(BoardActivity::CardCreated, board_id, Some(card), list.as_ref());
            }
        }
        self.settle(result)
    }

    /// Edit a card's title, description or reminder.
    pub async fn update_card(&self, id: CardId, patch: CardPatch) -> TaskboardResult<Card> {
        let result = self.backend.cards.update(id, patch).await;
        if let Ok(card) = &result {
            self.store.dispatch(BoardAction::UpdateCard(card.clone()));
            if let Some(board_id) = self.current_board_id() {
                self.notify_activity(BoardActivity::CardUpdated, board_id, Some(card), None);
            }
        }
        self.settle(result)
    }

    pub async fn delete_card(&self, id: CardId) -> TaskboardResult<()> {
        let result = self.backend.cards.delete(id).await;
        if result.is_ok() {
            self.store.dispatch(BoardAction::DeleteCard(id));
        }
        self.settle(result)
    }

    /// Move a card, then persist the positions of every card in the lists
    /// it left and entered.
    pub async fn move_card(
        &self,
        card_id: CardId,
        source_list_id: ListId,
        dest_list_id: ListId,
        new_position: usize,
    ) -> TaskboardResult<()> {
        let in_source = self.store.read(|state| {
            state
                .current_board()
                .and_then(|board| board.list(source_list_id))
                .is_some_and(|list| list.cards.iter().any(|c| c.id == card_id))
        });
        if !in_source {
            return self.settle(Err(TaskboardError::NotFound(format!(
                "card {} in list {}",
                card_id, source_list_id
            ))));
        }

        self.store.dispatch(BoardAction::MoveCard {
            card_id,
            source_list_id,
            dest_list_id,
            new_position,
        });

        let (moved, batch, board_id) = self.store.read(|state| {
            let Some(board) = state.current_board() else {
                return (None, Vec::new(), None);
            };
            let moved = board
                .list(dest_list_id)
                .and_then(|l| l.cards.iter().find(|c| c.id == card_id))
                .cloned();
            let lists = if source_list_id == dest_list_id {
                vec![dest_list_id]
            } else {
                vec![source_list_id, dest_list_id]
            };
            (moved, board.card_positions(&lists), Some(board.id))
        });

        // Only a missing destination list can abort the move at this point.
        let Some(card) = moved else {
            return self.settle(Err(TaskboardError::NotFound(format!(
                "list {}",
                dest_list_id
            ))));
        };

        let ids: Vec<Uuid> = batch.iter().map(|p| p.id).collect();
        let result = self.backend.cards.update_positions(batch).await;
        self.track_sync(&ids, &result);

        if result.is_ok() && source_list_id != dest_list_id {
            if let Some(board_id) = board_id {
                let list = self.current_list(dest_list_id);
                self.notify_activity(BoardActivity::CardMoved, board_id, Some(&card), list.as_ref());
            }
        }
        self.settle(result)
    }

    /// Move a list, then persist the position of every list on the board.
    pub async fn move_list(&self, list_id: ListId, new_position: usize) -> TaskboardResult<()> {
        self.store.dispatch(BoardAction::MoveList {
            list_id,
            new_position,
        });

        let found = self.store.read(|state| {
            state.current_board().and_then(|board| {
                board
                    .list(list_id)
                    .map(|list| (board.id, list.clone(), board.list_positions()))
            })
        });
        let Some((board_id, list, batch)) = found else {
            return self.settle(Err(TaskboardError::NotFound(format!("list {}", list_id))));
        };

        let ids: Vec<Uuid> = batch.iter().map(|p| p.id).collect();
        let result = self.backend.lists.update_positions(batch).await;
        self.track_sync(&ids, &result);

        if result.is_ok() {
            self.notify_activity(BoardActivity::ListMoved, board_id, None, Some(&list));
        }
        self.settle(result)
    }

    /// Record the outcome of a remote call in the shared error slot.
    fn settle<T>(&self, result: TaskboardResult<T>) -> TaskboardResult<T> {
        match &result {
            Ok(_) => self.store.dispatch(BoardAction::SetError(None)),
            Err(e) => {
                tracing::warn!("Board action failed: {}", e);
                self.store.dispatch(BoardAction::SetError(Some(e.user_message())));
            }
        }
        result
    }

    fn track_sync(&self, ids: &[Uuid], result: &TaskboardResult<()>) {
        let action = match result {
            Ok(()) => BoardAction::MarkSynced(ids.to_vec()),
            Err(_) => BoardAction::MarkUnsynced(ids.to_vec()),
        };
        self.store.dispatch(action);
    }

    fn current_board_id(&self) -> Option<BoardId> {
        self.store.read(|state| state.current_board_id())
    }

    fn current_list(&self, list_id: ListId) -> Option<List> {
        self.store
            .read(|state| state.current_board().and_then(|b| b.list(list_id).cloned()))
    }

    fn notify_activity(
        &self,
        activity: BoardActivity,
        board_id: BoardId,
        card: Option<&Card>,
        list: Option<&List>,
    ) {
        let Some(hub) = &self.activity else {
            return;
        };
        let board_title = self
            .store
            .read(|state| state.board(board_id).map(|b| b.title.clone()));
        let details = ActivityDetails {
            board_id,
            board_title,
            card_id: card.map(|c| c.id),
            card_title: card.map(|c| c.title.clone()),
            list_id: list.map(|l| l.id),
            list_title: list.map(|l| l.title.clone()),
        };
        hub.add(NotificationDraft::board_activity(activity, details));
    }
}
