//! Board state reducer.
//!
//! All boards live in one map keyed by id. The board selector list and the
//! open board are both views over that map, so an edit made through the open
//! board is visible in the selector without a second update.
//!
//! `apply` is a pure data transform: it never fails, performs no I/O and
//! never reads the clock. Actions that reference something missing leave the
//! state untouched.

use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use crate::board::{Board, BoardId};
use crate::card::{Card, CardId};
use crate::list::{List, ListId};
use crate::position::{reinsert, renumber, sort_by_position};

#[derive(Debug, Clone, PartialEq)]
pub enum BoardAction {
    SetLoading(bool),
    SetError(Option<String>),
    SetBoards(Vec<Board>),
    SetCurrentBoard(Option<Board>),
    AddBoard(Board),
    UpdateBoard(Board),
    DeleteBoard(BoardId),
    AddList(List),
    UpdateList(List),
    DeleteList(ListId),
    AddCard(Card),
    UpdateCard(Card),
    DeleteCard(CardId),
    MoveCard {
        card_id: CardId,
        source_list_id: ListId,
        dest_list_id: ListId,
        new_position: usize,
    },
    MoveList {
        list_id: ListId,
        new_position: usize,
    },
    /// Entities whose optimistic change failed to persist.
    MarkUnsynced(Vec<Uuid>),
    MarkSynced(Vec<Uuid>),
}

impl BoardAction {
    pub fn description(&self) -> String {
        match self {
            Self::SetLoading(loading) => format!("Set loading: {}", loading),
            Self::SetError(Some(message)) => format!("Set error: {}", message),
            Self::SetError(None) => "Clear error".to_string(),
            Self::SetBoards(boards) => format!("Set {} boards", boards.len()),
            Self::SetCurrentBoard(Some(board)) => format!("Open board {}", board.id),
            Self::SetCurrentBoard(None) => "Close board".to_string(),
            Self::AddBoard(board) => format!("Add board: '{}'", board.title),
            Self::UpdateBoard(board) => format!("Update board {}", board.id),
            Self::DeleteBoard(id) => format!("Delete board {}", id),
            Self::AddList(list) => format!("Add list: '{}'", list.title),
            Self::UpdateList(list) => format!("Update list {}", list.id),
            Self::DeleteList(id) => format!("Delete list {}", id),
            Self::AddCard(card) => format!("Add card: '{}'", card.title),
            Self::UpdateCard(card) => format!("Update card {}", card.id),
            Self::DeleteCard(id) => format!("Delete card {}", id),
            Self::MoveCard {
                card_id,
                dest_list_id,
                new_position,
                ..
            } => format!(
                "Move card {} to list {} at {}",
                card_id, dest_list_id, new_position
            ),
            Self::MoveList {
                list_id,
                new_position,
            } => format!("Move list {} to {}", list_id, new_position),
            Self::MarkUnsynced(ids) => format!("Mark {} unsynced", ids.len()),
            Self::MarkSynced(ids) => format!("Mark {} synced", ids.len()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    boards: HashMap<BoardId, Board>,
    /// Board selector order.
    order: Vec<BoardId>,
    current: Option<BoardId>,
    loading: bool,
    error: Option<String>,
    unsynced: BTreeSet<Uuid>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the state and return the one produced by `action`.
    pub fn reduce(mut self, action: BoardAction) -> Self {
        self.apply(action);
        self
    }

    pub fn apply(&mut self, action: BoardAction) {
        match action {
            BoardAction::SetLoading(loading) => self.loading = loading,
            BoardAction::SetError(error) => self.error = error,
            BoardAction::SetBoards(boards) => self.set_boards(boards),
            BoardAction::SetCurrentBoard(board) => self.set_current_board(board),
            BoardAction::AddBoard(mut board) => {
                board.sort_by_position();
                if !self.order.contains(&board.id) {
                    self.order.push(board.id);
                }
                self.boards.insert(board.id, board);
            }
            BoardAction::UpdateBoard(board) => {
                if let Some(existing) = self.boards.get_mut(&board.id) {
                    existing.title = board.title;
                    existing.description = board.description;
                    existing.created_at = board.created_at;
                    existing.updated_at = board.updated_at;
                }
            }
            BoardAction::DeleteBoard(id) => {
                self.boards.remove(&id);
                self.order.retain(|b| *b != id);
                if self.current == Some(id) {
                    self.current = None;
                }
            }
            BoardAction::AddList(list) => self.add_list(list),
            BoardAction::UpdateList(list) => {
                if let Some(board) = self.current_board_mut() {
                    if let Some(existing) = board.list_mut(list.id) {
                        existing.merge_fields(list);
                        sort_by_position(&mut board.lists);
                    }
                }
            }
            BoardAction::DeleteList(id) => {
                if let Some(board) = self.current_board_mut() {
                    let before = board.lists.len();
                    board.lists.retain(|l| l.id != id);
                    if board.lists.len() != before {
                        renumber(&mut board.lists);
                    }
                }
            }
            BoardAction::AddCard(card) => self.add_card(card),
            BoardAction::UpdateCard(card) => self.update_card(card),
            BoardAction::DeleteCard(id) => {
                if let Some(board) = self.current_board_mut() {
                    for list in &mut board.lists {
                        if let Some(index) = list.cards.iter().position(|c| c.id == id) {
                            list.cards.remove(index);
                            renumber(&mut list.cards);
                            break;
                        }
                    }
                }
            }
            BoardAction::MoveCard {
                card_id,
                source_list_id,
                dest_list_id,
                new_position,
            } => self.move_card(card_id, source_list_id, dest_list_id, new_position),
            BoardAction::MoveList {
                list_id,
                new_position,
            } => self.move_list(list_id, new_position),
            BoardAction::MarkUnsynced(ids) => self.unsynced.extend(ids),
            BoardAction::MarkSynced(ids) => {
                for id in ids {
                    self.unsynced.remove(&id);
                }
            }
        }
    }

    fn set_boards(&mut self, boards: Vec<Board>) {
        // An open board that is absent from the new selector list stays open.
        let detached_current = self
            .current
            .filter(|id| !boards.iter().any(|b| b.id == *id))
            .and_then(|id| self.boards.remove(&id));

        self.boards.clear();
        self.order.clear();
        for mut board in boards {
            board.sort_by_position();
            if !self.order.contains(&board.id) {
                self.order.push(board.id);
            }
            self.boards.insert(board.id, board);
        }
        if let Some(board) = detached_current {
            self.boards.insert(board.id, board);
        }
    }

    fn set_current_board(&mut self, board: Option<Board>) {
        if let Some(previous) = self.current.take() {
            let replaced = board.as_ref().is_some_and(|b| b.id == previous);
            if !replaced && !self.order.contains(&previous) {
                self.boards.remove(&previous);
            }
        }
        if let Some(mut board) = board {
            board.sort_by_position();
            self.current = Some(board.id);
            self.boards.insert(board.id, board);
        }
    }

    fn add_list(&mut self, list: List) {
        let Some(board) = self.current_board_mut() else {
            return;
        };
        if list.board_id != board.id {
            tracing::debug!(
                "Ignoring list {} for board {} (open board is {})",
                list.id,
                list.board_id,
                board.id
            );
            return;
        }
        match board.list_mut(list.id) {
            Some(existing) => existing.merge_fields(list),
            None => board.lists.push(list),
        }
        sort_by_position(&mut board.lists);
    }

    fn add_card(&mut self, card: Card) {
        let Some(board) = self.current_board_mut() else {
            return;
        };
        let Some(list) = board.list_mut(card.list_id) else {
            return;
        };
        match list.cards.iter_mut().find(|c| c.id == card.id) {
            Some(existing) => *existing = card,
            None => list.cards.push(card),
        }
        sort_by_position(&mut list.cards);
    }

    /// Replace a card where it currently lives.
    ///
    /// The caller may not know the owning list, so every list is scanned and
    /// the card keeps its current owner.
    fn update_card(&mut self, mut card: Card) {
        let Some(board) = self.current_board_mut() else {
            return;
        };
        for list in &mut board.lists {
            if let Some(existing) = list.cards.iter_mut().find(|c| c.id == card.id) {
                card.list_id = list.id;
                *existing = card;
                sort_by_position(&mut list.cards);
                return;
            }
        }
    }

    /// Cross-list or same-list card move.
    ///
    /// Aborts as a whole when the card is not in the source list or the
    /// destination list does not exist, so a card is never dropped or
    /// duplicated.
    fn move_card(
        &mut self,
        card_id: CardId,
        source_list_id: ListId,
        dest_list_id: ListId,
        new_position: usize,
    ) {
        let Some(board) = self.current_board_mut() else {
            return;
        };
        let Some(source_index) = board.lists.iter().position(|l| l.id == source_list_id) else {
            tracing::debug!("Move aborted: source list {} not found", source_list_id);
            return;
        };
        let Some(dest_index) = board.lists.iter().position(|l| l.id == dest_list_id) else {
            tracing::debug!("Move aborted: destination list {} not found", dest_list_id);
            return;
        };
        let Some(card_index) = board.lists[source_index]
            .cards
            .iter()
            .position(|c| c.id == card_id)
        else {
            tracing::debug!(
                "Move aborted: card {} not in list {}",
                card_id,
                source_list_id
            );
            return;
        };

        if source_index == dest_index {
            let cards = &mut board.lists[source_index].cards;
            reinsert(cards, card_index, new_position);
            renumber(cards);
            return;
        }

        let mut card = board.lists[source_index].cards.remove(card_index);
        card.list_id = dest_list_id;
        renumber(&mut board.lists[source_index].cards);

        let dest = &mut board.lists[dest_index].cards;
        let at = new_position.min(dest.len());
        dest.insert(at, card);
        renumber(dest);
    }

    fn move_list(&mut self, list_id: ListId, new_position: usize) {
        let Some(board) = self.current_board_mut() else {
            return;
        };
        let Some(index) = board.lists.iter().position(|l| l.id == list_id) else {
            return;
        };
        reinsert(&mut board.lists, index, new_position);
        renumber(&mut board.lists);
    }

    fn current_board_mut(&mut self) -> Option<&mut Board> {
        let id = self.current?;
        self.boards.get_mut(&id)
    }

    pub fn current_board(&self) -> Option<&Board> {
        self.current.and_then(|id| self.boards.get(&id))
    }

    pub fn current_board_id(&self) -> Option<BoardId> {
        self.current
    }

    /// Boards in selector order.
    pub fn boards(&self) -> Vec<&Board> {
        self.order
            .iter()
            .filter_map(|id| self.boards.get(id))
            .collect()
    }

    pub fn board(&self, id: BoardId) -> Option<&Board> {
        self.boards.get(&id)
    }

    /// Every card of the open board; what the reminder scheduler scans.
    pub fn current_cards(&self) -> Vec<&Card> {
        self.current_board()
            .map(|board| board.cards().collect())
            .unwrap_or_default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_unsynced(&self, id: Uuid) -> bool {
        self.unsynced.contains(&id)
    }

    pub fn unsynced(&self) -> impl Iterator<Item = &Uuid> {
        self.unsynced.iter()
    }
}
