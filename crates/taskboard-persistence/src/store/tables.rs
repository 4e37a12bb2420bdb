//! Row storage shared by the in-memory and JSON-file backends.
//!
//! Boards and lists are kept as flat rows with empty child vectors; the
//! nested shape is rebuilt on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_core::{TaskboardError, TaskboardResult};
use taskboard_domain::position::{next_position, renumber, sort_by_position};
use taskboard_domain::{
    Board, BoardId, BoardPatch, Card, CardId, CardPatch, CardPosition, List, ListId, ListPatch,
    ListPosition, NewBoard, NewCard, NewList,
};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default)]
    pub boards: Vec<Board>,
    #[serde(default)]
    pub lists: Vec<List>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Tables {
    /// Boards oldest first, each with its lists and cards in position order.
    pub fn board_trees(&self) -> Vec<Board> {
        let mut boards: Vec<Board> = self.boards.iter().map(|b| self.assemble(b)).collect();
        boards.sort_by_key(|b| b.created_at);
        boards
    }

    pub fn board_tree(&self, id: BoardId) -> Option<Board> {
        self.boards.iter().find(|b| b.id == id).map(|b| self.assemble(b))
    }

    fn assemble(&self, row: &Board) -> Board {
        let mut board = row.clone();
        board.lists = self
            .lists
            .iter()
            .filter(|l| l.board_id == row.id)
            .map(|l| {
                let mut list = l.clone();
                list.cards = self
                    .cards
                    .iter()
                    .filter(|c| c.list_id == l.id)
                    .cloned()
                    .collect();
                list
            })
            .collect();
        board.sort_by_position();
        board
    }

    pub fn lists_sorted(&self) -> Vec<List> {
        let mut lists = self.lists.clone();
        lists.sort_by_key(|l| (l.board_id, l.position));
        lists
    }

    pub fn cards_sorted(&self) -> Vec<Card> {
        let mut cards = self.cards.clone();
        cards.sort_by_key(|c| (c.list_id, c.position));
        cards
    }

    pub fn list(&self, id: ListId) -> Option<&List> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn insert_board(&mut self, data: NewBoard, now: DateTime<Utc>) -> Board {
        let board = Board {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            created_at: now,
            updated_at: now,
            lists: Vec::new(),
        };
        self.boards.push(board.clone());
        board
    }

    pub fn update_board(&mut self, id: BoardId, patch: BoardPatch) -> TaskboardResult<Board> {
        let row = self
            .boards
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| not_found("board", id))?;
        row.update(patch);
        Ok(row.clone())
    }

    /// Removes the board together with its lists and their cards.
    pub fn delete_board(&mut self, id: BoardId) -> TaskboardResult<()> {
        let before = self.boards.len();
        self.boards.retain(|b| b.id != id);
        if self.boards.len() == before {
            return Err(not_found("board", id));
        }
        let list_ids: Vec<ListId> = self
            .lists
            .iter()
            .filter(|l| l.board_id == id)
            .map(|l| l.id)
            .collect();
        self.lists.retain(|l| l.board_id != id);
        self.cards.retain(|c| !list_ids.contains(&c.list_id));
        Ok(())
    }

    pub fn insert_list(&mut self, data: NewList, now: DateTime<Utc>) -> TaskboardResult<List> {
        if !self.boards.iter().any(|b| b.id == data.board_id) {
            return Err(not_found("board", data.board_id));
        }
        let position = data.position.unwrap_or_else(|| {
            next_position(self.lists.iter().filter(|l| l.board_id == data.board_id))
        });
        let list = List {
            id: Uuid::new_v4(),
            board_id: data.board_id,
            title: data.title,
            position,
            created_at: now,
            updated_at: now,
            cards: Vec::new(),
        };
        self.lists.push(list.clone());
        Ok(list)
    }

    pub fn update_list(&mut self, id: ListId, patch: ListPatch) -> TaskboardResult<List> {
        let row = self
            .lists
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| not_found("list", id))?;
        row.update(patch);
        Ok(row.clone())
    }

    /// Removes the list and its cards; the board's remaining lists close the gap.
    pub fn delete_list(&mut self, id: ListId) -> TaskboardResult<()> {
        let board_id = self.list(id).ok_or_else(|| not_found("list", id))?.board_id;
        self.lists.retain(|l| l.id != id);
        self.cards.retain(|c| c.list_id != id);
        self.renumber_lists(board_id);
        Ok(())
    }

    pub fn set_list_positions(&mut self, updates: &[ListPosition]) -> TaskboardResult<()> {
        if let Some(missing) = updates.iter().find(|u| self.list(u.id).is_none()) {
            return Err(not_found("list", missing.id));
        }
        let now = Utc::now();
        for update in updates {
            if let Some(row) = self.lists.iter_mut().find(|l| l.id == update.id) {
                row.position = update.position;
                row.updated_at = now;
            }
        }
        Ok(())
    }

    pub fn insert_card(&mut self, data: NewCard, now: DateTime<Utc>) -> TaskboardResult<Card> {
        if self.list(data.list_id).is_none() {
            return Err(not_found("list", data.list_id));
        }
        let position = data.position.unwrap_or_else(|| {
            next_position(self.cards.iter().filter(|c| c.list_id == data.list_id))
        });
        let card = Card {
            id: Uuid::new_v4(),
            list_id: data.list_id,
            title: data.title,
            description: data.description,
            position,
            created_at: now,
            updated_at: now,
            reminder_date: None,
            reminder_enabled: false,
        };
        self.cards.push(card.clone());
        Ok(card)
    }

    /// Edit a card's content. Placement only changes through position batches.
    pub fn update_card(&mut self, id: CardId, patch: CardPatch) -> TaskboardResult<Card> {
        let row = self
            .cards
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("card", id))?;
        row.update(patch)?;
        Ok(row.clone())
    }

    pub fn delete_card(&mut self, id: CardId) -> TaskboardResult<()> {
        let list_id = self.card(id).ok_or_else(|| not_found("card", id))?.list_id;
        self.cards.retain(|c| c.id != id);
        self.renumber_cards(list_id);
        Ok(())
    }

    /// Applies a card position batch; entries with a `list_id` also move the
    /// card to that list. Nothing is written if any id is unknown.
    pub fn set_card_positions(&mut self, updates: &[CardPosition]) -> TaskboardResult<()> {
        for update in updates {
            if self.card(update.id).is_none() {
                return Err(not_found("card", update.id));
            }
            if let Some(list_id) = update.list_id {
                if self.list(list_id).is_none() {
                    return Err(not_found("list", list_id));
                }
            }
        }
        let now = Utc::now();
        for update in updates {
            if let Some(row) = self.cards.iter_mut().find(|c| c.id == update.id) {
                row.position = update.position;
                if let Some(list_id) = update.list_id {
                    row.list_id = list_id;
                }
                row.updated_at = now;
            }
        }
        Ok(())
    }

    fn renumber_lists(&mut self, board_id: BoardId) {
        let mut siblings: Vec<List> = self
            .lists
            .iter()
            .filter(|l| l.board_id == board_id)
            .cloned()
            .collect();
        sort_by_position(&mut siblings);
        renumber(&mut siblings);
        for sibling in siblings {
            if let Some(row) = self.lists.iter_mut().find(|l| l.id == sibling.id) {
                row.position = sibling.position;
            }
        }
    }

    fn renumber_cards(&mut self, list_id: ListId) {
        let mut siblings: Vec<Card> = self
            .cards
            .iter()
            .filter(|c| c.list_id == list_id)
            .cloned()
            .collect();
        sort_by_position(&mut siblings);
        renumber(&mut siblings);
        for sibling in siblings {
            if let Some(row) = self.cards.iter_mut().find(|c| c.id == sibling.id) {
                row.position = sibling.position;
            }
        }
    }
}

fn not_found(what: &str, id: Uuid) -> TaskboardError {
    TaskboardError::NotFound(format!("{} {}", what, id))
}
