use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::{Card, CardId, CardPosition};
use crate::field_update::FieldUpdate;
use crate::list::{List, ListId, ListPosition};
use crate::position::sort_by_position;

pub type BoardId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub lists: Vec<List>,
}

/// Payload for creating a board remotely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBoard {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct BoardPatch {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
}

impl Board {
    pub fn new(title: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            created_at: now,
            updated_at: now,
            lists: Vec::new(),
        }
    }

    pub fn update(&mut self, patch: BoardPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        patch.description.apply_to(&mut self.description);
        self.updated_at = Utc::now();
    }

    /// Order lists and their cards by stored position.
    ///
    /// The remote store returns children in no particular order; drag indices
    /// refer to the displayed (position) order, so this runs whenever a board
    /// enters local state.
    pub fn sort_by_position(&mut self) {
        sort_by_position(&mut self.lists);
        for list in &mut self.lists {
            sort_by_position(&mut list.cards);
        }
    }

    pub fn list(&self, id: ListId) -> Option<&List> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn list_mut(&mut self, id: ListId) -> Option<&mut List> {
        self.lists.iter_mut().find(|l| l.id == id)
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards().find(|c| c.id == id)
    }

    /// Every card on the board, list by list.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.lists.iter().flat_map(|l| l.cards.iter())
    }

    /// List holding the given card, if any.
    pub fn list_of_card(&self, card_id: CardId) -> Option<&List> {
        self.lists
            .iter()
            .find(|l| l.cards.iter().any(|c| c.id == card_id))
    }

    pub fn list_positions(&self) -> Vec<ListPosition> {
        self.lists
            .iter()
            .map(|l| ListPosition {
                id: l.id,
                position: l.position,
            })
            .collect()
    }

    /// Position batch for the cards of the given lists, each carrying its owner.
    pub fn card_positions(&self, list_ids: &[ListId]) -> Vec<CardPosition> {
        self.lists
            .iter()
            .filter(|l| list_ids.contains(&l.id))
            .flat_map(|l| {
                l.cards.iter().map(|c| CardPosition {
                    id: c.id,
                    position: c.position,
                    list_id: Some(l.id),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_patch() {
        let mut board = Board::new("Sprint 1".to_string(), Some("old".to_string()));
        board.update(BoardPatch {
            title: Some("Sprint 2".to_string()),
            description: FieldUpdate::Clear,
        });
        assert_eq!(board.title, "Sprint 2");
        assert_eq!(board.description, None);
    }

    #[test]
    fn test_sort_by_position_orders_children() {
        let mut board = Board::new("B".to_string(), None);
        let mut done = List::new(board.id, "Done".to_string(), 3);
        let todo = List::new(board.id, "To Do".to_string(), 1);
        done.cards.push(Card::new(done.id, "z".to_string(), 2));
        done.cards.push(Card::new(done.id, "y".to_string(), 1));
        board.lists = vec![done, todo];

        board.sort_by_position();

        assert_eq!(board.lists[0].title, "To Do");
        assert_eq!(board.lists[1].cards[0].title, "y");
    }

    #[test]
    fn test_deserializes_without_lists() {
        let json = r#"{
            "id": "5b0e6c3c-4f4e-4d8c-9b0a-2f5f0b1a9c11",
            "title": "Remote",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        }"#;
        let board: Board = serde_json::from_str(json).unwrap();
        assert!(board.lists.is_empty());
        assert!(board.description.is_none());
    }
}
