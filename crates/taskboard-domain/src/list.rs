use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::BoardId;
use crate::card::Card;
use crate::position::Positioned;

pub type ListId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub id: ListId,
    pub board_id: BoardId,
    pub title: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewList {
    pub board_id: BoardId,
    pub title: String,
    /// Left empty, the store appends after the last list of the board.
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct ListPatch {
    pub title: Option<String>,
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPosition {
    pub id: ListId,
    pub position: i32,
}

impl List {
    pub fn new(board_id: BoardId, title: String, position: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            title,
            position,
            created_at: now,
            updated_at: now,
            cards: Vec::new(),
        }
    }

    pub fn update(&mut self, patch: ListPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        self.updated_at = Utc::now();
    }

    /// Copy the scalar fields of `other` while keeping this list's cards.
    ///
    /// Remote updates echo the list row without its children.
    pub fn merge_fields(&mut self, other: List) {
        self.board_id = other.board_id;
        self.title = other.title;
        self.position = other.position;
        self.created_at = other.created_at;
        self.updated_at = other.updated_at;
    }
}

impl Positioned for List {
    fn position(&self) -> i32 {
        self.position
    }

    fn set_position(&mut self, position: i32) {
        self.position = position;
    }
}
