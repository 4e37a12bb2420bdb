//! Drag-and-drop events and the reorder they translate to.

use serde::{Deserialize, Serialize};
use taskboard_core::{TaskboardError, TaskboardResult};
use uuid::Uuid;

use crate::card::CardId;
use crate::list::ListId;
use crate::state::BoardAction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragKind {
    Card,
    List,
}

/// Where a draggable was picked up or dropped: the droppable container and
/// the index inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragLocation {
    pub container_id: String,
    pub index: usize,
}

/// A completed drag gesture as reported by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragEnd {
    pub draggable_id: String,
    #[serde(rename = "type")]
    pub kind: DragKind,
    pub source: DragLocation,
    #[serde(default)]
    pub destination: Option<DragLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPlan {
    /// Dropped outside any container, or back where it started.
    Ignore,
    MoveCard {
        card_id: CardId,
        source_list_id: ListId,
        dest_list_id: ListId,
        index: usize,
    },
    MoveList {
        list_id: ListId,
        index: usize,
    },
}

impl DragEnd {
    /// Decide what a drop means.
    ///
    /// List draggables carry `list_prefix` in front of the list id; the
    /// prefix is optional so a bare id is accepted too.
    pub fn plan(&self, list_prefix: &str) -> TaskboardResult<DropPlan> {
        let Some(destination) = &self.destination else {
            return Ok(DropPlan::Ignore);
        };
        if destination == &self.source {
            return Ok(DropPlan::Ignore);
        }

        match self.kind {
            DragKind::Card => Ok(DropPlan::MoveCard {
                card_id: parse_id("card", &self.draggable_id)?,
                source_list_id: parse_id("list", &self.source.container_id)?,
                dest_list_id: parse_id("list", &destination.container_id)?,
                index: destination.index,
            }),
            DragKind::List => {
                let raw = self
                    .draggable_id
                    .strip_prefix(list_prefix)
                    .unwrap_or(&self.draggable_id);
                Ok(DropPlan::MoveList {
                    list_id: parse_id("list", raw)?,
                    index: destination.index,
                })
            }
        }
    }
}

impl DropPlan {
    pub fn action(&self) -> Option<BoardAction> {
        match *self {
            DropPlan::Ignore => None,
            DropPlan::MoveCard {
                card_id,
                source_list_id,
                dest_list_id,
                index,
            } => Some(BoardAction::MoveCard {
                card_id,
                source_list_id,
                dest_list_id,
                new_position: index,
            }),
            DropPlan::MoveList { list_id, index } => Some(BoardAction::MoveList {
                list_id,
                new_position: index,
            }),
        }
    }
}

fn parse_id(what: &str, raw: &str) -> TaskboardResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| TaskboardError::Validation(format!("invalid {} id '{}': {}", what, raw, e)))
}
