use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskboard_core::{PositionRepository, Repository};
use taskboard_domain::{
    Board, BoardId, BoardPatch, Card, CardId, CardPatch, CardPosition, List, ListId, ListPatch,
    ListPosition, NewBoard, NewCard, NewList,
};
use uuid::Uuid;

/// Remote board table. `get_all` and `get_by_id` return boards with their
/// lists and cards nested.
pub trait BoardRepository: Repository<Board, BoardId, NewBoard, BoardPatch> {}

impl<T> BoardRepository for T where T: Repository<Board, BoardId, NewBoard, BoardPatch> {}

pub trait ListRepository:
    Repository<List, ListId, NewList, ListPatch> + PositionRepository<ListPosition>
{
}

impl<T> ListRepository for T where
    T: Repository<List, ListId, NewList, ListPatch> + PositionRepository<ListPosition>
{
}

pub trait CardRepository:
    Repository<Card, CardId, NewCard, CardPatch> + PositionRepository<CardPosition>
{
}

impl<T> CardRepository for T where
    T: Repository<Card, CardId, NewCard, CardPatch> + PositionRepository<CardPosition>
{
}

/// The three tables the board controller talks to.
#[derive(Clone)]
pub struct Backend {
    pub boards: Arc<dyn BoardRepository>,
    pub lists: Arc<dyn ListRepository>,
    pub cards: Arc<dyn CardRepository>,
}

impl Backend {
    /// Serve all three tables from one store.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: BoardRepository + ListRepository + CardRepository + 'static,
    {
        Self {
            boards: store.clone(),
            lists: store.clone(),
            cards: store,
        }
    }
}

/// Metadata written next to the data in a saved file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceMetadata {
    pub format_version: u32,
    /// Process that performed the save.
    pub instance_id: Uuid,
    pub saved_at: DateTime<Utc>,
}

impl PersistenceMetadata {
    pub fn new(format_version: u32, instance_id: Uuid) -> Self {
        Self {
            format_version,
            instance_id,
            saved_at: Utc::now(),
        }
    }
}
