use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use taskboard_core::{PositionRepository, Repository, TaskboardResult};
use taskboard_domain::{
    Board, BoardId, BoardPatch, Card, CardId, CardPatch, CardPosition, List, ListId, ListPatch,
    ListPosition, NewBoard, NewCard, NewList,
};
use tokio::sync::Mutex;

use crate::store::json_file_store::JsonFileStore;
use crate::store::tables::Tables;

/// Board, list and card tables held in memory, optionally mirrored to a JSON
/// file after every write.
///
/// A write is applied to a copy of the tables and only becomes visible once
/// the file (if any) was saved, so a failed save leaves the store unchanged.
pub struct MemoryStore {
    tables: Mutex<Tables>,
    file: Option<JsonFileStore>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_tables(Tables::default())
    }

    pub fn with_tables(tables: Tables) -> Self {
        Self {
            tables: Mutex::new(tables),
            file: None,
        }
    }

    /// Open a store backed by `path`, loading it if it exists.
    pub async fn open(path: impl AsRef<Path>) -> TaskboardResult<Self> {
        let file = JsonFileStore::new(path);
        let tables = file.load().await?;
        Ok(Self {
            tables: Mutex::new(tables),
            file: Some(file),
        })
    }

    pub fn file(&self) -> Option<&JsonFileStore> {
        self.file.as_ref()
    }

    pub async fn snapshot(&self) -> Tables {
        self.tables.lock().await.clone()
    }

    async fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        let guard = self.tables.lock().await;
        f(&guard)
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut Tables) -> TaskboardResult<R>,
    ) -> TaskboardResult<R> {
        let mut guard = self.tables.lock().await;
        let mut next = guard.clone();
        let result = f(&mut next)?;
        if let Some(file) = &self.file {
            file.save(&next).await?;
        }
        *guard = next;
        Ok(result)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository<Board, BoardId, NewBoard, BoardPatch> for MemoryStore {
    async fn get_all(&self) -> TaskboardResult<Vec<Board>> {
        Ok(self.read(Tables::board_trees).await)
    }

    async fn get_by_id(&self, id: BoardId) -> TaskboardResult<Option<Board>> {
        Ok(self.read(|t| t.board_tree(id)).await)
    }

    async fn create(&self, data: NewBoard) -> TaskboardResult<Board> {
        self.write(|t| Ok(t.insert_board(data, Utc::now()))).await
    }

    async fn update(&self, id: BoardId, patch: BoardPatch) -> TaskboardResult<Board> {
        self.write(|t| t.update_board(id, patch)).await
    }

    async fn delete(&self, id: BoardId) -> TaskboardResult<()> {
        self.write(|t| t.delete_board(id)).await
    }
}

#[async_trait]
impl Repository<List, ListId, NewList, ListPatch> for MemoryStore {
    async fn get_all(&self) -> TaskboardResult<Vec<List>> {
        Ok(self.read(Tables::lists_sorted).await)
    }

    async fn get_by_id(&self, id: ListId) -> TaskboardResult<Option<List>> {
        Ok(self.read(|t| t.list(id).cloned()).await)
    }

    async fn create(&self, data: NewList) -> TaskboardResult<List> {
        self.write(|t| t.insert_list(data, Utc::now())).await
    }

    async fn update(&self, id: ListId, patch: ListPatch) -> TaskboardResult<List> {
        self.write(|t| t.update_list(id, patch)).await
    }

    async fn delete(&self, id: ListId) -> TaskboardResult<()> {
        self.write(|t| t.delete_list(id)).await
    }
}

#[async_trait]
impl PositionRepository<ListPosition> for MemoryStore {
    async fn update_positions(&self, updates: Vec<ListPosition>) -> TaskboardResult<()> {
        self.write(|t| t.set_list_positions(&updates)).await
    }
}

#[async_trait]
impl Repository<Card, CardId, NewCard, CardPatch> for MemoryStore {
    async fn get_all(&self) -> TaskboardResult<Vec<Card>> {
        Ok(self.read(Tables::cards_sorted).await)
    }

    async fn get_by_id(&self, id: CardId) -> TaskboardResult<Option<Card>> {
        Ok(self.read(|t| t.card(id).cloned()).await)
    }

    async fn create(&self, data: NewCard) -> TaskboardResult<Card> {
        self.write(|t| t.insert_card(data, Utc::now())).await
    }

    async fn update(&self, id: CardId, patch: CardPatch) -> TaskboardResult<Card> {
        self.write(|t| t.update_card(id, patch)).await
    }

    async fn delete(&self, id: CardId) -> TaskboardResult<()> {
        self.write(|t| t.delete_card(id)).await
    }
}

#[async_trait]
impl PositionRepository<CardPosition> for MemoryStore {
    async fn update_positions(&self, updates: Vec<CardPosition>) -> TaskboardResult<()> {
        self.write(|t| t.set_card_positions(&updates)).await
    }
}
