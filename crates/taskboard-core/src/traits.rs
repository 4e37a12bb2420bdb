use async_trait::async_trait;

use crate::TaskboardResult;

/// Asynchronous CRUD contract for one remote entity collection.
///
/// `C` is the creation payload and `U` the partial update applied by
/// `update`. Lookups that miss return `Ok(None)` rather than an error.
#[async_trait]
pub trait Repository<T, Id, C, U>: Send + Sync
where
    T: Send + 'static,
    Id: Send + 'static,
    C: Send + 'static,
    U: Send + 'static,
{
    async fn get_all(&self) -> TaskboardResult<Vec<T>>;
    async fn get_by_id(&self, id: Id) -> TaskboardResult<Option<T>>;
    async fn create(&self, data: C) -> TaskboardResult<T>;
    async fn update(&self, id: Id, patch: U) -> TaskboardResult<T>;
    async fn delete(&self, id: Id) -> TaskboardResult<()>;
}

/// Batch persistence of renumbered positions produced by a single reorder.
#[async_trait]
pub trait PositionRepository<P>: Send + Sync
where
    P: Send + 'static,
{
    async fn update_positions(&self, updates: Vec<P>) -> TaskboardResult<()>;
}
