use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use taskboard_app::{BoardController, BoardStore, DragController};
use taskboard_core::{PositionRepository, Repository, TaskboardError, TaskboardResult};
use taskboard_domain::*;
use taskboard_persistence::{Backend, MemoryStore};

/// Wraps the in-memory store with switchable failures and latency.
#[derive(Default)]
struct FlakyRemote {
    inner: MemoryStore,
    fail_positions: AtomicBool,
    position_calls: AtomicUsize,
    slow_board: Mutex<Option<BoardId>>,
}

impl FlakyRemote {
    fn positions_call(&self) -> TaskboardResult<()> {
        self.position_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_positions.load(Ordering::SeqCst) {
            return Err(TaskboardError::Remote(
                "Failed to update positions: connection reset".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Repository<Board, BoardId, NewBoard, BoardPatch> for FlakyRemote {
    async fn get_all(&self) -> TaskboardResult<Vec<Board>> {
        Repository::<Board, BoardId, NewBoard, BoardPatch>::get_all(&self.inner).await
    }

    async fn get_by_id(&self, id: BoardId) -> TaskboardResult<Option<Board>> {
        let slow = *self.slow_board.lock() == Some(id);
        if slow {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        Repository::<Board, BoardId, NewBoard, BoardPatch>::get_by_id(&self.inner, id).await
    }

    async fn create(&self, data: NewBoard) -> TaskboardResult<Board> {
        Repository::<Board, BoardId, NewBoard, BoardPatch>::create(&self.inner, data).await
    }

    async fn update(&self, id: BoardId, patch: BoardPatch) -> TaskboardResult<Board> {
        Repository::<Board, BoardId, NewBoard, BoardPatch>::update(&self.inner, id, patch).await
    }

    async fn delete(&self, id: BoardId) -> TaskboardResult<()> {
        Repository::<Board, BoardId, NewBoard, BoardPatch>::delete(&self.inner, id).await
    }
}

#[async_trait]
impl Repository<List, ListId, NewList, ListPatch> for FlakyRemote {
    async fn get_all(&self) -> TaskboardResult<Vec<List>> {
        Repository::<List, ListId, NewList, ListPatch>::get_all(&self.inner).await
    }

    async fn get_by_id(&self, id: ListId) -> TaskboardResult<Option<List>> {
        Repository::<List, ListId, NewList, ListPatch>::get_by_id(&self.inner, id).await
    }

    async fn create(&self, data: NewList) -> TaskboardResult<List> {
        Repository::<List, ListId, NewList, ListPatch>::create(&self.inner, data).await
    }

    async fn update(&self, id: ListId, patch: ListPatch) -> TaskboardResult<List> {
        Repository::<List, ListId, NewList, ListPatch>::update(&self.inner, id, patch).await
    }

    async fn delete(&self, id: ListId) -> TaskboardResult<()> {
        Repository::<List, ListId, NewList, ListPatch>::delete(&self.inner, id).await
    }
}

#[async_trait]
impl PositionRepository<ListPosition> for FlakyRemote {
    async fn update_positions(&self, updates: Vec<ListPosition>) -> TaskboardResult<()> {
        self.positions_call()?;
        PositionRepository::<ListPosition>::update_positions(&self.inner, updates).await
    }
}

#[async_trait]
impl Repository<Card, CardId, NewCard, CardPatch> for FlakyRemote {
    async fn get_all(&self) -> TaskboardResult<Vec<Card>> {
        Repository::<Card, CardId, NewCard, CardPatch>::get_all(&self.inner).await
    }

    async fn get_by_id(&self, id: CardId) -> TaskboardResult<Option<Card>> {
        Repository::<Card, CardId, NewCard, CardPatch>::get_by_id(&self.inner, id).await
    }

    async fn create(&self, data: NewCard) -> TaskboardResult<Card> {
        Repository::<Card, CardId, NewCard, CardPatch>::create(&self.inner, data).await
    }

    async fn update(&self, id: CardId, patch: CardPatch) -> TaskboardResult<Card> {
        Repository::<Card, CardId, NewCard, CardPatch>::update(&self.inner, id, patch).await
    }

    async fn delete(&self, id: CardId) -> TaskboardResult<()> {
        Repository::<Card, CardId, NewCard, CardPatch>::delete(&self.inner, id).await
    }
}

#[async_trait]
impl PositionRepository<CardPosition> for FlakyRemote {
    async fn update_positions(&self, updates: Vec<CardPosition>) -> TaskboardResult<()> {
        self.positions_call()?;
        PositionRepository::<CardPosition>::update_positions(&self.inner, updates).await
    }
}

struct Harness {
    remote: Arc<FlakyRemote>,
    controller: BoardController,
    board: Board,
    todo: List,
    doing: List,
    a: Card,
    b: Card,
}

/// "Sprint 1": To Do [A, B], Doing [].
async fn harness() -> Harness {
    let remote = Arc::new(FlakyRemote::default());
    let controller = BoardController::new(
        Backend::from_store(remote.clone()),
        Arc::new(BoardStore::new()),
    );
    let board = controller.create_board("Sprint 1", None).await.unwrap();
    controller.load_board(board.id).await.unwrap();
    let todo = controller.create_list(board.id, "To Do").await.unwrap();
    let doing = controller.create_list(board.id, "Doing").await.unwrap();
    let a = controller.create_card(todo.id, "A", None).await.unwrap();
    let b = controller.create_card(todo.id, "B", None).await.unwrap();
    Harness {
        remote,
        controller,
        board,
        todo,
        doing,
        a,
        b,
    }
}

fn card_drag(card: &Card, from: &List, from_index: usize, to: &List, to_index: usize) -> DragEnd {
    DragEnd {
        draggable_id: card.id.to_string(),
        kind: DragKind::Card,
        source: DragLocation {
            container_id: from.id.to_string(),
            index: from_index,
        },
        destination: Some(DragLocation {
            container_id: to.id.to_string(),
            index: to_index,
        }),
    }
}

#[tokio::test]
async fn test_failed_reorder_keeps_local_move_and_marks_unsynced() {
    let h = harness().await;
    h.remote.fail_positions.store(true, Ordering::SeqCst);

    let result = h.controller.move_card(h.a.id, h.todo.id, h.doing.id, 0).await;
    assert!(matches!(result, Err(TaskboardError::Remote(_))));

    let state = h.controller.store().snapshot();
    let board = state.current_board().unwrap();
    assert_eq!(board.list(h.doing.id).unwrap().cards[0].id, h.a.id);
    assert_eq!(
        state.error(),
        Some("Failed to update positions: connection reset")
    );
    assert!(state.is_unsynced(h.a.id));
    assert!(state.is_unsynced(h.b.id));

    // The remote copy still has the old layout.
    let remote = Repository::<Board, BoardId, NewBoard, BoardPatch>::get_by_id(
        h.remote.as_ref(),
        h.board.id,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(remote.list(h.todo.id).unwrap().cards.len(), 2);

    // A later successful persist of the same cards clears the markers.
    h.remote.fail_positions.store(false, Ordering::SeqCst);
    h.controller
        .move_card(h.b.id, h.todo.id, h.doing.id, 1)
        .await
        .unwrap();
    let state = h.controller.store().snapshot();
    assert!(!state.is_unsynced(h.a.id));
    assert!(!state.is_unsynced(h.b.id));
    assert!(state.error().is_none());
}

#[tokio::test]
async fn test_failed_list_reorder_marks_every_list() {
    let h = harness().await;
    h.remote.fail_positions.store(true, Ordering::SeqCst);

    assert!(h.controller.move_list(h.doing.id, 0).await.is_err());
    let state = h.controller.store().snapshot();
    assert_eq!(state.current_board().unwrap().lists[0].id, h.doing.id);
    assert!(state.is_unsynced(h.todo.id));
    assert!(state.is_unsynced(h.doing.id));
}

#[tokio::test]
async fn test_noop_drags_make_no_remote_call() {
    let h = harness().await;
    let drags = DragController::new(&h.controller, "list-");
    let before = h.controller.store().snapshot();

    let mut outside = card_drag(&h.a, &h.todo, 0, &h.doing, 0);
    outside.destination = None;
    let in_place = card_drag(&h.a, &h.todo, 0, &h.todo, 0);

    for drag in [outside, in_place] {
        let plan = drags.handle_drag_end(&drag).await.unwrap();
        assert_eq!(plan, DropPlan::Ignore);
    }

    assert_eq!(h.remote.position_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.controller.store().snapshot(), before);
}

#[tokio::test]
async fn test_card_drag_scenario() {
    let h = harness().await;
    let drags = DragController::new(&h.controller, "list-");

    drags
        .handle_drag_end(&card_drag(&h.a, &h.todo, 0, &h.doing, 0))
        .await
        .unwrap();

    let state = h.controller.store().snapshot();
    let board = state.current_board().unwrap();
    let todo: Vec<(CardId, i32)> = board
        .list(h.todo.id)
        .unwrap()
        .cards
        .iter()
        .map(|c| (c.id, c.position))
        .collect();
    let doing: Vec<(CardId, i32)> = board
        .list(h.doing.id)
        .unwrap()
        .cards
        .iter()
        .map(|c| (c.id, c.position))
        .collect();
    assert_eq!(todo, vec![(h.b.id, 1)]);
    assert_eq!(doing, vec![(h.a.id, 1)]);
    assert_eq!(h.remote.position_calls.load(Ordering::SeqCst), 1);

    let remote_card = Repository::<Card, CardId, NewCard, CardPatch>::get_by_id(
        h.remote.as_ref(),
        h.a.id,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(remote_card.list_id, h.doing.id);
}

#[tokio::test]
async fn test_list_drag_strips_prefix() {
    let h = harness().await;
    let drags = DragController::new(&h.controller, "list-");
    let drag = DragEnd {
        draggable_id: format!("list-{}", h.doing.id),
        kind: DragKind::List,
        source: DragLocation {
            container_id: h.board.id.to_string(),
            index: 1,
        },
        destination: Some(DragLocation {
            container_id: h.board.id.to_string(),
            index: 0,
        }),
    };

    drags.handle_drag_end(&drag).await.unwrap();
    let lists = h.controller.store().snapshot().current_board().unwrap().lists.clone();
    assert_eq!(lists[0].id, h.doing.id);
    assert_eq!(lists[0].position, 1);
    assert_eq!(lists[1].position, 2);
}

#[tokio::test]
async fn test_malformed_drag_sets_error() {
    let h = harness().await;
    let drags = DragController::new(&h.controller, "list-");
    let before = h.controller.store().snapshot().current_board().cloned();

    let mut drag = card_drag(&h.a, &h.todo, 0, &h.doing, 0);
    drag.draggable_id = "card-without-uuid".to_string();

    assert!(drags.handle_drag_end(&drag).await.is_err());
    let state = h.controller.store().snapshot();
    assert!(state.error().unwrap().contains("invalid card id"));
    assert_eq!(state.current_board().cloned(), before);
}

#[tokio::test]
async fn test_stale_board_load_is_discarded() {
    let h = harness().await;
    let other = h.controller.create_board("Sprint 2", None).await.unwrap();
    *h.remote.slow_board.lock() = Some(h.board.id);

    let (slow, fast) = tokio::join!(
        h.controller.load_board(h.board.id),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            h.controller.load_board(other.id).await
        }
    );

    assert!(slow.unwrap().is_none());
    assert_eq!(fast.unwrap().map(|b| b.id), Some(other.id));
    let state = h.controller.store().snapshot();
    assert_eq!(state.current_board_id(), Some(other.id));
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_delete_list_cascades_locally_and_remotely() {
    let h = harness().await;
    h.controller.delete_list(h.todo.id).await.unwrap();

    let state = h.controller.store().snapshot();
    let board = state.current_board().unwrap();
    assert_eq!(board.lists.len(), 1);
    assert_eq!(board.lists[0].position, 1);
    assert!(Repository::<Card, CardId, NewCard, CardPatch>::get_all(h.remote.as_ref())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_move_from_wrong_source_list_is_rejected() {
    let h = harness().await;
    let c = h.controller.create_card(h.doing.id, "C", None).await.unwrap();
    let before = h.controller.store().snapshot().current_board().cloned();

    let result = h.controller.move_card(c.id, h.todo.id, h.doing.id, 0).await;

    assert!(matches!(result, Err(TaskboardError::NotFound(_))));
    assert_eq!(h.remote.position_calls.load(Ordering::SeqCst), 0);
    let state = h.controller.store().snapshot();
    assert_eq!(state.current_board().cloned(), before);
    assert!(state.error().is_some());
}
