//! Decorator assignment step definitions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cucumber::{given, then, when, World};
use decorhub::assignment::AssignmentBoard;
use decorhub::test_utils::{paid_payment, MockBackend, RecordingNotifier};
use decorhub::DashboardError;
use decorhub_client::{DecoratorRef, Role};

use super::split_call;

/// Test context for assignment scenarios.
#[derive(World)]
#[world(init = Self::new)]
pub struct AssignmentWorld {
    backend: Arc<MockBackend>,
    board: AssignmentBoard,
    decorator_ids: HashMap<String, String>,
    error: Option<DashboardError>,
}

impl fmt::Debug for AssignmentWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssignmentWorld")
            .field("decorator_ids", &self.decorator_ids)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl AssignmentWorld {
    fn new() -> Self {
        let backend = Arc::new(MockBackend::new());
        let board = AssignmentBoard::new(
            backend.clone(),
            Arc::new(RecordingNotifier::default()),
            Duration::from_millis(3000),
        );
        Self {
            backend,
            board,
            decorator_ids: HashMap::new(),
            error: None,
        }
    }
}

// --- Given steps ---

#[given(expr = "a paid payment {string}")]
async fn given_paid_payment(world: &mut AssignmentWorld, id: String) {
    world.backend.add_payment(paid_payment(&id)).await;
}

#[given(expr = "a decorator {string} with email {string}")]
async fn given_decorator(world: &mut AssignmentWorld, name: String, email: String) {
    let id = world.backend.add_user(&name, &email, Role::Decorator).await;
    world.decorator_ids.insert(name, id);
}

#[given(expr = "the backend fails {string}")]
async fn given_backend_fails(world: &mut AssignmentWorld, prefix: String) {
    world.backend.set_fail(&prefix, true).await;
}

// --- When steps ---

#[when(expr = "the admin assigns {string} to payment {string}")]
async fn when_admin_assigns(world: &mut AssignmentWorld, name: String, payment_id: String) {
    world.board.load().await.expect("board should load");
    let decorator_id = world.decorator_ids.get(&name).expect("unknown decorator").clone();
    if let Err(e) = world.board.assign(&payment_id, &decorator_id).await {
        world.error = Some(e);
    }
}

// --- Then steps ---

#[then(expr = "the backend received {string}")]
async fn then_backend_received(world: &mut AssignmentWorld, call: String) {
    let (method, path) = split_call(&call);
    assert_eq!(world.backend.count_requests(method, path).await, 1);
}

#[then(expr = "payment {string} is assigned to {string} at {string}")]
async fn then_assigned(world: &mut AssignmentWorld, id: String, name: String, email: String) {
    let expected = DecoratorRef { name, email };
    assert_eq!(world.board.assigned(&id).await, Some(expected.clone()));
    let stored = world.backend.payment(&id).await.expect("payment missing");
    assert_eq!(stored.decorator, Some(expected));
}

#[then(expr = "payment {string} is unassigned")]
async fn then_unassigned(world: &mut AssignmentWorld, id: String) {
    assert!(world.error.is_some());
    assert_eq!(world.board.assigned(&id).await, None);
    assert!(world.board.unassigned().await.iter().any(|p| p.id == id));
    let stored = world.backend.payment(&id).await.expect("payment missing");
    assert!(stored.decorator.is_none());
}

#[then("there are no unassigned payments")]
async fn then_none_unassigned(world: &mut AssignmentWorld) {
    assert!(world.board.unassigned().await.is_empty());
}

#[then(expr = "the success indicator for {string} is showing")]
async fn then_indicator_showing(world: &mut AssignmentWorld, id: String) {
    assert!(world.board.success_visible(&id).await);
}

#[then(expr = "the success indicator for {string} is not showing")]
async fn then_indicator_hidden(world: &mut AssignmentWorld, id: String) {
    assert!(!world.board.success_visible(&id).await);
}
