//! Work status step definitions.

use std::fmt;
use std::sync::Arc;

use cucumber::{given, then, when, World};
use decorhub::test_utils::{assigned_payment, signed_in, MockBackend, RecordingNotifier};
use decorhub::work_status::ProjectBoard;
use decorhub::DashboardError;
use decorhub_client::{Role, WorkStatus};

use super::split_call;

/// Test context for work status scenarios.
#[derive(World)]
#[world(init = Self::new)]
pub struct ProjectWorld {
    backend: Arc<MockBackend>,
    board: Option<ProjectBoard>,
    error: Option<DashboardError>,
}

impl fmt::Debug for ProjectWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectWorld")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl ProjectWorld {
    fn new() -> Self {
        Self {
            backend: Arc::new(MockBackend::new()),
            board: None,
            error: None,
        }
    }

    fn board(&self) -> &ProjectBoard {
        self.board.as_ref().expect("decorator not signed in")
    }
}

// --- Given steps ---

#[given(expr = "a signed-in decorator {string}")]
async fn given_signed_in_decorator(world: &mut ProjectWorld, email: String) {
    let session = signed_in(&world.backend, "Decorator", &email, Role::Decorator).await;
    world.board = Some(ProjectBoard::new(
        world.backend.clone(),
        session,
        Arc::new(RecordingNotifier::default()),
    ));
}

#[given(expr = "a project {string} assigned to {string} with status {string}")]
async fn given_project(world: &mut ProjectWorld, id: String, email: String, status: String) {
    let status: WorkStatus = status.parse().expect("valid work status");
    world.backend.add_payment(assigned_payment(&id, &email, status)).await;
    world.board().load().await.expect("projects should load");
}

#[given(expr = "the backend fails {string}")]
async fn given_backend_fails(world: &mut ProjectWorld, prefix: String) {
    world.backend.set_fail(&prefix, true).await;
}

// --- When steps ---

#[when(expr = "the decorator sets project {string} to {string}")]
async fn when_set_status(world: &mut ProjectWorld, id: String, status: String) {
    let status: WorkStatus = status.parse().expect("valid work status");
    let result = world.board().update_status(&id, status).await;
    if let Err(e) = result {
        world.error = Some(e);
    }
}

#[when(expr = "the decorator reverts project {string}")]
async fn when_revert(world: &mut ProjectWorld, id: String) {
    let result = world.board().revert(&id).await;
    if let Err(e) = result {
        world.error = Some(e);
    }
}

// --- Then steps ---

#[then(expr = "the backend received {string}")]
async fn then_backend_received(world: &mut ProjectWorld, call: String) {
    let (method, path) = split_call(&call);
    assert_eq!(world.backend.count_requests(method, path).await, 1);
}

#[then(expr = "project {string} shows status {string}")]
async fn then_shows_status(world: &mut ProjectWorld, id: String, status: String) {
    let expected: WorkStatus = status.parse().expect("valid work status");
    let project = world.board().project(&id).await.expect("project missing");
    assert_eq!(project.work_status(), expected);
}

#[then("the update is reported as failed")]
async fn then_update_failed(world: &mut ProjectWorld) {
    assert!(matches!(world.error, Some(DashboardError::Client(_))));
}

#[then("the update is rejected")]
async fn then_update_rejected(world: &mut ProjectWorld) {
    assert!(matches!(world.error, Some(DashboardError::Rejected(_))));
}
