//! Decorator-side work status tracking.
//!
//! A decorator sees the payments assigned to them ("projects") and moves
//! each through `pending → processing → completed`. Updates only move
//! forward; [`ProjectBoard::revert`] is the explicit one-step correction.

use std::sync::Arc;

use decorhub_client::{MarketplaceApi, Payment, WorkStatus, WorkStatusUpdate};
use tracing::{error, info, warn};

use crate::error::{errmsg, DashboardError, Result};
use crate::notify::{Notice, Notifier};
use crate::session::Session;
use crate::working_set::{InFlight, WorkingSet};

/// Which way a status change moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Revert,
}

/// The signed-in decorator's projects.
pub struct ProjectBoard {
    api: Arc<dyn MarketplaceApi>,
    session: Arc<Session>,
    notifier: Arc<dyn Notifier>,
    projects: WorkingSet<Payment>,
    in_flight: InFlight,
}

impl ProjectBoard {
    pub fn new(api: Arc<dyn MarketplaceApi>, session: Arc<Session>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            session,
            notifier,
            projects: WorkingSet::new(),
            in_flight: InFlight::default(),
        }
    }

    /// Load projects assigned to the signed-in decorator.
    ///
    /// Entries assigned to anyone else are dropped.
    pub async fn load(&self) -> Result<Vec<Payment>> {
        let email = self.session.email().await?;
        let payments = self.api.list_decorator_payments(&email).await.map_err(|e| {
            error!(email = %email, error = %e, "Failed to load projects");
            self.notifier.notify(Notice::error("Could not load your projects"));
            e
        })?;

        let (mine, foreign): (Vec<Payment>, Vec<Payment>) = payments
            .into_iter()
            .partition(|p| is_assigned_to(p, &email));
        for payment in &foreign {
            warn!(
                payment_id = %payment.id,
                decorator = ?payment.decorator.as_ref().map(|d| &d.email),
                session = %email,
                "Dropping project not assigned to this decorator"
            );
        }

        info!(email = %email, projects = mine.len(), "Projects loaded");
        self.projects.replace(mine.clone()).await;
        Ok(mine)
    }

    pub async fn projects(&self) -> Vec<Payment> {
        self.projects.all().await
    }

    pub async fn project(&self, id: &str) -> Option<Payment> {
        self.projects.get(id).await
    }

    /// Whether an update for this project is outstanding.
    pub fn is_updating(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    /// Move a project to a later status. Skipping a step is allowed.
    pub async fn update_status(&self, project_id: &str, status: WorkStatus) -> Result<WorkStatus> {
        self.apply(project_id, Direction::Forward, move |current| {
            if current == WorkStatus::Completed {
                Err(errmsg::ALREADY_COMPLETED)
            } else if current.is_forward_to(status) {
                Ok(status)
            } else {
                Err(errmsg::STATUS_NOT_FORWARD)
            }
        })
        .await
    }

    /// Move a project one step forward.
    pub async fn advance(&self, project_id: &str) -> Result<WorkStatus> {
        self.apply(project_id, Direction::Forward, |current| {
            current.next().ok_or(errmsg::ALREADY_COMPLETED)
        })
        .await
    }

    /// Move a project one step back to correct a mistaken update.
    pub async fn revert(&self, project_id: &str) -> Result<WorkStatus> {
        self.apply(project_id, Direction::Revert, |current| {
            current.previous().ok_or(errmsg::NOTHING_TO_REVERT)
        })
        .await
    }

    async fn apply<F>(&self, project_id: &str, direction: Direction, target: F) -> Result<WorkStatus>
    where
        F: FnOnce(WorkStatus) -> std::result::Result<WorkStatus, &'static str>,
    {
        let _guard = self.in_flight.acquire(project_id).map_err(|e| {
            warn!(project_id = %project_id, "Work status update already in flight");
            e
        })?;

        let email = self.session.email().await?;
        let project = self
            .projects
            .get(project_id)
            .await
            .ok_or_else(|| DashboardError::not_found("project", project_id))?;
        if !is_assigned_to(&project, &email) {
            warn!(project_id = %project_id, session = %email, "Project not assigned to this decorator");
            return Err(DashboardError::Rejected(errmsg::PROJECT_NOT_ASSIGNED.to_string()));
        }

        let current = project.work_status();
        let next = target(current).map_err(|msg| {
            warn!(project_id = %project_id, current = %current, ?direction, "Work status change rejected");
            self.notifier.notify(Notice::warning(msg));
            DashboardError::Rejected(msg.to_string())
        })?;

        let body = WorkStatusUpdate { work_status: next };
        match self.api.update_work_status(project_id, &body).await {
            Ok(()) => {
                self.projects
                    .edit(project_id, |p| p.work_status = Some(next))
                    .await;
                info!(project_id = %project_id, from = %current, to = %next, ?direction, "Work status updated");
                self.notifier
                    .notify(Notice::success(format!("Project marked {}", next)));
                Ok(next)
            }
            Err(e) => {
                error!(project_id = %project_id, to = %next, error = %e, "Work status update failed");
                self.notifier
                    .notify(Notice::error(format!("Could not update status: {}", e.message())));
                Err(e.into())
            }
        }
    }
}

fn is_assigned_to(payment: &Payment, email: &str) -> bool {
    payment.decorator.as_ref().is_some_and(|d| d.email == email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::notify::Level;
    use crate::test_utils::{assigned_payment, signed_in, MockBackend, RecordingNotifier};
    use decorhub_client::Role;

    const JANE: &str = "jane@x.com";

    async fn board(backend: &Arc<MockBackend>) -> (Arc<ProjectBoard>, Arc<RecordingNotifier>) {
        let session = signed_in(backend, "Jane", JANE, Role::Decorator).await;
        let notifier = Arc::new(RecordingNotifier::default());
        let board = Arc::new(ProjectBoard::new(backend.clone(), session, notifier.clone()));
        board.load().await.unwrap();
        (board, notifier)
    }

    #[tokio::test]
    async fn test_load_drops_foreign_projects() {
        let backend = Arc::new(MockBackend::new());
        backend.add_payment(assigned_payment("pr1", JANE, WorkStatus::Pending)).await;
        backend.add_payment(assigned_payment("pr2", "omar@x.com", WorkStatus::Pending)).await;
        backend.set_unfiltered_decorator_payments(true).await;

        let (board, _) = board(&backend).await;

        let ids: Vec<String> = board.projects().await.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["pr1"]);
    }

    #[tokio::test]
    async fn test_skip_forward_to_completed() {
        let backend = Arc::new(MockBackend::new());
        backend.add_payment(assigned_payment("pr1", JANE, WorkStatus::Pending)).await;
        let (board, _) = board(&backend).await;

        let status = board.update_status("pr1", WorkStatus::Completed).await.unwrap();

        assert_eq!(status, WorkStatus::Completed);
        assert_eq!(board.project("pr1").await.unwrap().work_status(), WorkStatus::Completed);
        assert_eq!(
            backend.payment("pr1").await.unwrap().work_status,
            Some(WorkStatus::Completed)
        );
        assert_eq!(backend.count_requests("PATCH", "/decorator-update/pr1").await, 1);
    }

    #[tokio::test]
    async fn test_failure_leaves_entry_unchanged() {
        let backend = Arc::new(MockBackend::new());
        backend.add_payment(assigned_payment("pr1", JANE, WorkStatus::Pending)).await;
        backend.set_fail("PATCH /decorator-update/", true).await;
        let (board, notifier) = board(&backend).await;

        let result = board.update_status("pr1", WorkStatus::Completed).await;

        assert!(matches!(result, Err(DashboardError::Client(_))));
        assert_eq!(board.project("pr1").await.unwrap().work_status(), WorkStatus::Pending);
        assert_eq!(notifier.last().unwrap().level, Level::Error);
        assert!(!board.is_updating("pr1"));
    }

    #[tokio::test]
    async fn test_backward_update_is_rejected() {
        let backend = Arc::new(MockBackend::new());
        backend.add_payment(assigned_payment("pr1", JANE, WorkStatus::Processing)).await;
        let (board, _) = board(&backend).await;

        for target in [WorkStatus::Pending, WorkStatus::Processing] {
            let err = board.update_status("pr1", target).await.unwrap_err();
            assert!(matches!(err, DashboardError::Rejected(_)), "{:?}", target);
        }
        assert_eq!(backend.count_requests("PATCH", "/decorator-update/").await, 0);
    }

    #[tokio::test]
    async fn test_completed_is_terminal_for_advance() {
        let backend = Arc::new(MockBackend::new());
        backend.add_payment(assigned_payment("pr1", JANE, WorkStatus::Completed)).await;
        let (board, _) = board(&backend).await;

        match board.advance("pr1").await {
            Err(DashboardError::Rejected(msg)) => assert_eq!(msg, errmsg::ALREADY_COMPLETED),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_advance_and_revert() {
        let backend = Arc::new(MockBackend::new());
        backend.add_payment(assigned_payment("pr1", JANE, WorkStatus::Pending)).await;
        let (board, _) = board(&backend).await;

        assert_eq!(board.advance("pr1").await.unwrap(), WorkStatus::Processing);
        assert_eq!(board.revert("pr1").await.unwrap(), WorkStatus::Pending);
        assert!(matches!(
            board.revert("pr1").await,
            Err(DashboardError::Rejected(_))
        ));
        assert_eq!(backend.count_requests("PATCH", "/decorator-update/pr1").await, 2);
    }

    #[tokio::test]
    async fn test_missing_work_status_counts_as_pending() {
        let backend = Arc::new(MockBackend::new());
        let mut project = assigned_payment("pr1", JANE, WorkStatus::Pending);
        project.work_status = None;
        backend.add_payment(project).await;
        let (board, _) = board(&backend).await;

        assert_eq!(board.advance("pr1").await.unwrap(), WorkStatus::Processing);
    }

    #[tokio::test]
    async fn test_in_flight_guard_is_per_project() {
        let backend = Arc::new(MockBackend::new());
        backend.add_payment(assigned_payment("pr1", JANE, WorkStatus::Pending)).await;
        backend.add_payment(assigned_payment("pr2", JANE, WorkStatus::Pending)).await;
        let (board, _) = board(&backend).await;
        backend.set_latency(Duration::from_millis(50)).await;

        let first = {
            let board = board.clone();
            tokio::spawn(async move { board.advance("pr1").await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(board.is_updating("pr1"));

        let same = board.advance("pr1").await;
        let other = board.advance("pr2").await;

        assert!(matches!(same, Err(DashboardError::UpdateInFlight(id)) if id == "pr1"));
        assert_eq!(other.unwrap(), WorkStatus::Processing);
        assert_eq!(first.await.unwrap().unwrap(), WorkStatus::Processing);
        assert!(!board.is_updating("pr1"));
    }
}
