//! Role guard step definitions.

use std::fmt;
use std::sync::Arc;

use cucumber::{given, then, when, World};
use decorhub::test_utils::{profile, MockBackend};
use decorhub::{DashboardRoute, GuardDecision, RoleGuard, Session};
use decorhub_client::Role;

/// Test context for role guard scenarios.
#[derive(World)]
#[world(init = Self::new)]
pub struct GuardWorld {
    backend: Arc<MockBackend>,
    session: Arc<Session>,
}

impl fmt::Debug for GuardWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardWorld").finish_non_exhaustive()
    }
}

impl GuardWorld {
    fn new() -> Self {
        Self {
            backend: Arc::new(MockBackend::new()),
            session: Arc::new(Session::new()),
        }
    }

    async fn sign_in(&self, email: &str, role: &str) {
        let role: Role = role.parse().expect("valid role");
        self.backend.add_user("User", email, role).await;
        // A failed role lookup leaves the session authenticated, unresolved.
        let _ = self
            .session
            .sign_in(self.backend.as_ref(), profile("User", email), "tok".into())
            .await;
    }

    async fn decision(&self, path: &str) -> GuardDecision {
        let route = DashboardRoute::from_path(path).expect("known route");
        RoleGuard::for_route(route)
            .authorize(&self.session, self.backend.as_ref())
            .await
    }
}

// --- Given steps ---

#[given(expr = "a user {string} with role {string} is signed in")]
async fn given_signed_in(world: &mut GuardWorld, email: String, role: String) {
    world.sign_in(&email, &role).await;
}

#[given(expr = "a user {string} with role {string} whose role lookup fails")]
async fn given_lookup_fails(world: &mut GuardWorld, email: String, role: String) {
    world.backend.set_fail("GET /user/role/", true).await;
    world.sign_in(&email, &role).await;
}

// --- When steps ---

#[when("the role lookup recovers")]
async fn when_lookup_recovers(world: &mut GuardWorld) {
    world.backend.set_fail("GET /user/role/", false).await;
}

#[when("the user signs out")]
async fn when_signs_out(world: &mut GuardWorld) {
    world.session.sign_out().await;
}

// --- Then steps ---

#[then(expr = "route {string} is {word}")]
async fn then_route_is(world: &mut GuardWorld, path: String, decision: String) {
    let actual = world.decision(&path).await;
    match decision.as_str() {
        "rendered" => assert_eq!(actual, GuardDecision::Render),
        "loading" => assert_eq!(actual, GuardDecision::Loading),
        "forbidden" => assert!(matches!(actual, GuardDecision::Forbidden { .. })),
        other => panic!("unknown decision {}", other),
    }
}

#[then(expr = "route {string} redirects to {string}")]
async fn then_route_redirects(world: &mut GuardWorld, path: String, to: String) {
    match world.decision(&path).await {
        GuardDecision::RedirectToLogin { to: actual } => assert_eq!(actual, to),
        other => panic!("expected redirect, got {:?}", other),
    }
}
