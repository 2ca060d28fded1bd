//! Role-based access guard for dashboard routes.

use decorhub_client::{Role, UserApi};
use tracing::{debug, warn};

use crate::routes::{DashboardRoute, LOGIN_PATH};
use crate::session::{Session, SessionState};

/// What the router should do with a guarded route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the guarded content.
    Render,
    /// Neither granted nor denied yet; show a loading indicator.
    Loading,
    /// Signed in with a role that may not open this route.
    Forbidden { role: Role },
    /// Not signed in.
    RedirectToLogin { to: &'static str },
}

impl GuardDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, GuardDecision::Render)
    }
}

/// Guard admitting a fixed set of roles.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    allowed: Vec<Role>,
}

impl RoleGuard {
    pub fn new(allowed: &[Role]) -> Self {
        Self {
            allowed: allowed.to_vec(),
        }
    }

    /// Guard for a dashboard route.
    pub fn for_route(route: DashboardRoute) -> Self {
        Self::new(route.allowed_roles())
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }

    /// Decide from a session snapshot without touching the network.
    pub fn evaluate(&self, state: &SessionState) -> GuardDecision {
        match state {
            SessionState::Uninitialized | SessionState::Loading => GuardDecision::Loading,
            SessionState::Anonymous | SessionState::Disposed => {
                GuardDecision::RedirectToLogin { to: LOGIN_PATH }
            }
            SessionState::Authenticated(user) => match user.role {
                None => GuardDecision::Loading,
                Some(role) if self.allows(role) => GuardDecision::Render,
                Some(role) => GuardDecision::Forbidden { role },
            },
        }
    }

    /// Resolve the role through the session cache, then decide.
    ///
    /// A failed role lookup keeps the route blocked (`Loading`).
    pub async fn authorize<A: UserApi + ?Sized>(&self, session: &Session, api: &A) -> GuardDecision {
        if let SessionState::Authenticated(user) = session.state().await {
            if user.role.is_none() {
                if let Err(e) = session.resolve_role(api).await {
                    warn!(email = %user.profile.email, error = %e, "Role lookup failed, route stays blocked");
                }
            }
        }

        let decision = self.evaluate(&session.state().await);
        debug!(?decision, allowed = ?self.allowed, "Route guard decision");
        decision
    }
}
