//! Session context shared by every controller.
//!
//! The session is created once, passed explicitly (as `Arc<Session>`) to
//! each controller, and handed to the secure HTTP client as its
//! [`TokenSource`]. The role is fetched once per sign-in and cached until
//! sign-out or an explicit invalidation.

use async_trait::async_trait;
use decorhub_client::{Role, TokenSource, UserApi, UserProfile};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{DashboardError, Result};
use crate::routes::LOGIN_PATH;

/// A signed-in user and, once resolved, their role.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedInUser {
    pub profile: UserProfile,
    pub role: Option<Role>,
}

/// Session lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// Identity provider has not reported yet.
    #[default]
    Uninitialized,
    /// Sign-in in progress.
    Loading,
    Authenticated(SignedInUser),
    /// Identity provider reported no user.
    Anonymous,
    /// Signed out (explicitly or by the backend rejecting the token).
    Disposed,
}

/// Process-wide session context.
#[derive(Debug, Default)]
pub struct Session {
    state: RwLock<SessionState>,
    token: RwLock<Option<String>>,
    redirect: RwLock<Option<String>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Mark that the identity provider is resolving a user.
    pub async fn begin_sign_in(&self) {
        *self.state.write().await = SessionState::Loading;
    }

    /// Mark that the identity provider reported no user.
    pub async fn mark_anonymous(&self) {
        *self.token.write().await = None;
        *self.state.write().await = SessionState::Anonymous;
    }

    /// Sign a user in: store the token, upsert the user record, and resolve
    /// the role once.
    ///
    /// A failed upsert is logged and ignored; a failed role lookup leaves the
    /// session authenticated with an unresolved role and returns the error.
    pub async fn sign_in<A: UserApi + ?Sized>(
        &self,
        api: &A,
        profile: UserProfile,
        token: String,
    ) -> Result<Role> {
        *self.token.write().await = Some(token);
        *self.redirect.write().await = None;
        *self.state.write().await = SessionState::Authenticated(SignedInUser {
            profile: profile.clone(),
            role: None,
        });

        if let Err(e) = api.upsert_user(&profile).await {
            warn!(email = %profile.email, error = %e, "Failed to save user record on sign-in");
        }

        let role = self.resolve_role(api).await?;
        info!(email = %profile.email, role = %role, "Signed in");
        Ok(role)
    }

    /// Return the cached role, fetching it if unresolved.
    pub async fn resolve_role<A: UserApi + ?Sized>(&self, api: &A) -> Result<Role> {
        let email = match &*self.state.read().await {
            SessionState::Authenticated(user) => match user.role {
                Some(role) => return Ok(role),
                None => user.profile.email.clone(),
            },
            _ => return Err(DashboardError::NotSignedIn),
        };

        let role = api.get_role(&email).await?;

        let mut state = self.state.write().await;
        match &mut *state {
            // Only cache if the same user is still signed in.
            SessionState::Authenticated(user) if user.profile.email == email => {
                user.role = Some(role);
                Ok(role)
            }
            _ => Err(DashboardError::NotSignedIn),
        }
    }

    /// Forget the cached role so the next resolution refetches it.
    pub async fn invalidate_role(&self) {
        if let SessionState::Authenticated(user) = &mut *self.state.write().await {
            user.role = None;
        }
    }

    /// Sign out and drop the token.
    pub async fn sign_out(&self) {
        *self.token.write().await = None;
        *self.state.write().await = SessionState::Disposed;
    }

    /// Cached role, if resolved.
    pub async fn role(&self) -> Option<Role> {
        match &*self.state.read().await {
            SessionState::Authenticated(user) => user.role,
            _ => None,
        }
    }

    /// The signed-in user's profile.
    pub async fn user(&self) -> Result<UserProfile> {
        match &*self.state.read().await {
            SessionState::Authenticated(user) => Ok(user.profile.clone()),
            _ => Err(DashboardError::NotSignedIn),
        }
    }

    /// The signed-in user's email.
    pub async fn email(&self) -> Result<String> {
        self.user().await.map(|profile| profile.email)
    }

    /// Take the pending navigation target, if any.
    pub async fn take_redirect(&self) -> Option<String> {
        self.redirect.write().await.take()
    }
}

#[async_trait]
impl TokenSource for Session {
    async fn bearer_token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    async fn revoke(&self, rejected: Option<&str>) {
        if self.token.read().await.as_deref() != rejected {
            debug!("Ignoring rejection of a token that is no longer current");
            return;
        }
        warn!("Session revoked by backend, signing out");
        self.sign_out().await;
        *self.redirect.write().await = Some(LOGIN_PATH.to_string());
    }
}
