//! User administration (admin).

use std::sync::Arc;

use decorhub_client::{MarketplaceApi, Role, User};
use tracing::{error, info};

use crate::error::{DashboardError, Result};
use crate::notify::{Notice, Notifier};
use crate::session::Session;
use crate::working_set::WorkingSet;

pub struct UserAdmin {
    api: Arc<dyn MarketplaceApi>,
    session: Arc<Session>,
    notifier: Arc<dyn Notifier>,
    users: WorkingSet<User>,
}

impl UserAdmin {
    pub fn new(api: Arc<dyn MarketplaceApi>, session: Arc<Session>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            session,
            notifier,
            users: WorkingSet::new(),
        }
    }

    pub async fn load(&self) -> Result<Vec<User>> {
        let users = self.api.list_users().await.map_err(|e| {
            error!(error = %e, "Failed to load users");
            self.notifier.notify(Notice::error("Could not load users"));
            e
        })?;
        self.users.replace(users.clone()).await;
        Ok(users)
    }

    pub async fn users(&self) -> Vec<User> {
        self.users.all().await
    }

    /// Change a user's role.
    ///
    /// Changing the signed-in user's own role drops the cached role so the
    /// next guard check refetches it.
    pub async fn change_role(&self, email: &str, role: Role) -> Result<()> {
        if !self.users.contains(email).await {
            return Err(DashboardError::not_found("user", email));
        }

        if let Err(e) = self.api.update_role(email, role).await {
            error!(email = %email, role = %role, error = %e, "Role change failed");
            self.notifier
                .notify(Notice::error(format!("Could not change role: {}", e.message())));
            return Err(e.into());
        }

        self.users.edit(email, |user| user.role = role).await;
        if self.session.email().await.ok().as_deref() == Some(email) {
            self.session.invalidate_role().await;
        }

        info!(email = %email, role = %role, "Role changed");
        self.notifier
            .notify(Notice::success(format!("{} is now {}", email, role)));
        Ok(())
    }
}
