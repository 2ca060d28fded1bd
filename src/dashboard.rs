//! Wiring of session, backend client, and controllers.

use std::sync::Arc;

use decorhub_client::{HttpClient, MarketplaceApi, UserProfile};
use tracing::info;

use crate::assignment::AssignmentBoard;
use crate::booking::{AdminBookings, ClientBookings};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Result;
use crate::guard::{GuardDecision, RoleGuard};
use crate::notify::Notifier;
use crate::requests::DecoratorRequests;
use crate::routes::DashboardRoute;
use crate::session::Session;
use crate::users::UserAdmin;
use crate::work_status::ProjectBoard;

/// One signed-in dashboard: the session, the backend, and a factory for
/// the controllers behind each route.
pub struct Dashboard {
    config: Config,
    session: Arc<Session>,
    api: Arc<dyn MarketplaceApi>,
    notifier: Arc<dyn Notifier>,
}

impl Dashboard {
    /// Build a dashboard talking to the configured backend over HTTP.
    ///
    /// The session supplies the bearer token and is signed out if the
    /// backend rejects it.
    pub fn connect(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let session = Arc::new(Session::new());
        let client = HttpClient::secure(&config.api.client_config(), session.clone())?;
        info!(base_url = %client.base_url(), "Backend client ready");
        Ok(Self::with_api(config, session, Arc::new(client), notifier))
    }

    /// Build a dashboard over any backend implementation.
    pub fn with_api(
        config: Config,
        session: Arc<Session>,
        api: Arc<dyn MarketplaceApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            session,
            api,
            notifier,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> Arc<Session> {
        self.session.clone()
    }

    pub fn api(&self) -> Arc<dyn MarketplaceApi> {
        self.api.clone()
    }

    /// Sign in with an identity-provider profile and token.
    pub async fn sign_in(&self, profile: UserProfile, token: String) -> Result<decorhub_client::Role> {
        self.session.begin_sign_in().await;
        self.session.sign_in(self.api.as_ref(), profile, token).await
    }

    /// Guard decision for a route.
    pub async fn authorize(&self, route: DashboardRoute) -> GuardDecision {
        RoleGuard::for_route(route)
            .authorize(self.session.as_ref(), self.api.as_ref())
            .await
    }

    /// Routes the guard currently renders, in menu order.
    pub async fn rendered_routes(&self) -> Vec<DashboardRoute> {
        let mut rendered = Vec::new();
        for route in DashboardRoute::ALL {
            if self.authorize(*route).await.is_render() {
                rendered.push(*route);
            }
        }
        rendered
    }

    pub fn client_bookings(&self) -> ClientBookings {
        ClientBookings::new(
            self.api.clone(),
            self.session.clone(),
            self.notifier.clone(),
            self.config.checkout.clone(),
        )
    }

    pub fn admin_bookings(&self) -> AdminBookings {
        AdminBookings::new(self.api.clone(), self.session.clone(), self.notifier.clone())
    }

    pub fn assignment_board(&self) -> AssignmentBoard {
        AssignmentBoard::new(
            self.api.clone(),
            self.notifier.clone(),
            self.config.feedback.success_indicator(),
        )
    }

    pub fn project_board(&self) -> ProjectBoard {
        ProjectBoard::new(self.api.clone(), self.session.clone(), self.notifier.clone())
    }

    pub fn decorator_requests(&self) -> DecoratorRequests {
        DecoratorRequests::new(self.api.clone(), self.notifier.clone())
    }

    pub fn user_admin(&self) -> UserAdmin {
        UserAdmin::new(self.api.clone(), self.session.clone(), self.notifier.clone())
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.api.clone())
    }
}
