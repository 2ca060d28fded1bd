//! Pending applications to become a decorator (admin).

use std::sync::Arc;

use decorhub_client::{DecoratorRequest, MarketplaceApi, Role};
use tracing::{error, info};

use crate::error::{DashboardError, Result};
use crate::notify::{Notice, Notifier};
use crate::working_set::WorkingSet;

pub struct DecoratorRequests {
    api: Arc<dyn MarketplaceApi>,
    notifier: Arc<dyn Notifier>,
    requests: WorkingSet<DecoratorRequest>,
}

impl DecoratorRequests {
    pub fn new(api: Arc<dyn MarketplaceApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            requests: WorkingSet::new(),
        }
    }

    pub async fn load(&self) -> Result<Vec<DecoratorRequest>> {
        let requests = self.api.list_decorator_requests().await.map_err(|e| {
            error!(error = %e, "Failed to load decorator requests");
            self.notifier.notify(Notice::error("Could not load decorator requests"));
            e
        })?;
        self.requests.replace(requests.clone()).await;
        Ok(requests)
    }

    pub async fn requests(&self) -> Vec<DecoratorRequest> {
        self.requests.all().await
    }

    /// Promote the applicant to decorator, then drop the request.
    ///
    /// If the promotion succeeds but the delete fails, the request stays
    /// listed and accepting again is harmless.
    pub async fn accept(&self, request_id: &str) -> Result<()> {
        let request = self.find(request_id).await?;

        if let Err(e) = self.api.update_role(&request.email, Role::Decorator).await {
            error!(request_id = %request_id, email = %request.email, error = %e, "Failed to promote applicant");
            self.notifier
                .notify(Notice::error(format!("Could not make {} a decorator", request.name)));
            return Err(e.into());
        }
        info!(request_id = %request_id, email = %request.email, "Applicant promoted to decorator");

        self.delete(&request).await?;
        self.notifier
            .notify(Notice::success(format!("{} is now a decorator", request.name)));
        Ok(())
    }

    /// Drop the request without changing the applicant's role.
    pub async fn reject(&self, request_id: &str) -> Result<()> {
        let request = self.find(request_id).await?;
        self.delete(&request).await?;
        info!(request_id = %request_id, email = %request.email, "Decorator request rejected");
        self.notifier
            .notify(Notice::success(format!("Request from {} removed", request.name)));
        Ok(())
    }

    async fn find(&self, request_id: &str) -> Result<DecoratorRequest> {
        self.requests
            .get(request_id)
            .await
            .ok_or_else(|| DashboardError::not_found("decorator request", request_id))
    }

    async fn delete(&self, request: &DecoratorRequest) -> Result<()> {
        match self.api.delete_decorator_request(&request.id).await {
            Ok(()) => {
                self.requests.remove(&request.id).await;
                Ok(())
            }
            Err(e) => {
                error!(request_id = %request.id, error = %e, "Failed to delete decorator request");
                self.notifier
                    .notify(Notice::error(format!("Could not remove request: {}", e.message())));
                Err(e.into())
            }
        }
    }
}
