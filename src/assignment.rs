//! Decorator assignment to paid payments (admin).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use decorhub_client::{
    Decorator, DecoratorAssignment, DecoratorRef, MarketplaceApi, Payment, PaymentStatus,
};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::error::{errmsg, DashboardError, Result};
use crate::notify::{Notice, Notifier};
use crate::validation::require_status;
use crate::working_set::{InFlight, WorkingSet};

/// Admin view over payments and the decorators that can be assigned.
pub struct AssignmentBoard {
    api: Arc<dyn MarketplaceApi>,
    notifier: Arc<dyn Notifier>,
    success_window: Duration,
    payments: WorkingSet<Payment>,
    decorators: RwLock<Vec<Decorator>>,
    assigned: RwLock<HashMap<String, DecoratorRef>>,
    succeeded: RwLock<HashMap<String, Instant>>,
    in_flight: InFlight,
}

impl AssignmentBoard {
    pub fn new(api: Arc<dyn MarketplaceApi>, notifier: Arc<dyn Notifier>, success_window: Duration) -> Self {
        Self {
            api,
            notifier,
            success_window,
            payments: WorkingSet::new(),
            decorators: RwLock::new(Vec::new()),
            assigned: RwLock::new(HashMap::new()),
            succeeded: RwLock::new(HashMap::new()),
            in_flight: InFlight::default(),
        }
    }

    /// Load all payments and the decorator list.
    ///
    /// The local assignment map is rebuilt from the payments' decorator fields.
    pub async fn load(&self) -> Result<()> {
        let payments = self.api.list_payments().await.map_err(|e| {
            error!(error = %e, "Failed to load payments");
            self.notifier.notify(Notice::error("Could not load payments"));
            e
        })?;
        let decorators = self.api.list_decorators().await.map_err(|e| {
            error!(error = %e, "Failed to load decorators");
            self.notifier.notify(Notice::error("Could not load decorators"));
            e
        })?;

        let assigned = payments
            .iter()
            .filter_map(|p| p.decorator.clone().map(|d| (p.id.clone(), d)))
            .collect();

        info!(payments = payments.len(), decorators = decorators.len(), "Assignment board loaded");
        self.payments.replace(payments).await;
        *self.decorators.write().await = decorators;
        *self.assigned.write().await = assigned;
        self.prune_succeeded().await;
        Ok(())
    }

    pub async fn payments(&self) -> Vec<Payment> {
        self.payments.all().await
    }

    pub async fn decorators(&self) -> Vec<Decorator> {
        self.decorators.read().await.clone()
    }

    /// Paid payments still waiting for a decorator.
    pub async fn unassigned(&self) -> Vec<Payment> {
        self.payments
            .all()
            .await
            .into_iter()
            .filter(|p| p.status == PaymentStatus::Paid && !p.is_assigned())
            .collect()
    }

    /// Decorator currently shown for a payment.
    pub async fn assigned(&self, payment_id: &str) -> Option<DecoratorRef> {
        self.assigned.read().await.get(payment_id).cloned()
    }

    /// Whether the success indicator for a payment is still showing.
    pub async fn success_visible(&self, payment_id: &str) -> bool {
        self.succeeded
            .read()
            .await
            .get(payment_id)
            .is_some_and(|at| at.elapsed() < self.success_window)
    }

    /// Whether an assignment for this payment is still outstanding.
    pub fn is_assigning(&self, payment_id: &str) -> bool {
        self.in_flight.contains(payment_id)
    }

    async fn prune_succeeded(&self) {
        let window = self.success_window;
        self.succeeded
            .write()
            .await
            .retain(|_, at| at.elapsed() < window);
    }

    /// Assign a decorator (by persisted id) to a paid payment.
    ///
    /// Reassigning overwrites the previous decorator. The local echo is
    /// applied before the request and rolled back if it fails. A second
    /// assignment to the same payment fails with `UpdateInFlight` until the
    /// first one settles.
    pub async fn assign(&self, payment_id: &str, decorator_id: &str) -> Result<DecoratorRef> {
        let _guard = self.in_flight.acquire(payment_id).map_err(|e| {
            warn!(payment_id = %payment_id, "Decorator assignment already in flight");
            e
        })?;

        let decorator = self
            .decorators
            .read()
            .await
            .iter()
            .find(|d| d.id == decorator_id)
            .map(Decorator::identity)
            .ok_or_else(|| DashboardError::not_found("decorator", decorator_id))?;

        let payment = self
            .payments
            .get(payment_id)
            .await
            .ok_or_else(|| DashboardError::not_found("payment", payment_id))?;
        if let Err(e) = require_status(payment.status, PaymentStatus::Paid, errmsg::PAYMENT_NOT_PAID) {
            warn!(payment_id = %payment_id, status = %payment.status, "Refusing to assign decorator");
            self.notifier.notify(Notice::warning(errmsg::PAYMENT_NOT_PAID));
            return Err(e);
        }

        let snapshot = self
            .payments
            .edit(payment_id, |p| p.decorator = Some(decorator.clone()))
            .await
            .ok_or_else(|| DashboardError::not_found("payment", payment_id))?;
        let previous = self
            .assigned
            .write()
            .await
            .insert(payment_id.to_string(), decorator.clone());

        let body = DecoratorAssignment::from(&decorator);
        match self.api.assign_decorator(payment_id, &body).await {
            Ok(()) => {
                info!(
                    payment_id = %payment_id,
                    decorator = %decorator.email,
                    "Decorator assigned"
                );
                self.prune_succeeded().await;
                self.succeeded
                    .write()
                    .await
                    .insert(payment_id.to_string(), Instant::now());
                self.notifier
                    .notify(Notice::success(format!("{} assigned", decorator.name)));
                Ok(decorator)
            }
            Err(e) => {
                self.payments.rollback(snapshot).await;
                let mut assigned = self.assigned.write().await;
                match previous {
                    Some(prev) => assigned.insert(payment_id.to_string(), prev),
                    None => assigned.remove(payment_id),
                };
                error!(payment_id = %payment_id, error = %e, "Decorator assignment failed, rolled back");
                self.notifier
                    .notify(Notice::error(format!("Could not assign decorator: {}", e.message())));
                Err(e.into())
            }
        }
    }
}
