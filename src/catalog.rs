//! Read-only service catalog.

use std::sync::Arc;

use decorhub_client::{CatalogApi, Review, Service};
use tracing::{debug, error};

use crate::error::Result;

/// Mean review rating, or `None` without reviews.
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let total: f64 = reviews.iter().map(|r| r.rating).sum();
    Some(total / reviews.len() as f64)
}

pub struct Catalog {
    api: Arc<dyn CatalogApi>,
}

impl Catalog {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    pub async fn services(&self) -> Result<Vec<Service>> {
        let services = self.api.list_services().await.map_err(|e| {
            error!(error = %e, "Failed to load services");
            e
        })?;
        debug!(count = services.len(), "Services loaded");
        Ok(services)
    }

    /// Service detail including reviews.
    pub async fn service(&self, id: &str) -> Result<Service> {
        let service = self.api.get_service(id).await.map_err(|e| {
            error!(service_id = %id, error = %e, "Failed to load service");
            e
        })?;
        Ok(service)
    }

    /// Services in a category, case-insensitively.
    pub async fn by_category(&self, category: &str) -> Result<Vec<Service>> {
        Ok(self
            .services()
            .await?
            .into_iter()
            .filter(|s| s.category.eq_ignore_ascii_case(category))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use crate::test_utils::{service, MockBackend};

    fn review(rating: f64) -> Review {
        Review {
            name: "Rahim".into(),
            email: None,
            rating,
            comment: String::new(),
            date: None,
        }
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[review(4.0), review(5.0)]), Some(4.5));
    }

    #[tokio::test]
    async fn test_service_detail_and_categories() {
        let backend = Arc::new(MockBackend::new());
        let mut stage = service("s1", 500.0);
        stage.reviews = vec![review(3.0)];
        let mut cake = service("s2", 200.0);
        cake.category = "birthday".into();
        backend.add_service(stage).await;
        backend.add_service(cake).await;
        let catalog = Catalog::new(backend.clone());

        let detail = catalog.service("s1").await.unwrap();
        assert_eq!(average_rating(&detail.reviews), Some(3.0));
        assert_eq!(catalog.by_category("Birthday").await.unwrap().len(), 1);
        assert_eq!(catalog.services().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_service_is_not_found() {
        let backend = Arc::new(MockBackend::new());
        let catalog = Catalog::new(backend);

        match catalog.service("nope").await {
            Err(DashboardError::Client(e)) => assert!(e.is_not_found()),
            other => panic!("expected not found, got {:?}", other),
        }
    }
}
