//! Client traits for the marketplace backend.
//!
//! Controllers depend on these traits rather than on the HTTP client, so
//! tests can substitute an in-memory backend.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Booking, CheckoutRequest, CheckoutSession, Decorator, DecoratorAssignment, DecoratorRequest,
    NewBooking, Payment, Service, User, UserProfile, WorkStatusUpdate,
};
use crate::status::Role;

/// Source of the bearer token for the secure client.
///
/// `revoke` is called when the backend answers 401/403 with the token the
/// rejected request carried; implementors sign the user out if that token
/// is still the current one.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Current bearer token, if signed in.
    async fn bearer_token(&self) -> Option<String>;

    /// Called once per rejected request.
    async fn revoke(&self, rejected: Option<&str>);
}

/// Service catalog reads.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_services(&self) -> Result<Vec<Service>>;

    /// Service detail including reviews.
    async fn get_service(&self, id: &str) -> Result<Service>;
}

/// Booking records.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Create a booking, returning the id assigned by the backend.
    async fn create_booking(&self, booking: &NewBooking) -> Result<String>;

    async fn list_bookings(&self) -> Result<Vec<Booking>>;

    async fn list_user_bookings(&self, uid: &str) -> Result<Vec<Booking>>;

    async fn delete_booking(&self, id: &str) -> Result<()>;

    /// Start a checkout session, returning the redirect target.
    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession>;
}

/// Payment records and their decorator/work-status sub-state.
#[async_trait]
pub trait PaymentApi: Send + Sync {
    async fn list_payments(&self) -> Result<Vec<Payment>>;

    async fn list_client_payments(&self, email: &str) -> Result<Vec<Payment>>;

    async fn list_decorator_payments(&self, email: &str) -> Result<Vec<Payment>>;

    async fn assign_decorator(&self, payment_id: &str, body: &DecoratorAssignment) -> Result<()>;

    async fn update_work_status(&self, payment_id: &str, body: &WorkStatusUpdate) -> Result<()>;
}

/// User accounts, roles, and decorator applications.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// Create or update the user record on sign-in.
    async fn upsert_user(&self, profile: &UserProfile) -> Result<()>;

    async fn get_role(&self, email: &str) -> Result<Role>;

    async fn list_users(&self) -> Result<Vec<User>>;

    async fn update_role(&self, email: &str, role: Role) -> Result<()>;

    async fn list_decorators(&self) -> Result<Vec<Decorator>>;

    async fn list_decorator_requests(&self) -> Result<Vec<DecoratorRequest>>;

    async fn delete_decorator_request(&self, id: &str) -> Result<()>;
}

/// Everything the dashboard needs from the backend.
pub trait MarketplaceApi: CatalogApi + BookingApi + PaymentApi + UserApi {}

impl<T> MarketplaceApi for T where T: CatalogApi + BookingApi + PaymentApi + UserApi {}
