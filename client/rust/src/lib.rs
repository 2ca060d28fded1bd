//! Typed Rust client for the DecorHub marketplace backend.
//!
//! This crate provides the wire models, endpoint paths, and a reqwest-based
//! client for the REST backend that stores services, bookings, payments,
//! and users.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use decorhub_client::{ClientConfig, HttpClient, PaymentApi};
//!
//! async fn example() -> decorhub_client::Result<()> {
//!     let client = HttpClient::public(&ClientConfig::default())?;
//!     let payments = client.list_payments().await?;
//!     println!("{} payments", payments.len());
//!     Ok(())
//! }
//! ```
//!
//! # Mocking for Tests
//!
//! Controllers take the API traits (`BookingApi`, `PaymentApi`, ...) as
//! trait objects, so an in-memory implementation can stand in for the
//! backend:
//!
//! ```rust,ignore
//! use decorhub_client::{CatalogApi, Service};
//! use async_trait::async_trait;
//!
//! struct EmptyCatalog;
//!
//! #[async_trait]
//! impl CatalogApi for EmptyCatalog {
//!     async fn list_services(&self) -> decorhub_client::Result<Vec<Service>> {
//!         Ok(Vec::new())
//!     }
//!     // ...
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod routes;
pub mod status;
pub mod traits;

// Re-export main types at crate root
pub use client::{ClientConfig, HttpClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ClientError, Result};
pub use models::{
    BookedService, Booking, CheckoutRequest, CheckoutSession, Decorator, DecoratorAssignment,
    DecoratorRef, DecoratorRequest, InsertResult, NewBooking, Party, Payment, Review, RoleBody,
    Service, User, UserProfile, WorkStatusUpdate,
};
pub use status::{BookingStatus, PaymentStatus, Role, UnknownStatus, WorkStatus};
pub use reqwest::StatusCode;
pub use traits::{BookingApi, CatalogApi, MarketplaceApi, PaymentApi, TokenSource, UserApi};
