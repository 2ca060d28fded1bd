//! DecorHub - booking and payment lifecycle coordinator
//!
//! Drives a decoration-service booking from intake through payment,
//! decorator assignment, and work-status tracking against the marketplace
//! backend, and gates each dashboard route by the signed-in user's role.
//!
//! Every controller takes the session (`Arc<Session>`), the backend
//! (`Arc<dyn MarketplaceApi>`), and a `Notifier` explicitly; [`Dashboard`]
//! wires them together.

pub mod assignment;
pub mod booking;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod notify;
pub mod requests;
pub mod routes;
pub mod session;
pub mod users;
pub mod utils;
pub mod validation;
pub mod work_status;
pub mod working_set;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use dashboard::Dashboard;
pub use error::{DashboardError, Result};
pub use guard::{GuardDecision, RoleGuard};
pub use notify::{Level, Notice, Notifier, TracingNotifier};
pub use routes::DashboardRoute;
pub use session::{Session, SessionState, SignedInUser};
