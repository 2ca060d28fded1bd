//! Error types for dashboard operations.

use decorhub_client::ClientError;

/// Result type for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors that can occur while driving the booking lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Form input rejected before any request was sent.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A lifecycle rule forbids the operation in the current state.
    #[error("rejected: {0}")]
    Rejected(String),

    /// The record is not in the local working set.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    /// Another update on the same record has not finished yet.
    #[error("an update for {0} is already in flight")]
    UpdateInFlight(String),

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotSignedIn,

    /// The backend call failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl DashboardError {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Returns true if the error was raised locally, without a request.
    pub fn is_local(&self) -> bool {
        !matches!(self, DashboardError::Client(_))
    }

    /// Returns true if the backend revoked the session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DashboardError::Client(e) if e.is_unauthorized())
    }
}

/// Messages for rejected operations.
pub mod errmsg {
    pub const QUANTITY_POSITIVE: &str = "Quantity must be at least 1";
    pub const BOOKING_NOT_UNPAID: &str = "Only unpaid bookings can be paid or cancelled";
    pub const PAYMENT_NOT_PAID: &str = "Decorators can only be assigned to paid payments";
    pub const PROJECT_NOT_ASSIGNED: &str = "Project is not assigned to the signed-in decorator";
    pub const STATUS_NOT_FORWARD: &str = "Work status can only move forward";
    pub const ALREADY_COMPLETED: &str = "Project is already completed";
    pub const NOTHING_TO_REVERT: &str = "Project is still pending";
    pub const PRICE_NOT_POSITIVE: &str = "Service price must be positive";
    pub const SERVICE_WITHOUT_PROVIDER: &str = "Service has no provider";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = DashboardError::not_found("booking", "b1");
        assert_eq!(err.to_string(), "booking b1 not found");
        assert!(err.is_local());
    }

    #[test]
    fn test_client_error_is_transparent() {
        let err: DashboardError = ClientError::Connection("refused".into()).into();
        assert_eq!(err.to_string(), "connection failed: refused");
        assert!(!err.is_local());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized_passthrough() {
        let err: DashboardError =
            ClientError::Unauthorized(decorhub_client::StatusCode::UNAUTHORIZED).into();
        assert!(err.is_unauthorized());
    }
}
