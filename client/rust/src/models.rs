//! Wire models exchanged with the marketplace backend.
//!
//! Field names follow the backend's JSON (camelCase, `_id` identifiers,
//! and the backend's `decoretor*` spelling for assigned decorators).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::{BookingStatus, PaymentStatus, Role, WorkStatus};

/// Embedded reference to a person (client or provider).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// A customer review attached to a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// A decoration service offered in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub unit: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub provider: Option<Party>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Service snapshot copied into a booking at intake time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedService {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub unit: String,
    #[serde(default)]
    pub image: Option<String>,
    pub book_time: DateTime<Utc>,
    pub status: BookingStatus,
}

/// A client's request for a service instance, prior to payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub user: Party,
    pub provider: Party,
    pub service: BookedService,
}

impl Booking {
    pub fn status(&self) -> BookingStatus {
        self.service.status
    }
}

/// Booking body sent on intake; the backend assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBooking {
    pub user: Party,
    pub provider: Party,
    pub service: BookedService,
}

impl NewBooking {
    /// Attach the id the backend assigned.
    pub fn into_booking(self, id: String) -> Booking {
        Booking {
            id,
            user: self.user,
            provider: self.provider,
            service: self.service,
        }
    }
}

/// Decorator identity copied by value into a payment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecoratorRef {
    pub name: String,
    pub email: String,
}

/// A confirmed payment derived from a paid booking.
///
/// The assigned decorator is a single optional pair so a half-assigned
/// record cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PaymentWire", into = "PaymentWire")]
pub struct Payment {
    pub id: String,
    pub service_name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    pub unit: String,
    pub customer: String,
    pub user_email: String,
    pub provider_name: String,
    pub provider_email: String,
    pub decorator: Option<DecoratorRef>,
    pub location: String,
    pub phone: Option<String>,
    pub transaction_id: String,
    pub status: PaymentStatus,
    pub date: DateTime<Utc>,
    pub work_status: Option<WorkStatus>,
}

impl Payment {
    /// Work status, treating a missing value as `pending`.
    pub fn work_status(&self) -> WorkStatus {
        self.work_status.unwrap_or_default()
    }

    pub fn is_assigned(&self) -> bool {
        self.decorator.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentWire {
    #[serde(rename = "_id", alias = "id")]
    id: String,
    service_name: String,
    category: String,
    price: f64,
    quantity: u32,
    unit: String,
    customer: String,
    user_email: String,
    provider_name: String,
    provider_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decoretor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decoretor_email: Option<String>,
    #[serde(default)]
    location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(default)]
    transaction_id: String,
    status: PaymentStatus,
    date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    work_status: Option<WorkStatus>,
}

impl From<PaymentWire> for Payment {
    fn from(wire: PaymentWire) -> Self {
        let decorator = match (wire.decoretor_name, wire.decoretor_email) {
            (Some(name), Some(email)) => Some(DecoratorRef { name, email }),
            (None, None) => None,
            (name, email) => {
                tracing::warn!(
                    payment_id = %wire.id,
                    has_name = name.is_some(),
                    has_email = email.is_some(),
                    "Payment carries a partial decorator assignment, treating as unassigned"
                );
                None
            }
        };

        Self {
            id: wire.id,
            service_name: wire.service_name,
            category: wire.category,
            price: wire.price,
            quantity: wire.quantity,
            unit: wire.unit,
            customer: wire.customer,
            user_email: wire.user_email,
            provider_name: wire.provider_name,
            provider_email: wire.provider_email,
            decorator,
            location: wire.location,
            phone: wire.phone,
            transaction_id: wire.transaction_id,
            status: wire.status,
            date: wire.date,
            work_status: wire.work_status,
        }
    }
}

impl From<Payment> for PaymentWire {
    fn from(payment: Payment) -> Self {
        let (decoretor_name, decoretor_email) = match payment.decorator {
            Some(d) => (Some(d.name), Some(d.email)),
            None => (None, None),
        };

        Self {
            id: payment.id,
            service_name: payment.service_name,
            category: payment.category,
            price: payment.price,
            quantity: payment.quantity,
            unit: payment.unit,
            customer: payment.customer,
            user_email: payment.user_email,
            provider_name: payment.provider_name,
            provider_email: payment.provider_email,
            decoretor_name,
            decoretor_email,
            location: payment.location,
            phone: payment.phone,
            transaction_id: payment.transaction_id,
            status: payment.status,
            date: payment.date,
            work_status: payment.work_status,
        }
    }
}

/// Body of `PATCH /add-decorator/:id`. Both fields are always written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratorAssignment {
    pub decoretor_name: String,
    pub decoretor_email: String,
}

impl From<&DecoratorRef> for DecoratorAssignment {
    fn from(decorator: &DecoratorRef) -> Self {
        Self {
            decoretor_name: decorator.name.clone(),
            decoretor_email: decorator.email.clone(),
        }
    }
}

/// Body of `PATCH /decorator-update/:id`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkStatusUpdate {
    pub work_status: WorkStatus,
}

/// A user holding the decorator role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decorator {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, alias = "imageURL")]
    pub photo: Option<String>,
}

impl Decorator {
    /// The name/email pair copied into a payment on assignment.
    pub fn identity(&self) -> DecoratorRef {
        DecoratorRef {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// A pending application to become a decorator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratorRequest {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub photo: Option<String>,
    pub request_date: DateTime<Utc>,
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, rename = "imageURL")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Body of `POST /user`, sent on every sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default, rename = "imageURL", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body and response of the role endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleBody {
    pub role: Role,
}

/// Body of `POST /create-checkout-session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub booking_id: String,
    pub service_name: String,
    pub category: String,
    pub price: f64,
    pub unit: String,
    pub quantity: u32,
    pub total_price: f64,
    pub location: String,
    pub customer: String,
    pub user_email: String,
    pub provider_name: String,
    pub provider_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Response of `POST /create-checkout-session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

/// Insert acknowledgement returned by create endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResult {
    #[serde(default)]
    pub inserted_id: Option<String>,
}
