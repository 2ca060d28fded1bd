//! Booking intake, payment transition, and cancellation.
//!
//! [`ClientBookings`] is the client-facing controller: it creates bookings,
//! starts checkout, and cancels unpaid bookings. [`AdminBookings`] lists
//! every booking with search/category filtering and exposes the same
//! guarded cancellation to admins.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use decorhub_client::{
    BookedService, Booking, BookingStatus, CheckoutRequest, MarketplaceApi, NewBooking, Party,
    Payment, Service,
};
use tracing::{error, info, warn};

use crate::config::CheckoutConfig;
use crate::error::{errmsg, DashboardError, Result};
use crate::notify::{Notice, Notifier};
use crate::session::Session;
use crate::validation::{or_default, require_positive_price, require_quantity, require_status};
use crate::working_set::WorkingSet;

/// Client-side total for a checkout. The backend must re-validate it.
pub fn total_price(quantity: u32, unit_price: f64) -> f64 {
    f64::from(quantity) * unit_price
}

/// Payment form input.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentForm {
    pub quantity: u32,
    pub location: Option<String>,
    pub phone: Option<String>,
}

impl PaymentForm {
    pub fn new(quantity: u32) -> Self {
        Self {
            quantity,
            location: None,
            phone: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Parse the raw quantity field.
    pub fn parse_quantity(raw: &str) -> Result<u32> {
        let quantity: u32 = raw
            .trim()
            .parse()
            .map_err(|_| DashboardError::Validation(format!("quantity: {:?} is not a whole number", raw)))?;
        require_quantity(quantity, errmsg::QUANTITY_POSITIVE)?;
        Ok(quantity)
    }
}

/// Where to send the client to pay.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRedirect {
    pub url: String,
    pub total_price: f64,
    pub currency: String,
}

/// Build the checkout payload for a booking.
pub fn checkout_request(
    booking: &Booking,
    quantity: u32,
    location: String,
    phone: Option<String>,
) -> CheckoutRequest {
    CheckoutRequest {
        booking_id: booking.id.clone(),
        service_name: booking.service.name.clone(),
        category: booking.service.category.clone(),
        price: booking.service.price,
        unit: booking.service.unit.clone(),
        quantity,
        total_price: total_price(quantity, booking.service.price),
        location,
        customer: booking.user.name.clone(),
        user_email: booking.user.email.clone(),
        provider_name: booking.provider.name.clone(),
        provider_email: booking.provider.email.clone(),
        phone: phone.filter(|p| !p.trim().is_empty()),
    }
}

/// Remove an unpaid booking optimistically; restore it if the delete fails.
async fn cancel_unpaid(
    api: &dyn MarketplaceApi,
    bookings: &WorkingSet<Booking>,
    notifier: &dyn Notifier,
    booking_id: &str,
    actor: &str,
) -> Result<()> {
    let booking = bookings
        .get(booking_id)
        .await
        .ok_or_else(|| DashboardError::not_found("booking", booking_id))?;

    if let Err(e) = require_status(booking.status(), BookingStatus::Unpaid, errmsg::BOOKING_NOT_UNPAID) {
        warn!(booking_id = %booking_id, status = %booking.status(), actor = %actor, "Refusing to cancel booking");
        notifier.notify(Notice::warning(errmsg::BOOKING_NOT_UNPAID));
        return Err(e);
    }

    let removed = bookings
        .remove(booking_id)
        .await
        .ok_or_else(|| DashboardError::not_found("booking", booking_id))?;

    match api.delete_booking(booking_id).await {
        Ok(()) => {
            info!(booking_id = %booking_id, actor = %actor, "Booking cancelled");
            notifier.notify(Notice::success("Booking cancelled"));
            Ok(())
        }
        Err(e) => {
            bookings.restore(removed).await;
            error!(booking_id = %booking_id, actor = %actor, error = %e, "Booking cancel failed, restored");
            notifier.notify(Notice::error(format!("Could not cancel booking: {}", e.message())));
            Err(e.into())
        }
    }
}

/// Client-facing booking controller.
pub struct ClientBookings {
    api: Arc<dyn MarketplaceApi>,
    session: Arc<Session>,
    notifier: Arc<dyn Notifier>,
    checkout: CheckoutConfig,
    bookings: WorkingSet<Booking>,
}

impl ClientBookings {
    pub fn new(
        api: Arc<dyn MarketplaceApi>,
        session: Arc<Session>,
        notifier: Arc<dyn Notifier>,
        checkout: CheckoutConfig,
    ) -> Self {
        Self {
            api,
            session,
            notifier,
            checkout,
            bookings: WorkingSet::new(),
        }
    }

    /// Load the signed-in client's bookings.
    pub async fn load(&self) -> Result<Vec<Booking>> {
        let email = self.session.email().await?;
        let bookings = self.api.list_user_bookings(&email).await.map_err(|e| {
            error!(email = %email, error = %e, "Failed to load bookings");
            self.notifier.notify(Notice::error("Could not load your bookings"));
            e
        })?;
        self.bookings.replace(bookings.clone()).await;
        Ok(bookings)
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.bookings.all().await
    }

    /// Create an unpaid booking for a catalog service.
    pub async fn book_service(&self, service: &Service) -> Result<Booking> {
        let user = self.session.user().await?;
        let provider = service
            .provider
            .clone()
            .ok_or_else(|| DashboardError::Rejected(errmsg::SERVICE_WITHOUT_PROVIDER.to_string()))?;
        require_positive_price(service.price, errmsg::PRICE_NOT_POSITIVE)?;

        let new_booking = NewBooking {
            user: Party {
                name: user.name,
                email: user.email,
                photo: user.image_url,
            },
            provider,
            service: BookedService {
                name: service.name.clone(),
                category: service.category.clone(),
                price: service.price,
                unit: service.unit.clone(),
                image: service.image.clone(),
                book_time: Utc::now(),
                status: BookingStatus::Unpaid,
            },
        };

        let id = self.api.create_booking(&new_booking).await.map_err(|e| {
            error!(service = %service.name, error = %e, "Failed to create booking");
            self.notifier.notify(Notice::error(format!("Could not book {}", service.name)));
            e
        })?;

        let booking = new_booking.into_booking(id);
        info!(booking_id = %booking.id, service = %service.name, "Booking created");
        self.notifier.notify(Notice::success(format!("{} booked", service.name)));
        self.bookings.push(booking.clone()).await;
        Ok(booking)
    }

    /// Start checkout for an unpaid booking.
    ///
    /// Returns the redirect target; the booking stays `Unpaid` until the
    /// backend confirms payment.
    pub async fn initiate_payment(&self, booking_id: &str, form: PaymentForm) -> Result<CheckoutRedirect> {
        require_quantity(form.quantity, errmsg::QUANTITY_POSITIVE)?;

        let booking = self
            .bookings
            .get(booking_id)
            .await
            .ok_or_else(|| DashboardError::not_found("booking", booking_id))?;
        require_status(booking.status(), BookingStatus::Unpaid, errmsg::BOOKING_NOT_UNPAID)?;

        let location = or_default(form.location.as_deref(), &self.checkout.default_location);
        let request = checkout_request(&booking, form.quantity, location, form.phone);

        match self.api.create_checkout_session(&request).await {
            Ok(session) => {
                info!(
                    booking_id = %booking_id,
                    quantity = request.quantity,
                    total_price = request.total_price,
                    "Checkout session created"
                );
                Ok(CheckoutRedirect {
                    url: session.url,
                    total_price: request.total_price,
                    currency: self.checkout.currency.clone(),
                })
            }
            Err(e) => {
                error!(booking_id = %booking_id, error = %e, "Checkout session failed");
                self.notifier.notify(Notice::error("Could not start payment, please try again"));
                Err(e.into())
            }
        }
    }

    /// Cancel an unpaid booking. The caller has already confirmed with the user.
    pub async fn cancel_booking(&self, booking_id: &str) -> Result<()> {
        let email = self.session.email().await?;
        cancel_unpaid(
            self.api.as_ref(),
            &self.bookings,
            self.notifier.as_ref(),
            booking_id,
            &email,
        )
        .await
    }

    /// The signed-in client's confirmed payments.
    pub async fn payment_history(&self) -> Result<Vec<Payment>> {
        let email = self.session.email().await?;
        let payments = self.api.list_client_payments(&email).await.map_err(|e| {
            error!(email = %email, error = %e, "Failed to load payment history");
            self.notifier.notify(Notice::error("Could not load payment history"));
            e
        })?;
        Ok(payments)
    }
}

/// Category selector of the admin booking list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    /// Parse the selector value; `"All"` selects every category.
    pub fn parse(value: &str) -> Self {
        if value.is_empty() || value == "All" {
            Self::All
        } else {
            Self::Exact(value.to_string())
        }
    }

    fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(expected) => expected == category,
        }
    }
}

/// Admin booking list filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookingFilter {
    /// Case-insensitive substring of the customer's name or email.
    pub search: String,
    pub category: CategoryFilter,
}

impl BookingFilter {
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        let needle = self.search.to_lowercase();
        let by_customer = booking.user.name.to_lowercase().contains(&needle)
            || booking.user.email.to_lowercase().contains(&needle);
        by_customer && self.category.matches(&booking.service.category)
    }
}

/// Bookings passing the filter, in input order.
pub fn filter_bookings(bookings: &[Booking], filter: &BookingFilter) -> Vec<Booking> {
    bookings
        .iter()
        .filter(|booking| filter.matches(booking))
        .cloned()
        .collect()
}

/// Admin booking management controller.
pub struct AdminBookings {
    api: Arc<dyn MarketplaceApi>,
    session: Arc<Session>,
    notifier: Arc<dyn Notifier>,
    bookings: WorkingSet<Booking>,
}

impl AdminBookings {
    pub fn new(api: Arc<dyn MarketplaceApi>, session: Arc<Session>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            session,
            notifier,
            bookings: WorkingSet::new(),
        }
    }

    /// Load every booking in the system.
    pub async fn load(&self) -> Result<Vec<Booking>> {
        let bookings = self.api.list_bookings().await.map_err(|e| {
            error!(error = %e, "Failed to load bookings");
            self.notifier.notify(Notice::error("Could not load bookings"));
            e
        })?;
        self.bookings.replace(bookings.clone()).await;
        Ok(bookings)
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.bookings.all().await
    }

    pub async fn filter(&self, filter: &BookingFilter) -> Vec<Booking> {
        filter_bookings(&self.bookings.all().await, filter)
    }

    /// Distinct categories, sorted, for the category selector.
    pub async fn categories(&self) -> Vec<String> {
        self.bookings
            .all()
            .await
            .into_iter()
            .map(|booking| booking.service.category)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Cancel an unpaid booking on behalf of its client.
    pub async fn cancel(&self, booking_id: &str) -> Result<()> {
        let admin = self.session.email().await?;
        cancel_unpaid(
            self.api.as_ref(),
            &self.bookings,
            self.notifier.as_ref(),
            booking_id,
            &admin,
        )
        .await
    }
}
