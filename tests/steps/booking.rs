//! Booking/payment transition step definitions.

use std::fmt;
use std::sync::Arc;

use cucumber::{given, then, when, World};
use decorhub::booking::{CheckoutRedirect, ClientBookings, PaymentForm};
use decorhub::config::CheckoutConfig;
use decorhub::test_utils::{booking_for, signed_in, MockBackend, RecordingNotifier};
use decorhub::{DashboardError, Level};
use decorhub_client::{BookingStatus, Role};

use super::split_call;

/// Test context for booking scenarios.
#[derive(World)]
#[world(init = Self::new)]
pub struct BookingWorld {
    backend: Arc<MockBackend>,
    notifier: Arc<RecordingNotifier>,
    bookings: Option<ClientBookings>,
    redirect: Option<CheckoutRedirect>,
    error: Option<DashboardError>,
}

impl fmt::Debug for BookingWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingWorld")
            .field("redirect", &self.redirect)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl BookingWorld {
    fn new() -> Self {
        Self {
            backend: Arc::new(MockBackend::new()),
            notifier: Arc::new(RecordingNotifier::default()),
            bookings: None,
            redirect: None,
            error: None,
        }
    }

    async fn controller(&self) -> &ClientBookings {
        let bookings = self.bookings.as_ref().expect("client not signed in");
        bookings.load().await.expect("bookings should load");
        bookings
    }
}

// --- Given steps ---

#[given(expr = "a signed-in client {string}")]
async fn given_signed_in_client(world: &mut BookingWorld, email: String) {
    let session = signed_in(&world.backend, "Client", &email, Role::User).await;
    world.bookings = Some(ClientBookings::new(
        world.backend.clone(),
        session,
        world.notifier.clone(),
        CheckoutConfig::default(),
    ));
}

#[given(expr = "an unpaid booking {string} for {string} priced {float} per unit")]
async fn given_unpaid_booking(world: &mut BookingWorld, id: String, email: String, price: f64) {
    world.backend.add_booking(booking_for(&id, &email, price)).await;
}

#[given(expr = "the backend fails {string}")]
async fn given_backend_fails(world: &mut BookingWorld, prefix: String) {
    world.backend.set_fail(&prefix, true).await;
}

// --- When steps ---

#[when(expr = "the client pays for booking {string} with quantity {int} at {string}")]
async fn when_client_pays(world: &mut BookingWorld, id: String, quantity: u32, location: String) {
    let form = PaymentForm::new(quantity).with_location(location);
    let result = world.controller().await.initiate_payment(&id, form).await;
    match result {
        Ok(redirect) => world.redirect = Some(redirect),
        Err(e) => world.error = Some(e),
    }
}

#[when(expr = "the client cancels booking {string}")]
async fn when_client_cancels(world: &mut BookingWorld, id: String) {
    let result = world.controller().await.cancel_booking(&id).await;
    if let Err(e) = result {
        world.error = Some(e);
    }
}

// --- Then steps ---

#[then(expr = "the checkout payload has total price {float} and location {string}")]
async fn then_checkout_payload(world: &mut BookingWorld, total: f64, location: String) {
    let sent = world.backend.checkout_requests().await;
    let last = sent.last().expect("no checkout request sent");
    assert_eq!(last.total_price, total);
    assert_eq!(last.location, location);
}

#[then("the client is redirected to checkout")]
async fn then_redirected(world: &mut BookingWorld) {
    let redirect = world.redirect.as_ref().expect("no redirect");
    assert!(!redirect.url.is_empty());
}

#[then(expr = "booking {string} is still unpaid")]
async fn then_still_unpaid(world: &mut BookingWorld, id: String) {
    let booking = world.backend.booking(&id).await.expect("booking missing");
    assert_eq!(booking.status(), BookingStatus::Unpaid);
}

#[then("the operation fails with a validation error")]
async fn then_validation_error(world: &mut BookingWorld) {
    assert!(matches!(world.error, Some(DashboardError::Validation(_))));
}

#[then("no checkout session was requested")]
async fn then_no_checkout(world: &mut BookingWorld) {
    assert!(world.backend.checkout_requests().await.is_empty());
}

#[then(expr = "the backend received {string}")]
async fn then_backend_received(world: &mut BookingWorld, call: String) {
    let (method, path) = split_call(&call);
    assert_eq!(world.backend.count_requests(method, path).await, 1);
}

#[then(expr = "booking {string} is no longer listed")]
async fn then_not_listed(world: &mut BookingWorld, id: String) {
    let bookings = world.bookings.as_ref().expect("client not signed in");
    assert!(bookings.bookings().await.iter().all(|b| b.id != id));
}

#[then(expr = "booking {string} is listed")]
async fn then_listed(world: &mut BookingWorld, id: String) {
    let bookings = world.bookings.as_ref().expect("client not signed in");
    assert!(bookings.bookings().await.iter().any(|b| b.id == id));
}

#[then("the client sees an error notice")]
async fn then_error_notice(world: &mut BookingWorld) {
    assert_eq!(world.notifier.last().map(|n| n.level), Some(Level::Error));
}
