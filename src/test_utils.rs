//! Test utilities and mock implementations.
//!
//! [`MockBackend`] implements every backend trait in memory, records each
//! call as `METHOD /path`, and can be told to fail calls by prefix.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use decorhub_client::routes;
use decorhub_client::{
    BookedService, Booking, BookingApi, BookingStatus, CatalogApi, CheckoutRequest,
    CheckoutSession, ClientError, Decorator, DecoratorAssignment, DecoratorRef, DecoratorRequest,
    NewBooking, Party, Payment, PaymentApi, PaymentStatus, Result as ClientResult, Role, Service,
    StatusCode, User, UserApi, UserProfile, WorkStatus, WorkStatusUpdate,
};
use tokio::sync::RwLock;

use crate::notify::{Level, Notice, Notifier};
use crate::session::Session;

/// A call received by the mock backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
}

/// In-memory marketplace backend.
#[derive(Debug, Default)]
pub struct MockBackend {
    services: RwLock<Vec<Service>>,
    bookings: RwLock<Vec<Booking>>,
    payments: RwLock<Vec<Payment>>,
    users: RwLock<Vec<User>>,
    requests: RwLock<Vec<DecoratorRequest>>,
    checkouts: RwLock<Vec<CheckoutRequest>>,
    calls: RwLock<Vec<RecordedCall>>,
    failing: RwLock<Vec<String>>,
    latency: RwLock<Option<Duration>>,
    unfiltered_decorator_payments: RwLock<bool>,
    next_id: AtomicU64,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Fail every call whose `METHOD /path` starts with `prefix`.
    pub async fn set_fail(&self, prefix: &str, fail: bool) {
        let mut failing = self.failing.write().await;
        failing.retain(|p| p != prefix);
        if fail {
            failing.push(prefix.to_string());
        }
    }

    /// Delay every call by `latency`.
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = Some(latency);
    }

    /// Return every payment from the decorator lookup, not only the
    /// decorator's own.
    pub async fn set_unfiltered_decorator_payments(&self, unfiltered: bool) {
        *self.unfiltered_decorator_payments.write().await = unfiltered;
    }

    async fn record(&self, method: &'static str, path: String) -> ClientResult<()> {
        let line = format!("{} {}", method, path);
        self.calls.write().await.push(RecordedCall { method, path });

        let latency = *self.latency.read().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        if self.failing.read().await.iter().any(|p| line.starts_with(p.as_str())) {
            return Err(ClientError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn missing(kind: &str, id: &str) -> ClientError {
        ClientError::Status {
            status: StatusCode::NOT_FOUND,
            body: format!("{} {} not found", kind, id),
        }
    }

    /// Calls received so far.
    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Number of calls with this method whose path starts with `path_prefix`.
    pub async fn count_requests(&self, method: &str, path_prefix: &str) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|call| call.method == method && call.path.starts_with(path_prefix))
            .count()
    }

    /// Add a user, returning its id.
    pub async fn add_user(&self, name: &str, email: &str, role: Role) -> String {
        let id = self.next_id("user");
        self.users.write().await.push(User {
            id: id.clone(),
            name: name.to_string(),
            email: email.to_string(),
            image_url: None,
            role,
        });
        id
    }

    pub async fn set_role(&self, email: &str, role: Role) {
        if let Some(user) = self.users.write().await.iter_mut().find(|u| u.email == email) {
            user.role = role;
        }
    }

    pub async fn user(&self, email: &str) -> Option<User> {
        self.users.read().await.iter().find(|u| u.email == email).cloned()
    }

    pub async fn add_service(&self, service: Service) {
        self.services.write().await.push(service);
    }

    pub async fn add_booking(&self, booking: Booking) {
        self.bookings.write().await.push(booking);
    }

    pub async fn booking(&self, id: &str) -> Option<Booking> {
        self.bookings.read().await.iter().find(|b| b.id == id).cloned()
    }

    pub async fn add_payment(&self, payment: Payment) {
        self.payments.write().await.push(payment);
    }

    pub async fn payment(&self, id: &str) -> Option<Payment> {
        self.payments.read().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn add_decorator_request(&self, request: DecoratorRequest) {
        self.requests.write().await.push(request);
    }

    pub async fn decorator_requests(&self) -> Vec<DecoratorRequest> {
        self.requests.read().await.clone()
    }

    /// Checkout bodies received so far.
    pub async fn checkout_requests(&self) -> Vec<CheckoutRequest> {
        self.checkouts.read().await.clone()
    }
}

#[async_trait]
impl CatalogApi for MockBackend {
    async fn list_services(&self) -> ClientResult<Vec<Service>> {
        self.record("GET", routes::SERVICES.to_string()).await?;
        Ok(self.services.read().await.clone())
    }

    async fn get_service(&self, id: &str) -> ClientResult<Service> {
        self.record("GET", routes::service(id)).await?;
        self.services
            .read()
            .await
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| Self::missing("service", id))
    }
}

#[async_trait]
impl BookingApi for MockBackend {
    async fn create_booking(&self, booking: &NewBooking) -> ClientResult<String> {
        self.record("POST", routes::BOOKINGS.to_string()).await?;
        let id = self.next_id("booking");
        self.bookings.write().await.push(booking.clone().into_booking(id.clone()));
        Ok(id)
    }

    async fn list_bookings(&self) -> ClientResult<Vec<Booking>> {
        self.record("GET", routes::BOOKINGS.to_string()).await?;
        Ok(self.bookings.read().await.clone())
    }

    async fn list_user_bookings(&self, uid: &str) -> ClientResult<Vec<Booking>> {
        self.record("GET", routes::user_bookings(uid)).await?;
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .filter(|b| b.user.email == uid)
            .cloned()
            .collect())
    }

    async fn delete_booking(&self, id: &str) -> ClientResult<()> {
        self.record("DELETE", routes::booking(id)).await?;
        let mut bookings = self.bookings.write().await;
        let index = bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| Self::missing("booking", id))?;
        bookings.remove(index);
        Ok(())
    }

    async fn create_checkout_session(&self, request: &CheckoutRequest) -> ClientResult<CheckoutSession> {
        self.record("POST", routes::CHECKOUT_SESSION.to_string()).await?;
        self.checkouts.write().await.push(request.clone());
        Ok(CheckoutSession {
            url: format!("https://checkout.test/{}", request.booking_id),
        })
    }
}

#[async_trait]
impl PaymentApi for MockBackend {
    async fn list_payments(&self) -> ClientResult<Vec<Payment>> {
        self.record("GET", routes::PAYMENTS.to_string()).await?;
        Ok(self.payments.read().await.clone())
    }

    async fn list_client_payments(&self, email: &str) -> ClientResult<Vec<Payment>> {
        self.record("GET", routes::client_payments(email)).await?;
        Ok(self
            .payments
            .read()
            .await
            .iter()
            .filter(|p| p.user_email == email)
            .cloned()
            .collect())
    }

    async fn list_decorator_payments(&self, email: &str) -> ClientResult<Vec<Payment>> {
        self.record("GET", routes::decorator_payments(email)).await?;
        let unfiltered = *self.unfiltered_decorator_payments.read().await;
        Ok(self
            .payments
            .read()
            .await
            .iter()
            .filter(|p| unfiltered || p.decorator.as_ref().is_some_and(|d| d.email == email))
            .cloned()
            .collect())
    }

    async fn assign_decorator(&self, payment_id: &str, body: &DecoratorAssignment) -> ClientResult<()> {
        self.record("PATCH", routes::assign_decorator(payment_id)).await?;
        let mut payments = self.payments.write().await;
        let payment = payments
            .iter_mut()
            .find(|p| p.id == payment_id)
            .ok_or_else(|| Self::missing("payment", payment_id))?;
        payment.decorator = Some(DecoratorRef {
            name: body.decoretor_name.clone(),
            email: body.decoretor_email.clone(),
        });
        Ok(())
    }

    async fn update_work_status(&self, payment_id: &str, body: &WorkStatusUpdate) -> ClientResult<()> {
        self.record("PATCH", routes::work_status(payment_id)).await?;
        let mut payments = self.payments.write().await;
        let payment = payments
            .iter_mut()
            .find(|p| p.id == payment_id)
            .ok_or_else(|| Self::missing("payment", payment_id))?;
        payment.work_status = Some(body.work_status);
        Ok(())
    }
}

#[async_trait]
impl UserApi for MockBackend {
    async fn upsert_user(&self, profile: &UserProfile) -> ClientResult<()> {
        self.record("POST", routes::USER.to_string()).await?;
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.email == profile.email) {
            Some(user) => {
                user.name = profile.name.clone();
                user.image_url = profile.image_url.clone();
            }
            None => {
                let id = self.next_id("user");
                users.push(User {
                    id,
                    name: profile.name.clone(),
                    email: profile.email.clone(),
                    image_url: profile.image_url.clone(),
                    role: Role::User,
                });
            }
        }
        Ok(())
    }

    async fn get_role(&self, email: &str) -> ClientResult<Role> {
        self.record("GET", routes::user_role(email)).await?;
        self.user(email)
            .await
            .map(|u| u.role)
            .ok_or_else(|| Self::missing("user", email))
    }

    async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.record("GET", routes::ALL_USERS.to_string()).await?;
        Ok(self.users.read().await.clone())
    }

    async fn update_role(&self, email: &str, role: Role) -> ClientResult<()> {
        self.record("PUT", routes::update_role(email)).await?;
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| Self::missing("user", email))?;
        user.role = role;
        Ok(())
    }

    async fn list_decorators(&self) -> ClientResult<Vec<Decorator>> {
        self.record("GET", routes::DECORATORS.to_string()).await?;
        Ok(self
            .users
            .read()
            .await
            .iter()
            .filter(|u| u.role == Role::Decorator)
            .map(|u| Decorator {
                id: u.id.clone(),
                name: u.name.clone(),
                email: u.email.clone(),
                photo: u.image_url.clone(),
            })
            .collect())
    }

    async fn list_decorator_requests(&self) -> ClientResult<Vec<DecoratorRequest>> {
        self.record("GET", routes::DECORATOR_REQUESTS.to_string()).await?;
        Ok(self.requests.read().await.clone())
    }

    async fn delete_decorator_request(&self, id: &str) -> ClientResult<()> {
        self.record("DELETE", routes::delete_request(id)).await?;
        let mut requests = self.requests.write().await;
        let index = requests
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Self::missing("request", id))?;
        requests.remove(index);
        Ok(())
    }
}

/// Notifier that keeps every notice for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices().pop()
    }

    pub fn count(&self, level: Level) -> usize {
        self.notices().iter().filter(|n| n.level == level).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn profile(name: &str, email: &str) -> UserProfile {
    UserProfile {
        name: name.to_string(),
        email: email.to_string(),
        image_url: None,
    }
}

fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 5, 10, 0, 0).single().unwrap_or_default()
}

fn studio() -> Party {
    Party {
        name: "Studio".to_string(),
        email: "studio@x.com".to_string(),
        photo: None,
    }
}

/// An unpaid booking by `client@x.com` for a 500 BDT wedding service.
pub fn booking(id: &str) -> Booking {
    booking_for(id, "client@x.com", 500.0)
}

/// An unpaid booking by `email` at `price`.
pub fn booking_for(id: &str, email: &str, price: f64) -> Booking {
    Booking {
        id: id.to_string(),
        user: Party {
            name: "Client".to_string(),
            email: email.to_string(),
            photo: None,
        },
        provider: studio(),
        service: BookedService {
            name: "Wedding Stage".to_string(),
            category: "wedding".to_string(),
            price,
            unit: "per stage".to_string(),
            image: None,
            book_time: fixed_time(),
            status: BookingStatus::Unpaid,
        },
    }
}

/// A catalog service offered by `studio@x.com`.
pub fn service(id: &str, price: f64) -> Service {
    Service {
        id: id.to_string(),
        name: "Wedding Stage".to_string(),
        category: "wedding".to_string(),
        price,
        unit: "per stage".to_string(),
        image: None,
        description: None,
        provider: Some(studio()),
        reviews: Vec::new(),
    }
}

/// A paid payment with no decorator assigned.
pub fn paid_payment(id: &str) -> Payment {
    Payment {
        id: id.to_string(),
        service_name: "Wedding Stage".to_string(),
        category: "wedding".to_string(),
        price: 500.0,
        quantity: 1,
        unit: "per stage".to_string(),
        customer: "Client".to_string(),
        user_email: "client@x.com".to_string(),
        provider_name: "Studio".to_string(),
        provider_email: "studio@x.com".to_string(),
        decorator: None,
        location: "Dhaka".to_string(),
        phone: None,
        transaction_id: format!("tx_{}", id),
        status: PaymentStatus::Paid,
        date: fixed_time(),
        work_status: None,
    }
}

/// A paid payment assigned to `decorator_email` at `status`.
pub fn assigned_payment(id: &str, decorator_email: &str, status: WorkStatus) -> Payment {
    Payment {
        decorator: Some(DecoratorRef {
            name: "Decorator".to_string(),
            email: decorator_email.to_string(),
        }),
        work_status: Some(status),
        ..paid_payment(id)
    }
}

pub fn decorator_request(id: &str, name: &str, email: &str) -> DecoratorRequest {
    DecoratorRequest {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        photo: None,
        request_date: fixed_time(),
    }
}

/// A session signed in against `backend` as a new user with `role`.
pub async fn signed_in(backend: &MockBackend, name: &str, email: &str, role: Role) -> Arc<Session> {
    if backend.user(email).await.is_none() {
        backend.add_user(name, email, role).await;
    } else {
        backend.set_role(email, role).await;
    }
    let session = Arc::new(Session::new());
    // The role lookup only fails if a test injected a failure first.
    let _ = session.sign_in(backend, profile(name, email), "test-token".to_string()).await;
    session
}
