//! Backend endpoint paths.
//!
//! Path segments taken from user data (emails, ids) are percent-encoded.

/// Percent-encode a single path segment.
fn segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

pub const SERVICES: &str = "/services";
pub const BOOKINGS: &str = "/booking-data";
pub const CHECKOUT_SESSION: &str = "/create-checkout-session";
pub const PAYMENTS: &str = "/payments";
pub const DECORATORS: &str = "/decorators";
pub const DECORATOR_REQUESTS: &str = "/requests";
pub const ALL_USERS: &str = "/all-users";
pub const USER: &str = "/user";

pub fn service(id: &str) -> String {
    format!("{}/{}", SERVICES, segment(id))
}

/// Bookings for one user; the backend keys them by email.
pub fn user_bookings(uid: &str) -> String {
    format!("{}/{}", BOOKINGS, segment(uid))
}

pub fn booking(id: &str) -> String {
    format!("{}/{}", BOOKINGS, segment(id))
}

pub fn client_payments(email: &str) -> String {
    format!("/my-payments/{}", segment(email))
}

pub fn decorator_payments(email: &str) -> String {
    format!("/payment/decorator/{}", segment(email))
}

pub fn assign_decorator(payment_id: &str) -> String {
    format!("/add-decorator/{}", segment(payment_id))
}

pub fn work_status(payment_id: &str) -> String {
    format!("/decorator-update/{}", segment(payment_id))
}

pub fn delete_request(id: &str) -> String {
    format!("/delete-request/{}", segment(id))
}

pub fn update_role(email: &str) -> String {
    format!("/update-role/{}", segment(email))
}

pub fn user_role(email: &str) -> String {
    format!("/user/role/{}", segment(email))
}
