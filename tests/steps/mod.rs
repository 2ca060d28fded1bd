//! Step definition modules for Cucumber feature tests.

pub mod assignment;
pub mod booking;
pub mod role_guard;
pub mod work_status;

/// Split `"METHOD /path"` into its parts.
pub fn split_call(call: &str) -> (&str, &str) {
    call.split_once(' ').unwrap_or((call, ""))
}
