//! Cucumber feature tests for the booking lifecycle.
//!
//! Scenarios run against the in-memory backend from `decorhub::test_utils`.
//! Run with:
//!
//! ```bash
//! cargo test --test features --features test-utils
//! ```

mod steps;

use cucumber::World;
use steps::assignment::AssignmentWorld;
use steps::booking::BookingWorld;
use steps::role_guard::GuardWorld;
use steps::work_status::ProjectWorld;

#[tokio::main]
async fn main() {
    // Run booking/payment transition tests
    println!("\n=== Running Booking Tests ===\n");
    BookingWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("features/booking.feature")
        .await;

    // Run decorator assignment tests
    println!("\n=== Running Assignment Tests ===\n");
    AssignmentWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("features/assignment.feature")
        .await;

    // Run work status tests
    println!("\n=== Running Work Status Tests ===\n");
    ProjectWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("features/work_status.feature")
        .await;

    // Run role guard tests
    println!("\n=== Running Role Guard Tests ===\n");
    GuardWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("features/role_guard.feature")
        .await;
}
