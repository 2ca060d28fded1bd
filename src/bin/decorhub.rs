//! decorhub: dashboard overview for the signed-in user
//!
//! Signs in against the marketplace backend, resolves the user's role, and
//! prints each dashboard route the role may open with a one-line summary.
//!
//! ## Configuration
//! - DECORHUB_TOKEN: identity provider access token (bearer)
//! - DECORHUB_USER_EMAIL / DECORHUB_USER_NAME: signed-in identity
//! - DECORHUB_CONFIG or `--config <path>`: YAML configuration file
//! - DECORHUB__API__BASE_URL etc.: per-key overrides
//! - DECORHUB_LOG: log filter (default `info`)

use std::sync::Arc;

use tracing::{error, info};

use decorhub::config::{Config, TOKEN_ENV_VAR, USER_EMAIL_ENV_VAR, USER_NAME_ENV_VAR};
use decorhub::utils::bootstrap::{init_tracing, parse_config_path};
use decorhub::{Dashboard, DashboardRoute, Result, TracingNotifier};
use decorhub_client::{UserProfile, WorkStatus};

fn required_env(name: &str) -> std::result::Result<String, String> {
    std::env::var(name).map_err(|_| format!("{} must be set", name))
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config_path = parse_config_path(std::env::args().skip(1));
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let token = required_env(TOKEN_ENV_VAR)?;
    let email = required_env(USER_EMAIL_ENV_VAR)?;
    let name = std::env::var(USER_NAME_ENV_VAR).unwrap_or_else(|_| email.clone());

    let dashboard = Dashboard::connect(config, Arc::new(TracingNotifier))?;
    let role = dashboard
        .sign_in(
            UserProfile {
                name,
                email: email.clone(),
                image_url: None,
            },
            token,
        )
        .await?;
    info!(email = %email, role = %role, "Signed in");

    for route in dashboard.rendered_routes().await {
        match summarize(&dashboard, route).await {
            Ok(summary) => println!("{:<32} {}", route.path(), summary),
            Err(e) => println!("{:<32} unavailable: {}", route.path(), e),
        }
    }

    if let Some(redirect) = dashboard.session().take_redirect().await {
        println!("session ended, continue at {}", redirect);
    }
    Ok(())
}

async fn summarize(dashboard: &Dashboard, route: DashboardRoute) -> Result<String> {
    let summary = match route {
        DashboardRoute::Profile => {
            let user = dashboard.session().user().await?;
            let role = dashboard
                .session()
                .role()
                .await
                .map(|r| r.to_string())
                .unwrap_or_else(|| "unresolved".into());
            format!("{} <{}> ({})", user.name, user.email, role)
        }
        DashboardRoute::MyBookings => {
            let bookings = dashboard.client_bookings().load().await?;
            format!("{} bookings", bookings.len())
        }
        DashboardRoute::PaymentHistory => {
            let payments = dashboard.client_bookings().payment_history().await?;
            let total: f64 = payments.iter().map(|p| p.price * f64::from(p.quantity)).sum();
            format!(
                "{} payments, {:.2} {}",
                payments.len(),
                total,
                dashboard.config().checkout.currency
            )
        }
        DashboardRoute::ManageBookings => {
            let admin = dashboard.admin_bookings();
            let bookings = admin.load().await?;
            format!(
                "{} bookings across {} categories",
                bookings.len(),
                admin.categories().await.len()
            )
        }
        DashboardRoute::AssignDecorator => {
            let board = dashboard.assignment_board();
            board.load().await?;
            format!(
                "{} unassigned of {} payments, {} decorators",
                board.unassigned().await.len(),
                board.payments().await.len(),
                board.decorators().await.len()
            )
        }
        DashboardRoute::ManageUsers => {
            let users = dashboard.user_admin().load().await?;
            format!("{} users", users.len())
        }
        DashboardRoute::DecoratorRequests => {
            let requests = dashboard.decorator_requests().load().await?;
            format!("{} pending requests", requests.len())
        }
        DashboardRoute::MyProjects => {
            let projects = dashboard.project_board().load().await?;
            let count = |status: WorkStatus| projects.iter().filter(|p| p.work_status() == status).count();
            format!(
                "{} pending, {} processing, {} completed",
                count(WorkStatus::Pending),
                count(WorkStatus::Processing),
                count(WorkStatus::Completed)
            )
        }
    };
    Ok(summary)
}
