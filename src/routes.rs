//! Dashboard routes and the roles allowed on each.

use decorhub_client::Role;

/// Where unauthenticated users are sent.
pub const LOGIN_PATH: &str = "/login";

/// Role-scoped dashboard sub-routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DashboardRoute {
    Profile,
    MyBookings,
    PaymentHistory,
    ManageBookings,
    AssignDecorator,
    ManageUsers,
    DecoratorRequests,
    MyProjects,
}

impl DashboardRoute {
    pub const ALL: &'static [DashboardRoute] = &[
        Self::Profile,
        Self::MyBookings,
        Self::PaymentHistory,
        Self::ManageBookings,
        Self::AssignDecorator,
        Self::ManageUsers,
        Self::DecoratorRequests,
        Self::MyProjects,
    ];

    pub const fn path(&self) -> &'static str {
        match self {
            Self::Profile => "/dashboard/profile",
            Self::MyBookings => "/dashboard/my-bookings",
            Self::PaymentHistory => "/dashboard/payment-history",
            Self::ManageBookings => "/dashboard/manage-bookings",
            Self::AssignDecorator => "/dashboard/assign-decorator",
            Self::ManageUsers => "/dashboard/manage-users",
            Self::DecoratorRequests => "/dashboard/decorator-requests",
            Self::MyProjects => "/dashboard/my-projects",
        }
    }

    pub const fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Self::Profile => &[Role::User, Role::Decorator, Role::Admin],
            Self::MyBookings | Self::PaymentHistory => &[Role::User],
            Self::ManageBookings
            | Self::AssignDecorator
            | Self::ManageUsers
            | Self::DecoratorRequests => &[Role::Admin],
            Self::MyProjects => &[Role::Decorator],
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_end_matches('/');
        Self::ALL.iter().copied().find(|route| route.path() == path)
    }

    /// Routes a role may open, in menu order.
    pub fn visible_to(role: Role) -> Vec<DashboardRoute> {
        Self::ALL
            .iter()
            .copied()
            .filter(|route| route.allowed_roles().contains(&role))
            .collect()
    }
}
