//! Navigable pages of the portal and which role each one requires.

use crate::session::Role;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A path that names no page
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no page at '{0}'")]
pub struct UnknownRoute(pub String);

/// A page of the portal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page
    Home,
    /// Vendor login and registration
    Login,
    /// Vendor dashboard
    Dashboard,
    /// Stall map and selection
    Reserve,
    /// Post-confirmation summary
    Success,
    /// Genre picker
    Genres,
    /// Vendor's own reservations
    MyReservations,
    /// Staff login
    StaffLogin,
    /// Staff occupancy dashboard
    StaffDashboard,
    /// Staff stall management
    StaffStalls,
    /// Staff reservation list
    StaffReservations,
}

impl Route {
    /// Every page, public ones first
    pub const ALL: [Self; 11] = [
        Self::Home,
        Self::Login,
        Self::StaffLogin,
        Self::Dashboard,
        Self::Reserve,
        Self::Success,
        Self::Genres,
        Self::MyReservations,
        Self::StaffDashboard,
        Self::StaffStalls,
        Self::StaffReservations,
    ];

    /// URL path of the page
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Reserve => "/reserve",
            Self::Success => "/success",
            Self::Genres => "/genres",
            Self::MyReservations => "/my-reservations",
            Self::StaffLogin => "/employee/login",
            Self::StaffDashboard => "/employee/dashboard",
            Self::StaffStalls => "/employee/stalls",
            Self::StaffReservations => "/employee/reservations",
        }
    }

    /// Role a visitor must be signed in as, `None` for public pages
    #[must_use]
    pub const fn required_role(self) -> Option<Role> {
        match self {
            Self::Home | Self::Login | Self::StaffLogin => None,
            Self::Dashboard
            | Self::Reserve
            | Self::Success
            | Self::Genres
            | Self::MyReservations => Some(Role::Vendor),
            Self::StaffDashboard | Self::StaffStalls | Self::StaffReservations => Some(Role::Staff),
        }
    }

    /// Where an unauthenticated visitor of `role` is sent
    #[must_use]
    pub const fn login_for(role: Role) -> Self {
        match role {
            Role::Vendor => Self::Login,
            Role::Staff => Self::StaffLogin,
        }
    }

    /// Where `role` lands after signing out
    #[must_use]
    pub const fn after_logout(role: Role) -> Self {
        match role {
            Role::Vendor => Self::Home,
            Role::Staff => Self::StaffLogin,
        }
    }
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        Self::ALL
            .into_iter()
            .find(|route| route.path() == path)
            .ok_or_else(|| UnknownRoute(path.to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
