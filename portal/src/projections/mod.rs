//! Read-only views derived from the shared portal state.

pub mod occupancy;
pub mod reservation_list;

pub use occupancy::{OccupancyStats, StallCounts};
pub use reservation_list::{DEFAULT_PAGE_SIZE, ReservationPage, VendorDashboard};
