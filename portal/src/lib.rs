//! Stall reservation portal for the Colombo International Book Fair.
//!
//! Publishers browse a generated hall of stalls, select up to three, confirm
//! a reservation and record the literary genres they publish. Fair staff see
//! occupancy, release or manually reserve stalls and page through the
//! reservation list.
//!
//! All of it runs on one [`PortalStore`]: feature reducers in [`aggregates`]
//! validate commands into events and mutate the shared [`PortalState`];
//! [`projections`] and [`views`] read from it.
//!
//! # Quick Start
//!
//! ```no_run
//! use bookfair::{BookingAction, PortalEnvironment, PortalReducer, PortalState, PortalStore};
//! use bookfair::catalog::CatalogGenerator;
//! use bookfair::environment::TracingNotifier;
//! use bookfair_core::environment::SystemClock;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = CatalogGenerator::default().generate(&mut rand::thread_rng());
//! let env = PortalEnvironment::new(Arc::new(SystemClock), Arc::new(TracingNotifier::default()));
//! let store = PortalStore::new(PortalState::new(catalog, 3), PortalReducer::new(), env);
//!
//! store.send(BookingAction::ToggleStall { id: "A01".parse()? }.into()).await?;
//! let total = store.state(|s| s.total_price()).await;
//! println!("Selected total: {total}");
//! # Ok(())
//! # }
//! ```

pub mod aggregates;
pub mod catalog;
pub mod config;
pub mod environment;
pub mod ledger;
pub mod projections;
pub mod routes;
pub mod session;
pub mod shell;
pub mod state;
pub mod summary;
pub mod types;
pub mod views;

// Re-export commonly used types
pub use aggregates::{BookingAction, GenreAction, PortalAction, PortalReducer, StaffAction};
pub use environment::PortalEnvironment;
pub use state::PortalState;

/// The portal's single store
pub type PortalStore =
    bookfair_runtime::Store<PortalState, PortalAction, PortalEnvironment, PortalReducer>;
