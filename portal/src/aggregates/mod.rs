//! Feature reducers and the root reducer that composes them.
//!
//! Every feature works on the same [`PortalState`], so staff operations and
//! the vendor booking flow see one catalog. The root [`PortalReducer`] routes
//! each [`PortalAction`] to its feature and lifts the feature's effects back
//! into `PortalAction` with [`Effect::map`].

pub mod booking;
pub mod genres;
pub mod stall_management;

use crate::environment::PortalEnvironment;
use crate::state::PortalState;
use crate::types::Notification;
use bookfair_core::{SmallVec, effect::Effect, reducer::Reducer};
use std::sync::Arc;

pub use booking::{BookingAction, BookingReducer};
pub use genres::{GenreAction, GenreReducer};
pub use stall_management::{StaffAction, StallManagementReducer};

/// Delivers a notification through the environment's notifier.
///
/// The caller records the notification in state; this only describes the
/// delivery.
pub(crate) fn announce<A>(env: &PortalEnvironment, notification: Notification) -> Effect<A> {
    let notifier = Arc::clone(&env.notifier);
    Effect::fire_and_forget(async move {
        notifier.notify(&notification);
    })
}

/// Every input the portal understands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortalAction {
    /// Vendor stall selection and reservation
    Booking(BookingAction),
    /// Staff stall management
    Staff(StaffAction),
    /// Vendor genre picker
    Genres(GenreAction),
}

impl From<BookingAction> for PortalAction {
    fn from(action: BookingAction) -> Self {
        Self::Booking(action)
    }
}

impl From<StaffAction> for PortalAction {
    fn from(action: StaffAction) -> Self {
        Self::Staff(action)
    }
}

impl From<GenreAction> for PortalAction {
    fn from(action: GenreAction) -> Self {
        Self::Genres(action)
    }
}

/// Root reducer: dispatches to the feature reducers
#[derive(Clone, Debug, Default)]
pub struct PortalReducer {
    booking: BookingReducer,
    staff: StallManagementReducer,
    genres: GenreReducer,
}

impl PortalReducer {
    /// Creates a new `PortalReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            booking: BookingReducer::new(),
            staff: StallManagementReducer::new(),
            genres: GenreReducer::new(),
        }
    }
}

impl Reducer for PortalReducer {
    type State = PortalState;
    type Action = PortalAction;
    type Environment = PortalEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            PortalAction::Booking(action) => self
                .booking
                .reduce(state, action, env)
                .into_iter()
                .map(|effect| effect.map(PortalAction::Booking))
                .collect(),
            PortalAction::Staff(action) => self
                .staff
                .reduce(state, action, env)
                .into_iter()
                .map(|effect| effect.map(PortalAction::Staff))
                .collect(),
            PortalAction::Genres(action) => self
                .genres
                .reduce(state, action, env)
                .into_iter()
                .map(|effect| effect.map(PortalAction::Genres))
                .collect(),
        }
    }
}
