//! Staff stall management: releasing reserved stalls and reserving stalls
//! on a vendor's behalf.

use super::announce;
use crate::environment::PortalEnvironment;
use crate::state::PortalState;
use crate::types::{Notification, ReservationId, StallId, StallStatus};
use bookfair_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Holder recorded on stalls reserved from the staff console
pub const STAFF_HOLDER: &str = "staff";

/// Actions for staff stall management
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StaffAction {
    // ========== Commands ==========
    /// Command: Return a reserved stall to the pool
    ReleaseStall {
        /// Stall to release
        id: StallId,
    },

    /// Command: Reserve an available stall from the staff console
    ManuallyReserve {
        /// Stall to reserve
        id: StallId,
    },

    // ========== Events ==========
    /// Event: Stall released
    StallReleased {
        /// Released stall
        id: StallId,
        /// Ledger entry the stall was taken from, if any
        reservation: Option<ReservationId>,
    },

    /// Event: Stall reserved by staff
    StallManuallyReserved {
        /// Reserved stall
        id: StallId,
    },

    /// Event: Command validation failed
    ValidationFailed {
        /// Error message
        error: String,
    },
}

/// Reducer for staff stall management
#[derive(Clone, Debug, Default)]
pub struct StallManagementReducer;

impl StallManagementReducer {
    /// Creates a new `StallManagementReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_status(
        state: &PortalState,
        id: &StallId,
        expected: StallStatus,
    ) -> Result<(), String> {
        let Some(stall) = state.catalog.get(id) else {
            return Err(format!("Stall {id} not found"));
        };
        if stall.status != expected {
            return Err(format!("Stall {id} is {}, not {expected}", stall.status));
        }
        Ok(())
    }

    /// Applies an event to state
    fn apply_event(state: &mut PortalState, action: &StaffAction) {
        match action {
            StaffAction::StallReleased { id, reservation } => {
                let mut price = None;
                if let Some(stall) = state.catalog.get_mut(id) {
                    stall.status = StallStatus::Available;
                    stall.reserved_by = None;
                    price = Some(stall.price);
                }
                if let (Some(price), Some(reservation)) = (price, reservation) {
                    state.ledger.release_stall(reservation, id, price);
                }
                state.last_notification =
                    Some(Notification::success(format!("Stall {id} released")));
            },
            StaffAction::StallManuallyReserved { id } => {
                if let Some(stall) = state.catalog.get_mut(id) {
                    stall.status = StallStatus::Reserved;
                    stall.reserved_by = Some(STAFF_HOLDER.to_string());
                }
                state.last_notification =
                    Some(Notification::success(format!("Stall {id} reserved by staff")));
            },
            StaffAction::ValidationFailed { error } => {
                state.last_notification = Some(Notification::error(error.clone()));
            },
            // Commands are not applied to state
            StaffAction::ReleaseStall { .. } | StaffAction::ManuallyReserve { .. } => {},
        }
    }

    /// Applies a validated event and announces its outcome
    fn commit(
        state: &mut PortalState,
        env: &PortalEnvironment,
        event: &StaffAction,
    ) -> SmallVec<[Effect<StaffAction>; 4]> {
        Self::apply_event(state, event);
        match state.last_notification.clone() {
            Some(notification) => smallvec![announce(env, notification)],
            None => SmallVec::new(),
        }
    }
}

impl Reducer for StallManagementReducer {
    type State = PortalState;
    type Action = StaffAction;
    type Environment = PortalEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let event = match action {
            // ========== Commands ==========
            StaffAction::ReleaseStall { id } => {
                match Self::validate_status(state, &id, StallStatus::Reserved) {
                    Ok(()) => {
                        let reservation = state.ledger.holding(&id).map(|r| r.id.clone());
                        tracing::info!(stall = %id, ?reservation, "Stall released by staff");
                        StaffAction::StallReleased { id, reservation }
                    },
                    Err(error) => StaffAction::ValidationFailed { error },
                }
            },

            StaffAction::ManuallyReserve { id } => {
                match Self::validate_status(state, &id, StallStatus::Available) {
                    Ok(()) => {
                        tracing::info!(stall = %id, "Stall reserved by staff");
                        StaffAction::StallManuallyReserved { id }
                    },
                    Err(error) => StaffAction::ValidationFailed { error },
                }
            },

            // ========== Events ==========
            StaffAction::StallReleased { .. }
            | StaffAction::StallManuallyReserved { .. }
            | StaffAction::ValidationFailed { .. } => {
                Self::apply_event(state, &action);
                return SmallVec::new();
            },
        };

        Self::commit(state, env, &event)
    }
}
