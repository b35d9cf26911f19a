//! Vendor booking: stall selection, the size filter and the reservation
//! confirmation step.
//!
//! Commands are validated against the shared catalog, turned into events and
//! applied. Rejected commands leave the catalog untouched and surface a
//! notification instead.

use super::announce;
use crate::catalog::SizeFilter;
use crate::environment::PortalEnvironment;
use crate::state::{BookingState, PortalState};
use crate::summary::ReservationSummary;
use crate::types::{
    Money, Notification, ReservationId, ReservationStatus, StallId, StallStatus,
};
use bookfair_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use chrono::{DateTime, Utc};

/// Shown when a reservation is confirmed
pub const RESERVATION_SUCCESS: &str = "Reservation successful!";

/// Shown when reserving with nothing selected
pub const EMPTY_SELECTION: &str = "Please select at least one stall";

/// Actions for the booking flow
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BookingAction {
    // ========== Commands ==========
    /// Command: Select an available stall or deselect a selected one
    ToggleStall {
        /// Stall to toggle
        id: StallId,
    },

    /// Command: Narrow the stall map to one size
    SetSizeFilter {
        /// New filter
        filter: SizeFilter,
    },

    /// Command: Open the confirmation step for the current selection
    RequestReservation,

    /// Command: Close the confirmation step, keeping the selection
    CancelConfirmation,

    /// Command: Reserve the selected stalls
    ConfirmReservation {
        /// Vendor the reservation is attributed to
        vendor: String,
    },

    /// Command: Drop the signed-out vendor's selection and confirmation step
    EndSession,

    // ========== Events ==========
    /// Event: Stall added to the selection
    StallSelected {
        /// Selected stall
        id: StallId,
    },

    /// Event: Stall removed from the selection
    StallDeselected {
        /// Deselected stall
        id: StallId,
    },

    /// Event: Size filter changed
    SizeFilterChanged {
        /// New filter
        filter: SizeFilter,
    },

    /// Event: Confirmation step opened
    ConfirmationOpened,

    /// Event: Confirmation step closed without reserving
    ConfirmationCancelled,

    /// Event: Selected stalls reserved
    ReservationConfirmed {
        /// New ledger entry
        reservation_id: ReservationId,
        /// Vendor holding the stalls
        vendor: String,
        /// Reserved stalls, in selection order
        stalls: Vec<StallId>,
        /// Combined price
        total_price: Money,
        /// When the reservation was made
        reserved_at: DateTime<Utc>,
    },

    /// Event: Vendor signed out; selected stalls returned to the hall
    SessionEnded {
        /// Stalls that were selected
        released: Vec<StallId>,
    },

    /// Event: Command validation failed
    ValidationFailed {
        /// Error message
        error: String,
    },
}

/// What a toggle does to a stall
enum Toggle {
    Select,
    Deselect,
    Ignore,
}

/// Reducer for the booking flow
#[derive(Clone, Debug, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decides what toggling a stall means
    ///
    /// Unknown and reserved stalls are ignored. Selecting past the quota is an
    /// error.
    fn validate_toggle(state: &PortalState, id: &StallId) -> Result<Toggle, String> {
        let Some(stall) = state.catalog.get(id) else {
            return Ok(Toggle::Ignore);
        };

        match stall.status {
            StallStatus::Reserved => Ok(Toggle::Ignore),
            StallStatus::Selected => Ok(Toggle::Deselect),
            StallStatus::Available if state.booking.is_full() => Err(format!(
                "Maximum {} stalls can be selected",
                state.booking.max_selection
            )),
            StallStatus::Available => Ok(Toggle::Select),
        }
    }

    /// Validates a `RequestReservation` command
    fn validate_request(state: &PortalState) -> Result<(), String> {
        if state.booking.selection.is_empty() {
            return Err(EMPTY_SELECTION.to_string());
        }
        Ok(())
    }

    /// Validates a `ConfirmReservation` command
    fn validate_confirm(state: &PortalState) -> Result<(), String> {
        if !state.booking.confirmation_open {
            return Err("Review your selection before confirming".to_string());
        }
        Self::validate_request(state)
    }

    /// Applies an event to state
    fn apply_event(state: &mut PortalState, action: &BookingAction) {
        match action {
            BookingAction::StallSelected { id } => {
                if let Some(stall) = state.catalog.get_mut(id) {
                    stall.status = StallStatus::Selected;
                    state.booking.selection.push(id.clone());
                }
            },
            BookingAction::StallDeselected { id } => {
                if let Some(stall) = state.catalog.get_mut(id) {
                    stall.status = StallStatus::Available;
                }
                state.booking.selection.retain(|selected| selected != id);
            },
            BookingAction::SizeFilterChanged { filter } => {
                state.booking.size_filter = *filter;
            },
            BookingAction::ConfirmationOpened => {
                state.booking.confirmation_open = true;
            },
            BookingAction::ConfirmationCancelled => {
                state.booking.confirmation_open = false;
            },
            BookingAction::ReservationConfirmed {
                vendor,
                stalls,
                total_price,
                reserved_at,
                ..
            } => {
                for id in stalls {
                    if let Some(stall) = state.catalog.get_mut(id) {
                        stall.status = StallStatus::Reserved;
                        stall.reserved_by = Some(vendor.clone());
                    }
                }
                state.ledger.record(
                    vendor.clone(),
                    stalls.clone(),
                    *total_price,
                    ReservationStatus::PendingPayment,
                    *reserved_at,
                );

                state.booking.last_snapshot =
                    Some(ReservationSummary::of(&state.catalog, stalls).snapshot());
                state.booking.selection.clear();
                state.booking.confirmation_open = false;
                state.last_notification = Some(Notification::success(RESERVATION_SUCCESS));
            },
            BookingAction::SessionEnded { released } => {
                for id in released {
                    if let Some(stall) = state.catalog.get_mut(id).filter(|s| s.is_selected()) {
                        stall.status = StallStatus::Available;
                    }
                }
                state.booking = BookingState::new(state.booking.max_selection);
            },
            BookingAction::ValidationFailed { error } => {
                state.last_notification = Some(Notification::error(error.clone()));
            },
            // Commands are not applied to state
            BookingAction::ToggleStall { .. }
            | BookingAction::SetSizeFilter { .. }
            | BookingAction::RequestReservation
            | BookingAction::CancelConfirmation
            | BookingAction::ConfirmReservation { .. }
            | BookingAction::EndSession => {},
        }
    }

    /// Records a rejected command and announces it
    fn reject(
        state: &mut PortalState,
        env: &PortalEnvironment,
        error: String,
    ) -> SmallVec<[Effect<BookingAction>; 4]> {
        Self::apply_event(state, &BookingAction::ValidationFailed { error: error.clone() });
        smallvec![announce(env, Notification::error(error))]
    }
}

impl Reducer for BookingReducer {
    type State = PortalState;
    type Action = BookingAction;
    type Environment = PortalEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            BookingAction::ToggleStall { id } => {
                let event = match Self::validate_toggle(state, &id) {
                    Ok(Toggle::Select) => BookingAction::StallSelected { id },
                    Ok(Toggle::Deselect) => BookingAction::StallDeselected { id },
                    Ok(Toggle::Ignore) => return SmallVec::new(),
                    Err(error) => return Self::reject(state, env, error),
                };

                Self::apply_event(state, &event);
                SmallVec::new()
            },

            BookingAction::SetSizeFilter { filter } => {
                Self::apply_event(state, &BookingAction::SizeFilterChanged { filter });
                SmallVec::new()
            },

            BookingAction::RequestReservation => {
                if let Err(error) = Self::validate_request(state) {
                    return Self::reject(state, env, error);
                }

                Self::apply_event(state, &BookingAction::ConfirmationOpened);
                SmallVec::new()
            },

            BookingAction::CancelConfirmation => {
                Self::apply_event(state, &BookingAction::ConfirmationCancelled);
                SmallVec::new()
            },

            BookingAction::ConfirmReservation { vendor } => {
                if let Err(error) = Self::validate_confirm(state) {
                    return Self::reject(state, env, error);
                }

                let reservation_id = state.ledger.next_id();
                let total_price = state.total_price();
                tracing::info!(
                    reservation = %reservation_id,
                    vendor = %vendor,
                    stalls = state.booking.selection.len(),
                    total = %total_price,
                    "Reservation confirmed"
                );

                let event = BookingAction::ReservationConfirmed {
                    reservation_id,
                    vendor,
                    stalls: state.booking.selection.clone(),
                    total_price,
                    reserved_at: env.clock.now(),
                };
                Self::apply_event(state, &event);

                smallvec![announce(env, Notification::success(RESERVATION_SUCCESS))]
            },

            BookingAction::EndSession => {
                let released = state.booking.selection.clone();
                tracing::debug!(released = released.len(), "Booking session ended");
                Self::apply_event(state, &BookingAction::SessionEnded { released });
                SmallVec::new()
            },

            // ========== Events ==========
            BookingAction::StallSelected { .. }
            | BookingAction::StallDeselected { .. }
            | BookingAction::SizeFilterChanged { .. }
            | BookingAction::ConfirmationOpened
            | BookingAction::ConfirmationCancelled
            | BookingAction::ReservationConfirmed { .. }
            | BookingAction::SessionEnded { .. }
            | BookingAction::ValidationFailed { .. } => {
                Self::apply_event(state, &action);
                SmallVec::new()
            },
        }
    }
}
