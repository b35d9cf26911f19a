//! The shared portal state held by the single [`Store`](bookfair_runtime::Store).
//!
//! Vendor and staff views both read from here, so a confirmed booking is
//! visible to staff statistics as soon as the reducer has run.

use crate::aggregates::genres::LITERARY_GENRES;
use crate::catalog::{Catalog, SizeFilter};
use crate::ledger::ReservationLedger;
use crate::summary::{ReservationSnapshot, ReservationSummary};
use crate::types::{Money, Notification, Stall, StallId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Default number of stalls one vendor may select
pub const DEFAULT_MAX_SELECTION: usize = 3;

/// Vendor selection and the reservation confirmation step
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BookingState {
    /// Tentatively selected stalls, in selection order
    pub selection: Vec<StallId>,
    /// Quota for `selection`
    pub max_selection: usize,
    /// Size tier narrowing the stall map
    pub size_filter: SizeFilter,
    /// Whether the confirmation step is showing
    pub confirmation_open: bool,
    /// What the success view shows
    pub last_snapshot: Option<ReservationSnapshot>,
}

impl BookingState {
    /// Creates an empty booking state with the given quota
    #[must_use]
    pub const fn new(max_selection: usize) -> Self {
        Self {
            selection: Vec::new(),
            max_selection,
            size_filter: SizeFilter::All,
            confirmation_open: false,
            last_snapshot: None,
        }
    }

    /// Checks if the quota is used up
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.selection.len() >= self.max_selection
    }
}

impl Default for BookingState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SELECTION)
    }
}

/// Literary genre picker
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GenreState {
    /// Genres picked so far (fixed and custom), in pick order
    pub selected: Vec<String>,
    /// Filter text for the available list
    pub search: String,
    /// Genres stored on the vendor by the last save
    pub saved: Vec<String>,
}

impl GenreState {
    /// Checks if a genre is already picked (case-insensitive)
    #[must_use]
    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.iter().any(|g| g.eq_ignore_ascii_case(name))
    }

    /// Fixed genres matching the search and not yet picked
    #[must_use]
    pub fn available(&self) -> Vec<&'static str> {
        let needle = self.search.trim().to_lowercase();
        LITERARY_GENRES
            .iter()
            .copied()
            .filter(|genre| genre.to_lowercase().contains(&needle))
            .filter(|genre| !self.is_selected(genre))
            .collect()
    }
}

/// Everything the portal knows
#[derive(Clone, Debug, Default, Serialize)]
pub struct PortalState {
    /// The exhibition hall
    pub catalog: Catalog,
    /// Vendor selection flow
    pub booking: BookingState,
    /// Confirmed reservations
    pub ledger: ReservationLedger,
    /// Genre picker
    pub genres: GenreState,
    /// Most recent toast, replaced by the next one
    pub last_notification: Option<Notification>,
}

impl PortalState {
    /// Wraps a catalog with an empty ledger
    #[must_use]
    pub fn new(catalog: Catalog, max_selection: usize) -> Self {
        Self {
            catalog,
            booking: BookingState::new(max_selection),
            ..Self::default()
        }
    }

    /// Wraps a freshly generated catalog, back-filling the ledger for the
    /// stalls that start out reserved
    #[must_use]
    pub fn bootstrap(mut catalog: Catalog, max_selection: usize, seeded_at: DateTime<Utc>) -> Self {
        let mut ledger = ReservationLedger::new();
        ledger.seed_from_catalog(&mut catalog, seeded_at);
        Self {
            ledger,
            ..Self::new(catalog, max_selection)
        }
    }

    /// The current selection resolved against the catalog
    #[must_use]
    pub fn summary(&self) -> ReservationSummary<'_> {
        ReservationSummary::of(&self.catalog, &self.booking.selection)
    }

    /// Selected stall records, in selection order
    #[must_use]
    pub fn selected_stalls(&self) -> Vec<&Stall> {
        self.summary().stalls().to_vec()
    }

    /// Sum of the selected stall prices
    #[must_use]
    pub fn total_price(&self) -> Money {
        self.summary().total_price()
    }

    /// Stalls passing the size filter, in grid order
    pub fn visible_stalls(&self) -> impl Iterator<Item = &Stall> {
        self.catalog.visible(self.booking.size_filter)
    }

    /// Snapshot for the success view, empty when nothing was confirmed
    #[must_use]
    pub fn success_snapshot(&self) -> ReservationSnapshot {
        self.booking.last_snapshot.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{StallSize, StallStatus};
    use bookfair_testing::mocks::fair_opening;

    fn small_hall() -> Catalog {
        Catalog::from_stalls(vec![
            Stall::new(0, 0, StallSize::Small),
            Stall::new(0, 1, StallSize::Large).reserved(),
            Stall::new(0, 2, StallSize::Medium).reserved(),
        ])
        .unwrap_or_default()
    }

    #[test]
    fn bootstrap_seeds_ledger_and_holders() {
        let state = PortalState::bootstrap(small_hall(), 3, fair_opening());

        assert_eq!(state.ledger.len(), 1);
        assert!(
            state
                .catalog
                .with_status(StallStatus::Reserved)
                .all(|s| s.reserved_by.as_deref() == Some("Publisher 1"))
        );
        assert_eq!(state.booking.max_selection, 3);
    }

    #[test]
    fn success_snapshot_defaults_to_empty() {
        let state = PortalState::new(small_hall(), 3);
        assert_eq!(state.success_snapshot(), ReservationSnapshot::default());
    }

    #[test]
    fn visible_stalls_follow_filter() {
        let mut state = PortalState::new(small_hall(), 3);
        state.booking.size_filter = SizeFilter::Only(StallSize::Large);
        let labels: Vec<&str> = state.visible_stalls().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["A02"]);
    }

    #[test]
    fn available_genres_exclude_picked_and_follow_search() {
        let mut genres = GenreState::default();
        assert_eq!(genres.available().len(), 20);

        genres.selected.push("fiction".to_string());
        genres.search = "FICTION".to_string();
        assert_eq!(genres.available(), vec!["Science Fiction", "Historical Fiction"]);
    }
}
