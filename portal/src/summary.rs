//! Reservation summary: the derived view of the current selection.

use crate::catalog::Catalog;
use crate::types::{Money, Stall, StallId};
use serde::{Deserialize, Serialize};

/// Selected stalls and their total, in selection order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationSummary<'a> {
    stalls: Vec<&'a Stall>,
    total_price: Money,
}

impl<'a> ReservationSummary<'a> {
    /// Resolves a selection against the catalog
    ///
    /// Ids missing from the catalog are skipped.
    #[must_use]
    pub fn of(catalog: &'a Catalog, selection: &[StallId]) -> Self {
        let stalls: Vec<&Stall> = selection.iter().filter_map(|id| catalog.get(id)).collect();
        let total_price = stalls.iter().map(|stall| stall.price).sum();
        Self { stalls, total_price }
    }

    /// The selected stall records
    #[must_use]
    pub fn stalls(&self) -> &[&'a Stall] {
        &self.stalls
    }

    /// Sum of the selected stall prices
    #[must_use]
    pub const fn total_price(&self) -> Money {
        self.total_price
    }

    /// Checks if nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stalls.is_empty()
    }

    /// Immutable copy handed to the success view
    #[must_use]
    pub fn snapshot(&self) -> ReservationSnapshot {
        ReservationSnapshot {
            stalls: self.stalls.iter().map(|&stall| stall.clone()).collect(),
            total_price: self.total_price,
        }
    }
}

/// What the success view shows after a confirmation
///
/// The default (no confirmation yet) is an empty list with a zero total.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationSnapshot {
    /// Confirmed stalls
    pub stalls: Vec<Stall>,
    /// Their combined price
    pub total_price: Money,
}
