//! Reservation list for staff and the vendor's own reservations.
//!
//! Both are read-only views over the [`ReservationLedger`].

use crate::ledger::ReservationLedger;
use crate::types::{Money, Reservation};

/// Reservations shown per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Case-insensitive search over vendor and reservation id
///
/// A blank query matches everything.
#[must_use]
pub fn search<'a>(ledger: &'a ReservationLedger, query: &str) -> Vec<&'a Reservation> {
    let needle = query.trim().to_lowercase();
    ledger
        .all()
        .iter()
        .filter(|r| {
            needle.is_empty()
                || r.vendor.to_lowercase().contains(&needle)
                || r.id.as_str().to_lowercase().contains(&needle)
        })
        .collect()
}

/// One page of a reservation listing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReservationPage<'a> {
    /// Reservations on this page
    pub entries: Vec<&'a Reservation>,
    /// 1-based page number after clamping
    pub page: usize,
    /// Number of pages (0 for an empty listing)
    pub total_pages: usize,
    /// Reservations across all pages
    pub total: usize,
    /// 1-based position of the first entry, 0 when empty
    pub first: usize,
    /// 1-based position of the last entry, 0 when empty
    pub last: usize,
}

impl<'a> ReservationPage<'a> {
    /// Cuts page `page` out of `matches`, clamping to the available pages
    #[must_use]
    pub fn paginate(matches: &[&'a Reservation], page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total = matches.len();
        let total_pages = total.div_ceil(page_size);
        let page = page.clamp(1, total_pages.max(1));

        let start = (page - 1) * page_size;
        let entries: Vec<&Reservation> =
            matches.iter().skip(start).take(page_size).copied().collect();
        let (first, last) = if entries.is_empty() {
            (0, 0)
        } else {
            (start + 1, start + entries.len())
        };

        Self {
            entries,
            page,
            total_pages,
            total,
            first,
            last,
        }
    }

    /// Footer text, e.g. `Showing 21 to 25 of 25`
    #[must_use]
    pub fn showing(&self) -> String {
        format!("Showing {} to {} of {}", self.first, self.last, self.total)
    }

    /// Checks if a previous page exists
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Checks if a next page exists
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// The vendor dashboard: own reservations and quota progress
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VendorDashboard<'a> {
    /// The vendor's reservations, oldest first
    pub reservations: Vec<&'a Reservation>,
    /// Stalls held across those reservations
    pub stalls_reserved: usize,
    /// Per-vendor stall quota
    pub max_stalls: usize,
    /// Combined price of the vendor's reservations
    pub total_spent: Money,
}

impl<'a> VendorDashboard<'a> {
    /// Collects the reservations of `vendor`
    #[must_use]
    pub fn for_vendor(ledger: &'a ReservationLedger, vendor: &str, max_stalls: usize) -> Self {
        let reservations: Vec<&Reservation> = ledger.for_vendor(vendor).collect();
        let stalls_reserved = reservations.iter().map(|r| r.stalls.len()).sum();
        let total_spent = reservations.iter().map(|r| r.total_price).sum();
        Self {
            reservations,
            stalls_reserved,
            max_stalls,
            total_spent,
        }
    }

    /// Stalls reserved as a percentage of the quota, capped at 100
    #[must_use]
    pub fn progress_percent(&self) -> usize {
        if self.max_stalls == 0 {
            return 0;
        }
        (self.stalls_reserved * 100 / self.max_stalls).min(100)
    }

    /// Stalls the vendor may still reserve
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.max_stalls.saturating_sub(self.stalls_reserved)
    }
}
