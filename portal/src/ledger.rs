//! Ledger of confirmed reservations.
//!
//! Written by the booking flow on confirmation and by staff releases; read by
//! the reservation list and the vendor dashboard.

use crate::catalog::Catalog;
use crate::types::{Money, Reservation, ReservationId, ReservationStatus, StallId, StallStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stalls grouped into one seeded reservation
const SEED_STALLS_PER_RESERVATION: usize = 2;

/// All confirmed reservations, in booking order
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReservationLedger {
    reservations: Vec<Reservation>,
    next_sequence: u32,
}

impl ReservationLedger {
    /// Creates an empty ledger
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reservations: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Appends a reservation and returns its id
    pub fn record(
        &mut self,
        vendor: impl Into<String>,
        stalls: Vec<StallId>,
        total_price: Money,
        status: ReservationStatus,
        reserved_at: DateTime<Utc>,
    ) -> ReservationId {
        let id = self.next_id();
        self.next_sequence = self.next_sequence.max(1) + 1;
        self.reservations.push(Reservation {
            id: id.clone(),
            vendor: vendor.into(),
            stalls,
            total_price,
            status,
            reserved_at,
        });
        id
    }

    /// Back-fills reservations for stalls that start out reserved
    ///
    /// Pre-reserved stalls are grouped in pairs (grid order) under
    /// `Publisher 1`, `Publisher 2`, ...; every third reservation is still
    /// awaiting payment. Each stall's holder is stamped with the publisher.
    pub fn seed_from_catalog(&mut self, catalog: &mut Catalog, reserved_at: DateTime<Utc>) {
        let held: Vec<(StallId, Money)> = catalog
            .with_status(StallStatus::Reserved)
            .filter(|stall| stall.reserved_by.is_none())
            .map(|stall| (stall.id.clone(), stall.price))
            .collect();

        for (n, group) in held.chunks(SEED_STALLS_PER_RESERVATION).enumerate() {
            let vendor = format!("Publisher {}", n + 1);
            let status = if n % 3 == 0 {
                ReservationStatus::PendingPayment
            } else {
                ReservationStatus::Confirmed
            };

            for (id, _) in group {
                if let Some(stall) = catalog.get_mut(id) {
                    stall.reserved_by = Some(vendor.clone());
                }
            }

            let ids = group.iter().map(|(id, _)| id.clone()).collect();
            let total = group.iter().map(|(_, price)| *price).sum();
            self.record(vendor, ids, total, status, reserved_at);
        }

        tracing::debug!(reservations = self.len(), "Seeded reservation ledger");
    }

    /// Takes a released stall out of reservation `id`
    ///
    /// A reservation left without stalls is removed. Returns `false` if `id`
    /// does not hold the stall.
    pub fn release_stall(&mut self, id: &ReservationId, stall: &StallId, price: Money) -> bool {
        let Some(position) = self
            .reservations
            .iter()
            .position(|r| &r.id == id && r.stalls.contains(stall))
        else {
            return false;
        };

        let emptied = match self.reservations.get_mut(position) {
            Some(reservation) => {
                reservation.stalls.retain(|held| held != stall);
                reservation.total_price = reservation.total_price.saturating_sub(price);
                reservation.stalls.is_empty()
            },
            None => false,
        };
        if emptied {
            self.reservations.remove(position);
        }
        true
    }

    /// Id the next recorded reservation will get
    #[must_use]
    pub fn next_id(&self) -> ReservationId {
        ReservationId::from_sequence(self.next_sequence.max(1))
    }

    /// All reservations, oldest first
    #[must_use]
    pub fn all(&self) -> &[Reservation] {
        &self.reservations
    }

    /// Reservations held by one vendor
    pub fn for_vendor<'a, 'v>(
        &'a self,
        vendor: &'v str,
    ) -> impl Iterator<Item = &'a Reservation> + use<'a, 'v> {
        self.reservations
            .iter()
            .filter(move |r| r.vendor.eq_ignore_ascii_case(vendor))
    }

    /// The reservation holding `stall`, if any
    #[must_use]
    pub fn holding(&self, stall: &StallId) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.stalls.contains(stall))
    }

    /// Number of reservations
    #[must_use]
    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    /// Checks if the ledger is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Stall, StallSize};
    use bookfair_testing::mocks::fair_opening;

    fn catalog_with_reserved(count: u8) -> Catalog {
        let stalls = (0..8)
            .map(|col| {
                let stall = Stall::new(0, col, StallSize::Small);
                if col < count { stall.reserved() } else { stall }
            })
            .collect();
        Catalog::from_stalls(stalls).unwrap_or_default()
    }

    #[test]
    fn record_assigns_sequential_ids() {
        let mut ledger = ReservationLedger::new();
        let first = ledger.record(
            "a@x.lk",
            vec![],
            Money::ZERO,
            ReservationStatus::Confirmed,
            fair_opening(),
        );
        let second = ledger.record(
            "b@x.lk",
            vec![],
            Money::ZERO,
            ReservationStatus::Confirmed,
            fair_opening(),
        );

        assert_eq!(first.as_str(), "RES0001");
        assert_eq!(second.as_str(), "RES0002");
    }

    #[test]
    fn default_ledger_also_starts_at_one() {
        let mut ledger = ReservationLedger::default();
        let id = ledger.record(
            "a@x.lk",
            vec![],
            Money::ZERO,
            ReservationStatus::Confirmed,
            fair_opening(),
        );
        assert_eq!(id.as_str(), "RES0001");
    }

    #[test]
    fn seeding_pairs_reserved_stalls() {
        let mut catalog = catalog_with_reserved(5);
        let mut ledger = ReservationLedger::new();
        ledger.seed_from_catalog(&mut catalog, fair_opening());

        assert_eq!(ledger.len(), 3);
        let first = &ledger.all()[0];
        assert_eq!(first.vendor, "Publisher 1");
        assert_eq!(first.stalls.len(), 2);
        assert_eq!(first.total_price, Money::from_lkr(30_000));
        assert_eq!(first.status, ReservationStatus::PendingPayment);
        assert_eq!(ledger.all()[1].status, ReservationStatus::Confirmed);
        assert_eq!(ledger.all()[2].stalls.len(), 1);

        let holder = catalog.get(&StallId::from_grid(0, 4)).and_then(|s| s.reserved_by.clone());
        assert_eq!(holder.as_deref(), Some("Publisher 3"));
    }

    #[test]
    fn releasing_last_stall_drops_reservation() {
        let mut catalog = catalog_with_reserved(2);
        let mut ledger = ReservationLedger::new();
        ledger.seed_from_catalog(&mut catalog, fair_opening());

        let price = StallSize::Small.price();
        let (a01, a02) = (StallId::from_grid(0, 0), StallId::from_grid(0, 1));
        let holder = ledger.holding(&a01).map(|r| r.id.clone());
        assert_eq!(holder.as_ref().map(ReservationId::as_str), Some("RES0001"));

        let Some(holder) = holder else { return };
        assert!(ledger.release_stall(&holder, &a01, price));
        assert_eq!(ledger.all()[0].total_price, price);
        assert_eq!(ledger.holding(&a01), None);

        assert!(ledger.release_stall(&holder, &a02, price));
        assert!(ledger.is_empty());
        assert!(!ledger.release_stall(&holder, &a02, price));
    }

    #[test]
    fn vendor_filter_ignores_case() {
        let mut ledger = ReservationLedger::new();
        ledger.record(
            "Nimal@Books.lk",
            vec![],
            Money::ZERO,
            ReservationStatus::PendingPayment,
            fair_opening(),
        );
        ledger.record(
            "other@books.lk",
            vec![],
            Money::ZERO,
            ReservationStatus::PendingPayment,
            fair_opening(),
        );

        assert_eq!(ledger.for_vendor("nimal@books.lk").count(), 1);
    }
}
