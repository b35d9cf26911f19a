//! Property tests for catalog generation and stall selection.

use bookfair::catalog::{Catalog, CatalogGenerator, GridDimensions};
use bookfair::environment::RecordingNotifier;
use bookfair::types::{Money, StallId, StallStatus};
use bookfair::{BookingAction, PortalAction, PortalEnvironment, PortalReducer, PortalState};
use bookfair_core::reducer::Reducer;
use bookfair_testing::{mocks::fair_opening, test_clock};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::sync::Arc;

fn generate(seed: u64, probability: f64) -> Catalog {
    let generator = CatalogGenerator::new(GridDimensions::default(), probability)
        .unwrap_or_default();
    generator.generate(&mut StdRng::seed_from_u64(seed))
}

fn reserved_ids(catalog: &Catalog) -> HashSet<StallId> {
    catalog
        .with_status(StallStatus::Reserved)
        .map(|s| s.id.clone())
        .collect()
}

proptest! {
    /// A standard hall is 80 uniquely labelled stalls priced by size
    #[test]
    fn generated_hall_is_well_formed(seed in any::<u64>(), probability in 0.0f64..=1.0) {
        let catalog = generate(seed, probability);

        prop_assert_eq!(catalog.len(), 80);
        let ids: HashSet<&StallId> = catalog.iter().map(|s| &s.id).collect();
        prop_assert_eq!(ids.len(), 80);
        for stall in catalog.iter() {
            prop_assert_eq!(stall.price, stall.size.price());
            prop_assert_ne!(stall.status, StallStatus::Selected);
        }
    }

    /// Zero probability leaves everything open, one reserves everything
    #[test]
    fn probability_bounds_are_exact(seed in any::<u64>()) {
        prop_assert_eq!(generate(seed, 0.0).with_status(StallStatus::Reserved).count(), 0);
        prop_assert_eq!(generate(seed, 1.0).with_status(StallStatus::Reserved).count(), 80);
    }

    /// Any toggle sequence keeps the selection within quota and in sync with
    /// stall statuses, and never touches reserved stalls
    #[test]
    fn toggling_respects_quota(
        seed in any::<u64>(),
        picks in proptest::collection::vec(0usize..80, 0..40),
    ) {
        let catalog = generate(seed, CatalogGenerator::DEFAULT_RESERVED_PROBABILITY);
        let reserved = reserved_ids(&catalog);
        let ids: Vec<StallId> = catalog.iter().map(|s| s.id.clone()).collect();

        let notifier = Arc::new(RecordingNotifier::new());
        let env = PortalEnvironment::new(Arc::new(test_clock()), notifier);
        let reducer = PortalReducer::new();
        let mut state = PortalState::new(catalog, 3);

        for pick in picks {
            let action = PortalAction::from(BookingAction::ToggleStall { id: ids[pick].clone() });
            let _ = reducer.reduce(&mut state, action, &env);

            prop_assert!(state.booking.selection.len() <= 3);
            prop_assert_eq!(
                state.catalog.with_status(StallStatus::Selected).count(),
                state.booking.selection.len()
            );
            for id in &state.booking.selection {
                prop_assert!(state.catalog.get(id).is_some_and(|s| s.is_selected()));
            }
            prop_assert_eq!(&reserved_ids(&state.catalog), &reserved);

            let expected: Money = state.selected_stalls().iter().map(|s| s.price).sum();
            prop_assert_eq!(state.total_price(), expected);
        }
    }

    /// Bootstrapping puts every pre-reserved stall in exactly one reservation
    #[test]
    fn bootstrap_ledger_covers_reserved_stalls(seed in any::<u64>()) {
        let catalog = generate(seed, CatalogGenerator::DEFAULT_RESERVED_PROBABILITY);
        let reserved = reserved_ids(&catalog);
        let state = PortalState::bootstrap(catalog, 3, fair_opening());

        let mut booked = Vec::new();
        for reservation in state.ledger.all() {
            prop_assert!(!reservation.stalls.is_empty());
            let total: Money = reservation
                .stalls
                .iter()
                .filter_map(|id| state.catalog.get(id))
                .map(|s| s.price)
                .sum();
            prop_assert_eq!(reservation.total_price, total);
            booked.extend(reservation.stalls.iter().cloned());
        }

        let unique: HashSet<StallId> = booked.iter().cloned().collect();
        prop_assert_eq!(unique.len(), booked.len());
        prop_assert_eq!(unique, reserved);
    }
}
