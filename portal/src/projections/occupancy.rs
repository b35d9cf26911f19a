//! Occupancy statistics for the staff dashboard.
//!
//! A pure read over the shared catalog: nothing is cached, so the numbers are
//! always those of the latest reduced state.

use crate::catalog::Catalog;
use crate::types::{StallSize, StallStatus};
use serde::Serialize;

/// Reserved / available counts for one group of stalls
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StallCounts {
    /// Stalls in the group
    pub total: usize,
    /// Reserved stalls
    pub reserved: usize,
    /// Everything not reserved (selected stalls count here)
    pub available: usize,
}

impl StallCounts {
    fn count(&mut self, status: StallStatus) {
        self.total += 1;
        if status == StallStatus::Reserved {
            self.reserved += 1;
        } else {
            self.available += 1;
        }
    }

    /// Reserved share as a whole percentage, rounded half up
    ///
    /// An empty group is 0%.
    #[must_use]
    pub const fn occupancy_rate(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.reserved * 200 + self.total) / (2 * self.total)
    }
}

/// One bar of the per-size chart
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SizeBar {
    /// Size tier
    pub size: StallSize,
    /// Reserved stalls of this size
    pub reserved: usize,
    /// Available stalls of this size
    pub available: usize,
}

/// One slice of the occupancy pie
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    /// Slice label
    pub label: &'static str,
    /// Stalls in the slice
    pub value: usize,
}

/// Catalog-wide and per-size occupancy
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OccupancyStats {
    /// Whole hall
    pub overall: StallCounts,
    /// Small stalls
    pub small: StallCounts,
    /// Medium stalls
    pub medium: StallCounts,
    /// Large stalls
    pub large: StallCounts,
}

impl OccupancyStats {
    /// Derives the statistics from a catalog
    #[must_use]
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut stats = Self::default();
        for stall in catalog.iter() {
            stats.overall.count(stall.status);
            stats.by_size_mut(stall.size).count(stall.status);
        }
        stats
    }

    fn by_size_mut(&mut self, size: StallSize) -> &mut StallCounts {
        match size {
            StallSize::Small => &mut self.small,
            StallSize::Medium => &mut self.medium,
            StallSize::Large => &mut self.large,
        }
    }

    /// Counts for one size tier
    #[must_use]
    pub const fn by_size(&self, size: StallSize) -> StallCounts {
        match size {
            StallSize::Small => self.small,
            StallSize::Medium => self.medium,
            StallSize::Large => self.large,
        }
    }

    /// Overall occupancy rate in percent
    #[must_use]
    pub const fn occupancy_rate(&self) -> usize {
        self.overall.occupancy_rate()
    }

    /// Per-size reserved/available bars, smallest first
    #[must_use]
    pub fn size_bars(&self) -> Vec<SizeBar> {
        StallSize::ALL
            .iter()
            .map(|&size| {
                let counts = self.by_size(size);
                SizeBar {
                    size,
                    reserved: counts.reserved,
                    available: counts.available,
                }
            })
            .collect()
    }

    /// Reserved/available pie
    #[must_use]
    pub const fn pie(&self) -> [PieSlice; 2] {
        [
            PieSlice {
                label: "Reserved",
                value: self.overall.reserved,
            },
            PieSlice {
                label: "Available",
                value: self.overall.available,
            },
        ]
    }
}
