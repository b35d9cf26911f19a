//! Stall catalog: generation of the exhibition hall grid and lookups over it.
//!
//! The hall is a grid of `rows × columns` stalls (10 × 8 by default). Each
//! stall gets a uniformly random size tier, the fixed price of that tier, and
//! an independent chance of starting out reserved.

use crate::types::{Stall, StallId, StallSize, StallStatus};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Largest supported number of rows (one per letter A–Z)
pub const MAX_ROWS: u8 = 26;

/// Largest supported number of columns (two-digit column numbers)
pub const MAX_COLUMNS: u8 = 99;

/// Errors from building a catalog
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Grid rows or columns out of range
    #[error("grid must be 1-{MAX_ROWS} rows by 1-{MAX_COLUMNS} columns, got {rows}x{columns}")]
    InvalidDimensions {
        /// Requested rows
        rows: u8,
        /// Requested columns
        columns: u8,
    },

    /// Reserved probability outside `[0, 1]`
    #[error("reserved probability must be between 0 and 1, got {0}")]
    InvalidProbability(f64),

    /// Two stalls share an identifier
    #[error("duplicate stall {0}")]
    DuplicateStall(StallId),
}

/// Dimensions of the exhibition hall grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    /// Number of rows (lettered A, B, ...)
    pub rows: u8,
    /// Number of columns (numbered 01, 02, ...)
    pub columns: u8,
}

impl GridDimensions {
    /// Creates grid dimensions, validating the bounds
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidDimensions`] for an empty grid or one
    /// that cannot be labelled with a single row letter and two-digit column.
    pub const fn new(rows: u8, columns: u8) -> Result<Self, CatalogError> {
        if rows == 0 || rows > MAX_ROWS || columns == 0 || columns > MAX_COLUMNS {
            return Err(CatalogError::InvalidDimensions { rows, columns });
        }
        Ok(Self { rows, columns })
    }

    /// Total number of stalls
    #[must_use]
    pub const fn stall_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self {
            rows: 10,
            columns: 8,
        }
    }
}

/// Produces randomly populated catalogs
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatalogGenerator {
    dimensions: GridDimensions,
    reserved_probability: f64,
}

impl CatalogGenerator {
    /// Default chance of a stall starting out reserved
    pub const DEFAULT_RESERVED_PROBABILITY: f64 = 0.3;

    /// Creates a generator
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidProbability`] if the probability is not
    /// within `[0, 1]`.
    pub fn new(
        dimensions: GridDimensions,
        reserved_probability: f64,
    ) -> Result<Self, CatalogError> {
        if !(0.0..=1.0).contains(&reserved_probability) {
            return Err(CatalogError::InvalidProbability(reserved_probability));
        }
        Ok(Self {
            dimensions,
            reserved_probability,
        })
    }

    /// Grid dimensions this generator fills
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Generates a catalog, one stall per grid cell in row-major order
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Catalog {
        let mut stalls = Vec::with_capacity(self.dimensions.stall_count());

        for row in 0..self.dimensions.rows {
            for col in 0..self.dimensions.columns {
                let size = *StallSize::ALL.choose(rng).unwrap_or(&StallSize::Small);
                let mut stall = Stall::new(row, col, size);
                if rng.gen_bool(self.reserved_probability) {
                    stall.status = StallStatus::Reserved;
                }
                stalls.push(stall);
            }
        }

        tracing::debug!(
            stalls = stalls.len(),
            reserved = stalls.iter().filter(|s| s.is_reserved()).count(),
            "Generated stall catalog"
        );

        Catalog::index(stalls, self.dimensions.columns)
    }
}

impl Default for CatalogGenerator {
    fn default() -> Self {
        Self {
            dimensions: GridDimensions::default(),
            reserved_probability: Self::DEFAULT_RESERVED_PROBABILITY,
        }
    }
}

/// Narrows the rendered stall map to one size tier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeFilter {
    /// Show every stall
    #[default]
    All,
    /// Show only stalls of this size
    Only(StallSize),
}

impl SizeFilter {
    /// Checks if a stall passes the filter
    #[must_use]
    pub fn matches(self, stall: &Stall) -> bool {
        match self {
            Self::All => true,
            Self::Only(size) => stall.size == size,
        }
    }
}

impl std::str::FromStr for SizeFilter {
    type Err = crate::types::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl fmt::Display for SizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(size) => write!(f, "{size}"),
        }
    }
}

/// The set of stalls in the exhibition hall, in grid order
///
/// Serialized as the plain stall list; deserializing rebuilds the id index
/// through [`Catalog::from_stalls`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(into = "Vec<Stall>", try_from = "Vec<Stall>")]
pub struct Catalog {
    stalls: Vec<Stall>,
    columns: u8,
    index: HashMap<StallId, usize>,
}

impl From<Catalog> for Vec<Stall> {
    fn from(catalog: Catalog) -> Self {
        catalog.stalls
    }
}

impl TryFrom<Vec<Stall>> for Catalog {
    type Error = CatalogError;

    fn try_from(stalls: Vec<Stall>) -> Result<Self, Self::Error> {
        Self::from_stalls(stalls)
    }
}

impl Catalog {
    /// Builds a catalog from explicit stalls (fixtures, imports)
    ///
    /// Stalls are kept in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateStall`] if two stalls share an id.
    pub fn from_stalls(stalls: Vec<Stall>) -> Result<Self, CatalogError> {
        let mut seen = HashMap::with_capacity(stalls.len());
        for (position, stall) in stalls.iter().enumerate() {
            if seen.insert(stall.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateStall(stall.id.clone()));
            }
        }
        let columns = stalls.iter().map(|s| s.col + 1).max().unwrap_or(0);
        Ok(Self {
            stalls,
            columns,
            index: seen,
        })
    }

    fn index(stalls: Vec<Stall>, columns: u8) -> Self {
        let index = stalls
            .iter()
            .enumerate()
            .map(|(position, stall)| (stall.id.clone(), position))
            .collect();
        Self {
            stalls,
            columns,
            index,
        }
    }

    /// Number of stalls
    #[must_use]
    pub fn len(&self) -> usize {
        self.stalls.len()
    }

    /// Checks if the catalog has no stalls
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stalls.is_empty()
    }

    /// Number of grid columns (for rendering the map)
    #[must_use]
    pub const fn columns(&self) -> u8 {
        self.columns
    }

    /// Returns a stall by id
    #[must_use]
    pub fn get(&self, id: &StallId) -> Option<&Stall> {
        self.index.get(id).and_then(|&i| self.stalls.get(i))
    }

    /// Returns a mutable stall by id
    pub fn get_mut(&mut self, id: &StallId) -> Option<&mut Stall> {
        self.index.get(id).and_then(|&i| self.stalls.get_mut(i))
    }

    /// All stalls in grid order
    pub fn iter(&self) -> impl Iterator<Item = &Stall> {
        self.stalls.iter()
    }

    /// Stalls that pass the size filter, in grid order
    pub fn visible(&self, filter: SizeFilter) -> impl Iterator<Item = &Stall> {
        self.stalls.iter().filter(move |stall| filter.matches(stall))
    }

    /// Stalls in a given status
    pub fn with_status(&self, status: StallStatus) -> impl Iterator<Item = &Stall> {
        self.stalls.iter().filter(move |stall| stall.status == status)
    }

    /// Case-insensitive search over stall ids and holders
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = &'a Stall> + 'a {
        let needle = query.trim().to_lowercase();
        self.stalls.iter().filter(move |stall| {
            needle.is_empty()
                || stall.label.to_lowercase().contains(&needle)
                || stall
                    .reserved_by
                    .as_ref()
                    .is_some_and(|holder| holder.to_lowercase().contains(&needle))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn seeded(seed: u64) -> Catalog {
        CatalogGenerator::default().generate(&mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn default_grid_has_eighty_stalls() {
        let catalog = seeded(7);
        assert_eq!(catalog.len(), 80);
        assert_eq!(catalog.columns(), 8);
    }

    #[test]
    fn ids_follow_grid_layout() {
        let catalog = seeded(7);
        let ids: Vec<&str> = catalog.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.first(), Some(&"A01"));
        assert_eq!(ids.get(8), Some(&"B01"));
        assert_eq!(ids.last(), Some(&"J08"));

        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), 80);
    }

    #[test]
    fn prices_match_size_tier() {
        let catalog = seeded(11);
        assert!(catalog.iter().all(|s| s.price == s.size.price()));
        assert!(catalog.iter().all(|s| s.label == s.id.as_str()));
    }

    #[test]
    fn nothing_starts_selected() {
        let catalog = seeded(3);
        assert_eq!(catalog.with_status(StallStatus::Selected).count(), 0);
    }

    #[test]
    fn probability_bounds_are_respected() {
        let dims = GridDimensions::default();
        let none = CatalogGenerator::new(dims, 0.0)
            .map(|g| g.generate(&mut StdRng::seed_from_u64(1)));
        let all = CatalogGenerator::new(dims, 1.0)
            .map(|g| g.generate(&mut StdRng::seed_from_u64(1)));

        assert_eq!(none.map(|c| c.with_status(StallStatus::Reserved).count()), Ok(0));
        assert_eq!(all.map(|c| c.with_status(StallStatus::Reserved).count()), Ok(80));
    }

    #[test]
    fn invalid_generator_settings_are_rejected() {
        assert!(GridDimensions::new(0, 8).is_err());
        assert!(GridDimensions::new(27, 8).is_err());
        assert!(GridDimensions::new(10, 100).is_err());
        assert!(matches!(
            CatalogGenerator::new(GridDimensions::default(), 1.5),
            Err(CatalogError::InvalidProbability(_))
        ));
    }

    #[test]
    fn same_seed_same_catalog() {
        let a: Vec<Stall> = seeded(42).iter().cloned().collect();
        let b: Vec<Stall> = seeded(42).iter().cloned().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn from_stalls_rejects_duplicates() {
        let stalls = vec![
            Stall::new(0, 0, StallSize::Small),
            Stall::new(0, 0, StallSize::Large),
        ];
        assert_eq!(
            Catalog::from_stalls(stalls).err(),
            Some(CatalogError::DuplicateStall(StallId::from_grid(0, 0)))
        );
    }

    #[test]
    fn size_filter_only_narrows_view() {
        let catalog = Catalog::from_stalls(vec![
            Stall::new(0, 0, StallSize::Small),
            Stall::new(0, 1, StallSize::Medium),
            Stall::new(0, 2, StallSize::Small),
        ])
        .unwrap_or_default();

        assert_eq!(catalog.visible(SizeFilter::All).count(), 3);
        assert_eq!(catalog.visible(SizeFilter::Only(StallSize::Small)).count(), 2);
        assert_eq!(catalog.visible(SizeFilter::Only(StallSize::Large)).count(), 0);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn search_matches_label_and_holder() {
        let mut held = Stall::new(1, 0, StallSize::Large).reserved();
        held.reserved_by = Some("Publisher 4".to_string());
        let catalog = Catalog::from_stalls(vec![Stall::new(0, 0, StallSize::Small), held])
            .unwrap_or_default();

        let by_label: Vec<_> = catalog.search("a0").map(|s| s.label.clone()).collect();
        let by_holder: Vec<_> = catalog.search("publisher").map(|s| s.label.clone()).collect();

        assert_eq!(by_label, vec!["A01"]);
        assert_eq!(by_holder, vec!["B01"]);
        assert_eq!(catalog.search("").count(), 2);
    }

    #[test]
    fn size_filter_parses() {
        assert_eq!("all".parse::<SizeFilter>().ok(), Some(SizeFilter::All));
        assert_eq!(
            "Large".parse::<SizeFilter>().ok(),
            Some(SizeFilter::Only(StallSize::Large))
        );
        assert!("huge".parse::<SizeFilter>().is_err());
    }

    #[test]
    fn json_round_trip_keeps_lookup() {
        let catalog = seeded(11);
        let json = serde_json::to_string(&catalog).unwrap_or_default();
        let restored: Catalog = serde_json::from_str(&json).unwrap_or_default();

        assert_eq!(restored.len(), 80);
        assert_eq!(restored.columns(), 8);
        let a01 = restored.get(&StallId::from_grid(0, 0)).map(|s| s.size);
        assert_eq!(a01, catalog.get(&StallId::from_grid(0, 0)).map(|s| s.size));
    }

    #[test]
    fn json_with_duplicate_ids_is_rejected() {
        let stall = Stall::new(0, 0, StallSize::Small);
        let json = serde_json::to_string(&[stall.clone(), stall]).unwrap_or_default();
        assert!(serde_json::from_str::<Catalog>(&json).is_err());
    }
}
