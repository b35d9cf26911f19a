//! Domain types for the book fair portal.
//!
//! Value objects (stall identifiers, money, size tiers) and the entities the
//! reducers operate on: stalls, reservations, vendor profiles and the
//! transient notifications shown to the user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Identifiers
// ============================================================================

/// Errors raised while parsing domain identifiers and enums from user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not of the form `<row letter><column number>`, e.g. `A01`
    #[error("'{0}' is not a stall id (expected a row letter and a column number, e.g. A01)")]
    StallId(String),

    /// Not one of small, medium, large
    #[error("'{0}' is not a stall size (expected small, medium or large)")]
    StallSize(String),
}

/// Identifier of a stall: row letter followed by a zero-padded column number.
///
/// ```
/// use bookfair::types::StallId;
///
/// let id = StallId::from_grid(1, 1);
/// assert_eq!(id.as_str(), "B02");
/// assert_eq!("b2".parse::<StallId>().ok(), Some(id));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StallId(String);

impl StallId {
    /// Builds the identifier for a 0-based grid cell.
    ///
    /// Rows beyond `Z` are not representable; callers bound the grid to 26 rows.
    #[must_use]
    pub fn from_grid(row: u8, col: u8) -> Self {
        let letter = char::from(b'A' + row.min(25));
        Self(format!("{letter}{:02}", u16::from(col) + 1))
    }

    /// Returns the identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StallId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let invalid = || ParseError::StallId(trimmed.to_string());

        let letter = chars
            .next()
            .filter(char::is_ascii_alphabetic)
            .ok_or_else(invalid)?
            .to_ascii_uppercase();
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let column: u16 = digits.parse().map_err(|_| invalid())?;
        if column == 0 || column > 99 {
            return Err(invalid());
        }

        Ok(Self(format!("{letter}{column:02}")))
    }
}

impl fmt::Display for StallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a confirmed reservation (`RES0001`, `RES0002`, ...)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(String);

impl ReservationId {
    /// Builds the identifier for the n-th reservation (1-based)
    #[must_use]
    pub fn from_sequence(sequence: u32) -> Self {
        Self(format!("RES{sequence:04}"))
    }

    /// Returns the identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Money Value Object (whole rupees)
// ============================================================================

/// An amount in Sri Lankan rupees.
///
/// Stall prices are whole rupees, so no minor unit is tracked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Zero rupees
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from rupees
    #[must_use]
    pub const fn from_lkr(amount: u64) -> Self {
        Self(amount)
    }

    /// Returns the amount in rupees
    #[must_use]
    pub const fn lkr(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts, saturating at `u64::MAX`
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts two amounts, flooring at zero
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "LKR {grouped}")
    }
}

// ============================================================================
// Stalls
// ============================================================================

/// Size tier of a stall. Price and floor area are fixed per tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StallSize {
    /// 3m × 2m
    Small,
    /// 4m × 3m
    Medium,
    /// 6m × 4m
    Large,
}

impl StallSize {
    /// All tiers, smallest first
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Fixed price of a stall of this size
    #[must_use]
    pub const fn price(self) -> Money {
        match self {
            Self::Small => Money::from_lkr(15_000),
            Self::Medium => Money::from_lkr(25_000),
            Self::Large => Money::from_lkr(40_000),
        }
    }

    /// Floor area as shown on the pricing card
    #[must_use]
    pub const fn dimensions(self) -> &'static str {
        match self {
            Self::Small => "3m × 2m",
            Self::Medium => "4m × 3m",
            Self::Large => "6m × 4m",
        }
    }

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Single-letter badge used on the stall map
    #[must_use]
    pub const fn badge(self) -> char {
        match self {
            Self::Small => 'S',
            Self::Medium => 'M',
            Self::Large => 'L',
        }
    }
}

impl FromStr for StallSize {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" | "s" => Ok(Self::Small),
            "medium" | "m" => Ok(Self::Medium),
            "large" | "l" => Ok(Self::Large),
            other => Err(ParseError::StallSize(other.to_string())),
        }
    }
}

impl fmt::Display for StallSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking status of a stall
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StallStatus {
    /// Free to select
    Available,
    /// Taken; immutable from the vendor flow
    Reserved,
    /// Tentatively picked by the current vendor
    Selected,
}

impl StallStatus {
    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Selected => "selected",
        }
    }
}

impl fmt::Display for StallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bookable unit of exhibition space
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stall {
    /// Unique identifier (`A01`)
    pub id: StallId,
    /// Display label, equal to the identifier
    pub label: String,
    /// Size tier
    pub size: StallSize,
    /// Price, fixed by the size tier
    pub price: Money,
    /// Current booking status
    pub status: StallStatus,
    /// 0-based grid row
    pub row: u8,
    /// 0-based grid column
    pub col: u8,
    /// Who holds the stall when reserved (vendor or `staff`)
    pub reserved_by: Option<String>,
}

impl Stall {
    /// Creates an available stall at a grid cell
    #[must_use]
    pub fn new(row: u8, col: u8, size: StallSize) -> Self {
        let id = StallId::from_grid(row, col);
        Self {
            label: id.to_string(),
            id,
            size,
            price: size.price(),
            status: StallStatus::Available,
            row,
            col,
            reserved_by: None,
        }
    }

    /// Returns the stall marked reserved (without a holder)
    #[must_use]
    pub fn reserved(mut self) -> Self {
        self.status = StallStatus::Reserved;
        self
    }

    /// Checks if the stall is reserved
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.status == StallStatus::Reserved
    }

    /// Checks if the stall is selected
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.status == StallStatus::Selected
    }
}

// ============================================================================
// Reservations
// ============================================================================

/// Payment state of a confirmed reservation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReservationStatus {
    /// Confirmed by the vendor, payment due within 7 days
    PendingPayment,
    /// Paid
    Confirmed,
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PendingPayment => f.write_str("Pending Payment"),
            Self::Confirmed => f.write_str("Confirmed"),
        }
    }
}

/// A confirmed booking of one or more stalls
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Reservation identifier
    pub id: ReservationId,
    /// Vendor reference (email or business name)
    pub vendor: String,
    /// Booked stalls, in selection order
    pub stalls: Vec<StallId>,
    /// Sum of the stall prices
    pub total_price: Money,
    /// Payment state
    pub status: ReservationStatus,
    /// When the reservation was confirmed
    pub reserved_at: DateTime<Utc>,
}

/// Publisher profile captured at registration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorProfile {
    /// Business or publishing house name
    pub business_name: String,
    /// Contact person
    pub contact_person: String,
    /// Login email
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Literary genres the vendor publishes
    pub genres: Vec<String>,
}

// ============================================================================
// Notifications
// ============================================================================

/// Severity of a transient notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLevel {
    /// Operation completed
    Success,
    /// Input rejected; state unchanged
    Error,
}

/// A transient message surfaced to the user (a "toast")
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,
    /// Message text
    pub message: String,
}

impl Notification {
    /// A success notification
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    /// An error notification
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// Checks if this is an error
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NotificationLevel::Success => write!(f, "✔ {}", self.message),
            NotificationLevel::Error => write!(f, "✖ {}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stall_id_from_grid_pads_column() {
        assert_eq!(StallId::from_grid(0, 0).as_str(), "A01");
        assert_eq!(StallId::from_grid(9, 7).as_str(), "J08");
        assert_eq!(StallId::from_grid(2, 11).as_str(), "C12");
    }

    #[test]
    fn stall_id_parse_normalizes() {
        assert_eq!("a1".parse::<StallId>().ok(), Some(StallId::from_grid(0, 0)));
        assert_eq!(" D04 ".parse::<StallId>().ok(), Some(StallId::from_grid(3, 3)));
    }

    #[test]
    fn stall_id_parse_rejects_garbage() {
        assert!("".parse::<StallId>().is_err());
        assert!("1A".parse::<StallId>().is_err());
        assert!("A00".parse::<StallId>().is_err());
        assert!("A".parse::<StallId>().is_err());
        assert!("A100".parse::<StallId>().is_err());
    }

    #[test]
    fn stall_id_column_must_be_plain_digits() {
        assert!("A+1".parse::<StallId>().is_err());
        assert!("B-2".parse::<StallId>().is_err());
        assert!("C 3".parse::<StallId>().is_err());
        assert_eq!("c003".parse::<StallId>().ok(), Some(StallId::from_grid(2, 2)));
    }

    #[test]
    fn size_prices_are_fixed() {
        assert_eq!(StallSize::Small.price(), Money::from_lkr(15_000));
        assert_eq!(StallSize::Medium.price(), Money::from_lkr(25_000));
        assert_eq!(StallSize::Large.price(), Money::from_lkr(40_000));
    }

    #[test]
    fn money_display_groups_thousands() {
        assert_eq!(Money::ZERO.to_string(), "LKR 0");
        assert_eq!(Money::from_lkr(999).to_string(), "LKR 999");
        assert_eq!(Money::from_lkr(15_000).to_string(), "LKR 15,000");
        assert_eq!(Money::from_lkr(1_234_567).to_string(), "LKR 1,234,567");
    }

    #[test]
    fn money_sums() {
        let total: Money = [StallSize::Small.price(), StallSize::Medium.price()]
            .iter()
            .sum();
        assert_eq!(total, Money::from_lkr(40_000));
    }

    #[test]
    fn reservation_id_is_zero_padded() {
        assert_eq!(ReservationId::from_sequence(7).as_str(), "RES0007");
    }

    #[test]
    fn new_stall_takes_tier_price() {
        let stall = Stall::new(0, 0, StallSize::Large);
        assert_eq!(stall.label, "A01");
        assert_eq!(stall.price, Money::from_lkr(40_000));
        assert_eq!(stall.status, StallStatus::Available);
        assert!(stall.reserved().is_reserved());
    }
}
