//! Vendor pages: stall map, selection, confirmation, success, genres and the
//! vendor's own reservations.

use super::layout::{heading, progress_bar, table};
use crate::projections::VendorDashboard;
use crate::state::{GenreState, PortalState};
use crate::summary::ReservationSnapshot;
use crate::types::{Reservation, Stall, StallSize, StallStatus};
use std::fmt::Write;

fn cell(stall: &Stall) -> String {
    let marker = match stall.status {
        StallStatus::Available => ' ',
        StallStatus::Selected => '*',
        StallStatus::Reserved => 'x',
    };
    format!("[{} {}]{marker}", stall.label, stall.size.badge())
}

/// The hall as a grid; stalls hidden by the size filter are left blank
#[must_use]
pub fn stall_map(state: &PortalState) -> String {
    let filter = state.booking.size_filter;
    let mut out = heading(&format!("Stall map (showing {filter})"));

    let mut row = None;
    for stall in state.catalog.iter() {
        if row != Some(stall.row) {
            out.push('\n');
            row = Some(stall.row);
        }
        if filter.matches(stall) {
            out.push_str(&cell(stall));
        } else {
            out.push_str(&" ".repeat(8));
        }
    }

    out.push_str("\n\n[id size]  ' ' available  '*' selected  'x' reserved");
    out
}

/// Size tiers with their dimensions and prices
#[must_use]
pub fn pricing() -> String {
    let rows: Vec<Vec<String>> = StallSize::ALL
        .iter()
        .map(|size| {
            vec![
                size.to_string(),
                size.dimensions().to_string(),
                size.price().to_string(),
            ]
        })
        .collect();
    table(&["Size", "Dimensions", "Price"], &rows)
}

/// Selected stalls, quota usage and the running total
#[must_use]
pub fn selection_summary(state: &PortalState) -> String {
    let summary = state.summary();
    let mut out = heading(&format!(
        "Selected stalls ({}/{})",
        summary.stalls().len(),
        state.booking.max_selection
    ));

    if summary.is_empty() {
        out.push_str("\nNo stalls selected");
    } else {
        for stall in summary.stalls() {
            let _ = write!(out, "\n  {} · {} · {}", stall.label, stall.size, stall.price);
        }
    }
    let _ = write!(out, "\nTotal: {}", summary.total_price());
    out
}

/// The confirmation step, or a hint when it is closed
#[must_use]
pub fn confirmation(state: &PortalState) -> String {
    if !state.booking.confirmation_open {
        return "Use `reserve` to review your selection.".to_string();
    }

    let summary = state.summary();
    let mut out = heading("Confirm reservation");
    for stall in summary.stalls() {
        let _ = write!(
            out,
            "\n  Stall {} ({}, {}) {}",
            stall.label,
            stall.size,
            stall.size.dimensions(),
            stall.price
        );
    }
    let _ = write!(
        out,
        "\nTotal: {}\n\n`confirm` to reserve, `cancel` to go back",
        summary.total_price()
    );
    out
}

/// The post-confirmation page
#[must_use]
pub fn success(snapshot: &ReservationSnapshot) -> String {
    let mut out = heading("Reservation successful!");
    if snapshot.stalls.is_empty() {
        out.push_str("\nNo reserved stalls to show");
    }
    for stall in &snapshot.stalls {
        let _ = write!(out, "\n  {} · {} · {}", stall.label, stall.size, stall.price);
    }
    let _ = write!(
        out,
        "\nTotal: {}\n\nPayment is due within 7 days. \
         A confirmation email with a QR pass will follow.",
        snapshot.total_price
    );
    out
}

/// Genre picker page
#[must_use]
pub fn genre_page(genres: &GenreState) -> String {
    let mut out = heading("Literary genres");
    if !genres.search.is_empty() {
        let _ = write!(out, "\nSearch: {}", genres.search);
    }
    let _ = write!(out, "\nAvailable: {}", genres.available().join(", "));

    let picked = if genres.selected.is_empty() {
        "none".to_string()
    } else {
        genres.selected.join(", ")
    };
    let _ = write!(out, "\nSelected ({}): {picked}", genres.selected.len());

    if !genres.saved.is_empty() {
        let _ = write!(out, "\nSaved: {}", genres.saved.join(", "));
    }
    out
}

fn reservation_rows(reservations: &[&Reservation]) -> Vec<Vec<String>> {
    reservations
        .iter()
        .map(|r| {
            let stalls: Vec<&str> = r.stalls.iter().map(|id| id.as_str()).collect();
            vec![
                r.id.to_string(),
                stalls.join(", "),
                r.total_price.to_string(),
                r.status.to_string(),
                r.reserved_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect()
}

/// Vendor dashboard: quota progress and a short reservation list
#[must_use]
pub fn dashboard(board: &VendorDashboard<'_>, saved_genres: &[String]) -> String {
    let mut out = heading("Dashboard");
    let _ = write!(
        out,
        "\nStalls reserved: {}/{} {}\nRemaining: {}\nTotal: {}",
        board.stalls_reserved,
        board.max_stalls,
        progress_bar(board.progress_percent(), 20),
        board.remaining(),
        board.total_spent
    );
    if !saved_genres.is_empty() {
        let _ = write!(out, "\nGenres: {}", saved_genres.join(", "));
    }
    out
}

/// Every reservation of the signed-in vendor
#[must_use]
pub fn my_reservations(board: &VendorDashboard<'_>) -> String {
    let mut out = heading("My reservations");
    if board.reservations.is_empty() {
        out.push_str("\nYou have no reservations yet");
        return out;
    }
    let _ = write!(
        out,
        "\n{}",
        table(
            &["Id", "Stalls", "Total", "Status", "Date"],
            &reservation_rows(&board.reservations)
        )
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, SizeFilter};

    fn state() -> PortalState {
        let mut selected = Stall::new(0, 1, StallSize::Medium);
        selected.status = StallStatus::Selected;
        let catalog = Catalog::from_stalls(vec![
            Stall::new(0, 0, StallSize::Small),
            selected,
            Stall::new(1, 0, StallSize::Large).reserved(),
            Stall::new(1, 1, StallSize::Small),
        ])
        .unwrap_or_default();
        let mut state = PortalState::new(catalog, 3);
        state.booking.selection.push(crate::types::StallId::from_grid(0, 1));
        state
    }

    #[test]
    fn map_marks_status() {
        let text = stall_map(&state());
        assert!(text.contains("[A01 S] [A02 M]*"));
        assert!(text.contains("[B01 L]x[B02 S] "));
    }

    #[test]
    fn map_blanks_filtered_stalls() {
        let mut state = state();
        state.booking.size_filter = SizeFilter::Only(StallSize::Large);
        let text = stall_map(&state);
        assert!(!text.contains("A01"));
        assert!(text.contains("[B01 L]x"));
    }

    #[test]
    fn summary_shows_total() {
        let text = selection_summary(&state());
        assert!(text.contains("Selected stalls (1/3)"));
        assert!(text.contains("Total: LKR 25,000"));
    }

    #[test]
    fn empty_success_page_shows_zero() {
        let text = success(&ReservationSnapshot::default());
        assert!(text.contains("No reserved stalls"));
        assert!(text.contains("Total: LKR 0"));
    }

    #[test]
    fn pricing_lists_tiers() {
        let text = pricing();
        assert!(text.contains("6m × 4m"));
        assert!(text.contains("LKR 40,000"));
    }
}
