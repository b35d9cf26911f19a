//! Staff pages: occupancy dashboard, stall management and the reservation list.

use super::layout::{heading, progress_bar, table};
use crate::projections::{OccupancyStats, ReservationPage};
use crate::types::{Stall, StallSize};
use std::fmt::Write;

/// Width of the per-size chart bars
const BAR_WIDTH: usize = 30;

/// Occupancy dashboard with per-size table and charts
#[must_use]
pub fn dashboard(stats: &OccupancyStats) -> String {
    let mut out = heading("Occupancy");
    let _ = write!(
        out,
        "\nTotal stalls: {}\nReserved: {}\nAvailable: {}\nOccupancy: {}",
        stats.overall.total,
        stats.overall.reserved,
        stats.overall.available,
        progress_bar(stats.occupancy_rate(), BAR_WIDTH)
    );

    let rows: Vec<Vec<String>> = StallSize::ALL
        .iter()
        .map(|&size| {
            let counts = stats.by_size(size);
            vec![
                size.to_string(),
                counts.total.to_string(),
                counts.reserved.to_string(),
                counts.available.to_string(),
                format!("{}%", counts.occupancy_rate()),
            ]
        })
        .collect();
    let _ = write!(
        out,
        "\n\n{}",
        table(&["Size", "Total", "Reserved", "Available", "Occupancy"], &rows)
    );

    out.push_str(&heading("Reserved vs available by size"));
    let widest = stats
        .size_bars()
        .iter()
        .map(|bar| bar.reserved + bar.available)
        .max()
        .unwrap_or(0)
        .max(1);
    for bar in stats.size_bars() {
        let reserved = bar.reserved * BAR_WIDTH / widest;
        let available = bar.available * BAR_WIDTH / widest;
        let _ = write!(
            out,
            "\n{:<7}{}{} {}/{}",
            bar.size.as_str(),
            "█".repeat(reserved),
            "░".repeat(available),
            bar.reserved,
            bar.available
        );
    }

    let slices: Vec<String> = stats
        .pie()
        .iter()
        .map(|slice| format!("{} {}", slice.label, slice.value))
        .collect();
    let _ = write!(out, "\n\nShare: {}", slices.join(" / "));
    out
}

/// Stall management listing
#[must_use]
pub fn stall_list<'a>(stalls: impl Iterator<Item = &'a Stall>) -> String {
    let rows: Vec<Vec<String>> = stalls
        .map(|stall| {
            vec![
                stall.label.clone(),
                stall.size.to_string(),
                stall.price.to_string(),
                stall.status.to_string(),
                stall.reserved_by.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();
    if rows.is_empty() {
        return "No stalls match".to_string();
    }
    table(&["Stall", "Size", "Price", "Status", "Reserved by"], &rows)
}

/// One stall in full
#[must_use]
pub fn stall_detail(stall: &Stall) -> String {
    let mut out = heading(&format!("Stall {}", stall.label));
    let _ = write!(
        out,
        "\nSize: {} ({})\nPrice: {}\nStatus: {}\nGrid: row {}, column {}",
        stall.size,
        stall.size.dimensions(),
        stall.price,
        stall.status,
        stall.row + 1,
        stall.col + 1
    );
    if let Some(holder) = &stall.reserved_by {
        let _ = write!(out, "\nReserved by: {holder}");
    }
    out
}

/// One page of the reservation list
#[must_use]
pub fn reservation_page(page: &ReservationPage<'_>) -> String {
    let mut out = heading("Reservations");
    if page.entries.is_empty() {
        out.push_str("\nNo reservations found");
    } else {
        let rows: Vec<Vec<String>> = page
            .entries
            .iter()
            .map(|r| {
                let stalls: Vec<&str> = r.stalls.iter().map(|id| id.as_str()).collect();
                vec![
                    r.id.to_string(),
                    r.vendor.clone(),
                    stalls.join(", "),
                    r.total_price.to_string(),
                    r.status.to_string(),
                ]
            })
            .collect();
        let _ = write!(
            out,
            "\n{}",
            table(&["Id", "Vendor", "Stalls", "Total", "Status"], &rows)
        );
    }
    let _ = write!(
        out,
        "\n{}  (page {} of {})",
        page.showing(),
        page.page,
        page.total_pages.max(1)
    );
    out
}
