//! Layout helpers shared by vendor and staff pages.

use crate::routes::Route;
use std::fmt::Write;

/// Width of rules and headers
pub const PAGE_WIDTH: usize = 72;

/// Horizontal rule
#[must_use]
pub fn rule() -> String {
    "─".repeat(PAGE_WIDTH)
}

/// Title line, navigation links and signed-in user, framed by rules
#[must_use]
pub fn header_line(title: &str, nav: &[(&str, Route)], user: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());

    let who = user.map_or_else(
        || "not signed in".to_string(),
        |email| format!("signed in as {email}"),
    );
    let pad = PAGE_WIDTH.saturating_sub(title.chars().count() + who.chars().count());
    let _ = writeln!(out, "{title}{}{who}", " ".repeat(pad.max(1)));

    if !nav.is_empty() {
        let links: Vec<String> = nav
            .iter()
            .map(|(label, route)| format!("{label} ({route})"))
            .collect();
        let _ = writeln!(out, "{}", links.join(" · "));
    }

    let _ = write!(out, "{}", rule());
    out
}

/// Section heading
#[must_use]
pub fn heading(text: &str) -> String {
    format!("\n{text}\n{}", "=".repeat(text.chars().count()))
}

/// Left-aligned table with a header row
#[must_use]
pub fn table(columns: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = padded_row(columns.iter().copied(), &widths);
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    let _ = write!(out, "\n{}", "-".repeat(total));
    for row in rows {
        let _ = write!(out, "\n{}", padded_row(row.iter().map(String::as_str), &widths));
    }
    out
}

fn padded_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Text progress bar, `percent` clamped to 0..=100
#[must_use]
pub fn progress_bar(percent: usize, width: usize) -> String {
    let filled = percent.min(100) * width / 100;
    format!("[{}{}] {}%", "#".repeat(filled), ".".repeat(width - filled), percent.min(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_carries_title_nav_and_user() {
        let text = header_line("CIBF 2025", &[("Reserve", Route::Reserve)], Some("a@b.lk"));
        assert!(text.contains("CIBF 2025"));
        assert!(text.contains("Reserve (/reserve)"));
        assert!(text.contains("signed in as a@b.lk"));
    }

    #[test]
    fn table_pads_columns() {
        let text = table(
            &["Id", "Vendor"],
            &[vec!["RES0001".to_string(), "Publisher 1".to_string()]],
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Id       Vendor");
        assert_eq!(lines[2], "RES0001  Publisher 1");
    }

    #[test]
    fn progress_bar_clamps() {
        assert_eq!(progress_bar(50, 4), "[##..] 50%");
        assert_eq!(progress_bar(250, 4), "[####] 100%");
    }
}
