//! Page headers for the two audiences.

use super::layout::header_line;
use crate::routes::Route;

const VENDOR_TITLE: &str = "CIBF 2025 · Stall Reservations";
const STAFF_TITLE: &str = "CIBF 2025 · Staff Console";

/// Header on vendor pages
#[derive(Clone, Copy, Debug, Default)]
pub struct VendorHeader<'a> {
    /// Signed-in vendor email
    pub email: Option<&'a str>,
}

impl VendorHeader<'_> {
    /// Renders the header
    #[must_use]
    pub fn render(&self) -> String {
        let nav: &[(&str, Route)] = if self.email.is_some() {
            &[
                ("Dashboard", Route::Dashboard),
                ("Reserve", Route::Reserve),
                ("Genres", Route::Genres),
                ("My reservations", Route::MyReservations),
            ]
        } else {
            &[("Home", Route::Home), ("Login", Route::Login)]
        };
        header_line(VENDOR_TITLE, nav, self.email)
    }
}

/// Header on staff pages
#[derive(Clone, Copy, Debug, Default)]
pub struct StaffHeader<'a> {
    /// Signed-in employee email
    pub email: Option<&'a str>,
}

impl StaffHeader<'_> {
    /// Renders the header
    #[must_use]
    pub fn render(&self) -> String {
        let nav: &[(&str, Route)] = if self.email.is_some() {
            &[
                ("Dashboard", Route::StaffDashboard),
                ("Stalls", Route::StaffStalls),
                ("Reservations", Route::StaffReservations),
            ]
        } else {
            &[("Staff login", Route::StaffLogin)]
        };
        header_line(STAFF_TITLE, nav, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_nav_depends_on_session() {
        let guest = VendorHeader { email: None }.render();
        let vendor = VendorHeader {
            email: Some("a@b.lk"),
        }
        .render();

        assert!(guest.contains("/login"));
        assert!(!guest.contains("/reserve"));
        assert!(vendor.contains("/my-reservations"));
    }

    #[test]
    fn staff_header_links_console_pages() {
        let text = StaffHeader {
            email: Some("admin@cibf.lk"),
        }
        .render();
        assert!(text.contains("Staff Console"));
        assert!(text.contains("/employee/stalls"));
        assert!(!text.contains("/reserve"));
    }
}
