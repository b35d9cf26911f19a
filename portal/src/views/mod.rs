//! Plain-text rendering of portal pages.
//!
//! Vendor and staff pages get their own header types; both build on the
//! helpers in [`layout`].

pub mod header;
pub mod layout;
pub mod staff;
pub mod vendor;

pub use header::{StaffHeader, VendorHeader};
