//! Presentation logic shared by the public site and the admin dashboard.
//! Everything here is pure: records in, display values out.

pub mod filters;
pub mod format;
pub mod stats;
pub mod toast;
