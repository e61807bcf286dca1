//! External data sources: tracking sheets, KMZ archives, recipient database.

pub mod kmz_loader;
pub mod recipients;
pub mod sheet_loader;
