pub mod field_catalog;
pub mod filter_set;
pub mod registry;
pub mod reports;
