//! Core domain types and logic.

pub mod price_table;
pub mod returns;
pub mod linalg;
pub mod frontier;
pub mod selectors;
pub mod analysis;
pub mod config_validation;
pub mod error;
