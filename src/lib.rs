//! Reroll potential analysis for Path of Exile 2 trade listings.
//!
//! Listings are decoded from the trade API's JSON, their structured modifier
//! ranges are reconciled with the displayed text, and each item gets a
//! verdict on whether rerolling its damage modifiers is worth the currency.

pub mod analyzer;
pub mod config;
pub mod data;
pub mod errors;
pub mod models;
pub mod report;

pub use analyzer::{process_batch, ItemProcessor};
pub use config::AnalysisConfig;
pub use data::WeaponBaseDatabase;
pub use errors::{AnalyzerError, Result};
