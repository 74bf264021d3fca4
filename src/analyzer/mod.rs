pub mod batch;
pub mod dps;
pub mod format;
mod item_processor;
pub mod potential;
pub mod projection;
pub mod reconciler;
pub mod relevance;
pub mod text_scan;
pub mod verdict;

pub use batch::{listings_from_response, process_batch};
pub use dps::estimate_dps;
pub use item_processor::{recommendation, row_tag, ItemProcessor};
pub use projection::{estimate_potential_dps, estimated_gain_pct, Damping};
pub use reconciler::{reconcile, Reconciliation};
pub use relevance::{DamageRelevance, KeywordRule, RelevantStat, RELEVANCE_TABLE_VERSION};
pub use verdict::{sort_for_display, VerdictAggregator};
