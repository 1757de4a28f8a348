//! Raw-material domain module.
//!
//! This crate contains the authoritative material record, its enumerations and
//! validation rules, implemented purely as deterministic domain logic (no IO,
//! no HTTP, no storage). Derived values (`total_value`, `stock_status`) are
//! computed accessors, never stored fields.

pub mod category;
pub mod record;
pub mod spec;

pub use category::{Category, CategoryGroup, Unit};
pub use record::{AssetRef, MaterialDraft, MaterialPatch, MaterialRecord, StockStatus};
pub use spec::{Dimensions, Specifications};
