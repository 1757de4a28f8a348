//! Inventory query engine.
//!
//! Pure, synchronous transformation of an authoritative record collection plus
//! a filter/sort configuration into an ordered view collection. No IO, no
//! mutation of the source, safe to run on any thread.
//!
//! Filter criteria are held in a single immutable value object
//! ([`MaterialFilter`]) rather than free-floating state, so the whole pipeline
//! is testable without any rendering or HTTP layer. Malformed numeric input
//! degrades to "no bound"; filter parsing never fails the list.

pub mod engine;
pub mod filter;
pub mod page;
pub mod sort;

pub use engine::run;
pub use filter::{DateRangeFilter, MaterialFilter, RangeFilter, SpecFilter, StockLevel, leading_number};
pub use page::Page;
pub use sort::{SortDirection, SortKey, SortSpec};
