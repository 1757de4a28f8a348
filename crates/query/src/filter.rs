//! Filter configuration and predicates.
//!
//! All predicates AND together; an absent criterion disables its predicate.
//! Numeric bounds are parsed fail-open: malformed caller input becomes "no
//! bound", and unparseable record-side spec text makes the spec predicates
//! pass. This is deliberate, observed behavior; do not switch to fail-closed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use millstock_core::ValueObject;
use millstock_materials::{Category, CategoryGroup, MaterialRecord};

/// Stock-level bucket.
///
/// Mirrors the derived `StockStatus` classification: `Low` is
/// `0 < stock < reorder_level`, so zero-stock records land in `Out` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    In,
    Low,
    Out,
}

impl StockLevel {
    /// Parse a bucket name; unknown values (including `"all"`) disable the
    /// predicate rather than erroring.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Some(StockLevel::In),
            "low" => Some(StockLevel::Low),
            "out" => Some(StockLevel::Out),
            _ => None,
        }
    }

    fn matches(self, record: &MaterialRecord) -> bool {
        match self {
            StockLevel::In => record.stock > 0.0,
            StockLevel::Low => record.stock > 0.0 && record.stock < record.reorder_level,
            StockLevel::Out => record.stock == 0.0,
        }
    }
}

/// Optional numeric `[min, max]` bound pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeFilter {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Build from raw user input, fail-open: bounds that don't parse to a
    /// finite number are dropped, never rejected.
    pub fn parse(min: Option<&str>, max: Option<&str>) -> Self {
        Self {
            min: min.and_then(leading_number),
            max: max.and_then(leading_number),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: f64) -> bool {
        if let Some(min) = self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return false;
            }
        }
        true
    }

    /// Spec-text predicate: bounded check when the record value parses,
    /// non-restrictive when it doesn't (or is absent).
    fn passes_text(&self, text: Option<&str>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        match text.and_then(leading_number) {
            Some(value) => self.contains(value),
            None => true,
        }
    }
}

/// Optional `[from, to]` date bound pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRangeFilter {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, value: DateTime<Utc>) -> bool {
        if let Some(from) = self.from {
            if value < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if value > to {
                return false;
            }
        }
        true
    }

    /// A record with no date at all fails a bounded range.
    fn contains_opt(&self, value: Option<DateTime<Utc>>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        match value {
            Some(v) => self.contains(v),
            None => false,
        }
    }
}

/// Sub-filters over the free-text specification fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecFilter {
    /// Case-insensitive substring over `specifications.color`.
    pub color: Option<String>,
    /// Exact match over `specifications.quality`.
    pub quality: Option<String>,
    pub weight: RangeFilter,
    pub width: RangeFilter,
    pub length: RangeFilter,
}

impl SpecFilter {
    fn matches(&self, record: &MaterialRecord) -> bool {
        let spec = record.specifications.as_ref();

        if let Some(wanted) = non_blank(self.color.as_deref()) {
            let color = spec.and_then(|s| s.color.as_deref());
            match color {
                Some(c) if contains_ci(c, wanted) => {}
                _ => return false,
            }
        }

        if let Some(wanted) = non_blank(self.quality.as_deref()) {
            if spec.and_then(|s| s.quality.as_deref()) != Some(wanted) {
                return false;
            }
        }

        if !self.weight.passes_text(spec.and_then(|s| s.weight.as_deref())) {
            return false;
        }

        let dims = spec.and_then(|s| s.dimensions.as_ref());
        if !self.width.passes_text(dims.and_then(|d| d.width.as_deref())) {
            return false;
        }
        if !self.length.passes_text(dims.and_then(|d| d.length.as_deref())) {
            return false;
        }

        true
    }
}

/// Immutable filter configuration for one query-engine run.
///
/// `Default` is the empty filter (every record passes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialFilter {
    /// Case-insensitive substring over name, supplier, location, spec color
    /// and spec quality; any match passes.
    pub search: Option<String>,
    pub category: Option<Category>,
    pub group: Option<CategoryGroup>,
    pub stock_level: Option<StockLevel>,
    pub price: RangeFilter,
    pub stock: RangeFilter,
    pub created: DateRangeFilter,
    pub restocked: DateRangeFilter,
    pub spec: SpecFilter,
}

impl ValueObject for MaterialFilter {}

impl MaterialFilter {
    /// True when every active predicate passes (logical AND).
    pub fn matches(&self, record: &MaterialRecord) -> bool {
        if let Some(term) = non_blank(self.search.as_deref()) {
            if !search_matches(record, term) {
                return false;
            }
        }

        if let Some(category) = self.category {
            if record.category != category {
                return false;
            }
        }

        if let Some(group) = self.group {
            if record.category.group() != group {
                return false;
            }
        }

        if let Some(level) = self.stock_level {
            if !level.matches(record) {
                return false;
            }
        }

        if !self.price.contains(record.unit_price) {
            return false;
        }
        if !self.stock.contains(record.stock) {
            return false;
        }
        if !self.created.contains(record.created_at) {
            return false;
        }
        if !self.restocked.contains_opt(record.last_restocked) {
            return false;
        }

        self.spec.matches(record)
    }
}

fn search_matches(record: &MaterialRecord, term: &str) -> bool {
    let spec = record.specifications.as_ref();
    let haystacks = [
        Some(record.name.as_str()),
        record.supplier.as_deref(),
        record.location.as_deref(),
        spec.and_then(|s| s.color.as_deref()),
        spec.and_then(|s| s.quality.as_deref()),
    ];
    haystacks
        .into_iter()
        .flatten()
        .any(|h| contains_ci(h, term))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// `parseFloat`-style leading-number parse: `"200 gsm"` -> `200.0`,
/// `"heavy"` -> `None`. Non-finite results are dropped.
pub fn leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let mut end = 0;
    let mut seen_digit = false;
    for (i, c) in trimmed.char_indices() {
        match c {
            '+' | '-' if i == 0 => end = i + c.len_utf8(),
            '0'..='9' => {
                seen_digit = true;
                end = i + c.len_utf8();
            }
            '.' if trimmed[..i].matches('.').count() == 0 => end = i + c.len_utf8(),
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }
    trimmed[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
