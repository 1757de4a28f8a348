use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use millstock_core::{DomainError, DomainResult, Entity, MaterialId, ValueObject};

use crate::category::{Category, Unit};
use crate::spec::Specifications;

/// Reference to a stored image asset (opaque path/key in the asset store).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValueObject for AssetRef {}

/// Derived stock classification. Never stored; recomputed from
/// `(stock, reorder_level)` on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Authoritative raw-material record.
///
/// Construction goes through [`MaterialDraft::build`]; mutation goes through
/// [`MaterialRecord::apply_patch`] and [`MaterialRecord::adjust_stock`] so the
/// non-negativity invariant and `updated_at` bookkeeping cannot be bypassed.
/// `total_value` and `stock_status` are accessors, not fields, so they can
/// never drift from the authoritative values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub id: MaterialId,
    pub name: String,
    pub category: Category,
    pub stock: f64,
    pub unit: Unit,
    pub unit_price: f64,
    pub reorder_level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<Specifications>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_restocked: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<AssetRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for MaterialRecord {
    type Id = MaterialId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl MaterialRecord {
    /// `stock * unit_price`, recomputed on every call.
    pub fn total_value(&self) -> f64 {
        self.stock * self.unit_price
    }

    /// Three-way stock classification.
    ///
    /// Boundary rule: `stock == reorder_level` counts as in stock, not low.
    pub fn stock_status(&self) -> StockStatus {
        if self.stock == 0.0 {
            StockStatus::OutOfStock
        } else if self.stock < self.reorder_level {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    /// Merge a patch into this record, re-validate, and bump `updated_at`.
    ///
    /// The record is untouched when validation fails.
    pub fn apply_patch(&mut self, patch: MaterialPatch, now: DateTime<Utc>) -> DomainResult<()> {
        let mut next = self.clone();

        if let Some(name) = patch.name {
            next.name = name;
        }
        if let Some(category) = patch.category {
            next.category = category;
        }
        if let Some(stock) = patch.stock {
            next.stock = stock;
        }
        if let Some(unit) = patch.unit {
            next.unit = unit;
        }
        if let Some(unit_price) = patch.unit_price {
            next.unit_price = unit_price;
        }
        if let Some(reorder_level) = patch.reorder_level {
            next.reorder_level = reorder_level;
        }
        if let Some(supplier) = patch.supplier {
            next.supplier = Some(supplier);
        }
        if let Some(location) = patch.location {
            next.location = Some(location);
        }
        if let Some(notes) = patch.notes {
            next.notes = Some(notes);
        }
        if let Some(specifications) = patch.specifications {
            next.specifications = Some(specifications);
        }
        if let Some(last_restocked) = patch.last_restocked {
            next.last_restocked = Some(last_restocked);
        }
        if let Some(expiry_date) = patch.expiry_date {
            next.expiry_date = Some(expiry_date);
        }
        if let Some(image) = patch.image {
            next.image = Some(image);
        }

        next.validate()?;
        next.updated_at = now;
        *self = next;
        Ok(())
    }

    /// Apply a signed stock delta.
    ///
    /// Rejects adjustments that would drive stock negative, leaving the record
    /// untouched. A positive delta counts as a restock and stamps
    /// `last_restocked`.
    pub fn adjust_stock(&mut self, delta: f64, now: DateTime<Utc>) -> DomainResult<()> {
        if !delta.is_finite() {
            return Err(DomainError::validation("delta", "must be a finite number"));
        }

        let new_stock = self.stock + delta;
        if new_stock < 0.0 {
            return Err(DomainError::validation(
                "stock",
                format!(
                    "adjustment of {delta} would drive stock negative (current: {})",
                    self.stock
                ),
            ));
        }

        self.stock = new_stock;
        if delta > 0.0 {
            self.last_restocked = Some(now);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Field-level validation shared by create and update paths.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name", "must not be empty"));
        }
        validate_quantity("stock", self.stock)?;
        validate_quantity("unit_price", self.unit_price)?;
        validate_quantity("reorder_level", self.reorder_level)?;
        Ok(())
    }
}

fn validate_quantity(field: &'static str, value: f64) -> DomainResult<()> {
    if !value.is_finite() {
        return Err(DomainError::validation(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(DomainError::validation(field, "must not be negative"));
    }
    Ok(())
}

/// Input for creating a record. The service assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDraft {
    pub name: String,
    pub category: Category,
    pub stock: f64,
    pub unit: Unit,
    pub unit_price: f64,
    pub reorder_level: f64,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub specifications: Option<Specifications>,
    #[serde(default)]
    pub last_restocked: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image: Option<AssetRef>,
}

impl MaterialDraft {
    /// Validate the draft and build a full record with server-assigned
    /// identity and timestamps.
    pub fn build(self, id: MaterialId, now: DateTime<Utc>) -> DomainResult<MaterialRecord> {
        let record = MaterialRecord {
            id,
            name: self.name,
            category: self.category,
            stock: self.stock,
            unit: self.unit,
            unit_price: self.unit_price,
            reorder_level: self.reorder_level,
            supplier: self.supplier,
            location: self.location,
            notes: self.notes,
            specifications: self.specifications,
            last_restocked: self.last_restocked,
            expiry_date: self.expiry_date,
            image: self.image,
            created_at: now,
            updated_at: now,
        };
        record.validate()?;
        Ok(record)
    }
}

/// Partial update: provided fields overwrite, absent fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub stock: Option<f64>,
    #[serde(default)]
    pub unit: Option<Unit>,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub reorder_level: Option<f64>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub specifications: Option<Specifications>,
    #[serde(default)]
    pub last_restocked: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub image: Option<AssetRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_draft(name: &str, stock: f64, reorder_level: f64, unit_price: f64) -> MaterialDraft {
        MaterialDraft {
            name: name.to_string(),
            category: Category::CottonFabric,
            stock,
            unit: Unit::Kg,
            unit_price,
            reorder_level,
            supplier: None,
            location: None,
            notes: None,
            specifications: None,
            last_restocked: None,
            expiry_date: None,
            image: None,
        }
    }

    fn test_record(name: &str, stock: f64, reorder_level: f64, unit_price: f64) -> MaterialRecord {
        test_draft(name, stock, reorder_level, unit_price)
            .build(MaterialId::new(), Utc::now())
            .unwrap()
    }

    #[test]
    fn build_rejects_empty_name_naming_the_field() {
        let err = test_draft("   ", 1.0, 1.0, 1.0)
            .build(MaterialId::new(), Utc::now())
            .unwrap_err();
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, "name"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn build_rejects_negative_stock() {
        let err = test_draft("Cotton", -1.0, 1.0, 1.0)
            .build(MaterialId::new(), Utc::now())
            .unwrap_err();
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, "stock"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn total_value_is_stock_times_unit_price() {
        let record = test_record("Cotton A", 5.0, 10.0, 2.0);
        assert_eq!(record.total_value(), 10.0);
    }

    #[test]
    fn stock_status_three_way_rule() {
        assert_eq!(test_record("a", 0.0, 10.0, 1.0).stock_status(), StockStatus::OutOfStock);
        assert_eq!(test_record("b", 5.0, 10.0, 1.0).stock_status(), StockStatus::LowStock);
        assert_eq!(test_record("c", 20.0, 10.0, 1.0).stock_status(), StockStatus::InStock);
        // Boundary: stock == reorder_level is in stock, not low.
        assert_eq!(test_record("d", 10.0, 10.0, 1.0).stock_status(), StockStatus::InStock);
    }

    #[test]
    fn adjust_below_zero_is_rejected_and_stock_unchanged() {
        let mut record = test_record("Cotton B", 0.0, 10.0, 3.0);
        let err = record.adjust_stock(-1.0, Utc::now()).unwrap_err();
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, "stock"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(record.stock, 0.0);
        assert!(record.last_restocked.is_none());
    }

    #[test]
    fn positive_adjust_restocks_and_flips_status() {
        let mut record = test_record("Cotton A", 5.0, 10.0, 2.0);
        assert_eq!(record.stock_status(), StockStatus::LowStock);

        let now = Utc::now();
        record.adjust_stock(5.0, now).unwrap();

        assert_eq!(record.stock, 10.0);
        assert_eq!(record.last_restocked, Some(now));
        assert_eq!(record.updated_at, now);
        assert_eq!(record.stock_status(), StockStatus::InStock);
    }

    #[test]
    fn negative_adjust_does_not_touch_last_restocked() {
        let mut record = test_record("Cotton", 5.0, 10.0, 2.0);
        record.adjust_stock(-2.0, Utc::now()).unwrap();
        assert_eq!(record.stock, 3.0);
        assert!(record.last_restocked.is_none());
    }

    #[test]
    fn patch_merges_and_revalidates() {
        let mut record = test_record("Cotton", 5.0, 10.0, 2.0);
        let before = record.clone();

        let bad = MaterialPatch {
            unit_price: Some(-3.0),
            ..MaterialPatch::default()
        };
        assert!(record.apply_patch(bad, Utc::now()).is_err());
        assert_eq!(record, before);

        let now = Utc::now();
        let good = MaterialPatch {
            unit_price: Some(3.0),
            supplier: Some("Meridian Textiles".to_string()),
            ..MaterialPatch::default()
        };
        record.apply_patch(good, now).unwrap();
        assert_eq!(record.unit_price, 3.0);
        assert_eq!(record.supplier.as_deref(), Some("Meridian Textiles"));
        assert_eq!(record.updated_at, now);
        assert_eq!(record.total_value(), 15.0);
    }

    proptest! {
        /// Derived value is always the product of the authoritative fields,
        /// before and after any in-range adjustment.
        #[test]
        fn total_value_tracks_authoritative_fields(
            stock in 0.0f64..1e6,
            price in 0.0f64..1e4,
            delta in -1e6f64..1e6,
        ) {
            let mut record = test_record("prop", stock, 10.0, price);
            prop_assert_eq!(record.total_value(), stock * price);

            let _ = record.adjust_stock(delta, Utc::now());
            prop_assert!(record.stock >= 0.0);
            prop_assert_eq!(record.total_value(), record.stock * record.unit_price);
        }

        /// Status matches the three-way rule for any (stock, reorder) pair.
        #[test]
        fn stock_status_matches_rule(stock in 0.0f64..1e6, reorder in 0.0f64..1e6) {
            let record = test_record("prop", stock, reorder, 1.0);
            let expected = if stock == 0.0 {
                StockStatus::OutOfStock
            } else if stock < reorder {
                StockStatus::LowStock
            } else {
                StockStatus::InStock
            };
            prop_assert_eq!(record.stock_status(), expected);
        }
    }
}
