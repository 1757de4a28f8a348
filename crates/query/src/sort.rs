//! Sort configuration: one active key plus a direction.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use millstock_core::ValueObject;
use millstock_materials::MaterialRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Category,
    Stock,
    UnitPrice,
    LastRestocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Active sort key + direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::Name,
            direction: SortDirection::Ascending,
        }
    }
}

impl ValueObject for SortSpec {}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn ascending(key: SortKey) -> Self {
        Self::new(key, SortDirection::Ascending)
    }

    /// Selecting the active key flips direction; selecting a new key resets
    /// to ascending.
    pub fn toggle(self, key: SortKey) -> Self {
        if self.key == key {
            let direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
            Self { key: self.key, direction }
        } else {
            Self::ascending(key)
        }
    }

    /// Total order over records for this spec (used with a stable sort).
    pub fn compare(&self, a: &MaterialRecord, b: &MaterialRecord) -> Ordering {
        let ord = match self.key {
            SortKey::Name => compare_ci(&a.name, &b.name),
            SortKey::Category => compare_ci(a.category.label(), b.category.label()),
            SortKey::Stock => a.stock.total_cmp(&b.stock),
            SortKey::UnitPrice => a.unit_price.total_cmp(&b.unit_price),
            SortKey::LastRestocked => {
                restock_key(a.last_restocked).cmp(&restock_key(b.last_restocked))
            }
        };
        match self.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

fn compare_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

// Missing restock date sorts as the earliest possible date.
fn restock_key(value: Option<DateTime<Utc>>) -> DateTime<Utc> {
    value.unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_on_same_key_and_resets_on_new_key() {
        let spec = SortSpec::default();
        assert_eq!(spec.key, SortKey::Name);
        assert_eq!(spec.direction, SortDirection::Ascending);

        let flipped = spec.toggle(SortKey::Name);
        assert_eq!(flipped.direction, SortDirection::Descending);

        let reset = flipped.toggle(SortKey::Stock);
        assert_eq!(reset.key, SortKey::Stock);
        assert_eq!(reset.direction, SortDirection::Ascending);
    }
}
