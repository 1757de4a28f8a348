//! Filter + sort pipeline over an in-memory record collection.

use millstock_materials::MaterialRecord;

use crate::filter::MaterialFilter;
use crate::sort::SortSpec;

/// Produce the ordered view collection for one filter/sort configuration.
///
/// Deterministic and side-effect free: the source slice is never mutated, and
/// the same inputs always yield the same view. The sort is stable, so records
/// with equal keys keep their source order.
pub fn run(
    records: &[MaterialRecord],
    filter: &MaterialFilter,
    sort: SortSpec,
) -> Vec<MaterialRecord> {
    let mut view: Vec<MaterialRecord> = records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect();
    view.sort_by(|a, b| sort.compare(a, b));
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use millstock_core::MaterialId;
    use millstock_materials::{Category, MaterialDraft, Unit};
    use proptest::prelude::*;

    use crate::filter::StockLevel;
    use crate::sort::{SortDirection, SortKey};

    fn record(name: &str, stock: f64, reorder: f64, price: f64) -> MaterialRecord {
        MaterialDraft {
            name: name.to_string(),
            category: Category::CottonFabric,
            stock,
            unit: Unit::Kg,
            unit_price: price,
            reorder_level: reorder,
            supplier: None,
            location: None,
            notes: None,
            specifications: None,
            last_restocked: None,
            expiry_date: None,
            image: None,
        }
        .build(MaterialId::new(), Utc::now())
        .unwrap()
    }

    fn sample() -> Vec<MaterialRecord> {
        vec![
            record("Cotton A", 5.0, 10.0, 2.0),
            record("Cotton B", 0.0, 10.0, 3.0),
        ]
    }

    #[test]
    fn bucket_filters_split_the_sample() {
        let records = sample();

        let low = MaterialFilter {
            stock_level: Some(StockLevel::Low),
            ..MaterialFilter::default()
        };
        let out = MaterialFilter {
            stock_level: Some(StockLevel::Out),
            ..MaterialFilter::default()
        };

        let view = run(&records, &low, SortSpec::default());
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "Cotton A");

        let view = run(&records, &out, SortSpec::default());
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "Cotton B");

        assert_eq!(records[0].total_value(), 10.0);
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = sample();
        let filter = MaterialFilter {
            stock_level: Some(StockLevel::In),
            ..MaterialFilter::default()
        };
        let first = run(&records, &filter, SortSpec::default());
        let second = run(&first, &filter, SortSpec::default());
        assert_eq!(first, second);
    }

    #[test]
    fn name_sort_desc_reverses_asc_for_distinct_names() {
        let records = vec![
            record("Linen", 1.0, 1.0, 1.0),
            record("Cotton", 1.0, 1.0, 1.0),
            record("Silk", 1.0, 1.0, 1.0),
        ];
        let filter = MaterialFilter::default();

        let asc = run(&records, &filter, SortSpec::ascending(SortKey::Name));
        let desc = run(
            &records,
            &filter,
            SortSpec::new(SortKey::Name, SortDirection::Descending),
        );

        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(desc, reversed);
    }

    #[test]
    fn missing_restock_date_sorts_earliest() {
        let mut a = record("a", 1.0, 1.0, 1.0);
        let b = record("b", 1.0, 1.0, 1.0);
        a.last_restocked = Some(Utc::now());

        let view = run(
            &[a.clone(), b.clone()],
            &MaterialFilter::default(),
            SortSpec::ascending(SortKey::LastRestocked),
        );
        assert_eq!(view[0].name, "b");
        assert_eq!(view[1].name, "a");
    }

    #[test]
    fn source_collection_is_untouched() {
        let records = sample();
        let before = records.clone();
        let _ = run(
            &records,
            &MaterialFilter {
                stock_level: Some(StockLevel::Out),
                ..MaterialFilter::default()
            },
            SortSpec::ascending(SortKey::UnitPrice),
        );
        assert_eq!(records, before);
    }

    proptest! {
        /// Descending is the exact reverse of ascending when names are distinct.
        #[test]
        fn sort_reversal_property(stocks in proptest::collection::vec(0.0f64..100.0, 1..12)) {
            let records: Vec<MaterialRecord> = stocks
                .iter()
                .enumerate()
                .map(|(i, s)| record(&format!("material-{i:02}"), *s, 10.0, 1.0))
                .collect();

            let filter = MaterialFilter::default();
            let asc = run(&records, &filter, SortSpec::ascending(SortKey::Name));
            let desc = run(
                &records,
                &filter,
                SortSpec::new(SortKey::Name, SortDirection::Descending),
            );

            let mut reversed = asc;
            reversed.reverse();
            prop_assert_eq!(desc, reversed);
        }
    }
}
