//! Query-param and response mapping.
//!
//! List-endpoint bounds arrive as raw strings and are parsed fail-open: a
//! malformed bound becomes "no bound" and an unknown sort key falls back to
//! the default, so a bad query string can never fail the whole list.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Value as JsonValue, json};

use millstock_materials::{Category, CategoryGroup, MaterialRecord};
use millstock_query::{
    DateRangeFilter, MaterialFilter, Page, RangeFilter, SortDirection, SortKey, SortSpec,
    SpecFilter, StockLevel, leading_number,
};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: f64,
}

/// Raw list-endpoint query string. Everything optional, everything a string;
/// mapping to the typed filter is where fail-open parsing happens.
#[derive(Debug, Default, Deserialize)]
pub struct ListMaterialsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub group: Option<String>,
    pub stock_level: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_stock: Option<String>,
    pub max_stock: Option<String>,
    pub created_from: Option<String>,
    pub created_to: Option<String>,
    pub restocked_from: Option<String>,
    pub restocked_to: Option<String>,
    pub spec_color: Option<String>,
    pub spec_quality: Option<String>,
    pub min_weight: Option<String>,
    pub max_weight: Option<String>,
    pub min_width: Option<String>,
    pub max_width: Option<String>,
    pub min_length: Option<String>,
    pub max_length: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
}

impl ListMaterialsQuery {
    pub fn filter(&self) -> MaterialFilter {
        MaterialFilter {
            search: self.search.clone(),
            category: self.category.as_deref().and_then(parse_enum::<Category>),
            group: self.group.as_deref().and_then(parse_enum::<CategoryGroup>),
            stock_level: self.stock_level.as_deref().and_then(StockLevel::parse),
            price: RangeFilter::parse(self.min_price.as_deref(), self.max_price.as_deref()),
            stock: RangeFilter::parse(self.min_stock.as_deref(), self.max_stock.as_deref()),
            created: DateRangeFilter::new(
                self.created_from.as_deref().and_then(parse_date),
                self.created_to.as_deref().and_then(parse_date),
            ),
            restocked: DateRangeFilter::new(
                self.restocked_from.as_deref().and_then(parse_date),
                self.restocked_to.as_deref().and_then(parse_date),
            ),
            spec: SpecFilter {
                color: self.spec_color.clone(),
                quality: self.spec_quality.clone(),
                weight: RangeFilter::parse(self.min_weight.as_deref(), self.max_weight.as_deref()),
                width: RangeFilter::parse(self.min_width.as_deref(), self.max_width.as_deref()),
                length: RangeFilter::parse(self.min_length.as_deref(), self.max_length.as_deref()),
            },
        }
    }

    pub fn sort(&self) -> SortSpec {
        let key = self
            .sort
            .as_deref()
            .and_then(parse_enum::<SortKey>)
            .unwrap_or(SortKey::Name);
        let direction = self
            .direction
            .as_deref()
            .and_then(parse_enum::<SortDirection>)
            .unwrap_or(SortDirection::Ascending);
        SortSpec::new(key, direction)
    }

    pub fn page(&self) -> Option<Page> {
        let offset = self
            .offset
            .as_deref()
            .and_then(leading_number)
            .filter(|v| *v >= 0.0)
            .map(|v| v as usize);
        let limit = self
            .limit
            .as_deref()
            .and_then(leading_number)
            .filter(|v| *v >= 0.0)
            .map(|v| v as usize);

        if offset.is_none() && limit.is_none() {
            return None;
        }
        Some(Page::new(offset.unwrap_or(0), limit))
    }
}

/// Parse a serde-named enum value from its query-string form, fail-open
/// (`"all"`, unknown values and typos all disable the criterion).
fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Option<T> {
    serde_json::from_value(JsonValue::String(s.trim().to_ascii_lowercase())).ok()
}

/// RFC 3339 timestamp or bare `YYYY-MM-DD` date (midnight UTC); anything else
/// is dropped.
fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

// -------------------------
// Response mapping
// -------------------------

/// Serialize a record plus its derived fields (always recomputed, never
/// read from storage).
pub fn material_to_json(record: &MaterialRecord) -> JsonValue {
    let mut value = serde_json::to_value(record).unwrap_or_else(|_| json!({}));
    if let Some(obj) = value.as_object_mut() {
        obj.insert("total_value".to_string(), json!(record.total_value()));
        obj.insert(
            "stock_status".to_string(),
            json!(record.stock_status().label()),
        );
    }
    value
}

pub fn materials_to_json(records: &[MaterialRecord]) -> JsonValue {
    json!({
        "count": records.len(),
        "materials": records.iter().map(material_to_json).collect::<Vec<_>>(),
    })
}
