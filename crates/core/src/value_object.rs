//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one with the new values. This keeps them safe to share across
/// threads and predictable in tests.
///
/// Example: a filter configuration `{ category: Some(..), min_price: Some(..) }`
/// is a value object; two configurations with the same criteria are the same
/// filter. A material record is an entity: two records with the same `id` are
/// the same record regardless of their other field values.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
