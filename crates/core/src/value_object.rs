//! Value object trait: equality by value, not identity.
//!
//! Sale events, daily points, forecast points and reorder advice are all value
//! objects: two instances with the same fields are the same fact.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
