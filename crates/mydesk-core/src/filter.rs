//! Predicates shared by in-process filter implementations.
//!
//! An absent filter value always matches; a supplied one must hold. A row
//! that lacks the filtered value never satisfies a supplied range bound.

/// `true` when `filter` is absent or equal to `value`.
pub fn field_matches<T: PartialEq>(filter: Option<&T>, value: &T) -> bool {
    filter.is_none_or(|expected| expected == value)
}

/// Like [`field_matches`] for nullable columns: a supplied filter never
/// matches a missing value.
pub fn optional_field_matches<T: PartialEq>(filter: Option<&T>, value: Option<&T>) -> bool {
    match filter {
        None => true,
        Some(expected) => value == Some(expected),
    }
}

/// Inclusive lower bound.
pub fn at_least<T: PartialOrd>(bound: Option<&T>, value: Option<&T>) -> bool {
    match (bound, value) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(bound), Some(value)) => value >= bound,
    }
}

/// Inclusive upper bound.
pub fn at_most<T: PartialOrd>(bound: Option<&T>, value: Option<&T>) -> bool {
    match (bound, value) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(bound), Some(value)) => value <= bound,
    }
}
