//! Tri-state field values.
//!
//! Benchmark writers evolved over time and some runs crash half-way, so a
//! field can be present, missing, or present with garbage. `Measure` keeps
//! those three cases apart so no stage can silently read "missing" as zero.

use serde_json::Value;
use std::fmt;

/// A measured value that may be unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Measure<T> {
    /// Field present with a usable value.
    Present(T),
    /// Field missing or `null`.
    #[default]
    Absent,
    /// Field present but of the wrong type, or a non-finite number.
    Invalid,
}

impl<T: Copy> Measure<T> {
    /// The value when present.
    #[inline]
    pub fn value(&self) -> Option<T> {
        match self {
            Measure::Present(v) => Some(*v),
            _ => None,
        }
    }

    /// True when the value is usable.
    #[inline]
    pub fn is_present(&self) -> bool {
        matches!(self, Measure::Present(_))
    }

    /// True when the field was missing.
    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Measure::Absent)
    }

    /// True when the field existed but could not be used.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Measure::Invalid)
    }

    /// Map the present value, keeping the unavailable marker.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Measure<U> {
        match self {
            Measure::Present(v) => Measure::Present(f(v)),
            Measure::Absent => Measure::Absent,
            Measure::Invalid => Measure::Invalid,
        }
    }

    /// Keep the first non-absent measure.
    ///
    /// `Invalid` is not replaced: a key that exists with a broken value is
    /// reported as such even if a legacy alias would also match.
    pub fn or(self, other: Measure<T>) -> Measure<T> {
        match self {
            Measure::Absent => other,
            _ => self,
        }
    }
}

impl Measure<f64> {
    /// Read a finite float from an optional JSON value. Strings are `Invalid`.
    pub fn from_json_f64(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Measure::Absent,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v.is_finite() => Measure::Present(v),
                _ => Measure::Invalid,
            },
            Some(_) => Measure::Invalid,
        }
    }
}

impl Measure<u64> {
    /// Read a non-negative integer from an optional JSON value.
    pub fn from_json_u64(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Measure::Absent,
            Some(Value::Number(n)) => n.as_u64().map_or(Measure::Invalid, Measure::Present),
            Some(_) => Measure::Invalid,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Measure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measure::Present(v) => write!(f, "{v}"),
            Measure::Absent => write!(f, "n/a"),
            Measure::Invalid => write!(f, "invalid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_f64() {
        assert_eq!(Measure::from_json_f64(Some(&json!(1.5))), Measure::Present(1.5));
        assert_eq!(Measure::from_json_f64(Some(&json!(0))), Measure::Present(0.0));
        assert_eq!(Measure::from_json_f64(Some(&json!("2.25"))), Measure::Invalid);
        assert_eq!(Measure::from_json_f64(None), Measure::Absent);
        assert_eq!(Measure::from_json_f64(Some(&Value::Null)), Measure::Absent);
        assert_eq!(Measure::from_json_f64(Some(&json!("fast"))), Measure::Invalid);
        assert_eq!(Measure::from_json_f64(Some(&json!([1.0]))), Measure::Invalid);
    }

    #[test]
    fn test_from_json_u64() {
        assert_eq!(Measure::from_json_u64(Some(&json!(42))), Measure::Present(42));
        assert_eq!(Measure::from_json_u64(Some(&json!(-1))), Measure::Invalid);
        assert_eq!(Measure::from_json_u64(Some(&json!(1.5))), Measure::Invalid);
        assert_eq!(Measure::from_json_u64(Some(&json!("7"))), Measure::Invalid);
    }

    #[test]
    fn test_zero_is_not_absent() {
        let zero = Measure::from_json_f64(Some(&json!(0.0)));
        assert!(zero.is_present());
        assert_eq!(zero.value(), Some(0.0));
        assert_eq!(Measure::<f64>::Absent.value(), None);
    }

    #[test]
    fn test_or_keeps_invalid() {
        let invalid: Measure<f64> = Measure::Invalid;
        assert!(invalid.or(Measure::Present(1.0)).is_invalid());
        assert_eq!(Measure::Absent.or(Measure::Present(1.0)), Measure::Present(1.0));
    }
}
