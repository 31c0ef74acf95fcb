//! Value restrictions
//!
//! A restriction narrows the legal values of an atomic type:
//! - Regex: the string must match the pattern (`"^a+$"`)
//! - Range: the value must fall between optional bounds, each open or
//!   closed (`[0,10)`, `(,5]`, `["a","c"]`)

use crate::error::{ModelError, Result};
use crate::primitives::Primitive;
use crate::types::TypeName;
use crate::value::Value;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

/// Regular expression restriction on `String`
#[derive(Debug, Clone)]
pub struct RegexRestriction {
    pattern: String,
    regex: Regex,
}

impl RegexRestriction {
    /// Compile the pattern
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        let regex = Regex::new(&pattern).map_err(|e| ModelError::InvalidRegex {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        Ok(RegexRestriction { pattern, regex })
    }

    /// Pattern source text
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the string matches
    pub fn is_match(&self, s: &str) -> bool {
        self.regex.is_match(s)
    }
}

impl PartialEq for RegexRestriction {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

/// Range restriction on an ordered kind
#[derive(Debug, Clone, PartialEq)]
pub struct RangeRestriction {
    min: Option<Value>,
    min_closed: bool,
    max: Option<Value>,
    max_closed: bool,
}

impl RangeRestriction {
    /// Create a range
    ///
    /// Bounds must be comparable scalars of the same kind, `min <= max`, and
    /// an absent bound is always open.
    pub fn new(
        min: Option<Value>,
        min_closed: bool,
        max: Option<Value>,
        max_closed: bool,
    ) -> Result<Self> {
        if (min.is_none() && min_closed) || (max.is_none() && max_closed) {
            return Err(ModelError::InvalidRange(
                "an unbounded side cannot be closed".to_string(),
            ));
        }
        for bound in min.iter().chain(max.iter()) {
            if !bound.is_range_comparable() {
                return Err(ModelError::InvalidRange(format!(
                    "bound {} is not an ordered scalar",
                    bound
                )));
            }
        }
        if let (Some(lo), Some(hi)) = (&min, &max) {
            match lo.compare_same_kind(hi) {
                None => {
                    return Err(ModelError::InvalidRange(format!(
                        "bounds {} and {} are of different kinds",
                        lo, hi
                    )))
                }
                Some(Ordering::Greater) => {
                    return Err(ModelError::InvalidRange(format!(
                        "min {} is greater than max {}",
                        lo, hi
                    )))
                }
                Some(Ordering::Equal) if !(min_closed && max_closed) => {
                    return Err(ModelError::InvalidRange(format!(
                        "range with equal bounds {} must be closed",
                        lo
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(RangeRestriction {
            min,
            min_closed,
            max,
            max_closed,
        })
    }

    /// Lower bound
    pub fn min(&self) -> Option<&Value> {
        self.min.as_ref()
    }

    /// Whether the lower bound is inclusive
    pub fn min_closed(&self) -> bool {
        self.min_closed
    }

    /// Upper bound
    pub fn max(&self) -> Option<&Value> {
        self.max.as_ref()
    }

    /// Whether the upper bound is inclusive
    pub fn max_closed(&self) -> bool {
        self.max_closed
    }

    fn bound_kind(&self) -> Option<Primitive> {
        self.min
            .as_ref()
            .or(self.max.as_ref())
            .and_then(Value::primitive)
    }

    fn accepts(&self, value: &Value) -> bool {
        if let Some(lo) = &self.min {
            match value.compare_same_kind(lo) {
                Some(Ordering::Greater) => {}
                Some(Ordering::Equal) if self.min_closed => {}
                _ => return false,
            }
        }
        if let Some(hi) = &self.max {
            match value.compare_same_kind(hi) {
                Some(Ordering::Less) => {}
                Some(Ordering::Equal) if self.max_closed => {}
                _ => return false,
            }
        }
        true
    }
}

impl fmt::Display for RangeRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.min_closed { "[" } else { "(" })?;
        if let Some(lo) = &self.min {
            write!(f, "{}", lo)?;
        }
        f.write_str(",")?;
        if let Some(hi) = &self.max {
            write!(f, "{}", hi)?;
        }
        f.write_str(if self.max_closed { "]" } else { ")" })
    }
}

/// Restriction attached to an atomic type
#[derive(Debug, Clone, PartialEq)]
pub enum Restriction {
    /// Pattern match on strings
    Regex(RegexRestriction),
    /// Ordered interval
    Range(RangeRestriction),
}

impl Restriction {
    /// Whether `value` satisfies the restriction
    ///
    /// Values of a kind the restriction cannot evaluate never satisfy it.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Restriction::Regex(re) => match value {
                Value::String(s) => re.is_match(s),
                _ => false,
            },
            Restriction::Range(range) => range.accepts(value),
        }
    }

    /// Whether this restriction can evaluate values of the named type
    pub fn applies_to(&self, name: &TypeName) -> bool {
        let Some(prim) = name.primitive() else {
            return false;
        };
        match self {
            Restriction::Regex(_) => prim == Primitive::String,
            Restriction::Range(range) => {
                let ordered = prim.is_numeric()
                    || matches!(prim, Primitive::String | Primitive::Timestamp);
                ordered && range.bound_kind().map_or(true, |kind| kind == prim)
            }
        }
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Restriction::Regex(re) => write!(f, "{:?}", re.pattern()),
            Restriction::Range(range) => write!(f, "{}", range),
        }
    }
}

impl From<RegexRestriction> for Restriction {
    fn from(r: RegexRestriction) -> Self {
        Restriction::Regex(r)
    }
}

impl From<RangeRestriction> for Restriction {
    fn from(r: RangeRestriction) -> Self {
        Restriction::Range(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{QNAME_INT32, QNAME_STRING, QNAME_TIMESTAMP};

    fn range(min: Option<Value>, min_closed: bool, max: Option<Value>, max_closed: bool) -> Restriction {
        RangeRestriction::new(min, min_closed, max, max_closed)
            .unwrap()
            .into()
    }

    #[test]
    fn test_regex_accepts_strings_only() {
        let re: Restriction = RegexRestriction::new("^ab+c$").unwrap().into();
        assert!(re.accepts(&Value::from("abbbc")));
        assert!(!re.accepts(&Value::from("ac")));
        assert!(!re.accepts(&Value::Int32(1)));
        assert_eq!(re.to_string(), "\"^ab+c$\"");
    }

    #[test]
    fn test_invalid_regex() {
        assert!(matches!(
            RegexRestriction::new("("),
            Err(ModelError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_half_open_int_range() {
        let r = range(Some(Value::Int32(0)), true, Some(Value::Int32(10)), false);
        assert!(r.accepts(&Value::Int32(0)));
        assert!(r.accepts(&Value::Int32(9)));
        assert!(!r.accepts(&Value::Int32(10)));
        assert!(!r.accepts(&Value::Int32(-1)));
        assert!(!r.accepts(&Value::Int64(5)));
        assert_eq!(r.to_string(), "[0,10)");
    }

    #[test]
    fn test_unbounded_sides() {
        let r = range(None, false, Some(Value::Int32(5)), true);
        assert!(r.accepts(&Value::Int32(i32::MIN)));
        assert!(r.accepts(&Value::Int32(5)));
        assert!(!r.accepts(&Value::Int32(6)));
        assert_eq!(r.to_string(), "(,5]");
    }

    #[test]
    fn test_string_range_display() {
        let r = range(Some(Value::from("a")), true, Some(Value::from("c")), true);
        assert!(r.accepts(&Value::from("b")));
        assert!(!r.accepts(&Value::from("d")));
        assert_eq!(r.to_string(), "[\"a\",\"c\"]");
    }

    #[test]
    fn test_range_validation() {
        assert!(RangeRestriction::new(Some(Value::Int32(5)), true, Some(Value::Int32(1)), true).is_err());
        assert!(RangeRestriction::new(Some(Value::Int32(1)), true, Some(Value::Int64(5)), true).is_err());
        assert!(RangeRestriction::new(None, true, None, false).is_err());
        assert!(RangeRestriction::new(Some(Value::Boolean(true)), true, None, false).is_err());
    }

    #[test]
    fn test_applicability() {
        let re: Restriction = RegexRestriction::new("a").unwrap().into();
        assert!(re.applies_to(&QNAME_STRING.clone().into()));
        assert!(!re.applies_to(&QNAME_INT32.clone().into()));

        let ints = range(Some(Value::Int32(0)), true, None, false);
        assert!(ints.applies_to(&QNAME_INT32.clone().into()));
        assert!(!ints.applies_to(&QNAME_TIMESTAMP.clone().into()));
    }
}
