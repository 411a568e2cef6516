//! Attribute maps and the conversions between typed fields and values.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{RecordError, Result};

/// Ordered field name -> value mapping describing a record.
pub type Attributes = serde_json::Map<String, Value>;

/// Convert a typed field into an attribute value.
///
/// Values that cannot be represented (maps with non-string keys, for
/// instance) become `null`.
///
/// Whole floats are stored as integers, so an `f64` field assigned `2`
/// reads back as `2`.
pub fn to_attribute<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value)
        .map(whole_floats_as_integers)
        .unwrap_or(Value::Null)
}

// 2^53: every integer below it is exact as an f64.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

fn whole_floats_as_integers(value: Value) -> Value {
    match value {
        Value::Number(number) if number.is_f64() => match number.as_f64() {
            Some(float) if float.fract() == 0.0 && float.abs() < EXACT_INTEGER_LIMIT => {
                if float >= 0.0 {
                    Value::from(float as u64)
                } else {
                    Value::from(float as i64)
                }
            }
            _ => Value::Number(number),
        },
        Value::Array(items) => {
            Value::Array(items.into_iter().map(whole_floats_as_integers).collect())
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, whole_floats_as_integers(value)))
                .collect(),
        ),
        other => other,
    }
}

/// Attribute value equality. Numbers compare by value when either side is a
/// float, so `2` equals `2.0`; everything else compares structurally.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) if a.is_f64() || b.is_f64() => {
            a.as_f64() == b.as_f64()
        }
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => attributes_equal(a, b),
        _ => left == right,
    }
}

/// Same field names with [`values_equal`] values, in any order.
pub fn attributes_equal(left: &Attributes, right: &Attributes) -> bool {
    left.len() == right.len()
        && left.iter().all(|(field, value)| {
            right
                .get(field)
                .is_some_and(|other| values_equal(value, other))
        })
}

/// Convert an attribute value into a typed field, naming the attribute in the
/// error when the value has the wrong shape.
pub fn from_attribute<T: DeserializeOwned>(
    entity: &'static str,
    attribute: &str,
    value: Value,
) -> Result<T> {
    serde_json::from_value(value).map_err(|e| RecordError::InvalidAttribute {
        entity,
        attribute: attribute.to_string(),
        message: e.to_string(),
    })
}

/// Remove `attribute` from `attrs` and convert it. A missing attribute reads
/// as `null`, so optional fields may be left out.
pub fn take_attribute<T: DeserializeOwned>(
    entity: &'static str,
    attrs: &mut Attributes,
    attribute: &str,
) -> Result<T> {
    let value = attrs.remove(attribute).unwrap_or(Value::Null);
    from_attribute(entity, attribute, value)
}

/// Fail with an attribute error naming the first leftover key, for records
/// without an open attribute bag.
pub fn reject_unknown(entity: &'static str, attrs: &Attributes) -> Result<()> {
    match attrs.keys().next() {
        Some(attribute) => Err(RecordError::UnknownAttribute {
            entity,
            attribute: attribute.clone(),
        }),
        None => Ok(()),
    }
}

/// Null, empty strings, empty lists and empty maps are blank.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}
