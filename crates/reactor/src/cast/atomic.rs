//! Built-in atomic coercions
//!
//! | Target | Accepts |
//! |--------|---------|
//! | Boolean | Boolean, String `true`/`false` (any case) |
//! | Buffer | Buffer, String (base64) |
//! | String | any scalar's string form |
//! | integers | any number (truncating, bitwise across sign, floats range-checked), String |
//! | floats | any number, String |
//! | Timestamp | Timestamp, String (RFC 3339) |
//! | SymbolMap | SymbolMap |
//! | Null | Null |
//! | Value | anything |
//! | named types | Enum or Struct of that name, or one the interface allows |

use super::interface::CastInterface;
use crate::error::{ReactorError, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::num::IntErrorKind;
use tessera_core::primitives::Primitive;
use tessera_core::{AtomicType, ObjectPath, Timestamp, TypeName, TypeReference, Value};

/// Numeric source value, widened
#[derive(Clone, Copy)]
enum Num {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Num> {
        Some(match value {
            Value::Int32(i) => Num::Signed(*i as i64),
            Value::Int64(i) => Num::Signed(*i),
            Value::Uint32(u) => Num::Unsigned(*u as u64),
            Value::Uint64(u) => Num::Unsigned(*u),
            Value::Float32(f) => Num::Float(*f as f64),
            Value::Float64(f) => Num::Float(*f),
            _ => return None,
        })
    }

    /// Convert with truncation; signed and unsigned reinterpret bits
    fn to(self, target: Primitive) -> Value {
        match (target, self) {
            (Primitive::Int32, Num::Signed(i)) => Value::Int32(i as i32),
            (Primitive::Int32, Num::Unsigned(u)) => Value::Int32(u as i32),
            (Primitive::Int32, Num::Float(f)) => Value::Int32(f as i32),
            (Primitive::Int64, Num::Signed(i)) => Value::Int64(i),
            (Primitive::Int64, Num::Unsigned(u)) => Value::Int64(u as i64),
            (Primitive::Int64, Num::Float(f)) => Value::Int64(f as i64),
            (Primitive::Uint32, Num::Signed(i)) => Value::Uint32(i as u32),
            (Primitive::Uint32, Num::Unsigned(u)) => Value::Uint32(u as u32),
            (Primitive::Uint32, Num::Float(f)) => Value::Uint32(f as u32),
            (Primitive::Uint64, Num::Signed(i)) => Value::Uint64(i as u64),
            (Primitive::Uint64, Num::Unsigned(u)) => Value::Uint64(u),
            (Primitive::Uint64, Num::Float(f)) => Value::Uint64(f as u64),
            (Primitive::Float32, Num::Signed(i)) => Value::Float32(i as f32),
            (Primitive::Float32, Num::Unsigned(u)) => Value::Float32(u as f32),
            (Primitive::Float32, Num::Float(f)) => Value::Float32(f as f32),
            (Primitive::Float64, Num::Signed(i)) => Value::Float64(i as f64),
            (Primitive::Float64, Num::Unsigned(u)) => Value::Float64(u as f64),
            (_, Num::Float(f)) => Value::Float64(f),
            (_, Num::Signed(i)) => Value::Int64(i),
            (_, Num::Unsigned(u)) => Value::Uint64(u),
        }
    }
}

/// Cast `value` to `target` using the built-in table
///
/// Restrictions are not checked here.
pub(crate) fn cast_builtin(
    value: Value,
    target: &AtomicType,
    path: &ObjectPath,
    iface: &dyn CastInterface,
) -> Result<Value> {
    let Some(prim) = target.primitive() else {
        return cast_named(value, target, path, iface);
    };
    let mismatch = |value: &Value| {
        ReactorError::type_cast(path.clone(), target.clone().into(), value.type_reference())
    };

    match prim {
        Primitive::Value => Ok(value),
        Primitive::Null => match value {
            Value::Null => Ok(Value::Null),
            other => Err(mismatch(&other)),
        },
        Primitive::Boolean => match value {
            Value::Boolean(_) => Ok(value),
            Value::String(s) => parse_boolean(&s, path),
            other => Err(mismatch(&other)),
        },
        Primitive::Buffer => match value {
            Value::Buffer(_) => Ok(value),
            Value::String(s) => BASE64.decode(s.as_bytes()).map(Value::Buffer).map_err(|e| {
                ReactorError::value_cast(path.clone(), format!("Invalid base64 string: {}", e))
            }),
            other => Err(mismatch(&other)),
        },
        Primitive::String => match string_form(&value) {
            Some(s) => Ok(Value::String(s)),
            None => Err(mismatch(&value)),
        },
        Primitive::Timestamp => match value {
            Value::Timestamp(_) => Ok(value),
            Value::String(s) => Timestamp::parse_rfc3339(&s)
                .map(Value::Timestamp)
                .map_err(|_| {
                    ReactorError::value_cast(path.clone(), format!("Invalid timestamp: {:?}", s))
                }),
            other => Err(mismatch(&other)),
        },
        Primitive::SymbolMap => match value {
            Value::SymbolMap(_) => Ok(value),
            other => Err(mismatch(&other)),
        },
        Primitive::Int32
        | Primitive::Int64
        | Primitive::Uint32
        | Primitive::Uint64
        | Primitive::Float32
        | Primitive::Float64 => {
            if value.primitive() == Some(prim) {
                return Ok(value);
            }
            match Num::of(&value) {
                Some(Num::Float(f)) if prim.is_integer() => {
                    return float_to_integer(f, prim, &f.to_string(), path);
                }
                Some(num) => return Ok(num.to(prim)),
                None => {}
            }
            match value {
                Value::String(s) if prim.is_integer() => parse_integer(&s, prim, path),
                Value::String(s) => parse_float(&s, prim, path),
                other => Err(mismatch(&other)),
            }
        }
    }
}

/// Enums and structs of a declared or qualified name
fn cast_named(
    value: Value,
    target: &AtomicType,
    path: &ObjectPath,
    iface: &dyn CastInterface,
) -> Result<Value> {
    let actual: Option<&TypeName> = match &value {
        Value::Enum(e) => Some(&e.type_name),
        Value::Struct(s) => Some(&s.type_name),
        _ => None,
    };
    match actual {
        Some(name) if name == target.name() || iface.allow_assignment(target.name(), name) => {
            Ok(value)
        }
        _ => Err(ReactorError::type_cast(
            path.clone(),
            TypeReference::Atomic(target.clone()),
            value.type_reference(),
        )),
    }
}

fn parse_boolean(s: &str, path: &ObjectPath) -> Result<Value> {
    if s.eq_ignore_ascii_case("true") {
        Ok(Value::Boolean(true))
    } else if s.eq_ignore_ascii_case("false") {
        Ok(Value::Boolean(false))
    } else {
        Err(ReactorError::value_cast(
            path.clone(),
            format!("Invalid boolean value: {:?}", s),
        ))
    }
}

fn invalid_number(s: &str, path: &ObjectPath) -> ReactorError {
    ReactorError::value_cast(path.clone(), format!("Invalid numeric value: {:?}", s))
}

fn out_of_range(s: &str, path: &ObjectPath) -> ReactorError {
    ReactorError::value_cast(path.clone(), format!("Value out of range: {}", s))
}

fn parse_integer(s: &str, target: Primitive, path: &ObjectPath) -> Result<Value> {
    if s.contains(['e', 'E', '.']) {
        let f: f64 = s.parse().map_err(|_| invalid_number(s, path))?;
        return float_to_integer(f, target, s, path);
    }
    let parsed = match target {
        Primitive::Int32 => s.parse::<i32>().map(Value::Int32),
        Primitive::Int64 => s.parse::<i64>().map(Value::Int64),
        Primitive::Uint32 => s.parse::<u32>().map(Value::Uint32),
        _ => s.parse::<u64>().map(Value::Uint64),
    };
    parsed.map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(s, path),
        _ => invalid_number(s, path),
    })
}

/// Truncate a parsed float, rejecting values the target cannot hold
fn float_to_integer(f: f64, target: Primitive, s: &str, path: &ObjectPath) -> Result<Value> {
    if !f.is_finite() {
        return Err(out_of_range(s, path));
    }
    let t = f.trunc();
    // 64-bit maxima round up to a power of two as f64, hence the strict bound
    let in_range = match target {
        Primitive::Int32 => t >= i32::MIN as f64 && t <= i32::MAX as f64,
        Primitive::Int64 => t >= i64::MIN as f64 && t < i64::MAX as f64,
        Primitive::Uint32 => t >= 0.0 && t <= u32::MAX as f64,
        _ => t >= 0.0 && t < u64::MAX as f64,
    };
    if !in_range {
        return Err(out_of_range(s, path));
    }
    Ok(Num::Float(t).to(target))
}

/// Overflow to infinity is out of range unless the text spells it out
fn parse_float(s: &str, target: Primitive, path: &ObjectPath) -> Result<Value> {
    let (value, finite) = match target {
        Primitive::Float32 => {
            let f = s.parse::<f32>().map_err(|_| invalid_number(s, path))?;
            (Value::Float32(f), f.is_finite())
        }
        _ => {
            let f = s.parse::<f64>().map_err(|_| invalid_number(s, path))?;
            (Value::Float64(f), f.is_finite())
        }
    };
    if !finite && !names_non_finite(s) {
        return Err(out_of_range(s, path));
    }
    Ok(value)
}

fn names_non_finite(s: &str) -> bool {
    let unsigned = s.trim_start_matches(['+', '-']).to_ascii_lowercase();
    matches!(unsigned.as_str(), "inf" | "infinity" | "nan")
}

/// Canonical string form of a scalar; `None` for containers
fn string_form(value: &Value) -> Option<String> {
    Some(match value {
        Value::String(s) => s.clone(),
        Value::Boolean(b) => b.to_string(),
        Value::Int32(i) => i.to_string(),
        Value::Int64(i) => i.to_string(),
        Value::Uint32(u) => u.to_string(),
        Value::Uint64(u) => u.to_string(),
        Value::Float32(f) => f.to_string(),
        Value::Float64(f) => f.to_string(),
        Value::Timestamp(t) => t.to_rfc3339(),
        Value::Buffer(b) => BASE64.encode(b),
        Value::Enum(e) => e.value.external_form(),
        Value::Null
        | Value::SymbolMap(_)
        | Value::List(_)
        | Value::Struct(_)
        | Value::Pointer(_) => return None,
    })
}
