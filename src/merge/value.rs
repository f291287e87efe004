// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Deep equality over JSON values.
//!
//! Settings files are decoded into [`serde_json::Value`], which already gives
//! us a tagged variant over null, booleans, numbers, strings, lists, and
//! objects. What it does not give us is the numeric policy we want: JSON has
//! only one number type, so `42` and `42.0` name the same value and must
//! compare equal. Everything else compares structurally.

use serde_json::{Number, Value};

/// Check if two JSON values are deeply equal.
///
/// Lists are order-sensitive. Objects are equal when they hold the same key
/// set and every key maps to deeply equal values. Numbers compare by numeric
/// value, not by representation.
pub fn deep_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(lhs), Value::Bool(rhs)) => lhs == rhs,
        (Value::String(lhs), Value::String(rhs)) => lhs == rhs,
        (Value::Number(lhs), Value::Number(rhs)) => number_eq(lhs, rhs),
        (Value::Array(lhs), Value::Array(rhs)) => {
            lhs.len() == rhs.len() && lhs.iter().zip(rhs).all(|(lhs, rhs)| deep_eq(lhs, rhs))
        }
        (Value::Object(lhs), Value::Object(rhs)) => {
            lhs.len() == rhs.len()
                && lhs
                    .iter()
                    .all(|(key, lhs)| rhs.get(key).is_some_and(|rhs| deep_eq(lhs, rhs)))
        }
        _ => false,
    }
}

/// Compare two JSON numbers by value.
///
/// An integer matches a float only when the float is integral and converts to
/// exactly that integer, which keeps equality transitive above 2^53.
fn number_eq(lhs: &Number, rhs: &Number) -> bool {
    match (integer(lhs), integer(rhs)) {
        (Some(lhs), Some(rhs)) => lhs == rhs,
        (Some(int), None) => rhs.as_f64().is_some_and(|float| float_eq_int(float, int)),
        (None, Some(int)) => lhs.as_f64().is_some_and(|float| float_eq_int(float, int)),
        (None, None) => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            _ => false,
        },
    }
}

fn integer(number: &Number) -> Option<i128> {
    number
        .as_i64()
        .map(i128::from)
        .or_else(|| number.as_u64().map(i128::from))
}

fn float_eq_int(float: f64, int: i128) -> bool {
    // INVARIANT: Only integral floats inside the 64-bit integer range convert exactly.
    float.fract() == 0.0
        && float >= -9_223_372_036_854_775_808.0
        && float < 18_446_744_073_709_551_616.0
        && float as i128 == int
}
