//! Column values and the random value generator for non-key columns.
//!
//! All generation draws from the caller's RNG so a load shares the random
//! source with its key generator.

use crate::catalog::ColumnType;
use rand::distr::Alphanumeric;
use rand::Rng;
use std::fmt;

/// Default length for [`ColumnType::Text`] columns.
pub const DEFAULT_TEXT_LENGTH: usize = 100;

/// A single value handed to the data sink.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Text(String),
}

impl ColumnValue {
    /// Encode a generated key for the key column's type.
    pub fn from_key(key: i64, column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::Int32 => match i32::try_from(key) {
                Ok(k) => ColumnValue::Int32(k),
                Err(_) => ColumnValue::Int64(key),
            },
            ColumnType::Int64 => ColumnValue::Int64(key),
            ColumnType::Float64 => ColumnValue::Float64(key as f64),
            ColumnType::Text | ColumnType::VarChar { .. } | ColumnType::Char { .. } => {
                ColumnValue::Text(key.to_string())
            }
        }
    }

    /// The value as an integer key, if it holds one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ColumnValue::Int32(v) => Some(*v as i64),
            ColumnValue::Int64(v) => Some(*v),
            ColumnValue::Text(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Null => write!(f, "NULL"),
            ColumnValue::Int32(v) => write!(f, "{v}"),
            ColumnValue::Int64(v) => write!(f, "{v}"),
            ColumnValue::Float64(v) => write!(f, "{v}"),
            ColumnValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Generate a random alphanumeric string of exactly `length` characters.
pub fn random_str<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| rng.sample(Alphanumeric) as char)
        .collect()
}

/// Generate a random alphanumeric string with length in `[min_len, max_len]`.
pub fn random_bounded_str<R: Rng + ?Sized>(rng: &mut R, min_len: usize, max_len: usize) -> String {
    let (lo, hi) = if min_len <= max_len {
        (min_len, max_len)
    } else {
        (max_len, min_len)
    };
    let length = rng.random_range(lo..=hi);
    random_str(rng, length)
}

/// Generate a random integer in the given range (inclusive).
pub fn random_int<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    rng.random_range(min..=max)
}

/// Generate a random value for a non-key column of the given type.
///
/// - `var_char(n)`: 1..=n characters
/// - `char(n)`: exactly n characters
/// - `text`: exactly [`DEFAULT_TEXT_LENGTH`] characters
pub fn generate_column_value<R: Rng + ?Sized>(column_type: &ColumnType, rng: &mut R) -> ColumnValue {
    match column_type {
        ColumnType::Int32 => ColumnValue::Int32(rng.random()),
        ColumnType::Int64 => ColumnValue::Int64(rng.random()),
        ColumnType::Float64 => ColumnValue::Float64(rng.random()),
        ColumnType::Text => ColumnValue::Text(random_str(rng, DEFAULT_TEXT_LENGTH)),
        ColumnType::VarChar { length } => {
            let length = *length as usize;
            ColumnValue::Text(random_bounded_str(rng, length.min(1), length))
        }
        ColumnType::Char { length } => ColumnValue::Text(random_str(rng, *length as usize)),
    }
}
