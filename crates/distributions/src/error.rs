//! Error types for generator construction.

use thiserror::Error;

/// Errors raised while configuring a generator.
///
/// Every variant is a configuration problem detected at construction (or
/// at an explicit resize). Drawing a value never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistributionError {
    /// Key-space bounds are inverted or too wide.
    #[error("Invalid key range [{min}, {max}]")]
    InvalidRange { min: i64, max: i64 },

    /// Item count is zero or does not fit the key space.
    #[error("Item count must be positive and addressable from min, got {0}")]
    InvalidItemCount(u64),

    /// Skew exponent is outside `[0, 1)` or not finite.
    #[error("Invalid Zipfian theta {0}: must be finite and in [0, 1)")]
    InvalidTheta(f64),

    /// Fractional center is not a proper fraction `0 <= num < denom`.
    #[error("Invalid focus center {num}/{denom}: requires 0 <= num < denom")]
    InvalidCenter { num: i64, denom: i64 },

    /// Key space is narrower than one half-slice, so slice `num` has no center.
    #[error("Focus center {num}/{denom} cannot be placed in {item_count} items: needs at least 2 * denom items")]
    UnresolvableCenter { num: i64, denom: i64, item_count: u64 },
}
