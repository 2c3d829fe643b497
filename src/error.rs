//! Error types.

use std::error::Error;
use std::fmt::{self, Display};

/// [`CapacityError`] types.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CapacityError {
    /// Zero: a [`BucketMap`](crate::BucketMap) needs at least one bucket.
    Zero,
}

impl Display for CapacityError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => f.write_str("the capacity of a bucket map must be positive"),
        }
    }
}

impl Error for CapacityError {}
