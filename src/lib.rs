#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![doc = include_str!("../README.md")]

mod bucket;
mod maybe_std;

pub mod bucket_map;
pub use bucket_map::{BucketMap, Dump, SizeAccounting, Statistics};

pub mod error;
pub use error::CapacityError;

#[cfg(feature = "serde")]
mod serde;

/// The reserved value returned when a key is not found, or when no previous value existed.
///
/// [`ABSENT`] must never be stored as a value: a later lookup of that entry would be
/// indistinguishable from a miss.
pub const ABSENT: i32 = i32::MAX;
