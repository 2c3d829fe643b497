//! [`BucketMap`] is a fixed-capacity concurrent map from `i32` keys to `i32` values.

use std::fmt::{self, Debug, Display};

use crate::bucket::Bucket;
use crate::maybe_std::{self, Mutex};
use crate::{CapacityError, ABSENT};

/// Fixed-capacity concurrent hash map with per-bucket locking.
///
/// [`BucketMap`] owns a fixed-size array of buckets where each bucket is a singly-linked chain of
/// entries protected by its own lock. The number of buckets never changes: there is no resizing,
/// so chains simply grow longer under load.
///
/// ## Locking behavior
///
/// ### Entry access
///
/// Each read/write access to an entry is serialized by the exclusive lock of the bucket
/// containing the entry. Operations on different buckets proceed in parallel.
///
/// ### Statistics
///
/// The operation counter and the live entry count are protected by a separate lock that is
/// never held together with a bucket lock. As a consequence, a concurrent reader of
/// [`BucketMap::statistics`] may observe a counter update slightly before or after the
/// corresponding entry becomes visible.
///
/// ## The absent value
///
/// Operations report a missing key or a missing previous value with [`ABSENT`], which is
/// `i32::MAX`. Storing [`ABSENT`] as a value is allowed, but a later lookup of that entry is
/// indistinguishable from a miss.
pub struct BucketMap {
    buckets: Box<[Bucket]>,
    statistics: Mutex<Statistics>,
    accounting: SizeAccounting,
}

/// [`Statistics`] is a snapshot of the aggregate counters of a [`BucketMap`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Statistics {
    /// The number of completed `get`, `put`, and `delete` calls.
    pub num_ops: u64,

    /// The number of live entries.
    ///
    /// The value can only become negative with [`SizeAccounting::Eager`].
    pub size: i64,
}

/// [`SizeAccounting`] decides when [`BucketMap::delete`] decrements the live entry count.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SizeAccounting {
    /// The count is decremented only after an entry was actually removed.
    #[default]
    Exact,

    /// The count is decremented before the bucket is searched, even if the key is not found.
    ///
    /// Deleting a key that is not in the map leaves the count one below the number of entries.
    /// This reproduces the accounting of legacy callers that depend on it.
    Eager,
}

/// [`Dump`] renders every bucket of a [`BucketMap`] and its chain, one line per bucket.
///
/// Each bucket is locked while it is copied, but the buckets are not copied atomically as a whole.
pub struct Dump<'m> {
    map: &'m BucketMap,
}

impl BucketMap {
    /// Creates an empty [`BucketMap`] with the specified number of buckets.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_map::BucketMap;
    ///
    /// let map = BucketMap::new(16);
    /// assert_eq!(map.capacity(), 16);
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_accounting(capacity, SizeAccounting::default())
    }

    /// Creates an empty [`BucketMap`] with the specified number of buckets and accounting policy.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_map::{BucketMap, SizeAccounting, ABSENT};
    ///
    /// let map = BucketMap::with_accounting(4, SizeAccounting::Eager);
    /// assert_eq!(map.delete(7), ABSENT);
    /// assert_eq!(map.statistics().size, -1);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_accounting(capacity: usize, accounting: SizeAccounting) -> Self {
        match Self::try_with_accounting(capacity, accounting) {
            Ok(map) => map,
            Err(error) => panic!("{error}: {capacity}"),
        }
    }

    /// Creates an empty [`BucketMap`] with the specified number of buckets.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError::Zero`] if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_map::{BucketMap, CapacityError};
    ///
    /// assert!(BucketMap::try_new(1).is_ok());
    /// assert_eq!(BucketMap::try_new(0).err(), Some(CapacityError::Zero));
    /// ```
    #[inline]
    pub fn try_new(capacity: usize) -> Result<Self, CapacityError> {
        Self::try_with_accounting(capacity, SizeAccounting::default())
    }

    /// Creates an empty [`BucketMap`] with the specified number of buckets and accounting policy.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError::Zero`] if `capacity` is zero.
    #[inline]
    pub fn try_with_accounting(
        capacity: usize,
        accounting: SizeAccounting,
    ) -> Result<Self, CapacityError> {
        if capacity == 0 {
            return Err(CapacityError::Zero);
        }
        Ok(Self {
            buckets: (0..capacity).map(|_| Bucket::new()).collect(),
            statistics: Mutex::new(Statistics::default()),
            accounting,
        })
    }

    /// Returns the value associated with the key, or [`ABSENT`] if the key is not found.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_map::{BucketMap, ABSENT};
    ///
    /// let map = BucketMap::new(8);
    /// assert_eq!(map.get(1), ABSENT);
    /// assert_eq!(map.put(1, 10), ABSENT);
    /// assert_eq!(map.get(1), 10);
    /// ```
    #[inline]
    pub fn get(&self, key: i32) -> i32 {
        self.record(1, 0);
        self.bucket(key).lock().search(key).unwrap_or(ABSENT)
    }

    /// Associates the value with the key.
    ///
    /// Returns the previous value, or [`ABSENT`] if the key was not in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_map::{BucketMap, ABSENT};
    ///
    /// let map = BucketMap::new(8);
    /// assert_eq!(map.put(1, 10), ABSENT);
    /// assert_eq!(map.put(1, 11), 10);
    /// assert_eq!(map.len(), 1);
    /// ```
    #[inline]
    pub fn put(&self, key: i32, value: i32) -> i32 {
        let mut writer = self.bucket(key).lock();
        if let Some(current) = writer.search_mut(key) {
            let previous = std::mem::replace(current, value);
            drop(writer);
            self.record(1, 0);
            return previous;
        }
        writer.insert(key, value);
        drop(writer);
        self.record(1, 1);
        ABSENT
    }

    /// Removes the key from the map.
    ///
    /// Returns the removed value, or [`ABSENT`] if the key was not in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_map::{BucketMap, ABSENT};
    ///
    /// let map = BucketMap::new(8);
    /// assert_eq!(map.put(1, 10), ABSENT);
    /// assert_eq!(map.delete(1), 10);
    /// assert_eq!(map.delete(1), ABSENT);
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    pub fn delete(&self, key: i32) -> i32 {
        match self.accounting {
            SizeAccounting::Exact => self.record(1, 0),
            SizeAccounting::Eager => self.record(1, -1),
        }
        let removed = self.bucket(key).lock().remove(key);
        match removed {
            Some(value) => {
                if self.accounting == SizeAccounting::Exact {
                    self.record(0, -1);
                }
                value
            }
            None => ABSENT,
        }
    }

    /// Returns `true` if the map contains the key.
    ///
    /// This is counted as one operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_map::BucketMap;
    ///
    /// let map = BucketMap::new(8);
    /// map.put(-3, 0);
    /// assert!(map.contains(-3));
    /// assert!(!map.contains(3));
    /// ```
    #[inline]
    pub fn contains(&self, key: i32) -> bool {
        self.get(key) != ABSENT
    }

    /// Returns the number of buckets.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the index of the bucket the key belongs to.
    ///
    /// The bit pattern of the key is reinterpreted as unsigned, so negative keys map to valid
    /// indices.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_map::BucketMap;
    ///
    /// let map = BucketMap::new(4);
    /// assert_eq!(map.bucket_index(6), 2);
    /// assert_eq!(map.bucket_index(-1), 3);
    /// ```
    #[inline]
    #[must_use]
    pub fn bucket_index(&self, key: i32) -> usize {
        #[allow(clippy::cast_sign_loss)]
        let hash = key as u32 as usize;
        hash % self.buckets.len()
    }

    /// Returns the number of live entries.
    ///
    /// The result is zero if [`SizeAccounting::Eager`] has driven the count below zero.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.statistics().size).unwrap_or(0)
    }

    /// Returns `true` if the map holds no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of completed `get`, `put`, and `delete` calls.
    #[inline]
    #[must_use]
    pub fn num_ops(&self) -> u64 {
        self.statistics().num_ops
    }

    /// Returns a consistent snapshot of both counters.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_map::{BucketMap, Statistics};
    ///
    /// let map = BucketMap::new(2);
    /// map.put(1, 1);
    /// map.get(2);
    /// assert_eq!(map.statistics(), Statistics { num_ops: 2, size: 1 });
    /// ```
    #[inline]
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        *maybe_std::lock(&self.statistics)
    }

    /// Returns the accounting policy of the map.
    #[inline]
    #[must_use]
    pub fn accounting(&self) -> SizeAccounting {
        self.accounting
    }

    /// Returns a printable listing of every bucket and its chain.
    ///
    /// # Examples
    ///
    /// ```
    /// use bucket_map::BucketMap;
    ///
    /// let map = BucketMap::new(2);
    /// map.put(0, 10);
    /// map.put(2, 20);
    /// assert_eq!(map.dump().to_string(), "[0] -> (2,20) -> (0,10)\n[1] -> \n");
    /// ```
    #[inline]
    #[must_use]
    pub fn dump(&self) -> Dump<'_> {
        Dump { map: self }
    }

    /// Prints the listing returned by [`BucketMap::dump`] to the standard output.
    #[inline]
    pub fn print(&self) {
        print!("{}", self.dump());
    }

    /// Copies each chain under its lock and passes it to the closure after releasing the lock.
    pub(crate) fn scan<F: FnMut(usize, &[(i32, i32)])>(&self, mut f: F) {
        let mut chain = Vec::new();
        for (index, bucket) in self.buckets.iter().enumerate() {
            chain.clear();
            chain.extend(bucket.lock().iter());
            f(index, &chain);
        }
    }

    /// Returns the [`Bucket`] the key belongs to.
    #[inline]
    fn bucket(&self, key: i32) -> &Bucket {
        &self.buckets[self.bucket_index(key)]
    }

    /// Adds the deltas to the counters.
    #[inline]
    fn record(&self, num_ops: u64, size: i64) {
        let mut statistics = maybe_std::lock(&self.statistics);
        statistics.num_ops += num_ops;
        statistics.size += size;
    }
}

impl Debug for BucketMap {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries = Vec::new();
        self.scan(|_, chain| entries.extend_from_slice(chain));
        f.debug_map()
            .entries(entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut result = Ok(());
        self.map.scan(|index, chain| {
            if result.is_err() {
                return;
            }
            result = write_chain(f, index, chain);
        });
        result
    }
}

impl Debug for Dump<'_> {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// Writes one line of a [`Dump`].
fn write_chain(f: &mut fmt::Formatter<'_>, index: usize, chain: &[(i32, i32)]) -> fmt::Result {
    write!(f, "[{index}] -> ")?;
    for (i, (key, value)) in chain.iter().enumerate() {
        if i > 0 {
            f.write_str(" -> ")?;
        }
        write!(f, "({key},{value})")?;
    }
    f.write_str("\n")
}
