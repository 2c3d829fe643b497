use std::fmt::{self, Debug};

use crate::maybe_std::{self, Mutex, MutexGuard};

/// [`Bucket`] is a lock-protected singly-linked chain of entries.
///
/// All entries in a chain have keys that map to the same bucket index, and no two entries in a
/// chain share a key.
pub(crate) struct Bucket {
    /// The head of the chain.
    head: Mutex<Link>,
}

/// A link to the next [`Entry`] in a chain.
type Link = Option<Box<Entry>>;

/// [`Entry`] is a key-value pair in a chain.
pub(crate) struct Entry {
    key: i32,
    value: i32,
    next: Link,
}

/// [`Writer`] holds the exclusive lock on a [`Bucket`].
pub(crate) struct Writer<'b> {
    head: MutexGuard<'b, Link>,
}

/// [`EntryIter`] walks a chain from its head.
pub(crate) struct EntryIter<'w> {
    current: Option<&'w Entry>,
}

impl Bucket {
    /// Creates an empty [`Bucket`].
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            head: Mutex::new(None),
        }
    }

    /// Locks the [`Bucket`].
    #[inline]
    pub(crate) fn lock(&self) -> Writer<'_> {
        Writer {
            head: maybe_std::lock(&self.head),
        }
    }
}

impl Debug for Bucket {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bucket").finish()
    }
}

impl Drop for Bucket {
    #[inline]
    fn drop(&mut self) {
        // Unlinks entries one by one; dropping the head directly recurses once per entry.
        let mut current = maybe_std::with_mut(&mut self.head, Option::take);
        while let Some(mut entry) = current {
            current = entry.next.take();
        }
    }
}

impl Writer<'_> {
    /// Returns the value associated with the key.
    #[inline]
    pub(crate) fn search(&self, key: i32) -> Option<i32> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value associated with the key.
    #[inline]
    pub(crate) fn search_mut(&mut self, key: i32) -> Option<&mut i32> {
        let mut current = self.head.as_deref_mut();
        while let Some(entry) = current {
            if entry.key == key {
                return Some(&mut entry.value);
            }
            current = entry.next.as_deref_mut();
        }
        None
    }

    /// Links a new entry as the head of the chain.
    ///
    /// The caller must make sure that the key is not in the chain.
    #[inline]
    pub(crate) fn insert(&mut self, key: i32, value: i32) {
        let next = self.head.take();
        *self.head = Some(Box::new(Entry { key, value, next }));
    }

    /// Unlinks the entry associated with the key and returns its value.
    #[inline]
    pub(crate) fn remove(&mut self, key: i32) -> Option<i32> {
        let mut link: &mut Link = &mut self.head;
        while link.as_ref().is_some_and(|entry| entry.key != key) {
            link = &mut link.as_mut()?.next;
        }
        let mut removed = link.take()?;
        *link = removed.next.take();
        Some(removed.value)
    }

    /// Returns an iterator over the `(key, value)` pairs of the chain, head first.
    #[inline]
    pub(crate) fn iter(&self) -> EntryIter<'_> {
        EntryIter {
            current: self.head.as_deref(),
        }
    }
}

impl Iterator for EntryIter<'_> {
    type Item = (i32, i32);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.current?;
        self.current = entry.next.as_deref();
        Some((entry.key, entry.value))
    }
}
