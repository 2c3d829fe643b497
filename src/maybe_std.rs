//! Switches synchronization primitives to their `loom` counterparts under model checking.

#[cfg(feature = "loom")]
pub(crate) use loom::sync::{Mutex, MutexGuard};

#[cfg(not(feature = "loom"))]
pub(crate) use std::sync::{Mutex, MutexGuard};

use std::sync::PoisonError;

/// Acquires the lock, recovering the data if a previous holder panicked.
///
/// The protected state is only ever mutated by code that does not panic between reads and
/// writes, therefore the data behind a poisoned lock is still consistent.
#[inline]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Passes the data to the closure through exclusive access to the lock.
#[cfg(not(feature = "loom"))]
#[inline]
pub(crate) fn with_mut<T, R, F: FnOnce(&mut T) -> R>(mutex: &mut Mutex<T>, f: F) -> R {
    f(mutex.get_mut().unwrap_or_else(PoisonError::into_inner))
}

/// Passes the data to the closure through exclusive access to the lock.
#[cfg(feature = "loom")]
#[inline]
pub(crate) fn with_mut<T, R, F: FnOnce(&mut T) -> R>(mutex: &mut Mutex<T>, f: F) -> R {
    // `loom` tracks the access, so it goes through the lock.
    f(&mut *lock(mutex))
}
