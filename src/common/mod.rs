pub mod types;

pub use types::{Message, SELF_SENDER};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Take a mutex, recovering the guard if a previous holder panicked.
/// Critical sections here are plain appends and flag flips; the data
/// behind a poisoned lock is still usable.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
