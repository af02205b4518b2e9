use std::sync::{Mutex, MutexGuard};

/// Lock shared host state, recovering the data if a worker thread panicked
/// while holding it. The tab store stays usable either way.
pub(crate) fn lock_or_recover<'a, T>(lock: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        crate::log_debug(&format!("mutex poisoned in {context}; recovering"));
        poisoned.into_inner()
    })
}
