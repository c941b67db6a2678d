//! # Critical Sections and Threads
//!
//! The core types are single-threaded. Multithreaded consumers guard shared
//! state explicitly with a [`CriticalSection`].

use parking_lot::{Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

/// Guard returned by [`CriticalSection::enter`]; leaving scope exits.
pub type CriticalSectionGuard<'a, T> = MutexGuard<'a, T>;

/// A lock owning the data it protects.
#[derive(Debug, Default)]
pub struct CriticalSection<T> {
    inner: Mutex<T>,
}

impl<T> CriticalSection<T> {
    /// Wraps `value`.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// Blocks until the section is free and enters it.
    pub fn enter(&self) -> CriticalSectionGuard<'_, T> {
        self.inner.lock()
    }

    /// Enters only if no other thread is inside.
    pub fn try_enter(&self) -> Option<CriticalSectionGuard<'_, T>> {
        self.inner.try_lock()
    }

    /// Mutable access without locking; exclusive borrow proves no contention.
    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }

    /// Consumes the section, returning the data.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

/// A named OS thread.
pub struct Thread<T> {
    name: String,
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Thread<T> {
    /// Spawns `f` on a new thread called `name`.
    pub fn spawn<F>(name: impl Into<String>, f: F) -> std::io::Result<Self>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let name = name.into();
        let handle = std::thread::Builder::new().name(name.clone()).spawn(f)?;
        tracing::debug!("spawned thread {}", name);
        Ok(Self { name, handle })
    }

    /// Thread name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once the thread function has returned.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the thread, returning its result or its panic payload.
    pub fn join(self) -> std::thread::Result<T> {
        self.handle.join()
    }
}

/// Puts the calling thread to sleep.
pub fn sleep_ms(ms: u64) {
    std::thread::sleep(Duration::from_millis(ms));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_critical_section_counts_across_threads() {
        let counter = Arc::new(CriticalSection::new(0u32));
        let threads: Vec<_> = (0..4)
            .map(|i| {
                let counter = Arc::clone(&counter);
                Thread::spawn(format!("worker-{i}"), move || {
                    for _ in 0..1000 {
                        *counter.enter() += 1;
                    }
                })
                .unwrap()
            })
            .collect();

        for thread in threads {
            thread.join().unwrap();
        }
        assert_eq!(*counter.enter(), 4000);
    }

    #[test]
    fn test_try_enter_fails_while_held() {
        let section = CriticalSection::new(());
        let _guard = section.enter();
        assert!(section.try_enter().is_none());
    }

    #[test]
    fn test_thread_name_and_result() {
        let thread = Thread::spawn("loader", || 42).unwrap();
        assert_eq!(thread.name(), "loader");
        assert_eq!(thread.join().unwrap(), 42);
    }
}
