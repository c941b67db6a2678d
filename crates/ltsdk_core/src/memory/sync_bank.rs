//! Object bank shared between threads.

use ltsdk_platform::CriticalSection;

use super::bank::{BankHandle, ObjectBank};
use super::config::BankConfig;

/// An [`ObjectBank`] whose every operation runs inside a critical section.
///
/// Objects are reached through closures so no reference escapes the lock.
#[derive(Debug)]
pub struct SyncObjectBank<T> {
    inner: CriticalSection<ObjectBank<T>>,
}

impl<T> SyncObjectBank<T> {
    /// Creates an empty bank that grows `cache_size` slots at a time.
    #[must_use]
    pub fn new(cache_size: usize) -> Self {
        Self::with_config(BankConfig::new(cache_size))
    }

    /// Creates an empty bank from a [`BankConfig`].
    #[must_use]
    pub fn with_config(config: BankConfig) -> Self {
        Self {
            inner: CriticalSection::new(ObjectBank::with_config(config)),
        }
    }

    /// See [`ObjectBank::allocate`].
    pub fn allocate(&self, value: T) -> Option<BankHandle> {
        self.inner.enter().allocate(value)
    }

    /// See [`ObjectBank::free`].
    pub fn free(&self, handle: BankHandle) -> Option<T> {
        self.inner.enter().free(handle)
    }

    /// Runs `f` on a live object.
    pub fn with<R>(&self, handle: BankHandle, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.inner.enter().get(handle).map(f)
    }

    /// Runs `f` on a live object mutably.
    pub fn with_mut<R>(&self, handle: BankHandle, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.inner.enter().get_mut(handle).map(f)
    }

    /// Live objects.
    #[must_use]
    pub fn allocated_count(&self) -> usize {
        self.inner.enter().allocated_count()
    }

    /// Total slots across all pages.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.enter().capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ltsdk_platform::Thread;
    use std::sync::Arc;

    #[test]
    fn test_concurrent_allocate_free() {
        let bank = Arc::new(SyncObjectBank::new(8));
        let workers: Vec<_> = (0..4u32)
            .map(|t| {
                let bank = Arc::clone(&bank);
                Thread::spawn(format!("bank-{t}"), move || {
                    let handles: Vec<_> = (0..100).map(|i| bank.allocate(t * 1000 + i).unwrap()).collect();
                    for (i, h) in handles.iter().enumerate() {
                        assert_eq!(bank.with(*h, |v| *v), Some(t * 1000 + i as u32));
                    }
                    for h in handles {
                        bank.free(h);
                    }
                })
                .unwrap()
            })
            .collect();

        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(bank.allocated_count(), 0);
        assert!(bank.capacity() >= 100);
    }

    #[test]
    fn test_with_mut() {
        let bank = SyncObjectBank::new(2);
        let h = bank.allocate(vec![1u8]).unwrap();
        bank.with_mut(h, |v| v.push(2));
        assert_eq!(bank.with(h, Vec::len), Some(2));
        bank.free(h);
        assert_eq!(bank.with(h, Vec::len), None);
    }
}
