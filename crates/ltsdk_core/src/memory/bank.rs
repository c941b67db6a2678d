//! # Object Bank
//!
//! Page-based allocator for objects of one type that are created and
//! destroyed constantly.

use super::config::BankConfig;

/// Handle to an object in an [`ObjectBank`].
///
/// Carries the slot's generation, so a handle kept past `free` is rejected
/// instead of aliasing whatever reuses the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BankHandle {
    index: u32,
    generation: u32,
}

impl BankHandle {
    /// Slot index across all pages.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation the slot had when this handle was issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
enum SlotState<T> {
    Occupied(T),
    /// Free slot; holds the next entry of the free list.
    Free(Option<u32>),
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    state: SlotState<T>,
}

/// A growable pool of `T` with an embedded free list.
///
/// Pages of `cache_size` slots are added whenever the free list is empty.
/// Pages are never released before the bank drops, and dropping a bank that
/// still has live objects trips a debug assertion.
///
/// # Thread Safety
///
/// Not thread-safe. Use [`SyncObjectBank`](super::SyncObjectBank) when
/// several threads allocate from one bank.
///
/// # Example
///
/// ```rust
/// use ltsdk_core::ObjectBank;
///
/// let mut bank = ObjectBank::new(16);
/// let handle = bank.allocate(42u32).unwrap();
/// assert_eq!(bank.get(handle), Some(&42));
/// assert_eq!(bank.free(handle), Some(42));
/// ```
#[derive(Debug)]
pub struct ObjectBank<T> {
    pages: Vec<Vec<Slot<T>>>,
    free_head: Option<u32>,
    cache_size: usize,
    allocated_count: usize,
}

impl<T> ObjectBank<T> {
    /// Creates an empty bank that grows `cache_size` slots at a time.
    ///
    /// No memory is reserved until the first allocation.
    #[must_use]
    pub fn new(cache_size: usize) -> Self {
        Self::with_config(BankConfig::new(cache_size))
    }

    /// Creates an empty bank from a [`BankConfig`].
    #[must_use]
    pub fn with_config(config: BankConfig) -> Self {
        Self {
            pages: Vec::new(),
            free_head: None,
            cache_size: config.cache_size.max(1),
            allocated_count: 0,
        }
    }

    /// Slots per page.
    #[inline]
    #[must_use]
    pub const fn cache_size(&self) -> usize {
        self.cache_size
    }

    /// Live objects.
    #[inline]
    #[must_use]
    pub const fn allocated_count(&self) -> usize {
        self.allocated_count
    }

    /// Total slots across all pages.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.pages.len() * self.cache_size
    }

    /// Pages allocated so far.
    #[inline]
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Unused slots.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.capacity() - self.allocated_count
    }

    fn slot(&self, index: u32) -> Option<&Slot<T>> {
        let index = index as usize;
        self.pages.get(index / self.cache_size)?.get(index % self.cache_size)
    }

    fn slot_mut(&mut self, index: u32) -> Option<&mut Slot<T>> {
        let index = index as usize;
        self.pages.get_mut(index / self.cache_size)?.get_mut(index % self.cache_size)
    }

    /// Adds one page and threads its slots onto the free list.
    fn grow(&mut self) -> Option<()> {
        let base = self.capacity();
        let end = u32::try_from(base + self.cache_size).ok()?;
        self.pages.try_reserve(1).ok()?;
        let mut page = Vec::new();
        page.try_reserve_exact(self.cache_size).ok()?;

        let base = base as u32;
        for i in base..end {
            let next = if i + 1 < end { Some(i + 1) } else { self.free_head };
            page.push(Slot {
                generation: 0,
                state: SlotState::Free(next),
            });
        }
        self.pages.push(page);
        self.free_head = Some(base);

        tracing::debug!(
            "object bank grew to {} pages ({} slots)",
            self.pages.len(),
            self.capacity()
        );
        Some(())
    }

    /// Stores `value` in a free slot, growing by one page if needed.
    ///
    /// Returns `None` only if the page allocation fails.
    pub fn allocate(&mut self, value: T) -> Option<BankHandle> {
        if self.free_head.is_none() {
            self.grow()?;
        }
        let index = self.free_head?;
        let slot = self.slot_mut(index)?;
        let SlotState::Free(next) = slot.state else {
            return None;
        };
        slot.state = SlotState::Occupied(value);
        let generation = slot.generation;

        self.free_head = next;
        self.allocated_count += 1;
        Some(BankHandle { index, generation })
    }

    /// Returns the object's slot to the free list and hands back the value.
    ///
    /// Stale or already-freed handles return `None` and change nothing.
    pub fn free(&mut self, handle: BankHandle) -> Option<T> {
        let free_head = self.free_head;
        let slot = self.slot_mut(handle.index)?;
        if slot.generation != handle.generation || !matches!(slot.state, SlotState::Occupied(_)) {
            return None;
        }
        let state = std::mem::replace(&mut slot.state, SlotState::Free(free_head));
        slot.generation = slot.generation.wrapping_add(1);

        self.free_head = Some(handle.index);
        self.allocated_count -= 1;
        match state {
            SlotState::Occupied(value) => Some(value),
            SlotState::Free(_) => None,
        }
    }

    /// True if `handle` refers to a live object.
    #[must_use]
    pub fn contains(&self, handle: BankHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Looks up a live object.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: BankHandle) -> Option<&T> {
        let slot = self.slot(handle.index)?;
        match &slot.state {
            SlotState::Occupied(value) if slot.generation == handle.generation => Some(value),
            _ => None,
        }
    }

    /// Looks up a live object mutably.
    #[inline]
    pub fn get_mut(&mut self, handle: BankHandle) -> Option<&mut T> {
        let slot = self.slot_mut(handle.index)?;
        match &mut slot.state {
            SlotState::Occupied(value) if slot.generation == handle.generation => Some(value),
            _ => None,
        }
    }

    /// Iterates live objects in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (BankHandle, &T)> {
        self.pages.iter().flatten().enumerate().filter_map(|(index, slot)| match &slot.state {
            SlotState::Occupied(value) => Some((
                BankHandle {
                    index: index as u32,
                    generation: slot.generation,
                },
                value,
            )),
            SlotState::Free(_) => None,
        })
    }
}

impl<T> Drop for ObjectBank<T> {
    fn drop(&mut self) {
        debug_assert!(
            self.allocated_count == 0 || std::thread::panicking(),
            "object bank dropped with {} live objects",
            self.allocated_count
        );
    }
}
