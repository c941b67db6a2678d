//! # Struct Bank
//!
//! Untyped sibling of [`ObjectBank`](super::ObjectBank): hands out
//! fixed-size byte blocks. The free list is threaded through the free blocks
//! themselves, so a page carries no per-slot bookkeeping besides a live bit.

use super::config::BankConfig;

/// Fill byte written over freed blocks in debug builds.
pub const POISON_BYTE: u8 = 0xCD;

const LINK_SIZE: usize = std::mem::size_of::<u32>();
const NO_LINK: u32 = u32::MAX;

/// Handle to a block in a [`StructBank`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StructHandle {
    index: u32,
}

impl StructHandle {
    /// Block index across all pages.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }
}

/// A growable pool of `struct_size`-byte blocks.
#[derive(Debug)]
pub struct StructBank {
    pages: Vec<Box<[u8]>>,
    live: Vec<bool>,
    struct_size: usize,
    stride: usize,
    cache_size: usize,
    free_head: Option<u32>,
    allocated_count: usize,
}

impl StructBank {
    /// Creates an empty bank of `struct_size`-byte blocks, grown
    /// `cache_size` blocks at a time.
    #[must_use]
    pub fn new(struct_size: usize, cache_size: usize) -> Self {
        Self::with_config(struct_size, BankConfig::new(cache_size))
    }

    /// Creates an empty bank from a [`BankConfig`].
    #[must_use]
    pub fn with_config(struct_size: usize, config: BankConfig) -> Self {
        Self {
            pages: Vec::new(),
            live: Vec::new(),
            struct_size,
            stride: struct_size.max(LINK_SIZE),
            cache_size: config.cache_size.max(1),
            free_head: None,
            allocated_count: 0,
        }
    }

    /// Usable bytes per block.
    #[inline]
    #[must_use]
    pub const fn struct_size(&self) -> usize {
        self.struct_size
    }

    /// Live blocks.
    #[inline]
    #[must_use]
    pub const fn allocated_count(&self) -> usize {
        self.allocated_count
    }

    /// Total blocks across all pages.
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

    fn block_range(&self, index: u32) -> (usize, std::ops::Range<usize>) {
        let index = index as usize;
        let start = (index % self.cache_size) * self.stride;
        (index / self.cache_size, start..start + self.stride)
    }

    fn read_link(&self, index: u32) -> Option<u32> {
        let (page, range) = self.block_range(index);
        let bytes = &self.pages.get(page)?[range.start..range.start + LINK_SIZE];
        let link = u32::from_le_bytes(bytes.try_into().ok()?);
        (link != NO_LINK).then_some(link)
    }

    fn write_link(&mut self, index: u32, link: Option<u32>) {
        let (page, range) = self.block_range(index);
        if let Some(page) = self.pages.get_mut(page) {
            page[range.start..range.start + LINK_SIZE].copy_from_slice(&link.unwrap_or(NO_LINK).to_le_bytes());
        }
    }

    fn grow(&mut self) -> Option<()> {
        let base = self.capacity();
        let end = u32::try_from(base + self.cache_size).ok()?;
        let bytes = self.cache_size.checked_mul(self.stride)?;

        let mut page = Vec::new();
        page.try_reserve_exact(bytes).ok()?;
        page.resize(bytes, if cfg!(debug_assertions) { POISON_BYTE } else { 0 });
        self.pages.try_reserve(1).ok()?;
        self.live.try_reserve(self.cache_size).ok()?;
        self.pages.push(page.into_boxed_slice());
        self.live.resize(base + self.cache_size, false);

        let base = base as u32;
        for i in base..end {
            let next = if i + 1 < end { Some(i + 1) } else { self.free_head };
            self.write_link(i, next);
        }
        self.free_head = Some(base);

        tracing::debug!(
            "struct bank ({} byte blocks) grew to {} pages",
            self.struct_size,
            self.pages.len()
        );
        Some(())
    }

    /// Hands out a zero-filled block, growing by one page if needed.
    ///
    /// Returns `None` only if the page allocation fails.
    pub fn allocate(&mut self) -> Option<StructHandle> {
        if self.free_head.is_none() {
            self.grow()?;
        }
        let index = self.free_head?;
        self.free_head = self.read_link(index);

        let (page, range) = self.block_range(index);
        self.pages[page][range].fill(0);
        self.live[index as usize] = true;
        self.allocated_count += 1;
        Some(StructHandle { index })
    }

    /// Returns a block to the free list. False if it was not live.
    pub fn free(&mut self, handle: StructHandle) -> bool {
        if !self.live.get(handle.index as usize).copied().unwrap_or(false) {
            debug_assert!(handle.index as usize >= self.live.len(), "double free of struct block {}", handle.index);
            return false;
        }
        if cfg!(debug_assertions) {
            let (page, range) = self.block_range(handle.index);
            self.pages[page][range].fill(POISON_BYTE);
        }
        self.write_link(handle.index, self.free_head);
        self.free_head = Some(handle.index);
        self.live[handle.index as usize] = false;
        self.allocated_count -= 1;
        true
    }

    /// Bytes of a live block.
    #[must_use]
    pub fn get(&self, handle: StructHandle) -> Option<&[u8]> {
        if !*self.live.get(handle.index as usize)? {
            return None;
        }
        let (page, range) = self.block_range(handle.index);
        Some(&self.pages[page][range.start..range.start + self.struct_size])
    }

    /// Mutable bytes of a live block.
    pub fn get_mut(&mut self, handle: StructHandle) -> Option<&mut [u8]> {
        if !*self.live.get(handle.index as usize)? {
            return None;
        }
        let size = self.struct_size;
        let (page, range) = self.block_range(handle.index);
        Some(&mut self.pages[page][range.start..range.start + size])
    }

    /// Raw bytes of any block, live or free. Used to inspect poisoning.
    #[must_use]
    pub fn raw_block(&self, handle: StructHandle) -> Option<&[u8]> {
        let (page, range) = self.block_range(handle.index);
        self.pages.get(page).map(|p| &p[range])
    }
}

impl Drop for StructBank {
    fn drop(&mut self) {
        debug_assert!(
            self.allocated_count == 0 || std::thread::panicking(),
            "struct bank dropped with {} live blocks",
            self.allocated_count
        );
    }
}
