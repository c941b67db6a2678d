//! # Lists
//!
//! Non-owning circular lists over nodes stored in a [`LinkArena`]. Each list
//! is identified by a sentinel head node; the list itself is just that id.

use super::link::{LinkArena, LinkId};

/// A doubly linked list anchored at a sentinel node.
///
/// Every operation takes the arena that holds the nodes. Adding a node that
/// is already in a list, or removing one that is not in *this* list, is a
/// programming error caught by `debug_assert!`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct List {
    head: LinkId,
}

impl List {
    /// Creates an empty list with a fresh sentinel in `arena`.
    pub fn new<T>(arena: &mut LinkArena<T>) -> Self {
        Self {
            head: arena.new_head(),
        }
    }

    /// The sentinel node.
    #[inline]
    #[must_use]
    pub const fn head(&self) -> LinkId {
        self.head
    }

    /// Links `link` at the front.
    pub fn add_head<T>(&self, arena: &mut LinkArena<T>, link: LinkId) {
        arena.splice_after(self.head, link);
    }

    /// Links `link` at the back.
    pub fn add_tail<T>(&self, arena: &mut LinkArena<T>, link: LinkId) {
        let last = arena.prev(self.head);
        arena.splice_after(last, link);
    }

    /// Links `link` directly after `at`, which is a member or the head.
    pub fn add_after<T>(&self, arena: &mut LinkArena<T>, at: LinkId, link: LinkId) {
        debug_assert!(at == self.head || self.contains(arena, at), "anchor is not in this list");
        arena.splice_after(at, link);
    }

    /// Links `link` directly before `at`, which is a member or the head.
    pub fn add_before<T>(&self, arena: &mut LinkArena<T>, at: LinkId, link: LinkId) {
        debug_assert!(at == self.head || self.contains(arena, at), "anchor is not in this list");
        let prev = arena.prev(at);
        arena.splice_after(prev, link);
    }

    /// Unlinks `link` and ties it off.
    pub fn remove<T>(&self, arena: &mut LinkArena<T>, link: LinkId) {
        debug_assert!(link != self.head, "cannot remove the list head");
        debug_assert!(self.contains(arena, link), "link is not in this list");
        arena.unsplice(link);
    }

    /// First member, if any.
    #[must_use]
    pub fn first<T>(&self, arena: &LinkArena<T>) -> Option<LinkId> {
        let next = arena.next(self.head);
        (next != self.head).then_some(next)
    }

    /// Last member, if any.
    #[must_use]
    pub fn last<T>(&self, arena: &LinkArena<T>) -> Option<LinkId> {
        let prev = arena.prev(self.head);
        (prev != self.head).then_some(prev)
    }

    /// True if the sentinel is tied off.
    #[must_use]
    pub fn is_empty<T>(&self, arena: &LinkArena<T>) -> bool {
        arena.is_tied_off(self.head)
    }

    /// Walks the chain and counts members. O(n).
    #[must_use]
    pub fn count_objects<T>(&self, arena: &LinkArena<T>) -> usize {
        self.iter(arena).count()
    }

    /// True if `link` is a member. O(n).
    #[must_use]
    pub fn contains<T>(&self, arena: &LinkArena<T>, link: LinkId) -> bool {
        self.iter(arena).any(|id| id == link)
    }

    /// Iterates member ids front to back.
    #[must_use]
    pub fn iter<'a, T>(&self, arena: &'a LinkArena<T>) -> ListIter<'a, T> {
        ListIter {
            arena,
            head: self.head,
            cursor: self.head,
        }
    }

    /// Unlinks every member, leaving each tied off.
    pub fn remove_all<T>(&self, arena: &mut LinkArena<T>) {
        while let Some(first) = self.first(arena) {
            arena.unsplice(first);
        }
    }

    /// Unlinks every member and frees the sentinel.
    pub fn destroy<T>(self, arena: &mut LinkArena<T>) {
        self.remove_all(arena);
        arena.free_link(self.head);
    }
}

/// Iterator over the members of a [`List`].
pub struct ListIter<'a, T> {
    arena: &'a LinkArena<T>,
    head: LinkId,
    cursor: LinkId,
}

impl<T> Iterator for ListIter<'_, T> {
    type Item = LinkId;

    fn next(&mut self) -> Option<LinkId> {
        let next = self.arena.next(self.cursor);
        if next == self.head {
            return None;
        }
        self.cursor = next;
        Some(next)
    }
}

/// A [`List`] that tracks its length.
///
/// The count is only correct while every mutation goes through this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CountedList {
    list: List,
    count: usize,
}

impl CountedList {
    /// Creates an empty list with a fresh sentinel in `arena`.
    pub fn new<T>(arena: &mut LinkArena<T>) -> Self {
        Self {
            list: List::new(arena),
            count: 0,
        }
    }

    /// Tracked member count. O(1).
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// The untracked list underneath.
    #[inline]
    #[must_use]
    pub const fn as_list(&self) -> &List {
        &self.list
    }

    /// The sentinel node.
    #[inline]
    #[must_use]
    pub const fn head(&self) -> LinkId {
        self.list.head
    }

    /// Links `link` at the front.
    pub fn add_head<T>(&mut self, arena: &mut LinkArena<T>, link: LinkId) {
        self.list.add_head(arena, link);
        self.count += 1;
    }

    /// Links `link` at the back.
    pub fn add_tail<T>(&mut self, arena: &mut LinkArena<T>, link: LinkId) {
        self.list.add_tail(arena, link);
        self.count += 1;
    }

    /// Links `link` directly after `at`.
    pub fn add_after<T>(&mut self, arena: &mut LinkArena<T>, at: LinkId, link: LinkId) {
        self.list.add_after(arena, at, link);
        self.count += 1;
    }

    /// Links `link` directly before `at`.
    pub fn add_before<T>(&mut self, arena: &mut LinkArena<T>, at: LinkId, link: LinkId) {
        self.list.add_before(arena, at, link);
        self.count += 1;
    }

    /// Unlinks `link` and ties it off.
    pub fn remove<T>(&mut self, arena: &mut LinkArena<T>, link: LinkId) {
        self.list.remove(arena, link);
        self.count -= 1;
    }

    /// First member, if any.
    #[must_use]
    pub fn first<T>(&self, arena: &LinkArena<T>) -> Option<LinkId> {
        self.list.first(arena)
    }

    /// Last member, if any.
    #[must_use]
    pub fn last<T>(&self, arena: &LinkArena<T>) -> Option<LinkId> {
        self.list.last(arena)
    }

    /// True if the count is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Walks the chain and counts members. O(n).
    #[must_use]
    pub fn count_objects<T>(&self, arena: &LinkArena<T>) -> usize {
        self.list.count_objects(arena)
    }

    /// True if `link` is a member. O(n).
    #[must_use]
    pub fn contains<T>(&self, arena: &LinkArena<T>, link: LinkId) -> bool {
        self.list.contains(arena, link)
    }

    /// Iterates member ids front to back.
    #[must_use]
    pub fn iter<'a, T>(&self, arena: &'a LinkArena<T>) -> ListIter<'a, T> {
        self.list.iter(arena)
    }

    /// Unlinks every member.
    pub fn remove_all<T>(&mut self, arena: &mut LinkArena<T>) {
        self.list.remove_all(arena);
        self.count = 0;
    }

    /// Unlinks every member and frees the sentinel.
    pub fn destroy<T>(self, arena: &mut LinkArena<T>) {
        self.list.destroy(arena);
    }
}
