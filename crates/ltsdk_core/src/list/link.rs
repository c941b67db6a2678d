//! # Link Arena
//!
//! Storage for list nodes. Every node sits in exactly one circular chain of
//! `prev`/`next` indices; a node whose links both point back at itself is
//! *tied off* and belongs to no list.

/// Index of a node inside a [`LinkArena`].
///
/// A `LinkId` is a borrow, not an owner: after [`LinkArena::free_link`] the
/// index may be handed out again for a new node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinkId(u32);

impl LinkId {
    /// Raw arena index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug)]
struct Node<T> {
    prev: LinkId,
    next: LinkId,
    data: Option<T>,
    is_head: bool,
    /// On the arena's free list.
    is_free: bool,
}

/// Owns the nodes that lists splice together.
///
/// Lists never allocate. A node is created here, linked into (and out of)
/// any number of lists over its lifetime, and finally freed here.
#[derive(Debug)]
pub struct LinkArena<T> {
    nodes: Vec<Node<T>>,
    free: Vec<LinkId>,
}

impl<T> Default for LinkArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LinkArena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Creates an empty arena with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    fn insert_node(&mut self, data: Option<T>, is_head: bool) -> LinkId {
        if let Some(id) = self.free.pop() {
            let node = &mut self.nodes[id.0 as usize];
            node.prev = id;
            node.next = id;
            node.data = data;
            node.is_head = is_head;
            node.is_free = false;
            return id;
        }
        let id = LinkId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        debug_assert!(id.0 != u32::MAX, "link arena exhausted");
        self.nodes.push(Node {
            prev: id,
            next: id,
            data,
            is_head,
            is_free: false,
        });
        id
    }

    /// Creates a tied-off sentinel that never carries data.
    pub fn new_head(&mut self) -> LinkId {
        self.insert_node(None, true)
    }

    /// Creates a tied-off node carrying `data`.
    pub fn new_link(&mut self, data: T) -> LinkId {
        self.insert_node(Some(data), false)
    }

    /// Releases a node, returning its data. The node must be tied off.
    ///
    /// Freeing an already freed node changes nothing and returns `None`.
    pub fn free_link(&mut self, id: LinkId) -> Option<T> {
        debug_assert!(!self.is_free(id), "link {id:?} freed twice");
        debug_assert!(self.is_tied_off(id), "freeing a link that is still in a list");
        let node = self.nodes.get_mut(id.0 as usize)?;
        if node.is_free {
            return None;
        }
        node.is_free = true;
        let data = node.data.take();
        self.free.push(id);
        data
    }

    /// True if the node has been freed and not handed out again.
    #[inline]
    #[must_use]
    pub fn is_free(&self, id: LinkId) -> bool {
        self.nodes.get(id.0 as usize).is_some_and(|node| node.is_free)
    }

    /// True if the node is linked only to itself.
    #[inline]
    #[must_use]
    pub fn is_tied_off(&self, id: LinkId) -> bool {
        let node = &self.nodes[id.0 as usize];
        node.prev == id && node.next == id
    }

    /// True if the node is a list sentinel.
    #[inline]
    #[must_use]
    pub fn is_head(&self, id: LinkId) -> bool {
        self.nodes[id.0 as usize].is_head
    }

    /// Following node in the chain.
    #[inline]
    #[must_use]
    pub fn next(&self, id: LinkId) -> LinkId {
        self.nodes[id.0 as usize].next
    }

    /// Preceding node in the chain.
    #[inline]
    #[must_use]
    pub fn prev(&self, id: LinkId) -> LinkId {
        self.nodes[id.0 as usize].prev
    }

    /// Data carried by a node. `None` for sentinels.
    #[inline]
    #[must_use]
    pub fn data(&self, id: LinkId) -> Option<&T> {
        self.nodes.get(id.0 as usize)?.data.as_ref()
    }

    /// Mutable data carried by a node.
    #[inline]
    pub fn data_mut(&mut self, id: LinkId) -> Option<&mut T> {
        self.nodes.get_mut(id.0 as usize)?.data.as_mut()
    }

    /// Number of live nodes, sentinels included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// True if no nodes are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Splices tied-off `link` between `at` and its successor.
    pub(crate) fn splice_after(&mut self, at: LinkId, link: LinkId) {
        debug_assert!(self.is_tied_off(link), "link is already in a list");
        debug_assert!(!self.is_head(link), "a list head cannot be linked into another list");
        let next = self.next(at);
        self.nodes[link.0 as usize].prev = at;
        self.nodes[link.0 as usize].next = next;
        self.nodes[next.0 as usize].prev = link;
        self.nodes[at.0 as usize].next = link;
    }

    /// Cuts `link` out of its chain and ties it off.
    pub(crate) fn unsplice(&mut self, link: LinkId) {
        let prev = self.prev(link);
        let next = self.next(link);
        self.nodes[prev.0 as usize].next = next;
        self.nodes[next.0 as usize].prev = prev;
        self.nodes[link.0 as usize].prev = link;
        self.nodes[link.0 as usize].next = link;
    }
}
