//! # Intrusive Lists
//!
//! Circular doubly linked lists whose nodes live in a [`LinkArena`]. Lists
//! hold no storage of their own and can be created, emptied and destroyed
//! without touching the nodes' data.

mod link;
#[allow(clippy::module_inception)]
mod list;

pub use link::{LinkArena, LinkId};
pub use list::{CountedList, List, ListIter};
