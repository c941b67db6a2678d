//! # LTSDK Core
//!
//! Containers the engine and the database build on.
//!
//! ## Lists
//!
//! [`List`] and [`CountedList`] are circular doubly linked lists over nodes
//! owned by a [`LinkArena`]. A node is in at most one list at a time and is
//! *tied off* (linked to itself) otherwise.
//!
//! ```rust
//! use ltsdk_core::{LinkArena, List};
//!
//! let mut arena = LinkArena::new();
//! let list = List::new(&mut arena);
//! let node = arena.new_link("crate");
//! list.add_tail(&mut arena, node);
//! assert_eq!(list.count_objects(&arena), 1);
//! list.remove(&mut arena, node);
//! assert!(arena.is_tied_off(node));
//! ```
//!
//! ## Banks
//!
//! [`ObjectBank`] and [`StructBank`] allocate from pages of `cache_size`
//! slots and only ever grow. [`SyncObjectBank`] puts a bank behind a
//! critical section for multithreaded use.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod list;
pub mod memory;

pub use list::{CountedList, LinkArena, LinkId, List, ListIter};
pub use memory::{BankConfig, BankHandle, ObjectBank, StructBank, StructHandle, SyncObjectBank};
