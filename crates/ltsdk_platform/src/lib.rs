//! # LTSDK Platform
//!
//! The thin OS layer underneath the SDK.
//!
//! ## Streams
//!
//! The database and string keeper only ever read through [`InStream`] and
//! write through [`OutStream`]. Memory and file implementations live here;
//! anything else (archives, network buffers) implements the same two traits.
//!
//! ## Synchronization
//!
//! SDK containers are single-threaded. A [`CriticalSection`] owns the data it
//! guards, so the lock cannot be skipped by accident.
//!
//! ```rust
//! use ltsdk_platform::{InStream, MemoryOutStream, OutStream};
//!
//! let mut out = MemoryOutStream::new();
//! out.write_string("Weapons").unwrap();
//! let mut input = out.into_in_stream();
//! assert_eq!(input.read_string().unwrap(), "Weapons");
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod file;
pub mod stream;
pub mod sync;
pub mod timer;

pub use error::{StreamError, StreamResult};
pub use file::{FileInStream, FileOutStream};
pub use stream::{InStream, MemoryInStream, MemoryOutStream, OutStream};
pub use sync::{sleep_ms, CriticalSection, CriticalSectionGuard, Thread};
pub use timer::{HighResTimer, TICK_FREQUENCY};
