//! # LTSDK
//!
//! The public SDK layer of the engine, in one crate.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                          LTSDK                           │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐  │
//! │  │  math        │   │  database    │   │  core        │  │
//! │  │  • Vectors   │<──│  • Manager   │   │  • Lists     │  │
//! │  │  • Transforms│   │  • Creator   │   │  • Banks     │  │
//! │  │  • Intersect │   │  • Formats   │   │              │  │
//! │  └──────────────┘   └──────┬───────┘   └──────┬───────┘  │
//! │                            │                  │          │
//! │                     ┌──────v──────────────────v───────┐  │
//! │                     │  platform                       │  │
//! │                     │  • Streams  • Locks  • Timers   │  │
//! │                     └─────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Subsystems are re-exported as modules; the most used types are also
//! available from the crate root.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub use ltsdk_core as core;
pub use ltsdk_database as database;
pub use ltsdk_math as math;
pub use ltsdk_platform as platform;

pub use ltsdk_core::{CountedList, LinkArena, List, ObjectBank, StructBank};
pub use ltsdk_database::{
    AttributeHandle, AttributeType, AttributeUsage, CreatorDatabase, DatabaseError, DatabaseHandle, DatabaseMgr,
    RecordHandle, StringKeeper,
};
pub use ltsdk_math::{Aabb, Matrix3x4, Obb, Plane, Rotation, Sphere, Transform, Vector2, Vector3, Vector4};
pub use ltsdk_platform::{CriticalSection, HighResTimer, InStream, OutStream};
