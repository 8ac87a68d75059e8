//! VOS Data Model
//!
//! Semantic containers for the key-value layout of the DAOS Versioning Object
//! Store: a container holds objects, an object holds distribution keys
//! (dkeys), a dkey holds attribute keys (akeys), and an akey holds values.
//!
//! ```text
//! Container ──▶ VosObject ──▶ DKey ──▶ AKey ──▶ Value
//!   count        count         count    count    size × count
//!   csum_*       targets       type     type     aligned
//!                              overhead overhead
//!                                       value_type
//! ```
//!
//! Every level carries a `count` multiplier so that N identical files,
//! chunks or entries are described once.
//!
//! # Components
//!
//! - **Types** (`types.rs`): closed tag enums (`KeyType`, `ValType`,
//!   `Overhead`, `Aligned`) with validated string parsing
//! - **Structures** (`structures.rs`): the open, mutable builders
//! - **Dump** (`dump.rs`): the finalized serde form
//! - **Stats** (`stats.rs`): aggregate counts over a dump

pub mod dump;
pub mod stats;
pub mod structures;
pub mod types;

pub use dump::{AKeyDump, ContainerDump, ContainersDump, DKeyDump, ObjectDump, ValueDump};
pub use stats::TreeStats;
pub use structures::{
    AKey, AKeyBuilder, Container, Containers, DKey, DKeyBuilder, Key, Value, VosObject,
    DEFAULT_CSUM_GRAN, DEFAULT_NUM_SHARDS,
};
pub use types::{Aligned, KeyType, Overhead, ValType};
