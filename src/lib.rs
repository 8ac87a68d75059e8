//! VOS Storage Estimator
//!
//! A capacity and layout model for the DAOS Versioning Object Store. Given a
//! directory tree, or aggregate statistics describing one, it computes the
//! objects, distribution keys, attribute keys and values DFS would store,
//! including replication and erasure coding overhead.
//!
//! # Architecture
//!
//! ```text
//! Object Class ─┐
//!               ├─▶ DFS Layout Builder ─▶ Container ─▶ dump() ─▶ YAML / stats
//! Namespace  ───┘    (chunks, EC, dirs)
//! (walk or average)
//! ```
//!
//! # Modules
//!
//! - [`config`] - Estimator configuration
//! - [`dfs`] - Object class policy and the DFS layout builder
//! - [`error`] - Error types
//! - [`explorer`] - Directory walker and average-FS synthesizer
//! - [`vos`] - VOS tree data model and dump format

pub mod config;
pub mod dfs;
pub mod error;
pub mod explorer;
pub mod vos;

// Re-export commonly used types
pub use config::EstimatorConfig;
pub use dfs::{CellStats, Dfs, LayoutConfig, ObjectClass};
pub use error::{Error, Result};
pub use explorer::{AverageFs, FileSystemExplorer, FsStats};
pub use vos::{Container, Containers, ContainersDump, TreeStats};
