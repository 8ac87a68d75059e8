//! Namespace Sources
//!
//! Two ways to feed the DFS layout builder:
//!
//! - **Explorer** (`walker.rs`): walks a live directory tree, one builder
//!   call per entry
//! - **Average FS** (`average.rs`): synthesizes an average tree from
//!   aggregate statistics, a constant number of builder calls
//!
//! Both accumulate into the same [`crate::dfs::Dfs`], and an explorer run
//! produces the [`FsStats`] an average run can consume later.

pub mod average;
pub mod stats;
pub mod walker;

pub use average::AverageFs;
pub use stats::{FsStats, DEFAULT_NAME_SIZE};
pub use walker::FileSystemExplorer;
