//! DFS Layout Module
//!
//! Models how the DAOS File System lays files and directories out as VOS
//! objects.
//!
//! # Components
//!
//! - **Object Class Policy** (`oclass.rs`): class name → replicas, parity,
//!   stripe width and target count, separately for directories and files
//! - **Cell Stats** (`cell_stats.rs`): payload vs. parity byte accounting
//! - **Layout Builder** (`layout.rs`): chunking, replication and EC
//!   decomposition of file data; directory entries; the superblock
//! - **Checksum** (`checksum.rs`): per-container checksum sizes
//!
//! # Usage
//!
//! ```rust
//! use vos_estimator::dfs::{Dfs, DirEntries, LayoutConfig, ObjectClass};
//!
//! # fn main() -> vos_estimator::Result<()> {
//! let oclass = ObjectClass::new("S1", "RP_3G1")?;
//! let mut dfs = Dfs::new(oclass, LayoutConfig::default())?;
//!
//! let mut root = DirEntries::new();
//! dfs.add_file(&mut root, 10, 5_767_168, 1)?;
//! dfs.finish_dir(root, 1)?;
//!
//! assert_eq!(dfs.ec_stats().payload, 3 * 5_767_168);
//! let dump = dfs.get_container().dump()?;
//! assert_eq!(dump.objects.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod cell_stats;
pub mod checksum;
pub mod layout;
pub mod oclass;

#[cfg(test)]
mod proptest;

pub use cell_stats::CellStats;
pub use checksum::ChecksumType;
pub use layout::{
    default_inode_akey, Dfs, DirEntries, FileLayout, LayoutConfig, DEFAULT_CHUNK_SIZE,
    DEFAULT_EC_CELL_SIZE, DEFAULT_INODE_SIZE, DEFAULT_IO_SIZE,
};
pub use oclass::{ObjectClass, ObjectClassParams};
