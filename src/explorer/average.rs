//! Average Filesystem Synthesizer
//!
//! Estimates a namespace from aggregate statistics alone. Every directory is
//! assumed to look like the average one, so the whole tree is described by a
//! single directory object and a single file object, each with a count.

use super::stats::{FsStats, DEFAULT_NAME_SIZE};
use crate::dfs::{ChecksumType, Dfs, DirEntries, LayoutConfig, ObjectClass};
use crate::error::{Error, Result};
use crate::vos::AKey;
use tracing::{debug, instrument};

/// `total / count` rounded half up
fn per_dir(total: u64, count: u64) -> u64 {
    let rest = total % count;
    total / count + u64::from(rest >= count - rest)
}

/// Synthetic namespace built from totals and averages
#[derive(Debug)]
pub struct AverageFs {
    dfs: Dfs,
    total_files: u64,
    avg_file_size: u64,
    total_dirs: u64,
    total_symlinks: u64,
    avg_symlink_size: u64,
    avg_name_size: u64,
}

impl AverageFs {
    pub fn new(oclass: ObjectClass) -> Result<Self> {
        Self::with_config(oclass, LayoutConfig::default())
    }

    pub fn with_config(oclass: ObjectClass, config: LayoutConfig) -> Result<Self> {
        Ok(Self {
            dfs: Dfs::new(oclass, config)?,
            total_files: 0,
            avg_file_size: 0,
            total_dirs: 0,
            total_symlinks: 0,
            avg_symlink_size: 0,
            avg_name_size: DEFAULT_NAME_SIZE,
        })
    }

    /// Take every total and average from a previous walk
    pub fn from_stats(oclass: ObjectClass, config: LayoutConfig, stats: &FsStats) -> Result<Self> {
        let mut afs = Self::with_config(oclass, config)?;
        afs.set_total_files(stats.total_files);
        afs.set_avg_file_size(stats.avg_file_size());
        afs.set_total_dirs(stats.total_dirs);
        afs.set_total_symlinks(stats.total_symlinks);
        afs.set_avg_symlink_size(stats.avg_symlink_size());
        afs.set_avg_name_size(stats.avg_name_size());
        Ok(afs)
    }

    pub fn set_total_files(&mut self, total_files: u64) {
        self.total_files = total_files;
    }

    pub fn set_avg_file_size(&mut self, avg_file_size: u64) {
        self.avg_file_size = avg_file_size;
    }

    pub fn set_total_dirs(&mut self, total_dirs: u64) {
        self.total_dirs = total_dirs;
    }

    pub fn set_total_symlinks(&mut self, total_symlinks: u64) {
        self.total_symlinks = total_symlinks;
    }

    pub fn set_avg_symlink_size(&mut self, avg_symlink_size: u64) {
        self.avg_symlink_size = avg_symlink_size;
    }

    /// A zero average falls back to the default name length
    pub fn set_avg_name_size(&mut self, avg_name_size: u64) {
        self.avg_name_size = if avg_name_size == 0 {
            DEFAULT_NAME_SIZE
        } else {
            avg_name_size
        };
    }

    pub fn set_dfs_inode(&mut self, akey: AKey) {
        self.dfs.set_dfs_inode(akey);
    }

    pub fn set_io_size(&mut self, io_size: u64) -> Result<()> {
        self.dfs.set_io_size(io_size)
    }

    pub fn set_chunk_size(&mut self, chunk_size: u64) -> Result<()> {
        self.dfs.set_chunk_size(chunk_size)
    }

    pub fn set_ec_cell_size(&mut self, ec_cell_size: u64) -> Result<()> {
        self.dfs.set_ec_cell_size(ec_cell_size)
    }

    pub fn set_checksum(&mut self, checksum: ChecksumType, csum_gran: u64) -> Result<()> {
        self.dfs.set_checksum(checksum, csum_gran)
    }

    pub fn get_dfs(&self) -> &Dfs {
        &self.dfs
    }

    pub fn into_dfs(self) -> Dfs {
        self.dfs
    }

    /// Build the representative directory and the file objects
    #[instrument(skip(self))]
    pub fn create(&mut self) -> Result<()> {
        if self.total_dirs == 0 {
            if self.total_files > 0 || self.total_symlinks > 0 {
                return Err(Error::Config(
                    "total_dirs must be greater than 0 when files or symlinks are present"
                        .to_string(),
                ));
            }
            return Ok(());
        }

        let files_per_dir = per_dir(self.total_files, self.total_dirs);
        let symlinks_per_dir = per_dir(self.total_symlinks, self.total_dirs);
        debug!(files_per_dir, symlinks_per_dir, "Average directory");

        let name_size = self.avg_name_size;
        let mut dir = DirEntries::new();
        if symlinks_per_dir > 0 {
            self.dfs
                .add_symlink(&mut dir, name_size, self.avg_symlink_size, symlinks_per_dir)?;
        }
        self.dfs.add_dir(&mut dir, name_size, 1)?;
        if files_per_dir > 0 {
            self.dfs.add_file_entry(&mut dir, name_size, files_per_dir)?;
        }
        self.dfs.finish_dir(dir, self.total_dirs)?;

        self.dfs
            .add_file_object(self.avg_file_size, self.total_files)
    }
}
