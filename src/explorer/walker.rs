//! Filesystem Explorer
//!
//! Breadth-first walk of a real directory tree. Each directory becomes one
//! directory object, each regular file one file object. Entries that cannot
//! be inspected are recorded as placeholders and the walk carries on.

use super::stats::{FsStats, DEFAULT_NAME_SIZE};
use crate::dfs::{ChecksumType, Dfs, DirEntries, LayoutConfig, ObjectClass};
use crate::error::{Error, Result};
use crate::vos::AKey;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Walks a directory tree into a [`Dfs`] layout
#[derive(Debug)]
pub struct FileSystemExplorer {
    root: PathBuf,
    dfs: Dfs,
    stats: FsStats,
    name_size: u64,
}

impl FileSystemExplorer {
    pub fn new(root: impl Into<PathBuf>, oclass: ObjectClass) -> Result<Self> {
        Self::with_config(root, oclass, LayoutConfig::default())
    }

    pub fn with_config(
        root: impl Into<PathBuf>,
        oclass: ObjectClass,
        config: LayoutConfig,
    ) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            dfs: Dfs::new(oclass, config)?,
            stats: FsStats::default(),
            name_size: DEFAULT_NAME_SIZE,
        })
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

    /// Name length of placeholder entries for unlistable directories
    pub fn set_name_size(&mut self, name_size: u64) {
        self.name_size = name_size.max(1);
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get_dfs(&self) -> &Dfs {
        &self.dfs
    }

    pub fn into_dfs(self) -> Dfs {
        self.dfs
    }

    pub fn stats(&self) -> &FsStats {
        &self.stats
    }

    /// Walk the tree. Only a root that is not a directory is an error;
    /// everything below it is recovered locally.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn explore(&mut self) -> Result<()> {
        let metadata = fs::symlink_metadata(&self.root)?;
        if !metadata.is_dir() {
            return Err(Error::Config(format!(
                "{} is not a directory",
                self.root.display()
            )));
        }

        self.stats.record_root();
        let mut queue = VecDeque::from([self.root.clone()]);

        while let Some(dir) = queue.pop_front() {
            let entries = self.scan_dir(&dir, &mut queue)?;
            debug!(path = %dir.display(), entries = entries.len(), "Scanned directory");
            self.dfs.finish_dir(entries, 1)?;
        }

        info!(
            files = self.stats.total_files,
            dirs = self.stats.total_dirs,
            symlinks = self.stats.total_symlinks,
            errors = self.stats.total_errors,
            "Exploration complete"
        );
        Ok(())
    }

    fn scan_dir(&mut self, dir: &Path, queue: &mut VecDeque<PathBuf>) -> Result<DirEntries> {
        let mut entries = DirEntries::new();

        let read_dir = match fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "Cannot list directory");
                self.dfs.add_error(&mut entries, self.name_size)?;
                self.stats.total_errors += 1;
                return Ok(entries);
            }
        };

        // sorted so repeated runs dump identically
        let mut listing = Vec::new();
        for entry in read_dir {
            match entry {
                Ok(entry) => listing.push(entry),
                Err(e) => {
                    warn!(path = %dir.display(), error = %e, "Cannot read directory entry");
                    self.add_error(&mut entries, self.name_size)?;
                }
            }
        }
        listing.sort_by_key(|entry| entry.file_name());

        for entry in listing {
            let path = entry.path();
            let name_len = entry.file_name().len() as u64;

            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Cannot stat entry");
                    self.add_error(&mut entries, name_len)?;
                    continue;
                }
            };

            if file_type.is_symlink() {
                self.add_symlink(&mut entries, &path, name_len, fs::read_link(&path))?;
            } else if file_type.is_dir() {
                self.dfs.add_dir(&mut entries, name_len, 1)?;
                self.stats.record_dir(name_len);
                queue.push_back(path);
            } else if file_type.is_file() {
                match entry.metadata() {
                    Ok(metadata) => {
                        self.dfs.add_file(&mut entries, name_len, metadata.len(), 1)?;
                        self.stats.record_file(name_len, metadata.len());
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Cannot stat file");
                        self.add_error(&mut entries, name_len)?;
                    }
                }
            } else {
                warn!(path = %path.display(), "Unsupported entry type");
                self.add_error(&mut entries, name_len)?;
            }
        }

        Ok(entries)
    }

    /// A link whose target cannot be read is an error entry
    fn add_symlink(
        &mut self,
        entries: &mut DirEntries,
        path: &Path,
        name_len: u64,
        target: io::Result<PathBuf>,
    ) -> Result<()> {
        match target {
            Ok(target) => {
                let target_len = target.as_os_str().len() as u64;
                self.dfs.add_symlink(entries, name_len, target_len, 1)?;
                self.stats.record_symlink(name_len, target_len);
                Ok(())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read symlink");
                self.add_error(entries, name_len)
            }
        }
    }

    fn add_error(&mut self, entries: &mut DirEntries, name_len: u64) -> Result<()> {
        self.dfs.add_error(entries, name_len.max(1))?;
        self.stats.record_error(name_len);
        Ok(())
    }
}
