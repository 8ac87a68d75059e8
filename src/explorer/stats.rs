//! Running totals of a namespace walk

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Name length used when no real name is known
pub const DEFAULT_NAME_SIZE: u64 = 32;

/// Counts and cumulative sizes gathered while walking a tree
///
/// Saved as YAML after an `explore` run so that a later `average` run can
/// estimate from the statistics alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsStats {
    pub total_files: u64,
    /// Includes the root
    pub total_dirs: u64,
    pub total_symlinks: u64,
    pub total_errors: u64,
    pub total_file_size: u64,
    pub total_symlink_size: u64,
    pub total_name_size: u64,
    /// Named entries, i.e. everything but the root
    pub total_entries: u64,
}

fn average(total: u64, count: u64) -> u64 {
    if count == 0 {
        0
    } else {
        total / count
    }
}

impl FsStats {
    pub fn record_root(&mut self) {
        self.total_dirs += 1;
    }

    pub fn record_dir(&mut self, name_len: u64) {
        self.total_dirs += 1;
        self.record_name(name_len);
    }

    pub fn record_file(&mut self, name_len: u64, size: u64) {
        self.total_files += 1;
        self.total_file_size += size;
        self.record_name(name_len);
    }

    pub fn record_symlink(&mut self, name_len: u64, target_len: u64) {
        self.total_symlinks += 1;
        self.total_symlink_size += target_len;
        self.record_name(name_len);
    }

    pub fn record_error(&mut self, name_len: u64) {
        self.total_errors += 1;
        self.record_name(name_len);
    }

    fn record_name(&mut self, name_len: u64) {
        self.total_entries += 1;
        self.total_name_size += name_len;
    }

    pub fn avg_file_size(&self) -> u64 {
        average(self.total_file_size, self.total_files)
    }

    pub fn avg_symlink_size(&self) -> u64 {
        average(self.total_symlink_size, self.total_symlinks)
    }

    pub fn avg_name_size(&self) -> u64 {
        average(self.total_name_size, self.total_entries)
    }

    pub fn show(&self) {
        info!(
            files = self.total_files,
            dirs = self.total_dirs,
            symlinks = self.total_symlinks,
            errors = self.total_errors,
            file_bytes = self.total_file_size,
            avg_file_size = self.avg_file_size(),
            avg_name_size = self.avg_name_size(),
            "Namespace summary"
        );
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_averages() {
        let mut stats = FsStats::default();
        stats.record_root();
        stats.record_dir(4);
        stats.record_file(10, 100);
        stats.record_file(6, 51);
        stats.record_symlink(8, 30);

        assert_eq!(stats.total_dirs, 2);
        assert_eq!(stats.total_entries, 4);
        assert_eq!(stats.avg_file_size(), 75);
        assert_eq!(stats.avg_symlink_size(), 30);
        assert_eq!(stats.avg_name_size(), 7);
    }

    #[test]
    fn test_empty_averages_are_zero() {
        let stats = FsStats::default();
        assert_eq!(stats.avg_file_size(), 0);
        assert_eq!(stats.avg_name_size(), 0);
    }

    #[test]
    fn test_yaml_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.yaml");

        let mut stats = FsStats::default();
        stats.record_root();
        stats.record_file(5, 4096);
        stats.to_yaml_file(&path).unwrap();

        assert_eq!(FsStats::from_yaml_file(&path).unwrap(), stats);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let stats: FsStats = serde_yaml::from_str("total_files: 3\ntotal_dirs: 1\n").unwrap();
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_symlinks, 0);
    }
}
