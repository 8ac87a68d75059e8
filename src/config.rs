//! Estimator configuration
//!
//! Defaults, optionally overridden by a YAML file and then by CLI flags.

use crate::dfs::{
    default_inode_akey, ChecksumType, LayoutConfig, ObjectClass, DEFAULT_CHUNK_SIZE,
    DEFAULT_EC_CELL_SIZE, DEFAULT_INODE_SIZE, DEFAULT_IO_SIZE,
};
use crate::error::{Error, Result};
use crate::explorer::DEFAULT_NAME_SIZE;
use crate::vos::{AKey, DEFAULT_CSUM_GRAN, DEFAULT_NUM_SHARDS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every knob of an estimation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Object class of directories
    pub dir_oclass: String,

    /// Object class of files
    pub file_oclass: String,

    /// Bytes of file data per dkey
    pub chunk_size: u64,

    /// Bytes per update
    pub io_size: u64,

    /// Bytes per EC cell
    pub ec_cell_size: u64,

    /// Bytes of the DFS inode stored with every directory entry
    pub inode_size: u64,

    /// Entry name length assumed when none is known
    pub name_size: u64,

    /// Container checksum, none by default
    pub checksum: Option<ChecksumType>,

    /// Checksum granularity in bytes
    pub csum_gran: u64,

    /// VOS shards (targets) in the pool
    pub num_shards: u64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            dir_oclass: "S1".to_string(),
            file_oclass: "SX".to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            io_size: DEFAULT_IO_SIZE,
            ec_cell_size: DEFAULT_EC_CELL_SIZE,
            inode_size: DEFAULT_INODE_SIZE,
            name_size: DEFAULT_NAME_SIZE,
            checksum: None,
            csum_gran: DEFAULT_CSUM_GRAN,
            num_shards: DEFAULT_NUM_SHARDS,
        }
    }
}

impl EstimatorConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the layout meaningless
    pub fn validate(&self) -> Result<()> {
        self.layout().validate()?;
        self.object_class()?;

        for (name, value) in [
            ("inode_size", self.inode_size),
            ("name_size", self.name_size),
            ("csum_gran", self.csum_gran),
            ("num_shards", self.num_shards),
        ] {
            if value == 0 {
                return Err(Error::Config(format!("{} must be greater than 0", name)));
            }
        }
        Ok(())
    }

    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            chunk_size: self.chunk_size,
            io_size: self.io_size,
            ec_cell_size: self.ec_cell_size,
        }
    }

    pub fn object_class(&self) -> Result<ObjectClass> {
        ObjectClass::new(&self.dir_oclass, &self.file_oclass)
    }

    pub fn inode_akey(&self) -> Result<AKey> {
        default_inode_akey(self.inode_size)
    }
}
