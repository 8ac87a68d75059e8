//! Finalized, immutable form of a VOS tree
//!
//! Produced by the `dump()` methods in [`super::structures`]. These are plain
//! serde types, so a dump can be written as YAML/JSON for a report printer or
//! read back from a golden fixture.

use super::types::{Aligned, KeyType, Overhead, ValType};
use serde::{Deserialize, Serialize};

fn default_count() -> u64 {
    1
}

/// A dumped value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDump {
    pub size: u64,
    #[serde(default = "default_count")]
    pub count: u64,
    #[serde(default)]
    pub aligned: Aligned,
}

/// A dumped attribute key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AKeyDump {
    #[serde(default = "default_count")]
    pub count: u64,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    #[serde(default)]
    pub overhead: Overhead,
    pub value_type: ValType,
    /// Key length in bytes, hashed keys only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub values: Vec<ValueDump>,
}

/// A dumped distribution key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DKeyDump {
    #[serde(default = "default_count")]
    pub count: u64,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    #[serde(default)]
    pub overhead: Overhead,
    /// Key length in bytes, hashed keys only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub akeys: Vec<AKeyDump>,
}

/// A dumped object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDump {
    #[serde(default = "default_count")]
    pub count: u64,
    #[serde(default)]
    pub targets: u64,
    pub dkeys: Vec<DKeyDump>,
}

/// A dumped container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerDump {
    #[serde(default = "default_count")]
    pub count: u64,
    #[serde(default)]
    pub csum_size: u64,
    #[serde(default = "super::structures::default_csum_gran")]
    pub csum_gran: u64,
    pub objects: Vec<ObjectDump>,
}

/// A dumped pool: every container plus the number of VOS shards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainersDump {
    pub num_shards: u64,
    pub containers: Vec<ContainerDump>,
}

impl ContainersDump {
    pub fn to_yaml(&self) -> crate::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_yaml(s: &str) -> crate::Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }
}
