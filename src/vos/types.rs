//! Tag types shared by every level of the VOS tree

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// Key Type
// =============================================================================

/// How a dkey or akey is addressed inside VOS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// Variable length key, stored hashed; its byte length counts toward capacity
    Hashed,
    /// Fixed width integer key
    Integer,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Hashed => "hashed",
            KeyType::Integer => "integer",
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hashed" => Ok(KeyType::Hashed),
            "integer" => Ok(KeyType::Integer),
            _ => Err(Error::invalid(
                "key_type",
                format!("must be of type KeyType (\"hashed\" | \"integer\"), got {:?}", s),
            )),
        }
    }
}

// =============================================================================
// Value Type
// =============================================================================

/// Shape of the values stored under an akey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValType {
    /// Single value, overwritten as a whole
    #[serde(rename = "single_value")]
    Single,
    /// Array value, stored as extents
    #[serde(rename = "array")]
    Array,
}

impl ValType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValType::Single => "single_value",
            ValType::Array => "array",
        }
    }
}

impl std::fmt::Display for ValType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single_value" => Ok(ValType::Single),
            "array" => Ok(ValType::Array),
            _ => Err(Error::invalid(
                "value_type",
                format!(
                    "must be of type ValType (\"single_value\" | \"array\"), got {:?}",
                    s
                ),
            )),
        }
    }
}

// =============================================================================
// Overhead
// =============================================================================

/// Whether a key accounts for file system metadata or user payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overhead {
    #[default]
    User,
    Meta,
}

impl Overhead {
    pub fn as_str(&self) -> &'static str {
        match self {
            Overhead::User => "user",
            Overhead::Meta => "meta",
        }
    }
}

impl std::fmt::Display for Overhead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Overhead {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(Overhead::User),
            "meta" => Ok(Overhead::Meta),
            _ => Err(Error::invalid(
                "overhead",
                format!("must be of type Overhead (\"user\" | \"meta\"), got {:?}", s),
            )),
        }
    }
}

// =============================================================================
// Alignment
// =============================================================================

/// Storage alignment flag of a value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aligned {
    #[default]
    Yes,
    No,
}

impl Aligned {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aligned::Yes => "Yes",
            Aligned::No => "No",
        }
    }
}

impl std::fmt::Display for Aligned {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aligned {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Yes" => Ok(Aligned::Yes),
            "No" => Ok(Aligned::No),
            _ => Err(Error::invalid(
                "aligned",
                format!("must be of type Aligned (\"Yes\" | \"No\"), got {:?}", s),
            )),
        }
    }
}
