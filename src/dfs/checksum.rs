//! Container checksum types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Checksum algorithm enabled on a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumType {
    Crc16,
    Crc32,
    Adler32,
    Crc64,
    Sha1,
    Sha256,
    Sha512,
}

impl ChecksumType {
    /// Bytes stored per checksum
    pub fn csum_size(&self) -> u64 {
        match self {
            ChecksumType::Crc16 => 2,
            ChecksumType::Crc32 | ChecksumType::Adler32 => 4,
            ChecksumType::Crc64 => 8,
            ChecksumType::Sha1 => 20,
            ChecksumType::Sha256 => 32,
            ChecksumType::Sha512 => 64,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChecksumType::Crc16 => "crc16",
            ChecksumType::Crc32 => "crc32",
            ChecksumType::Adler32 => "adler32",
            ChecksumType::Crc64 => "crc64",
            ChecksumType::Sha1 => "sha1",
            ChecksumType::Sha256 => "sha256",
            ChecksumType::Sha512 => "sha512",
        }
    }
}

impl std::fmt::Display for ChecksumType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecksumType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "crc16" => Ok(ChecksumType::Crc16),
            "crc32" => Ok(ChecksumType::Crc32),
            "adler32" => Ok(ChecksumType::Adler32),
            "crc64" => Ok(ChecksumType::Crc64),
            "sha1" => Ok(ChecksumType::Sha1),
            "sha256" => Ok(ChecksumType::Sha256),
            "sha512" => Ok(ChecksumType::Sha512),
            _ => Err(Error::invalid(
                "checksum",
                format!("must be one of crc16, crc32, adler32, crc64, sha1, sha256, sha512, got {:?}", s),
            )),
        }
    }
}
