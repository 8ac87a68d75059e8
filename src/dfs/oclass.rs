//! Object Class Policy
//!
//! Maps DAOS object class names to their redundancy and placement
//! parameters. Directory objects and file objects each get their own class.
//!
//! | Family          | Replicas | Parity | Stripe (data cells) |
//! |-----------------|----------|--------|---------------------|
//! | `S{n}` / `SX`   | 1        | 0      | 1                   |
//! | `RP_{r}G{g}`    | r        | 0      | 1                   |
//! | `EC_{k}P{p}G{g}`| 1        | p      | k                   |

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

// =============================================================================
// Parameters
// =============================================================================

/// Redundancy group count of a class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Groups {
    Fixed(u64),
    /// `GX`/`SX`: as many groups as the pool has targets
    Max,
}

/// Redundancy and placement of one object class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectClassParams {
    pub replicas: u64,
    pub parity: u64,
    pub stripe: u64,
    pub groups: Groups,
}

impl ObjectClassParams {
    pub fn is_erasure_coded(&self) -> bool {
        self.parity > 0
    }

    /// Copies kept of data that is replicated rather than erasure coded
    pub fn redundancy(&self) -> u64 {
        self.replicas + self.parity
    }

    /// Targets one object spans; 0 means every target of the pool
    pub fn targets(&self) -> u64 {
        match self.groups {
            Groups::Fixed(groups) => self.replicas * (self.stripe + self.parity) * groups,
            Groups::Max => 0,
        }
    }
}

// =============================================================================
// Class Table
// =============================================================================

const GROUPS: [(&str, Groups); 7] = [
    ("1", Groups::Fixed(1)),
    ("2", Groups::Fixed(2)),
    ("4", Groups::Fixed(4)),
    ("8", Groups::Fixed(8)),
    ("16", Groups::Fixed(16)),
    ("32", Groups::Fixed(32)),
    ("X", Groups::Max),
];
const REPLICAS: [u64; 10] = [2, 3, 4, 6, 8, 12, 16, 24, 32, 64];
const EC_DATA_CELLS: [u64; 4] = [2, 4, 8, 16];
const EC_PARITY_CELLS: [u64; 3] = [1, 2, 3];

static OBJECT_CLASSES: Lazy<HashMap<String, ObjectClassParams>> = Lazy::new(|| {
    let mut table = HashMap::new();

    for (suffix, groups) in GROUPS {
        table.insert(
            format!("S{}", suffix),
            ObjectClassParams {
                replicas: 1,
                parity: 0,
                stripe: 1,
                groups,
            },
        );

        for replicas in REPLICAS {
            table.insert(
                format!("RP_{}G{}", replicas, suffix),
                ObjectClassParams {
                    replicas,
                    parity: 0,
                    stripe: 1,
                    groups,
                },
            );
        }

        for data in EC_DATA_CELLS {
            for parity in EC_PARITY_CELLS {
                table.insert(
                    format!("EC_{}P{}G{}", data, parity, suffix),
                    ObjectClassParams {
                        replicas: 1,
                        parity,
                        stripe: data,
                        groups,
                    },
                );
            }
        }
    }

    table
});

/// Look up a class name in the table
pub fn lookup(name: &str) -> Result<ObjectClassParams> {
    OBJECT_CLASSES
        .get(name)
        .copied()
        .ok_or_else(|| Error::UnknownObjectClass(name.to_string()))
}

/// Every supported class name, sorted
pub fn supported_classes() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = OBJECT_CLASSES.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}

// =============================================================================
// Object Class Policy
// =============================================================================

/// Object classes used for DFS directories and files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectClass {
    dir_class: String,
    file_class: String,
    dir: ObjectClassParams,
    file: ObjectClassParams,
}

impl ObjectClass {
    /// Resolve both classes up front; an unknown name is fatal
    pub fn new(dir_oclass: &str, file_oclass: &str) -> Result<Self> {
        Ok(Self {
            dir: lookup(dir_oclass)?,
            file: lookup(file_oclass)?,
            dir_class: dir_oclass.to_string(),
            file_class: file_oclass.to_string(),
        })
    }

    pub fn dir_class(&self) -> &str {
        &self.dir_class
    }

    pub fn file_class(&self) -> &str {
        &self.file_class
    }

    pub fn dir_params(&self) -> ObjectClassParams {
        self.dir
    }

    pub fn file_params(&self) -> ObjectClassParams {
        self.file
    }

    pub fn get_file_replicas(&self) -> u64 {
        self.file.replicas
    }

    pub fn get_file_parity(&self) -> u64 {
        self.file.parity
    }

    pub fn get_file_stripe(&self) -> u64 {
        self.file.stripe
    }

    pub fn get_file_targets(&self) -> u64 {
        self.file.targets()
    }

    pub fn get_dir_replicas(&self) -> u64 {
        self.dir.replicas
    }

    pub fn get_dir_parity(&self) -> u64 {
        self.dir.parity
    }

    pub fn get_dir_stripe(&self) -> u64 {
        self.dir.stripe
    }

    pub fn get_dir_targets(&self) -> u64 {
        self.dir.targets()
    }
}
