//! Aggregate counts over a dumped VOS tree

use super::dump::{ContainerDump, ContainersDump};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Totals of a dumped tree, with every `count` multiplier applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub objects: u64,
    pub dkeys: u64,
    pub akeys: u64,
    pub values: u64,
    pub dkey_size: u64,
    pub akey_size: u64,
    pub value_size: u64,
}

impl TreeStats {
    /// Walk one container. A zero count prunes its whole subtree; totals
    /// saturate at `u64::MAX`.
    pub fn from_container(container: &ContainerDump) -> Self {
        let mut stats = Self::default();

        for object in &container.objects {
            let objects = object.count;
            if objects == 0 {
                continue;
            }
            stats.objects = stats.objects.saturating_add(objects);

            for dkey in &object.dkeys {
                let dkeys = objects.saturating_mul(dkey.count);
                if dkeys == 0 {
                    continue;
                }
                stats.dkeys = stats.dkeys.saturating_add(dkeys);
                stats.dkey_size = stats
                    .dkey_size
                    .saturating_add(dkey.size.unwrap_or(0).saturating_mul(dkeys));

                for akey in &dkey.akeys {
                    let akeys = dkeys.saturating_mul(akey.count);
                    if akeys == 0 {
                        continue;
                    }
                    stats.akeys = stats.akeys.saturating_add(akeys);
                    stats.akey_size = stats
                        .akey_size
                        .saturating_add(akey.size.unwrap_or(0).saturating_mul(akeys));

                    for value in &akey.values {
                        let values = akeys.saturating_mul(value.count);
                        stats.values = stats.values.saturating_add(values);
                        stats.value_size = stats
                            .value_size
                            .saturating_add(value.size.saturating_mul(values));
                    }
                }
            }
        }

        stats
    }

    /// Walk every container of a pool, weighting each by its own count
    pub fn from_containers(containers: &ContainersDump) -> Self {
        containers
            .containers
            .iter()
            .map(|c| Self::from_container(c).scaled(c.count))
            .fold(Self::default(), |acc, s| acc + s)
    }

    fn scaled(self, factor: u64) -> Self {
        Self {
            objects: self.objects.saturating_mul(factor),
            dkeys: self.dkeys.saturating_mul(factor),
            akeys: self.akeys.saturating_mul(factor),
            values: self.values.saturating_mul(factor),
            dkey_size: self.dkey_size.saturating_mul(factor),
            akey_size: self.akey_size.saturating_mul(factor),
            value_size: self.value_size.saturating_mul(factor),
        }
    }
}

impl Add for TreeStats {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for TreeStats {
    fn add_assign(&mut self, rhs: Self) {
        self.objects = self.objects.saturating_add(rhs.objects);
        self.dkeys = self.dkeys.saturating_add(rhs.dkeys);
        self.akeys = self.akeys.saturating_add(rhs.akeys);
        self.values = self.values.saturating_add(rhs.values);
        self.dkey_size = self.dkey_size.saturating_add(rhs.dkey_size);
        self.akey_size = self.akey_size.saturating_add(rhs.akey_size);
        self.value_size = self.value_size.saturating_add(rhs.value_size);
    }
}

impl std::fmt::Display for TreeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "objects={} dkeys={} akeys={} values={} dkey_size={} akey_size={} value_size={}",
            self.objects,
            self.dkeys,
            self.akeys,
            self.values,
            self.dkey_size,
            self.akey_size,
            self.value_size
        )
    }
}
