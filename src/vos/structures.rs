//! VOS tree builders
//!
//! Each type here is the open, mutable stage of a VOS tree: children are
//! attached incrementally while a layout is computed, and `dump()` finalizes
//! the tree into its [`super::dump`] form. Empty child lists are accepted
//! while building and only rejected by `dump()`.
//!
//! Children are statically typed, so attaching the wrong kind of child does
//! not compile:
//!
//! ```compile_fail
//! use vos_estimator::vos::{AKey, ValType};
//!
//! let mut akey = AKey::builder().key("A-key 1").value_type(ValType::Single).build().unwrap();
//! akey.add_value("rubbish");
//! ```

use super::dump::{AKeyDump, ContainerDump, ContainersDump, DKeyDump, ObjectDump, ValueDump};
use super::types::{Aligned, KeyType, Overhead, ValType};
use crate::error::{Error, Result};

/// Default checksum granularity of a container, in bytes
pub const DEFAULT_CSUM_GRAN: u64 = 16384;

/// Default number of VOS shards a pool spans
pub const DEFAULT_NUM_SHARDS: u64 = 1000;

pub(crate) fn default_csum_gran() -> u64 {
    DEFAULT_CSUM_GRAN
}

// =============================================================================
// Key
// =============================================================================

/// Addressing of a dkey or akey
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Hashed key of `size` bytes
    Hashed { size: u64 },
    /// Integer key
    Integer,
}

impl Key {
    pub fn key_type(&self) -> KeyType {
        match self {
            Key::Hashed { .. } => KeyType::Hashed,
            Key::Integer => KeyType::Integer,
        }
    }

    /// Byte length stored for the key, hashed keys only
    pub fn size(&self) -> Option<u64> {
        match self {
            Key::Hashed { size } => Some(*size),
            Key::Integer => None,
        }
    }

    fn resolve(key_size: Option<u64>, key_type: Option<KeyType>) -> Result<Self> {
        match (key_type, key_size) {
            (None | Some(KeyType::Hashed), Some(0)) => {
                Err(Error::invalid("key", "must not be empty"))
            }
            (None | Some(KeyType::Hashed), Some(size)) => Ok(Key::Hashed { size }),
            (Some(KeyType::Hashed), None) => {
                Err(Error::invalid("key", "is required for hashed keys"))
            }
            (None | Some(KeyType::Integer), _) => Ok(Key::Integer),
        }
    }
}

// =============================================================================
// Value
// =============================================================================

/// A run of bytes stored under an akey
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    size: u64,
    count: u64,
    aligned: Aligned,
}

impl Value {
    /// Create a value of `size` bytes, stored once and aligned
    pub fn new(size: u64) -> Result<Self> {
        if size == 0 {
            return Err(Error::invalid("size", "must be greater than 0"));
        }
        Ok(Self {
            size,
            count: 1,
            aligned: Aligned::Yes,
        })
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn with_aligned(mut self, aligned: Aligned) -> Self {
        self.aligned = aligned;
        self
    }

    pub fn set_count(&mut self, count: u64) {
        self.count = count;
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn aligned(&self) -> Aligned {
        self.aligned
    }

    pub fn dump(&self) -> ValueDump {
        ValueDump {
            size: self.size,
            count: self.count,
            aligned: self.aligned,
        }
    }
}

// =============================================================================
// AKey
// =============================================================================

/// Attribute key: holds the values of one attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AKey {
    key: Key,
    overhead: Overhead,
    value_type: ValType,
    count: u64,
    values: Vec<Value>,
}

/// Builder for [`AKey`]
#[derive(Debug, Clone, Default)]
pub struct AKeyBuilder {
    key_size: Option<u64>,
    key_type: Option<KeyType>,
    overhead: Overhead,
    value_type: Option<ValType>,
    count: Option<u64>,
    values: Vec<Value>,
}

impl AKeyBuilder {
    /// Hashed key; its UTF-8 length is what VOS stores
    pub fn key(mut self, key: &str) -> Self {
        self.key_size = Some(key.len() as u64);
        self
    }

    /// Hashed key described only by its length
    pub fn key_len(mut self, len: u64) -> Self {
        self.key_size = Some(len);
        self
    }

    pub fn key_type(mut self, key_type: KeyType) -> Self {
        self.key_type = Some(key_type);
        self
    }

    pub fn overhead(mut self, overhead: Overhead) -> Self {
        self.overhead = overhead;
        self
    }

    pub fn value_type(mut self, value_type: ValType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn values(mut self, values: Vec<Value>) -> Self {
        self.values = values;
        self
    }

    pub fn build(self) -> Result<AKey> {
        let value_type = self
            .value_type
            .ok_or_else(|| Error::invalid("value_type", "is required"))?;
        let key = Key::resolve(self.key_size, self.key_type)?;

        Ok(AKey {
            key,
            overhead: self.overhead,
            value_type,
            count: self.count.unwrap_or(1),
            values: self.values,
        })
    }
}

impl AKey {
    pub fn builder() -> AKeyBuilder {
        AKeyBuilder::default()
    }

    pub fn add_value(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn set_count(&mut self, count: u64) {
        self.count = count;
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn overhead(&self) -> Overhead {
        self.overhead
    }

    pub fn value_type(&self) -> ValType {
        self.value_type
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn dump(&self) -> Result<AKeyDump> {
        if self.values.is_empty() {
            return Err(Error::EmptyList("values"));
        }

        Ok(AKeyDump {
            count: self.count,
            key_type: self.key.key_type(),
            overhead: self.overhead,
            value_type: self.value_type,
            size: self.key.size(),
            values: self.values.iter().map(Value::dump).collect(),
        })
    }
}

// =============================================================================
// DKey
// =============================================================================

/// Distribution key: holds the akeys stored together on one shard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DKey {
    key: Key,
    overhead: Overhead,
    count: u64,
    akeys: Vec<AKey>,
}

/// Builder for [`DKey`]
#[derive(Debug, Clone, Default)]
pub struct DKeyBuilder {
    key_size: Option<u64>,
    key_type: Option<KeyType>,
    overhead: Overhead,
    count: Option<u64>,
    akeys: Vec<AKey>,
}

impl DKeyBuilder {
    /// Hashed key; its UTF-8 length is what VOS stores
    pub fn key(mut self, key: &str) -> Self {
        self.key_size = Some(key.len() as u64);
        self
    }

    /// Hashed key described only by its length
    pub fn key_len(mut self, len: u64) -> Self {
        self.key_size = Some(len);
        self
    }

    pub fn key_type(mut self, key_type: KeyType) -> Self {
        self.key_type = Some(key_type);
        self
    }

    pub fn overhead(mut self, overhead: Overhead) -> Self {
        self.overhead = overhead;
        self
    }

    pub fn count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn akeys(mut self, akeys: Vec<AKey>) -> Self {
        self.akeys = akeys;
        self
    }

    pub fn build(self) -> Result<DKey> {
        let key = Key::resolve(self.key_size, self.key_type)?;

        Ok(DKey {
            key,
            overhead: self.overhead,
            count: self.count.unwrap_or(1),
            akeys: self.akeys,
        })
    }
}

impl DKey {
    pub fn builder() -> DKeyBuilder {
        DKeyBuilder::default()
    }

    pub fn add_value(&mut self, akey: AKey) {
        self.akeys.push(akey);
    }

    pub fn set_count(&mut self, count: u64) {
        self.count = count;
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn overhead(&self) -> Overhead {
        self.overhead
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn akeys(&self) -> &[AKey] {
        &self.akeys
    }

    pub fn dump(&self) -> Result<DKeyDump> {
        if self.akeys.is_empty() {
            return Err(Error::EmptyList("akeys"));
        }

        Ok(DKeyDump {
            count: self.count,
            key_type: self.key.key_type(),
            overhead: self.overhead,
            size: self.key.size(),
            akeys: self.akeys.iter().map(AKey::dump).collect::<Result<_>>()?,
        })
    }
}

// =============================================================================
// VosObject
// =============================================================================

/// A VOS object, standing for `count` identical objects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VosObject {
    count: u64,
    num_of_targets: u64,
    dkeys: Vec<DKey>,
}

impl VosObject {
    /// Empty object, count 1, spread over every target
    pub fn new() -> Self {
        Self {
            count: 1,
            num_of_targets: 0,
            dkeys: Vec::new(),
        }
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn with_targets(mut self, num_of_targets: u64) -> Self {
        self.num_of_targets = num_of_targets;
        self
    }

    pub fn with_dkeys(mut self, dkeys: Vec<DKey>) -> Self {
        self.dkeys = dkeys;
        self
    }

    pub fn add_value(&mut self, dkey: DKey) {
        self.dkeys.push(dkey);
    }

    pub fn set_count(&mut self, count: u64) {
        self.count = count;
    }

    pub fn set_num_of_targets(&mut self, num_of_targets: u64) {
        self.num_of_targets = num_of_targets;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn num_of_targets(&self) -> u64 {
        self.num_of_targets
    }

    pub fn dkeys(&self) -> &[DKey] {
        &self.dkeys
    }

    pub fn dump(&self) -> Result<ObjectDump> {
        if self.dkeys.is_empty() {
            return Err(Error::EmptyList("dkeys"));
        }

        Ok(ObjectDump {
            count: self.count,
            targets: self.num_of_targets,
            dkeys: self.dkeys.iter().map(DKey::dump).collect::<Result<_>>()?,
        })
    }
}

// =============================================================================
// Container
// =============================================================================

/// A container: the objects of one DFS namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    count: u64,
    csum_size: u64,
    csum_gran: u64,
    objects: Vec<VosObject>,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            count: 1,
            csum_size: 0,
            csum_gran: DEFAULT_CSUM_GRAN,
            objects: Vec::new(),
        }
    }
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_value(&mut self, object: VosObject) {
        self.objects.push(object);
    }

    pub fn set_count(&mut self, count: u64) {
        self.count = count;
    }

    pub fn set_csum_size(&mut self, csum_size: u64) {
        self.csum_size = csum_size;
    }

    pub fn set_csum_gran(&mut self, csum_gran: u64) {
        self.csum_gran = csum_gran;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn csum_size(&self) -> u64 {
        self.csum_size
    }

    pub fn csum_gran(&self) -> u64 {
        self.csum_gran
    }

    pub fn objects(&self) -> &[VosObject] {
        &self.objects
    }

    pub fn dump(&self) -> Result<ContainerDump> {
        if self.objects.is_empty() {
            return Err(Error::EmptyList("objects"));
        }

        Ok(ContainerDump {
            count: self.count,
            csum_size: self.csum_size,
            csum_gran: self.csum_gran,
            objects: self.objects.iter().map(VosObject::dump).collect::<Result<_>>()?,
        })
    }
}

// =============================================================================
// Containers
// =============================================================================

/// Every container of a pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Containers {
    num_shards: u64,
    containers: Vec<Container>,
}

impl Default for Containers {
    fn default() -> Self {
        Self {
            num_shards: DEFAULT_NUM_SHARDS,
            containers: Vec::new(),
        }
    }
}

impl Containers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_value(&mut self, container: Container) {
        self.containers.push(container);
    }

    pub fn set_num_shards(&mut self, num_shards: u64) {
        self.num_shards = num_shards;
    }

    pub fn num_shards(&self) -> u64 {
        self.num_shards
    }

    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    pub fn dump(&self) -> Result<ContainersDump> {
        if self.containers.is_empty() {
            return Err(Error::EmptyList("containers"));
        }

        Ok(ContainersDump {
            num_shards: self.num_shards,
            containers: self
                .containers
                .iter()
                .map(Container::dump)
                .collect::<Result<_>>()?,
        })
    }
}
