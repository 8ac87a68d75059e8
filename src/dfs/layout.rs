//! DFS Layout Builder
//!
//! Computes the VOS objects DFS creates for files, directories and
//! symlinks. File data is split into chunks; each chunk is a dkey that is
//! either replicated or erasure coded depending on the file object class.
//!
//! ```text
//! file ──▶ [ dkey 0 | chunk × n | remainder ]
//!                      │             │
//!            replicated: r copies    r copies
//!            EC: stripes × (k+p) cells + tail × (p+1) copies
//! ```

use super::cell_stats::CellStats;
use super::checksum::ChecksumType;
use super::oclass::{ObjectClass, ObjectClassParams};
use crate::error::{Error, Result};
use crate::vos::{AKey, Container, DKey, KeyType, Overhead, ValType, Value, VosObject};
use tracing::{debug, instrument};

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_CHUNK_SIZE: u64 = 1_048_576;
pub const DEFAULT_IO_SIZE: u64 = 131_072;
pub const DEFAULT_EC_CELL_SIZE: u64 = 65_536;
pub const DEFAULT_INODE_SIZE: u64 = 64;

/// Size of the single value held by a file's dkey 0
pub const DKEY0_VALUE_SIZE: u64 = 64;

/// Superblock akeys and the size of their values
const SUPERBLOCK_AKEYS: [(&str, u64); 5] = [
    ("DFS_MAGIC", 8),
    ("DFS_SB_VERSION", 2),
    ("DFS_LAYOUT_VERSION", 2),
    ("DFS_CHUNK_SIZE", 8),
    ("DFS_OBJ_CLASS", 2),
];

// =============================================================================
// Configuration
// =============================================================================

/// Sizes that drive how file data is split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Bytes of file data per dkey
    pub chunk_size: u64,
    /// Bytes per update; array values are recorded at this granularity
    pub io_size: u64,
    /// Bytes per EC cell
    pub ec_cell_size: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            io_size: DEFAULT_IO_SIZE,
            ec_cell_size: DEFAULT_EC_CELL_SIZE,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        positive("chunk_size", self.chunk_size)?;
        positive("io_size", self.io_size)?;
        positive("ec_cell_size", self.ec_cell_size)
    }
}

fn positive(name: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(Error::Config(format!("{} must be greater than 0", name)));
    }
    Ok(())
}

fn overflow(what: &str) -> Error {
    Error::Config(format!("{} overflows u64", what))
}

fn mul(what: &str, a: u64, b: u64) -> Result<u64> {
    a.checked_mul(b).ok_or_else(|| overflow(what))
}

fn merge(a: CellStats, b: CellStats) -> Result<CellStats> {
    a.checked_add(b).ok_or_else(|| overflow("cell stats"))
}

// =============================================================================
// Builder Outputs
// =============================================================================

/// A file object and the bytes it stores
#[derive(Debug, Clone)]
pub struct FileLayout {
    pub object: VosObject,
    /// Payload/parity bytes of every identical file together
    pub cells: CellStats,
}

/// Entry dkeys of one directory, collected until the directory is finished
#[derive(Debug, Clone, Default)]
pub struct DirEntries {
    dkeys: Vec<DKey>,
}

impl DirEntries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.dkeys.is_empty()
    }

    /// Number of entries, honoring each entry's count
    pub fn len(&self) -> u64 {
        self.dkeys.iter().map(DKey::count).sum()
    }

    pub fn dkeys(&self) -> &[DKey] {
        &self.dkeys
    }
}

// =============================================================================
// DFS
// =============================================================================

/// Builds the container of one DFS namespace
#[derive(Debug, Clone)]
pub struct Dfs {
    oclass: ObjectClass,
    config: LayoutConfig,
    dfs_inode: AKey,
    dkey0: DKey,
    container: Container,
    ec_stats: CellStats,
}

impl Dfs {
    pub fn new(oclass: ObjectClass, config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        mul("stripe size", oclass.get_file_stripe(), config.ec_cell_size)?;

        Ok(Self {
            oclass,
            config,
            dfs_inode: default_inode_akey(DEFAULT_INODE_SIZE)?,
            dkey0: default_dkey0()?,
            container: Container::new(),
            ec_stats: CellStats::default(),
        })
    }

    pub fn oclass(&self) -> &ObjectClass {
        &self.oclass
    }

    pub fn config(&self) -> LayoutConfig {
        self.config
    }

    /// Replace the inode akey cloned into every directory entry
    pub fn set_dfs_inode(&mut self, akey: AKey) {
        self.dfs_inode = akey;
    }

    /// Replace the metadata dkey cloned into every file object
    pub fn set_dkey0(&mut self, dkey: DKey) {
        self.dkey0 = dkey;
    }

    pub fn set_chunk_size(&mut self, chunk_size: u64) -> Result<()> {
        positive("chunk_size", chunk_size)?;
        self.config.chunk_size = chunk_size;
        Ok(())
    }

    pub fn set_io_size(&mut self, io_size: u64) -> Result<()> {
        positive("io_size", io_size)?;
        self.config.io_size = io_size;
        Ok(())
    }

    pub fn set_ec_cell_size(&mut self, ec_cell_size: u64) -> Result<()> {
        positive("ec_cell_size", ec_cell_size)?;
        mul("stripe size", self.oclass.get_file_stripe(), ec_cell_size)?;
        self.config.ec_cell_size = ec_cell_size;
        Ok(())
    }

    pub fn set_checksum(&mut self, checksum: ChecksumType, csum_gran: u64) -> Result<()> {
        positive("csum_gran", csum_gran)?;
        self.container.set_csum_size(checksum.csum_size());
        self.container.set_csum_gran(csum_gran);
        Ok(())
    }

    pub fn get_container(&self) -> &Container {
        &self.container
    }

    pub fn into_container(self) -> Container {
        self.container
    }

    /// Payload/parity bytes of every file added so far
    pub fn ec_stats(&self) -> CellStats {
        self.ec_stats
    }

    // =========================================================================
    // Files
    // =========================================================================

    /// Layout of `identical_files` files of `file_size` bytes each
    #[instrument(level = "trace", skip(self))]
    pub fn create_file_obj(&self, file_size: u64, identical_files: u64) -> Result<FileLayout> {
        let params = self.oclass.file_params();
        let chunks = file_size / self.config.chunk_size;
        let remainder = file_size % self.config.chunk_size;

        let mut object = VosObject::new()
            .with_count(identical_files)
            .with_targets(params.targets());

        let mut dkey0 = self.dkey0.clone();
        dkey0.set_count(params.redundancy());
        object.add_value(dkey0);

        let cells = if params.is_erasure_coded() {
            let stripe_size = mul("stripe size", params.stripe, self.config.ec_cell_size)?;
            if self.config.io_size < stripe_size {
                debug!(
                    io_size = self.config.io_size,
                    stripe_size, "I/O size below one stripe, replicating EC file data"
                );
                self.add_replicated_chunks(&mut object, chunks, remainder, params.parity + 1)?
            } else {
                self.add_ec_chunks(&mut object, chunks, remainder, params)?
            }
        } else {
            self.add_replicated_chunks(&mut object, chunks, remainder, params.replicas)?
        };

        let cells = cells
            .checked_mul(identical_files)
            .ok_or_else(|| overflow("cell stats"))?;
        Ok(FileLayout { object, cells })
    }

    fn add_replicated_chunks(
        &self,
        object: &mut VosObject,
        chunks: u64,
        remainder: u64,
        copies: u64,
    ) -> Result<CellStats> {
        let mut cells = CellStats::default();
        if chunks > 0 {
            let more = self.add_replicated(object, self.config.chunk_size, chunks, copies)?;
            cells = merge(cells, more)?;
        }
        if remainder > 0 {
            let more = self.add_replicated(object, remainder, 1, copies)?;
            cells = merge(cells, more)?;
        }
        Ok(cells)
    }

    fn add_ec_chunks(
        &self,
        object: &mut VosObject,
        chunks: u64,
        remainder: u64,
        params: ObjectClassParams,
    ) -> Result<CellStats> {
        let mut cells = CellStats::default();
        if chunks > 0 {
            let more = self.add_ec_extent(object, self.config.chunk_size, chunks, params)?;
            cells = merge(cells, more)?;
        }
        if remainder > 0 {
            let more = self.add_ec_extent(object, remainder, 1, params)?;
            cells = merge(cells, more)?;
        }
        Ok(cells)
    }

    /// `weight` runs of `len` bytes, each copied `copies` times
    fn add_replicated(
        &self,
        object: &mut VosObject,
        len: u64,
        weight: u64,
        copies: u64,
    ) -> Result<CellStats> {
        let dkeys = mul("dkey count", weight, copies)?;
        let payload = mul("payload", len, dkeys)?;

        let akey = self.data_akey(len)?;
        object.add_value(data_dkey(akey, dkeys)?);
        Ok(CellStats::new(payload, 0))
    }

    /// `weight` chunks of `len` bytes: full stripes are erasure coded, the
    /// tail of each chunk is replicated. Stripes never span two chunks.
    fn add_ec_extent(
        &self,
        object: &mut VosObject,
        len: u64,
        weight: u64,
        params: ObjectClassParams,
    ) -> Result<CellStats> {
        let cell = self.config.ec_cell_size;
        let stripe_size = mul("stripe size", params.stripe, cell)?;
        let stripes = len / stripe_size;
        let tail = len % stripe_size;

        let mut cells = CellStats::default();
        if stripes > 0 {
            let dkeys = mul("dkey count", weight, params.stripe + params.parity)?;
            let stripe_cells = mul("stripe count", weight, stripes)?;
            let payload = mul("payload", stripe_cells, stripe_size)?;
            let parity = mul("parity", mul("parity", stripe_cells, params.parity)?, cell)?;

            let akey = AKey::builder()
                .key_type(KeyType::Integer)
                .value_type(ValType::Array)
                .values(vec![Value::new(cell)?.with_count(stripes)])
                .build()?;
            object.add_value(data_dkey(akey, dkeys)?);
            cells = merge(cells, CellStats::new(payload, parity))?;
        }
        if tail > 0 {
            let more = self.add_replicated(object, tail, weight, params.parity + 1)?;
            cells = merge(cells, more)?;
        }
        Ok(cells)
    }

    /// Array akey holding `len` bytes written in `io_size` updates
    fn data_akey(&self, len: u64) -> Result<AKey> {
        let io_size = self.config.io_size;
        let mut akey = AKey::builder()
            .key_type(KeyType::Integer)
            .value_type(ValType::Array)
            .build()?;

        let full = len / io_size;
        let rest = len % io_size;
        if full > 0 {
            akey.add_value(Value::new(io_size)?.with_count(full));
        }
        if rest > 0 {
            akey.add_value(Value::new(rest)?);
        }
        Ok(akey)
    }

    /// Push a file layout into the container and merge its cell stats
    pub fn add_file_object(&mut self, file_size: u64, identical_files: u64) -> Result<()> {
        if identical_files == 0 {
            return Ok(());
        }
        let layout = self.create_file_obj(file_size, identical_files)?;
        self.ec_stats = merge(self.ec_stats, layout.cells)?;
        self.container.add_value(layout.object);
        Ok(())
    }

    // =========================================================================
    // Directories
    // =========================================================================

    /// Object for `identical_dirs` directories with these entries, or
    /// `None` when there are no entries to store
    pub fn create_dir_obj(
        &self,
        entries: DirEntries,
        identical_dirs: u64,
    ) -> Result<Option<VosObject>> {
        if entries.is_empty() || identical_dirs == 0 {
            return Ok(None);
        }

        let params = self.oclass.dir_params();
        let count = mul("directory count", identical_dirs, params.redundancy())?;
        Ok(Some(
            VosObject::new()
                .with_count(count)
                .with_targets(params.targets())
                .with_dkeys(entries.dkeys),
        ))
    }

    /// Store a finished directory in the container
    pub fn finish_dir(&mut self, entries: DirEntries, identical_dirs: u64) -> Result<()> {
        if let Some(object) = self.create_dir_obj(entries, identical_dirs)? {
            self.container.add_value(object);
        }
        Ok(())
    }

    fn entry_dkey(&self, name_len: u64, count: u64, inode: AKey) -> Result<DKey> {
        DKey::builder()
            .key_len(name_len)
            .overhead(Overhead::Meta)
            .count(count)
            .akeys(vec![inode])
            .build()
    }

    /// Directory entry for `count` files, without their data objects
    pub fn add_file_entry(&self, dir: &mut DirEntries, name_len: u64, count: u64) -> Result<()> {
        let dkey = self.entry_dkey(name_len, count, self.dfs_inode.clone())?;
        dir.dkeys.push(dkey);
        Ok(())
    }

    /// Directory entry plus data object for `count` identical files
    pub fn add_file(
        &mut self,
        dir: &mut DirEntries,
        name_len: u64,
        file_size: u64,
        count: u64,
    ) -> Result<()> {
        self.add_file_entry(dir, name_len, count)?;
        self.add_file_object(file_size, count)
    }

    pub fn add_dir(&self, dir: &mut DirEntries, name_len: u64, count: u64) -> Result<()> {
        let dkey = self.entry_dkey(name_len, count, self.dfs_inode.clone())?;
        dir.dkeys.push(dkey);
        Ok(())
    }

    /// Symlink entry; the link target is stored with the inode
    pub fn add_symlink(
        &self,
        dir: &mut DirEntries,
        name_len: u64,
        target_len: u64,
        count: u64,
    ) -> Result<()> {
        let mut inode = self.dfs_inode.clone();
        if target_len > 0 {
            inode.add_value(Value::new(target_len)?);
        }
        let dkey = self.entry_dkey(name_len, count, inode)?;
        dir.dkeys.push(dkey);
        Ok(())
    }

    /// Placeholder entry for something that could not be inspected
    pub fn add_error(&self, dir: &mut DirEntries, name_len: u64) -> Result<()> {
        let dkey = self.entry_dkey(name_len, 1, self.dfs_inode.clone())?;
        dir.dkeys.push(dkey);
        Ok(())
    }

    // =========================================================================
    // Superblock
    // =========================================================================

    /// The DFS superblock object: namespace metadata plus the root inode.
    /// A single object on the default target, whatever the object classes.
    pub fn superblock_object(&self) -> Result<VosObject> {
        let mut sb = DKey::builder()
            .key("DFS_SB_METADATA")
            .overhead(Overhead::Meta)
            .build()?;
        for (key, size) in SUPERBLOCK_AKEYS {
            sb.add_value(
                AKey::builder()
                    .key(key)
                    .overhead(Overhead::Meta)
                    .value_type(ValType::Single)
                    .values(vec![Value::new(size)?])
                    .build()?,
            );
        }

        let root = DKey::builder()
            .key("/")
            .akeys(vec![self.dfs_inode.clone()])
            .build()?;

        Ok(VosObject::new().with_dkeys(vec![sb, root]))
    }

    pub fn add_superblock(&mut self) -> Result<()> {
        let object = self.superblock_object()?;
        self.container.add_value(object);
        Ok(())
    }
}

/// Inode akey: one array value of `inode_size` bytes
pub fn default_inode_akey(inode_size: u64) -> Result<AKey> {
    AKey::builder()
        .key("DFS_INODE")
        .overhead(Overhead::Meta)
        .value_type(ValType::Array)
        .values(vec![Value::new(inode_size)?])
        .build()
}

fn default_dkey0() -> Result<DKey> {
    let akey = AKey::builder()
        .key_type(KeyType::Integer)
        .overhead(Overhead::Meta)
        .value_type(ValType::Single)
        .values(vec![Value::new(DKEY0_VALUE_SIZE)?])
        .build()?;

    DKey::builder()
        .key_type(KeyType::Integer)
        .overhead(Overhead::Meta)
        .akeys(vec![akey])
        .build()
}

fn data_dkey(akey: AKey, count: u64) -> Result<DKey> {
    DKey::builder()
        .key_type(KeyType::Integer)
        .count(count)
        .akeys(vec![akey])
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vos::{DKeyDump, ObjectDump};
    use assert_matches::assert_matches;

    const MIB: u64 = 1_048_576;

    fn dfs(file_oclass: &str) -> Dfs {
        Dfs::new(ObjectClass::new("S1", file_oclass).unwrap(), LayoutConfig::default()).unwrap()
    }

    /// Data dkeys of a dumped file object (dkey 0 is first)
    fn data_dkeys(dump: &ObjectDump) -> &[DKeyDump] {
        &dump.dkeys[1..]
    }

    fn dkey_bytes(dkey: &DKeyDump) -> u64 {
        dkey.akeys
            .iter()
            .flat_map(|a| a.values.iter().map(move |v| a.count * v.size * v.count))
            .sum::<u64>()
            * dkey.count
    }

    fn stored_bytes(dump: &ObjectDump) -> u64 {
        data_dkeys(dump).iter().map(dkey_bytes).sum()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    #[test]
    fn test_layout_config_validation() {
        let config = LayoutConfig {
            io_size: 0,
            ..Default::default()
        };
        let err = Dfs::new(ObjectClass::new("S1", "SX").unwrap(), config).unwrap_err();
        assert_matches!(err, Error::Config(msg) if msg.contains("io_size"));

        let mut dfs = dfs("SX");
        assert!(dfs.set_chunk_size(0).is_err());
        assert!(dfs.set_ec_cell_size(0).is_err());
        dfs.set_chunk_size(4096).unwrap();
        assert_eq!(dfs.config().chunk_size, 4096);
    }

    // =========================================================================
    // Replication
    // =========================================================================

    #[test]
    fn test_zero_byte_file_only_dkey0() {
        let layout = dfs("SX").create_file_obj(0, 1).unwrap();
        let dump = layout.object.dump().unwrap();

        assert_eq!(dump.dkeys.len(), 1);
        assert_eq!(dump.dkeys[0].overhead, Overhead::Meta);
        assert_eq!(layout.cells, CellStats::default());
    }

    #[test]
    fn test_exactly_one_chunk() {
        let layout = dfs("SX").create_file_obj(MIB, 1).unwrap();
        let dump = layout.object.dump().unwrap();

        let data = data_dkeys(&dump);
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].count, 1);
        assert_eq!(data[0].akeys[0].values[0].size, DEFAULT_IO_SIZE);
        assert_eq!(data[0].akeys[0].values[0].count, 8);
    }

    #[test]
    fn test_driver_bin_sx() {
        let layout = dfs("SX").create_file_obj(5_767_168, 1).unwrap();
        let dump = layout.object.dump().unwrap();

        assert_eq!(dump.count, 1);
        assert_eq!(dump.targets, 0);

        let data = data_dkeys(&dump);
        assert_eq!(data.len(), 2);

        // five full chunks
        assert_eq!(data[0].count, 5);
        assert_eq!(dkey_bytes(&data[0]), 5 * MIB);

        // 458752 remainder = 3 × 128 KiB + 64 KiB
        assert_eq!(data[1].count, 1);
        assert_eq!(dkey_bytes(&data[1]), 458_752);
        let values = &data[1].akeys[0].values;
        assert_eq!((values[0].size, values[0].count), (131_072, 3));
        assert_eq!((values[1].size, values[1].count), (65_536, 1));

        assert_eq!(layout.cells, CellStats::new(5_767_168, 0));
    }

    #[test]
    fn test_replicas_multiply_dkeys() {
        let layout = dfs("RP_3GX").create_file_obj(2 * MIB + 10, 1).unwrap();
        let dump = layout.object.dump().unwrap();

        assert_eq!(dump.dkeys[0].count, 3);
        assert_eq!(data_dkeys(&dump)[0].count, 6);
        assert_eq!(data_dkeys(&dump)[1].count, 3);
        assert_eq!(stored_bytes(&dump), (2 * MIB + 10) * 3);
        assert_eq!(layout.cells.parity, 0);
    }

    #[test]
    fn test_identical_files_scale_cells_not_tree() {
        let single = dfs("RP_2G1").create_file_obj(3 * MIB, 1).unwrap();
        let many = dfs("RP_2G1").create_file_obj(3 * MIB, 10).unwrap();

        assert_eq!(many.object.count(), 10);
        assert_eq!(many.cells, single.cells * 10);
        assert_eq!(
            many.object.dump().unwrap().dkeys,
            single.object.dump().unwrap().dkeys
        );
    }

    // =========================================================================
    // Erasure Coding
    // =========================================================================

    #[test]
    fn test_ec_falls_back_below_stripe() {
        // 16 × 64 KiB stripe is larger than a 128 KiB I/O
        let ec = dfs("EC_16P2GX").create_file_obj(5_767_168, 1).unwrap();
        let rp = dfs("RP_3GX").create_file_obj(5_767_168, 1).unwrap();

        assert_eq!(ec.cells, rp.cells);
        assert_eq!(ec.cells.parity, 0);
        assert_eq!(
            ec.object.dump().unwrap().dkeys,
            rp.object.dump().unwrap().dkeys
        );
    }

    #[test]
    fn test_ec_full_stripes() {
        let mut dfs = dfs("EC_4P2G1");
        dfs.set_io_size(MIB).unwrap();

        // 4 × 64 KiB = 256 KiB stripe, 4 stripes per chunk
        let layout = dfs.create_file_obj(2 * MIB, 1).unwrap();
        let dump = layout.object.dump().unwrap();

        let data = data_dkeys(&dump);
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].count, 2 * 6);
        assert_eq!(data[0].akeys[0].values[0].size, 65_536);
        assert_eq!(data[0].akeys[0].values[0].count, 4);

        assert_eq!(layout.cells.payload, 2 * MIB);
        assert_eq!(layout.cells.parity, MIB);
        assert_eq!(dump.targets, 6);
        assert_eq!(dump.dkeys[0].count, 3);
    }

    #[test]
    fn test_ec_partial_chunk_tail_replicated() {
        let mut dfs = dfs("EC_4P2G1");
        dfs.set_io_size(MIB).unwrap();

        // partial chunk: one 256 KiB stripe plus a 1000 byte tail
        let size = MIB + 262_144 + 1000;
        let layout = dfs.create_file_obj(size, 1).unwrap();
        let dump = layout.object.dump().unwrap();

        let data = data_dkeys(&dump);
        assert_eq!(data.len(), 3);
        assert_eq!(data[1].count, 6);
        assert_eq!(data[1].akeys[0].values[0].count, 1);
        assert_eq!(data[2].count, 3);
        assert_eq!(dkey_bytes(&data[2]), 3000);

        assert_eq!(layout.cells.payload, 4 * 262_144 + 262_144 + 3000);
        assert_eq!(layout.cells.parity, (4 + 1) * 2 * 65_536);
        assert_eq!(stored_bytes(&dump), layout.cells.total());
    }

    #[test]
    fn test_ec_stripe_larger_than_chunk_is_replicated() {
        let mut dfs = dfs("EC_16P2G1");
        dfs.set_io_size(4 * MIB).unwrap();
        dfs.set_ec_cell_size(131_072).unwrap();

        let layout = dfs.create_file_obj(3 * MIB, 1).unwrap();
        assert_eq!(layout.cells, CellStats::new(9 * MIB, 0));
    }

    // =========================================================================
    // Directories
    // =========================================================================

    #[test]
    fn test_empty_dir_has_no_object() {
        let dfs = dfs("SX");
        assert!(dfs.create_dir_obj(DirEntries::new(), 1).unwrap().is_none());
    }

    #[test]
    fn test_dir_object_uses_dir_class() {
        let dfs = Dfs::new(
            ObjectClass::new("EC_2P1G1", "SX").unwrap(),
            LayoutConfig::default(),
        )
        .unwrap();

        let mut entries = DirEntries::new();
        dfs.add_dir(&mut entries, 4, 1).unwrap();
        dfs.add_symlink(&mut entries, 5, 20, 2).unwrap();
        assert_eq!(entries.len(), 3);

        let object = dfs.create_dir_obj(entries, 10).unwrap().unwrap();
        let dump = object.dump().unwrap();
        assert_eq!(dump.count, 20);
        assert_eq!(dump.targets, 3);
        assert_eq!(dump.dkeys[0].size, Some(4));
        assert_eq!(dump.dkeys[1].count, 2);
        assert_eq!(dump.dkeys[1].akeys[0].values.len(), 2);
        assert_eq!(dump.dkeys[1].akeys[0].values[1].size, 20);
    }

    #[test]
    fn test_add_file_merges_stats() {
        let mut dfs = dfs("RP_2G1");
        let mut root = DirEntries::new();
        dfs.add_file(&mut root, 8, MIB, 1).unwrap();
        dfs.add_file(&mut root, 8, 100, 1).unwrap();
        dfs.finish_dir(root, 1).unwrap();

        assert_eq!(dfs.ec_stats(), CellStats::new(2 * (MIB + 100), 0));
        assert_eq!(dfs.get_container().objects().len(), 3);
    }

    #[test]
    fn test_inode_template_not_shared() {
        let mut dfs = dfs("SX");
        let mut entries = DirEntries::new();
        dfs.add_symlink(&mut entries, 3, 9, 1).unwrap();
        dfs.add_dir(&mut entries, 3, 1).unwrap();

        assert_eq!(entries.dkeys()[0].akeys()[0].values().len(), 2);
        assert_eq!(entries.dkeys()[1].akeys()[0].values().len(), 1);

        dfs.set_dfs_inode(default_inode_akey(128).unwrap());
        dfs.add_dir(&mut entries, 3, 1).unwrap();
        assert_eq!(entries.dkeys()[1].akeys()[0].values()[0].size(), 64);
        assert_eq!(entries.dkeys()[2].akeys()[0].values()[0].size(), 128);
    }

    #[test]
    fn test_superblock_and_checksum() {
        let mut dfs = Dfs::new(
            ObjectClass::new("RP_3G1", "SX").unwrap(),
            LayoutConfig::default(),
        )
        .unwrap();
        dfs.set_checksum(ChecksumType::Crc32, 32_768).unwrap();
        dfs.add_superblock().unwrap();

        let dump = dfs.get_container().dump().unwrap();
        assert_eq!(dump.csum_size, 4);
        assert_eq!(dump.csum_gran, 32_768);

        let sb = &dump.objects[0];
        assert_eq!((sb.count, sb.targets), (1, 0));
        assert_eq!(sb.dkeys.len(), 2);
        assert_eq!(sb.dkeys[0].akeys.len(), 5);
        assert_eq!(sb.dkeys[0].size, Some(15));
        assert_eq!(sb.dkeys[0].overhead, Overhead::Meta);
        assert_eq!(sb.dkeys[1].size, Some(1));
        assert_eq!(sb.dkeys[1].overhead, Overhead::User);
        assert_eq!(sb.dkeys[1].akeys[0].overhead, Overhead::Meta);
    }

    #[test]
    fn test_dkey0_template_replaced() {
        let mut dfs = dfs("RP_2G1");
        let akey = AKey::builder()
            .key("DFS_SIZE")
            .overhead(Overhead::Meta)
            .value_type(ValType::Single)
            .values(vec![Value::new(16).unwrap()])
            .build()
            .unwrap();
        dfs.set_dkey0(
            DKey::builder()
                .key_type(KeyType::Integer)
                .overhead(Overhead::Meta)
                .akeys(vec![akey])
                .build()
                .unwrap(),
        );

        let dump = dfs.create_file_obj(100, 1).unwrap().object.dump().unwrap();
        let dkey0 = &dump.dkeys[0];
        assert_eq!(dkey0.count, 2);
        assert_eq!(dkey0.akeys[0].size, Some(8));
        assert_eq!(dkey0.akeys[0].values[0].size, 16);

        // data is untouched by the template
        assert_eq!(stored_bytes(&dump), 200);
    }

    // =========================================================================
    // Overflow
    // =========================================================================

    #[test]
    fn test_oversized_ec_cell_rejected() {
        let mut ec = dfs("EC_16P2G1");
        let err = ec.set_ec_cell_size(1 << 60).unwrap_err();
        assert_matches!(err, Error::Config(msg) if msg.contains("stripe size"));
        assert_eq!(ec.config().ec_cell_size, DEFAULT_EC_CELL_SIZE);

        let config = LayoutConfig {
            ec_cell_size: 1 << 60,
            ..Default::default()
        };
        let oclass = ObjectClass::new("S1", "EC_16P2G1").unwrap();
        assert_matches!(Dfs::new(oclass, config), Err(Error::Config(_)));

        // a single-stripe class can still use a huge cell
        let mut sx = dfs("SX");
        sx.set_ec_cell_size(1 << 60).unwrap();
        sx.create_file_obj(4096, 1).unwrap();
    }

    #[test]
    fn test_cell_stats_overflow_is_error() {
        let err = dfs("RP_3G1").create_file_obj(1 << 40, 1 << 23).unwrap_err();
        assert_matches!(err, Error::Config(msg) if msg.contains("overflows"));

        let mut dfs = dfs("SX");
        dfs.add_file_object(1 << 63, 1).unwrap();
        assert_matches!(dfs.add_file_object(1 << 63, 1), Err(Error::Config(_)));
        // the failed file is not half-added
        assert_eq!(dfs.get_container().objects().len(), 1);
        assert_eq!(dfs.ec_stats(), CellStats::new(1 << 63, 0));
    }

    #[test]
    fn test_directory_count_overflow_is_error() {
        let dfs = Dfs::new(
            ObjectClass::new("RP_2G1", "SX").unwrap(),
            LayoutConfig::default(),
        )
        .unwrap();
        let mut entries = DirEntries::new();
        dfs.add_dir(&mut entries, 4, 1).unwrap();

        assert_matches!(dfs.create_dir_obj(entries, u64::MAX), Err(Error::Config(_)));
    }
}
