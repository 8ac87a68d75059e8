//! Property-Based Tests for the DFS Layout
//!
//! Sweeps file sizes across chunk and stripe boundaries to check the EC
//! decomposition arithmetic.
//!
//! # Test Properties
//!
//! 1. **Conservation**: bytes stored in data dkeys equal payload + parity
//! 2. **Replication**: payload is exactly `size × replicas`, no parity
//! 3. **EC Ratio**: parity is `parity / stripe` of the erasure coded payload
//! 4. **Fallback**: EC below stripe granularity matches `p + 1` replication

#![cfg(test)]

use proptest::prelude::*;

use super::layout::{Dfs, LayoutConfig};
use super::oclass::ObjectClass;
use crate::vos::ObjectDump;

// =============================================================================
// Helpers
// =============================================================================

fn dfs(file_oclass: &str, config: LayoutConfig) -> Dfs {
    Dfs::new(ObjectClass::new("S1", file_oclass).unwrap(), config).unwrap()
}

/// Bytes held by the data dkeys of one file object
fn stored_bytes(dump: &ObjectDump) -> u64 {
    dump.dkeys[1..]
        .iter()
        .map(|d| {
            d.count
                * d.akeys
                    .iter()
                    .map(|a| a.count * a.values.iter().map(|v| v.size * v.count).sum::<u64>())
                    .sum::<u64>()
        })
        .sum()
}

// =============================================================================
// Property Strategies
// =============================================================================

/// Power-of-two sizes in [2^lo, 2^hi]
fn pow2_strategy(lo: u32, hi: u32) -> impl Strategy<Value = u64> {
    (lo..=hi).prop_map(|shift| 1u64 << shift)
}

fn replicated_class_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("SX"), Just("S4"), Just("RP_2G1"), Just("RP_3GX"), Just("RP_6G2")]
}

fn ec_class_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("EC_2P1G1"),
        Just("EC_4P2GX"),
        Just("EC_8P2G1"),
        Just("EC_16P2GX"),
        Just("EC_16P3G2")
    ]
}

fn config_strategy() -> impl Strategy<Value = LayoutConfig> {
    (pow2_strategy(12, 22), pow2_strategy(10, 24), pow2_strategy(10, 18)).prop_map(
        |(chunk_size, io_size, ec_cell_size)| LayoutConfig {
            chunk_size,
            io_size,
            ec_cell_size,
        },
    )
}

/// Sizes clustered around multiples of a boundary, plus arbitrary ones
fn file_size_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![
        (0u64..64, pow2_strategy(10, 22), -2i64..=2)
            .prop_map(|(k, unit, delta)| (k * unit).saturating_add_signed(delta)),
        0u64..50_000_000,
    ]
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: replication stores every byte `replicas` times and no parity.
    #[test]
    fn prop_replication_conserves_capacity(
        oclass in replicated_class_strategy(),
        config in config_strategy(),
        size in file_size_strategy(),
    ) {
        let dfs = dfs(oclass, config);
        let replicas = dfs.oclass().get_file_replicas();
        let layout = dfs.create_file_obj(size, 1)?;
        let dump = layout.object.dump()?;

        prop_assert_eq!(layout.cells.payload, size * replicas);
        prop_assert_eq!(layout.cells.parity, 0);
        prop_assert_eq!(stored_bytes(&dump), layout.cells.total());
    }

    /// Property: EC layouts store exactly payload + parity and keep the
    /// parity/data ratio of the class for the erasure coded part.
    #[test]
    fn prop_ec_conserves_capacity(
        oclass in ec_class_strategy(),
        config in config_strategy(),
        size in file_size_strategy(),
    ) {
        let dfs = dfs(oclass, config);
        let k = dfs.oclass().get_file_stripe();
        let p = dfs.oclass().get_file_parity();
        let layout = dfs.create_file_obj(size, 1)?;
        let dump = layout.object.dump()?;

        prop_assert_eq!(stored_bytes(&dump), layout.cells.total());

        // every parity byte protects k/p data bytes
        let ec_payload = layout.cells.parity / p * k;
        prop_assert_eq!(layout.cells.parity % (p * config.ec_cell_size), 0);

        // the rest of the payload is replicated p + 1 times
        let replicated = layout.cells.payload - ec_payload;
        prop_assert_eq!(replicated % (p + 1), 0);
        prop_assert_eq!(ec_payload + replicated / (p + 1), size);
    }

    /// Property: below one stripe per I/O, EC degenerates to p + 1 replicas.
    #[test]
    fn prop_ec_fallback_matches_replication(
        chunk_size in pow2_strategy(16, 22),
        size in file_size_strategy(),
    ) {
        let config = LayoutConfig {
            chunk_size,
            io_size: 65_536,
            ec_cell_size: 65_536,
        };
        let ec = dfs("EC_4P2G1", config).create_file_obj(size, 3)?;
        let rp = dfs("RP_3G1", config).create_file_obj(size, 3)?;

        prop_assert_eq!(ec.cells, rp.cells);
        prop_assert_eq!(ec.object.dump()?.dkeys, rp.object.dump()?.dkeys);
    }

    /// Property: dumping twice gives the same mapping.
    #[test]
    fn prop_dump_is_idempotent(
        oclass in prop_oneof![replicated_class_strategy(), ec_class_strategy()],
        size in file_size_strategy(),
    ) {
        let layout = dfs(oclass, LayoutConfig::default()).create_file_obj(size, 1)?;
        prop_assert_eq!(layout.object.dump()?, layout.object.dump()?);
    }
}
