//! VOS Storage Estimator CLI
//!
//! Estimates the VOS layout of a DFS namespace and prints the container dump.
//!
//! ```text
//! vos-estimator explore /data/set --save-stats stats.yaml > layout.yaml
//! vos-estimator --file-oclass EC_16P2GX average --stats stats.yaml
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vos_estimator::dfs::ChecksumType;
use vos_estimator::{
    AverageFs, Containers, Dfs, EstimatorConfig, FileSystemExplorer, FsStats, TreeStats,
};

// =============================================================================
// CLI Arguments
// =============================================================================

/// VOS Storage Estimator - capacity planning for DAOS DFS containers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// YAML configuration file; flags below override its values
    #[arg(long, env = "VOS_ESTIMATOR_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Object class of directories
    #[arg(long, global = true)]
    dir_oclass: Option<String>,

    /// Object class of files
    #[arg(long, global = true)]
    file_oclass: Option<String>,

    /// Bytes of file data per dkey
    #[arg(long, global = true)]
    chunk_size: Option<u64>,

    /// Bytes per update
    #[arg(long, global = true)]
    io_size: Option<u64>,

    /// Bytes per EC cell
    #[arg(long, global = true)]
    ec_cell_size: Option<u64>,

    /// Bytes of the DFS inode
    #[arg(long, global = true)]
    inode_size: Option<u64>,

    /// Container checksum (crc16, crc32, adler32, crc64, sha1, sha256, sha512)
    #[arg(long, global = true)]
    checksum: Option<ChecksumType>,

    /// Checksum granularity in bytes
    #[arg(long, global = true)]
    csum_gran: Option<u64>,

    /// VOS shards in the pool
    #[arg(long, global = true)]
    num_shards: Option<u64>,

    /// Dump format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml, global = true)]
    format: OutputFormat,

    /// Write the dump to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Log cell and tree statistics
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON", global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk a directory tree
    Explore {
        /// Root of the tree
        path: PathBuf,

        /// Save the namespace statistics for a later `average` run
        #[arg(long)]
        save_stats: Option<PathBuf>,
    },

    /// Estimate from aggregate statistics of a tree
    Average {
        /// Statistics saved by `explore --save-stats`
        #[arg(long, conflicts_with_all = ["total_files", "total_dirs", "total_symlinks"])]
        stats: Option<PathBuf>,

        #[arg(long, default_value_t = 0)]
        total_files: u64,

        #[arg(long, default_value_t = 0)]
        avg_file_size: u64,

        #[arg(long, default_value_t = 1)]
        total_dirs: u64,

        #[arg(long, default_value_t = 0)]
        total_symlinks: u64,

        #[arg(long, default_value_t = 0)]
        avg_symlink_size: u64,

        /// Defaults to the configured name size
        #[arg(long)]
        avg_name_size: Option<u64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Yaml,
    Json,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(&args);

    let config = build_config(&args)?;
    let oclass = config.object_class()?;

    info!("Starting VOS storage estimator");
    info!("  Directory class: {}", config.dir_oclass);
    info!("  File class: {}", config.file_oclass);
    info!(
        "  Chunk size: {}, I/O size: {}, EC cell size: {}",
        config.chunk_size, config.io_size, config.ec_cell_size
    );

    let mut dfs = match &args.command {
        Command::Explore { path, save_stats } => {
            let mut fse = FileSystemExplorer::with_config(path, oclass, config.layout())?;
            fse.set_dfs_inode(config.inode_akey()?);
            fse.set_name_size(config.name_size);
            fse.explore()
                .with_context(|| format!("failed to explore {}", path.display()))?;

            if args.verbose {
                fse.stats().show();
            }
            if let Some(stats_path) = save_stats {
                fse.stats()
                    .to_yaml_file(stats_path)
                    .with_context(|| format!("failed to save {}", stats_path.display()))?;
                info!("Saved namespace statistics to {}", stats_path.display());
            }
            fse.into_dfs()
        }
        Command::Average {
            stats,
            total_files,
            avg_file_size,
            total_dirs,
            total_symlinks,
            avg_symlink_size,
            avg_name_size,
        } => {
            let mut afs = match stats {
                Some(stats_path) => {
                    let stats = FsStats::from_yaml_file(stats_path)
                        .with_context(|| format!("failed to load {}", stats_path.display()))?;
                    AverageFs::from_stats(oclass, config.layout(), &stats)?
                }
                None => {
                    let mut afs = AverageFs::with_config(oclass, config.layout())?;
                    afs.set_total_files(*total_files);
                    afs.set_avg_file_size(*avg_file_size);
                    afs.set_total_dirs(*total_dirs);
                    afs.set_total_symlinks(*total_symlinks);
                    afs.set_avg_symlink_size(*avg_symlink_size);
                    afs.set_avg_name_size(avg_name_size.unwrap_or(config.name_size));
                    afs
                }
            };
            afs.set_dfs_inode(config.inode_akey()?);
            afs.create()?;
            afs.into_dfs()
        }
    };

    finish(&args, &config, &mut dfs)
}

fn finish(args: &Args, config: &EstimatorConfig, dfs: &mut Dfs) -> anyhow::Result<()> {
    if let Some(checksum) = config.checksum {
        dfs.set_checksum(checksum, config.csum_gran)?;
    }
    dfs.add_superblock()?;

    if args.verbose {
        dfs.ec_stats().show();
    }

    let mut containers = Containers::new();
    containers.set_num_shards(config.num_shards);
    containers.add_value(dfs.get_container().clone());
    let dump = containers.dump()?;

    if args.verbose {
        info!("Tree stats: {}", TreeStats::from_containers(&dump));
    }

    let rendered = match args.format {
        OutputFormat::Yaml => dump.to_yaml()?,
        OutputFormat::Json => dump.to_json()?,
    };

    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", rendered),
    }
    Ok(())
}

// =============================================================================
// Configuration
// =============================================================================

fn build_config(args: &Args) -> anyhow::Result<EstimatorConfig> {
    let mut config = match &args.config {
        Some(path) => EstimatorConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EstimatorConfig::default(),
    };

    if let Some(dir_oclass) = &args.dir_oclass {
        config.dir_oclass = dir_oclass.clone();
    }
    if let Some(file_oclass) = &args.file_oclass {
        config.file_oclass = file_oclass.clone();
    }
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(io_size) = args.io_size {
        config.io_size = io_size;
    }
    if let Some(ec_cell_size) = args.ec_cell_size {
        config.ec_cell_size = ec_cell_size;
    }
    if let Some(inode_size) = args.inode_size {
        config.inode_size = inode_size;
    }
    if let Some(checksum) = args.checksum {
        config.checksum = Some(checksum);
    }
    if let Some(csum_gran) = args.csum_gran {
        config.csum_gran = csum_gran;
    }
    if let Some(num_shards) = args.num_shards {
        config.num_shards = num_shards;
    }

    config.validate()?;
    Ok(config)
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // stdout carries the dump
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
