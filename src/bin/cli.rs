//! inodekv CLI
//!
//! Small debugging tool for inspecting and mutating an inode store from the
//! command line.

use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use inodekv::{open_store, Config, InodeRecord, InodeRef, Permissions, SyncStrategy};

/// inodekv CLI
#[derive(Parser, Debug)]
#[command(name = "inodekv-cli")]
#[command(about = "Inspect and mutate an inode metadata store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./inodekv_data")]
    data_dir: String,

    /// Backend to open ("embedded" or "memory")
    #[arg(short, long, default_value = "embedded")]
    backend: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the record for a (volume, inode) pair
    Get {
        /// Volume id
        volume: u64,

        /// Inode id
        inode: u64,
    },

    /// Write a record for a (volume, inode) pair
    Put {
        /// Volume id
        volume: u64,

        /// Inode id
        inode: u64,

        /// Logical file size in bytes
        #[arg(long, default_value = "0")]
        size: u64,

        /// Mode bits (octal)
        #[arg(long, default_value = "0644")]
        mode: String,

        /// Owner uid
        #[arg(long, default_value = "0")]
        uid: u32,

        /// Owner gid
        #[arg(long, default_value = "0")]
        gid: u32,
    },

    /// Delete the record for a (volume, inode) pair
    Del {
        /// Volume id
        volume: u64,

        /// Inode id
        inode: u64,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inodekv=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .backend(&args.backend)
        .sync_strategy(SyncStrategy::EveryCommit)
        .build();

    let store = match open_store(&config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = match args.command {
        Commands::Get { volume, inode } => {
            let r = InodeRef::new(volume, inode);
            store.get(r).map(|record| println!("{:#?}", record))
        }
        Commands::Put {
            volume,
            inode,
            size,
            mode,
            uid,
            gid,
        } => {
            let mode = match u32::from_str_radix(mode.trim_start_matches("0o"), 8) {
                Ok(m) => m,
                Err(e) => {
                    tracing::error!("Invalid mode {:?}: {}", mode, e);
                    std::process::exit(2);
                }
            };
            let now_ms = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default();
            let record = InodeRecord {
                volume,
                inode,
                size,
                permissions: Permissions { mode, uid, gid },
                created_ms: now_ms,
                modified_ms: now_ms,
                ..Default::default()
            };
            let r = InodeRef::new(volume, inode);
            store
                .write(r, &record)
                .and_then(|_| store.flush())
                .map(|_| println!("wrote {}", r))
        }
        Commands::Del { volume, inode } => {
            let r = InodeRef::new(volume, inode);
            store
                .delete(r)
                .and_then(|_| store.flush())
                .map(|_| println!("deleted {}", r))
        }
    };

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        let _ = store.close();
        std::process::exit(1);
    }

    if let Err(e) = store.close() {
        tracing::error!("Failed to close store: {}", e);
        std::process::exit(1);
    }
}
