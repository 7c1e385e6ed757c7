//! FreqCache demo - drives each cache variant through a fixed workload

mod report;

use anyhow::{ensure, Result};
use clap::{Parser, Subcommand};
use freqcache::{LruCache, RandomTable, SharedLfuCache};
use tracing::info;

use crate::report::{print_entries, print_samples};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill an LFU cache past capacity while re-reading a hot prefix
    Lfu {
        /// Cache capacity (number of items)
        #[arg(short, long, default_value_t = 100)]
        capacity: usize,

        /// Number of keys to insert
        #[arg(short, long, default_value_t = 1000)]
        keys: u64,

        /// Keys below this get one extra read right after insertion
        #[arg(long, default_value_t = 50)]
        hot: u64,
    },

    /// Fill an LRU cache while re-reading a key a fixed distance behind
    Lru {
        /// Cache capacity (number of items)
        #[arg(short, long, default_value_t = 100)]
        capacity: usize,

        /// Number of keys to insert
        #[arg(short, long, default_value_t = 2000)]
        keys: u64,

        /// Distance behind the newest key that is read back
        #[arg(long, default_value_t = 50)]
        lag: u64,
    },

    /// Sample a random table before and after deleting odd keys
    Random {
        /// Number of keys to insert
        #[arg(short, long, default_value_t = 100)]
        keys: u64,

        /// Samples drawn in each round
        #[arg(short, long, default_value_t = 50)]
        samples: usize,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!("Starting FreqCache demo v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Lfu {
            capacity,
            keys,
            hot,
        } => run_lfu(capacity, keys, hot),
        Command::Lru {
            capacity,
            keys,
            lag,
        } => run_lru(capacity, keys, lag),
        Command::Random { keys, samples } => run_random(keys, samples),
    }
}

fn run_lfu(capacity: usize, keys: u64, hot: u64) -> Result<()> {
    info!("LFU cache capacity: {}", capacity);
    info!("Inserting {} keys, {} hot", keys, hot);

    let cache = SharedLfuCache::new(capacity)?;
    for i in 0..keys {
        cache.put(i, format!("value{}", i));
        // The extra read keeps the hot keys from being evicted
        if i < hot {
            cache.get(&i);
        }
    }

    let entries = cache.with_cache(|inner| {
        let mut entries: Vec<_> = inner
            .iter()
            .map(|(k, v, _)| (*k, v.clone()))
            .collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    });
    print_entries(entries.iter().map(|(k, v)| (k, v)));

    info!("Entries kept: {}/{}", cache.len(), cache.capacity());
    info!("Stats: {}", cache.stats().snapshot());
    Ok(())
}

fn run_lru(capacity: usize, keys: u64, lag: u64) -> Result<()> {
    info!("LRU cache capacity: {}", capacity);
    info!("Inserting {} keys, reading back {} behind", keys, lag);

    let mut cache = LruCache::new(capacity)?;
    let mut hits = 0u64;
    for i in 0..keys {
        cache.put(i, format!("value{}", i));
        if let Some(behind) = i.checked_sub(lag) {
            if cache.get(&behind).is_some() {
                hits += 1;
            }
        }
    }

    print_entries(cache.iter());
    info!("Entries kept: {}/{}", cache.len(), cache.capacity());
    info!("Read-backs that hit: {}", hits);
    Ok(())
}

fn run_random(keys: u64, samples: usize) -> Result<()> {
    ensure!(keys > 0, "random table demo needs at least one key");

    let mut table = RandomTable::with_capacity(keys as usize);
    for i in 0..keys {
        table.insert(i, format!("value{}", i));
    }

    let mut rng = rand::thread_rng();
    print_samples("all keys", samples, || {
        table.random_with(&mut rng).map(|(_, v)| v.clone())
    });

    for i in (1..keys).step_by(2) {
        table.remove(&i);
    }
    info!("Deleted odd keys, {} left", table.len());

    print_samples("even keys", samples, || {
        table.random_with(&mut rng).map(|(_, v)| v.clone())
    });
    Ok(())
}
