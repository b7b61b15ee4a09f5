//! Memocache demo
//!
//! Walks through the long-lived cache and the expiring cache, printing
//! results and final statistics.

use std::thread::sleep;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memocache::{Cache, CacheStats, TtlCache, TtlConfig};

fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memocache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = TtlConfig::from_env();
    info!(
        "Configuration loaded: sweep_interval={}ms, sweep_batch_size={}",
        config.sweep_interval.as_millis(),
        config.sweep_batch_size
    );

    long_lived_cache_demo()?;
    expiring_cache_demo(config)?;

    Ok(())
}

fn long_lived_cache_demo() -> anyhow::Result<()> {
    let cache: Cache<&str, i32> = Cache::new();

    cache.set("one", 1);
    cache.set("two", 2);
    cache.set("three", 3);

    report("value for key 'two'", cache.get("two"));
    report("popped value for key 'three'", cache.pop("three"));

    cache.remove("one");
    report("value for key 'one' after removal", cache.get("one"));

    print_stats("long-lived cache", &cache.stats())
}

fn expiring_cache_demo(config: TtlConfig) -> anyhow::Result<()> {
    let cache: TtlCache<&str, i32> =
        TtlCache::with_config(config).context("failed to build TTL cache")?;

    cache.set("one", 1, Duration::from_secs(5));
    cache.set("two", 2, Duration::from_secs(10));
    cache.set("three", 3, Duration::from_secs(15));

    report("value for key 'two'", cache.get("two"));

    info!("Waiting 7s for 'one' to expire");
    sleep(Duration::from_secs(7));

    report("value for key 'one'", cache.get("one"));
    report("popped value for key 'two'", cache.pop("two"));

    cache.remove("three");
    info!("Cache empty after removal: {}", cache.is_empty());

    print_stats("expiring cache", &cache.stats())?;
    cache.shutdown();
    Ok(())
}

fn report(label: &str, value: Option<i32>) {
    match value {
        Some(v) => println!("{}: {}", label, v),
        None => println!("{}: not found (absent or expired)", label),
    }
}

fn print_stats(name: &str, stats: &CacheStats) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(stats).context("failed to encode stats")?;
    println!("{} stats:\n{}", name, json);
    Ok(())
}
