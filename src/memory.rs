//! Process memory reporting.
//!
//! The spec's `memoryUsage` shape (`heapUsed`/`heapTotal`/`rss`) is inherited
//! from a JS runtime's `process.memoryUsage()`. Rust has no heap/total split
//! of that kind, so all three fields are populated from the process RSS read
//! from `/proc/self/status` on Linux (REDESIGN FLAG 2 in `SPEC_FULL.md`),
//! with a zeroed fallback elsewhere.

use serde::Serialize;
use std::fs;

#[derive(Debug, Clone, Copy, Serialize, utoipa::ToSchema)]
pub struct MemoryUsage {
    /// Resident set size, in bytes.
    pub rss: u64,
    #[serde(rename = "heapTotal")]
    pub heap_total: u64,
    #[serde(rename = "heapUsed")]
    pub heap_used: u64,
}

impl MemoryUsage {
    pub fn to_mb(self) -> MemoryUsageMb {
        const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
        MemoryUsageMb {
            rss: self.rss as f64 / BYTES_PER_MB,
            heap_total: self.heap_total as f64 / BYTES_PER_MB,
            heap_used: self.heap_used as f64 / BYTES_PER_MB,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, utoipa::ToSchema)]
pub struct MemoryUsageMb {
    pub rss: f64,
    #[serde(rename = "heapTotal")]
    pub heap_total: f64,
    #[serde(rename = "heapUsed")]
    pub heap_used: f64,
}

#[cfg(target_os = "linux")]
pub fn read_memory_usage() -> MemoryUsage {
    let rss = fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|status| {
            status.lines().find_map(|line| {
                line.strip_prefix("VmRSS:").map(|rest| {
                    rest.trim()
                        .trim_end_matches(" kB")
                        .trim()
                        .parse::<u64>()
                        .unwrap_or(0)
                        * 1024
                })
            })
        })
        .unwrap_or(0);

    MemoryUsage { rss, heap_total: rss, heap_used: rss }
}

#[cfg(not(target_os = "linux"))]
pub fn read_memory_usage() -> MemoryUsage {
    MemoryUsage { rss: 0, heap_total: 0, heap_used: 0 }
}
