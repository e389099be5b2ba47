//! Round-robin proxy pool
//!
//! Built once at startup from the proxy list file; read-only afterwards.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::error::{RestockError, Result};
use crate::models::ProxyEntry;

/// Ordered pool of upstream proxies, selected round-robin
///
/// Uses atomic operations for lock-free index tracking.
pub struct ProxyPool {
    entries: Vec<ProxyEntry>,
    index: AtomicUsize,
}

impl ProxyPool {
    /// Build a pool from raw `host:port:user:pass` lines.
    ///
    /// Malformed lines are dropped individually; a pool with zero valid
    /// entries is a startup error.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        for line in lines {
            let line = line.as_ref();
            match line.parse::<ProxyEntry>() {
                Ok(entry) => entries.push(entry),
                Err(_) => {
                    if !line.trim().is_empty() {
                        debug!("Skipping malformed proxy line: {}", line.trim());
                    }
                }
            }
        }

        if entries.is_empty() {
            return Err(RestockError::NoProxiesAvailable);
        }

        Ok(Self {
            entries,
            index: AtomicUsize::new(0),
        })
    }

    /// Build a pool from a proxy list file, one entry per line
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_lines(contents.lines())
    }

    /// Select the next proxy in round-robin order.
    ///
    /// The pool is non-empty by construction, so selection cannot fail.
    pub fn next(&self) -> &ProxyEntry {
        // Atomically increment and get the previous value, then wrap around
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.entries.len();
        &self.entries[idx]
    }

    /// Number of proxies in the pool
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_order_and_wraparound() {
        let pool = ProxyPool::from_lines([
            "10.0.0.1:8081:u:p",
            "10.0.0.2:8082:u:p",
            "10.0.0.3:8083:u:p",
        ])
        .unwrap();

        // Should cycle through 1, 2, 3, 1, 2, 3...
        assert_eq!(pool.next().host, "10.0.0.1");
        assert_eq!(pool.next().host, "10.0.0.2");
        assert_eq!(pool.next().host, "10.0.0.3");
        assert_eq!(pool.next().host, "10.0.0.1");
        assert_eq!(pool.next().host, "10.0.0.2");
        assert_eq!(pool.next().host, "10.0.0.3");
    }

    #[test]
    fn test_mixed_lines_keep_valid_entries_in_order() {
        let pool = ProxyPool::from_lines([
            "10.0.0.1:8081:u:p",
            "not-a-proxy",
            "",
            "10.0.0.2:8082",
            "10.0.0.3:8083:u:p",
        ])
        .unwrap();

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.next().host, "10.0.0.1");
        assert_eq!(pool.next().host, "10.0.0.3");
    }

    #[test]
    fn test_empty_pool_is_an_error() {
        let result = ProxyPool::from_lines(["nope", "", "also:not:valid"]);
        assert!(matches!(result, Err(RestockError::NoProxiesAvailable)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = ProxyPool::from_file("/nonexistent/proxies.txt");
        assert!(matches!(result, Err(RestockError::Io(_))));
    }

    #[test]
    fn test_single_entry_pool_repeats() {
        let pool = ProxyPool::from_lines(["10.0.0.1:8081:u:p"]).unwrap();
        assert_eq!(pool.next().url(), "http://u:p@10.0.0.1:8081");
        assert_eq!(pool.next().url(), "http://u:p@10.0.0.1:8081");
    }
}
