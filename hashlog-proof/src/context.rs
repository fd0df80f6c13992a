// File: hashlog-proof/src/context.rs
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of provenance data stamped on proofs and receipts.
pub trait ProofContext: Send + Sync {
    /// Identity of whoever hands out proofs, usually the tree.
    fn provider(&self) -> &str;
    fn new_uuid(&self) -> String;
    /// Seconds since the Unix epoch.
    fn timestamp(&self) -> i64;
}

/// Random v4 identifiers and the wall clock.
#[derive(Clone, Debug)]
pub struct SystemContext {
    provider: String,
}

impl SystemContext {
    /// Context with a freshly minted provider identity.
    pub fn new() -> Self { Self { provider: Uuid::new_v4().to_string() } }

    pub fn with_provider(provider: impl Into<String>) -> Self { Self { provider: provider.into() } }
}

impl Default for SystemContext {
    fn default() -> Self { Self::new() }
}

impl ProofContext for SystemContext {
    fn provider(&self) -> &str { &self.provider }
    fn new_uuid(&self) -> String { Uuid::new_v4().to_string() }
    fn timestamp(&self) -> i64 { Utc::now().timestamp() }
}

/// Deterministic context: a frozen clock and sequential identifiers.
#[derive(Debug)]
pub struct FixedContext {
    provider: String,
    timestamp: i64,
    counter: AtomicU64,
}

impl FixedContext {
    pub fn new(provider: impl Into<String>, timestamp: i64) -> Self {
        Self { provider: provider.into(), timestamp, counter: AtomicU64::new(0) }
    }
}

impl ProofContext for FixedContext {
    fn provider(&self) -> &str { &self.provider }

    fn new_uuid(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Uuid::from_u128(u128::from(n)).to_string()
    }

    fn timestamp(&self) -> i64 { self.timestamp }
}

/// ctime-style rendering of a timestamp, in UTC.
pub fn creation_moment(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(moment) => moment.format("%a %b %e %H:%M:%S %Y").to_string(),
        None => timestamp.to_string(),
    }
}
