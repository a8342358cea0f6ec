//! Test helpers

use blog_core::IdProvider;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Hands out queued ids in order, then `stub-<n>` once the queue is empty.
#[derive(Default)]
pub struct StubIds {
    queued: Mutex<VecDeque<String>>,
    fallback: AtomicU64,
}

impl StubIds {
    pub fn new<const N: usize>(ids: [&str; N]) -> Self {
        Self {
            queued: Mutex::new(ids.iter().map(|id| id.to_string()).collect()),
            fallback: AtomicU64::new(0),
        }
    }
}

impl IdProvider for StubIds {
    fn new_id(&self) -> String {
        self.queued
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| format!("stub-{}", self.fallback.fetch_add(1, Ordering::Relaxed)))
    }
}
