//! Storage for shareable scan results.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::diagnostic::ScanResult;

pub const DEFAULT_CAPACITY: usize = 1000;
pub const DEFAULT_TTL_DAYS: i64 = 7;
const SHARE_ID_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedResult {
    pub created_at: DateTime<Utc>,
    pub result: ScanResult,
}

pub trait ShareStore: Send + Sync {
    fn save(&self, id: &str, result: ScanResult);
    fn load(&self, id: &str) -> Option<SharedResult>;
}

pub fn new_share_id() -> String {
    nanoid::nanoid!(SHARE_ID_LENGTH)
}

struct Entries {
    by_id: HashMap<String, SharedResult>,
    /// Ids oldest first.
    order: VecDeque<String>,
}

/// Process-lifetime store bounded by entry count and age.
pub struct InMemoryShareStore {
    entries: RwLock<Entries>,
    capacity: usize,
    ttl: Duration,
}

impl InMemoryShareStore {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_CAPACITY, Duration::days(DEFAULT_TTL_DAYS))
    }

    pub fn with_limits(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(Entries {
                by_id: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, entry: &SharedResult, now: DateTime<Utc>) -> bool {
        now - entry.created_at > self.ttl
    }

    fn save_at(&self, id: &str, result: ScanResult, now: DateTime<Utc>) {
        let mut guard = self.entries.write();
        let entries = &mut *guard;

        while let Some(oldest) = entries.order.front() {
            let expired = entries
                .by_id
                .get(oldest)
                .is_none_or(|entry| self.is_expired(entry, now));
            if !expired {
                break;
            }
            if let Some(oldest) = entries.order.pop_front() {
                entries.by_id.remove(&oldest);
            }
        }

        if entries.by_id.contains_key(id) {
            entries.order.retain(|existing| existing != id);
        }
        entries.by_id.insert(
            id.to_string(),
            SharedResult {
                created_at: now,
                result,
            },
        );
        entries.order.push_back(id.to_string());

        while entries.by_id.len() > self.capacity {
            match entries.order.pop_front() {
                Some(oldest) => {
                    entries.by_id.remove(&oldest);
                }
                None => break,
            }
        }
    }

    fn load_at(&self, id: &str, now: DateTime<Utc>) -> Option<SharedResult> {
        let entries = self.entries.read();
        entries
            .by_id
            .get(id)
            .filter(|entry| !self.is_expired(entry, now))
            .cloned()
    }
}

impl Default for InMemoryShareStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ShareStore for InMemoryShareStore {
    fn save(&self, id: &str, result: ScanResult) {
        self.save_at(id, result, Utc::now());
    }

    fn load(&self, id: &str) -> Option<SharedResult> {
        self.load_at(id, Utc::now())
    }
}
