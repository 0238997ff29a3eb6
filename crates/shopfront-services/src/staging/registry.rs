use chrono::{DateTime, Duration as ChronoDuration, Utc};
use shopfront_core::models::TempAsset;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug)]
struct SessionEntry {
    assets: Vec<TempAsset>,
    last_activity: DateTime<Utc>,
    /// Number of in-flight operations that marked the session active
    active_holds: u32,
}

impl SessionEntry {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            assets: Vec::new(),
            last_activity: now,
            active_holds: 0,
        }
    }
}

/// In-memory registry of staged assets per upload session.
///
/// Cloning is cheap and every clone shares the same map. The lock is only
/// held for synchronous map operations, never across an `.await`.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<String, SessionEntry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        // A panic while holding the lock cannot leave the map half-updated
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a staged asset to the session, creating the session if needed.
    /// Duplicate keys are recorded as-is.
    pub fn register(&self, session_id: &str, asset: TempAsset) {
        let now = Utc::now();
        let mut sessions = self.lock();
        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry::new(now));
        entry.assets.push(asset);
        entry.last_activity = now;
    }

    pub fn mark_active(&self, session_id: &str) {
        let now = Utc::now();
        let mut sessions = self.lock();
        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionEntry::new(now));
        entry.active_holds += 1;
        entry.last_activity = now;
    }

    /// Release one active hold. Unknown sessions are ignored.
    /// A session left with no holds and no assets is dropped.
    pub fn mark_inactive(&self, session_id: &str) {
        let mut sessions = self.lock();
        let Some(entry) = sessions.get_mut(session_id) else {
            return;
        };
        entry.active_holds = entry.active_holds.saturating_sub(1);
        entry.last_activity = Utc::now();
        if entry.active_holds == 0 && entry.assets.is_empty() {
            sessions.remove(session_id);
        }
    }

    pub fn is_active(&self, session_id: &str) -> bool {
        self.lock()
            .get(session_id)
            .is_some_and(|entry| entry.active_holds > 0)
    }

    /// Remove the session and hand back its assets.
    /// Returns `None` when the session is unknown (already cleaned).
    pub fn take_session(&self, session_id: &str) -> Option<Vec<TempAsset>> {
        self.lock().remove(session_id).map(|entry| entry.assets)
    }

    /// Drop every record of `key` from whichever session holds it
    pub fn forget_key(&self, key: &str) -> bool {
        let mut sessions = self.lock();
        let mut removed = false;
        for entry in sessions.values_mut() {
            let before = entry.assets.len();
            entry.assets.retain(|asset| asset.key != key);
            removed |= entry.assets.len() != before;
        }
        removed
    }

    /// Drop `key` only if it belongs to `session_id`, refreshing its activity
    pub fn forget_session_key(&self, session_id: &str, key: &str) -> bool {
        let mut sessions = self.lock();
        let Some(entry) = sessions.get_mut(session_id) else {
            return false;
        };
        let before = entry.assets.len();
        entry.assets.retain(|asset| asset.key != key);
        entry.last_activity = Utc::now();
        entry.assets.len() != before
    }

    pub fn contains_key(&self, session_id: &str, key: &str) -> bool {
        self.lock()
            .get(session_id)
            .is_some_and(|entry| entry.assets.iter().any(|asset| asset.key == key))
    }

    pub fn assets(&self, session_id: &str) -> Vec<TempAsset> {
        self.lock()
            .get(session_id)
            .map(|entry| entry.assets.clone())
            .unwrap_or_default()
    }

    pub fn session_ids(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Atomically remove every session idle for longer than `max_idle` and not
    /// currently active. Checking and removing under one lock keeps a session
    /// that turns active between the two steps out of the sweep.
    pub fn take_expired(
        &self,
        now: DateTime<Utc>,
        max_idle: Duration,
    ) -> Vec<(String, Vec<TempAsset>)> {
        let max_idle = ChronoDuration::from_std(max_idle).unwrap_or(ChronoDuration::MAX);
        let mut sessions = self.lock();

        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, entry)| entry.active_holds == 0 && now - entry.last_activity > max_idle)
            .map(|(session_id, _)| session_id.clone())
            .collect();

        expired
            .into_iter()
            .filter_map(|session_id| {
                sessions
                    .remove(&session_id)
                    .map(|entry| (session_id, entry.assets))
            })
            .collect()
    }
}
