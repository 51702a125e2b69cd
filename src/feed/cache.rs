use crate::api::Pokemon;
use std::collections::HashMap;
use std::sync::Arc;

/// State machine for one cache slot.
///
/// Only the `Absent -> Loading` edge launches a fetch, which is what makes
/// every fetch single-flight: the transition happens on the UI task before
/// the background task is spawned, so a second trigger observes `Loading`
/// and does nothing.
///
/// `Failed` is terminal and only used for the full-set slot: a failed
/// preload is never retried for the session, and the "all" view falls back
/// permanently to incremental paging. Per-type slots go back to `Absent` on
/// failure so a later re-selection can try again.
#[derive(Debug, Clone, Default)]
enum SlotState {
    #[default]
    Absent,
    Loading,
    Ready(Arc<Vec<Pokemon>>),
    Failed,
}

/// Session-scoped catalog cache.
///
/// Owned by the feed controller and created once at startup; there is no
/// eviction and no invalidation. Lists, once published, are shared behind
/// `Arc` and never mutated. `version` increases on every publish so views
/// know to re-derive their slice.
#[derive(Debug, Default)]
pub struct SessionCache {
    full_set: SlotState,
    by_type: HashMap<String, SlotState>,
    version: u64,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bumped on every publish.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The full catalog, if the background preload has completed.
    pub fn full_set(&self) -> Option<&Arc<Vec<Pokemon>>> {
        match &self.full_set {
            SlotState::Ready(items) => Some(items),
            _ => None,
        }
    }

    /// Claim the full-set slot for loading. Returns true only on the
    /// `Absent -> Loading` edge; a ready, loading, or failed slot is left
    /// untouched and the caller must not start a preload.
    pub fn begin_full_load(&mut self) -> bool {
        match self.full_set {
            SlotState::Absent => {
                self.full_set = SlotState::Loading;
                true
            }
            _ => false,
        }
    }

    /// Atomically publish the preloaded catalog. Idempotent: a slot that is
    /// already `Ready` keeps its original contents.
    pub fn publish_full(&mut self, items: Vec<Pokemon>) {
        if matches!(self.full_set, SlotState::Ready(_)) {
            return;
        }
        self.full_set = SlotState::Ready(Arc::new(items));
        self.version += 1;
    }

    /// Record a failed preload. The slot becomes `Failed` for the rest of
    /// the session; no partial data is ever published.
    pub fn fail_full_load(&mut self) {
        if !matches!(self.full_set, SlotState::Ready(_)) {
            self.full_set = SlotState::Failed;
        }
    }

    /// The cached member list for a type, if loaded.
    pub fn type_list(&self, type_name: &str) -> Option<&Arc<Vec<Pokemon>>> {
        match self.by_type.get(type_name) {
            Some(SlotState::Ready(items)) => Some(items),
            _ => None,
        }
    }

    /// True while a fetch for this type is outstanding.
    pub fn type_loading(&self, type_name: &str) -> bool {
        matches!(self.by_type.get(type_name), Some(SlotState::Loading))
    }

    /// Claim a type slot for loading. Returns true only on the
    /// `Absent -> Loading` edge (single-flight per type; independent slots
    /// let two different types load concurrently).
    pub fn begin_type_load(&mut self, type_name: &str) -> bool {
        let slot = self.by_type.entry(type_name.to_string()).or_default();
        match slot {
            SlotState::Absent => {
                *slot = SlotState::Loading;
                true
            }
            _ => false,
        }
    }

    /// Publish a type's member list. Idempotent once `Ready`.
    pub fn publish_type(&mut self, type_name: &str, items: Vec<Pokemon>) {
        let slot = self.by_type.entry(type_name.to_string()).or_default();
        if matches!(slot, SlotState::Ready(_)) {
            return;
        }
        *slot = SlotState::Ready(Arc::new(items));
        self.version += 1;
    }

    /// Roll a failed type fetch back to `Absent` so re-selecting the type
    /// issues a fresh fetch.
    pub fn fail_type_load(&mut self, type_name: &str) {
        if let Some(slot) = self.by_type.get_mut(type_name) {
            if matches!(slot, SlotState::Loading) {
                *slot = SlotState::Absent;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mon(id: u32, name: &str) -> Pokemon {
        Pokemon {
            id,
            name: name.to_string(),
            image: String::new(),
            types: vec!["normal".to_string()],
        }
    }

    #[test]
    fn test_full_load_claims_absent_slot_once() {
        let mut cache = SessionCache::new();
        assert!(cache.begin_full_load());
        // Loading: a second trigger must not claim the slot again
        assert!(!cache.begin_full_load());

        cache.publish_full(vec![mon(1, "bulbasaur")]);
        assert!(!cache.begin_full_load());
        assert_eq!(cache.full_set().unwrap().len(), 1);
    }

    #[test]
    fn test_publish_full_is_idempotent() {
        let mut cache = SessionCache::new();
        cache.begin_full_load();
        cache.publish_full(vec![mon(1, "bulbasaur")]);
        let v = cache.version();

        cache.publish_full(vec![mon(2, "ivysaur")]);
        assert_eq!(cache.version(), v, "second publish must not bump version");
        assert_eq!(cache.full_set().unwrap()[0].name, "bulbasaur");
    }

    #[test]
    fn test_failed_preload_is_terminal() {
        let mut cache = SessionCache::new();
        cache.begin_full_load();
        cache.fail_full_load();

        assert!(cache.full_set().is_none());
        // Permanently degraded for the session: no new preload may start
        assert!(!cache.begin_full_load());
    }

    #[test]
    fn test_type_slots_are_independent() {
        let mut cache = SessionCache::new();
        assert!(cache.begin_type_load("water"));
        // Same type while loading: suppressed
        assert!(!cache.begin_type_load("water"));
        // Different type: its own slot
        assert!(cache.begin_type_load("fire"));

        cache.publish_type("water", vec![mon(7, "squirtle")]);
        assert_eq!(cache.type_list("water").unwrap().len(), 1);
        assert!(cache.type_list("fire").is_none());
        assert!(cache.type_loading("fire"));
    }

    #[test]
    fn test_failed_type_load_allows_retry() {
        let mut cache = SessionCache::new();
        cache.begin_type_load("water");
        cache.fail_type_load("water");
        assert!(cache.begin_type_load("water"));
    }

    #[test]
    fn test_published_type_never_refetched() {
        let mut cache = SessionCache::new();
        cache.begin_type_load("water");
        cache.publish_type("water", vec![mon(7, "squirtle")]);
        assert!(!cache.begin_type_load("water"));
    }

    #[test]
    fn test_version_bumps_on_each_publish() {
        let mut cache = SessionCache::new();
        assert_eq!(cache.version(), 0);
        cache.begin_type_load("water");
        cache.publish_type("water", vec![]);
        assert_eq!(cache.version(), 1);
        cache.begin_full_load();
        cache.publish_full(vec![]);
        assert_eq!(cache.version(), 2);
    }
}
