use super::cache::SessionCache;
use crate::api::Pokemon;

/// Feed page size: how many cards one "page" of the infinite scroll shows.
pub const PAGE_SIZE: usize = 20;

/// Pseudo-type selecting the unfiltered catalog.
pub const ALL_TYPES: &str = "all";

/// Parameters for one remote page fetch, handed to the spawning task.
///
/// `generation` identifies the accumulation buffer the fetch belongs to; a
/// completion whose generation no longer matches is stale (the filter changed
/// while it was in flight) and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub limit: usize,
    pub offset: usize,
}

/// View state and slice derivation for the infinite feed.
///
/// Owns the [`SessionCache`] (injected at construction, session lifetime) and
/// the remote accumulation buffer used by the "all" view while the full set
/// has not been preloaded. All mutation happens on the UI task; background
/// tasks communicate through the `apply_*`/`publish_*` methods after the
/// matching `begin_*` claimed the fetch.
#[derive(Debug)]
pub struct FeedController {
    cache: SessionCache,

    /// Type catalog for the sidebar; empty until loaded (or on load failure).
    types: Vec<String>,
    catalog_loading: bool,
    catalog_loaded: bool,

    /// Pages accumulated for the "all" view while the full set is absent.
    /// Grows monotonically by offset; cleared when the filter leaves "all".
    remote_buffer: Vec<Pokemon>,
    remote_offset: usize,
    has_more_remote: bool,
    page_fetch_in_flight: bool,
    page_generation: u64,

    search_term: String,
    selected_type: String,
    page: usize,
}

impl FeedController {
    pub fn new(cache: SessionCache) -> Self {
        Self {
            cache,
            types: Vec::new(),
            catalog_loading: false,
            catalog_loaded: false,
            remote_buffer: Vec::new(),
            remote_offset: 0,
            has_more_remote: true,
            page_fetch_in_flight: false,
            page_generation: 0,
            search_term: String::new(),
            selected_type: ALL_TYPES.to_string(),
            page: 0,
        }
    }

    // ========================================================================
    // Type catalog (initialize)
    // ========================================================================

    /// Claim the one-shot type catalog fetch. True exactly once per session.
    pub fn begin_catalog_load(&mut self) -> bool {
        if self.catalog_loading || self.catalog_loaded {
            return false;
        }
        self.catalog_loading = true;
        true
    }

    /// Store the type catalog. On fetch failure the host passes an empty
    /// list; the sidebar then renders with only the "all" entry. Never
    /// retried either way.
    pub fn apply_catalog(&mut self, types: Vec<String>) {
        self.types = types;
        self.catalog_loading = false;
        self.catalog_loaded = true;
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn catalog_loading(&self) -> bool {
        self.catalog_loading
    }

    // ========================================================================
    // Selection and search
    // ========================================================================

    pub fn selected_type(&self) -> &str {
        &self.selected_type
    }

    pub fn is_all(&self) -> bool {
        self.selected_type == ALL_TYPES
    }

    /// Switch the active type filter.
    ///
    /// A change resets the visible page count and re-arms `has_more_remote`.
    /// Leaving "all" clears the accumulation buffer (a later return starts
    /// fresh from offset 0) and invalidates any in-flight page fetch via the
    /// generation counter. Re-selecting the current filter changes no view
    /// state; it can still claim the member fetch below, which is how a
    /// failed type load gets retried.
    ///
    /// Returns true when the newly selected type needs a member fetch, i.e.
    /// its cache slot took the `Absent -> Loading` edge. Re-selecting a type
    /// that is cached or already loading returns false (single-flight).
    pub fn select_type(&mut self, type_name: &str) -> bool {
        if type_name != self.selected_type {
            if self.is_all() {
                // Leaving "all": drop the partial accumulation
                self.remote_buffer.clear();
                self.remote_offset = 0;
            }
            self.page_generation += 1;
            self.page_fetch_in_flight = false;
            self.selected_type = type_name.to_string();
            self.page = 0;
            self.has_more_remote = true;
        }

        if type_name != ALL_TYPES {
            self.cache.begin_type_load(type_name)
        } else {
            false
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Update the client-side name filter. Pagination is intentionally not
    /// reset: the visible window only ever shrinks to the filtered length.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    // ========================================================================
    // Remote paging ("all" view without full set)
    // ========================================================================

    /// Claim the next remote page fetch if one is needed.
    ///
    /// Needed means: the "all" view is active, the full set is not ready,
    /// remote data may remain, no page fetch is outstanding, and the visible
    /// slice wants more items than are buffered. Claiming sets the
    /// single-flight flag; exactly one of [`apply_page`] or
    /// [`page_fetch_failed`] must follow with the returned generation.
    ///
    /// [`apply_page`]: Self::apply_page
    /// [`page_fetch_failed`]: Self::page_fetch_failed
    pub fn begin_page_fetch(&mut self) -> Option<PageRequest> {
        if !self.is_all() || self.cache.full_set().is_some() {
            return None;
        }
        if self.page_fetch_in_flight || !self.has_more_remote {
            return None;
        }
        let need = (self.page + 1) * PAGE_SIZE;
        if self.remote_buffer.len() >= need {
            return None;
        }
        self.page_fetch_in_flight = true;
        Some(PageRequest {
            generation: self.page_generation,
            limit: PAGE_SIZE,
            offset: self.remote_offset,
        })
    }

    /// Append a fetched page to the accumulation buffer.
    ///
    /// The offset advances by the number of items actually received, and a
    /// short page (fewer than `limit`) is the end-of-data signal. A stale
    /// generation is dropped whole: the buffer it belonged to is gone.
    pub fn apply_page(&mut self, generation: u64, chunk: Vec<Pokemon>, limit: usize) {
        if generation != self.page_generation {
            tracing::debug!(generation, current = self.page_generation, "Dropping stale page fetch");
            return;
        }
        self.page_fetch_in_flight = false;
        let received = chunk.len();
        self.remote_buffer.extend(chunk);
        self.remote_offset += received;
        if received < limit {
            self.has_more_remote = false;
        }
    }

    /// Clear the single-flight flag after a failed page fetch. The error
    /// itself is surfaced by the host; the buffer and offset are untouched.
    pub fn page_fetch_failed(&mut self, generation: u64) {
        if generation == self.page_generation {
            self.page_fetch_in_flight = false;
        }
    }

    // ========================================================================
    // Cache publication (called from the event handler)
    // ========================================================================

    /// Claim the background full-set preload. True only when the "all" view
    /// is active and the slot is absent (not loading, ready, or failed).
    pub fn begin_full_preload(&mut self) -> bool {
        self.is_all() && self.cache.begin_full_load()
    }

    pub fn publish_full(&mut self, items: Vec<Pokemon>) {
        self.cache.publish_full(items);
    }

    /// A preload batch failed: silently abort, publish nothing, and leave
    /// the "all" view on incremental paging for the rest of the session.
    pub fn preload_failed(&mut self) {
        self.cache.fail_full_load();
    }

    pub fn publish_type(&mut self, type_name: &str, items: Vec<Pokemon>) {
        self.cache.publish_type(type_name, items);
    }

    pub fn type_load_failed(&mut self, type_name: &str) {
        self.cache.fail_type_load(type_name);
    }

    pub fn full_set_ready(&self) -> bool {
        self.cache.full_set().is_some()
    }

    pub fn cache_version(&self) -> u64 {
        self.cache.version()
    }

    // ========================================================================
    // Slice derivation
    // ========================================================================

    /// The base list the current view derives from: full set for "all" when
    /// preloaded, else the accumulation buffer for "all", else the selected
    /// type's cached members (empty until loaded).
    fn base_list(&self) -> &[Pokemon] {
        if self.is_all() {
            match self.cache.full_set() {
                Some(full) => full,
                None => &self.remote_buffer,
            }
        } else {
            self.cache
                .type_list(&self.selected_type)
                .map(|items| items.as_slice())
                .unwrap_or(&[])
        }
    }

    /// Base list restricted to names containing the search term,
    /// case-insensitively. An empty term filters nothing.
    fn filtered(&self) -> Vec<&Pokemon> {
        let base = self.base_list();
        if self.search_term.is_empty() {
            return base.iter().collect();
        }
        let q = self.search_term.to_lowercase();
        base.iter()
            .filter(|p| p.name.to_lowercase().contains(&q))
            .collect()
    }

    /// The first `(page + 1) * PAGE_SIZE` filtered items.
    pub fn visible(&self) -> Vec<&Pokemon> {
        let mut items = self.filtered();
        items.truncate((self.page + 1) * PAGE_SIZE);
        items
    }

    /// Whether scrolling further can reveal anything: either more filtered
    /// items are already in memory, or the "all" view without a full set may
    /// still have remote pages.
    pub fn has_more(&self) -> bool {
        let filtered_len = self.filtered().len();
        let visible_len = filtered_len.min((self.page + 1) * PAGE_SIZE);
        let more_in_memory = visible_len < filtered_len;
        if self.is_all() && self.cache.full_set().is_none() {
            more_in_memory || self.has_more_remote
        } else {
            more_in_memory
        }
    }

    /// True while any foreground fetch is outstanding: the type catalog, a
    /// remote page, or the selected type's member list. The background
    /// preload deliberately does not count.
    pub fn loading(&self) -> bool {
        self.catalog_loading
            || self.page_fetch_in_flight
            || self.cache.type_loading(&self.selected_type)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Advance the visible window by one page. No-op while a fetch is
    /// loading or when nothing more can be shown.
    pub fn advance_page(&mut self) -> bool {
        if self.loading() || !self.has_more() {
            return false;
        }
        self.page += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mon(id: u32, name: &str) -> Pokemon {
        Pokemon {
            id,
            name: name.to_string(),
            image: String::new(),
            types: vec!["normal".to_string()],
        }
    }

    fn mons(n: usize) -> Vec<Pokemon> {
        (0..n)
            .map(|i| mon(i as u32 + 1, &format!("mon-{:04}", i + 1)))
            .collect()
    }

    fn controller() -> FeedController {
        FeedController::new(SessionCache::new())
    }

    #[test]
    fn test_catalog_fetch_is_one_shot() {
        let mut c = controller();
        assert!(c.begin_catalog_load());
        assert!(!c.begin_catalog_load());
        c.apply_catalog(vec!["water".into(), "fire".into()]);
        assert!(!c.begin_catalog_load());
        assert_eq!(c.types(), ["water", "fire"]);

        // Failure path: empty list stored, still never retried
        let mut c = controller();
        c.begin_catalog_load();
        c.apply_catalog(Vec::new());
        assert!(c.types().is_empty());
        assert!(!c.begin_catalog_load());
    }

    #[test]
    fn test_full_page_keeps_more_remote() {
        let mut c = controller();
        let req = c.begin_page_fetch().expect("empty buffer needs a page");
        assert_eq!(req.offset, 0);
        assert_eq!(req.limit, PAGE_SIZE);

        c.apply_page(req.generation, mons(PAGE_SIZE), req.limit);
        assert_eq!(c.visible().len(), PAGE_SIZE);
        assert!(c.has_more());
        // Buffer satisfies the current window: no fetch needed until advance
        assert!(c.begin_page_fetch().is_none());
    }

    #[test]
    fn test_short_page_ends_remote_data() {
        let mut c = controller();
        let req = c.begin_page_fetch().unwrap();
        c.apply_page(req.generation, mons(14), req.limit);

        assert_eq!(c.visible().len(), 14);
        assert!(!c.has_more());
        assert!(c.begin_page_fetch().is_none(), "end-of-data: no more fetches");
    }

    #[test]
    fn test_offset_advances_by_received_count() {
        let mut c = controller();
        let req = c.begin_page_fetch().unwrap();
        c.apply_page(req.generation, mons(PAGE_SIZE), req.limit);
        c.advance_page();

        let req = c.begin_page_fetch().unwrap();
        assert_eq!(req.offset, PAGE_SIZE);
    }

    #[test]
    fn test_page_fetch_is_single_flight() {
        let mut c = controller();
        assert!(c.begin_page_fetch().is_some());
        assert!(c.begin_page_fetch().is_none(), "fetch already in flight");
    }

    #[test]
    fn test_advance_blocked_while_loading() {
        let mut c = controller();
        c.begin_catalog_load();
        assert!(!c.advance_page());
        c.apply_catalog(Vec::new());

        let req = c.begin_page_fetch().unwrap();
        assert!(!c.advance_page(), "page fetch in flight blocks advance");
        c.apply_page(req.generation, mons(PAGE_SIZE), req.limit);
        assert!(c.advance_page());
        assert_eq!(c.page(), 1);
    }

    #[test]
    fn test_advance_strictly_increments_while_has_more() {
        let mut c = controller();
        c.publish_full(mons(100));
        for expected in 1..=4 {
            assert!(c.advance_page());
            assert_eq!(c.page(), expected);
        }
        // 100 items = 5 windows of 20; the fifth shows everything
        assert!(!c.has_more());
        assert!(!c.advance_page());
        assert_eq!(c.page(), 4);
    }

    #[test]
    fn test_select_type_single_flight() {
        let mut c = controller();
        assert!(c.select_type("water"), "absent slot needs a fetch");
        assert!(!c.select_type("water"), "rapid re-select while loading");

        c.publish_type("water", mons(3));
        assert!(!c.select_type("water"), "cached type never refetched");
        assert_eq!(c.visible().len(), 3);
    }

    #[test]
    fn test_select_type_resets_pagination() {
        let mut c = controller();
        c.publish_full(mons(100));
        c.advance_page();
        c.advance_page();
        assert_eq!(c.page(), 2);

        c.select_type("water");
        assert_eq!(c.page(), 0);

        c.select_type(ALL_TYPES);
        assert_eq!(c.page(), 0);
    }

    #[test]
    fn test_reselecting_current_filter_is_a_view_noop() {
        let mut c = controller();
        // Scroll one page forward, then exhaust remote data with a short page
        let req = c.begin_page_fetch().unwrap();
        c.apply_page(req.generation, mons(PAGE_SIZE), req.limit);
        c.advance_page();
        assert_eq!(c.page(), 1);
        let req = c.begin_page_fetch().unwrap();
        c.apply_page(req.generation, mons(5), req.limit);
        assert!(!c.has_more());

        c.select_type(ALL_TYPES);
        assert_eq!(c.page(), 1, "same-value selection keeps the scroll position");
        assert!(!c.has_more(), "end-of-data must not be re-armed");
        assert!(c.begin_page_fetch().is_none());

        // Same for a type view
        c.select_type("water");
        c.publish_type("water", mons(PAGE_SIZE * 2));
        c.advance_page();
        assert_eq!(c.page(), 1);
        c.select_type("water");
        assert_eq!(c.page(), 1);
    }

    #[test]
    fn test_leaving_all_clears_accumulation_buffer() {
        let mut c = controller();
        let req = c.begin_page_fetch().unwrap();
        c.apply_page(req.generation, mons(PAGE_SIZE), req.limit);
        assert_eq!(c.visible().len(), PAGE_SIZE);

        c.select_type("water");
        c.select_type(ALL_TYPES);
        // Fresh accumulation starts from offset 0
        let req = c.begin_page_fetch().unwrap();
        assert_eq!(req.offset, 0);
        assert!(c.visible().is_empty());
    }

    #[test]
    fn test_stale_page_fetch_dropped_after_filter_change() {
        let mut c = controller();
        let req = c.begin_page_fetch().unwrap();

        c.select_type("water");
        c.apply_page(req.generation, mons(PAGE_SIZE), req.limit);

        c.select_type(ALL_TYPES);
        assert!(c.visible().is_empty(), "stale chunk must not leak into the new buffer");
        assert_eq!(c.begin_page_fetch().unwrap().offset, 0);
    }

    #[test]
    fn test_full_set_round_trip_preserves_order() {
        let mut c = controller();
        let full = mons(50);
        c.publish_full(full.clone());
        c.publish_type("water", mons(5));

        let before: Vec<u32> = c.visible().iter().map(|p| p.id).collect();
        c.select_type("water");
        c.select_type(ALL_TYPES);
        let after: Vec<u32> = c.visible().iter().map(|p| p.id).collect();

        assert_eq!(before, after);
        assert!(!c.begin_full_preload(), "full set present: no re-preload");
        assert!(c.begin_page_fetch().is_none(), "full set bypasses remote paging");
    }

    #[test]
    fn test_preload_only_claimed_on_all_view() {
        let mut c = controller();
        c.select_type("water");
        assert!(!c.begin_full_preload());

        c.select_type(ALL_TYPES);
        assert!(c.begin_full_preload());
        assert!(!c.begin_full_preload(), "at most one preload per session");
    }

    #[test]
    fn test_failed_preload_degrades_to_remote_paging() {
        let mut c = controller();
        assert!(c.begin_full_preload());
        c.preload_failed();

        assert!(!c.begin_full_preload(), "failed preload is permanent");
        assert!(c.begin_page_fetch().is_some(), "incremental paging still serves the view");
    }

    #[test]
    fn test_search_filters_case_insensitively() {
        let mut c = controller();
        c.publish_full(vec![
            mon(1, "bulbasaur"),
            mon(4, "charmander"),
            mon(7, "squirtle"),
            mon(8, "wartortle"),
        ]);

        c.set_search("ART");
        let names: Vec<&str> = c.visible().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["wartortle"]);

        c.set_search("AR");
        let names: Vec<&str> = c.visible().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["charmander", "wartortle"]);

        c.set_search("");
        assert_eq!(c.visible().len(), 4);
    }

    #[test]
    fn test_visible_is_min_of_window_and_filtered() {
        let mut c = controller();
        c.publish_full(mons(30));
        assert_eq!(c.visible().len(), PAGE_SIZE);
        assert!(c.has_more());

        c.advance_page();
        assert_eq!(c.visible().len(), 30);
        assert!(!c.has_more());
    }

    #[test]
    fn test_has_more_true_while_remote_data_may_remain() {
        let c = controller();
        // Nothing buffered, nothing filtered, but remote data unexplored
        assert!(c.has_more());
    }

    #[test]
    fn test_type_view_empty_until_loaded() {
        let mut c = controller();
        c.select_type("water");
        assert!(c.visible().is_empty());
        assert!(c.loading(), "selected type's member fetch is outstanding");
        assert!(!c.has_more());

        c.publish_type("water", mons(25));
        assert!(!c.loading());
        assert_eq!(c.visible().len(), PAGE_SIZE);
        assert!(c.has_more());
    }

    proptest! {
        /// Every visible item comes from the base list and matches the term.
        #[test]
        fn prop_filtered_is_subset_matching_term(
            term in "[a-z]{0,5}",
            names in prop::collection::vec("[a-z]{1,10}", 0..50),
        ) {
            let base: Vec<Pokemon> = names
                .iter()
                .enumerate()
                .map(|(i, n)| mon(i as u32 + 1, n))
                .collect();
            let mut c = controller();
            c.publish_full(base.clone());
            c.set_search(term.clone());

            let visible = c.visible();
            prop_assert!(visible.len() <= PAGE_SIZE);
            for p in visible {
                prop_assert!(base.contains(p));
                prop_assert!(p.name.to_lowercase().contains(&term.to_lowercase()));
            }
        }
    }
}
