use crate::api::{FetchError, PokeClient, Pokemon, PokemonDetail};
use crate::config::Config;
use crate::feed::{FeedController, ScrollSentinel, SessionCache, ALL_TYPES};
use std::borrow::Cow;
use tokio::time::Instant;

// ============================================================================
// View and Focus Enums
// ============================================================================

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Sidebar of types next to the scrolling feed
    Browse,
    /// Full-screen detail for one Pokémon
    Detail,
}

/// Which panel has focus in Browse view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Feed,
}

/// Input interpretation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// `/` pressed: keystrokes edit the search term
    Search,
}

// ============================================================================
// Detail Loading State
// ============================================================================

/// Loading state for the detail view.
///
/// Carries a generation counter so a slow load finishing after the user has
/// opened a different Pokémon (or left the detail view) is recognized as
/// stale and dropped.
#[derive(Debug)]
pub enum DetailState {
    Idle,
    Loading { name: String },
    Loaded { detail: PokemonDetail },
    Failed { name: String, error: String },
}

// ============================================================================
// Events from background tasks
// ============================================================================

pub enum AppEvent {
    /// The one-shot type catalog fetch finished.
    TypeCatalogLoaded(Result<Vec<String>, FetchError>),
    /// The background full-set preload finished (all batches or first error).
    PreloadFinished(Result<Vec<Pokemon>, FetchError>),
    /// One remote page for the "all" view finished.
    ///
    /// `generation` is the accumulation-buffer generation the fetch was
    /// spawned against; the controller drops a stale one.
    PageLoaded {
        generation: u64,
        limit: usize,
        result: Result<Vec<Pokemon>, FetchError>,
    },
    /// A type's full member list finished loading.
    TypeLoaded {
        type_name: String,
        result: Result<Vec<Pokemon>, FetchError>,
    },
    /// Detail for the detail view finished loading.
    DetailLoaded {
        name: String,
        generation: u64,
        result: Result<PokemonDetail, FetchError>,
    },
    /// A background task panicked.
    ///
    /// Carries the identity of the claim the task was spawned against so the
    /// handler can release it; a panic must degrade exactly like the
    /// matching fetch failure, or the single-flight state wedges for the
    /// session.
    TaskPanicked { task: TaskKind, error: String },
}

/// Which background task a [`AppEvent::TaskPanicked`] came from.
#[derive(Debug)]
pub enum TaskKind {
    TypeCatalog,
    Preload,
    PageFetch { generation: u64 },
    TypeLoad { type_name: String },
    DetailLoad { name: String, generation: u64 },
}

impl TaskKind {
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::TypeCatalog => "type catalog",
            TaskKind::Preload => "preload",
            TaskKind::PageFetch { .. } => "page fetch",
            TaskKind::TypeLoad { .. } => "type load",
            TaskKind::DetailLoad { .. } => "detail load",
        }
    }
}

// ============================================================================
// Application State
// ============================================================================

/// How long a status message stays on screen.
const STATUS_TTL_SECS: u64 = 3;

pub struct App {
    pub client: PokeClient,
    pub config: Config,

    /// The feed cache controller: owns the session cache and all catalog
    /// view state.
    pub feed: FeedController,
    /// Fires page advances when the last rendered row scrolls into view.
    pub sentinel: ScrollSentinel,

    pub view: View,
    pub focus: Focus,
    pub input_mode: InputMode,

    /// Selected row in the visible feed slice.
    pub selected_row: usize,
    /// Selected entry in the sidebar ("all" + type catalog).
    pub sidebar_selected: usize,

    pub detail: DetailState,
    /// Bumped on every detail open/close; stale loads are ignored.
    pub detail_generation: u64,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(client: PokeClient, config: Config) -> Self {
        Self {
            client,
            config,
            feed: FeedController::new(SessionCache::new()),
            sentinel: ScrollSentinel::new(),
            view: View::Browse,
            focus: Focus::Feed,
            input_mode: InputMode::Normal,
            selected_row: 0,
            sidebar_selected: 0,
            detail: DetailState::Idle,
            detail_generation: 0,
            status_message: None,
            needs_redraw: true,
        }
    }

    // ========================================================================
    // Sidebar
    // ========================================================================

    /// Sidebar entry count: the implicit "all" plus the type catalog. Always
    /// at least 1, even when the catalog fetch failed and stored nothing.
    pub fn sidebar_len(&self) -> usize {
        1 + self.feed.types().len()
    }

    /// Entry at a sidebar index; index 0 is always "all".
    pub fn sidebar_entry(&self, index: usize) -> &str {
        if index == 0 {
            ALL_TYPES
        } else {
            self.feed
                .types()
                .get(index - 1)
                .map(String::as_str)
                .unwrap_or(ALL_TYPES)
        }
    }

    /// The type name under the sidebar cursor.
    pub fn sidebar_selected_type(&self) -> String {
        self.sidebar_entry(self.sidebar_selected).to_string()
    }

    // ========================================================================
    // Selection upkeep
    // ========================================================================

    /// Keep the feed cursor inside the visible slice after the slice shrank
    /// (filter change, type switch).
    pub fn clamp_selection(&mut self) {
        let len = self.feed.visible().len();
        if len == 0 {
            self.selected_row = 0;
        } else if self.selected_row >= len {
            self.selected_row = len - 1;
        }
    }

    // ========================================================================
    // Detail view
    // ========================================================================

    /// Enter the detail view for a name; returns the generation the load
    /// task must report back with.
    pub fn enter_detail(&mut self, name: &str) -> u64 {
        self.view = View::Detail;
        self.detail_generation += 1;
        self.detail = DetailState::Loading {
            name: name.to_string(),
        };
        self.detail_generation
    }

    /// Leave the detail view. A load still in flight becomes stale.
    pub fn exit_detail(&mut self) {
        self.view = View::Browse;
        self.detail_generation += 1;
        self.detail = DetailState::Idle;
    }

    // ========================================================================
    // Status messages
    // ========================================================================

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time;

    fn test_app() -> App {
        let client = PokeClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1",
            Duration::from_secs(1),
        )
        .unwrap();
        App::new(client, Config::default())
    }

    #[tokio::test]
    async fn test_status_expires_after_three_seconds() {
        let mut app = test_app();
        time::pause();
        app.set_status("Test message");

        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_some()); // Still present at 2s

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_none()); // Expired after 3s
    }

    #[test]
    fn test_sidebar_always_has_all_entry() {
        let app = test_app();
        assert_eq!(app.sidebar_len(), 1);
        assert_eq!(app.sidebar_entry(0), "all");
    }

    #[test]
    fn test_sidebar_lists_catalog_after_load() {
        let mut app = test_app();
        app.feed.begin_catalog_load();
        app.feed
            .apply_catalog(vec!["water".to_string(), "fire".to_string()]);

        assert_eq!(app.sidebar_len(), 3);
        assert_eq!(app.sidebar_entry(1), "water");
        assert_eq!(app.sidebar_entry(2), "fire");
    }

    #[test]
    fn test_enter_and_exit_detail_bump_generation() {
        let mut app = test_app();
        let g1 = app.enter_detail("pikachu");
        assert_eq!(app.view, View::Detail);
        assert!(matches!(app.detail, DetailState::Loading { .. }));

        app.exit_detail();
        assert_eq!(app.view, View::Browse);
        assert!(matches!(app.detail, DetailState::Idle));

        let g2 = app.enter_detail("eevee");
        assert!(g2 > g1, "each open gets a fresh generation");
    }

    #[test]
    fn test_clamp_selection_on_empty_slice() {
        let mut app = test_app();
        app.selected_row = 7;
        app.clamp_selection();
        assert_eq!(app.selected_row, 0);
    }
}
