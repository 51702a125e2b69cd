//! Application event handling.
//!
//! This module processes background task completion events: the type
//! catalog, preload batches, incremental pages, type member lists, and
//! detail payloads. All cache publication happens here, on the UI task.

use crate::app::{App, AppEvent, DetailState, TaskKind};

/// Handle application events from background tasks.
///
/// Updates controller/cache state and surfaces the failures the host is
/// contractually required to surface (page and type fetches). The preload
/// failure path is deliberately silent: the feed keeps paging incrementally.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::TypeCatalogLoaded(result) => match result {
            Ok(types) => {
                tracing::info!(count = types.len(), "Type catalog loaded");
                app.feed.apply_catalog(types);
            }
            Err(e) => {
                // Degrade to a filterless sidebar; never retried
                tracing::warn!(error = %e, "Type catalog fetch failed");
                app.feed.apply_catalog(Vec::new());
                app.set_status("Could not load type list");
            }
        },

        AppEvent::PreloadFinished(result) => match result {
            Ok(items) => {
                app.feed.publish_full(items);
                app.set_status("Full catalog cached");
            }
            Err(e) => {
                // Silent abort: no partial publish, incremental paging
                // continues to serve the "all" view for this session.
                tracing::debug!(error = %e, "Background preload aborted");
                app.feed.preload_failed();
            }
        },

        AppEvent::PageLoaded {
            generation,
            limit,
            result,
        } => match result {
            Ok(chunk) => {
                app.feed.apply_page(generation, chunk, limit);
            }
            Err(e) => {
                app.feed.page_fetch_failed(generation);
                app.set_status(format!("Failed to load more: {e}"));
            }
        },

        AppEvent::TypeLoaded { type_name, result } => match result {
            Ok(items) => {
                tracing::debug!(kind = %type_name, count = items.len(), "Type members loaded");
                app.feed.publish_type(&type_name, items);
                app.clamp_selection();
            }
            Err(e) => {
                app.feed.type_load_failed(&type_name);
                app.set_status(format!("Failed to load {type_name}: {e}"));
            }
        },

        AppEvent::DetailLoaded {
            name,
            generation,
            result,
        } => {
            if generation != app.detail_generation {
                tracing::debug!(name = %name, "Dropping stale detail load");
                return;
            }
            app.detail = match result {
                Ok(detail) => DetailState::Loaded { detail },
                Err(e) => DetailState::Failed {
                    name,
                    error: e.to_string(),
                },
            };
        }

        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task = task.label(), error = %error, "Background task panicked");
            app.set_status(format!("Internal error in {}", task.label()));
            // Release the claim the task was spawned against; a panic
            // degrades exactly like the matching fetch failure.
            match task {
                TaskKind::TypeCatalog => app.feed.apply_catalog(Vec::new()),
                TaskKind::Preload => app.feed.preload_failed(),
                TaskKind::PageFetch { generation } => app.feed.page_fetch_failed(generation),
                TaskKind::TypeLoad { type_name } => app.feed.type_load_failed(&type_name),
                TaskKind::DetailLoad { name, generation } => {
                    if generation == app.detail_generation {
                        app.detail = DetailState::Failed { name, error };
                    }
                }
            }
        }
    }
}
