//! Background task spawning.
//!
//! Every fetch runs in a spawned task wrapped in panic containment; results
//! come back to the UI task as [`AppEvent`]s. The corresponding `begin_*`
//! claim on the controller happens on the UI task *before* the spawn, which
//! is what makes every fetch single-flight.

use crate::api::PokeClient;
use crate::app::{AppEvent, TaskKind};
use crate::feed::{preload_full_set, PageRequest, PRELOAD_BATCH_SIZE, PRELOAD_TOTAL};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::mpsc;

/// Run a future, converting a panic into an error string.
///
/// Background tasks run detached; without this, a panic would be silently
/// swallowed by the runtime and the UI would wait forever on a result that
/// never arrives.
async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

async fn send(tx: &mpsc::Sender<AppEvent>, event: AppEvent) {
    if tx.send(event).await.is_err() {
        tracing::warn!("Event channel send failed (receiver dropped)");
    }
}

/// One-shot type catalog fetch (the controller's initialize step).
pub(super) fn spawn_catalog_load(client: PokeClient, tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        match catch_task_panic(client.type_index()).await {
            Ok(result) => send(&tx, AppEvent::TypeCatalogLoaded(result)).await,
            Err(error) => {
                send(
                    &tx,
                    AppEvent::TaskPanicked {
                        task: TaskKind::TypeCatalog,
                        error,
                    },
                )
                .await
            }
        }
    });
}

/// Background full-set preload: sequential paced batches, all-or-nothing.
pub(super) fn spawn_preload(client: PokeClient, pause: Duration, tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let result = catch_task_panic(async {
            preload_full_set(&client, PRELOAD_BATCH_SIZE, PRELOAD_TOTAL, pause).await
        })
        .await;
        match result {
            Ok(result) => send(&tx, AppEvent::PreloadFinished(result)).await,
            Err(error) => {
                send(
                    &tx,
                    AppEvent::TaskPanicked {
                        task: TaskKind::Preload,
                        error,
                    },
                )
                .await
            }
        }
    });
}

/// One incremental page for the "all" view.
pub(super) fn spawn_page_fetch(client: PokeClient, req: PageRequest, tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let result = catch_task_panic(async {
            client
                .list_page(req.limit, req.offset)
                .await
                .map(|page| page.results)
        })
        .await;
        match result {
            Ok(result) => {
                send(
                    &tx,
                    AppEvent::PageLoaded {
                        generation: req.generation,
                        limit: req.limit,
                        result,
                    },
                )
                .await
            }
            Err(error) => {
                send(
                    &tx,
                    AppEvent::TaskPanicked {
                        task: TaskKind::PageFetch {
                            generation: req.generation,
                        },
                        error,
                    },
                )
                .await
            }
        }
    });
}

/// Full member list for one type (fetch-once per type).
pub(super) fn spawn_type_load(client: PokeClient, type_name: String, tx: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let result = catch_task_panic(client.pokemons_of_type(&type_name)).await;
        match result {
            Ok(result) => send(&tx, AppEvent::TypeLoaded { type_name, result }).await,
            Err(error) => {
                send(
                    &tx,
                    AppEvent::TaskPanicked {
                        task: TaskKind::TypeLoad { type_name },
                        error,
                    },
                )
                .await
            }
        }
    });
}

/// Detail payload for the detail view.
pub(super) fn spawn_detail_load(
    client: PokeClient,
    name: String,
    generation: u64,
    tx: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        let result = catch_task_panic(client.pokemon_detail(&name)).await;
        match result {
            Ok(result) => {
                send(
                    &tx,
                    AppEvent::DetailLoaded {
                        name,
                        generation,
                        result,
                    },
                )
                .await
            }
            Err(error) => {
                send(
                    &tx,
                    AppEvent::TaskPanicked {
                        task: TaskKind::DetailLoad { name, generation },
                        error,
                    },
                )
                .await
            }
        }
    });
}
