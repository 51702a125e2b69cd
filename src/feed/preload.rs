use crate::api::{FetchError, PokeClient, Pokemon};
use std::time::Duration;

/// Batch size for the background full-set preload. Larger than the feed page
/// size so the whole catalog needs only a handful of requests.
pub const PRELOAD_BATCH_SIZE: usize = 100;

/// Known catalog size used as the preload's upper bound. Entries added
/// upstream beyond this bound are never preloaded; they stay reachable only
/// through incremental paging until the preload completes and bypasses it.
pub const PRELOAD_TOTAL: usize = 1302;

/// Pause between preload batches, to stay polite to the upstream API.
pub const PRELOAD_PAUSE: Duration = Duration::from_millis(250);

/// Download the entire catalog in sequential fixed-size batches.
///
/// Strictly sequential by design: batch `n + 1` is not requested before
/// batch `n` resolves, and `pause` elapses between batches, which bounds the
/// request rate. Offsets advance by `batch_size` regardless of how many
/// items a batch returns, up to (exclusive) `total`, so a catalog of 1302
/// with batches of 100 issues 14 requests.
///
/// All-or-nothing: the accumulated list is only returned when every batch
/// succeeded. Any failure propagates immediately and nothing is published;
/// the caller records the abort and the "all" view keeps paging
/// incrementally.
pub async fn preload_full_set(
    client: &PokeClient,
    batch_size: usize,
    total: usize,
    pause: Duration,
) -> Result<Vec<Pokemon>, FetchError> {
    let mut all = Vec::with_capacity(total);
    let mut offset = 0;
    while offset < total {
        let page = client.list_page(batch_size, offset).await?;
        tracing::debug!(offset, received = page.results.len(), "Preload batch complete");
        all.extend(page.results);
        offset += batch_size;
        tokio::time::sleep(pause).await;
    }
    tracing::info!(items = all.len(), "Full catalog preload complete");
    Ok(all)
}
