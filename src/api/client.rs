use super::types::{LearnedMove, Pokemon, PokemonDetail};
use super::wire::{NamedResource, PokemonPayload, ResourcePage, TypePayload};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum response body size (5MB). The largest real payloads (Pokémon with
/// hundreds of move entries) are well under 1MB.
const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// How many detail requests a single page enrichment keeps in flight.
const DETAIL_CONCURRENCY: usize = 10;

/// Errors from talking to the catalog API.
///
/// No variant is retried by this layer; callers decide what degrades when a
/// fetch fails (the background preload aborts, the feed falls back to
/// incremental paging, etc.).
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the 5MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response body was not the expected JSON shape
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The configured API base URL could not be parsed
    #[error("Invalid API base URL: {0}")]
    BaseUrl(String),
}

/// One enriched page of the catalog list endpoint.
#[derive(Debug)]
pub struct PokemonPage {
    /// Entries in upstream order, each enriched with its detail fields.
    pub results: Vec<Pokemon>,
    /// Upstream cursor for the next page; `None` at end-of-data.
    pub next: Option<String>,
}

/// Client for the upstream catalog API.
///
/// Cheap to clone: wraps a `reqwest::Client` (itself reference-counted) plus
/// the parsed base URL. The base URL is configurable so tests can point at a
/// wiremock server.
#[derive(Debug, Clone)]
pub struct PokeClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl PokeClient {
    /// Create a client against `base_url` (e.g. `https://pokeapi.co/api/v2`).
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::BaseUrl`] if the URL does not parse or uses a
    /// scheme other than http/https.
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let base = Url::parse(base_url).map_err(|e| FetchError::BaseUrl(e.to_string()))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(FetchError::BaseUrl(format!(
                "unsupported scheme '{}'",
                base.scheme()
            )));
        }
        Ok(Self {
            http,
            base,
            timeout,
        })
    }

    /// One page of the catalog list, enriched with per-entry detail.
    ///
    /// Issues `GET /pokemon?limit=N&offset=M`, then one detail request per
    /// entry with bounded, order-preserving concurrency. The returned
    /// `results` may be shorter than `limit` near end-of-data; callers treat
    /// a short page as the end-of-data signal.
    pub async fn list_page(&self, limit: usize, offset: usize) -> Result<PokemonPage, FetchError> {
        let page: ResourcePage = self
            .get_json(&format!("pokemon?limit={limit}&offset={offset}"))
            .await?;
        let results = self.enrich(page.results).await?;
        Ok(PokemonPage {
            results,
            next: page.next,
        })
    }

    /// Summary record for a single Pokémon.
    pub async fn pokemon(&self, name: &str) -> Result<Pokemon, FetchError> {
        let payload: PokemonPayload = self.get_json(&format!("pokemon/{name}")).await?;
        Ok(summarize(payload))
    }

    /// Full detail for a single Pokémon, including level-up moves grouped by
    /// version group and sorted ascending by level.
    pub async fn pokemon_detail(&self, name: &str) -> Result<PokemonDetail, FetchError> {
        let payload: PokemonPayload = self.get_json(&format!("pokemon/{name}")).await?;
        Ok(detail(payload))
    }

    /// Names of all known types, in upstream order.
    pub async fn type_index(&self) -> Result<Vec<String>, FetchError> {
        let page: ResourcePage = self.get_json("type").await?;
        Ok(page.results.into_iter().map(|r| r.name).collect())
    }

    /// Every member of a type, enriched and sorted ascending by dex id.
    pub async fn pokemons_of_type(&self, type_name: &str) -> Result<Vec<Pokemon>, FetchError> {
        let payload: TypePayload = self.get_json(&format!("type/{type_name}")).await?;
        let members: Vec<NamedResource> = payload.pokemon.into_iter().map(|m| m.pokemon).collect();
        let mut results = self.enrich(members).await?;
        results.sort_by_key(|p| p.id);
        Ok(results)
    }

    /// Enrich a list of `{name, url}` references into full summary records.
    ///
    /// `buffered` (not `buffer_unordered`) keeps the output in input order,
    /// which the feed relies on for a stable visible slice.
    async fn enrich(&self, entries: Vec<NamedResource>) -> Result<Vec<Pokemon>, FetchError> {
        let fetches = entries
            .into_iter()
            .map(|entry| async move { self.pokemon(&entry.name).await });
        stream::iter(fetches)
            .buffered(DETAIL_CONCURRENCY)
            .try_collect()
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base.as_str().trim_end_matches('/'), path);

        let response = tokio::time::timeout(self.timeout, self.http.get(&url).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::Network)?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_BODY_SIZE).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn summarize(p: PokemonPayload) -> Pokemon {
    Pokemon {
        id: p.id,
        name: p.name,
        image: p.sprites.front_default.unwrap_or_default(),
        types: p.types.into_iter().map(|t| t.kind.name).collect(),
    }
}

fn detail(p: PokemonPayload) -> PokemonDetail {
    let mut moves_by_version: BTreeMap<String, Vec<LearnedMove>> = BTreeMap::new();
    for entry in &p.moves {
        for d in &entry.version_group_details {
            // Only moves learned by levelling up; level 0 entries under
            // "level-up" mark evolution moves.
            if d.move_learn_method.name == "level-up" && d.level_learned_at > 0 {
                moves_by_version
                    .entry(d.version_group.name.clone())
                    .or_default()
                    .push(LearnedMove {
                        name: entry.name.name.clone(),
                        level: d.level_learned_at,
                    });
            }
        }
    }
    for moves in moves_by_version.values_mut() {
        moves.sort_by_key(|m| m.level);
    }

    PokemonDetail {
        id: p.id,
        name: p.name,
        image: p.sprites.front_default.unwrap_or_default(),
        types: p.types.into_iter().map(|t| t.kind.name).collect(),
        moves_by_version,
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
