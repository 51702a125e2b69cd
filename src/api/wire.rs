//! serde mappings for PokéAPI JSON payloads.
//!
//! Only the fields the application reads are declared; serde ignores the
//! rest. Nullable upstream fields use `Option` or `#[serde(default)]` so a
//! sparse record never fails to decode.

use serde::Deserialize;

/// A `{name, url}` reference, used pervasively by the upstream API.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NamedResource {
    pub name: String,
    #[serde(default)]
    #[allow(dead_code)] // Present in every payload; the client keys on `name`
    pub url: String,
}

/// One page of `GET /pokemon?limit=N&offset=M` or the `GET /type` index.
#[derive(Debug, Deserialize)]
pub(crate) struct ResourcePage {
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

/// `GET /pokemon/{name}` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct PokemonPayload {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub moves: Vec<MoveEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Sprites {
    pub front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MoveEntry {
    #[serde(rename = "move")]
    pub name: NamedResource,
    #[serde(default)]
    pub version_group_details: Vec<VersionGroupDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VersionGroupDetail {
    #[serde(default)]
    pub level_learned_at: u32,
    pub move_learn_method: NamedResource,
    pub version_group: NamedResource,
}

/// `GET /type/{name}` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct TypePayload {
    #[serde(default)]
    pub pokemon: Vec<TypeMember>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TypeMember {
    pub pokemon: NamedResource,
}
