use std::collections::BTreeMap;

/// A catalog entry enriched with its detail fields.
///
/// Immutable once constructed from the upstream representation; cached copies
/// are shared behind `Arc<Vec<Pokemon>>` and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pokemon {
    /// National dex number.
    pub id: u32,
    /// Lowercase API name (e.g. "bulbasaur").
    pub name: String,
    /// Front sprite URL; empty when the upstream record has none.
    pub image: String,
    /// Type names in slot order (e.g. ["grass", "poison"]).
    pub types: Vec<String>,
}

/// A move learned by levelling up, as shown in the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnedMove {
    pub name: String,
    pub level: u32,
}

/// Full detail for a single Pokémon.
///
/// `moves_by_version` only contains level-up moves (learn method "level-up"
/// with a level greater than zero), grouped by version group and sorted
/// ascending by level within each group. BTreeMap keeps version groups in a
/// stable display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    pub image: String,
    pub types: Vec<String>,
    pub moves_by_version: BTreeMap<String, Vec<LearnedMove>>,
}
