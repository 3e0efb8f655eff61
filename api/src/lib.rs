pub mod client;
pub mod xml;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the BGG XML wire format
// ---------------------------------------------------------------------------

/// One game in a user's collection, as listed by the collection endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardGame {
    pub id: String,
    pub name: String,
    /// Publication year as the feed reports it; "N/A" when absent.
    pub year_published: String,
    pub image_url: String,
    pub thumbnail_url: String,
    pub num_plays: u32,
    pub min_players: u32,
    pub max_players: u32,
    pub min_playtime: u32,
    pub max_playtime: u32,
}

/// An `{id, name}` pair from the shared link element family
/// (categories, mechanics, designers, publishers).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkRef {
    pub id: String,
    pub name: String,
}

/// Full record for a single game, fetched on demand from the thing endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameDetails {
    pub id: String,
    /// Item type reported by the feed, e.g. "boardgame" or "boardgameexpansion".
    pub kind: String,
    /// The primary title; alternate and localized names are dropped.
    pub name: String,
    pub description: String,
    pub year_published: String,
    pub min_players: u32,
    pub max_players: u32,
    pub playing_time: u32,
    pub min_playtime: u32,
    pub max_playtime: u32,
    pub min_age: u32,
    pub image_url: String,
    pub thumbnail_url: String,
    pub categories: Vec<LinkRef>,
    pub mechanics: Vec<LinkRef>,
    pub designers: Vec<LinkRef>,
    pub publishers: Vec<LinkRef>,
    /// Community rating average; `None` when the feed carries no parseable value.
    pub rating: Option<f64>,
    /// Derived summary, e.g. "2-4 players (Best with 3)".
    pub recommended_players: String,
}
