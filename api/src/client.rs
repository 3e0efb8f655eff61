use crate::xml::{self, Document, XmlNode, XmlValue};
use crate::{BoardGame, GameDetails, LinkRef};
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const BGG_XML_API2: &str = "https://boardgamegeek.com/xmlapi2";

/// BGG answers long-running requests with 202 and expects the caller to
/// poll. Five fresh attempts, two seconds apart, matches what the site
/// tolerates before it is fair to call the service busy.
const MAX_ATTEMPTS: u32 = 5;
const RETRY_DELAY: Duration = Duration::from_secs(2);

/// BoardGameGeek XML API client backed by the public xmlapi2 endpoints.
#[derive(Debug, Clone)]
pub struct BggApi {
    client: Client,
    base_url: String,
    timeout: Duration,
    retry_delay: Duration,
}

impl Default for BggApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("shelftui/0.1 (terminal collection browser)")
                .build()
                .unwrap_or_default(),
            base_url: BGG_XML_API2.to_owned(),
            timeout: Duration::from_secs(10),
            retry_delay: RETRY_DELAY,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    /// Transport failure or unexpected HTTP status. Never retried here;
    /// the caller decides whether a fresh top-level call is worth it.
    Network(reqwest::Error, String),
    /// The service kept answering "queued" past the retry budget.
    Timeout,
    /// The service reported a semantic error, e.g. an unknown username.
    Service(String),
    /// The response contradicts its own declared cardinality.
    Structural(String),
    /// The requested game is absent from the response.
    NotFound(String),
    /// The response body is not well-formed XML.
    Parse(xml::XmlError, String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Timeout => write!(f, "BGG timed out or is busy. Please try again later."),
            ApiError::Service(msg) => write!(f, "BGG error: {msg}"),
            ApiError::Structural(msg) => write!(f, "Unexpected BGG response: {msg}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Parse(e, url) => write!(f, "Bad XML from {url}: {e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) => Some(e),
            ApiError::Parse(e, _) => Some(e),
            _ => None,
        }
    }
}

impl BggApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different host. Tests use this with a local
    /// mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Override the delay between queued-request polls, so tests do not
    /// sleep for real.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Fetch a user's collection, statistics included.
    ///
    /// An empty collection (`totalitems="0"`) is a legitimate result and
    /// comes back as an empty vec; a response that declares items but
    /// carries none is a contract violation and fails instead.
    pub async fn fetch_collection(&self, username: &str) -> ApiResult<Vec<BoardGame>> {
        let url = format!(
            "{}/collection?username={username}&subtype=boardgame&stats=1",
            self.base_url
        );
        let doc = self.get_document(&url).await?;

        if let Some(message) = service_error(&doc) {
            return Err(ApiError::Service(message));
        }

        let Some(root) = doc.root.as_node() else {
            return Err(ApiError::Structural(format!(
                "collection root <{}> carries no content",
                doc.name
            )));
        };

        let total = parse_count(root.attr("totalitems"));
        match root.child("item") {
            Some(slot) => Ok(slot
                .as_sequence()
                .iter()
                .filter_map(XmlValue::as_node)
                .map(map_collection_item)
                .collect()),
            None if total == 0 => Ok(Vec::new()),
            None => Err(ApiError::Structural(format!(
                "collection declares {total} items but carries none"
            ))),
        }
    }

    /// Fetch the full record for one game, statistics and videos included.
    pub async fn fetch_game_details(&self, game_id: &str) -> ApiResult<GameDetails> {
        let url = format!(
            "{}/thing?id={game_id}&stats=1&videos=1&type=boardgame",
            self.base_url
        );
        let doc = self.get_document(&url).await?;

        if let Some(message) = service_error(&doc) {
            return Err(ApiError::Service(message));
        }

        // The item slot is a sequence when multiple ids are requested;
        // a single-id request still goes through the same coercion.
        let item = doc
            .root
            .as_node()
            .and_then(|root| root.child("item"))
            .and_then(|slot| slot.as_sequence().first())
            .and_then(XmlValue::as_node)
            .ok_or_else(|| ApiError::NotFound(format!("game {game_id} not in BGG response")))?;

        Ok(map_game_details(item))
    }

    async fn get_document(&self, url: &str) -> ApiResult<Document> {
        let body = self.get_with_retry(url).await?;
        xml::parse_document(&body).map_err(|e| ApiError::Parse(e, url.to_owned()))
    }

    /// One bounded loop owns the queued-request protocol for both
    /// endpoints: 202 means "accepted, poll again", and every poll is a
    /// fresh request the service evaluates from scratch.
    async fn get_with_retry(&self, url: &str) -> ApiResult<String> {
        let mut attempt = 1;
        loop {
            let response = self
                .client
                .get(url)
                .header(reqwest::header::ACCEPT, "application/xml")
                .timeout(self.timeout)
                .send()
                .await
                .map_err(|e| ApiError::Network(e, url.to_owned()))?;

            if response.status() == StatusCode::ACCEPTED {
                if attempt >= MAX_ATTEMPTS {
                    warn!("request still queued after {MAX_ATTEMPTS} attempts: {url}");
                    return Err(ApiError::Timeout);
                }
                debug!("request queued, retrying (attempt {attempt}/{MAX_ATTEMPTS}): {url}");
                tokio::time::sleep(self.retry_delay).await;
                attempt += 1;
                continue;
            }

            let response = response
                .error_for_status()
                .map_err(|e| ApiError::Network(e, url.to_owned()))?;
            return response
                .text()
                .await
                .map_err(|e| ApiError::Network(e, url.to_owned()));
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: normalized XML → clean domain types
// ---------------------------------------------------------------------------

/// A root `<errors>` element is a service-reported failure, not a payload.
/// Collect every `<error><message>` text, comma-joined.
fn service_error(doc: &Document) -> Option<String> {
    if doc.name != "errors" {
        return None;
    }

    let mut messages = Vec::new();
    if let Some(slot) = doc.root.as_node().and_then(|root| root.child("error")) {
        for entry in slot.as_sequence() {
            let message = match entry {
                XmlValue::Node(node) => node.child_text("message").or(node.text.as_deref()),
                XmlValue::Text(text) => Some(text.as_str()),
            };
            if let Some(message) = message.filter(|m| !m.is_empty()) {
                messages.push(message.to_owned());
            }
        }
    }

    if messages.is_empty() {
        Some("BGG reported an unspecified error".to_owned())
    } else {
        Some(messages.join(", "))
    }
}

fn map_collection_item(item: &XmlNode) -> BoardGame {
    // With stats=1 the player/time bounds ride on a nested stats element.
    let stats = item.first_child("stats").and_then(XmlValue::as_node);
    BoardGame {
        id: item.attr("objectid").unwrap_or_default().to_owned(),
        name: field(item, "name").unwrap_or_default().to_owned(),
        year_published: field(item, "yearpublished").unwrap_or("N/A").to_owned(),
        image_url: field(item, "image").unwrap_or_default().to_owned(),
        thumbnail_url: field(item, "thumbnail").unwrap_or_default().to_owned(),
        num_plays: count_field(item, "numplays"),
        min_players: stats.map(|s| count_field(s, "minplayers")).unwrap_or(0),
        max_players: stats.map(|s| count_field(s, "maxplayers")).unwrap_or(0),
        min_playtime: stats.map(|s| count_field(s, "minplaytime")).unwrap_or(0),
        max_playtime: stats.map(|s| count_field(s, "maxplaytime")).unwrap_or(0),
    }
}

fn map_game_details(item: &XmlNode) -> GameDetails {
    let links: Vec<&XmlNode> = item
        .child("link")
        .map(|slot| {
            slot.as_sequence()
                .iter()
                .filter_map(XmlValue::as_node)
                .collect()
        })
        .unwrap_or_default();

    GameDetails {
        id: item.attr("id").unwrap_or_default().to_owned(),
        kind: item.attr("type").unwrap_or_default().to_owned(),
        name: primary_name(item),
        description: field(item, "description")
            .filter(|d| !d.is_empty())
            .unwrap_or("No description available.")
            .to_owned(),
        year_published: field(item, "yearpublished").unwrap_or("N/A").to_owned(),
        min_players: count_field(item, "minplayers"),
        max_players: count_field(item, "maxplayers"),
        playing_time: count_field(item, "playingtime"),
        min_playtime: count_field(item, "minplaytime"),
        max_playtime: count_field(item, "maxplaytime"),
        min_age: count_field(item, "minage"),
        image_url: field(item, "image").unwrap_or_default().to_owned(),
        thumbnail_url: field(item, "thumbnail").unwrap_or_default().to_owned(),
        categories: filter_links(&links, "boardgamecategory"),
        mechanics: filter_links(&links, "boardgamemechanic"),
        designers: filter_links(&links, "boardgamedesigner"),
        publishers: filter_links(&links, "boardgamepublisher"),
        rating: average_rating(item),
        recommended_players: recommended_players(item),
    }
}

/// Ordered lookup for a logical field the feed may encode as an attribute
/// on the item, as a scalar child's `value` attribute, or as child text.
/// One chain for every field instead of per-field branching.
fn field<'a>(node: &'a XmlNode, name: &str) -> Option<&'a str> {
    node.attr(name)
        .or_else(|| node.first_child(name).and_then(scalar))
}

/// A scalar carried by a child element: `<tag value="v"/>` or `<tag>v</tag>`.
fn scalar(value: &XmlValue) -> Option<&str> {
    match value {
        XmlValue::Text(text) => Some(text.as_str()),
        XmlValue::Node(node) => node.attr("value").or(node.text.as_deref()),
    }
}

fn count_field(node: &XmlNode, name: &str) -> u32 {
    parse_count(field(node, name))
}

/// Base-10 parse with the feed's absent-or-junk-means-zero default.
/// Parse failures never propagate to the caller.
fn parse_count(raw: Option<&str>) -> u32 {
    raw.and_then(|raw| raw.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

/// The canonical title is the name entry without a `type` marker;
/// alternate and localized names all carry one. Malformed data falls back
/// to the first entry, then to a placeholder — a missing name must never
/// fail the whole fetch.
fn primary_name(item: &XmlNode) -> String {
    let Some(slot) = item.child("name") else {
        return "Unknown Game".to_owned();
    };
    let entries = slot.as_sequence();
    entries
        .iter()
        .find(|entry| entry.as_node().is_none_or(|node| node.attr("type").is_none()))
        .or_else(|| entries.first())
        .and_then(scalar)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| "Unknown Game".to_owned())
}

/// One link tag encodes four relationships, told apart only by its `type`
/// attribute. Partition preserves source order within each collection.
fn filter_links(links: &[&XmlNode], kind: &str) -> Vec<LinkRef> {
    links
        .iter()
        .filter(|link| link.attr("type") == Some(kind))
        .map(|link| LinkRef {
            id: link.attr("id").unwrap_or_default().to_owned(),
            name: link.attr("value").unwrap_or_default().to_owned(),
        })
        .collect()
}

fn average_rating(item: &XmlNode) -> Option<f64> {
    item.first_child("statistics")
        .and_then(XmlValue::as_node)?
        .first_child("ratings")
        .and_then(XmlValue::as_node)?
        .first_child("average")
        .and_then(scalar)
        .and_then(|raw| raw.trim().parse::<f64>().ok())
}

/// Render "3-4 players (Best with 4)" from the suggested-player-count
/// poll, or "3-4 players" when the poll is absent or has no Best votes.
fn recommended_players(item: &XmlNode) -> String {
    let range = format!(
        "{}-{}",
        bound(item, "minplayers"),
        bound(item, "maxplayers")
    );
    match best_player_count(item) {
        Some(best) => format!("{range} players (Best with {best})"),
        None => format!("{range} players"),
    }
}

fn bound(item: &XmlNode, name: &str) -> String {
    field(item, name)
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| "?".to_owned())
}

/// Bucket with the most "Best" votes in the suggested_numplayers poll.
/// Strictly-greater comparison keeps the first bucket on a tie.
fn best_player_count(item: &XmlNode) -> Option<String> {
    let poll = item
        .child("poll")?
        .as_sequence()
        .iter()
        .filter_map(XmlValue::as_node)
        .find(|poll| poll.attr("name") == Some("suggested_numplayers"))?;

    let mut best: Option<(String, u32)> = None;
    for group in poll.child("results")?.as_sequence() {
        let Some(group) = group.as_node() else { continue };
        let Some(bucket) = group.attr("numplayers") else { continue };
        let votes = group
            .child("result")
            .map(|slot| {
                slot.as_sequence()
                    .iter()
                    .filter_map(XmlValue::as_node)
                    .filter(|result| result.attr("value") == Some("Best"))
                    .map(|result| parse_count(result.attr("numvotes")))
                    .sum::<u32>()
            })
            .unwrap_or(0);
        if votes > best.as_ref().map_or(0, |(_, v)| *v) {
            best = Some((bucket.to_owned(), votes));
        }
    }
    best.map(|(bucket, _)| bucket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const COLLECTION_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<items totalitems="2" termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">
  <item objecttype="thing" objectid="13" subtype="boardgame" collid="101">
    <name sortindex="1">Catan</name>
    <yearpublished>1995</yearpublished>
    <image>https://cf.geekdo-images.com/catan.jpg</image>
    <thumbnail>https://cf.geekdo-images.com/catan_t.jpg</thumbnail>
    <numplays>7</numplays>
    <stats minplayers="3" maxplayers="4" minplaytime="60" maxplaytime="120" numowned="212">
      <rating value="7.5"/>
    </stats>
    <status own="1" lastmodified="2025-11-02 10:15:32"/>
  </item>
  <item objecttype="thing" objectid="9209" subtype="boardgame" collid="102">
    <name sortindex="1">Ticket to Ride</name>
    <numplays>not-a-number</numplays>
    <stats minplayers="2" maxplayers="5" minplaytime="30" maxplaytime="60"/>
  </item>
</items>"#;

    const THING_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<items termsofuse="https://boardgamegeek.com/xmlapi/termsofuse">
  <item type="boardgame" id="13">
    <thumbnail>https://cf.geekdo-images.com/catan_t.jpg</thumbnail>
    <image>https://cf.geekdo-images.com/catan.jpg</image>
    <name type="alternate" sortindex="1" value="Die Siedler von Catan"/>
    <name sortindex="1" value="Catan"/>
    <description>Trade, build, settle.</description>
    <yearpublished value="1995"/>
    <minplayers value="3"/>
    <maxplayers value="4"/>
    <playingtime value="120"/>
    <minplaytime value="60"/>
    <maxplaytime value="120"/>
    <minage value="10"/>
    <link type="boardgamecategory" id="1026" value="Negotiation"/>
    <link type="boardgamecategory" id="1008" value="Economic"/>
    <link type="boardgamemechanic" id="2072" value="Dice Rolling"/>
    <link type="boardgamedesigner" id="11" value="Klaus Teuber"/>
    <link type="boardgamepublisher" id="37" value="KOSMOS"/>
    <poll name="suggested_numplayers" title="User Suggested Number of Players" totalvotes="157">
      <results numplayers="3">
        <result value="Best" numvotes="40"/>
        <result value="Recommended" numvotes="30"/>
        <result value="Not Recommended" numvotes="5"/>
      </results>
      <results numplayers="4">
        <result value="Best" numvotes="70"/>
        <result value="Recommended" numvotes="10"/>
        <result value="Not Recommended" numvotes="2"/>
      </results>
    </poll>
    <statistics page="1">
      <ratings>
        <usersrated value="12345"/>
        <average value="7.09327"/>
        <bayesaverage value="6.9"/>
      </ratings>
    </statistics>
  </item>
</items>"#;

    fn test_api(server: &mockito::ServerGuard) -> BggApi {
        BggApi::with_base_url(server.url()).retry_delay(Duration::from_millis(1))
    }

    /// Pull the first item node out of a fixture for direct mapping tests.
    fn first_item(xml_text: &str) -> XmlNode {
        xml::parse_document(xml_text)
            .expect("fixture parses")
            .root
            .as_node()
            .and_then(|root| root.first_child("item"))
            .and_then(XmlValue::as_node)
            .cloned()
            .expect("fixture has an item")
    }

    // -----------------------------------------------------------------------
    // Protocol behavior, against a mock server
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn collection_maps_items_and_defaults() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/collection")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(COLLECTION_XML)
            .create_async()
            .await;

        let games = test_api(&server)
            .fetch_collection("erikschmidt")
            .await
            .expect("collection loads");
        mock.assert_async().await;

        assert_eq!(games.len(), 2);
        let catan = &games[0];
        assert_eq!(catan.id, "13");
        assert_eq!(catan.name, "Catan");
        assert_eq!(catan.year_published, "1995");
        assert_eq!(catan.num_plays, 7);
        assert_eq!(catan.min_players, 3);
        assert_eq!(catan.max_playtime, 120);

        // Missing year defaults to the literal, junk play count to zero.
        let ttr = &games[1];
        assert_eq!(ttr.year_published, "N/A");
        assert_eq!(ttr.num_plays, 0);
        assert_eq!(ttr.image_url, "");
        assert_eq!(ttr.max_players, 5);
    }

    #[tokio::test]
    async fn lone_item_is_coerced_into_a_one_element_sequence() {
        let body = r#"<items totalitems="1">
          <item objectid="822"><name sortindex="5">Carcassonne</name></item>
        </items>"#;
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/collection")
            .match_query(Matcher::Any)
            .with_body(body)
            .create_async()
            .await;

        let games = test_api(&server).fetch_collection("solo").await.unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].name, "Carcassonne");
    }

    #[tokio::test]
    async fn empty_collection_is_a_result_not_a_failure() {
        let body = r#"<items totalitems="0" termsofuse="https://boardgamegeek.com/xmlapi/termsofuse"/>"#;
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/collection")
            .match_query(Matcher::Any)
            .with_body(body)
            .create_async()
            .await;

        let games = test_api(&server).fetch_collection("newuser").await.unwrap();
        assert!(games.is_empty());
    }

    #[tokio::test]
    async fn declared_items_without_item_children_is_structural() {
        let body = r#"<items totalitems="3" termsofuse="x"/>"#;
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/collection")
            .match_query(Matcher::Any)
            .with_body(body)
            .create_async()
            .await;

        let err = test_api(&server)
            .fetch_collection("ghost")
            .await
            .expect_err("cardinality violation must fail");
        assert!(matches!(err, ApiError::Structural(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn service_error_carries_the_upstream_message() {
        let body = r#"<errors><error><message>Invalid username specified</message></error></errors>"#;
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/collection")
            .match_query(Matcher::Any)
            .with_body(body)
            .create_async()
            .await;

        match test_api(&server).fetch_collection("nope").await {
            Err(ApiError::Service(message)) => {
                assert_eq!(message, "Invalid username specified");
            }
            other => panic!("expected Service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn multiple_service_errors_are_comma_joined() {
        let body = r#"<errors>
          <error><message>Invalid username specified</message></error>
          <error><message>Rate limit exceeded</message></error>
        </errors>"#;
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/collection")
            .match_query(Matcher::Any)
            .with_body(body)
            .create_async()
            .await;

        match test_api(&server).fetch_collection("nope").await {
            Err(ApiError::Service(message)) => {
                assert_eq!(message, "Invalid username specified, Rate limit exceeded");
            }
            other => panic!("expected Service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn queued_responses_exhaust_exactly_five_attempts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/collection")
            .match_query(Matcher::Any)
            .with_status(202)
            .expect(5)
            .create_async()
            .await;

        let err = test_api(&server)
            .fetch_collection("busyuser")
            .await
            .expect_err("retry budget must run out");
        assert!(matches!(err, ApiError::Timeout), "got {err:?}");
        // No more, no less: each 202 consumed one fresh request.
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unparsable_body_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/collection")
            .match_query(Matcher::Any)
            .with_body("<items><item></items>")
            .create_async()
            .await;

        let err = test_api(&server).fetch_collection("user").await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(..)), "got {err:?}");
    }

    #[tokio::test]
    async fn game_details_load_end_to_end() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/thing")
            .match_query(Matcher::Any)
            .with_body(THING_XML)
            .create_async()
            .await;

        let details = test_api(&server).fetch_game_details("13").await.unwrap();
        assert_eq!(details.id, "13");
        assert_eq!(details.name, "Catan");
        assert_eq!(details.recommended_players, "3-4 players (Best with 4)");
    }

    #[tokio::test]
    async fn missing_item_in_detail_response_is_not_found() {
        let body = r#"<items termsofuse="x"/>"#;
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/thing")
            .match_query(Matcher::Any)
            .with_body(body)
            .create_async()
            .await;

        let err = test_api(&server)
            .fetch_game_details("424242")
            .await
            .expect_err("no item means not found");
        assert!(matches!(err, ApiError::NotFound(_)), "got {err:?}");
    }

    // -----------------------------------------------------------------------
    // Mapping, on fixture nodes directly
    // -----------------------------------------------------------------------

    #[test]
    fn detail_mapping_partitions_the_link_family_in_order() {
        let details = map_game_details(&first_item(THING_XML));

        assert_eq!(details.categories.len(), 2);
        assert_eq!(details.categories[0].name, "Negotiation");
        assert_eq!(details.categories[1].name, "Economic");
        assert_eq!(details.mechanics.len(), 1);
        assert_eq!(details.mechanics[0].id, "2072");
        assert_eq!(details.designers.len(), 1);
        assert_eq!(details.publishers.len(), 1);
        assert_eq!(details.publishers[0].name, "KOSMOS");
    }

    #[test]
    fn detail_mapping_reads_scalars_and_rating() {
        let details = map_game_details(&first_item(THING_XML));

        assert_eq!(details.kind, "boardgame");
        assert_eq!(details.description, "Trade, build, settle.");
        assert_eq!(details.year_published, "1995");
        assert_eq!(details.min_players, 3);
        assert_eq!(details.playing_time, 120);
        assert_eq!(details.min_age, 10);
        let rating = details.rating.expect("average is present");
        assert!((rating - 7.09327).abs() < 1e-9);
    }

    #[test]
    fn primary_name_is_the_entry_without_a_type_marker() {
        let details = map_game_details(&first_item(THING_XML));
        assert_eq!(details.name, "Catan");
    }

    #[test]
    fn all_marked_names_fall_back_to_the_first_entry() {
        let item = first_item(
            r#"<items><item type="boardgame" id="9">
                 <name type="alternate" value="Erste"/>
                 <name type="alternate" value="Zweite"/>
               </item></items>"#,
        );
        assert_eq!(map_game_details(&item).name, "Erste");
    }

    #[test]
    fn missing_names_fall_back_to_the_placeholder() {
        let item = first_item(r#"<items><item type="boardgame" id="9"/></items>"#);
        assert_eq!(map_game_details(&item).name, "Unknown Game");
    }

    #[test]
    fn absent_poll_renders_the_plain_player_range() {
        let item = first_item(
            r#"<items><item type="boardgame" id="9">
                 <name value="Quiet Game"/>
                 <minplayers value="2"/>
                 <maxplayers value="4"/>
               </item></items>"#,
        );
        assert_eq!(map_game_details(&item).recommended_players, "2-4 players");
    }

    #[test]
    fn missing_bounds_render_as_question_marks() {
        let item = first_item(
            r#"<items><item type="boardgame" id="9"><name value="X"/></item></items>"#,
        );
        let details = map_game_details(&item);
        assert_eq!(details.recommended_players, "?-? players");
        assert_eq!(details.min_players, 0, "numeric field still defaults to 0");
    }

    #[test]
    fn tied_best_votes_keep_the_first_bucket() {
        let item = first_item(
            r#"<items><item type="boardgame" id="9">
                 <name value="X"/>
                 <minplayers value="1"/>
                 <maxplayers value="4"/>
                 <poll name="suggested_numplayers">
                   <results numplayers="2"><result value="Best" numvotes="25"/></results>
                   <results numplayers="3"><result value="Best" numvotes="25"/></results>
                 </poll>
               </item></items>"#,
        );
        assert_eq!(
            map_game_details(&item).recommended_players,
            "1-4 players (Best with 2)"
        );
    }

    #[test]
    fn poll_with_zero_best_votes_is_inconclusive() {
        let item = first_item(
            r#"<items><item type="boardgame" id="9">
                 <name value="X"/>
                 <minplayers value="2"/>
                 <maxplayers value="6"/>
                 <poll name="suggested_numplayers">
                   <results numplayers="4"><result value="Best" numvotes="0"/></results>
                 </poll>
               </item></items>"#,
        );
        assert_eq!(map_game_details(&item).recommended_players, "2-6 players");
    }

    #[test]
    fn collection_item_with_value_attribute_encoding_still_maps() {
        // Same logical field, different encoding: the accessor chain covers
        // attribute, value-attribute child and text child alike.
        let item = first_item(
            r#"<items totalitems="1">
                 <item objectid="5" yearpublished="2004">
                   <name value="Attr Name"/>
                   <numplays>3</numplays>
                 </item>
               </items>"#,
        );
        let game = map_collection_item(&item);
        assert_eq!(game.name, "Attr Name");
        assert_eq!(game.year_published, "2004");
        assert_eq!(game.num_plays, 3);
    }
}
