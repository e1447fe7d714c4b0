//! Batched Workshop item metadata lookup

use crate::transport::Transport;
use crate::{Error, Result};
use serde::Deserialize;
use serde::de::{self, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Tag the Workshop attaches to every Garry's Mod addon
const GENERIC_TAG: &str = "Addon";

/// Details of a published Workshop item
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkshopItem {
    /// Published file ID
    #[serde(rename = "publishedfileid", default, deserialize_with = "flexible_u64")]
    pub id: u64,
    /// Item title
    pub title: String,
    /// Item description
    #[serde(default)]
    pub description: String,
    /// SteamID64 of the creator
    #[serde(default, deserialize_with = "flexible_u64")]
    pub creator: u64,
    /// Whether the item has been banned
    #[serde(default, deserialize_with = "flexible_bool")]
    pub banned: bool,
    /// Reason given for the ban
    #[serde(default)]
    pub ban_reason: String,
    /// Workshop tags
    #[serde(default)]
    pub tags: Vec<WorkshopTag>,
    /// Creation time (Unix seconds)
    #[serde(default, deserialize_with = "flexible_u64")]
    pub time_created: u64,
    /// Last update time (Unix seconds)
    #[serde(default, deserialize_with = "flexible_u64")]
    pub time_updated: u64,
    /// Page views
    #[serde(default, deserialize_with = "flexible_u64")]
    pub views: u64,
    /// Current subscriptions
    #[serde(default, deserialize_with = "flexible_u64")]
    pub subscriptions: u64,
    /// Favourites
    #[serde(default, deserialize_with = "flexible_u64")]
    pub favorited: u64,
    /// Compressed bundle download URL
    #[serde(default)]
    pub file_url: String,
    /// Size of the compressed bundle in bytes
    #[serde(default, deserialize_with = "flexible_u64")]
    pub file_size: u64,
}

/// One entry of an item's tag list
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkshopTag {
    /// Tag text
    pub tag: String,
}

impl WorkshopItem {
    /// Tag names, without the generic "Addon" tag every item carries
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags
            .iter()
            .map(|t| t.tag.as_str())
            .filter(|t| *t != GENERIC_TAG)
            .collect()
    }
}

/// Result of looking up a single ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemLookup {
    /// The item exists
    Found(WorkshopItem),
    /// The item no longer exists upstream
    Missing,
}

impl ItemLookup {
    /// The item, if it exists
    pub fn item(&self) -> Option<&WorkshopItem> {
        match self {
            ItemLookup::Found(item) => Some(item),
            ItemLookup::Missing => None,
        }
    }

    /// Whether the item is missing
    pub fn is_missing(&self) -> bool {
        matches!(self, ItemLookup::Missing)
    }
}

#[derive(Deserialize)]
struct Envelope {
    response: DetailsResponse,
}

#[derive(Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    publishedfiledetails: Vec<Value>,
}

/// Form fields for a details request: the count, then one field per ID
pub fn request_fields(ids: &[u64]) -> Vec<(String, String)> {
    let mut fields = Vec::with_capacity(ids.len() + 1);
    fields.push(("itemcount".to_string(), ids.len().to_string()));
    for (i, id) in ids.iter().enumerate() {
        fields.push((format!("publishedfileids[{i}]"), id.to_string()));
    }
    fields
}

/// Client for the published file details endpoint
#[derive(Debug, Clone)]
pub struct MetadataClient<T> {
    transport: T,
    api_url: String,
}

impl<T: Transport> MetadataClient<T> {
    /// Create a client posting to `api_url`
    pub fn new<S: Into<String>>(transport: T, api_url: S) -> Self {
        Self {
            transport,
            api_url: api_url.into(),
        }
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Endpoint this client posts to
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Look up every ID in a single request
    ///
    /// Items that no longer exist are reported as [`ItemLookup::Missing`];
    /// the call only fails when the request itself fails or the body is
    /// not a details response. No retry is attempted.
    pub fn fetch(&self, ids: &[u64]) -> Result<BTreeMap<u64, ItemLookup>> {
        if ids.is_empty() {
            return Ok(BTreeMap::new());
        }

        log::info!("Requesting details for {} workshop items", ids.len());
        let body = self
            .transport
            .post_form(&self.api_url, &request_fields(ids))?;
        parse_details(&body, ids)
    }
}

/// Parse a details response body for the requested `ids`
pub fn parse_details(body: &str, ids: &[u64]) -> Result<BTreeMap<u64, ItemLookup>> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| Error::invalid_response(format!("malformed details payload: {e}")))?;

    let mut lookups = BTreeMap::new();
    for (position, detail) in envelope.response.publishedfiledetails.into_iter().enumerate() {
        // Entries normally echo their ID; fall back to request order
        let id = match detail.get("publishedfileid").and_then(value_as_u64) {
            Some(id) => id,
            None => match ids.get(position) {
                Some(id) => *id,
                None => {
                    log::warn!("Ignoring details entry {position} without an ID");
                    continue;
                }
            },
        };

        let lookup = if detail.get("title").is_none() {
            log::debug!("Workshop item {id} has no title, treating as missing");
            ItemLookup::Missing
        } else {
            let mut item: WorkshopItem = serde_json::from_value(detail).map_err(|e| {
                Error::invalid_response(format!("malformed details for {id}: {e}"))
            })?;
            item.id = id;
            ItemLookup::Found(item)
        };
        lookups.insert(id, lookup);
    }

    for id in ids {
        lookups.entry(*id).or_insert_with(|| {
            log::debug!("Workshop item {id} absent from response");
            ItemLookup::Missing
        });
    }

    Ok(lookups)
}

fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// The API returns 64-bit values as strings and small counters as numbers
fn flexible_u64<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Null => Ok(0),
        other => value_as_u64(other)
            .ok_or_else(|| de::Error::custom(format!("expected an unsigned integer, got {other}"))),
    }
}

fn flexible_bool<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Bool(b) => Ok(*b),
        Value::Null => Ok(false),
        other => value_as_u64(other)
            .map(|n| n != 0)
            .ok_or_else(|| de::Error::custom(format!("expected a boolean, got {other}"))),
    }
}
