//! Domain models shared across the aggregation pipeline
//!
//! Provider payload shapes that only one endpoint handler needs (raw channel
//! listings, bootstrap responses) live next to their fetch code in
//! `sources::*`; the types here flow through multiple stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cached provider session for one region
///
/// Replaced wholesale on refresh; read-only once created. A session older
/// than the freshness window (4 hours) is treated as stale.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub region: String,
    pub token: String,
    pub stitcher_params: String,
    pub obtained_at: DateTime<Utc>,
}

/// One live channel in a region's directory
#[derive(Debug, Clone, Serialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub tmsid: Option<String>,
    pub summary: Option<String>,
    pub group: Option<String>,
    pub region: String,
    /// Human-facing channel number, unique within its containing set
    pub number: u32,
    pub logo: Option<String>,
}

/// Raw result of one timeline request: one time window, one channel-id group
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineBatch {
    pub data: Vec<ChannelTimelines>,
    pub meta: BatchMeta,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMeta {
    /// End of the fetched window; chains the next window's start time
    pub end_date_time: DateTime<Utc>,
}

/// Programme timeline entries for a single channel within one batch
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelTimelines {
    pub channel_id: String,
    pub timelines: Vec<Timeline>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Timeline {
    pub title: String,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub episode: Episode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub sub_genre: Option<String>,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
    pub clip: Clip,
    pub series: Series,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub original_release_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Series {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SeriesKind,
    #[serde(default)]
    pub tile: Option<Tile>,
}

/// Provider series classification driving episode-number and category output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Live,
    Tv,
    Film,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tile {
    pub path: String,
}
