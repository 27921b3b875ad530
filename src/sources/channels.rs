//! Channel directory building and multi-region merging
//!
//! A region's directory joins the channel and category listings, resolves
//! display-number collisions first-fit in listing order, and picks the color
//! logo asset. The combined directory unifies the cached per-region sets by
//! channel id, shifts each region into its configured numbering block, and
//! renumbers globally until every display number is unique.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

use super::PlutoClient;
use crate::errors::SourceResult;
use crate::models::Channel;
use crate::utils::NumberPool;

const CHANNELS_URL: &str = "https://service-channels.clusters.pluto.tv/v2/guide/channels";
const CATEGORIES_URL: &str = "https://service-channels.clusters.pluto.tv/v2/guide/categories";

/// Image type marking the asset used as the channel logo
const COLOR_LOGO: &str = "colorLogoPNG";

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    data: Vec<RawChannel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawChannel {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub tmsid: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub number: u32,
    #[serde(default)]
    pub images: Vec<RawImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawImage {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct CategoryListResponse {
    data: Vec<RawCategory>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCategory {
    pub name: String,
    #[serde(rename = "channelIDs", default)]
    pub channel_ids: Vec<String>,
}

impl PlutoClient {
    /// Build the channel directory for one region
    ///
    /// Fetches the channel and category listings in two calls; either
    /// failure aborts the whole operation. The built set replaces the
    /// cached directory for the region.
    pub async fn channels(&self, region: &str) -> SourceResult<Vec<Channel>> {
        let session = self.session(region).await?;
        let query = [
            ("channelIds", ""),
            ("offset", "0"),
            ("limit", "1000"),
            ("sort", "number:asc"),
        ];

        let req = self
            .base_request(CHANNELS_URL, region)
            .bearer_auth(&session.token)
            .query(&query);
        let channels: ChannelListResponse = Self::send_json(CHANNELS_URL, req).await?;

        let req = self
            .base_request(CATEGORIES_URL, region)
            .bearer_auth(&session.token)
            .query(&query);
        let categories: CategoryListResponse = Self::send_json(CATEGORIES_URL, req).await?;

        let directory = build_directory(channels.data, &categories.data, region);
        debug!(
            "Built {} directory with {} channels",
            region,
            directory.len()
        );
        self.directories
            .replace(region.to_string(), directory.clone())
            .await;
        Ok(directory)
    }

    /// Last successfully built directory for a region, if any
    pub async fn cached_directory(&self, region: &str) -> Option<Vec<Channel>> {
        self.directories.get(&region.to_string()).await
    }

    /// Merge the cached per-region directories into the combined set
    ///
    /// Regions contribute in configured order; a region with no cached
    /// directory yet simply contributes nothing.
    pub async fn channels_all(&self) -> Vec<Channel> {
        let mut sets = Vec::new();
        for region in &self.provider.regions {
            if let Some(set) = self.directories.get(region).await {
                sets.push(set);
            }
        }
        merge_regions(sets, &self.provider.number_offsets)
    }
}

/// Join raw channel records with the category index and assign unique
/// display numbers, first-seen order winning the original number
pub fn build_directory(
    raw: Vec<RawChannel>,
    categories: &[RawCategory],
    region: &str,
) -> Vec<Channel> {
    let mut category_index: HashMap<&str, &str> = HashMap::new();
    for category in categories {
        for channel_id in &category.channel_ids {
            category_index.insert(channel_id.as_str(), category.name.as_str());
        }
    }

    let mut pool = NumberPool::new();
    let mut directory: Vec<Channel> = raw
        .into_iter()
        .map(|channel| {
            let group = category_index.get(channel.id.as_str()).map(|g| g.to_string());
            let logo = channel
                .images
                .iter()
                .find(|image| image.kind == COLOR_LOGO)
                .map(|image| image.url.clone());
            Channel {
                number: pool.claim(channel.number),
                group,
                logo,
                id: channel.id,
                name: channel.name,
                slug: channel.slug,
                tmsid: channel.tmsid,
                summary: channel.summary,
                region: region.to_string(),
            }
        })
        .collect();

    directory.sort_by_key(|channel| channel.number);
    directory
}

/// Combine per-region channel sets into one globally-unique-numbered set
///
/// Dedup by channel id keeps the first occurrence in concatenation order.
/// Each survivor below its region's configured offset is shifted into that
/// block, then a sequential pass resolves any remaining collisions.
pub fn merge_regions(sets: Vec<Vec<Channel>>, offsets: &HashMap<String, u32>) -> Vec<Channel> {
    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut merged: Vec<Channel> = Vec::new();
    for channel in sets.into_iter().flatten() {
        if seen_ids.insert(channel.id.clone()) {
            merged.push(channel);
        }
    }

    let mut pool = NumberPool::new();
    for channel in &mut merged {
        let mut wanted = channel.number;
        if let Some(offset) = offsets.get(&channel.region) {
            if wanted < *offset {
                wanted += offset;
            }
        }
        channel.number = pool.claim(wanted);
    }
    merged
}
