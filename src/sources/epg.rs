//! EPG window fetching and cross-region occurrence capping
//!
//! Timelines are fetched in consecutive fixed-duration windows, each window
//! split into fixed-size channel-id groups to respect the upstream batch
//! limit. Windows chain: the next window starts at the previous batch's
//! reported end time, truncated to the top of the hour. Any single request
//! failure aborts the whole fetch; the caller retries on the next refresh
//! cycle.

use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info};

use super::PlutoClient;
use crate::errors::SourceResult;
use crate::models::TimelineBatch;
use crate::utils::time::{format_window_start, truncate_to_hour};

const TIMELINES_URL: &str = "https://service-channels.clusters.pluto.tv/v2/guide/timelines";

impl PlutoClient {
    /// Fetch the configured number of consecutive EPG windows for a region
    ///
    /// Rebuilds the region's channel directory first so the id list is
    /// current. The fetched batches replace the region's cached EPG data.
    pub async fn fetch_epg(&self, region: &str) -> SourceResult<Vec<TimelineBatch>> {
        let session = self.session(region).await?;
        let directory = self.channels(region).await?;
        let ids: Vec<&str> = directory.iter().map(|c| c.id.as_str()).collect();

        let duration = self.provider.window_minutes.to_string();
        let mut start = truncate_to_hour(Utc::now());
        let mut batches: Vec<TimelineBatch> = Vec::new();

        for _ in 0..self.provider.window_count {
            let window_start = format_window_start(start);
            info!("Retrieving {} EPG data for {}", region, window_start);

            let mut window_end = None;
            for group in ids.chunks(self.provider.group_size) {
                let req = self
                    .base_request(TIMELINES_URL, region)
                    .bearer_auth(&session.token)
                    .query(&[
                        ("start", window_start.as_str()),
                        ("channelIds", group.join(",").as_str()),
                        ("duration", duration.as_str()),
                    ]);
                let batch: TimelineBatch = Self::send_json(TIMELINES_URL, req).await?;
                window_end = Some(batch.meta.end_date_time);
                batches.push(batch);
            }

            match window_end {
                Some(end) => start = truncate_to_hour(end),
                // No channel ids means no further windows either
                None => break,
            }
        }

        debug!("Fetched {} timeline batches for {}", batches.len(), region);
        self.epg.replace(region.to_string(), batches.clone()).await;
        Ok(batches)
    }

    /// Last fetched EPG batches for a region, if any
    pub async fn cached_epg(&self, region: &str) -> Option<Vec<TimelineBatch>> {
        self.epg.get(&region.to_string()).await
    }
}

/// Cap per-channel occurrences across the concatenated multi-region batches
///
/// A channel shared between regions shows up once per window per region;
/// keeping more than `window_count` occurrences would duplicate its
/// programme spans in the combined guide. Occurrences are counted in strict
/// concatenation order and the first `window_count` win, wherever they fall.
pub fn dedupe_across_regions(
    batches: Vec<TimelineBatch>,
    window_count: usize,
) -> Vec<TimelineBatch> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    batches
        .into_iter()
        .map(|mut batch| {
            batch.data.retain(|entry| {
                let count = seen.entry(entry.channel_id.clone()).or_insert(0);
                if *count < window_count {
                    *count += 1;
                    true
                } else {
                    false
                }
            });
            batch
        })
        .collect()
}
