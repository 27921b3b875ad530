//! Periodic guide refresh
//!
//! On startup and on every refresh interval, rebuilds each configured
//! region's guide and the combined "all" guide. A failed region leaves its
//! previously built artifact in place; the job logs the failure and moves
//! on. Artifacts are only replaced after a complete, successful build.

use chrono::{DateTime, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::cache::ReplaceCache;
use crate::errors::{AppError, AppResult};
use crate::sources::PlutoClient;
use crate::sources::epg::dedupe_across_regions;
use crate::xmltv::render_guide;

/// A rendered guide plus its gzip variant, replaced atomically per rebuild
pub struct GuideArtifact {
    pub xml: String,
    pub gzip: Vec<u8>,
    pub generated_at: DateTime<Utc>,
}

/// In-memory store of rendered guides, keyed by region (or "all")
pub type GuideStore = ReplaceCache<String, Arc<GuideArtifact>>;

fn make_artifact(xml: String) -> AppResult<GuideArtifact> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(xml.as_bytes())
        .and_then(|_| encoder.finish())
        .map(|gzip| GuideArtifact {
            xml,
            gzip,
            generated_at: Utc::now(),
        })
        .map_err(|e| AppError::internal(format!("gzip compression failed: {e}")))
}

/// Build one region's guide: fetch EPG windows (which rebuilds the channel
/// directory) and render the document
pub async fn build_region_guide(client: &PlutoClient, region: &str) -> AppResult<GuideArtifact> {
    let batches = client.fetch_epg(region).await?;
    let channels = client
        .cached_directory(region)
        .await
        .ok_or_else(|| AppError::internal(format!("no directory cached for {region}")))?;
    make_artifact(render_guide(&channels, &batches))
}

/// Build the combined guide across all configured regions
///
/// Uses each region's batches from this refresh cycle (fetching any region
/// that has none yet), caps duplicate channel occurrences at the window
/// count, and renders against the merged directory.
pub async fn build_combined_guide(client: &PlutoClient) -> AppResult<GuideArtifact> {
    let regions = client.provider().regions.clone();
    let window_count = client.provider().window_count;

    let mut all_batches = Vec::new();
    for region in &regions {
        let batches = match client.cached_epg(region).await {
            Some(batches) => batches,
            None => client.fetch_epg(region).await?,
        };
        all_batches.extend(batches);
    }

    let deduped = dedupe_across_regions(all_batches, window_count);
    let channels = client.channels_all().await;
    make_artifact(render_guide(&channels, &deduped))
}

/// One full refresh pass over every region plus the combined guide
pub async fn refresh_all(client: &PlutoClient, store: &GuideStore) {
    let regions = client.provider().regions.clone();

    let builds = regions.iter().map(|region| async {
        (region.clone(), build_region_guide(client, region).await)
    });
    for (region, result) in futures::future::join_all(builds).await {
        match result {
            Ok(artifact) => {
                info!(
                    "Built guide for {}: {} bytes ({} gzipped)",
                    region,
                    artifact.xml.len(),
                    artifact.gzip.len()
                );
                store.replace(region, Arc::new(artifact)).await;
            }
            Err(e) => warn!("Guide build failed for {}: {}", region, e),
        }
    }

    match build_combined_guide(client).await {
        Ok(artifact) => {
            info!(
                "Built combined guide: {} bytes ({} gzipped)",
                artifact.xml.len(),
                artifact.gzip.len()
            );
            store.replace("all".to_string(), Arc::new(artifact)).await;
        }
        Err(e) => error!("Combined guide build failed: {}", e),
    }
}

/// Run the refresh loop forever: one pass immediately, then one per interval
pub async fn run(client: Arc<PlutoClient>, store: Arc<GuideStore>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        refresh_all(&client, &store).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_artifact_gzip_round_trips() {
        let artifact = make_artifact("<tv></tv>".to_string()).unwrap();
        let mut decoder = GzDecoder::new(artifact.gzip.as_slice());
        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, "<tv></tv>");
    }
}
