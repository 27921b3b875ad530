//! Pluto TV provider client
//!
//! One handler struct owns the HTTP client and the process-wide caches:
//! sessions (TTL), per-region channel directories and EPG batches (full
//! replace on rebuild). Endpoint-specific fetch logic lives in the
//! submodules as further `impl PlutoClient` blocks.

pub mod channels;
pub mod epg;
pub mod session;

use chrono::Duration as ChronoDuration;
use reqwest::{Client, RequestBuilder, header};
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::{ReplaceCache, TtlCache};
use crate::config::ProviderConfig;
use crate::errors::{SourceError, SourceResult};
use crate::models::{Channel, Session, TimelineBatch};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Hours a cached session stays fresh
const SESSION_TTL_HOURS: i64 = 4;

/// Per-region network-origin override attached to provider requests
fn forwarded_for(region: &str) -> Option<&'static str> {
    match region {
        "local" => Some(""),
        "uk" => Some("178.238.11.6"),
        "ca" => Some("192.206.151.131"),
        "us_east" => Some("108.82.206.181"),
        "us_west" => Some("76.81.9.69"),
        _ => None,
    }
}

pub struct PlutoClient {
    http: Client,
    /// Stable for the process lifetime; identifies this "device" to the
    /// stitcher
    device_id: Uuid,
    provider: ProviderConfig,
    sessions: TtlCache<String, Session>,
    directories: ReplaceCache<String, Vec<Channel>>,
    epg: ReplaceCache<String, Vec<TimelineBatch>>,
}

impl PlutoClient {
    pub fn new(provider: ProviderConfig) -> Self {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            device_id: Uuid::new_v4(),
            provider,
            sessions: TtlCache::new(ChronoDuration::hours(SESSION_TTL_HOURS)),
            directories: ReplaceCache::new(),
            epg: ReplaceCache::new(),
        }
    }

    pub fn device_id(&self) -> Uuid {
        self.device_id
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    /// Request with the browser-like header set the provider expects,
    /// plus the region's network-origin override
    fn base_request(&self, url: &str, region: &str) -> RequestBuilder {
        let mut req = self
            .http
            .get(url)
            .header(header::ACCEPT, "*/*")
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(header::ORIGIN, "https://pluto.tv")
            .header(header::REFERER, "https://pluto.tv/")
            .header(header::USER_AGENT, USER_AGENT);
        if let Some(addr) = forwarded_for(region) {
            req = req.header("X-Forwarded-For", addr);
        }
        req
    }

    /// Send a request and decode a 2xx JSON body, mapping the three
    /// upstream failure kinds onto [`SourceError`]
    async fn send_json<T: DeserializeOwned>(url: &str, req: RequestBuilder) -> SourceResult<T> {
        let response = req
            .send()
            .await
            .map_err(|e| SourceError::transport(url, &e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::upstream_status(url, status.as_u16(), body));
        }
        response
            .json()
            .await
            .map_err(|e| SourceError::decode(url, &e))
    }
}
