//! M3U playlist rendering and stream URL construction
//!
//! Every channel gets one `#EXTINF` entry pointing at the provider's
//! stitcher. A handful of DRM-protected channel ids need the JWT play-out
//! form carrying the session token and stitching parameters; everything
//! else uses the anonymous device-parameter form.

use uuid::Uuid;

use crate::models::{Channel, Session};
use crate::utils::sanitize::strip_control_chars;

pub const STITCHER_BASE: &str = "https://cfd-v4-service-channel-stitcher-use1-1.prd.pluto.tv";

/// Channel ids whose play-out URL requires the session JWT
const JWT_REQUIRED: &[&str] = &[
    "625f054c5dfea70007244612",
    "625f04253e5f6c000708f3b7",
    "5421f71da6af422839419cb3",
];

/// How the `channel-id` attribute is written, for compatibility with
/// different guide consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelIdFormat {
    /// `pluto-{slug}` (default)
    #[default]
    ProviderSlug,
    /// `pluto-{id}` (i.mjh.nz compatibility)
    ProviderId,
    /// `{slug}` (maddox compatibility)
    SlugOnly,
}

impl ChannelIdFormat {
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(|v| v.to_lowercase()).as_deref() {
            Some("id") => ChannelIdFormat::ProviderId,
            Some("slug_only") => ChannelIdFormat::SlugOnly,
            _ => ChannelIdFormat::ProviderSlug,
        }
    }

    fn channel_id(&self, channel: &Channel) -> String {
        match self {
            ChannelIdFormat::ProviderSlug => format!("pluto-{}", channel.slug),
            ChannelIdFormat::ProviderId => format!("pluto-{}", channel.id),
            ChannelIdFormat::SlugOnly => channel.slug.clone(),
        }
    }
}

/// Render the playlist for a channel set, ascending by display number
///
/// A fresh `sid` is generated per render; the device id is stable for the
/// process lifetime.
pub fn render_playlist(
    channels: &[Channel],
    format: ChannelIdFormat,
    device_id: Uuid,
) -> String {
    let sid = Uuid::new_v4();
    let mut ordered: Vec<&Channel> = channels.iter().collect();
    ordered.sort_by_key(|c| c.number);

    let mut m3u = String::from("#EXTM3U\r\n\r\n");
    for channel in ordered {
        m3u.push_str(&format!(
            "#EXTINF:-1 channel-id=\"{}\"",
            format.channel_id(channel)
        ));
        m3u.push_str(&format!(" tvg-id=\"{}\"", channel.id));
        m3u.push_str(&format!(" tvg-chno=\"{}\"", channel.number));
        if let Some(group) = &channel.group {
            m3u.push_str(&format!(" group-title=\"{group}\""));
        }
        if let Some(logo) = &channel.logo {
            m3u.push_str(&format!(" tvg-logo=\"{logo}\""));
        }
        if let Some(tmsid) = &channel.tmsid {
            m3u.push_str(&format!(" tvg-name=\"{tmsid}\""));
        }
        m3u.push_str(&format!(" tvc-guide-title=\"{}\"", channel.name));
        if let Some(summary) = &channel.summary {
            m3u.push_str(&format!(
                " tvc-guide-description=\"{}\"",
                strip_control_chars(summary)
            ));
        }
        m3u.push_str(&format!(",{}\n", channel.name));
        m3u.push_str(&anonymous_stream_url(&channel.id, device_id, sid, false));
        m3u.push_str("\n\n");
    }
    m3u
}

/// Whether a channel id needs the JWT play-out form
pub fn requires_jwt(channel_id: &str) -> bool {
    JWT_REQUIRED.contains(&channel_id)
}

/// Build the play-out URL for one channel, JWT-aware
pub fn stream_url(
    channel_id: &str,
    device_id: Uuid,
    session: Option<&Session>,
) -> String {
    if requires_jwt(channel_id) {
        if let Some(session) = session {
            return format!(
                "{STITCHER_BASE}/v2/stitch/hls/channel/{channel_id}/master.m3u8?{}&jwt={}&masterJWTPassthrough=true&includeExtendedEvents=true",
                session.stitcher_params, session.token
            );
        }
    }
    anonymous_stream_url(channel_id, device_id, Uuid::new_v4(), true)
}

fn anonymous_stream_url(
    channel_id: &str,
    device_id: Uuid,
    sid: Uuid,
    server_side_ads: bool,
) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("advertisingId", "")
        .append_pair("appName", "web")
        .append_pair("appVersion", "unknown")
        .append_pair("appStoreUrl", "")
        .append_pair("architecture", "")
        .append_pair("buildVersion", "")
        .append_pair("clientTime", "0")
        .append_pair("deviceDNT", "0")
        .append_pair("deviceId", &device_id.to_string())
        .append_pair("deviceMake", "Chrome")
        .append_pair("deviceModel", "web")
        .append_pair("deviceType", "web")
        .append_pair("deviceVersion", "unknown")
        .append_pair("includeExtendedEvents", "false")
        .append_pair("sid", &sid.to_string())
        .append_pair("userId", "")
        .append_pair("serverSideAds", if server_side_ads { "true" } else { "false" })
        .finish();
    format!("{STITCHER_BASE}/stitch/hls/channel/{channel_id}/master.m3u8?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn channel(id: &str, slug: &str, number: u32) -> Channel {
        Channel {
            id: id.to_string(),
            name: format!("Channel {id}"),
            slug: slug.to_string(),
            tmsid: None,
            summary: None,
            group: Some("News".to_string()),
            region: "local".to_string(),
            number,
            logo: None,
        }
    }

    #[test]
    fn test_channel_id_formats() {
        let ch = channel("601", "test-tv", 100);
        assert_eq!(
            ChannelIdFormat::ProviderSlug.channel_id(&ch),
            "pluto-test-tv"
        );
        assert_eq!(ChannelIdFormat::ProviderId.channel_id(&ch), "pluto-601");
        assert_eq!(ChannelIdFormat::SlugOnly.channel_id(&ch), "test-tv");
    }

    #[test]
    fn test_format_from_query() {
        assert_eq!(
            ChannelIdFormat::from_query(None),
            ChannelIdFormat::ProviderSlug
        );
        assert_eq!(
            ChannelIdFormat::from_query(Some("ID")),
            ChannelIdFormat::ProviderId
        );
        assert_eq!(
            ChannelIdFormat::from_query(Some("slug_only")),
            ChannelIdFormat::SlugOnly
        );
        assert_eq!(
            ChannelIdFormat::from_query(Some("bogus")),
            ChannelIdFormat::ProviderSlug
        );
    }

    #[test]
    fn test_playlist_entries_sorted_by_number() {
        let channels = vec![channel("2", "two", 20), channel("1", "one", 10)];
        let m3u = render_playlist(&channels, ChannelIdFormat::default(), Uuid::new_v4());
        assert!(m3u.starts_with("#EXTM3U\r\n\r\n"));
        let one = m3u.find("pluto-one").unwrap();
        let two = m3u.find("pluto-two").unwrap();
        assert!(one < two);
    }

    #[test]
    fn test_playlist_entry_attributes() {
        let device_id = Uuid::new_v4();
        let mut ch = channel("601", "test-tv", 100);
        ch.summary = Some("About\x02 the channel".to_string());
        let m3u = render_playlist(&[ch], ChannelIdFormat::default(), device_id);
        assert!(m3u.contains("tvg-id=\"601\""));
        assert!(m3u.contains("tvg-chno=\"100\""));
        assert!(m3u.contains("group-title=\"News\""));
        assert!(m3u.contains("tvc-guide-description=\"About the channel\""));
        // No logo or tmsid on this channel, so those attributes are absent
        assert!(!m3u.contains("tvg-logo"));
        assert!(!m3u.contains("tvg-name"));
        assert!(m3u.contains(&format!("deviceId={device_id}")));
        assert!(m3u.contains("/stitch/hls/channel/601/master.m3u8?"));
        assert!(m3u.contains("serverSideAds=false"));
    }

    #[test]
    fn test_stream_url_anonymous() {
        let url = stream_url("601", Uuid::new_v4(), None);
        assert!(url.starts_with(STITCHER_BASE));
        assert!(url.contains("/stitch/hls/channel/601/master.m3u8?"));
        assert!(!url.contains("jwt="));
    }

    #[test]
    fn test_stream_url_jwt_channel_with_session() {
        let session = Session {
            region: "local".to_string(),
            token: "tok123".to_string(),
            stitcher_params: "a=1&b=2".to_string(),
            obtained_at: Utc::now(),
        };
        let url = stream_url("625f054c5dfea70007244612", Uuid::new_v4(), Some(&session));
        assert!(url.contains("/v2/stitch/hls/channel/625f054c5dfea70007244612/master.m3u8?"));
        assert!(url.contains("a=1&b=2"));
        assert!(url.contains("jwt=tok123"));
        assert!(url.contains("masterJWTPassthrough=true"));
    }

    #[test]
    fn test_stream_url_jwt_channel_without_session_falls_back() {
        let url = stream_url("625f054c5dfea70007244612", Uuid::new_v4(), None);
        assert!(!url.contains("jwt="));
        assert!(url.contains("serverSideAds=true"));
    }
}
