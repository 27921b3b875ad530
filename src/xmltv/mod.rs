//! XMLTV document rendering
//!
//! Transforms a channel set plus raw timeline batches into an XMLTV guide.
//! The document is built as an escaped string per element, the same way the
//! proxy's playlist output is assembled, with `quick_xml::escape` handling
//! entity escaping (full escaping in attributes, `&<>` only in text so the
//! unescaped quotes survive). Sanitization (control-character stripping, `&quot;`
//! unescaping) happens before escaping.

pub mod categories;

use quick_xml::escape::{escape, partial_escape};

use crate::models::{Channel, SeriesKind, Timeline, TimelineBatch};
use crate::utils::sanitize::{strip_control_chars, unescape_quotes};
use crate::utils::time::{air_date_timestamp, xmltv_date, xmltv_timestamp};
use categories::CategoryMap;

const GENERATOR: &str = "plutotv-proxy";

/// Render the complete guide document for a channel set and its fetched
/// timeline batches
pub fn render_guide(channels: &[Channel], batches: &[TimelineBatch]) -> String {
    let map = CategoryMap::builtin();
    let mut out = String::new();
    out.push_str("<?xml version='1.0' encoding='utf-8'?>\n");
    out.push_str("<!DOCTYPE tv SYSTEM \"xmltv.dtd\">\n");
    out.push_str(&format!(
        "<tv generator-info-name=\"{GENERATOR}\">\n"
    ));

    for channel in channels {
        write_channel(&mut out, channel);
    }
    for batch in batches {
        for entry in &batch.data {
            for timeline in &entry.timelines {
                write_programme(&mut out, &entry.channel_id, timeline, map);
            }
        }
    }

    out.push_str("</tv>\n");
    out
}

fn write_channel(out: &mut String, channel: &Channel) {
    out.push_str(&format!("  <channel id=\"{}\">\n", escape(&channel.id)));
    out.push_str(&format!(
        "    <display-name>{}</display-name>\n",
        partial_escape(&strip_control_chars(&channel.name))
    ));
    if let Some(logo) = &channel.logo {
        out.push_str(&format!("    <icon src=\"{}\"/>\n", escape(logo)));
    }
    out.push_str("  </channel>\n");
}

fn write_programme(out: &mut String, channel_id: &str, timeline: &Timeline, map: &CategoryMap) {
    let episode = &timeline.episode;
    out.push_str(&format!(
        "  <programme channel=\"{}\" start=\"{}\" stop=\"{}\">\n",
        escape(channel_id),
        xmltv_timestamp(timeline.start),
        xmltv_timestamp(timeline.stop)
    ));
    out.push_str(&format!(
        "    <title>{}</title>\n",
        partial_escape(&strip_control_chars(&timeline.title))
    ));

    let release = episode.clip.original_release_date;
    if episode.series.kind == SeriesKind::Live && release == timeline.start {
        out.push_str("    <live/>\n");
    }
    if matches!(episode.series.kind, SeriesKind::Live | SeriesKind::Tv) {
        if let (Some(season), Some(number)) = (episode.season, episode.number) {
            out.push_str(&format!(
                "    <episode-num system=\"onscreen\">S{season:02}E{number:02}</episode-num>\n"
            ));
            out.push_str(&format!(
                "    <episode-num system=\"pluto\">{}</episode-num>\n",
                partial_escape(&episode.id)
            ));
        }
    }
    out.push_str(&format!(
        "    <episode-num system=\"original-air-date\">{}</episode-num>\n",
        air_date_timestamp(release)
    ));

    let description = unescape_quotes(&strip_control_chars(&episode.description));
    out.push_str(&format!("    <desc>{}</desc>\n", partial_escape(&description)));
    if let Some(tile) = &episode.series.tile {
        out.push_str(&format!("    <icon src=\"{}\"/>\n", escape(&tile.path)));
    }
    out.push_str(&format!("    <date>{}</date>\n", xmltv_date(release)));
    out.push_str(&format!(
        "    <series-id system=\"pluto\">{}</series-id>\n",
        partial_escape(&episode.series.id)
    ));

    if timeline.title.to_lowercase() != episode.name.to_lowercase() {
        out.push_str(&format!(
            "    <sub-title>{}</sub-title>\n",
            partial_escape(&strip_control_chars(&episode.name))
        ));
    }

    for category in assemble_categories(timeline, map) {
        out.push_str(&format!(
            "    <category>{}</category>\n",
            partial_escape(&category)
        ));
    }
    out.push_str("  </programme>\n");
}

/// Resolve genre and sub-genre through the category table, add the series
/// type marker, and dedupe preserving first-seen order
fn assemble_categories(timeline: &Timeline, map: &CategoryMap) -> Vec<String> {
    let episode = &timeline.episode;
    let mut categories: Vec<&str> = Vec::new();
    if let Some(genre) = &episode.genre {
        categories.push(map.resolve(genre));
    }
    match episode.series.kind {
        SeriesKind::Tv => categories.push("Series"),
        SeriesKind::Film => categories.push("Movie"),
        _ => {}
    }
    if let Some(sub_genre) = &episode.sub_genre {
        categories.push(map.resolve(sub_genre));
    }

    let mut unique: Vec<String> = Vec::new();
    for category in categories {
        if !unique.iter().any(|c| c == category) {
            unique.push(category.to_string());
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchMeta, ChannelTimelines, Clip, Episode, Series, Tile};
    use chrono::{DateTime, Utc};

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn timeline(title: &str, episode_name: &str, kind: SeriesKind) -> Timeline {
        Timeline {
            title: title.to_string(),
            start: ts("2024-04-18T19:00:00.000Z"),
            stop: ts("2024-04-18T19:30:00.000Z"),
            episode: Episode {
                id: "ep1".to_string(),
                name: episode_name.to_string(),
                description: "A description".to_string(),
                genre: None,
                sub_genre: None,
                season: None,
                number: None,
                clip: Clip {
                    original_release_date: ts("2010-06-01T00:00:00.000Z"),
                },
                series: Series {
                    id: "series1".to_string(),
                    kind,
                    tile: Some(Tile {
                        path: "https://images.example/tile.jpg".to_string(),
                    }),
                },
            },
        }
    }

    fn channel(id: &str, name: &str) -> Channel {
        Channel {
            id: id.to_string(),
            name: name.to_string(),
            slug: "slug".to_string(),
            tmsid: None,
            summary: None,
            group: None,
            region: "local".to_string(),
            number: 100,
            logo: Some("https://images.example/logo.png".to_string()),
        }
    }

    fn batch(channel_id: &str, timelines: Vec<Timeline>) -> TimelineBatch {
        TimelineBatch {
            data: vec![ChannelTimelines {
                channel_id: channel_id.to_string(),
                timelines,
            }],
            meta: BatchMeta {
                end_date_time: ts("2024-04-19T07:00:00.000Z"),
            },
        }
    }

    #[test]
    fn test_document_header_and_channel_elements() {
        let guide = render_guide(&[channel("601", "Test TV")], &[]);
        assert!(guide.starts_with("<?xml version='1.0' encoding='utf-8'?>\n<!DOCTYPE tv SYSTEM \"xmltv.dtd\">\n"));
        assert!(guide.contains("<channel id=\"601\">"));
        assert!(guide.contains("<display-name>Test TV</display-name>"));
        assert!(guide.contains("<icon src=\"https://images.example/logo.png\"/>"));
        assert!(guide.ends_with("</tv>\n"));
    }

    #[test]
    fn test_control_characters_stripped_from_description() {
        let mut tl = timeline("Show", "Show", SeriesKind::Tv);
        tl.episode.description = "before\x02after".to_string();
        let guide = render_guide(&[], &[batch("601", vec![tl])]);
        assert!(guide.contains("<desc>beforeafter</desc>"));
        assert!(!guide.contains('\x02'));
    }

    #[test]
    fn test_quote_entities_unescaped_then_reescaped() {
        let mut tl = timeline("Show", "Show", SeriesKind::Tv);
        tl.episode.description = "He said &quot;hi&quot;".to_string();
        let guide = render_guide(&[], &[batch("601", vec![tl])]);
        // The literal quote character survives; double-escaping does not
        assert!(guide.contains("<desc>He said \"hi\"</desc>"));
    }

    #[test]
    fn test_text_nodes_escape_markup_but_not_quotes() {
        let tl = timeline("Law & Order: <SVU>", "Law & Order: <SVU>", SeriesKind::Tv);
        let guide = render_guide(&[], &[batch("601", vec![tl])]);
        assert!(guide.contains("<title>Law &amp; Order: &lt;SVU&gt;</title>"));
    }

    #[test]
    fn test_sub_title_omitted_when_title_matches_case_insensitively() {
        let tl = timeline("The Show", "THE SHOW", SeriesKind::Tv);
        let guide = render_guide(&[], &[batch("601", vec![tl])]);
        assert!(!guide.contains("<sub-title>"));

        let tl = timeline("The Show", "Pilot", SeriesKind::Tv);
        let guide = render_guide(&[], &[batch("601", vec![tl])]);
        assert!(guide.contains("<sub-title>Pilot</sub-title>"));
    }

    #[test]
    fn test_live_flag_only_when_release_equals_start() {
        let mut tl = timeline("News Now", "News Now", SeriesKind::Live);
        tl.episode.clip.original_release_date = tl.start;
        let guide = render_guide(&[], &[batch("601", vec![tl])]);
        assert!(guide.contains("<live/>"));

        let tl = timeline("News Now", "News Now", SeriesKind::Live);
        let guide = render_guide(&[], &[batch("601", vec![tl])]);
        assert!(!guide.contains("<live/>"));
    }

    #[test]
    fn test_episode_numbering_for_tv_series() {
        let mut tl = timeline("Show", "Show", SeriesKind::Tv);
        tl.episode.season = Some(3);
        tl.episode.number = Some(7);
        let guide = render_guide(&[], &[batch("601", vec![tl])]);
        assert!(guide.contains("<episode-num system=\"onscreen\">S03E07</episode-num>"));
        assert!(guide.contains("<episode-num system=\"pluto\">ep1</episode-num>"));
        assert!(guide.contains(
            "<episode-num system=\"original-air-date\">2010-06-01T00:00:00.000Z</episode-num>"
        ));
        assert!(guide.contains("<date>20100601</date>"));
        assert!(guide.contains("<series-id system=\"pluto\">series1</series-id>"));
    }

    #[test]
    fn test_no_onscreen_numbering_for_films_or_missing_season() {
        let mut tl = timeline("A Movie", "A Movie", SeriesKind::Film);
        tl.episode.season = Some(1);
        tl.episode.number = Some(1);
        let guide = render_guide(&[], &[batch("601", vec![tl])]);
        assert!(!guide.contains("system=\"onscreen\""));

        let tl = timeline("Show", "Show", SeriesKind::Tv);
        let guide = render_guide(&[], &[batch("601", vec![tl])]);
        assert!(!guide.contains("system=\"onscreen\""));
    }

    #[test]
    fn test_programme_timestamps_use_xmltv_format() {
        let tl = timeline("Show", "Show", SeriesKind::Tv);
        let guide = render_guide(&[], &[batch("601", vec![tl])]);
        assert!(guide.contains("start=\"20240418190000 +0000\""));
        assert!(guide.contains("stop=\"20240418193000 +0000\""));
    }

    #[test]
    fn test_category_assembly_order_and_dedup() {
        let mut tl = timeline("Show", "Show", SeriesKind::Tv);
        tl.episode.genre = Some("Crime Drama".to_string());
        tl.episode.sub_genre = Some("Crime Drama".to_string());
        let categories = assemble_categories(&tl, CategoryMap::builtin());
        assert_eq!(categories, vec!["Crime drama", "Series"]);
    }

    #[test]
    fn test_unknown_genre_kept_as_literal_category() {
        let mut tl = timeline("A Movie", "A Movie", SeriesKind::Film);
        tl.episode.genre = Some("Telenovela".to_string());
        let categories = assemble_categories(&tl, CategoryMap::builtin());
        assert_eq!(categories, vec!["Telenovela", "Movie"]);
    }
}
