//! Route handlers

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect};
use axum::Json;
use serde::Deserialize;

use super::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::Channel;
use crate::playlist::{self, ChannelIdFormat};

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Landing page listing the playlist and guide URLs per configured region
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");

    let mut list = String::new();
    let mut regions: Vec<&str> = vec!["all"];
    regions.extend(state.config.provider.regions.iter().map(|r| r.as_str()));
    for region in regions {
        list.push_str(&format!(
            "<li>{region}: <a href=\"http://{host}/{region}/playlist.m3u\">playlist.m3u</a> \
             | <a href=\"http://{host}/epg/epg-{region}.xml\">epg-{region}.xml</a> \
             | <a href=\"http://{host}/epg/epg-{region}.xml.gz\">epg-{region}.xml.gz</a></li>\n"
        ));
    }

    Html(format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <title>Pluto TV Playlist</title></head>\
         <body><h1>Pluto TV Playlist</h1><ul>{list}</ul></body></html>"
    ))
}

#[derive(Debug, Deserialize)]
pub struct PlaylistQuery {
    pub channel_id_format: Option<String>,
}

async fn channel_set(state: &AppState, region: &str) -> AppResult<Vec<Channel>> {
    if !state.config.knows_region(region) {
        return Err(AppError::unknown_region(region));
    }
    if region == "all" {
        Ok(state.client.channels_all().await)
    } else {
        Ok(state.client.channels(region).await?)
    }
}

pub async fn playlist(
    State(state): State<AppState>,
    Path(region): Path<String>,
    Query(query): Query<PlaylistQuery>,
) -> AppResult<impl IntoResponse> {
    let channels = channel_set(&state, &region).await?;
    let format = ChannelIdFormat::from_query(query.channel_id_format.as_deref());
    let m3u = playlist::render_playlist(&channels, format, state.client.device_id());
    Ok((
        [(header::CONTENT_TYPE, "audio/x-mpegurl")],
        m3u,
    ))
}

pub async fn channels_json(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> AppResult<Json<Vec<Channel>>> {
    Ok(Json(channel_set(&state, &region).await?))
}

pub async fn session_json(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !state.config.knows_region(&region) || region == "all" {
        return Err(AppError::unknown_region(&region));
    }
    let session = state.client.session(&region).await?;
    Ok(Json(session))
}

/// Redirect to the stitcher play-out URL for one channel
pub async fn watch(
    State(state): State<AppState>,
    Path((region, id)): Path<(String, String)>,
) -> AppResult<Redirect> {
    if !state.config.knows_region(&region) || region == "all" {
        return Err(AppError::unknown_region(&region));
    }
    // Only DRM channels need the session; everything else streams anonymously
    let session = if playlist::requires_jwt(&id) {
        Some(state.client.session(&region).await?)
    } else {
        None
    };
    let url = playlist::stream_url(&id, state.client.device_id(), session.as_ref());
    Ok(Redirect::temporary(&url))
}

/// Serve a rendered guide artifact: `epg-{region}.xml` or `.xml.gz`
pub async fn epg_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    let (region, gzip) = parse_guide_filename(&filename)
        .ok_or_else(|| AppError::not_found(filename.clone()))?;
    if !state.config.knows_region(region) {
        return Err(AppError::unknown_region(region));
    }

    let artifact = state
        .guides
        .get(&region.to_string())
        .await
        .ok_or_else(|| AppError::not_found(format!("guide for {region} not built yet")))?;

    let response = if gzip {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/gzip")],
            artifact.gzip.clone(),
        )
    } else {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/xml")],
            artifact.xml.clone().into_bytes(),
        )
    };
    Ok(response)
}

fn parse_guide_filename(filename: &str) -> Option<(&str, bool)> {
    let stem = filename.strip_prefix("epg-")?;
    if let Some(region) = stem.strip_suffix(".xml.gz") {
        Some((region, true))
    } else {
        stem.strip_suffix(".xml").map(|region| (region, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_guide_filename() {
        assert_eq!(parse_guide_filename("epg-uk.xml"), Some(("uk", false)));
        assert_eq!(parse_guide_filename("epg-all.xml.gz"), Some(("all", true)));
        assert_eq!(parse_guide_filename("epg-us_east.xml"), Some(("us_east", false)));
        assert_eq!(parse_guide_filename("playlist.m3u"), None);
        assert_eq!(parse_guide_filename("epg-uk.json"), None);
    }
}
