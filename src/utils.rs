use std::collections::HashSet;

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::types::{
    AlbumObject, ArtistRef, Image, ItemKind, ResultTableRow, SearchResponse, SearchResultItem,
    TrackObject,
};

/// Raw results requested per kind from the search endpoint.
pub const PER_KIND_LIMIT: usize = 5;
/// Upper bound of items the proxy returns.
pub const MAX_RESULTS: usize = 10;
/// Unique items a client shows.
pub const DISPLAY_LIMIT: usize = 5;

pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{client_id}:{client_secret}"))
    )
}

fn join_artists(artists: &[ArtistRef]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn first_image(images: &[Image]) -> Option<String> {
    images
        .first()
        .map(|i| i.url.clone())
        .filter(|url| !url.is_empty())
}

/// First four characters of a release date ("1971-06-22", "1971-06" or "1971").
pub fn release_year(release_date: Option<&str>) -> Option<String> {
    release_date
        .map(|d| d.chars().take(4).collect::<String>())
        .filter(|y| !y.is_empty())
}

pub fn album_to_item(album: AlbumObject) -> SearchResultItem {
    SearchResultItem {
        artist: join_artists(&album.artists),
        image: first_image(&album.images),
        year: release_year(album.release_date.as_deref()),
        popularity: album.popularity.unwrap_or(0),
        id: album.id,
        kind: ItemKind::Album,
        title: album.name,
        spotify_url: album.external_urls.spotify,
    }
}

/// Tracks take their artwork and year from the album they belong to.
pub fn track_to_item(track: TrackObject) -> SearchResultItem {
    SearchResultItem {
        artist: join_artists(&track.artists),
        image: first_image(&track.album.images),
        year: release_year(track.album.release_date.as_deref()),
        popularity: track.popularity.unwrap_or(0),
        id: track.id,
        kind: ItemKind::Track,
        title: track.name,
        spotify_url: track.external_urls.spotify,
    }
}

/// Alternates both sequences index by index, `primary` first, and appends
/// whatever is left of the longer one.
pub fn interleave<T>(primary: Vec<T>, secondary: Vec<T>) -> Vec<T> {
    let mut combined = Vec::with_capacity(primary.len() + secondary.len());
    let mut primary = primary.into_iter();
    let mut secondary = secondary.into_iter();

    loop {
        let p = primary.next();
        let s = secondary.next();
        if p.is_none() && s.is_none() {
            break;
        }
        combined.extend(p);
        combined.extend(s);
    }

    combined
}

/// Maps a raw search response into at most [`MAX_RESULTS`] items, tracks
/// first at every index.
pub fn shape_results(response: SearchResponse) -> Vec<SearchResultItem> {
    let albums: Vec<SearchResultItem> = response
        .albums
        .items
        .into_iter()
        .take(PER_KIND_LIMIT)
        .map(album_to_item)
        .collect();

    let tracks: Vec<SearchResultItem> = response
        .tracks
        .items
        .into_iter()
        .take(PER_KIND_LIMIT)
        .map(track_to_item)
        .collect();

    let mut combined = interleave(tracks, albums);
    combined.truncate(MAX_RESULTS);
    combined
}

/// Keeps the first occurrence of every id and stops after [`DISPLAY_LIMIT`]
/// unique items.
///
/// The key is the id alone. A track and an album that share an id collapse
/// into whichever arrived first.
pub fn dedupe_for_display(items: Vec<SearchResultItem>) -> Vec<SearchResultItem> {
    let mut seen_ids = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen_ids.insert(item.id.clone()))
        .take(DISPLAY_LIMIT)
        .collect()
}

pub fn to_table_rows(items: &[SearchResultItem]) -> Vec<ResultTableRow> {
    items
        .iter()
        .map(|item| ResultTableRow {
            kind: item.kind.to_string().to_uppercase(),
            title: item.title.clone(),
            artist: item.artist.clone(),
            year: item.year.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect()
}
