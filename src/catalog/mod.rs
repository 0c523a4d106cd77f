// src/catalog/mod.rs

pub mod spotify;

use std::sync::Arc;

use arrow::{
    array::{ArrayRef, Int32Array, Int64Array, StringArray},
    error::ArrowError,
    record_batch::RecordBatch,
};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("no matching artist for {0:?}")]
    ArtistNotFound(String),

    #[error("api request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// One matched artist, flattened for columnar output.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRecord {
    pub artist_id: String,
    pub name: String,
    pub followers: i64,
    pub popularity: i32,
    pub genres: String,
}

/// One release belonging to an artist, tagged with the owning artist id.
#[derive(Debug, Clone, PartialEq)]
pub struct AlbumRecord {
    pub album_id: String,
    pub name: String,
    pub release_date: String,
    pub total_tracks: i32,
    pub album_type: String,
    pub artist_id: String,
}

/// A remote music catalog: look up one best-match artist by display name,
/// then list the releases for a matched artist id.
#[async_trait]
pub trait CatalogSource {
    async fn search_artist(&self, name: &str) -> Result<ArtistRecord, CatalogError>;
    async fn artist_albums(&self, artist_id: &str) -> Result<Vec<AlbumRecord>, CatalogError>;
}

/// Fetch artists and their albums for every requested name, sequentially.
/// A failed search or listing skips that artist only; the batch continues.
pub async fn collect<S: CatalogSource + ?Sized>(
    source: &S,
    names: &[&str],
) -> (Vec<ArtistRecord>, Vec<AlbumRecord>) {
    let mut artists = Vec::new();
    let mut albums = Vec::new();

    for &name in names {
        let artist = match source.search_artist(name).await {
            Ok(artist) => artist,
            Err(e) => {
                warn!(artist = name, error = %e, "skipping artist: search failed");
                continue;
            }
        };

        match source.artist_albums(&artist.artist_id).await {
            Ok(mut found) => {
                info!(artist = %artist.name, albums = found.len(), "retrieved albums");
                albums.append(&mut found);
            }
            Err(e) => {
                warn!(artist = %artist.name, error = %e, "album listing failed");
            }
        }
        artists.push(artist);
    }

    (artists, albums)
}

pub fn artists_to_batch(records: &[ArtistRecord]) -> Result<RecordBatch, ArrowError> {
    RecordBatch::try_from_iter(vec![
        (
            "artist_id",
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.artist_id.as_str()),
            )) as ArrayRef,
        ),
        (
            "name",
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.name.as_str()),
            )) as ArrayRef,
        ),
        (
            "followers",
            Arc::new(Int64Array::from_iter_values(
                records.iter().map(|r| r.followers),
            )) as ArrayRef,
        ),
        (
            "popularity",
            Arc::new(Int32Array::from_iter_values(
                records.iter().map(|r| r.popularity),
            )) as ArrayRef,
        ),
        (
            "genres",
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.genres.as_str()),
            )) as ArrayRef,
        ),
    ])
}

pub fn albums_to_batch(records: &[AlbumRecord]) -> Result<RecordBatch, ArrowError> {
    RecordBatch::try_from_iter(vec![
        (
            "album_id",
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.album_id.as_str()),
            )) as ArrayRef,
        ),
        (
            "name",
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.name.as_str()),
            )) as ArrayRef,
        ),
        (
            "release_date",
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.release_date.as_str()),
            )) as ArrayRef,
        ),
        (
            "total_tracks",
            Arc::new(Int32Array::from_iter_values(
                records.iter().map(|r| r.total_tracks),
            )) as ArrayRef,
        ),
        (
            "album_type",
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.album_type.as_str()),
            )) as ArrayRef,
        ),
        (
            "artist_id",
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.artist_id.as_str()),
            )) as ArrayRef,
        ),
    ])
}
