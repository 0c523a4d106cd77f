use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info};

use super::{AlbumRecord, ArtistRecord, CatalogError, CatalogSource};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com";
pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";

/// Best-match search only ever needs the top result.
const SEARCH_LIMIT: &str = "1";
/// Albums are fetched as a single page of up to this many records.
const ALBUM_PAGE_SIZE: &str = "50";

/// Connection settings for the Spotify Web API. URLs are parameters so tests
/// and alternate deployments can point elsewhere.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub accounts_url: String,
    pub api_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl SpotifyConfig {
    /// Read client credentials from the environment (a `.env` file is
    /// honored if present). The live service URLs are used.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        let client_id =
            std::env::var("SPOTIFY_CLIENT_ID").context("SPOTIFY_CLIENT_ID is not set")?;
        let client_secret =
            std::env::var("SPOTIFY_CLIENT_SECRET").context("SPOTIFY_CLIENT_SECRET is not set")?;
        Ok(Self {
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            client_id,
            client_secret,
        })
    }
}

/// A Spotify catalog handle holding a short-lived bearer token.
/// Constructing one requires a successful token exchange, so entity-level
/// requests cannot be issued before authentication succeeds.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token: String,
}

impl SpotifyClient {
    /// Exchange client credentials for a bearer token. A failed exchange is
    /// fatal for the whole run.
    pub async fn authenticate(http: Client, config: &SpotifyConfig) -> Result<Self, CatalogError> {
        let url = format!("{}/api/token", config.accounts_url);
        let resp = http
            .post(&url)
            .basic_auth(&config.client_id, Some(&config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::AuthFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = resp.json().await?;
        info!("authenticated against spotify accounts service");
        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            token: token.access_token,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl CatalogSource for SpotifyClient {
    async fn search_artist(&self, name: &str) -> Result<ArtistRecord, CatalogError> {
        let url = format!("{}/v1/search", self.api_url);
        debug!(artist = name, "searching artist");
        let body: SearchResponse = self
            .get_json(&url, &[("q", name), ("type", "artist"), ("limit", SEARCH_LIMIT)])
            .await?;

        let artist = body
            .artists
            .items
            .into_iter()
            .next()
            .ok_or_else(|| CatalogError::ArtistNotFound(name.to_string()))?;

        Ok(ArtistRecord {
            artist_id: artist.id,
            name: artist.name,
            followers: artist.followers.total,
            popularity: artist.popularity,
            genres: artist.genres.join(", "),
        })
    }

    async fn artist_albums(&self, artist_id: &str) -> Result<Vec<AlbumRecord>, CatalogError> {
        let url = format!("{}/v1/artists/{}/albums", self.api_url, artist_id);
        debug!(artist_id, "listing albums");
        let page: AlbumsPage = self.get_json(&url, &[("limit", ALBUM_PAGE_SIZE)]).await?;

        Ok(page
            .items
            .into_iter()
            .map(|album| AlbumRecord {
                album_id: album.id,
                name: album.name,
                release_date: album.release_date,
                total_tracks: album.total_tracks,
                album_type: album.album_type,
                artist_id: artist_id.to_string(),
            })
            .collect())
    }
}

async fn check_status(resp: Response) -> Result<Response, CatalogError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(CatalogError::Api { status, body })
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    artists: ArtistPage,
}

#[derive(Deserialize)]
struct ArtistPage {
    items: Vec<ArtistItem>,
}

#[derive(Deserialize)]
struct ArtistItem {
    id: String,
    name: String,
    followers: Followers,
    popularity: i32,
    genres: Vec<String>,
}

#[derive(Deserialize)]
struct Followers {
    total: i64,
}

#[derive(Deserialize)]
struct AlbumsPage {
    items: Vec<AlbumItem>,
}

#[derive(Deserialize)]
struct AlbumItem {
    id: String,
    name: String,
    release_date: String,
    total_tracks: i32,
    album_type: String,
}
