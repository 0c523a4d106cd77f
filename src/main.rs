use anyhow::Result;
use reqwest::Client;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use tunelake::catalog::{
    self,
    spotify::{SpotifyClient, SpotifyConfig},
};
use tunelake::ingest::write;

const ARTIST_NAMES: &[&str] = &["Taylor Swift", "Linkin Park", "Ariana Grande"];

const ARTIST_OUTPUT_PATH: &str = "data_lake/processed/spotify_artists.parquet";
const ALBUM_OUTPUT_PATH: &str = "data_lake/processed/spotify_albums.parquet";

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("starting spotify extraction");

    // ─── 2) authenticate once; a failure here aborts the run ─────────
    let config = SpotifyConfig::from_env()?;
    let source = match SpotifyClient::authenticate(Client::new(), &config).await {
        Ok(source) => source,
        Err(e) => {
            error!(error = %e, "authentication failed");
            return Err(e.into());
        }
    };

    // ─── 3) fetch artists + albums, isolating per-artist failures ────
    let (artists, albums) = catalog::collect(&source, ARTIST_NAMES).await;
    info!(
        artists = artists.len(),
        albums = albums.len(),
        "collected catalog records"
    );

    // ─── 4) write the two artifacts independently ────────────────────
    let artist_batch = catalog::artists_to_batch(&artists)?;
    write::write_parquet(&artist_batch, ARTIST_OUTPUT_PATH)?;
    info!(path = ARTIST_OUTPUT_PATH, "saved artist artifact");

    let album_batch = catalog::albums_to_batch(&albums)?;
    write::write_parquet(&album_batch, ALBUM_OUTPUT_PATH)?;
    info!(path = ALBUM_OUTPUT_PATH, "saved album artifact");

    info!("spotify extraction complete");
    Ok(())
}
