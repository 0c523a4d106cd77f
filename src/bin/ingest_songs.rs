use std::path::Path;

use anyhow::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;
use tunelake::ingest::{self, DatasetSpec};

const RAW_DATA: &str = "data_lake/raw/songs.csv";
const PROCESSED_PATH: &str = "data_lake/processed/songs.parquet";
const EXPECTED_COLUMNS: &[&str] = &["song_id", "title", "artist_name", "duration", "release_date"];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let spec = DatasetSpec {
        name: "songs",
        source: Path::new(RAW_DATA),
        output: Path::new(PROCESSED_PATH),
        expected_columns: EXPECTED_COLUMNS,
        // duration is an mm:ss string; keep it trimmed alongside the names
        trim_columns: &["title", "artist_name", "duration"],
        date_columns: &["release_date"],
    };

    if let Err(e) = ingest::run(&spec) {
        error!(dataset = spec.name, error = %e, "ingestion failed");
        return Err(e.into());
    }
    Ok(())
}
