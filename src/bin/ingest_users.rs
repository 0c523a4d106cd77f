use std::path::Path;

use anyhow::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;
use tunelake::ingest::{self, DatasetSpec};

const RAW_DATA: &str = "data_lake/raw/users.csv";
const PROCESSED_PATH: &str = "data_lake/processed/users.parquet";
const EXPECTED_COLUMNS: &[&str] = &["user_id", "name", "email", "signup_date", "country"];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let spec = DatasetSpec {
        name: "users",
        source: Path::new(RAW_DATA),
        output: Path::new(PROCESSED_PATH),
        expected_columns: EXPECTED_COLUMNS,
        trim_columns: &["name", "email"],
        date_columns: &["signup_date"],
    };

    if let Err(e) = ingest::run(&spec) {
        error!(dataset = spec.name, error = %e, "ingestion failed");
        return Err(e.into());
    }
    Ok(())
}
