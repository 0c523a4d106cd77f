// src/ingest/mod.rs

pub mod clean;
pub mod dates;
pub mod read;
pub mod validate;
pub mod write;

use std::path::Path;

use tracing::info;

use crate::error::IngestError;

/// Everything an entry point needs to say about one dataset.
/// Paths and column rules are fixed per dataset; nothing is mutated at runtime.
#[derive(Debug, Clone, Copy)]
pub struct DatasetSpec<'a> {
    pub name: &'a str,
    pub source: &'a Path,
    pub output: &'a Path,
    /// Columns that must be present in the source, checked before cleaning.
    pub expected_columns: &'a [&'a str],
    /// String columns whose values get leading/trailing whitespace removed.
    pub trim_columns: &'a [&'a str],
    /// Columns parsed as dates; unparsable values become nulls.
    pub date_columns: &'a [&'a str],
}

/// Run the full read → validate → clean → write pipeline for one dataset.
#[tracing::instrument(level = "info", skip(spec), fields(dataset = spec.name))]
pub fn run(spec: &DatasetSpec<'_>) -> Result<(), IngestError> {
    info!(source = %spec.source.display(), "starting ingestion");

    let raw = read::read_csv(spec.source)?;
    info!(rows = raw.num_rows(), "loaded source");

    validate::validate_columns(&raw, spec.expected_columns)?;

    let cleaned = clean::clean(&raw, spec.trim_columns, spec.date_columns)?;
    let dropped = raw.num_rows() - cleaned.num_rows();
    if dropped > 0 {
        info!(dropped, "removed duplicate rows");
    }

    write::write_parquet(&cleaned, spec.output)?;
    info!(
        output = %spec.output.display(),
        rows = cleaned.num_rows(),
        "wrote artifact"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use arrow::array::{Array, StringArray};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use std::fs::{self, File};
    use tempfile::TempDir;

    #[test]
    fn pipeline_end_to_end() -> Result<()> {
        let dir = TempDir::new()?;
        let source = dir.path().join("songs.csv");
        let output = dir.path().join("processed").join("songs.parquet");

        // duplicate row, padded strings, one garbage date
        fs::write(
            &source,
            "song_id,title,artist_name,duration,release_date\n\
             1,  Hello ,Adele,04:55,2015-10-23\n\
             1,  Hello ,Adele,04:55,2015-10-23\n\
             2,Numb,Linkin Park,03:07,not-a-date\n",
        )?;

        let spec = DatasetSpec {
            name: "songs",
            source: &source,
            output: &output,
            expected_columns: &["song_id", "title", "artist_name", "duration", "release_date"],
            trim_columns: &["title", "artist_name", "duration"],
            date_columns: &["release_date"],
        };
        run(&spec)?;

        let file = File::open(&output)?;
        let mut reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
        let batch = reader.next().expect("one batch")?;

        assert_eq!(batch.num_rows(), 2);
        let titles = batch
            .column_by_name("title")
            .expect("title column")
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("utf8 title");
        assert_eq!(titles.value(0), "Hello");
        assert_eq!(titles.value(1), "Numb");

        // garbage date survived as a null, not an error
        let dates = batch.column_by_name("release_date").expect("release_date");
        assert!(dates.is_null(1));

        Ok(())
    }

    #[test]
    fn missing_source_is_reported() {
        let spec = DatasetSpec {
            name: "ghost",
            source: Path::new("data_lake/raw/no_such_file.csv"),
            output: Path::new("data_lake/processed/ghost.parquet"),
            expected_columns: &[],
            trim_columns: &[],
            date_columns: &[],
        };
        match run(&spec) {
            Err(IngestError::SourceNotFound(_)) => {}
            other => panic!("expected SourceNotFound, got {:?}", other),
        }
    }
}
