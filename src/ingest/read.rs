use std::{
    fs::File,
    io::Seek,
    path::Path,
    sync::Arc,
};

use arrow::{
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder},
    record_batch::RecordBatch,
};
use tracing::debug;

use crate::error::IngestError;

/// Rows sampled when inferring column types from the source.
const SCHEMA_INFERENCE_ROWS: usize = 1000;
const BATCH_SIZE: usize = 8192;

/// Load a CSV file into a single record batch with inferred column types.
/// Distinguishes a missing source from one that cannot be parsed.
pub fn read_csv(path: impl AsRef<Path>) -> Result<RecordBatch, IngestError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IngestError::SourceNotFound(path.to_path_buf()));
    }

    let unreadable = |source| IngestError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(|e| unreadable(e.into()))?;

    let format = Format::default().with_header(true);
    let (schema, _) = format
        .infer_schema(&mut file, Some(SCHEMA_INFERENCE_ROWS))
        .map_err(unreadable)?;
    file.rewind().map_err(|e| unreadable(e.into()))?;
    debug!(path = %path.display(), columns = schema.fields().len(), "inferred schema");

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(BATCH_SIZE)
        .build(file)
        .map_err(unreadable)?;

    let batches = reader
        .collect::<Result<Vec<_>, _>>()
        .map_err(unreadable)?;

    concat_batches(&schema, batches.iter()).map_err(unreadable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use arrow::array::{Int64Array, StringArray};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_rows_with_inferred_types() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "user_id,name")?;
        writeln!(tmp, "1,Alice")?;
        writeln!(tmp, "2,Bob")?;

        let batch = read_csv(tmp.path())?;
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 2);

        let ids = batch
            .column_by_name("user_id")
            .expect("user_id")
            .as_any()
            .downcast_ref::<Int64Array>()
            .expect("integer ids");
        assert_eq!(ids.value(1), 2);

        let names = batch
            .column_by_name("name")
            .expect("name")
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("utf8 names");
        assert_eq!(names.value(0), "Alice");
        Ok(())
    }

    #[test]
    fn missing_file_is_source_not_found() {
        match read_csv("definitely/not/here.csv") {
            Err(IngestError::SourceNotFound(p)) => {
                assert!(p.ends_with("here.csv"));
            }
            other => panic!("expected SourceNotFound, got {:?}", other),
        }
    }

    #[test]
    fn header_only_file_yields_empty_batch() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "a,b,c")?;

        let batch = read_csv(tmp.path())?;
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 3);
        Ok(())
    }
}
