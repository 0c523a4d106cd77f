use std::{fs, fs::File, path::Path};

use arrow::record_batch::RecordBatch;
use parquet::{
    arrow::ArrowWriter,
    basic::Compression,
    file::properties::WriterProperties,
};
use tracing::debug;

use crate::error::IngestError;

/// Serialize a batch to a snappy-compressed parquet file, creating parent
/// directories as needed. Any existing artifact at `path` is overwritten.
pub fn write_parquet(batch: &RecordBatch, path: impl AsRef<Path>) -> Result<(), IngestError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| write_failed(path, e))?;
    }

    let file = File::create(path).map_err(|e| write_failed(path, e))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .map_err(|e| write_failed(path, e))?;

    writer.write(batch).map_err(|e| write_failed(path, e))?;
    writer.close().map_err(|e| write_failed(path, e))?;

    debug!(path = %path.display(), rows = batch.num_rows(), "parquet written");
    Ok(())
}

fn write_failed(
    path: &Path,
    source: impl std::error::Error + Send + Sync + 'static,
) -> IngestError {
    IngestError::WriteFailed {
        path: path.to_path_buf(),
        source: Box::new(source),
    }
}
