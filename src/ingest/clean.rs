use std::{collections::HashSet, sync::Arc};

use arrow::{
    array::{Array, ArrayRef, StringArray, TimestampMillisecondBuilder, UInt32Array},
    compute::take,
    datatypes::{DataType, Field, Schema, TimeUnit},
    record_batch::RecordBatch,
    row::{RowConverter, SortField},
};
use arrow::error::ArrowError;

use crate::ingest::dates;

/// Apply the full cleaning chain: trim flagged string columns, parse flagged
/// date columns, then drop exact-duplicate rows. Pure and idempotent.
pub fn clean(
    batch: &RecordBatch,
    trim_columns: &[&str],
    date_columns: &[&str],
) -> Result<RecordBatch, ArrowError> {
    let trimmed = trim_string_columns(batch, trim_columns)?;
    let dated = parse_date_columns(&trimmed, date_columns)?;
    drop_duplicate_rows(&dated)
}

/// Strip leading/trailing whitespace from the flagged Utf8 columns.
pub fn trim_string_columns(
    batch: &RecordBatch,
    columns: &[&str],
) -> Result<RecordBatch, ArrowError> {
    if columns.is_empty() {
        return Ok(batch.clone());
    }

    let schema = batch.schema();
    let mut cols = Vec::with_capacity(batch.num_columns());
    for (i, field) in schema.fields().iter().enumerate() {
        let arr = batch.column(i);
        if columns.contains(&field.name().as_str()) {
            if let Some(sarr) = arr.as_any().downcast_ref::<StringArray>() {
                let trimmed: StringArray = sarr.iter().map(|opt| opt.map(str::trim)).collect();
                cols.push(Arc::new(trimmed) as ArrayRef);
                continue;
            }
        }
        cols.push(arr.clone());
    }

    RecordBatch::try_new(schema, cols)
}

/// Convert the flagged Utf8 columns to millisecond timestamps.
/// Values that fail to parse become nulls. Columns that already carry a
/// non-string type (e.g. inferred dates) are left untouched.
pub fn parse_date_columns(
    batch: &RecordBatch,
    columns: &[&str],
) -> Result<RecordBatch, ArrowError> {
    if columns.is_empty() {
        return Ok(batch.clone());
    }

    let schema = batch.schema();
    let mut fields = Vec::with_capacity(batch.num_columns());
    let mut cols = Vec::with_capacity(batch.num_columns());
    for (i, field) in schema.fields().iter().enumerate() {
        let arr = batch.column(i);
        if columns.contains(&field.name().as_str()) {
            if let Some(sarr) = arr.as_any().downcast_ref::<StringArray>() {
                let mut b = TimestampMillisecondBuilder::with_capacity(sarr.len());
                for opt in sarr.iter() {
                    b.append_option(opt.and_then(dates::parse_timestamp_millis));
                }
                fields.push(Arc::new(Field::new(
                    field.name(),
                    DataType::Timestamp(TimeUnit::Millisecond, None),
                    true,
                )));
                cols.push(Arc::new(b.finish()) as ArrayRef);
                continue;
            }
        }
        fields.push(field.clone());
        cols.push(arr.clone());
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), cols)
}

/// Remove rows that are fully identical to an earlier row, keeping the first
/// occurrence and the relative order of survivors.
pub fn drop_duplicate_rows(batch: &RecordBatch) -> Result<RecordBatch, ArrowError> {
    if batch.num_rows() == 0 {
        return Ok(batch.clone());
    }

    let sort_fields = batch
        .schema()
        .fields()
        .iter()
        .map(|f| SortField::new(f.data_type().clone()))
        .collect();
    let converter = RowConverter::new(sort_fields)?;
    let rows = converter.convert_columns(batch.columns())?;

    let mut seen: HashSet<Vec<u8>> = HashSet::with_capacity(batch.num_rows());
    let mut keep: Vec<u32> = Vec::with_capacity(batch.num_rows());
    for (i, row) in rows.iter().enumerate() {
        if seen.insert(row.as_ref().to_vec()) {
            keep.push(i as u32);
        }
    }

    if keep.len() == batch.num_rows() {
        return Ok(batch.clone());
    }

    let indices = UInt32Array::from(keep);
    let cols = batch
        .columns()
        .iter()
        .map(|c| take(c.as_ref(), &indices, None))
        .collect::<Result<Vec<_>, _>>()?;

    RecordBatch::try_new(batch.schema(), cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use arrow::array::{Array, Int64Array, TimestampMillisecondArray};

    fn string_col(values: &[&str]) -> ArrayRef {
        Arc::new(StringArray::from(values.to_vec()))
    }

    #[test]
    fn trims_only_flagged_columns() -> Result<()> {
        let batch = RecordBatch::try_from_iter(vec![
            ("name", string_col(&["  Alice ", "Bob"])),
            ("email", string_col(&[" a@x.io ", " b@x.io "])),
        ])?;

        let out = trim_string_columns(&batch, &["name"])?;
        let names = out.column(0).as_any().downcast_ref::<StringArray>().unwrap();
        let emails = out.column(1).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(names.value(0), "Alice");
        assert_eq!(emails.value(0), " a@x.io ");
        Ok(())
    }

    #[test]
    fn unparsable_dates_become_nulls() -> Result<()> {
        let batch = RecordBatch::try_from_iter(vec![(
            "signup_date",
            string_col(&["2021-06-01", "yesterday", ""]),
        )])?;

        let out = parse_date_columns(&batch, &["signup_date"])?;
        let col = out
            .column(0)
            .as_any()
            .downcast_ref::<TimestampMillisecondArray>()
            .expect("timestamp column");
        assert!(col.is_valid(0));
        assert!(col.is_null(1));
        assert!(col.is_null(2));
        Ok(())
    }

    #[test]
    fn duplicates_drop_keeps_first_seen_order() -> Result<()> {
        let batch = RecordBatch::try_from_iter(vec![(
            "v",
            string_col(&["A", "B", "A", "C"]),
        )])?;

        let out = drop_duplicate_rows(&batch)?;
        let col = out.column(0).as_any().downcast_ref::<StringArray>().unwrap();
        let values: Vec<&str> = (0..col.len()).map(|i| col.value(i)).collect();
        assert_eq!(values, vec!["A", "B", "C"]);
        Ok(())
    }

    #[test]
    fn duplicate_check_uses_full_row_equality() -> Result<()> {
        let batch = RecordBatch::try_from_iter(vec![
            ("id", Arc::new(Int64Array::from(vec![1, 1])) as ArrayRef),
            ("device", string_col(&["ios", "android"])),
        ])?;

        // same id, different device: both rows survive
        let out = drop_duplicate_rows(&batch)?;
        assert_eq!(out.num_rows(), 2);
        Ok(())
    }

    #[test]
    fn cleaning_is_idempotent() -> Result<()> {
        let batch = RecordBatch::try_from_iter(vec![
            ("title", string_col(&["  Hello ", "Numb", "Numb"])),
            (
                "release_date",
                string_col(&["2015-10-23", "bogus", "bogus"]),
            ),
        ])?;

        let once = clean(&batch, &["title"], &["release_date"])?;
        let twice = clean(&once, &["title"], &["release_date"])?;
        assert_eq!(once, twice);
        Ok(())
    }
}
