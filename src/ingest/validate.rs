use arrow::record_batch::RecordBatch;

use crate::error::IngestError;

/// Check that every expected column is present, reporting all missing names
/// at once rather than failing on the first.
pub fn validate_columns(batch: &RecordBatch, expected: &[&str]) -> Result<(), IngestError> {
    let schema = batch.schema();
    let missing: Vec<String> = expected
        .iter()
        .filter(|&&name| schema.column_with_name(name).is_none())
        .map(|&name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(IngestError::SchemaMismatch { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, StringArray};
    use std::sync::Arc;

    fn batch_with_columns(names: &[&str]) -> RecordBatch {
        let columns: Vec<(&str, ArrayRef)> = names
            .iter()
            .map(|&n| (n, Arc::new(StringArray::from(vec!["x"])) as ArrayRef))
            .collect();
        RecordBatch::try_from_iter(columns).expect("test batch")
    }

    #[test]
    fn accepts_batch_with_all_expected_columns() {
        let batch = batch_with_columns(&["user_id", "name", "email"]);
        assert!(validate_columns(&batch, &["user_id", "email"]).is_ok());
    }

    #[test]
    fn reports_every_missing_column() {
        let batch = batch_with_columns(&["user_id"]);
        match validate_columns(&batch, &["user_id", "name", "email", "signup_date"]) {
            Err(IngestError::SchemaMismatch { missing }) => {
                assert_eq!(missing, vec!["name", "email", "signup_date"]);
            }
            other => panic!("expected SchemaMismatch, got {:?}", other),
        }
    }
}
