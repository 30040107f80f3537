//! Input layer: open columnar files as tabular sources.
//!
//! A file is read through a `TableReader`, then either loaded into an
//! `ArrowTableSource` or, when only its shape is wanted, wrapped as an
//! `EmptySource` carrying the file's schema.

pub mod parquet;

use std::path::{Path, PathBuf};

use arrow::array::RecordBatch;
use arrow::datatypes::SchemaRef;
use thiserror::Error;
use tracing::info;

use crate::arrow::ArrowTableSource;
use crate::empty::EmptySource;
use crate::error::CursorError;
use crate::host::Host;
use crate::source::TabularSource;

/// Errors that can occur while opening inputs.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] ::parquet::errors::ParquetError),

    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error("unsupported input format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Reader for a single table's data.
pub trait TableReader: Send {
    /// Get the schema of this table.
    fn schema(&self) -> SchemaRef;

    /// Read the next batch from this table.
    /// Returns None when all data has been read.
    fn next_batch(&mut self) -> Result<Option<RecordBatch>, InputError>;
}

/// How much of an input to load into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    /// Load every row.
    #[default]
    Full,
    /// Read only the schema; the source has no rows.
    SchemaOnly,
}

/// Open a table reader for `path`, choosing the format from its extension.
pub fn open_reader(path: &Path) -> Result<Box<dyn TableReader>, InputError> {
    let is_parquet = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("parquet"))
        .unwrap_or(false);

    if is_parquet {
        Ok(Box::new(parquet::ParquetTableReader::new(path)?))
    } else {
        Err(InputError::UnsupportedFormat(path.to_path_buf()))
    }
}

/// Open `path` as a tabular source.
pub fn open_source(
    host: &Host,
    path: &Path,
    mode: SourceMode,
) -> Result<Box<dyn TabularSource>, InputError> {
    let mut reader = open_reader(path)?;
    let schema = reader.schema();

    match mode {
        SourceMode::SchemaOnly => {
            info!(path = %path.display(), columns = schema.fields().len(), "opened schema only");
            Ok(Box::new(EmptySource::new(host, Some(schema))?))
        }
        SourceMode::Full => {
            let mut batches = Vec::new();
            while let Some(batch) = reader.next_batch()? {
                batches.push(batch);
            }
            info!(path = %path.display(), batches = batches.len(), "loaded input");
            Ok(Box::new(ArrowTableSource::new(host, Some(schema), batches)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::sync::Arc;

    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use ::parquet::arrow::ArrowWriter;
    use tempfile::tempdir;

    use super::*;
    use crate::cursor::RowCursorExt;

    fn write_fixture(path: &Path) {
        let schema = Arc::new(Schema::new(vec![
            Field::new("x", DataType::Float64, false),
            Field::new("name", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0])),
                Arc::new(StringArray::from(vec![Some("a"), None, Some("c")])),
            ],
        )
        .unwrap();

        let file = File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn test_open_full() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.parquet");
        write_fixture(&path);

        let source = open_source(&Host::new("test"), &path, SourceMode::Full).unwrap();
        assert_eq!(source.row_count(), Some(3));
        assert_eq!(source.schema().fields().len(), 2);

        let mut cursor = source.cursor(&[0, 1], None).unwrap();
        let x = cursor.getter::<f64>(0).unwrap();
        let name = cursor.getter::<String>(1).unwrap();

        let mut rows = Vec::new();
        while cursor.move_next() {
            rows.push((x.get(&cursor).unwrap(), name.get(&cursor).unwrap()));
        }
        assert_eq!(
            rows,
            vec![
                (Some(1.0), Some("a".to_string())),
                (Some(2.0), None),
                (Some(3.0), Some("c".to_string())),
            ]
        );
    }

    #[test]
    fn test_open_schema_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.parquet");
        write_fixture(&path);

        let source = open_source(&Host::new("test"), &path, SourceMode::SchemaOnly).unwrap();
        assert_eq!(source.row_count(), Some(0));
        assert_eq!(source.schema().field(1).name(), "name");

        let mut cursors = source.cursor_set(&[0], 4, None).unwrap();
        assert_eq!(cursors.len(), 1);
        let x = cursors[0].getter::<f64>(0).unwrap();
        assert!(!cursors[0].move_next());
        assert!(x.get(&cursors[0]).unwrap_err().is_row_state());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("points.csv");
        let err = open_source(&Host::new("test"), &path, SourceMode::Full).err().unwrap();
        assert!(matches!(err, InputError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.parquet");
        let err = open_source(&Host::new("test"), &path, SourceMode::Full).err().unwrap();
        assert!(matches!(err, InputError::Io(_)));
    }
}
