//! Parquet input format implementation.

use std::fs::File;
use std::path::Path;

use arrow::array::RecordBatch;
use arrow::datatypes::SchemaRef;
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};

use super::{InputError, TableReader};

const BATCH_SIZE: usize = 1024;

/// Reader for a single Parquet file.
pub struct ParquetTableReader {
    schema: SchemaRef,
    reader: ParquetRecordBatchReader,
}

impl ParquetTableReader {
    pub fn new(path: &Path) -> Result<Self, InputError> {
        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let schema = builder.schema().clone();
        let reader = builder.with_batch_size(BATCH_SIZE).build()?;

        Ok(Self { schema, reader })
    }
}

impl TableReader for ParquetTableReader {
    fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    fn next_batch(&mut self) -> Result<Option<RecordBatch>, InputError> {
        match self.reader.next() {
            Some(Ok(batch)) => Ok(Some(batch)),
            Some(Err(e)) => Err(InputError::Arrow(e)),
            None => Ok(None),
        }
    }
}
