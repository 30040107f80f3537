//! Arrow implementation of TabularSource over in-memory RecordBatches.

use std::ops::Range;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BinaryArray, BooleanArray, DurationNanosecondArray, Float32Array,
    Float64Array, Int16Array, Int32Array, Int64Array, Int8Array, LargeBinaryArray,
    LargeStringArray, StringArray, TimestampNanosecondArray, UInt16Array, UInt32Array,
    UInt64Array, UInt8Array,
};
use arrow::datatypes::{DataType, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::debug;

use crate::cursor::{CursorCore, CursorState, RowCursor};
use crate::error::{CursorError, Result};
use crate::host::Host;
use crate::source::TabularSource;
use crate::value::{RowId, Value};

/// Source over a list of record batches sharing one schema.
///
/// Rows are addressed by a global index running across batches in order.
/// The global index doubles as the row id.
#[derive(Debug, Clone)]
pub struct ArrowTableSource {
    host: Host,
    schema: SchemaRef,
    batches: Arc<[RecordBatch]>,
    /// Global index of the first row of each batch.
    starts: Arc<[usize]>,
    num_rows: usize,
}

impl ArrowTableSource {
    pub const CAN_SHUFFLE: bool = true;

    /// Create a source from batches that all match `schema`.
    pub fn new(host: &Host, schema: Option<SchemaRef>, batches: Vec<RecordBatch>) -> Result<Self> {
        let host = host.register("ArrowTableSource");
        let schema = host.check_value(schema, "schema")?;

        let mut starts = Vec::with_capacity(batches.len());
        let mut num_rows = 0;
        for (i, batch) in batches.iter().enumerate() {
            host.check(batch.schema().fields() == schema.fields(), || {
                format!("batch {} schema does not match source schema", i)
            })?;
            starts.push(num_rows);
            num_rows += batch.num_rows();
        }

        debug!(
            component = %host.name(),
            batches = batches.len(),
            rows = num_rows,
            "created arrow source"
        );

        Ok(Self {
            host,
            schema,
            batches: batches.into(),
            starts: starts.into(),
            num_rows,
        })
    }

    /// Row order for one traversal: sequential, or a permutation from `rng`.
    fn row_order(&self, rng: Option<&mut dyn RngCore>) -> RowOrder {
        match rng {
            Some(rng) => {
                let mut rows: Vec<usize> = (0..self.num_rows).collect();
                rows.shuffle(rng);
                RowOrder::List(rows)
            }
            None => RowOrder::Range(0..self.num_rows),
        }
    }

    fn new_cursor(&self, columns_needed: &[usize], rows: RowOrder, batch: u64) -> Result<ArrowCursor> {
        let core = CursorCore::new(&self.host, self.schema.clone(), columns_needed, batch)?;
        Ok(ArrowCursor {
            core,
            batches: self.batches.clone(),
            starts: self.starts.clone(),
            rows,
            next: 0,
            current: None,
        })
    }
}

impl TabularSource for ArrowTableSource {
    fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    fn row_count(&self) -> Option<u64> {
        Some(self.num_rows as u64)
    }

    fn can_shuffle(&self) -> bool {
        Self::CAN_SHUFFLE
    }

    fn cursor(
        &self,
        columns_needed: &[usize],
        rng: Option<&mut dyn RngCore>,
    ) -> Result<Box<dyn RowCursor>> {
        let rows = self.row_order(rng);
        Ok(Box::new(self.new_cursor(columns_needed, rows, 0)?))
    }

    /// Splits the row order into contiguous, disjoint partitions of nearly
    /// equal size. At most one cursor per row is returned, and always at
    /// least one.
    fn cursor_set(
        &self,
        columns_needed: &[usize],
        n: usize,
        rng: Option<&mut dyn RngCore>,
    ) -> Result<Vec<Box<dyn RowCursor>>> {
        self.host
            .check(n > 0, || "partition count must be positive".into())?;

        let parts = n.min(self.num_rows.max(1));
        let order = self.row_order(rng);

        (0..parts)
            .map(|i| -> Result<Box<dyn RowCursor>> {
                let lo = i * self.num_rows / parts;
                let hi = (i + 1) * self.num_rows / parts;
                let cursor = self.new_cursor(columns_needed, order.slice(lo..hi), i as u64)?;
                Ok(Box::new(cursor) as Box<dyn RowCursor>)
            })
            .collect()
    }
}

/// Global row indices a cursor visits, in visiting order.
#[derive(Debug, Clone)]
enum RowOrder {
    Range(Range<usize>),
    List(Vec<usize>),
}

impl RowOrder {
    fn len(&self) -> usize {
        match self {
            RowOrder::Range(range) => range.len(),
            RowOrder::List(rows) => rows.len(),
        }
    }

    fn get(&self, i: usize) -> Option<usize> {
        match self {
            RowOrder::Range(range) => {
                if i < range.len() {
                    Some(range.start + i)
                } else {
                    None
                }
            }
            RowOrder::List(rows) => rows.get(i).copied(),
        }
    }

    /// Sub-order covering positions `range` of this order.
    fn slice(&self, range: Range<usize>) -> RowOrder {
        match self {
            RowOrder::Range(rows) => RowOrder::Range(rows.start + range.start..rows.start + range.end),
            RowOrder::List(rows) => RowOrder::List(rows[range].to_vec()),
        }
    }
}

/// The row a cursor is positioned on.
#[derive(Debug, Clone, Copy)]
struct Position {
    global: usize,
    batch: usize,
    row: usize,
}

/// Cursor over an `ArrowTableSource` partition.
#[derive(Debug)]
pub struct ArrowCursor {
    core: CursorCore,
    batches: Arc<[RecordBatch]>,
    starts: Arc<[usize]>,
    rows: RowOrder,
    /// Index into `rows` of the next row to visit.
    next: usize,
    current: Option<Position>,
}

impl ArrowCursor {
    /// Rows this cursor has yet to visit.
    pub fn rows_remaining(&self) -> usize {
        match self.core.state() {
            CursorState::Exhausted => 0,
            _ => self.rows.len() - self.next,
        }
    }

    fn locate(&self, global: usize) -> Position {
        // Empty batches share a start with their successor; the last batch
        // starting at or before `global` is the one holding it.
        let batch = self.starts.partition_point(|&start| start <= global) - 1;
        Position {
            global,
            batch,
            row: global - self.starts[batch],
        }
    }

    fn current(&self) -> Result<Position> {
        self.core.ensure_positioned()?;
        self.current.ok_or_else(|| self.core.host().row_state_error())
    }
}

impl RowCursor for ArrowCursor {
    fn host(&self) -> &Host {
        self.core.host()
    }

    fn schema(&self) -> &SchemaRef {
        self.core.schema()
    }

    fn batch(&self) -> u64 {
        self.core.batch()
    }

    fn state(&self) -> CursorState {
        self.core.state()
    }

    fn position(&self) -> Option<u64> {
        self.core.position()
    }

    fn move_next(&mut self) -> bool {
        if self.core.state() == CursorState::Exhausted {
            return false;
        }

        match self.rows.get(self.next) {
            Some(global) => {
                self.current = Some(self.locate(global));
                self.next += 1;
                self.core.advance(true)
            }
            None => {
                self.current = None;
                self.core.advance(false)
            }
        }
    }

    fn is_column_active(&self, col: usize) -> bool {
        self.core.is_active(col)
    }

    fn fetch(&self, col: usize) -> Result<Value> {
        self.core.ensure_readable(col)?;
        let pos = self.current()?;
        let array = self.batches[pos.batch].column(col);

        read_value(array, pos.row).ok_or_else(|| CursorError::TypeMismatch {
            component: self.core.host().name().to_string(),
            column: col,
            requested: "value",
            actual: format!("{:?}", array.data_type()),
        })
    }

    fn fetch_row_id(&self) -> Result<RowId> {
        let pos = self.current()?;
        Ok(RowId::from(pos.global as u64))
    }
}

/// Downcast an array to its concrete type.
fn downcast<A: Array + 'static>(array: &ArrayRef) -> Option<&A> {
    array.as_any().downcast_ref::<A>()
}

/// Read `row` of `array`. Types without a dedicated value kind are rendered
/// with Arrow's display formatter. Returns `None` if the array does not match
/// its declared type or cannot be formatted.
fn read_value(array: &ArrayRef, row: usize) -> Option<Value> {
    if array.is_null(row) {
        return Some(Value::Null);
    }

    let value = match array.data_type() {
        DataType::Boolean => Value::Boolean(downcast::<BooleanArray>(array)?.value(row)),
        DataType::Int8 => Value::Int8(downcast::<Int8Array>(array)?.value(row)),
        DataType::Int16 => Value::Int16(downcast::<Int16Array>(array)?.value(row)),
        DataType::Int32 => Value::Int32(downcast::<Int32Array>(array)?.value(row)),
        DataType::Int64 => Value::Int64(downcast::<Int64Array>(array)?.value(row)),
        DataType::UInt8 => Value::UInt8(downcast::<UInt8Array>(array)?.value(row)),
        DataType::UInt16 => Value::UInt16(downcast::<UInt16Array>(array)?.value(row)),
        DataType::UInt32 => Value::UInt32(downcast::<UInt32Array>(array)?.value(row)),
        DataType::UInt64 => Value::UInt64(downcast::<UInt64Array>(array)?.value(row)),
        DataType::Float32 => Value::Float32(downcast::<Float32Array>(array)?.value(row)),
        DataType::Float64 => Value::Float64(downcast::<Float64Array>(array)?.value(row)),
        DataType::Utf8 => Value::Utf8(downcast::<StringArray>(array)?.value(row).to_string()),
        DataType::LargeUtf8 => {
            Value::Utf8(downcast::<LargeStringArray>(array)?.value(row).to_string())
        }
        DataType::Binary => Value::Binary(downcast::<BinaryArray>(array)?.value(row).to_vec()),
        DataType::LargeBinary => {
            Value::Binary(downcast::<LargeBinaryArray>(array)?.value(row).to_vec())
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            Value::TimestampNanos(downcast::<TimestampNanosecondArray>(array)?.value(row))
        }
        DataType::Duration(TimeUnit::Nanosecond) => {
            Value::DurationNanos(downcast::<DurationNanosecondArray>(array)?.value(row))
        }
        _ => {
            let formatter = ArrayFormatter::try_new(array.as_ref(), &FormatOptions::default()).ok()?;
            Value::Other(formatter.value(row).to_string())
        }
    };
    Some(value)
}
