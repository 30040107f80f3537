//! Tabular source trait for pull-based, schema-typed row access.
//!
//! A `TabularSource` owns a schema and hands out cursors over its rows. It
//! makes no assumption about where rows live: the empty source has none, the
//! Arrow source keeps record batches in memory.
//!
//! # Example flow for reading columns `x` (0) and `label` (2):
//! ```ignore
//! let mut cursor = source.cursor(&[0, 2], None)?;
//! let x = cursor.getter::<f64>(0)?;
//! let label = cursor.getter::<String>(2)?;
//! while cursor.move_next() {
//!     let x = x.get(&cursor)?;
//!     let label = label.get(&cursor)?;
//! }
//! ```

use arrow::datatypes::SchemaRef;
use rand::RngCore;

use crate::cursor::RowCursor;
use crate::error::Result;

/// A source of rows sharing one schema.
///
/// Sources are immutable once built; cursors may be requested repeatedly and
/// from several threads.
pub trait TabularSource: Send + Sync {
    fn schema(&self) -> &SchemaRef;

    /// Number of rows, if known without a pass over the data.
    fn row_count(&self) -> Option<u64>;

    /// Whether cursors may visit rows in a random order.
    fn can_shuffle(&self) -> bool;

    /// Create one cursor exposing `columns_needed`.
    ///
    /// When `rng` is given and the source can shuffle, the cursor may visit
    /// rows in an order drawn from it.
    fn cursor(
        &self,
        columns_needed: &[usize],
        rng: Option<&mut dyn RngCore>,
    ) -> Result<Box<dyn RowCursor>>;

    /// Create up to `n` cursors over disjoint parts of the rows.
    ///
    /// The source decides how many cursors to return. Callers must use the
    /// length of the returned vector, which may be smaller than `n`.
    fn cursor_set(
        &self,
        columns_needed: &[usize],
        n: usize,
        rng: Option<&mut dyn RngCore>,
    ) -> Result<Vec<Box<dyn RowCursor>>>;
}
