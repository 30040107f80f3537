//! Schema-typed, pull-based tabular sources and their row cursors.
//!
//! A [`TabularSource`] owns an Arrow schema and hands out [`RowCursor`]s. A
//! cursor is created with the set of columns the consumer intends to read,
//! walks the rows one at a time, and exposes typed getters that are valid only
//! while it is positioned on a row.
//!
//! Two sources are provided: [`EmptySource`], which has a schema and no rows,
//! and [`ArrowTableSource`], which serves rows from in-memory record batches.

pub mod arrow;
pub mod cursor;
pub mod empty;
pub mod error;
pub mod host;
pub mod input;
pub mod scan;
pub mod schema;
pub mod source;
pub mod value;

pub use crate::arrow::{ArrowCursor, ArrowTableSource};
pub use cursor::{CursorState, RowCursor, RowCursorExt, RowIdGetter, ValueGetter};
pub use empty::{EmptyCursor, EmptySource};
pub use error::{CursorError, Result};
pub use host::Host;
pub use source::TabularSource;
pub use value::{ColumnValue, DurationNanos, RowId, TimestampNanos, Value, ValueKind};
