//! Row cursor contract, shared cursor state and typed getters.
//!
//! A cursor walks the rows of one source. It is created with a fixed set of
//! active columns and moves through three states:
//!
//! ```text
//! BeforeStart --move_next()=true--> Positioned --move_next()=false--> Exhausted
//!      |                                                                  ^
//!      +----------------------------move_next()=false---------------------+
//! ```
//!
//! Getters are obtained once and invoked per row:
//! ```ignore
//! let x = cursor.getter::<f64>(0)?;     // checks column 0 is active and f64
//! let id = cursor.id_getter();
//! while cursor.move_next() {
//!     let value = x.get(&*cursor)?;     // Option<f64>, None for null
//!     let row = id.get(&*cursor)?;
//! }
//! ```
//! Creating a getter checks the column. Invoking it checks the row: outside
//! the `Positioned` state every invocation fails with a row state error.

use std::marker::PhantomData;

use arrow::datatypes::SchemaRef;
use tracing::{debug, trace};

use crate::error::{CursorError, Result};
use crate::host::Host;
use crate::schema::active_mask;
use crate::value::{ColumnValue, RowId, Value, ValueKind};

/// Position state of a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    BeforeStart,
    Positioned,
    Exhausted,
}

/// A stateful, single-threaded iterator over the rows of a source.
///
/// Cursors are `Send` so that each cursor of a cursor set can be driven on
/// its own thread. A single cursor must not be shared between threads.
pub trait RowCursor: Send {
    /// Diagnostic scope of this cursor.
    fn host(&self) -> &Host;

    fn schema(&self) -> &SchemaRef;

    /// Identifier distinguishing the cursors of one cursor set.
    fn batch(&self) -> u64;

    fn state(&self) -> CursorState;

    /// Zero-based count of accepted rows, `None` before the first one.
    fn position(&self) -> Option<u64>;

    /// Advance to the next row. Returns false once the rows are exhausted,
    /// and keeps returning false on every later call.
    fn move_next(&mut self) -> bool;

    /// Whether `col` was requested when the cursor was created. Out of range
    /// indices are simply inactive.
    fn is_column_active(&self, col: usize) -> bool;

    /// Read the value of `col` in the current row.
    fn fetch(&self, col: usize) -> Result<Value>;

    /// Identity of the current row.
    fn fetch_row_id(&self) -> Result<RowId>;
}

impl<C: RowCursor + ?Sized> RowCursor for Box<C> {
    fn host(&self) -> &Host {
        (**self).host()
    }

    fn schema(&self) -> &SchemaRef {
        (**self).schema()
    }

    fn batch(&self) -> u64 {
        (**self).batch()
    }

    fn state(&self) -> CursorState {
        (**self).state()
    }

    fn position(&self) -> Option<u64> {
        (**self).position()
    }

    fn move_next(&mut self) -> bool {
        (**self).move_next()
    }

    fn is_column_active(&self, col: usize) -> bool {
        (**self).is_column_active(col)
    }

    fn fetch(&self, col: usize) -> Result<Value> {
        (**self).fetch(col)
    }

    fn fetch_row_id(&self) -> Result<RowId> {
        (**self).fetch_row_id()
    }
}

/// Getter construction, available on every cursor including trait objects.
pub trait RowCursorExt: RowCursor {
    /// Getter for values of `col` as `T`.
    ///
    /// Fails with a precondition error if the column is not active, and with
    /// a type mismatch if the column's declared type cannot produce `T`.
    /// `getter::<Value>` succeeds for every active column.
    fn getter<T: ColumnValue>(&self, col: usize) -> Result<ValueGetter<T>> {
        let host = self.host();
        host.check(self.is_column_active(col), || {
            format!("cannot get getter for inactive column {}", col)
        })?;

        let data_type = self.schema().field(col).data_type();
        if T::accepts(ValueKind::of(data_type)) {
            return Ok(ValueGetter::new(col));
        }
        Err(CursorError::TypeMismatch {
            component: host.name().to_string(),
            column: col,
            requested: T::TYPE_NAME,
            actual: format!("{:?}", data_type),
        })
    }

    /// Getter for the identity of the current row.
    fn id_getter(&self) -> RowIdGetter {
        RowIdGetter { _private: () }
    }
}

impl<C: RowCursor + ?Sized> RowCursorExt for C {}

/// Typed getter bound to one column.
///
/// Holds no reference to the cursor; the cursor is passed on each call and
/// its current state decides whether a value is available.
#[derive(Debug)]
pub struct ValueGetter<T> {
    col: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ValueGetter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ValueGetter<T> {}

impl<T: ColumnValue> ValueGetter<T> {
    fn new(col: usize) -> Self {
        Self {
            col,
            _marker: PhantomData,
        }
    }

    pub fn column(&self) -> usize {
        self.col
    }

    /// Value in the cursor's current row; `None` if null.
    pub fn get<C: RowCursor + ?Sized>(&self, cursor: &C) -> Result<Option<T>> {
        let value = cursor.fetch(self.col)?;
        if value.is_null() {
            return Ok(None);
        }

        let actual = value.kind();
        match T::from_value(value) {
            Some(v) => Ok(Some(v)),
            None => Err(CursorError::TypeMismatch {
                component: cursor.host().name().to_string(),
                column: self.col,
                requested: T::TYPE_NAME,
                actual: actual.map(ValueKind::name).unwrap_or("null").to_string(),
            }),
        }
    }
}

/// Getter for the identity of the cursor's current row.
#[derive(Debug, Clone, Copy)]
pub struct RowIdGetter {
    _private: (),
}

impl RowIdGetter {
    pub fn get<C: RowCursor + ?Sized>(&self, cursor: &C) -> Result<RowId> {
        cursor.fetch_row_id()
    }
}

/// State shared by every cursor implementation: scope, schema, activation
/// mask, batch id and position.
#[derive(Debug)]
pub struct CursorCore {
    host: Host,
    schema: SchemaRef,
    active: Vec<bool>,
    batch: u64,
    state: CursorState,
    position: Option<u64>,
}

impl CursorCore {
    /// Create the core for a cursor over `schema` exposing `columns_needed`.
    pub fn new(host: &Host, schema: SchemaRef, columns_needed: &[usize], batch: u64) -> Result<Self> {
        let host = host.register("Cursor");
        let active = active_mask(&host, &schema, columns_needed)?;
        debug!(
            component = %host.name(),
            batch,
            active = active.iter().filter(|a| **a).count(),
            "created cursor"
        );
        Ok(Self {
            host,
            schema,
            active,
            batch,
            state: CursorState::BeforeStart,
            position: None,
        })
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn batch(&self) -> u64 {
        self.batch
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn position(&self) -> Option<u64> {
        self.position
    }

    pub fn is_active(&self, col: usize) -> bool {
        self.active.get(col).copied().unwrap_or(false)
    }

    /// Record the outcome of an advance. `has_row` is whether the underlying
    /// data produced another row; once exhausted the cursor stays exhausted.
    pub fn advance(&mut self, has_row: bool) -> bool {
        match self.state {
            CursorState::Exhausted => false,
            _ if has_row => {
                self.state = CursorState::Positioned;
                self.position = Some(self.position.map_or(0, |p| p + 1));
                true
            }
            _ => {
                trace!(component = %self.host.name(), batch = self.batch, "cursor exhausted");
                self.state = CursorState::Exhausted;
                false
            }
        }
    }

    pub fn ensure_positioned(&self) -> Result<()> {
        match self.state {
            CursorState::Positioned => Ok(()),
            _ => Err(self.host.row_state_error()),
        }
    }

    /// Check that `col` may be read from the current row.
    pub fn ensure_readable(&self, col: usize) -> Result<()> {
        self.host
            .check(self.is_active(col), || format!("column {} is not active", col))?;
        self.ensure_positioned()
    }
}
