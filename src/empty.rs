//! A source with a schema but no rows.

use arrow::datatypes::SchemaRef;
use rand::RngCore;
use tracing::debug;

use crate::cursor::{CursorCore, CursorState, RowCursor};
use crate::error::Result;
use crate::host::Host;
use crate::source::TabularSource;
use crate::value::{RowId, Value};

/// Source that exposes a schema and zero rows.
///
/// Every cursor it produces is exhausted on the first `move_next()`, so its
/// getters can be created but never successfully invoked.
#[derive(Debug, Clone)]
pub struct EmptySource {
    host: Host,
    schema: SchemaRef,
}

impl EmptySource {
    /// An empty set is trivially shufflable.
    pub const CAN_SHUFFLE: bool = true;

    pub fn new(host: &Host, schema: Option<SchemaRef>) -> Result<Self> {
        let host = host.register("EmptySource");
        let schema = host.check_value(schema, "schema")?;
        debug!(component = %host.name(), columns = schema.fields().len(), "created empty source");
        Ok(Self { host, schema })
    }

    fn new_cursor(&self, columns_needed: &[usize], rng: Option<&mut dyn RngCore>) -> Result<EmptyCursor> {
        // Nothing to shuffle; the rng is accepted and left untouched.
        let _ = rng;
        EmptyCursor::new(&self.host, self.schema.clone(), columns_needed)
    }
}

impl TabularSource for EmptySource {
    fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    fn row_count(&self) -> Option<u64> {
        Some(0)
    }

    fn can_shuffle(&self) -> bool {
        Self::CAN_SHUFFLE
    }

    fn cursor(
        &self,
        columns_needed: &[usize],
        rng: Option<&mut dyn RngCore>,
    ) -> Result<Box<dyn RowCursor>> {
        Ok(Box::new(self.new_cursor(columns_needed, rng)?))
    }

    /// Always a single cursor, whatever `n` is: there is nothing to split.
    fn cursor_set(
        &self,
        columns_needed: &[usize],
        n: usize,
        rng: Option<&mut dyn RngCore>,
    ) -> Result<Vec<Box<dyn RowCursor>>> {
        debug!(component = %self.host.name(), requested = n, "single cursor for empty source");
        Ok(vec![Box::new(self.new_cursor(columns_needed, rng)?)])
    }
}

/// Cursor over an empty source.
#[derive(Debug)]
pub struct EmptyCursor {
    core: CursorCore,
}

impl EmptyCursor {
    fn new(host: &Host, schema: SchemaRef, columns_needed: &[usize]) -> Result<Self> {
        let core = CursorCore::new(host, schema, columns_needed, 0)?;
        Ok(Self { core })
    }
}

impl RowCursor for EmptyCursor {
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
        self.core.advance(false)
    }

    fn is_column_active(&self, col: usize) -> bool {
        self.core.is_active(col)
    }

    fn fetch(&self, col: usize) -> Result<Value> {
        self.core
            .ensure_readable(col)
            .and_then(|()| Err(self.core.host().row_state_error()))
    }

    fn fetch_row_id(&self) -> Result<RowId> {
        self.core
            .ensure_positioned()
            .and_then(|()| Err(self.core.host().row_state_error()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::datatypes::{DataType, Field, Schema};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::cursor::RowCursorExt;
    use crate::error::CursorError;

    fn three_columns() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, true),
            Field::new("score", DataType::Float64, true),
        ]))
    }

    fn source() -> EmptySource {
        EmptySource::new(&Host::new("test"), Some(three_columns())).unwrap()
    }

    #[test]
    fn test_missing_schema() {
        let err = EmptySource::new(&Host::new("test"), None).unwrap_err();
        assert_eq!(
            err,
            CursorError::InvalidArgument {
                component: "test/EmptySource".into(),
                param: "schema",
            }
        );
    }

    #[test]
    fn test_row_count_and_shuffle() {
        let source = source();
        assert_eq!(source.row_count(), Some(0));
        assert!(source.can_shuffle());
        assert!(EmptySource::CAN_SHUFFLE);

        let empty_schema = Arc::new(Schema::empty());
        let source = EmptySource::new(&Host::new("test"), Some(empty_schema)).unwrap();
        assert_eq!(source.row_count(), Some(0));
        assert!(source.can_shuffle());
    }

    #[test]
    fn test_schema_is_shared() {
        let schema = three_columns();
        let source = EmptySource::new(&Host::new("test"), Some(schema.clone())).unwrap();
        assert!(Arc::ptr_eq(source.schema(), &schema));

        let cursor = source.cursor(&[], None).unwrap();
        assert!(Arc::ptr_eq(cursor.schema(), &schema));
    }

    #[test]
    fn test_cursor_set_is_always_one() {
        let source = source();
        for n in [1, 2, 8, 1000] {
            let cursors = source.cursor_set(&[0, 1], n, None).unwrap();
            assert_eq!(cursors.len(), 1);
            assert_eq!(cursors[0].batch(), 0);
        }

        let mut rng = StdRng::seed_from_u64(7);
        let cursors = source.cursor_set(&[2], 4, Some(&mut rng)).unwrap();
        assert_eq!(cursors.len(), 1);
    }

    #[test]
    fn test_cursor_set_of_zero_is_one() {
        let cursors = source().cursor_set(&[0], 0, None).unwrap();
        assert_eq!(cursors.len(), 1);
        assert_eq!(cursors[0].batch(), 0);
        assert!(cursors[0].is_column_active(0));
    }

    #[test]
    fn test_rng_is_optional() {
        let source = source();
        let mut rng = StdRng::seed_from_u64(42);
        let mut with_rng = source.cursor(&[0], Some(&mut rng)).unwrap();
        let mut without_rng = source.cursor(&[0], None).unwrap();
        assert!(!with_rng.move_next());
        assert!(!without_rng.move_next());
    }

    #[test]
    fn test_move_next_is_idempotent() {
        let mut cursor = source().cursor(&[0, 1, 2], None).unwrap();
        assert_eq!(cursor.state(), CursorState::BeforeStart);
        assert_eq!(cursor.batch(), 0);

        for _ in 0..5 {
            assert!(!cursor.move_next());
            assert_eq!(cursor.state(), CursorState::Exhausted);
        }
        assert_eq!(cursor.position(), None);
    }

    #[test]
    fn test_is_column_active() {
        let cursor = source().cursor(&[1], None).unwrap();
        assert!(!cursor.is_column_active(0));
        assert!(cursor.is_column_active(1));
        assert!(!cursor.is_column_active(2));
        assert!(!cursor.is_column_active(3));
        assert!(!cursor.is_column_active(usize::MAX));
    }

    #[test]
    fn test_requested_column_out_of_range() {
        let err = source().cursor(&[0, 3], None).err().unwrap();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_active_getter_fails_on_invoke() {
        let mut cursor = source().cursor(&[0, 1, 2], None).unwrap();
        let id = cursor.getter::<i64>(0).unwrap();
        let name = cursor.getter::<String>(1).unwrap();
        let score = cursor.getter::<Value>(2).unwrap();

        assert!(id.get(&cursor).unwrap_err().is_row_state());
        assert!(!cursor.move_next());
        assert!(id.get(&cursor).unwrap_err().is_row_state());
        assert!(name.get(&cursor).unwrap_err().is_row_state());
        assert!(score.get(&cursor).unwrap_err().is_row_state());
    }

    #[test]
    fn test_untyped_getter_for_any_column_type() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("day", DataType::Date32, true),
            Field::new(
                "tags",
                DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))),
                true,
            ),
            Field::new("amount", DataType::Decimal128(10, 2), true),
        ]));
        let source = EmptySource::new(&Host::new("test"), Some(schema)).unwrap();
        let mut cursor = source.cursor(&[0, 1, 2], None).unwrap();

        let getters: Vec<_> = (0..3)
            .map(|col| cursor.getter::<Value>(col).unwrap())
            .collect();
        for getter in &getters {
            assert!(getter.get(&cursor).unwrap_err().is_row_state());
        }
        assert!(!cursor.move_next());
        for getter in &getters {
            assert!(getter.get(&cursor).unwrap_err().is_row_state());
        }
    }

    #[test]
    fn test_inactive_getter_fails_on_create() {
        let cursor = source().cursor(&[], None).unwrap();
        for col in [0, 1, 2, 3, 100] {
            let err = cursor.getter::<Value>(col).unwrap_err();
            assert!(err.is_precondition(), "column {}", col);
        }
    }

    #[test]
    fn test_row_id_getter_always_fails() {
        let mut cursor = source().cursor(&[0], None).unwrap();
        let id = cursor.id_getter();
        assert!(id.get(&cursor).unwrap_err().is_row_state());
        cursor.move_next();
        let err = id.get(&cursor).unwrap_err();
        assert_eq!(
            err,
            CursorError::RowState {
                component: "test/EmptySource/Cursor".into(),
            }
        );
    }

    #[test]
    fn test_fetch_checks_activation_then_row() {
        let mut cursor = source().cursor(&[0], None).unwrap();
        assert!(cursor.fetch(1).unwrap_err().is_precondition());
        assert!(cursor.fetch(0).unwrap_err().is_row_state());
        assert!(cursor.fetch_row_id().unwrap_err().is_row_state());

        assert!(!cursor.move_next());
        assert!(cursor.fetch(1).unwrap_err().is_precondition());
        assert!(cursor.fetch(0).unwrap_err().is_row_state());
        assert!(cursor.fetch_row_id().unwrap_err().is_row_state());
    }

    #[test]
    fn test_three_column_scenario() {
        let source = source();
        let mut cursor = source.cursor(&[0, 2], None).unwrap();

        assert!(cursor.is_column_active(0));
        assert!(!cursor.is_column_active(1));
        assert!(cursor.is_column_active(2));

        assert!(!cursor.move_next());

        let col0 = cursor.getter::<i64>(0).unwrap();
        assert!(col0.get(&cursor).unwrap_err().is_row_state());

        assert!(cursor.getter::<String>(1).unwrap_err().is_precondition());
    }

    #[test]
    fn test_cursors_are_independent() {
        let source = source();
        let mut first = source.cursor(&[0], None).unwrap();
        let second = source.cursor(&[0], None).unwrap();
        first.move_next();
        assert_eq!(first.state(), CursorState::Exhausted);
        assert_eq!(second.state(), CursorState::BeforeStart);
    }
}
