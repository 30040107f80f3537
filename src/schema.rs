//! Helpers over Arrow schemas: column lookup and activation masks.

use arrow::datatypes::SchemaRef;

use crate::error::Result;
use crate::host::Host;

/// Index of the column called `name`, if any.
pub fn column_index(schema: &SchemaRef, name: &str) -> Option<usize> {
    schema.fields().iter().position(|f| f.name() == name)
}

/// Resolve column names to indices, in the order given.
pub fn resolve_columns(host: &Host, schema: &SchemaRef, names: &[String]) -> Result<Vec<usize>> {
    names
        .iter()
        .map(|name| {
            column_index(schema, name)
                .ok_or_else(|| host.precondition(format!("unknown column '{}'", name)))
        })
        .collect()
}

/// Build the activation mask for a cursor over `schema`.
///
/// Every requested index must address a column; duplicates are fine.
pub fn active_mask(host: &Host, schema: &SchemaRef, columns_needed: &[usize]) -> Result<Vec<bool>> {
    let count = schema.fields().len();
    let mut active = vec![false; count];
    for &col in columns_needed {
        host.check(col < count, || {
            format!("column index {} out of range (have {})", col, count)
        })?;
        active[col] = true;
    }
    Ok(active)
}
