//! Drive a cursor set over a source and collect what each cursor saw.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

use crate::cursor::{RowCursor, RowCursorExt};
use crate::error::Result;
use crate::host::Host;
use crate::schema::resolve_columns;
use crate::source::TabularSource;
use crate::value::{RowId, Value};

/// Options for scanning a source.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Columns to read, by name. If None, all columns are read.
    pub columns: Option<Vec<String>>,
    /// Number of cursors to ask the source for.
    pub partitions: usize,
    /// Seed for shuffling. If None, rows are visited in source order.
    pub seed: Option<u64>,
    /// Maximum rows to collect per cursor.
    pub limit: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            columns: None,
            partitions: 1,
            seed: None,
            limit: None,
        }
    }
}

/// Rows collected from one cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionReport {
    /// The cursor's batch id.
    pub batch: u64,
    pub row_ids: Vec<RowId>,
    /// Values of the scanned columns, one inner vector per row.
    pub rows: Vec<Vec<Value>>,
}

/// Result of a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    /// Names of the scanned columns, in output order.
    pub columns: Vec<String>,
    /// One entry per cursor the source returned.
    pub partitions: Vec<PartitionReport>,
}

impl ScanReport {
    pub fn total_rows(&self) -> usize {
        self.partitions.iter().map(|p| p.rows.len()).sum()
    }
}

/// Scan `source` with a cursor set, driving each cursor on its own thread.
pub fn scan(host: &Host, source: &dyn TabularSource, options: &ScanOptions) -> Result<ScanReport> {
    let host = host.register("Scan");
    let _span = host.span().entered();

    let schema = source.schema();
    let columns = match &options.columns {
        Some(names) => resolve_columns(&host, schema, names)?,
        None => (0..schema.fields().len()).collect(),
    };

    let mut rng = options.seed.map(StdRng::seed_from_u64);
    let cursors = source.cursor_set(
        &columns,
        options.partitions,
        rng.as_mut().map(|r| r as &mut dyn RngCore),
    )?;
    info!(
        requested = options.partitions,
        returned = cursors.len(),
        columns = columns.len(),
        "scanning"
    );

    let partitions = std::thread::scope(|scope| {
        let handles: Vec<_> = cursors
            .into_iter()
            .map(|cursor| {
                let columns = &columns;
                scope.spawn(move || drain(cursor, columns, options.limit))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect::<Result<Vec<_>>>()
    })?;

    Ok(ScanReport {
        columns: columns
            .iter()
            .map(|&c| schema.field(c).name().clone())
            .collect(),
        partitions,
    })
}

/// Read up to `limit` rows of `columns` from one cursor.
fn drain(mut cursor: Box<dyn RowCursor>, columns: &[usize], limit: Option<usize>) -> Result<PartitionReport> {
    let getters = columns
        .iter()
        .map(|&col| cursor.getter::<Value>(col))
        .collect::<Result<Vec<_>>>()?;
    let id = cursor.id_getter();

    let mut report = PartitionReport {
        batch: cursor.batch(),
        row_ids: Vec::new(),
        rows: Vec::new(),
    };

    while limit.map_or(true, |limit| report.rows.len() < limit) && cursor.move_next() {
        let row = getters
            .iter()
            .map(|getter| getter.get(&cursor).map(|v| v.unwrap_or(Value::Null)))
            .collect::<Result<Vec<_>>>()?;
        report.row_ids.push(id.get(&cursor)?);
        report.rows.push(row);
    }

    debug!(batch = report.batch, rows = report.rows.len(), "partition drained");
    Ok(report)
}
