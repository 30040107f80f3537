mod source;

pub use source::{ArrowCursor, ArrowTableSource};
