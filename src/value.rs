//! Cell values, value kinds and row identifiers.
//!
//! The set of value kinds a getter can produce is closed. A caller asks for a
//! getter of some Rust type; the type's `ColumnValue` impl decides whether it
//! can be produced from the column's kind, so a wrong type is rejected when the
//! getter is created instead of when a value is read. Columns whose Arrow type
//! has no dedicated kind map to `ValueKind::Other` and can only be read
//! untyped, as a rendered `Value::Other`.

use std::fmt;

use arrow::datatypes::{DataType, TimeUnit};

/// Kinds of value a column can yield through a getter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Utf8,
    Binary,
    TimestampNanos,
    DurationNanos,
    /// Any other Arrow type.
    Other,
}

impl ValueKind {
    /// Kind produced by a column of the given Arrow type.
    pub fn of(data_type: &DataType) -> Self {
        match data_type {
            DataType::Boolean => ValueKind::Boolean,
            DataType::Int8 => ValueKind::Int8,
            DataType::Int16 => ValueKind::Int16,
            DataType::Int32 => ValueKind::Int32,
            DataType::Int64 => ValueKind::Int64,
            DataType::UInt8 => ValueKind::UInt8,
            DataType::UInt16 => ValueKind::UInt16,
            DataType::UInt32 => ValueKind::UInt32,
            DataType::UInt64 => ValueKind::UInt64,
            DataType::Float32 => ValueKind::Float32,
            DataType::Float64 => ValueKind::Float64,
            DataType::Utf8 | DataType::LargeUtf8 => ValueKind::Utf8,
            DataType::Binary | DataType::LargeBinary => ValueKind::Binary,
            DataType::Timestamp(TimeUnit::Nanosecond, _) => ValueKind::TimestampNanos,
            DataType::Duration(TimeUnit::Nanosecond) => ValueKind::DurationNanos,
            _ => ValueKind::Other,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Boolean => "bool",
            ValueKind::Int8 => "i8",
            ValueKind::Int16 => "i16",
            ValueKind::Int32 => "i32",
            ValueKind::Int64 => "i64",
            ValueKind::UInt8 => "u8",
            ValueKind::UInt16 => "u16",
            ValueKind::UInt32 => "u32",
            ValueKind::UInt64 => "u64",
            ValueKind::Float32 => "f32",
            ValueKind::Float64 => "f64",
            ValueKind::Utf8 => "string",
            ValueKind::Binary => "binary",
            ValueKind::TimestampNanos => "timestamp",
            ValueKind::DurationNanos => "duration",
            ValueKind::Other => "other",
        }
    }
}

/// Timestamp as nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimestampNanos(pub i64);

/// Elapsed time in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DurationNanos(pub i64);

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Utf8(String),
    Binary(Vec<u8>),
    TimestampNanos(i64),
    DurationNanos(i64),
    /// Rendered form of a value whose type has no dedicated kind.
    Other(String),
}

impl Value {
    /// Kind of this value; `None` for null.
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(ValueKind::Boolean),
            Value::Int8(_) => Some(ValueKind::Int8),
            Value::Int16(_) => Some(ValueKind::Int16),
            Value::Int32(_) => Some(ValueKind::Int32),
            Value::Int64(_) => Some(ValueKind::Int64),
            Value::UInt8(_) => Some(ValueKind::UInt8),
            Value::UInt16(_) => Some(ValueKind::UInt16),
            Value::UInt32(_) => Some(ValueKind::UInt32),
            Value::UInt64(_) => Some(ValueKind::UInt64),
            Value::Float32(_) => Some(ValueKind::Float32),
            Value::Float64(_) => Some(ValueKind::Float64),
            Value::Utf8(_) => Some(ValueKind::Utf8),
            Value::Binary(_) => Some(ValueKind::Binary),
            Value::TimestampNanos(_) => Some(ValueKind::TimestampNanos),
            Value::DurationNanos(_) => Some(ValueKind::DurationNanos),
            Value::Other(_) => Some(ValueKind::Other),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Int8(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt8(v) => write!(f, "{}", v),
            Value::UInt16(v) => write!(f, "{}", v),
            Value::UInt32(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Float32(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Utf8(v) => write!(f, "{}", v),
            Value::Binary(v) => {
                write!(f, "0x")?;
                for b in v {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            Value::TimestampNanos(v) => write!(f, "{}ns", v),
            Value::DurationNanos(v) => write!(f, "+{}ns", v),
            Value::Other(v) => write!(f, "{}", v),
        }
    }
}

/// Rust types a getter can produce.
pub trait ColumnValue: Sized {
    /// Name used in type mismatch errors.
    const TYPE_NAME: &'static str;

    /// Whether a column of `kind` can be read as `Self`.
    fn accepts(kind: ValueKind) -> bool;

    /// Convert a non-null value. Returns `None` on a kind mismatch.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_column_value {
    ($ty:ty, $name:literal, $kind:ident) => {
        impl ColumnValue for $ty {
            const TYPE_NAME: &'static str = $name;

            fn accepts(kind: ValueKind) -> bool {
                kind == ValueKind::$kind
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$kind(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_column_value!(bool, "bool", Boolean);
impl_column_value!(i8, "i8", Int8);
impl_column_value!(i16, "i16", Int16);
impl_column_value!(i32, "i32", Int32);
impl_column_value!(i64, "i64", Int64);
impl_column_value!(u8, "u8", UInt8);
impl_column_value!(u16, "u16", UInt16);
impl_column_value!(u32, "u32", UInt32);
impl_column_value!(u64, "u64", UInt64);
impl_column_value!(f32, "f32", Float32);
impl_column_value!(f64, "f64", Float64);
impl_column_value!(String, "string", Utf8);
impl_column_value!(Vec<u8>, "binary", Binary);

macro_rules! impl_column_value_newtype {
    ($ty:ident, $name:literal) => {
        impl ColumnValue for $ty {
            const TYPE_NAME: &'static str = $name;

            fn accepts(kind: ValueKind) -> bool {
                kind == ValueKind::$ty
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::$ty(v) => Some($ty(v)),
                    _ => None,
                }
            }
        }
    };
}

impl_column_value_newtype!(TimestampNanos, "timestamp");
impl_column_value_newtype!(DurationNanos, "duration");

/// Untyped access: any column, including `ValueKind::Other`.
impl ColumnValue for Value {
    const TYPE_NAME: &'static str = "value";

    fn accepts(_kind: ValueKind) -> bool {
        true
    }

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

/// Opaque 128-bit row identifier, unique within one traversal of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct RowId {
    pub high: u64,
    pub low: u64,
}

impl RowId {
    pub fn new(high: u64, low: u64) -> Self {
        Self { high, low }
    }
}

impl From<u64> for RowId {
    fn from(low: u64) -> Self {
        Self { high: 0, low }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.high, self.low)
    }
}
