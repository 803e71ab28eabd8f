//! Column value types
//!
//! Scalars are carried by value. Geometry, raster, date-time and array
//! payloads belong to collaborating subsystems; this crate only moves
//! `Opaque` handles to them around and never looks inside.
use std::{any::Any, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::util::ByteArray;

mod envelope;

pub use envelope::Envelope;

/// Underlying data type of a property (column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Char,
    UChar,
    Int16,
    Int32,
    Int64,
    Boolean,
    Float,
    Double,
    /// Arbitrary precision number carried as text
    Numeric,
    String,
    ByteArray,
    Geometry,
    Raster,
    DateTime,
    Array,
    Unknown,
}

impl DataType {
    /// True for the kinds whose payload is an `Opaque` handle.
    pub fn is_opaque(&self) -> bool {
        matches!(
            self,
            DataType::Geometry | DataType::Raster | DataType::DateTime | DataType::Array
        )
    }
}

/// Character encoding of a text property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharEncoding {
    #[default]
    Utf8,
    Latin1,
    Cp1250,
    Cp1251,
    Cp1252,
    Cp1253,
    Cp1254,
    Cp1257,
    Unknown,
}

/// Payload implemented by the subsystems that own geometry, raster,
/// date-time and array values.
pub trait AbstractData: Any + fmt::Debug + Send + Sync {
    fn data_type(&self) -> DataType;

    /// Textual form used by `Cursor::get_as_string`.
    fn to_text(&self) -> String;

    /// Minimum bounding rectangle, for spatial payloads only.
    fn envelope(&self) -> Option<Envelope> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to an `AbstractData` payload. Cloning never copies the
/// payload.
#[derive(Clone)]
pub struct Opaque(Arc<dyn AbstractData>);

impl Opaque {
    pub fn new<T: AbstractData>(data: T) -> Self {
        Opaque(Arc::new(data))
    }

    pub fn from_arc(data: Arc<dyn AbstractData>) -> Self {
        Opaque(data)
    }

    pub fn data_type(&self) -> DataType {
        self.0.data_type()
    }

    pub fn to_text(&self) -> String {
        self.0.to_text()
    }

    pub fn envelope(&self) -> Option<Envelope> {
        self.0.envelope()
    }

    pub fn downcast_ref<T: AbstractData>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// True if both handles point at the same payload.
    pub fn ptr_eq(&self, other: &Opaque) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({:?})", self.0)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

/// One non-null column value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Char(i8),
    UChar(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Boolean(bool),
    Float(f32),
    Double(f64),
    Numeric(String),
    String(String),
    ByteArray(ByteArray),
    Geometry(Opaque),
    Raster(Opaque),
    DateTime(Opaque),
    Array(Opaque),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Char(_) => DataType::Char,
            Value::UChar(_) => DataType::UChar,
            Value::Int16(_) => DataType::Int16,
            Value::Int32(_) => DataType::Int32,
            Value::Int64(_) => DataType::Int64,
            Value::Boolean(_) => DataType::Boolean,
            Value::Float(_) => DataType::Float,
            Value::Double(_) => DataType::Double,
            Value::Numeric(_) => DataType::Numeric,
            Value::String(_) => DataType::String,
            Value::ByteArray(_) => DataType::ByteArray,
            Value::Geometry(_) => DataType::Geometry,
            Value::Raster(_) => DataType::Raster,
            Value::DateTime(_) => DataType::DateTime,
            Value::Array(_) => DataType::Array,
        }
    }

    /// Render as text. `precision > 0` fixes the number of decimals for
    /// floating point values.
    pub fn to_text(&self, precision: usize) -> String {
        match self {
            Value::Char(v) => v.to_string(),
            Value::UChar(v) => v.to_string(),
            Value::Int16(v) => v.to_string(),
            Value::Int32(v) => v.to_string(),
            Value::Int64(v) => v.to_string(),
            Value::Boolean(v) => v.to_string(),
            Value::Float(v) if precision > 0 => format!("{v:.precision$}"),
            Value::Float(v) => v.to_string(),
            Value::Double(v) if precision > 0 => format!("{v:.precision$}"),
            Value::Double(v) => v.to_string(),
            Value::Numeric(v) | Value::String(v) => v.clone(),
            Value::ByteArray(v) => v.to_hex(),
            Value::Geometry(v) | Value::Raster(v) | Value::DateTime(v) | Value::Array(v) => {
                v.to_text()
            }
        }
    }

    pub fn as_opaque(&self) -> Option<&Opaque> {
        match self {
            Value::Geometry(v) | Value::Raster(v) | Value::DateTime(v) | Value::Array(v) => {
                Some(v)
            }
            _ => None,
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
