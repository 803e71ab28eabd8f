//! Cursor module for rowset
//!
//! A cursor is a positioned pointer into an ordered sequence of rows, the
//! same contract as a client-side database result set. Every backing data
//! source (file reader, remote result stream, in-memory table) implements
//! [`Cursor`]; consumers traverse and read rows through it without knowing
//! which source is underneath.
//!
//! # Architecture
//!
//! ```text
//! consumer (query executor, join, predicate filter)
//!     ↓
//! FilteredView            (logical → source position translation)
//!     ├─→ Capabilities    (direct seek vs forward replay)
//!     └─→ CursorHolder    (owned or borrowed backing cursor)
//!             ↓
//!         dyn Cursor      (MemoryDataSet, InstrumentedCursor, another view, ...)
//! ```
//!
//! A `FilteredView` is itself a `Cursor`, so views compose.
use std::fmt;

use crate::{
    datatype::{CharEncoding, DataType, Envelope, Opaque, Value},
    util::{ByteArray, Result, Status, check_index},
};

mod capabilities;
mod filtered;
mod holder;
mod instrumented;

pub use capabilities::Capabilities;
pub use filtered::{FilteredView, ViewOptions};
pub use holder::CursorHolder;
pub use instrumented::InstrumentedCursor;

/// Row position of a cursor
///
/// Before any move a cursor sits on `BeforeFirst`. Walking off either end
/// lands on the matching sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    #[default]
    BeforeFirst,
    At(usize),
    AfterLast,
}

impl Position {
    pub fn row(&self) -> Option<usize> {
        match self {
            Position::At(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_row(&self) -> bool {
        matches!(self, Position::At(_))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::BeforeFirst => write!(f, "before-first"),
            Position::At(i) => write!(f, "{i}"),
            Position::AfterLast => write!(f, "after-last"),
        }
    }
}

/// How a cursor may be traversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraverseType {
    ForwardOnly,
    Bidirectional,
    Random,
}

/// Read/write permission of a cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessPolicy {
    NoAccess,
    RAccess,
    WAccess,
    RWAccess,
}

/// Cursor contract
///
/// # Lifecycle
///
/// A cursor starts on [`Position::BeforeFirst`]. Call one of the move
/// methods before reading:
///
/// ```ignore
/// cursor.move_before_first();
/// while cursor.move_next() {
///     println!("{}", cursor.get_string(0)?);
/// }
/// ```
///
/// # Error Handling
///
/// Movement reports success as a plain `bool`: running off the end and a
/// source that could not complete the move look the same to the caller.
/// Getters return `Result` and fail with `InvalidPosition` when the cursor is
/// not on a row, or `IndexOutOfRange` for a bad property index.
pub trait Cursor {
    fn traverse_type(&self) -> TraverseType;

    fn access_policy(&self) -> AccessPolicy;

    /// Movement capabilities. Providers that know better should override;
    /// the default only trusts a `Random` traverse type.
    fn capabilities(&self) -> Capabilities {
        Capabilities::from_traverse_type(self.traverse_type())
    }

    // Metadata

    fn num_properties(&self) -> usize;

    fn property_data_type(&self, i: usize) -> Result<DataType>;

    fn property_name(&self, i: usize) -> Result<String>;

    /// Name of the dataset a property originally came from
    fn dataset_name_of_property(&self, i: usize) -> Result<String>;

    /// Encoding of a text property. Rows handed out as `String` are always
    /// UTF-8, which is what providers without other knowledge report.
    fn property_char_encoding(&self, i: usize) -> Result<CharEncoding> {
        check_index(i, self.num_properties())?;
        Ok(CharEncoding::Utf8)
    }

    /// Bounding rectangle of a spatial property over all rows
    fn extent(&self, i: usize) -> Result<Envelope>;

    /// Position of the property called `name`
    fn property_position(&self, name: &str) -> Result<usize> {
        for i in 0..self.num_properties() {
            if self.property_name(i)? == name {
                return Ok(i);
            }
        }
        Err(Status::not_found(format!("no property named '{name}'")))
    }

    // Size

    fn is_empty(&self) -> bool;

    /// False once the cursor no longer depends on its data source connection
    fn is_connected(&self) -> bool;

    /// Number of rows, `None` when unknown or too costly to compute
    fn size(&self) -> Option<usize>;

    // Movement

    fn move_next(&mut self) -> bool;

    fn move_previous(&mut self) -> bool;

    fn move_before_first(&mut self) -> bool;

    fn move_first(&mut self) -> bool;

    fn move_last(&mut self) -> bool;

    /// Position on row `i` (zero based). On failure the position is
    /// unspecified and must not be relied on.
    fn move_to(&mut self, i: usize) -> bool;

    fn is_at_begin(&self) -> bool;

    fn is_before_begin(&self) -> bool;

    fn is_at_end(&self) -> bool;

    fn is_after_end(&self) -> bool;

    // Typed access at the current row

    fn get_i8(&self, i: usize) -> Result<i8>;

    fn get_u8(&self, i: usize) -> Result<u8>;

    fn get_i16(&self, i: usize) -> Result<i16>;

    fn get_i32(&self, i: usize) -> Result<i32>;

    fn get_i64(&self, i: usize) -> Result<i64>;

    fn get_bool(&self, i: usize) -> Result<bool>;

    fn get_f32(&self, i: usize) -> Result<f32>;

    fn get_f64(&self, i: usize) -> Result<f64>;

    /// Arbitrary precision number as text
    fn get_numeric(&self, i: usize) -> Result<String>;

    fn get_string(&self, i: usize) -> Result<String>;

    fn get_byte_array(&self, i: usize) -> Result<ByteArray>;

    fn get_geometry(&self, i: usize) -> Result<Opaque>;

    fn get_raster(&self, i: usize) -> Result<Opaque>;

    fn get_date_time(&self, i: usize) -> Result<Opaque>;

    fn get_array(&self, i: usize) -> Result<Opaque>;

    fn is_null(&self, i: usize) -> Result<bool>;

    /// Generic getter: dispatches on the property's data type. `None` for
    /// a null value.
    fn get_value(&self, i: usize) -> Result<Option<Value>> {
        if self.is_null(i)? {
            return Ok(None);
        }
        let value = match self.property_data_type(i)? {
            DataType::Char => Value::Char(self.get_i8(i)?),
            DataType::UChar => Value::UChar(self.get_u8(i)?),
            DataType::Int16 => Value::Int16(self.get_i16(i)?),
            DataType::Int32 => Value::Int32(self.get_i32(i)?),
            DataType::Int64 => Value::Int64(self.get_i64(i)?),
            DataType::Boolean => Value::Boolean(self.get_bool(i)?),
            DataType::Float => Value::Float(self.get_f32(i)?),
            DataType::Double => Value::Double(self.get_f64(i)?),
            DataType::Numeric => Value::Numeric(self.get_numeric(i)?),
            DataType::String => Value::String(self.get_string(i)?),
            DataType::ByteArray => Value::ByteArray(self.get_byte_array(i)?),
            DataType::Geometry => Value::Geometry(self.get_geometry(i)?),
            DataType::Raster => Value::Raster(self.get_raster(i)?),
            DataType::DateTime => Value::DateTime(self.get_date_time(i)?),
            DataType::Array => Value::Array(self.get_array(i)?),
            DataType::Unknown => {
                return Err(Status::not_supported(format!(
                    "property {i} has an unknown data type"
                )));
            }
        };
        Ok(Some(value))
    }

    fn get_value_by_name(&self, name: &str) -> Result<Option<Value>> {
        let i = self.property_position(name)?;
        self.get_value(i)
    }

    fn is_null_by_name(&self, name: &str) -> Result<bool> {
        let i = self.property_position(name)?;
        self.is_null(i)
    }

    // Access by property name
    fn get_i8_by_name(&self, name: &str) -> Result<i8> {
        let i = self.property_position(name)?;
        self.get_i8(i)
    }

    fn get_u8_by_name(&self, name: &str) -> Result<u8> {
        let i = self.property_position(name)?;
        self.get_u8(i)
    }

    fn get_i16_by_name(&self, name: &str) -> Result<i16> {
        let i = self.property_position(name)?;
        self.get_i16(i)
    }

    fn get_i32_by_name(&self, name: &str) -> Result<i32> {
        let i = self.property_position(name)?;
        self.get_i32(i)
    }

    fn get_i64_by_name(&self, name: &str) -> Result<i64> {
        let i = self.property_position(name)?;
        self.get_i64(i)
    }

    fn get_bool_by_name(&self, name: &str) -> Result<bool> {
        let i = self.property_position(name)?;
        self.get_bool(i)
    }

    fn get_f32_by_name(&self, name: &str) -> Result<f32> {
        let i = self.property_position(name)?;
        self.get_f32(i)
    }

    fn get_f64_by_name(&self, name: &str) -> Result<f64> {
        let i = self.property_position(name)?;
        self.get_f64(i)
    }

    fn get_numeric_by_name(&self, name: &str) -> Result<String> {
        let i = self.property_position(name)?;
        self.get_numeric(i)
    }

    fn get_string_by_name(&self, name: &str) -> Result<String> {
        let i = self.property_position(name)?;
        self.get_string(i)
    }

    fn get_byte_array_by_name(&self, name: &str) -> Result<ByteArray> {
        let i = self.property_position(name)?;
        self.get_byte_array(i)
    }

    fn get_geometry_by_name(&self, name: &str) -> Result<Opaque> {
        let i = self.property_position(name)?;
        self.get_geometry(i)
    }

    fn get_raster_by_name(&self, name: &str) -> Result<Opaque> {
        let i = self.property_position(name)?;
        self.get_raster(i)
    }

    fn get_date_time_by_name(&self, name: &str) -> Result<Opaque> {
        let i = self.property_position(name)?;
        self.get_date_time(i)
    }

    fn get_array_by_name(&self, name: &str) -> Result<Opaque> {
        let i = self.property_position(name)?;
        self.get_array(i)
    }

    /// Text rendering of property `i`; empty for null
    fn get_as_string(&self, i: usize, precision: usize) -> Result<String> {
        Ok(self
            .get_value(i)?
            .map(|v| v.to_text(precision))
            .unwrap_or_default())
    }

    fn get_as_string_by_name(&self, name: &str, precision: usize) -> Result<String> {
        let i = self.property_position(name)?;
        self.get_as_string(i, precision)
    }
}

/// Forwards every `Cursor` method to the pointee, including the provided
/// ones so that overrides in the target are honored.
macro_rules! forward_cursor {
    () => {
        fn traverse_type(&self) -> TraverseType {
            (**self).traverse_type()
        }

        fn access_policy(&self) -> AccessPolicy {
            (**self).access_policy()
        }

        fn capabilities(&self) -> Capabilities {
            (**self).capabilities()
        }

        fn num_properties(&self) -> usize {
            (**self).num_properties()
        }

        fn property_data_type(&self, i: usize) -> Result<DataType> {
            (**self).property_data_type(i)
        }

        fn property_name(&self, i: usize) -> Result<String> {
            (**self).property_name(i)
        }

        fn dataset_name_of_property(&self, i: usize) -> Result<String> {
            (**self).dataset_name_of_property(i)
        }

        fn property_char_encoding(&self, i: usize) -> Result<CharEncoding> {
            (**self).property_char_encoding(i)
        }

        fn extent(&self, i: usize) -> Result<Envelope> {
            (**self).extent(i)
        }

        fn property_position(&self, name: &str) -> Result<usize> {
            (**self).property_position(name)
        }

        fn is_empty(&self) -> bool {
            (**self).is_empty()
        }

        fn is_connected(&self) -> bool {
            (**self).is_connected()
        }

        fn size(&self) -> Option<usize> {
            (**self).size()
        }

        fn move_next(&mut self) -> bool {
            (**self).move_next()
        }

        fn move_previous(&mut self) -> bool {
            (**self).move_previous()
        }

        fn move_before_first(&mut self) -> bool {
            (**self).move_before_first()
        }

        fn move_first(&mut self) -> bool {
            (**self).move_first()
        }

        fn move_last(&mut self) -> bool {
            (**self).move_last()
        }

        fn move_to(&mut self, i: usize) -> bool {
            (**self).move_to(i)
        }

        fn is_at_begin(&self) -> bool {
            (**self).is_at_begin()
        }

        fn is_before_begin(&self) -> bool {
            (**self).is_before_begin()
        }

        fn is_at_end(&self) -> bool {
            (**self).is_at_end()
        }

        fn is_after_end(&self) -> bool {
            (**self).is_after_end()
        }

        fn get_i8(&self, i: usize) -> Result<i8> {
            (**self).get_i8(i)
        }

        fn get_u8(&self, i: usize) -> Result<u8> {
            (**self).get_u8(i)
        }

        fn get_i16(&self, i: usize) -> Result<i16> {
            (**self).get_i16(i)
        }

        fn get_i32(&self, i: usize) -> Result<i32> {
            (**self).get_i32(i)
        }

        fn get_i64(&self, i: usize) -> Result<i64> {
            (**self).get_i64(i)
        }

        fn get_bool(&self, i: usize) -> Result<bool> {
            (**self).get_bool(i)
        }

        fn get_f32(&self, i: usize) -> Result<f32> {
            (**self).get_f32(i)
        }

        fn get_f64(&self, i: usize) -> Result<f64> {
            (**self).get_f64(i)
        }

        fn get_numeric(&self, i: usize) -> Result<String> {
            (**self).get_numeric(i)
        }

        fn get_string(&self, i: usize) -> Result<String> {
            (**self).get_string(i)
        }

        fn get_byte_array(&self, i: usize) -> Result<ByteArray> {
            (**self).get_byte_array(i)
        }

        fn get_geometry(&self, i: usize) -> Result<Opaque> {
            (**self).get_geometry(i)
        }

        fn get_raster(&self, i: usize) -> Result<Opaque> {
            (**self).get_raster(i)
        }

        fn get_date_time(&self, i: usize) -> Result<Opaque> {
            (**self).get_date_time(i)
        }

        fn get_array(&self, i: usize) -> Result<Opaque> {
            (**self).get_array(i)
        }

        fn is_null(&self, i: usize) -> Result<bool> {
            (**self).is_null(i)
        }

        fn get_value(&self, i: usize) -> Result<Option<Value>> {
            (**self).get_value(i)
        }

        fn get_as_string(&self, i: usize, precision: usize) -> Result<String> {
            (**self).get_as_string(i, precision)
        }

        fn get_value_by_name(&self, name: &str) -> Result<Option<Value>> {
            (**self).get_value_by_name(name)
        }

        fn is_null_by_name(&self, name: &str) -> Result<bool> {
            (**self).is_null_by_name(name)
        }

        fn get_as_string_by_name(&self, name: &str, precision: usize) -> Result<String> {
            (**self).get_as_string_by_name(name, precision)
        }

        fn get_i8_by_name(&self, name: &str) -> Result<i8> {
            (**self).get_i8_by_name(name)
        }

        fn get_u8_by_name(&self, name: &str) -> Result<u8> {
            (**self).get_u8_by_name(name)
        }

        fn get_i16_by_name(&self, name: &str) -> Result<i16> {
            (**self).get_i16_by_name(name)
        }

        fn get_i32_by_name(&self, name: &str) -> Result<i32> {
            (**self).get_i32_by_name(name)
        }

        fn get_i64_by_name(&self, name: &str) -> Result<i64> {
            (**self).get_i64_by_name(name)
        }

        fn get_bool_by_name(&self, name: &str) -> Result<bool> {
            (**self).get_bool_by_name(name)
        }

        fn get_f32_by_name(&self, name: &str) -> Result<f32> {
            (**self).get_f32_by_name(name)
        }

        fn get_f64_by_name(&self, name: &str) -> Result<f64> {
            (**self).get_f64_by_name(name)
        }

        fn get_numeric_by_name(&self, name: &str) -> Result<String> {
            (**self).get_numeric_by_name(name)
        }

        fn get_string_by_name(&self, name: &str) -> Result<String> {
            (**self).get_string_by_name(name)
        }

        fn get_byte_array_by_name(&self, name: &str) -> Result<ByteArray> {
            (**self).get_byte_array_by_name(name)
        }

        fn get_geometry_by_name(&self, name: &str) -> Result<Opaque> {
            (**self).get_geometry_by_name(name)
        }

        fn get_raster_by_name(&self, name: &str) -> Result<Opaque> {
            (**self).get_raster_by_name(name)
        }

        fn get_date_time_by_name(&self, name: &str) -> Result<Opaque> {
            (**self).get_date_time_by_name(name)
        }

        fn get_array_by_name(&self, name: &str) -> Result<Opaque> {
            (**self).get_array_by_name(name)
        }
    };
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    forward_cursor!();
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    forward_cursor!();
}
