pub mod cursor;
pub mod datatype;
pub mod memory;
pub mod statistics;
pub mod util;

pub use cursor::{
    AccessPolicy, Capabilities, Cursor, CursorHolder, FilteredView, InstrumentedCursor, Position,
    TraverseType, ViewOptions,
};
pub use datatype::{AbstractData, CharEncoding, DataType, Envelope, Opaque, Value};
pub use memory::{DataSetItem, MemoryDataSet, Property, Schema};
pub use statistics::CursorStatistics;
pub use util::{ByteArray, Code, Result, Status};
