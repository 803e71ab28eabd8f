pub mod byte_array;
pub mod status;

pub use byte_array::ByteArray;
pub use status::{Code, Result, Status, check_index};
