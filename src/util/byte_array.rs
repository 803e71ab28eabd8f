use std::fmt;

use bytes::Bytes;

/// Immutable binary column value.
///
/// Clones share the underlying buffer, so forwarding a blob through a view
/// never copies it.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ByteArray {
    data: Bytes,
}

impl ByteArray {
    pub fn new(data: Vec<u8>) -> Self {
        ByteArray {
            data: Bytes::from(data),
        }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        ByteArray {
            data: Bytes::copy_from_slice(data),
        }
    }

    pub fn empty() -> Self {
        ByteArray { data: Bytes::new() }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Lowercase hex rendering, used for textual output of blob columns.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.data)
    }
}

impl From<Vec<u8>> for ByteArray {
    fn from(data: Vec<u8>) -> Self {
        ByteArray::new(data)
    }
}

impl From<&[u8]> for ByteArray {
    fn from(data: &[u8]) -> Self {
        ByteArray::from_bytes(data)
    }
}

impl From<Bytes> for ByteArray {
    fn from(data: Bytes) -> Self {
        ByteArray { data }
    }
}

impl From<&str> for ByteArray {
    fn from(s: &str) -> Self {
        ByteArray::from_bytes(s.as_bytes())
    }
}

impl AsRef<[u8]> for ByteArray {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Debug for ByteArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.data) {
            Ok(s) => write!(f, "ByteArray(\"{s}\")"),
            Err(_) => write!(f, "ByteArray({:?})", self.data.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_array_creation() {
        let b = ByteArray::from("hello");
        assert_eq!(b.size(), 5);
        assert_eq!(b.data(), b"hello");
        assert!(ByteArray::empty().is_empty());
    }

    #[test]
    fn test_clone_shares_buffer() {
        let b = ByteArray::new(vec![1, 2, 3]);
        let c = b.clone();
        assert_eq!(b.data().as_ptr(), c.data().as_ptr());
    }

    #[test]
    fn test_to_hex() {
        let b = ByteArray::new(vec![0x00, 0xab, 0x10]);
        assert_eq!(b.to_hex(), "00ab10");
        assert_eq!(ByteArray::empty().to_hex(), "");
    }

    #[test]
    fn test_blob_value_renders_as_hex() {
        let v = crate::datatype::Value::ByteArray(ByteArray::from("Hi"));
        assert_eq!(v.to_text(0), "4869");
    }
}
