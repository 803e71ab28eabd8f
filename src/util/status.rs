use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    InvalidArgument,
    InvalidPosition,
    IndexOutOfRange,
    TypeMismatch,
    NotFound,
    NotSupported,
    Incomplete,
    Corruption,
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct Status {
    code: Code,
    message: String,
}

impl Status {
    pub fn new(code: Code, msg: impl Into<String>) -> Self {
        Status {
            code,
            message: msg.into(),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Status::new(Code::InvalidArgument, msg)
    }

    pub fn invalid_position(msg: impl Into<String>) -> Self {
        Status::new(Code::InvalidPosition, msg)
    }

    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Status::new(
            Code::IndexOutOfRange,
            format!("property index {index} out of range (num properties: {len})"),
        )
    }

    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Status::new(Code::TypeMismatch, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Status::new(Code::NotFound, msg)
    }

    pub fn not_supported(msg: impl Into<String>) -> Self {
        Status::new(Code::NotSupported, msg)
    }

    pub fn incomplete(msg: impl Into<String>) -> Self {
        Status::new(Code::Incomplete, msg)
    }

    pub fn corruption(msg: impl Into<String>) -> Self {
        Status::new(Code::Corruption, msg)
    }

    pub fn is_invalid_position(&self) -> bool {
        self.code == Code::InvalidPosition
    }

    pub fn is_index_out_of_range(&self) -> bool {
        self.code == Code::IndexOutOfRange
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Code::NotFound
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for Status {
    fn from(err: serde_json::Error) -> Self {
        Status::corruption(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Status>;

/// Fails with `IndexOutOfRange` unless `index < len`.
#[inline]
pub fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Status::index_out_of_range(index, len))
    }
}
