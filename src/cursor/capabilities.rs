use serde::{Deserialize, Serialize};

use crate::{cursor::TraverseType, util::Result};

/// Movement capabilities of a cursor
///
/// Every flag defaults to `false`: an unknown capability is never assumed.
/// `efficient_move` (O(1) positioning on an arbitrary row) is the one flag
/// `FilteredView` acts on.
///
/// # Example
///
/// ```ignore
/// let caps = Capabilities::from_json(r#"{"random": true, "efficient_move": true}"#)?;
/// assert!(caps.efficient_move);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub bidirectional: bool,
    pub random: bool,
    pub indexed: bool,
    pub efficient_move_previous: bool,
    pub efficient_move_before_first: bool,
    pub efficient_move_last: bool,
    pub efficient_move_after_last: bool,
    pub efficient_move: bool,
    pub efficient_size: bool,
}

impl Capabilities {
    pub fn new() -> Self {
        Capabilities::default()
    }

    /// Capabilities implied by a traverse type alone. Only `Random` implies
    /// efficient positioning.
    pub fn from_traverse_type(traverse_type: TraverseType) -> Self {
        match traverse_type {
            TraverseType::ForwardOnly => Capabilities::default(),
            TraverseType::Bidirectional => Capabilities {
                bidirectional: true,
                ..Default::default()
            },
            TraverseType::Random => Capabilities {
                bidirectional: true,
                random: true,
                efficient_move: true,
                ..Default::default()
            },
        }
    }

    pub fn with_efficient_move(mut self, yes: bool) -> Self {
        self.efficient_move = yes;
        self
    }

    pub fn with_bidirectional(mut self, yes: bool) -> Self {
        self.bidirectional = yes;
        self
    }

    pub fn with_random(mut self, yes: bool) -> Self {
        self.random = yes;
        self
    }

    pub fn with_efficient_size(mut self, yes: bool) -> Self {
        self.efficient_size = yes;
        self
    }

    pub fn supports_efficient_move(&self) -> bool {
        self.efficient_move
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
