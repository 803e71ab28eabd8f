use serde::{Deserialize, Serialize};

/// Axis aligned bounding rectangle.
///
/// A freshly created `Envelope::invalid()` has inverted bounds so the first
/// `union` adopts the other rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl Envelope {
    pub fn new(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        Envelope { llx, lly, urx, ury }
    }

    pub fn invalid() -> Self {
        Envelope {
            llx: f64::MAX,
            lly: f64::MAX,
            urx: f64::MIN,
            ury: f64::MIN,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.llx <= self.urx && self.lly <= self.ury
    }

    pub fn union(&mut self, other: &Envelope) {
        self.llx = self.llx.min(other.llx);
        self.lly = self.lly.min(other.lly);
        self.urx = self.urx.max(other.urx);
        self.ury = self.ury.max(other.ury);
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Envelope::invalid()
    }
}
