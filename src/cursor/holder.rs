use std::ops::{Deref, DerefMut};

/// Owned or borrowed backing cursor.
///
/// `Owned` drops the cursor together with the holder. `Borrowed` holds a
/// mutable borrow, so the original owner cannot touch (or drop) the cursor
/// until the holder is gone, and gets it back intact afterwards.
pub enum CursorHolder<'a, C: ?Sized> {
    Owned(Box<C>),
    Borrowed(&'a mut C),
}

impl<'a, C: ?Sized> CursorHolder<'a, C> {
    pub fn is_owned(&self) -> bool {
        matches!(self, CursorHolder::Owned(_))
    }

    /// The owned cursor, or `None` for a borrow.
    pub fn into_owned(self) -> Option<Box<C>> {
        match self {
            CursorHolder::Owned(c) => Some(c),
            CursorHolder::Borrowed(_) => None,
        }
    }
}

impl<C: ?Sized> Deref for CursorHolder<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        match self {
            CursorHolder::Owned(c) => c,
            CursorHolder::Borrowed(c) => c,
        }
    }
}

impl<C: ?Sized> DerefMut for CursorHolder<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        match self {
            CursorHolder::Owned(c) => c,
            CursorHolder::Borrowed(c) => c,
        }
    }
}

impl<C: ?Sized> From<Box<C>> for CursorHolder<'_, C> {
    fn from(c: Box<C>) -> Self {
        CursorHolder::Owned(c)
    }
}

impl<'a, C: ?Sized> From<&'a mut C> for CursorHolder<'a, C> {
    fn from(c: &'a mut C) -> Self {
        CursorHolder::Borrowed(c)
    }
}
