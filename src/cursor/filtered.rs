use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{
    cursor::{AccessPolicy, Capabilities, Cursor, CursorHolder, Position, TraverseType},
    datatype::{CharEncoding, DataType, Envelope, Opaque, Value},
    util::{ByteArray, Result, Status, check_index},
};

/// Options for building a [`FilteredView`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOptions {
    /// Capabilities to plan movement with. `None` asks the backing cursor
    /// once, at construction.
    pub capabilities: Option<Capabilities>,
}

impl ViewOptions {
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        ViewOptions {
            capabilities: Some(capabilities),
        }
    }
}

/// A restricted, reordered subset of a backing cursor's rows, exposed as an
/// independent zero-based cursor.
///
/// The view stores only source positions (the "selection", sorted
/// ascending, duplicates kept) and translates its own logical position into
/// a source position on every move. Row data is never copied: getters read
/// the backing cursor wherever it currently is.
///
/// # Movement
///
/// `move_first`, `move_last`, `move_previous` and `move_to` always issue a
/// single `move_to` on the backing cursor. `move_next` does the same unless
/// the capabilities deny efficient moves and the view is already on a row;
/// then it replays `selection[i + 1] - selection[i]` calls to the backing
/// `move_next` instead, and never seeks or steps backwards.
///
/// A failed backing move leaves the view on `AfterLast`. The view does not
/// try to catch up later, so logical and source positions cannot drift
/// apart: callers see it as the end of the rows.
///
/// Through a forward-only backing cursor `move_previous` is not usable;
/// it seeks like everything else.
///
/// # Ownership
///
/// An owned backing cursor is dropped with the view. A borrowed one is
/// returned untouched to its owner once the view is dropped.
pub struct FilteredView<'a, C: Cursor + ?Sized> {
    cursor: CursorHolder<'a, C>,
    capabilities: Capabilities,
    selection: Vec<usize>,
    position: Position,
}

impl<'a, C: Cursor + ?Sized> FilteredView<'a, C> {
    /// Build a view over `cursor` made of the rows at `positions`.
    ///
    /// `positions` may be unsorted and may repeat; the view keeps a sorted
    /// copy. Fails with `InvalidArgument` if the backing cursor knows its
    /// size and a position lies outside it.
    pub fn new(
        cursor: CursorHolder<'a, C>,
        positions: &[usize],
        options: ViewOptions,
    ) -> Result<Self> {
        if let Some(size) = cursor.size() {
            if let Some(bad) = positions.iter().find(|&&p| p >= size) {
                return Err(Status::invalid_argument(format!(
                    "position {bad} is outside the backing cursor (size: {size})"
                )));
            }
        }

        let capabilities = options
            .capabilities
            .unwrap_or_else(|| cursor.capabilities());

        let mut selection = positions.to_vec();
        selection.sort_unstable();

        debug!(
            size = selection.len(),
            efficient_move = capabilities.efficient_move,
            owned = cursor.is_owned(),
            "created filtered view"
        );

        Ok(FilteredView {
            cursor,
            capabilities,
            selection,
            position: Position::BeforeFirst,
        })
    }

    /// View that owns and eventually drops `cursor`
    pub fn owned(cursor: Box<C>, positions: &[usize]) -> Result<Self> {
        Self::new(CursorHolder::Owned(cursor), positions, ViewOptions::default())
    }

    /// View over a cursor that stays owned by the caller
    pub fn borrowed(cursor: &'a mut C, positions: &[usize]) -> Result<Self> {
        Self::new(CursorHolder::Borrowed(cursor), positions, ViewOptions::default())
    }

    /// Logical position of the view
    pub fn position(&self) -> Position {
        self.position
    }

    /// Backing cursor row the view currently maps to
    pub fn source_position(&self) -> Option<usize> {
        self.position.row().map(|i| self.selection[i])
    }

    /// Sorted source positions making up the view
    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn len(&self) -> usize {
        self.selection.len()
    }

    pub fn is_owned(&self) -> bool {
        self.cursor.is_owned()
    }

    /// Read-only access to the backing cursor
    pub fn inner(&self) -> &C {
        &self.cursor
    }

    /// Give back the backing cursor if the view owns it.
    pub fn into_inner(self) -> Option<Box<C>> {
        self.cursor.into_owned()
    }

    /// Single direct positioning of the backing cursor on `selection[i]`.
    fn seek(&mut self, i: usize) -> bool {
        let source = self.selection[i];
        if self.cursor.move_to(source) {
            trace!(logical = i, source, "filtered view seek");
            self.position = Position::At(i);
            true
        } else {
            warn!(
                logical = i,
                source, "backing cursor failed to seek, view truncated"
            );
            self.position = Position::AfterLast;
            false
        }
    }

    /// Step the backing cursor forward from `selection[from]` to
    /// `selection[from + 1]`. Stops at the first failed step.
    fn replay_forward(&mut self, from: usize) -> bool {
        let to = from + 1;
        let steps = self.selection[to] - self.selection[from];
        for done in 0..steps {
            if !self.cursor.move_next() {
                warn!(
                    logical = to,
                    source = self.selection[to],
                    steps,
                    done,
                    "forward replay ended early, view truncated"
                );
                self.position = Position::AfterLast;
                return false;
            }
        }
        trace!(
            logical = to,
            source = self.selection[to],
            steps,
            "filtered view replay"
        );
        self.position = Position::At(to);
        true
    }

    /// Fails unless the view is on a row and `i` names a property.
    fn check_row(&self, i: usize) -> Result<()> {
        if !self.position.is_row() {
            return Err(Status::invalid_position(format!(
                "filtered view is positioned {}, not on a row",
                self.position
            )));
        }
        check_index(i, self.cursor.num_properties())
    }
}

impl<C: Cursor + ?Sized> Cursor for FilteredView<'_, C> {
    fn traverse_type(&self) -> TraverseType {
        self.cursor.traverse_type()
    }

    fn access_policy(&self) -> AccessPolicy {
        self.cursor.access_policy()
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn num_properties(&self) -> usize {
        self.cursor.num_properties()
    }

    fn property_data_type(&self, i: usize) -> Result<DataType> {
        check_index(i, self.cursor.num_properties())?;
        self.cursor.property_data_type(i)
    }

    fn property_name(&self, i: usize) -> Result<String> {
        check_index(i, self.cursor.num_properties())?;
        self.cursor.property_name(i)
    }

    fn dataset_name_of_property(&self, i: usize) -> Result<String> {
        check_index(i, self.cursor.num_properties())?;
        self.cursor.dataset_name_of_property(i)
    }

    fn property_char_encoding(&self, i: usize) -> Result<CharEncoding> {
        check_index(i, self.cursor.num_properties())?;
        self.cursor.property_char_encoding(i)
    }

    fn extent(&self, i: usize) -> Result<Envelope> {
        check_index(i, self.cursor.num_properties())?;
        self.cursor.extent(i)
    }

    fn property_position(&self, name: &str) -> Result<usize> {
        self.cursor.property_position(name)
    }

    fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    fn is_connected(&self) -> bool {
        self.cursor.is_connected()
    }

    fn size(&self) -> Option<usize> {
        Some(self.selection.len())
    }

    fn move_next(&mut self) -> bool {
        let next = match self.position {
            Position::BeforeFirst => 0,
            Position::At(i) => i + 1,
            Position::AfterLast => return false,
        };

        if next >= self.selection.len() {
            self.position = Position::AfterLast;
            return false;
        }

        match self.position {
            Position::At(i) if !self.capabilities.supports_efficient_move() => {
                self.replay_forward(i)
            }
            _ => self.seek(next),
        }
    }

    fn move_previous(&mut self) -> bool {
        match self.position {
            Position::BeforeFirst => false,
            Position::At(0) => {
                self.position = Position::BeforeFirst;
                false
            }
            Position::At(i) => self.seek(i - 1),
            Position::AfterLast => {
                if self.selection.is_empty() {
                    self.position = Position::BeforeFirst;
                    false
                } else {
                    self.seek(self.selection.len() - 1)
                }
            }
        }
    }

    fn move_before_first(&mut self) -> bool {
        self.position = Position::BeforeFirst;
        true
    }

    fn move_first(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.seek(0)
    }

    fn move_last(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.seek(self.selection.len() - 1)
    }

    fn move_to(&mut self, i: usize) -> bool {
        if i >= self.selection.len() {
            self.position = Position::AfterLast;
            return false;
        }
        self.seek(i)
    }

    fn is_at_begin(&self) -> bool {
        self.position == Position::At(0)
    }

    fn is_before_begin(&self) -> bool {
        self.position == Position::BeforeFirst
    }

    fn is_at_end(&self) -> bool {
        !self.selection.is_empty() && self.position == Position::At(self.selection.len() - 1)
    }

    fn is_after_end(&self) -> bool {
        self.position == Position::AfterLast
    }

    fn get_i8(&self, i: usize) -> Result<i8> {
        self.check_row(i)?;
        self.cursor.get_i8(i)
    }

    fn get_u8(&self, i: usize) -> Result<u8> {
        self.check_row(i)?;
        self.cursor.get_u8(i)
    }

    fn get_i16(&self, i: usize) -> Result<i16> {
        self.check_row(i)?;
        self.cursor.get_i16(i)
    }

    fn get_i32(&self, i: usize) -> Result<i32> {
        self.check_row(i)?;
        self.cursor.get_i32(i)
    }

    fn get_i64(&self, i: usize) -> Result<i64> {
        self.check_row(i)?;
        self.cursor.get_i64(i)
    }

    fn get_bool(&self, i: usize) -> Result<bool> {
        self.check_row(i)?;
        self.cursor.get_bool(i)
    }

    fn get_f32(&self, i: usize) -> Result<f32> {
        self.check_row(i)?;
        self.cursor.get_f32(i)
    }

    fn get_f64(&self, i: usize) -> Result<f64> {
        self.check_row(i)?;
        self.cursor.get_f64(i)
    }

    fn get_numeric(&self, i: usize) -> Result<String> {
        self.check_row(i)?;
        self.cursor.get_numeric(i)
    }

    fn get_string(&self, i: usize) -> Result<String> {
        self.check_row(i)?;
        self.cursor.get_string(i)
    }

    fn get_byte_array(&self, i: usize) -> Result<ByteArray> {
        self.check_row(i)?;
        self.cursor.get_byte_array(i)
    }

    fn get_geometry(&self, i: usize) -> Result<Opaque> {
        self.check_row(i)?;
        self.cursor.get_geometry(i)
    }

    fn get_raster(&self, i: usize) -> Result<Opaque> {
        self.check_row(i)?;
        self.cursor.get_raster(i)
    }

    fn get_date_time(&self, i: usize) -> Result<Opaque> {
        self.check_row(i)?;
        self.cursor.get_date_time(i)
    }

    fn get_array(&self, i: usize) -> Result<Opaque> {
        self.check_row(i)?;
        self.cursor.get_array(i)
    }

    fn is_null(&self, i: usize) -> Result<bool> {
        self.check_row(i)?;
        self.cursor.is_null(i)
    }

    fn get_value(&self, i: usize) -> Result<Option<Value>> {
        self.check_row(i)?;
        self.cursor.get_value(i)
    }

    fn get_as_string(&self, i: usize, precision: usize) -> Result<String> {
        self.check_row(i)?;
        self.cursor.get_as_string(i, precision)
    }
}
