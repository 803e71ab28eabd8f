//! In-memory dataset
//!
//! A random-access, read-write [`Cursor`] over rows held in memory. Used as
//! a disconnected copy of another cursor's rows and as the simplest backing
//! provider for views.
//!
//! Rows live behind `Arc<RwLock<..>>`: a `shallow_clone` shares them, so
//! edits made through one handle are visible through the other, while each
//! handle keeps its own position.
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::{
    cursor::{AccessPolicy, Capabilities, Cursor, Position, TraverseType},
    datatype::{DataType, Envelope, Opaque, Value},
    util::{ByteArray, Result, Status, check_index},
};

mod item;
mod schema;

pub use item::DataSetItem;
pub use schema::{Property, Schema};

pub struct MemoryDataSet {
    schema: Schema,
    dataset_name: Option<String>,
    items: Arc<RwLock<Vec<DataSetItem>>>,
    position: Position,
}

macro_rules! typed_getter {
    ($name:ident, $ty:ty, $variant:ident) => {
        fn $name(&self, i: usize) -> Result<$ty> {
            match self.non_null(i)? {
                Value::$variant(v) => Ok(v),
                other => Err(mismatch(i, DataType::$variant, &other)),
            }
        }
    };
}

fn mismatch(i: usize, expected: DataType, found: &Value) -> Status {
    Status::type_mismatch(format!(
        "property {i} holds {:?}, not {expected:?}",
        found.data_type()
    ))
}

impl MemoryDataSet {
    pub fn new(schema: Schema) -> Self {
        MemoryDataSet {
            schema,
            dataset_name: None,
            items: Arc::new(RwLock::new(Vec::new())),
            position: Position::BeforeFirst,
        }
    }

    /// Name reported by `dataset_name_of_property` for every property
    pub fn with_dataset_name(mut self, name: impl Into<String>) -> Self {
        self.dataset_name = Some(name.into());
        self
    }

    /// Materialize the rows that follow `src`'s current position.
    ///
    /// Call `move_before_first` on `src` first to copy it all. With a
    /// `limit`, stops after that many rows and fails with `Incomplete` if
    /// `src` runs out before.
    pub fn from_cursor<C: Cursor + ?Sized>(src: &mut C, limit: Option<usize>) -> Result<Self> {
        let properties: Vec<usize> = (0..src.num_properties()).collect();
        Self::from_cursor_properties(src, &properties, limit)
    }

    /// Like [`from_cursor`](Self::from_cursor), keeping only `properties`,
    /// in that order.
    pub fn from_cursor_properties<C: Cursor + ?Sized>(
        src: &mut C,
        properties: &[usize],
        limit: Option<usize>,
    ) -> Result<Self> {
        let mut columns = Vec::with_capacity(properties.len());
        for &p in properties {
            columns.push((src.property_name(p)?, src.property_data_type(p)?));
        }
        let mut ds = MemoryDataSet::new(Schema::new(columns));
        let copied = ds.copy_from(src, properties, limit)?;
        debug!(rows = copied, "materialized cursor into memory");
        Ok(ds)
    }

    fn copy_from<C: Cursor + ?Sized>(
        &mut self,
        src: &mut C,
        properties: &[usize],
        limit: Option<usize>,
    ) -> Result<usize> {
        let max = limit.unwrap_or(usize::MAX);
        let mut rows = Vec::new();
        while rows.len() < max && src.move_next() {
            let mut item = DataSetItem::new(0);
            for &p in properties {
                item.push(src.get_value(p)?);
            }
            rows.push(item);
        }

        let copied = rows.len();
        if let Some(limit) = limit {
            if copied < limit {
                return Err(Status::incomplete(format!(
                    "source cursor has {copied} rows, {limit} requested"
                )));
            }
        }
        self.items.write().extend(rows);
        Ok(copied)
    }

    /// Another handle on the same rows, positioned before the first row
    pub fn shallow_clone(&self) -> Self {
        MemoryDataSet {
            schema: self.schema.clone(),
            dataset_name: self.dataset_name.clone(),
            items: self.items.clone(),
            position: Position::BeforeFirst,
        }
    }

    /// Independent copy of the rows. Opaque payloads stay shared.
    pub fn deep_clone(&self) -> Self {
        MemoryDataSet {
            schema: self.schema.clone(),
            dataset_name: self.dataset_name.clone(),
            items: Arc::new(RwLock::new(self.items.read().clone())),
            position: Position::BeforeFirst,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn position(&self) -> Position {
        self.position
    }

    fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Append a row. Its width must match the schema.
    pub fn add(&mut self, item: DataSetItem) -> Result<()> {
        if item.len() != self.schema.len() {
            return Err(Status::invalid_argument(format!(
                "row has {} values, schema has {} properties",
                item.len(),
                self.schema.len()
            )));
        }
        self.items.write().push(item);
        Ok(())
    }

    /// Remove the current row. The cursor ends up on the row that followed
    /// it, or after the last row.
    pub fn remove_current(&mut self) -> Result<DataSetItem> {
        let row = self.row()?;
        let mut items = self.items.write();
        if row >= items.len() {
            return Err(Status::invalid_position(format!("row {row} no longer exists")));
        }
        let removed = items.remove(row);
        if row >= items.len() {
            self.position = Position::AfterLast;
        }
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.items.write().clear();
        self.position = Position::BeforeFirst;
    }

    /// Add a property to the schema and to every row, filled with `default`
    pub fn add_property(
        &mut self,
        name: impl Into<String>,
        data_type: DataType,
        default: Option<Value>,
    ) -> Result<()> {
        if let Some(v) = &default {
            check_type(data_type, v)?;
        }
        self.schema.push(name.into(), data_type)?;
        for item in self.items.write().iter_mut() {
            item.push(default.clone());
        }
        Ok(())
    }

    /// Remove property `pos` from the schema and from every row
    pub fn drop_property(&mut self, pos: usize) -> Result<Property> {
        let property = self.schema.remove(pos)?;
        for item in self.items.write().iter_mut() {
            item.remove(pos);
        }
        Ok(property)
    }

    /// Copy of the current row
    pub fn item(&self) -> Result<DataSetItem> {
        let row = self.row()?;
        self.items
            .read()
            .get(row)
            .cloned()
            .ok_or_else(|| Status::invalid_position(format!("row {row} no longer exists")))
    }

    /// Overwrite property `i` of the current row; `None` stores a null.
    pub fn set_value(&mut self, i: usize, value: Option<Value>) -> Result<()> {
        let data_type = self.schema.property(i)?.data_type;
        if let Some(v) = &value {
            check_type(data_type, v)?;
        }
        let row = self.row()?;
        let mut items = self.items.write();
        let item = items
            .get_mut(row)
            .ok_or_else(|| Status::invalid_position(format!("row {row} no longer exists")))?;
        item.set_value(i, value)
    }

    pub fn set_value_by_name(&mut self, name: &str, value: Option<Value>) -> Result<()> {
        let i = self.property_position(name)?;
        self.set_value(i, value)
    }

    pub fn set_null(&mut self, i: usize) -> Result<()> {
        self.set_value(i, None)
    }

    pub fn set_i32(&mut self, i: usize, v: i32) -> Result<()> {
        self.set_value(i, Some(Value::Int32(v)))
    }

    pub fn set_i64(&mut self, i: usize, v: i64) -> Result<()> {
        self.set_value(i, Some(Value::Int64(v)))
    }

    pub fn set_f64(&mut self, i: usize, v: f64) -> Result<()> {
        self.set_value(i, Some(Value::Double(v)))
    }

    pub fn set_bool(&mut self, i: usize, v: bool) -> Result<()> {
        self.set_value(i, Some(Value::Boolean(v)))
    }

    pub fn set_string(&mut self, i: usize, v: impl Into<String>) -> Result<()> {
        self.set_value(i, Some(Value::String(v.into())))
    }

    fn row(&self) -> Result<usize> {
        self.position.row().ok_or_else(|| {
            Status::invalid_position(format!(
                "dataset is positioned {}, not on a row",
                self.position
            ))
        })
    }

    fn current_value(&self, i: usize) -> Result<Option<Value>> {
        check_index(i, self.schema.len())?;
        let row = self.row()?;
        let items = self.items.read();
        let item = items
            .get(row)
            .ok_or_else(|| Status::invalid_position(format!("row {row} no longer exists")))?;
        Ok(item.value(i)?.cloned())
    }

    fn non_null(&self, i: usize) -> Result<Value> {
        self.current_value(i)?
            .ok_or_else(|| Status::invalid_argument(format!("property {i} is null")))
    }
}

fn check_type(expected: DataType, value: &Value) -> Result<()> {
    if expected == DataType::Unknown || value.data_type() == expected {
        Ok(())
    } else {
        Err(Status::type_mismatch(format!(
            "cannot store {:?} in a {expected:?} property",
            value.data_type()
        )))
    }
}

impl Cursor for MemoryDataSet {
    fn traverse_type(&self) -> TraverseType {
        TraverseType::Random
    }

    fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::RWAccess
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            bidirectional: true,
            random: true,
            indexed: false,
            efficient_move_previous: true,
            efficient_move_before_first: true,
            efficient_move_last: true,
            efficient_move_after_last: true,
            efficient_move: true,
            efficient_size: true,
        }
    }

    fn num_properties(&self) -> usize {
        self.schema.len()
    }

    fn property_data_type(&self, i: usize) -> Result<DataType> {
        Ok(self.schema.property(i)?.data_type)
    }

    fn property_name(&self, i: usize) -> Result<String> {
        Ok(self.schema.property(i)?.name.clone())
    }

    fn dataset_name_of_property(&self, i: usize) -> Result<String> {
        check_index(i, self.schema.len())?;
        self.dataset_name
            .clone()
            .ok_or_else(|| Status::not_found("in-memory dataset has no name"))
    }

    fn extent(&self, i: usize) -> Result<Envelope> {
        let property = self.schema.property(i)?;
        if property.data_type != DataType::Geometry {
            return Err(Status::type_mismatch(format!(
                "property '{}' is not a geometry",
                property.name
            )));
        }
        let mut mbr = Envelope::invalid();
        for item in self.items.read().iter() {
            if let Some(env) = item
                .value(i)?
                .and_then(Value::as_opaque)
                .and_then(Opaque::envelope)
            {
                mbr.union(&env);
            }
        }
        Ok(mbr)
    }

    fn property_position(&self, name: &str) -> Result<usize> {
        self.schema
            .position(name)
            .ok_or_else(|| Status::not_found(format!("no property named '{name}'")))
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_connected(&self) -> bool {
        false
    }

    fn size(&self) -> Option<usize> {
        Some(self.len())
    }

    fn move_next(&mut self) -> bool {
        let n = self.len();
        self.position = match self.position {
            Position::BeforeFirst if n > 0 => Position::At(0),
            Position::At(i) if i + 1 < n => Position::At(i + 1),
            _ => Position::AfterLast,
        };
        self.position.is_row()
    }

    fn move_previous(&mut self) -> bool {
        let n = self.len();
        self.position = match self.position {
            Position::At(i) if i > 0 && i <= n => Position::At(i - 1),
            Position::AfterLast if n > 0 => Position::At(n - 1),
            _ => Position::BeforeFirst,
        };
        self.position.is_row()
    }

    fn move_before_first(&mut self) -> bool {
        self.position = Position::BeforeFirst;
        true
    }

    fn move_first(&mut self) -> bool {
        if self.len() == 0 {
            return false;
        }
        self.position = Position::At(0);
        true
    }

    fn move_last(&mut self) -> bool {
        let n = self.len();
        if n == 0 {
            return false;
        }
        self.position = Position::At(n - 1);
        true
    }

    fn move_to(&mut self, i: usize) -> bool {
        if i < self.len() {
            self.position = Position::At(i);
            true
        } else {
            self.position = Position::AfterLast;
            false
        }
    }

    fn is_at_begin(&self) -> bool {
        self.position == Position::At(0)
    }

    fn is_before_begin(&self) -> bool {
        self.position == Position::BeforeFirst
    }

    fn is_at_end(&self) -> bool {
        let n = self.len();
        n > 0 && self.position == Position::At(n - 1)
    }

    fn is_after_end(&self) -> bool {
        self.position == Position::AfterLast
    }

    typed_getter!(get_i8, i8, Char);
    typed_getter!(get_u8, u8, UChar);
    typed_getter!(get_i16, i16, Int16);
    typed_getter!(get_i32, i32, Int32);
    typed_getter!(get_i64, i64, Int64);
    typed_getter!(get_bool, bool, Boolean);
    typed_getter!(get_f32, f32, Float);
    typed_getter!(get_f64, f64, Double);
    typed_getter!(get_numeric, String, Numeric);
    typed_getter!(get_string, String, String);
    typed_getter!(get_byte_array, ByteArray, ByteArray);
    typed_getter!(get_geometry, Opaque, Geometry);
    typed_getter!(get_raster, Opaque, Raster);
    typed_getter!(get_date_time, Opaque, DateTime);
    typed_getter!(get_array, Opaque, Array);

    fn is_null(&self, i: usize) -> Result<bool> {
        Ok(self.current_value(i)?.is_none())
    }

    fn get_value(&self, i: usize) -> Result<Option<Value>> {
        self.current_value(i)
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;
    use crate::datatype::AbstractData;

    #[derive(Debug)]
    struct Point(f64, f64);

    impl AbstractData for Point {
        fn data_type(&self) -> DataType {
            DataType::Geometry
        }

        fn to_text(&self) -> String {
            format!("POINT({} {})", self.0, self.1)
        }

        fn envelope(&self) -> Option<Envelope> {
            Some(Envelope::new(self.0, self.1, self.0, self.1))
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn people() -> MemoryDataSet {
        let schema = Schema::new(vec![
            ("name", DataType::String),
            ("age", DataType::Int32),
            ("score", DataType::Double),
        ]);
        let mut ds = MemoryDataSet::new(schema).with_dataset_name("people");
        for (name, age, score) in [("ann", 31, Some(1.5)), ("bob", 42, None), ("cy", 7, Some(9.25))] {
            ds.add(DataSetItem::from_values(vec![
                Some(Value::from(name)),
                Some(Value::Int32(age)),
                score.map(Value::Double),
            ]))
            .unwrap();
        }
        ds
    }

    #[test]
    fn test_traversal() {
        let mut ds = people();
        assert!(ds.is_before_begin());
        assert!(ds.move_next());
        assert!(ds.is_at_begin());
        assert_eq!(ds.get_string(0).unwrap(), "ann");
        assert!(ds.move_next());
        assert!(ds.move_next());
        assert!(ds.is_at_end());
        assert!(!ds.move_next());
        assert!(ds.is_after_end());
        assert!(ds.move_previous());
        assert_eq!(ds.get_i32(1).unwrap(), 7);
        assert!(ds.move_to(1));
        assert_eq!(ds.get_string(0).unwrap(), "bob");
        assert!(!ds.move_to(3));
        assert!(ds.is_after_end());
        assert!(ds.move_first());
        assert!(!ds.move_previous());
        assert!(ds.is_before_begin());
    }

    #[test]
    fn test_getter_errors() {
        let mut ds = people();
        assert!(ds.get_string(0).unwrap_err().is_invalid_position());
        assert!(ds.move_to(1));
        assert!(ds.get_i32(5).unwrap_err().is_index_out_of_range());
        assert_eq!(
            ds.get_string(1).unwrap_err().code(),
            crate::util::Code::TypeMismatch
        );
        assert!(ds.is_null(2).unwrap());
        assert!(ds.get_f64(2).is_err());
        assert_eq!(ds.get_value(2).unwrap(), None);
    }

    #[test]
    fn test_by_name_and_as_string() {
        let mut ds = people();
        assert!(ds.move_last());
        assert_eq!(ds.property_position("score").unwrap(), 2);
        assert!(ds.property_position("nope").unwrap_err().is_not_found());
        assert_eq!(ds.get_value_by_name("age").unwrap(), Some(Value::Int32(7)));
        assert_eq!(ds.get_as_string(2, 3).unwrap(), "9.250");
        assert!(ds.move_to(1));
        assert_eq!(ds.get_as_string(2, 0).unwrap(), "");
        assert!(ds.is_null_by_name("score").unwrap());
    }

    #[test]
    fn test_metadata() {
        let ds = people();
        assert_eq!(ds.num_properties(), 3);
        assert_eq!(ds.property_name(1).unwrap(), "age");
        assert_eq!(ds.dataset_name_of_property(0).unwrap(), "people");
        assert_eq!(ds.traverse_type(), TraverseType::Random);
        assert_eq!(ds.access_policy(), AccessPolicy::RWAccess);
        assert!(ds.capabilities().efficient_move);
        assert!(!ds.is_connected());
        assert_eq!(ds.size(), Some(3));
    }

    #[test]
    fn test_setters_and_type_check() {
        let mut ds = people();
        assert!(ds.set_i32(1, 3).unwrap_err().is_invalid_position());
        assert!(ds.move_first());
        ds.set_i32(1, 32).unwrap();
        assert_eq!(ds.get_i32(1).unwrap(), 32);
        assert!(ds.set_string(1, "x").is_err());
        ds.set_null(0).unwrap();
        assert!(ds.is_null(0).unwrap());
        ds.set_value_by_name("score", Some(Value::Double(2.0))).unwrap();
        assert_eq!(ds.get_f64(2).unwrap(), 2.0);
    }

    #[test]
    fn test_add_rejects_wrong_width() {
        let mut ds = people();
        let err = ds.add(DataSetItem::new(1)).unwrap_err();
        assert_eq!(err.code(), crate::util::Code::InvalidArgument);
    }

    #[test]
    fn test_remove_current() {
        let mut ds = people();
        assert!(ds.move_to(1));
        ds.remove_current().unwrap();
        assert_eq!(ds.size(), Some(2));
        assert_eq!(ds.get_string(0).unwrap(), "cy");
        ds.remove_current().unwrap();
        assert!(ds.is_after_end());
        ds.clear();
        assert!(ds.is_empty());
        assert!(!ds.move_first());
    }

    #[test]
    fn test_add_and_drop_property() {
        let mut ds = people();
        ds.add_property("alive", DataType::Boolean, Some(Value::Boolean(true)))
            .unwrap();
        assert!(ds.add_property("age", DataType::Int32, None).is_err());
        assert!(ds.move_first());
        assert!(ds.get_bool(3).unwrap());

        let dropped = ds.drop_property(0).unwrap();
        assert_eq!(dropped.name, "name");
        assert_eq!(ds.get_i32(0).unwrap(), 31);
        assert_eq!(ds.property_position("alive").unwrap(), 2);
    }

    #[test]
    fn test_shallow_and_deep_clone() {
        let mut ds = people();
        let mut shallow = ds.shallow_clone();
        let mut deep = ds.deep_clone();

        assert!(ds.move_first());
        ds.set_i32(1, 99).unwrap();

        assert!(shallow.is_before_begin());
        assert!(shallow.move_first());
        assert_eq!(shallow.get_i32(1).unwrap(), 99);
        assert!(deep.move_first());
        assert_eq!(deep.get_i32(1).unwrap(), 31);
    }

    #[test]
    fn test_from_cursor_with_limit() {
        let mut src = people();
        let copy = MemoryDataSet::from_cursor(&mut src, Some(2)).unwrap();
        assert_eq!(copy.size(), Some(2));

        let mut src = people();
        let err = MemoryDataSet::from_cursor(&mut src, Some(5)).err().unwrap();
        assert_eq!(err.code(), crate::util::Code::Incomplete);

        let mut src = people();
        let mut copy = MemoryDataSet::from_cursor_properties(&mut src, &[2, 0], None).unwrap();
        assert_eq!(copy.property_name(0).unwrap(), "score");
        assert!(copy.move_last());
        assert_eq!(copy.get_string(1).unwrap(), "cy");
    }

    #[test]
    fn test_extent_of_geometry_column() {
        let mut ds = MemoryDataSet::new(Schema::new(vec![
            ("geom", DataType::Geometry),
            ("id", DataType::Int32),
        ]));
        for (x, y) in [(0.0, 1.0), (4.0, -2.0)] {
            ds.add(DataSetItem::from_values(vec![
                Some(Value::Geometry(Opaque::new(Point(x, y)))),
                Some(Value::Int32(1)),
            ]))
            .unwrap();
        }
        ds.add(DataSetItem::from_values(vec![None, Some(Value::Int32(2))]))
            .unwrap();

        assert_eq!(ds.extent(0).unwrap(), Envelope::new(0.0, -2.0, 4.0, 1.0));
        assert!(ds.extent(1).is_err());

        assert!(ds.move_first());
        let g = ds.get_geometry(0).unwrap();
        assert_eq!(g.to_text(), "POINT(0 1)");
    }
}
