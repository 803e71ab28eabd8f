use std::sync::Arc;

use tracing::debug;

use crate::{
    cursor::{AccessPolicy, Capabilities, Cursor, TraverseType},
    datatype::{CharEncoding, DataType, Envelope, Opaque, Value},
    statistics::CursorStatistics,
    util::{ByteArray, Result},
};

/// Cursor wrapper that counts every traversal call in a shared
/// [`CursorStatistics`].
///
/// It can also advertise capabilities other than the inner cursor's, and
/// cut `move_next` or `move_to` off after a fixed number of successful calls
/// to stand in for a stream that ends early or a source that loses its
/// connection. Dropping the wrapper records a release.
pub struct InstrumentedCursor<C> {
    inner: C,
    stats: Arc<CursorStatistics>,
    capabilities: Option<Capabilities>,
    move_next_budget: Option<u64>,
    move_to_budget: Option<u64>,
}

/// Run `step` unless the budget is spent. Only successful steps use it up.
fn budgeted(budget: &mut Option<u64>, step: impl FnOnce() -> bool) -> bool {
    match budget {
        Some(0) => false,
        Some(n) => {
            let ok = step();
            if ok {
                *n -= 1;
            }
            ok
        }
        None => step(),
    }
}

impl<C: Cursor> InstrumentedCursor<C> {
    pub fn new(inner: C) -> Self {
        InstrumentedCursor {
            inner,
            stats: Arc::new(CursorStatistics::new()),
            capabilities: None,
            move_next_budget: None,
            move_to_budget: None,
        }
    }

    /// Advertise `capabilities` instead of the inner cursor's.
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Fail every `move_next` after `n` successful ones.
    pub fn fail_move_next_after(mut self, n: u64) -> Self {
        self.move_next_budget = Some(n);
        self
    }

    /// Fail every `move_to` after `n` successful ones.
    pub fn fail_move_to_after(mut self, n: u64) -> Self {
        self.move_to_budget = Some(n);
        self
    }

    /// Shared handle to the counters, valid after the cursor is gone.
    pub fn statistics(&self) -> Arc<CursorStatistics> {
        self.stats.clone()
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C> Drop for InstrumentedCursor<C> {
    fn drop(&mut self) {
        debug!("instrumented cursor released");
        self.stats.record_release();
    }
}

impl<C: Cursor> Cursor for InstrumentedCursor<C> {
    fn traverse_type(&self) -> TraverseType {
        self.inner.traverse_type()
    }

    fn access_policy(&self) -> AccessPolicy {
        self.inner.access_policy()
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
            .unwrap_or_else(|| self.inner.capabilities())
    }

    fn num_properties(&self) -> usize {
        self.inner.num_properties()
    }

    fn property_data_type(&self, i: usize) -> Result<DataType> {
        self.inner.property_data_type(i)
    }

    fn property_name(&self, i: usize) -> Result<String> {
        self.inner.property_name(i)
    }

    fn dataset_name_of_property(&self, i: usize) -> Result<String> {
        self.inner.dataset_name_of_property(i)
    }

    fn property_char_encoding(&self, i: usize) -> Result<CharEncoding> {
        self.inner.property_char_encoding(i)
    }

    fn extent(&self, i: usize) -> Result<Envelope> {
        self.inner.extent(i)
    }

    fn property_position(&self, name: &str) -> Result<usize> {
        self.inner.property_position(name)
    }

    fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    fn size(&self) -> Option<usize> {
        self.inner.size()
    }

    fn move_next(&mut self) -> bool {
        let ok = budgeted(&mut self.move_next_budget, || self.inner.move_next());
        self.stats.record_move_next(ok);
        ok
    }

    fn move_previous(&mut self) -> bool {
        let ok = self.inner.move_previous();
        self.stats.record_move_previous(ok);
        ok
    }

    fn move_before_first(&mut self) -> bool {
        let ok = self.inner.move_before_first();
        self.stats.record_move_before_first(ok);
        ok
    }

    fn move_first(&mut self) -> bool {
        let ok = self.inner.move_first();
        self.stats.record_move_first(ok);
        ok
    }

    fn move_last(&mut self) -> bool {
        let ok = self.inner.move_last();
        self.stats.record_move_last(ok);
        ok
    }

    fn move_to(&mut self, i: usize) -> bool {
        let ok = budgeted(&mut self.move_to_budget, || self.inner.move_to(i));
        self.stats.record_move_to(ok);
        ok
    }

    fn is_at_begin(&self) -> bool {
        self.inner.is_at_begin()
    }

    fn is_before_begin(&self) -> bool {
        self.inner.is_before_begin()
    }

    fn is_at_end(&self) -> bool {
        self.inner.is_at_end()
    }

    fn is_after_end(&self) -> bool {
        self.inner.is_after_end()
    }

    fn get_i8(&self, i: usize) -> Result<i8> {
        self.stats.record_value_read();
        self.inner.get_i8(i)
    }

    fn get_u8(&self, i: usize) -> Result<u8> {
        self.stats.record_value_read();
        self.inner.get_u8(i)
    }

    fn get_i16(&self, i: usize) -> Result<i16> {
        self.stats.record_value_read();
        self.inner.get_i16(i)
    }

    fn get_i32(&self, i: usize) -> Result<i32> {
        self.stats.record_value_read();
        self.inner.get_i32(i)
    }

    fn get_i64(&self, i: usize) -> Result<i64> {
        self.stats.record_value_read();
        self.inner.get_i64(i)
    }

    fn get_bool(&self, i: usize) -> Result<bool> {
        self.stats.record_value_read();
        self.inner.get_bool(i)
    }

    fn get_f32(&self, i: usize) -> Result<f32> {
        self.stats.record_value_read();
        self.inner.get_f32(i)
    }

    fn get_f64(&self, i: usize) -> Result<f64> {
        self.stats.record_value_read();
        self.inner.get_f64(i)
    }

    fn get_numeric(&self, i: usize) -> Result<String> {
        self.stats.record_value_read();
        self.inner.get_numeric(i)
    }

    fn get_string(&self, i: usize) -> Result<String> {
        self.stats.record_value_read();
        self.inner.get_string(i)
    }

    fn get_byte_array(&self, i: usize) -> Result<ByteArray> {
        self.stats.record_value_read();
        self.inner.get_byte_array(i)
    }

    fn get_geometry(&self, i: usize) -> Result<Opaque> {
        self.stats.record_value_read();
        self.inner.get_geometry(i)
    }

    fn get_raster(&self, i: usize) -> Result<Opaque> {
        self.stats.record_value_read();
        self.inner.get_raster(i)
    }

    fn get_date_time(&self, i: usize) -> Result<Opaque> {
        self.stats.record_value_read();
        self.inner.get_date_time(i)
    }

    fn get_array(&self, i: usize) -> Result<Opaque> {
        self.stats.record_value_read();
        self.inner.get_array(i)
    }

    fn is_null(&self, i: usize) -> Result<bool> {
        self.inner.is_null(i)
    }

    fn get_value(&self, i: usize) -> Result<Option<Value>> {
        self.stats.record_value_read();
        self.inner.get_value(i)
    }

    fn get_as_string(&self, i: usize, precision: usize) -> Result<String> {
        self.stats.record_value_read();
        self.inner.get_as_string(i, precision)
    }

    fn get_value_by_name(&self, name: &str) -> Result<Option<Value>> {
        self.stats.record_value_read();
        self.inner.get_value_by_name(name)
    }

    fn is_null_by_name(&self, name: &str) -> Result<bool> {
        self.inner.is_null_by_name(name)
    }

    fn get_as_string_by_name(&self, name: &str, precision: usize) -> Result<String> {
        self.stats.record_value_read();
        self.inner.get_as_string_by_name(name, precision)
    }

    fn get_i8_by_name(&self, name: &str) -> Result<i8> {
        self.stats.record_value_read();
        self.inner.get_i8_by_name(name)
    }

    fn get_u8_by_name(&self, name: &str) -> Result<u8> {
        self.stats.record_value_read();
        self.inner.get_u8_by_name(name)
    }

    fn get_i16_by_name(&self, name: &str) -> Result<i16> {
        self.stats.record_value_read();
        self.inner.get_i16_by_name(name)
    }

    fn get_i32_by_name(&self, name: &str) -> Result<i32> {
        self.stats.record_value_read();
        self.inner.get_i32_by_name(name)
    }

    fn get_i64_by_name(&self, name: &str) -> Result<i64> {
        self.stats.record_value_read();
        self.inner.get_i64_by_name(name)
    }

    fn get_bool_by_name(&self, name: &str) -> Result<bool> {
        self.stats.record_value_read();
        self.inner.get_bool_by_name(name)
    }

    fn get_f32_by_name(&self, name: &str) -> Result<f32> {
        self.stats.record_value_read();
        self.inner.get_f32_by_name(name)
    }

    fn get_f64_by_name(&self, name: &str) -> Result<f64> {
        self.stats.record_value_read();
        self.inner.get_f64_by_name(name)
    }

    fn get_numeric_by_name(&self, name: &str) -> Result<String> {
        self.stats.record_value_read();
        self.inner.get_numeric_by_name(name)
    }

    fn get_string_by_name(&self, name: &str) -> Result<String> {
        self.stats.record_value_read();
        self.inner.get_string_by_name(name)
    }

    fn get_byte_array_by_name(&self, name: &str) -> Result<ByteArray> {
        self.stats.record_value_read();
        self.inner.get_byte_array_by_name(name)
    }

    fn get_geometry_by_name(&self, name: &str) -> Result<Opaque> {
        self.stats.record_value_read();
        self.inner.get_geometry_by_name(name)
    }

    fn get_raster_by_name(&self, name: &str) -> Result<Opaque> {
        self.stats.record_value_read();
        self.inner.get_raster_by_name(name)
    }

    fn get_date_time_by_name(&self, name: &str) -> Result<Opaque> {
        self.stats.record_value_read();
        self.inner.get_date_time_by_name(name)
    }

    fn get_array_by_name(&self, name: &str) -> Result<Opaque> {
        self.stats.record_value_read();
        self.inner.get_array_by_name(name)
    }
}
