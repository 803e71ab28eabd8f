use crate::{
    datatype::Value,
    util::{Result, check_index},
};

/// One row of an in-memory dataset; `None` marks a null value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSetItem {
    values: Vec<Option<Value>>,
}

impl DataSetItem {
    /// Row of `n` null values
    pub fn new(n: usize) -> Self {
        DataSetItem {
            values: vec![None; n],
        }
    }

    pub fn from_values(values: Vec<Option<Value>>) -> Self {
        DataSetItem { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, i: usize) -> Result<Option<&Value>> {
        check_index(i, self.values.len())?;
        Ok(self.values[i].as_ref())
    }

    pub fn set_value(&mut self, i: usize, value: Option<Value>) -> Result<()> {
        check_index(i, self.values.len())?;
        self.values[i] = value;
        Ok(())
    }

    pub fn is_null(&self, i: usize) -> Result<bool> {
        Ok(self.value(i)?.is_none())
    }

    pub(crate) fn push(&mut self, value: Option<Value>) {
        self.values.push(value);
    }

    pub(crate) fn remove(&mut self, i: usize) {
        if i < self.values.len() {
            self.values.remove(i);
        }
    }
}
