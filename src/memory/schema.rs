use serde::{Deserialize, Serialize};

use crate::{
    datatype::DataType,
    util::{Result, Status, check_index},
};

/// Name and type of one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub data_type: DataType,
}

/// Ordered column list of an in-memory dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    properties: Vec<Property>,
}

impl Schema {
    pub fn new<S: Into<String>>(properties: Vec<(S, DataType)>) -> Self {
        Schema {
            properties: properties
                .into_iter()
                .map(|(name, data_type)| Property {
                    name: name.into(),
                    data_type,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn property(&self, i: usize) -> Result<&Property> {
        check_index(i, self.properties.len())?;
        Ok(&self.properties[i])
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }

    pub(crate) fn push(&mut self, name: String, data_type: DataType) -> Result<()> {
        if self.position(&name).is_some() {
            return Err(Status::invalid_argument(format!(
                "property '{name}' already exists"
            )));
        }
        self.properties.push(Property { name, data_type });
        Ok(())
    }

    pub(crate) fn remove(&mut self, i: usize) -> Result<Property> {
        check_index(i, self.properties.len())?;
        Ok(self.properties.remove(i))
    }
}
