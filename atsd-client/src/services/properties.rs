use tracing::debug;

use crate::codec::{deserialize, serialize_all};
use crate::error::Result;
use crate::model::{PropertiesQuery, Property, PropertyDeleteFilter};
use crate::services::{check_name, decode, or_empty_list, queries_body};
use crate::transport::Transport;

pub struct PropertiesService<'a> {
    transport: &'a dyn Transport,
}

impl<'a> PropertiesService<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    pub fn insert(&self, properties: &[Property]) -> Result<()> {
        let body = serialize_all(properties)?;
        debug!(count = properties.len(), "inserting properties");
        self.transport.post(&["properties", "insert"], body)?;
        Ok(())
    }

    pub fn query(&self, queries: &[PropertiesQuery]) -> Result<Vec<Property>> {
        let reply = self.transport.post(&["properties"], queries_body(queries)?)?;
        Ok(deserialize(or_empty_list(reply))?.into_vec())
    }

    /// Property types recorded for an entity.
    pub fn type_query(&self, entity: &str) -> Result<Vec<String>> {
        let reply = self
            .transport
            .get(&["properties", check_name(entity)?, "types"], Vec::new())?;
        decode(or_empty_list(reply), "property types")
    }

    pub fn delete(&self, filters: &[PropertyDeleteFilter]) -> Result<()> {
        let body = serialize_all(filters)?;
        debug!(count = filters.len(), "deleting properties");
        self.transport.post(&["properties", "delete"], body)?;
        Ok(())
    }
}
