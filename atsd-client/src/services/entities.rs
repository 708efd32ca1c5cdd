use tracing::debug;

use crate::codec::{Model, deserialize, deserialize_one};
use crate::error::Result;
use crate::model::{Entity, ListParams, Metric};
use crate::services::{check_name, model_name, not_found_as_none, or_empty_list};
use crate::transport::Transport;

pub struct EntitiesService<'a> {
    transport: &'a dyn Transport,
}

impl<'a> EntitiesService<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    pub fn list(&self, params: &ListParams) -> Result<Vec<Entity>> {
        let reply = self.transport.get(&["entities"], params.to_params())?;
        let entities: Vec<Entity> = deserialize(or_empty_list(reply))?.into_vec();
        debug!(count = entities.len(), "listed entities");
        Ok(entities)
    }

    /// Looks an entity up by name, `None` if the server does not know it.
    pub fn get(&self, name: &str) -> Result<Option<Entity>> {
        let reply =
            not_found_as_none(self.transport.get(&["entities", check_name(name)?], Vec::new()))?;
        reply.map(deserialize_one).transpose()
    }

    pub fn create_or_replace(&self, entity: &Entity) -> Result<()> {
        let body = entity.to_json()?;
        self.transport.put(&["entities", model_name(&entity.name)?], body)?;
        Ok(())
    }

    pub fn update(&self, entity: &Entity) -> Result<()> {
        let body = entity.to_json()?;
        self.transport.patch(&["entities", model_name(&entity.name)?], body)?;
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        self.transport.delete(&["entities", check_name(name)?])?;
        Ok(())
    }

    /// Metrics collected for an entity.
    pub fn metrics(&self, name: &str) -> Result<Vec<Metric>> {
        let reply = self
            .transport
            .get(&["entities", check_name(name)?, "metrics"], Vec::new())?;
        Ok(deserialize(or_empty_list(reply))?.into_vec())
    }
}
