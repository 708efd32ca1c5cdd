use serde_json::Value;
use tracing::debug;

use crate::codec::{Model, deserialize, deserialize_one};
use crate::error::Result;
use crate::model::{BatchEntitiesCommand, Entity, EntityGroup, ListParams};
use crate::services::{check_name, model_name, not_found_as_none, or_empty_list};
use crate::transport::Transport;

pub struct EntityGroupsService<'a> {
    transport: &'a dyn Transport,
}

impl<'a> EntityGroupsService<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    pub fn list(&self, params: &ListParams) -> Result<Vec<EntityGroup>> {
        let reply = self.transport.get(&["entity-groups"], params.to_params())?;
        Ok(deserialize(or_empty_list(reply))?.into_vec())
    }

    /// Looks a group up by name, `None` if the server does not know it.
    pub fn get(&self, name: &str) -> Result<Option<EntityGroup>> {
        let reply = not_found_as_none(
            self.transport
                .get(&["entity-groups", check_name(name)?], Vec::new()),
        )?;
        reply.map(deserialize_one).transpose()
    }

    pub fn create_or_replace(&self, group: &EntityGroup) -> Result<()> {
        let body = group.to_json()?;
        self.transport
            .put(&["entity-groups", model_name(&group.name)?], body)?;
        Ok(())
    }

    pub fn update(&self, group: &EntityGroup) -> Result<()> {
        let body = group.to_json()?;
        self.transport
            .patch(&["entity-groups", model_name(&group.name)?], body)?;
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        self.transport.delete(&["entity-groups", check_name(name)?])?;
        Ok(())
    }

    /// Members of a group.
    pub fn get_entities(&self, group: &str, params: &ListParams) -> Result<Vec<Entity>> {
        let reply = self.transport.get(
            &["entity-groups", check_name(group)?, "entities"],
            params.to_params(),
        )?;
        Ok(deserialize(or_empty_list(reply))?.into_vec())
    }

    /// Adds members; returns `false` when `entities` is empty and nothing was
    /// sent.
    pub fn add_entities<I, S>(
        &self,
        group: &str,
        entities: I,
        create_entities: Option<bool>,
    ) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.batch_update(group, &[BatchEntitiesCommand::add(entities, create_entities)])
    }

    /// Removes members; returns `false` when `entities` is empty and nothing
    /// was sent.
    pub fn delete_entities<I, S>(&self, group: &str, entities: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.batch_update(group, &[BatchEntitiesCommand::delete(entities)])
    }

    /// Applies membership commands in order. Empty commands are dropped; when
    /// none remain no request is sent and `false` is returned.
    pub fn batch_update(&self, group: &str, commands: &[BatchEntitiesCommand]) -> Result<bool> {
        let group = check_name(group)?;
        let commands = commands
            .iter()
            .filter(|c| !c.is_empty())
            .map(Model::to_json)
            .collect::<Result<Vec<_>>>()?;
        if commands.is_empty() {
            debug!(group, "no membership changes to send");
            return Ok(false);
        }

        debug!(group, commands = commands.len(), "updating group members");
        self.transport.patch(
            &["entity-groups", group, "entities"],
            Value::Array(commands),
        )?;
        Ok(true)
    }
}
