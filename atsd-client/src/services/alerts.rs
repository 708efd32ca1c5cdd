use tracing::debug;

use crate::codec::{deserialize, serialize_all};
use crate::error::Result;
use crate::model::{Alert, AlertDeleteFilter, AlertHistory, AlertHistoryQuery, AlertUpdate, AlertsQuery};
use crate::services::{or_empty_list, queries_body};
use crate::transport::Transport;

pub struct AlertsService<'a> {
    transport: &'a dyn Transport,
}

impl<'a> AlertsService<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    pub fn query(&self, queries: &[AlertsQuery]) -> Result<Vec<Alert>> {
        let reply = self
            .transport
            .post(&["alerts", "query"], serialize_all(queries)?)?;
        Ok(deserialize(or_empty_list(reply))?.into_vec())
    }

    /// Sets the acknowledged flag of alerts.
    pub fn update(&self, updates: &[AlertUpdate]) -> Result<()> {
        let body = serialize_all(updates)?;
        debug!(count = updates.len(), "updating alerts");
        self.transport.post(&["alerts", "update"], body)?;
        Ok(())
    }

    pub fn history_query(&self, queries: &[AlertHistoryQuery]) -> Result<Vec<AlertHistory>> {
        let reply = self
            .transport
            .post(&["alerts", "history"], queries_body(queries)?)?;
        Ok(deserialize(or_empty_list(reply))?.into_vec())
    }

    pub fn delete(&self, filters: &[AlertDeleteFilter]) -> Result<()> {
        let body = serialize_all(filters)?;
        debug!(count = filters.len(), "deleting alerts");
        self.transport.post(&["alerts", "delete"], body)?;
        Ok(())
    }
}
