use tracing::debug;

use crate::codec::{deserialize, serialize_all};
use crate::error::Result;
use crate::model::{Message, MessageQuery, Series};
use crate::services::or_empty_list;
use crate::transport::Transport;

pub struct MessageService<'a> {
    transport: &'a dyn Transport,
}

impl<'a> MessageService<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    pub fn insert(&self, messages: &[Message]) -> Result<()> {
        let body = serialize_all(messages)?;
        debug!(count = messages.len(), "inserting messages");
        self.transport.post(&["messages", "insert"], body)?;
        Ok(())
    }

    pub fn query(&self, queries: &[MessageQuery]) -> Result<Vec<Message>> {
        let reply = self
            .transport
            .post(&["messages", "query"], serialize_all(queries)?)?;
        Ok(deserialize(or_empty_list(reply))?.into_vec())
    }

    /// Message counts over time, one series per query.
    pub fn statistics(&self, queries: &[MessageQuery]) -> Result<Vec<Series>> {
        let reply = self
            .transport
            .post(&["messages", "statistics"], serialize_all(queries)?)?;
        Ok(deserialize(or_empty_list(reply))?.into_vec())
    }
}
