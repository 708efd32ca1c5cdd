use tracing::debug;

use crate::codec::{deserialize_list, serialize_all};
use crate::error::{Error, Result};
use crate::model::{Series, SeriesDeleteQuery, SeriesQuery};
use crate::services::{queries_body, take_field};
use crate::transport::Transport;

pub struct SeriesService<'a> {
    transport: &'a dyn Transport,
}

impl<'a> SeriesService<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Inserts a batch of series.
    ///
    /// # Errors
    ///
    /// The whole batch is rejected with [`Error::InvalidInput`], and nothing is
    /// sent, if any series has no samples.
    pub fn insert(&self, series: &[Series]) -> Result<()> {
        if let Some(empty) = series.iter().find(|s| s.is_empty()) {
            return Err(Error::InvalidInput(format!(
                "series {}/{} has no data",
                empty.entity.as_deref().unwrap_or_default(),
                empty.metric.as_deref().unwrap_or_default()
            )));
        }

        let body = serialize_all(series)?;
        debug!(count = series.len(), "inserting series");
        self.transport.post(&["series", "insert"], body)?;
        Ok(())
    }

    pub fn query(&self, queries: &[SeriesQuery]) -> Result<Vec<Series>> {
        let reply = self.transport.post(&["series"], queries_body(queries)?)?;
        let series: Vec<Series> = deserialize_list(take_field(reply, "series")?)?;
        debug!(queries = queries.len(), series = series.len(), "queried series");
        Ok(series)
    }

    pub fn delete(&self, queries: &[SeriesDeleteQuery]) -> Result<()> {
        let body = serialize_all(queries)?;
        debug!(count = queries.len(), "deleting series");
        self.transport.post(&["series", "delete"], body)?;
        Ok(())
    }
}
