use tracing::debug;

use crate::codec::{Model, deserialize, deserialize_one};
use crate::error::Result;
use crate::model::{ListParams, Metric, Series};
use crate::services::{check_name, model_name, not_found_as_none, or_empty_list};
use crate::transport::Transport;

pub struct MetricsService<'a> {
    transport: &'a dyn Transport,
}

impl<'a> MetricsService<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    pub fn list(&self, params: &ListParams) -> Result<Vec<Metric>> {
        let reply = self.transport.get(&["metrics"], params.to_params())?;
        let metrics: Vec<Metric> = deserialize(or_empty_list(reply))?.into_vec();
        debug!(count = metrics.len(), "listed metrics");
        Ok(metrics)
    }

    /// Looks a metric up by name, `None` if the server does not know it.
    pub fn get(&self, name: &str) -> Result<Option<Metric>> {
        let reply = not_found_as_none(self.transport.get(&["metrics", check_name(name)?], Vec::new()))?;
        reply.map(deserialize_one).transpose()
    }

    pub fn create_or_replace(&self, metric: &Metric) -> Result<()> {
        let body = metric.to_json()?;
        self.transport.put(&["metrics", model_name(&metric.name)?], body)?;
        Ok(())
    }

    /// Changes only the fields set on `metric`.
    pub fn update(&self, metric: &Metric) -> Result<()> {
        let body = metric.to_json()?;
        self.transport.patch(&["metrics", model_name(&metric.name)?], body)?;
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        self.transport.delete(&["metrics", check_name(name)?])?;
        Ok(())
    }

    /// Series of a metric without samples, optionally limited to one entity.
    pub fn series(&self, name: &str, entity: Option<&str>) -> Result<Vec<Series>> {
        let params = entity
            .map(|e| vec![("entity".to_string(), e.to_string())])
            .unwrap_or_default();
        let reply = self
            .transport
            .get(&["metrics", check_name(name)?, "series"], params)?;
        Ok(deserialize(or_empty_list(reply))?.into_vec())
    }
}
