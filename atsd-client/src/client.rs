//! Entry point tying a transport to the service wrappers.

use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::config::{ClientConfig, load_config};
use crate::error::Result;
use crate::services::{
    AlertsService, EntitiesService, EntityGroupsService, MessageService, MetricsService,
    PropertiesService, SeriesService,
};
use crate::transport::{HttpTransport, Transport};

/// Connection to one ATSD server.
pub struct AtsdClient {
    transport: Box<dyn Transport>,
}

impl AtsdClient {
    /// Connects over HTTP. No request is sent until a service is used.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        info!(base_url = %config.base_url, verify_tls = config.verify_tls, "connecting to ATSD");
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }

    /// Connects with settings read by [`load_config`].
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::connect(&load_config(path)?)
    }

    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Server build and time zone information; a cheap connectivity check.
    pub fn version(&self) -> Result<Value> {
        self.transport.get(&["version"], Vec::new())
    }

    pub fn series(&self) -> SeriesService<'_> {
        SeriesService::new(self.transport())
    }

    pub fn properties(&self) -> PropertiesService<'_> {
        PropertiesService::new(self.transport())
    }

    pub fn alerts(&self) -> AlertsService<'_> {
        AlertsService::new(self.transport())
    }

    pub fn messages(&self) -> MessageService<'_> {
        MessageService::new(self.transport())
    }

    pub fn metrics(&self) -> MetricsService<'_> {
        MetricsService::new(self.transport())
    }

    pub fn entities(&self) -> EntitiesService<'_> {
        EntitiesService::new(self.transport())
    }

    pub fn entity_groups(&self) -> EntityGroupsService<'_> {
        EntityGroupsService::new(self.transport())
    }
}
