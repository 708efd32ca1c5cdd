//! Client for the Axibase Time Series Database (ATSD) HTTP API.
//!
//! The crate maps ATSD's loosely-typed JSON payloads to typed models and
//! wraps the REST endpoints in blocking service calls.
//!
//! # Key Concepts
//!
//! - **Models** ([`Series`], [`Property`], [`Alert`], ...): open on the way in,
//!   keeping unknown keys in an `extra` map, and closed on the way out,
//!   emitting only the fields each type declares. A declared-required field
//!   that is unset fails serialization with [`Error::MissingRequiredField`].
//! - **Samples**: a [`Series`] keeps samples in insertion order. Adjacent
//!   samples with the same timestamp are collapsed when values are read, the
//!   later one winning.
//! - **Timestamps**: the [`time`] module converts ATSD's
//!   `YYYY-MM-DDTHH:MM:SSZ±HHMM` strings, where `Z` separates the wall clock
//!   from its numeric offset. Offsets are always explicit.
//! - **Services**: one per endpoint family, borrowed from an [`AtsdClient`].
//!   Lookups by name return `Ok(None)` on a 404.
//!
//! # Example
//!
//! ```ignore
//! use atsd_client::{AtsdClient, ClientConfig, Series, SeriesQuery, TimeUnit};
//!
//! let client = AtsdClient::connect(&ClientConfig::new("https://atsd:8443", "axibase", "secret"))?;
//!
//! let mut series = Series::new("nurswgvml007", "cpu_busy");
//! series.add_value(12.5, "2018-07-26T20:56:39Z+0300", None)?;
//! client.series().insert(&[series])?;
//!
//! let query = SeriesQuery::new("nurswgvml007", "cpu_busy").last(1, TimeUnit::Hour);
//! for series in client.series().query(&[query])? {
//!     println!("{}", series);
//! }
//!
//! if client.metrics().get("cpu_busy")?.is_none() {
//!     println!("metric not found");
//! }
//! ```

mod client;
pub mod clock;
pub mod codec;
mod config;
mod error;
pub mod model;
pub mod services;
pub mod time;
pub mod transport;

pub use client::AtsdClient;
pub use config::{ClientConfig, load_config};
pub use error::{Error, Result};
pub use model::{
    Aggregate, Alert, AlertDeleteFilter, AlertHistory, AlertHistoryQuery, AlertUpdate,
    AlertsQuery, BatchEntitiesCommand, Entity, EntityGroup, Interval, ListParams, Message,
    MessageQuery, Metric, PropertiesQuery, Property, PropertyDeleteFilter, Sample, SampleTime,
    Series, SeriesDeleteQuery, SeriesQuery, Severity, TimeUnit,
};
