//! Data models exchanged with the ATSD API.

mod alert;
mod message;
mod meta;
mod property;
mod query;
mod series;
mod severity;

pub use alert::{Alert, AlertHistory};
pub use message::Message;
pub use meta::{BatchEntitiesCommand, Entity, EntityGroup, Metric};
pub use property::Property;
pub use query::{
    Aggregate, AlertDeleteFilter, AlertHistoryQuery, AlertUpdate, AlertsQuery, Interval,
    ListParams, MessageQuery, PropertiesQuery, PropertyDeleteFilter, SeriesDeleteQuery,
    SeriesQuery, TimeUnit,
};
pub use series::{Sample, SampleTime, Series};
pub use severity::Severity;
