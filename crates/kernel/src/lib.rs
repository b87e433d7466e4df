//! Host-side contract for collector components: ids, configs, consumers,
//! receiver factories, and the service that wires them into pipelines.

pub mod component;
pub mod consumer;
pub mod error;
pub mod pdata;
pub mod receiver;
pub mod registry;
pub mod service;
pub mod settings;

pub use component::{
    Component, ComponentConfig, ComponentId, ComponentType, CreateSettings, HostCtx, Signal,
    StabilityLevel,
};
pub use consumer::{LoggingConsumer, LogsConsumer, TracesConsumer};
pub use error::ComponentError;
pub use receiver::ReceiverFactory;
pub use registry::{FactoryRegistration, FactoryRegistry};
pub use service::Service;
