//! Infrastructure configuration modules.

pub mod engine;
pub mod gateway;
pub mod logging;
pub mod scheduler;
pub mod settings;
pub mod store;

pub use engine::EngineConfig;
pub use gateway::{BroadcastConfig, GatewayConfig};
pub use logging::LoggingConfig;
pub use scheduler::{JobConfig, JobsConfig, SchedulerConfig};
pub use settings::Config;
pub use store::{StoreBackend, StoreConfig, StoreKeys};
