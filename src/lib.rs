//! Post-save signal demo service library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod models;
pub mod observability;
pub mod signals;
pub mod store;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use models::{PostSave, Record, RecordManager};
pub use signals::Signal;
