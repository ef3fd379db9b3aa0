//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides
//!     → validation.rs (semantic checks, once on the final config)
//!     → AppConfig (validated, immutable)
//!     → handed to startup, which wires the subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, resolve_config, ConfigError};
pub use schema::{
    AppConfig, DispatchMode, ListenerConfig, LogFormat, ObservabilityConfig, SignalConfig,
    StoreConfig, TimeoutConfig,
};
pub use validation::ValidationError;
