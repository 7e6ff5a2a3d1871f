//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → WAVE_API_BASE environment override
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → passed by value into transport and orchestrator
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the base address is never global state
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::ClientConfig;
pub use schema::{ApprovalConfig, ObservabilityConfig, PollingConfig, RetryConfig, ServiceConfig};
