//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → BalancerConfig handed to the balancer builder
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the balancer never re-reads it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::AppConfig;
pub use schema::BalancerConfig;
pub use schema::ObservabilityConfig;
pub use schema::SimulationConfig;
pub use schema::StrategyKind;
