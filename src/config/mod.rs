//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig)
//! - [`limits`]: Resource limits and output retention (LimitsConfig, OutputConfig)
//! - [`oper`]: Operator, services-link and challenge blocks
//! - [`validation`]: Startup checks
//!
//! Every replica must load the same file: values here feed the state
//! machine (server name, creation string, host prefix) and therefore the
//! output it produces.

mod limits;
mod oper;
mod types;
pub mod validation;

pub use limits::{LimitsConfig, OutputConfig};
pub use oper::{CaptchaConfig, OperBlock, ServicesBlock};
pub use types::{Config, ConfigError, ServerConfig};
pub use validation::{ValidationError, validate};
