//! # Core Module
//!
//! Session-level configuration shared by the library and the demo binary.

pub mod config;

pub use config::{Config, ConfigError, EngineConfig, SessionConfig};
