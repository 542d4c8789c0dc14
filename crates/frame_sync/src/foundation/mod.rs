//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Handle collections
//! - Frame timing
//! - Logging setup

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
