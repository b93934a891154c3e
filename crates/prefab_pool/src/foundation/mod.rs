//! Foundation module - Core utilities and types
//!
//! This module provides the small set of utilities the pool builds on:
//! - Math types for object placement
//! - Logging setup for binaries

pub mod math;
pub mod logging;
