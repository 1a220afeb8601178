//! Common test utilities and infrastructure
//!
//! This module provides shared functionality for integration tests including:
//! - Cucumber world implementation
//! - Description fixtures and session builders

#![allow(dead_code)]

pub mod fixtures;
pub mod world;

// Re-export commonly used items
#[allow(unused_imports)]
pub use world::WadlWorld;
