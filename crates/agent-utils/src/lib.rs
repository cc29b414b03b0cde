//! Shared utilities for the stock analysis desk
//!
//! This crate provides common functionality used across the workspace:
//! logging setup and environment-driven configuration helpers.

pub mod env;
pub mod logging;

pub use env::{EnvSource, MapEnv, ProcessEnv, load_dotenv};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
