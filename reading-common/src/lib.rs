//! # Reading Common Library
//!
//! Shared code for the reading-experience microservices:
//! - Error type and result alias
//! - Configuration resolution (CLI → ENV → TOML → default)
//! - Internal token policy and uniform error payloads
//! - "Time ago" formatting for experience listings
//! - Tracing subscriber setup

pub mod api;
pub mod config;
pub mod error;
pub mod human_time;
pub mod logging;

pub use error::{Error, Result};
