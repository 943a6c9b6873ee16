//! Common utilities and shared types for docshelf.
//!
//! This crate provides the foundational components used across all docshelf
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//!
//! # Example
//!
//! ```no_run
//! use docshelf_common::{AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     println!("API base URL: {}", config.api.base_url);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;

pub use config::{ApiConfig, Config, LogConfig};
pub use error::{AppError, AppResult};
