//! Procedural for initialization
//!
//! Order matters: config, then logger, then database.

pub mod config;
pub mod db;
pub mod error;
pub mod logger;

pub use error::InitError;
pub type Result<T> = std::result::Result<T, InitError>;
