//! # PWD Jobs Common Library
//!
//! Shared code for the PWD Jobs services:
//! - Error and result types
//! - Bootstrap TOML configuration and root folder resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
