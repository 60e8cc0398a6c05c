//! sitelens Core Library
//!
//! Core types, configuration, and error handling for the sitelens artifact generator.

pub mod config;
pub mod content;
pub mod error;
pub mod text;

pub use config::Config;
pub use content::{FeedEntry, PageRecord, SectionRecord};
pub use error::{CoreError, Result};
