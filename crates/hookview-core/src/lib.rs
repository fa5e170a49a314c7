//! # hookview-core
//!
//! Core crate for hookview. Contains configuration schemas, typed
//! identifiers, the captured webhook event model, bundled sample payloads
//! for local test runs, and the unified error system.
//!
//! This crate has **no** internal dependencies on other hookview crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod samples;
pub mod types;

pub use error::AppError;
pub use events::CapturedEvent;
pub use result::AppResult;
