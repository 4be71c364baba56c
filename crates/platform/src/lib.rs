//! # Bosun Platform
//!
//! Core platform types and utilities for the Bosun SSH ecosystem.
//!
//! This crate provides:
//! - Unified error types (`BosunError`, `BosunResult`)
//! - The insertion-ordered sequence container (`OrderedList`) that
//!   per-session registries are built on
//!
//! # Examples
//!
//! ```
//! use bosun_platform::{BosunResult, OrderedList};
//!
//! fn build_chain() -> BosunResult<OrderedList<&'static str>> {
//!     let mut chain = OrderedList::new();
//!     chain.append("first")?;
//!     chain.append("second")?;
//!     Ok(chain)
//! }
//!
//! # fn main() -> BosunResult<()> {
//! let chain = build_chain()?;
//! assert_eq!(chain.len(), 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod error;
pub mod list;

pub use error::{BosunError, BosunResult};
pub use list::{Cursor, OrderedList};

/// Platform version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
