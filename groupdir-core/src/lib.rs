//! # groupdir core
//!
//! Core types, errors, and traits shared by every groupdir crate.
//!
//! - **Types**: [`GroupRecord`], [`GroupCategory`], [`GroupMeta`] and the
//!   tri-state [`PolicyStatus`]
//! - **Errors**: [`GroupError`] with an HTTP status mapping
//! - **Constants**: upstream endpoints and cache defaults
//! - **Traits**: [`GroupFetcher`] and [`Clock`] seams for tests
//!
//! ## Example
//!
//! ```rust
//! use groupdir_core::{GroupCategory, GroupRecord, PolicyStatus};
//!
//! let record = GroupRecord::partial("webperf", GroupCategory::WorkingGroup, 45211);
//! assert_eq!(record.patent_policy, PolicyStatus::Undetermined);
//!
//! let json = serde_json::to_value(&record).unwrap();
//! assert_eq!(json["type"], "wg");
//! assert!(json.get("patentPolicy").is_none());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod clock;
pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use clock::{ManualClock, SystemClock};
pub use constants::*;
pub use error::{GroupError, Result};
pub use traits::*;
pub use types::*;
