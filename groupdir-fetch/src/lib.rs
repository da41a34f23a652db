//! W3C API client for groupdir.
//!
//! Resolves numeric group ids into [`GroupRecord`](groupdir_core::GroupRecord)s,
//! enriching each with the patent policy of the group's active charter.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod client;

pub use client::{FetcherConfig, W3cClient};
