//! # groupdir lookup
//!
//! Resolves W3C group shortnames to [`GroupRecord`](groupdir_core::GroupRecord)s:
//! cache first, then the static registry for the group id, then the W3C API.
//! Successful results are cached for two weeks.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod lookup;

pub use lookup::{GroupLookup, LookupConfig};
