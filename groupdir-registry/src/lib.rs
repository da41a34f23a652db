//! # groupdir registry
//!
//! Static table mapping W3C group shortnames to `(category, id)` pairs.
//!
//! The table is loaded once at startup, either from the copy bundled into the
//! binary or from an operator-supplied JSON file, and is read-only afterwards.
//!
//! ## Example
//!
//! ```rust
//! use groupdir_core::GroupCategory;
//! use groupdir_registry::GroupRegistry;
//!
//! let registry = GroupRegistry::from_json(r#"{"wg": {"css": 32061}}"#).unwrap();
//! let meta = registry.resolve("css").unwrap();
//! assert_eq!(meta.category, GroupCategory::WorkingGroup);
//! assert!(registry.resolve("nope").is_none());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod file;
mod memory;

pub use memory::GroupRegistry;
