//! Domain types for groupdir.
//!
//! - [`GroupCategory`]: working group or community group
//! - [`GroupMeta`]: registry-derived identity of a group
//! - [`GroupRecord`]: identity plus upstream metadata
//! - [`PatentPolicy`] / [`PolicyStatus`]: patent policy classification

mod group;
mod policy;

pub use group::*;
pub use policy::*;
