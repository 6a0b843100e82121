//! Group construction from declarative filter specifications.

pub mod builder;

pub use builder::{build_groups, GroupBuilder};
