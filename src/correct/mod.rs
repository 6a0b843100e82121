//! Multiple testing correction.

pub mod bh;

pub use bh::correct_bh;
