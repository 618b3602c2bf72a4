//! Test fixtures and utilities

pub mod catalog;
pub mod problems;

#[allow(unused_imports)]
pub use catalog::*;
#[allow(unused_imports)]
pub use problems::*;
