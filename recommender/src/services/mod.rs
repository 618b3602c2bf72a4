//! Recommender services implementations

pub mod retry;
pub mod solved_ac;

#[cfg(test)]
pub mod tests;

pub use retry::*;
pub use solved_ac::*;
