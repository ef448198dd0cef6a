//! Triangular arbitrage decision engine.
//!
//! This crate contains the pure logic that turns three top-of-book
//! snapshots into a priced, sized and rounded set of orders plus an
//! execution verdict.

pub mod calculator;
pub mod error;
pub mod fee;

pub use calculator::*;
pub use error::*;
pub use fee::*;
