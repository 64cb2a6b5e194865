//! csvcompare - compare a numeric column between two CSV snapshots
//!
//! Joins an "old" and a "new" export on an identifier column, differences a
//! chosen value column per id, and summarizes and charts the differences.

pub mod compare;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;

pub use compare::{compute_comparison, Comparison};
pub use config::Config;
pub use error::CompareError;
pub use model::Table;
