//! Domain types for the review engine.
//! Defines the core data structures and business objects used throughout the engine.

pub mod comment;
pub mod diff;
pub mod error;
pub mod review;

pub use comment::*;
pub use diff::*;
pub use error::*;
pub use review::*;
