//! Application layer (use-cases, policies).
//!
//! This module orchestrates domain logic and defines workflow policies
//! without depending on rendering frameworks or storage details.

pub mod review;
