pub mod comments;
pub mod lifecycle;
pub mod merge;
pub mod service;

pub use service::ReviewService;
