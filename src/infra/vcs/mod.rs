pub mod git;
pub mod traits;

pub use git::GitChangeSource;
pub use traits::{ChangeSource, DiffSnapshot, MergeOutcome};
