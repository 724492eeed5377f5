pub mod ancestry;
pub mod scope_filter;
pub mod staging;

pub use ancestry::AncestryIndex;
pub use scope_filter::{filter_candidates, qualifies, CandidateFilter};
pub use staging::{
    AssignmentStaging, PendingAdd, StagedDiff, StagingSummary, ToggleOutcome,
};
