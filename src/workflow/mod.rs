pub mod rows;
pub mod session;

pub use rows::{AssignedRow, CandidateRow, QuestionDisplay};
pub use session::AssignmentSession;
