pub mod assignment;
pub mod exam;
pub mod question;
pub mod taxonomy;

pub use assignment::{marks_is_valid, sanitize_marks, Assignment, AssignmentId, DEFAULT_MARKS};
pub use exam::{Exam, ExamId, ExamStatus};
pub use question::{Answer, Difficulty, Question, QuestionId};
pub use taxonomy::{
    Chapter, ChapterId, Course, CourseId, ScopeRef, Subject, SubjectId, TaxonomySnapshot, Topic,
    TopicId,
};
