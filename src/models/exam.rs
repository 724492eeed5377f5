use serde::{Deserialize, Serialize};

use super::taxonomy::ScopeRef;

pub type ExamId = i64;

/// 考试状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamStatus {
    Active,
    Inactive,
}

impl ExamStatus {
    /// 中文名称
    pub fn name(self) -> &'static str {
        match self {
            ExamStatus::Active => "启用",
            ExamStatus::Inactive => "停用",
        }
    }
}

impl Default for ExamStatus {
    fn default() -> Self {
        ExamStatus::Active
    }
}

impl std::fmt::Display for ExamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 考试
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exam {
    pub id: ExamId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: i64,
    pub max_marks: f64,
    /// 题目数上限，0 表示不限制（仅用于提示，服务器不强制）
    #[serde(default)]
    pub max_questions: usize,
    #[serde(default)]
    pub status: ExamStatus,
    #[serde(default)]
    pub course_id: Option<i64>,
    #[serde(default)]
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub chapter_id: Option<i64>,
    #[serde(default)]
    pub topic_id: Option<i64>,
}

impl Exam {
    /// 考试的生效层级范围（最具体的字段优先，全缺失返回 None）
    pub fn scope(&self) -> Option<ScopeRef> {
        ScopeRef::from_level_fields(self.course_id, self.subject_id, self.chapter_id, self.topic_id)
    }

    /// 是否设置了题目数上限
    pub fn has_question_cap(&self) -> bool {
        self.max_questions > 0
    }
}
