use serde::{Deserialize, Serialize};

use super::taxonomy::ScopeRef;

pub type QuestionId = i64;

/// 题目难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Moderate,
    Difficult,
}

impl Difficulty {
    /// 接口使用的难度编码
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Moderate => "moderate",
            Difficulty::Difficult => "difficult",
        }
    }

    /// 中文名称
    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "简单",
            Difficulty::Moderate => "中等",
            Difficulty::Difficult => "困难",
        }
    }

    /// 尝试从字符串解析难度（接受接口编码或中文名）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "简单" => Some(Difficulty::Easy),
            "moderate" | "中等" => Some(Difficulty::Moderate),
            "difficult" | "困难" => Some(Difficulty::Difficult),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 题目的备选答案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub question_id: QuestionId,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_correct: bool,
}

/// 题库题目
///
/// 四个层级字段由命题人按授权层级填写，通常只填最具体的一个；
/// 范围判定统一走 [`Question::scope`]，不直接读字段。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub difficulty_level: Difficulty,
    #[serde(default)]
    pub course_id: Option<i64>,
    #[serde(default)]
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub chapter_id: Option<i64>,
    #[serde(default)]
    pub topic_id: Option<i64>,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

impl Question {
    /// 题目的生效层级范围（最具体的字段优先，全缺失返回 None）
    pub fn scope(&self) -> Option<ScopeRef> {
        ScopeRef::from_level_fields(self.course_id, self.subject_id, self.chapter_id, self.topic_id)
    }
}
