//! 操作台展示行 - 流程层
//!
//! 会话对外输出的两类列表行：可选题目行、已分配行。
//! 只做展示聚合，不持有任何可变状态。

use crate::models::{Assignment, Question, QuestionId};

/// 可选题目列表里的一行
#[derive(Debug)]
pub struct CandidateRow<'a> {
    pub question: &'a Question,
    /// 是否已勾选（待新增）
    pub selected: bool,
    /// 已勾选时暂存的分值
    pub pending_marks: Option<f64>,
}

/// 已分配行里题目信息的展示形式
///
/// 分配记录指向的题目可能已从题库下架，列表照常展示，
/// 只是题干换成占位文案。
#[derive(Debug)]
pub enum QuestionDisplay<'a> {
    Found(&'a Question),
    Missing(QuestionId),
}

impl QuestionDisplay<'_> {
    /// 展示用题干
    pub fn content(&self) -> String {
        match self {
            QuestionDisplay::Found(q) => q.content.clone(),
            QuestionDisplay::Missing(id) => format!("（题目 {} 已不在题库中）", id),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, QuestionDisplay::Missing(_))
    }
}

impl std::fmt::Display for QuestionDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content())
    }
}

/// 已分配列表里的一行
#[derive(Debug)]
pub struct AssignedRow<'a> {
    pub assignment: &'a Assignment,
    pub question: QuestionDisplay<'a>,
    /// 是否已标记待移除
    pub staged_for_removal: bool,
}
