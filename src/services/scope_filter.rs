//! 范围过滤 - 业务能力层
//!
//! 判定题目是否有资格进入某场考试的可选列表，
//! 并叠加操作台的搜索、难度与二级层级筛选。

use regex::Regex;

use crate::models::{CourseId, Difficulty, Exam, Question, SubjectId};

use super::ancestry::AncestryIndex;

/// 可选题目列表的叠加筛选条件
///
/// 二级层级筛选（课程/科目）只会收窄范围判定的结果，
/// 绝不放宽：与考试范围交集为空时列表就是空。
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    /// 题干关键词，比较前两边都做规整化
    pub search_text: Option<String>,
    /// 难度
    pub difficulty: Option<Difficulty>,
    /// 课程
    pub course_id: Option<CourseId>,
    /// 科目
    pub subject_id: Option<SubjectId>,
}

impl CandidateFilter {
    /// 不加任何筛选
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.search_text.is_none()
            && self.difficulty.is_none()
            && self.course_id.is_none()
            && self.subject_id.is_none()
    }
}

/// 题目是否有资格分配给该考试
///
/// 题目的生效范围必须落在考试的生效范围之内。
/// 考试没设范围、题目没设范围、或祖先链断裂，一律不合格。
pub fn qualifies(question: &Question, exam: &Exam, index: &AncestryIndex) -> bool {
    let exam_scope = match exam.scope() {
        Some(s) => s,
        None => return false,
    };
    let question_scope = match question.scope() {
        Some(s) => s,
        None => return false,
    };
    index.contains(exam_scope, question_scope)
}

/// 过滤出考试的可选题目，保持输入顺序
pub fn filter_candidates<'a>(
    questions: &'a [Question],
    exam: &Exam,
    index: &AncestryIndex,
    filter: &CandidateFilter,
) -> Vec<&'a Question> {
    let needle = filter
        .search_text
        .as_deref()
        .map(normalize_content)
        .filter(|s| !s.is_empty());
    questions
        .iter()
        .filter(|q| qualifies(q, exam, index))
        .filter(|q| matches_filter(q, index, filter, needle.as_deref()))
        .collect()
}

fn matches_filter(
    question: &Question,
    index: &AncestryIndex,
    filter: &CandidateFilter,
    needle: Option<&str>,
) -> bool {
    if let Some(difficulty) = filter.difficulty {
        if question.difficulty_level != difficulty {
            return false;
        }
    }
    if let Some(course_id) = filter.course_id {
        let within = question
            .scope()
            .and_then(|s| index.resolve_course(s))
            .map(|c| c == course_id)
            .unwrap_or(false);
        if !within {
            return false;
        }
    }
    if let Some(subject_id) = filter.subject_id {
        let within = question
            .scope()
            .and_then(|s| index.resolve_subject(s))
            .map(|s| s == subject_id)
            .unwrap_or(false);
        if !within {
            return false;
        }
    }
    if let Some(needle) = needle {
        if !normalize_content(&question.content).contains(needle) {
            return false;
        }
    }
    true
}

/// 纯文本化题干：去 HTML 标签、折叠空白、小写
fn normalize_content(raw: &str) -> String {
    let mut text = raw.to_string();
    if let Ok(re) = Regex::new(r"<[^>]+>") {
        text = re.replace_all(&text, " ").into_owned();
    }
    if let Ok(re) = Regex::new(r"\s+") {
        text = re.replace_all(&text, " ").into_owned();
    }
    text.trim().to_lowercase()
}
