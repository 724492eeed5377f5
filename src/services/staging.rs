//! 分配暂存 - 业务能力层
//!
//! 管理"已提交 / 待新增 / 待移除"三个集合。操作台上的所有
//! 勾选、改分动作先落在这里，点"提交"才真正发远程请求。

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::models::{sanitize_marks, Assignment, AssignmentId, Exam, QuestionId, DEFAULT_MARKS};

/// 待新增记录（分值可后补，默认 1 分）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingAdd {
    pub marks: f64,
}

/// 勾选动作落到的分支
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// 已提交的题目被反选，标记为待移除
    StagedForRemoval,
    /// 待移除标记被撤销，恢复已提交状态
    RemovalUndone,
    /// 待新增的勾选被撤销
    Deselected,
    /// 新勾选成功，调用方应立即让操作员填写分值
    SelectedAwaitingMarks,
}

impl ToggleOutcome {
    /// 中文名称
    pub fn name(self) -> &'static str {
        match self {
            ToggleOutcome::StagedForRemoval => "标记待移除",
            ToggleOutcome::RemovalUndone => "撤销移除标记",
            ToggleOutcome::Deselected => "取消勾选",
            ToggleOutcome::SelectedAwaitingMarks => "勾选成功，待填分值",
        }
    }
}

impl std::fmt::Display for ToggleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 一次提交要做的全部远程操作
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StagedDiff {
    /// (题目ID, 分值)，按题目ID升序
    pub to_add: Vec<(QuestionId, f64)>,
    /// 按题目ID升序
    pub to_remove: Vec<QuestionId>,
}

impl StagedDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// 远程操作总数
    pub fn op_count(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }
}

/// 操作台展示用的汇总数字
#[derive(Debug, Clone, PartialEq)]
pub struct StagingSummary {
    /// 当前已提交的分配数
    pub committed: usize,
    pub to_add: usize,
    pub to_remove: usize,
    /// 按当前暂存提交后的题目数
    pub planned_total: usize,
    /// 按当前暂存提交后的总分值
    pub planned_marks: f64,
    /// 考试题目数上限，0 即不限制
    pub max_questions: usize,
}

impl StagingSummary {
    /// 提交后是否会超出题目数上限（上限只提示，不拦截）
    pub fn over_capacity(&self) -> bool {
        self.max_questions > 0 && self.planned_total > self.max_questions
    }
}

impl std::fmt::Display for StagingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "已提交 {} / 待新增 {} / 待移除 {}，提交后 {} 题、总分 {:.1}",
            self.committed, self.to_add, self.to_remove, self.planned_total, self.planned_marks
        )
    }
}

/// 本地暂存的三个集合
///
/// 不变量（所有操作维护，reset 整体重建）：
/// - `pending_adds` 与 `committed` 的键不相交
/// - `pending_removes` 是 `committed` 键的子集
#[derive(Debug, Default)]
pub struct AssignmentStaging {
    committed: BTreeMap<QuestionId, Assignment>,
    pending_adds: BTreeMap<QuestionId, PendingAdd>,
    pending_removes: BTreeSet<QuestionId>,
}

impl AssignmentStaging {
    /// 用服务器返回的分配列表初始化
    pub fn new(initial: Vec<Assignment>) -> Self {
        let mut staging = Self::default();
        staging.reset(initial);
        staging
    }

    /// 丢弃全部暂存，用服务器数据重建已提交集合
    pub fn reset(&mut self, fresh: Vec<Assignment>) {
        self.committed.clear();
        self.pending_adds.clear();
        self.pending_removes.clear();
        for assignment in fresh {
            let question_id = assignment.question_id;
            if self.committed.insert(question_id, assignment).is_some() {
                warn!("服务器返回重复的题目分配 (题目 {})，保留后一条", question_id);
            }
        }
        debug!("暂存区已重置: {} 条已提交分配", self.committed.len());
    }

    /// 只丢弃暂存的改动，保留上次已知的已提交集合
    pub fn clear_staged(&mut self) {
        self.pending_adds.clear();
        self.pending_removes.clear();
    }

    /// 勾选/反选一个题目，返回实际落到的分支
    pub fn toggle_select(&mut self, question_id: QuestionId) -> ToggleOutcome {
        let outcome = if self.committed.contains_key(&question_id) {
            if self.pending_removes.remove(&question_id) {
                ToggleOutcome::RemovalUndone
            } else {
                self.pending_removes.insert(question_id);
                ToggleOutcome::StagedForRemoval
            }
        } else if self.pending_adds.remove(&question_id).is_some() {
            ToggleOutcome::Deselected
        } else {
            self.pending_adds.insert(
                question_id,
                PendingAdd {
                    marks: DEFAULT_MARKS,
                },
            );
            ToggleOutcome::SelectedAwaitingMarks
        };
        debug!("题目 {} {}", question_id, outcome);
        outcome
    }

    /// 给待新增的题目填分值，非法分值回落为默认值
    ///
    /// 题目不在待新增集合时不做任何事，返回 false。
    pub fn set_marks_for_pending_add(&mut self, question_id: QuestionId, marks: f64) -> bool {
        match self.pending_adds.get_mut(&question_id) {
            Some(entry) => {
                let clean = sanitize_marks(marks);
                if clean != marks {
                    warn!("题目 {} 的分值 {} 非法，已回落为 {}", question_id, marks, clean);
                }
                entry.marks = clean;
                true
            }
            None => false,
        }
    }

    /// 题目是否在已提交集合里（含已标记待移除的）
    pub fn is_committed(&self, question_id: QuestionId) -> bool {
        self.committed.contains_key(&question_id)
    }

    pub fn is_pending_add(&self, question_id: QuestionId) -> bool {
        self.pending_adds.contains_key(&question_id)
    }

    pub fn is_pending_remove(&self, question_id: QuestionId) -> bool {
        self.pending_removes.contains(&question_id)
    }

    /// 待新增题目当前填的分值
    pub fn pending_add_marks(&self, question_id: QuestionId) -> Option<f64> {
        self.pending_adds.get(&question_id).map(|p| p.marks)
    }

    pub fn committed_count(&self) -> usize {
        self.committed.len()
    }

    /// 按题目ID升序遍历已提交分配
    pub fn iter_committed(&self) -> impl Iterator<Item = &Assignment> {
        self.committed.values()
    }

    pub fn committed_for_question(&self, question_id: QuestionId) -> Option<&Assignment> {
        self.committed.get(&question_id)
    }

    /// 按分配记录ID查找已提交分配
    pub fn find_by_assignment_id(&self, assignment_id: AssignmentId) -> Option<&Assignment> {
        self.committed.values().find(|a| a.id == assignment_id)
    }

    /// 用服务器确认后的记录替换已提交分配（改分成功后调用）
    pub fn replace_committed(&mut self, mut updated: Assignment) -> bool {
        match self.committed.get_mut(&updated.question_id) {
            Some(entry) => {
                // 单条操作的响应可能不带内嵌题目，保留旧的
                if updated.question.is_none() {
                    updated.question = entry.question.take();
                }
                *entry = updated;
                true
            }
            None => false,
        }
    }

    /// 汇总当前暂存要做的全部远程操作
    pub fn compute_diff(&self) -> StagedDiff {
        StagedDiff {
            to_add: self
                .pending_adds
                .iter()
                .map(|(&question_id, pending)| (question_id, pending.marks))
                .collect(),
            to_remove: self.pending_removes.iter().copied().collect(),
        }
    }

    /// 操作台展示用的汇总
    pub fn summary(&self, exam: &Exam) -> StagingSummary {
        let kept_marks: f64 = self
            .committed
            .iter()
            .filter(|(question_id, _)| !self.pending_removes.contains(question_id))
            .map(|(_, a)| a.marks)
            .sum();
        let add_marks: f64 = self.pending_adds.values().map(|p| p.marks).sum();
        StagingSummary {
            committed: self.committed.len(),
            to_add: self.pending_adds.len(),
            to_remove: self.pending_removes.len(),
            planned_total: self.committed.len() - self.pending_removes.len()
                + self.pending_adds.len(),
            planned_marks: kept_marks + add_marks,
            max_questions: exam.max_questions,
        }
    }
}
