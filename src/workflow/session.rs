//! 考试分配会话 - 流程层
//!
//! 核心职责：一场考试从"加载"到"提交"的完整编辑会话
//!
//! 流程顺序：
//! 1. load → 并发拉取考试、层级、题库、已有分配
//! 2. 勾选 / 填分 / 改分，全部落在本地暂存区
//! 3. commit → 批次下发，无论成败都以服务器数据重置

use tracing::{info, warn};

use crate::clients::AssignmentProvider;
use crate::error::{AppError, AppResult};
use crate::models::{sanitize_marks, Assignment, AssignmentId, Exam, ExamId, Question, QuestionId};
use crate::orchestrator::{reconcile, CommitOutcome};
use crate::services::{
    filter_candidates, AncestryIndex, AssignmentStaging, CandidateFilter, StagedDiff,
    StagingSummary, ToggleOutcome,
};
use crate::workflow::rows::{AssignedRow, CandidateRow, QuestionDisplay};

/// 考试分配编辑会话
///
/// - 持有一场考试的全部编辑状态（题库快照、层级索引、暂存区）
/// - 勾选、填分、改分只改内存，commit 才碰网络
/// - commit 走独占借用，提交进行中不可能再发起第二次提交
pub struct AssignmentSession<P: AssignmentProvider> {
    provider: P,
    exam: Exam,
    questions: Vec<Question>,
    index: AncestryIndex,
    staging: AssignmentStaging,
}

impl<P: AssignmentProvider> AssignmentSession<P> {
    /// 加载一场考试的编辑会话
    ///
    /// 考试必须设置了层级范围，否则拒绝打开：宁可不开，
    /// 也不能给出一张全题库的可选列表。
    pub async fn load(provider: P, exam_id: ExamId) -> AppResult<Self> {
        info!("🚀 加载考试 {} 的分配会话...", exam_id);
        let exam = provider.fetch_exam(exam_id).await?;
        let exam_scope = exam
            .scope()
            .ok_or_else(|| AppError::exam_scope_missing(exam_id))?;

        let (taxonomy, questions, assignments) = tokio::try_join!(
            provider.fetch_taxonomy(),
            provider.fetch_questions(),
            provider.fetch_assignments(exam_id),
        )?;

        let index = AncestryIndex::build(&taxonomy);
        if !index.knows(exam_scope) {
            warn!("⚠️ 考试范围 {} 不在层级数据里，可选题目可能为空", exam_scope);
        }

        let staging = AssignmentStaging::new(assignments);
        info!(
            "✓ 会话就绪: 《{}》 范围 [{}]，层级 {} 节点，题库 {} 题，已分配 {} 题",
            exam.title,
            index.scope_label(exam_scope),
            taxonomy.node_count(),
            questions.len(),
            staging.committed_count()
        );

        Ok(Self {
            provider,
            exam,
            questions,
            index,
            staging,
        })
    }

    pub fn exam(&self) -> &Exam {
        &self.exam
    }

    pub fn index(&self) -> &AncestryIndex {
        &self.index
    }

    /// 考试范围的显示路径
    pub fn exam_scope_label(&self) -> String {
        match self.exam.scope() {
            Some(scope) => self.index.scope_label(scope),
            None => "未设置".to_string(),
        }
    }

    /// 可选题目列表：落在考试范围内、且未被占用的题目
    ///
    /// 已提交的分配一律不出现在这里，包括已标记待移除的，
    /// 不给重复分配留口子。
    pub fn available_questions(&self, filter: &CandidateFilter) -> Vec<CandidateRow<'_>> {
        filter_candidates(&self.questions, &self.exam, &self.index, filter)
            .into_iter()
            .filter(|q| !self.staging.is_committed(q.id))
            .map(|q| CandidateRow {
                question: q,
                selected: self.staging.is_pending_add(q.id),
                pending_marks: self.staging.pending_add_marks(q.id),
            })
            .collect()
    }

    /// 已分配列表：当前已提交的分配，标注待移除状态
    pub fn assigned_questions(&self) -> Vec<AssignedRow<'_>> {
        self.staging
            .iter_committed()
            .map(|assignment| AssignedRow {
                assignment,
                question: self.display_question(assignment),
                staged_for_removal: self.staging.is_pending_remove(assignment.question_id),
            })
            .collect()
    }

    /// 勾选/反选一个题目（只改暂存区）
    ///
    /// 返回 [`ToggleOutcome::SelectedAwaitingMarks`] 时调用方
    /// 应立即让操作员填写分值。
    pub fn toggle_select(&mut self, question_id: QuestionId) -> ToggleOutcome {
        self.staging.toggle_select(question_id)
    }

    /// 给待新增的题目填分值，非法分值回落为默认值
    pub fn set_marks_for_pending_add(&mut self, question_id: QuestionId, marks: f64) -> bool {
        self.staging.set_marks_for_pending_add(question_id, marks)
    }

    /// 修改已提交分配的分值（立即生效，不走暂存区）
    ///
    /// 先请求服务器，确认成功才更新本地记录；失败时本地保持原值。
    pub async fn set_marks_for_committed(
        &mut self,
        assignment_id: AssignmentId,
        marks: f64,
    ) -> AppResult<()> {
        let target = self
            .staging
            .find_by_assignment_id(assignment_id)
            .cloned()
            .ok_or_else(|| AppError::unknown_assignment(assignment_id))?;
        let clean = sanitize_marks(marks);
        if clean != marks {
            warn!("分配 {} 的分值 {} 非法，已回落为 {}", assignment_id, marks, clean);
        }
        let updated = self.provider.update_assignment_marks(&target, clean).await?;
        self.staging.replace_committed(updated);
        info!("✓ 分配 {} 分值改为 {:.1}", assignment_id, clean);
        Ok(())
    }

    /// 当前暂存要做的全部远程操作
    pub fn compute_diff(&self) -> StagedDiff {
        self.staging.compute_diff()
    }

    /// 操作台汇总数字
    pub fn summary(&self) -> StagingSummary {
        self.staging.summary(&self.exam)
    }

    /// 提交：把暂存差异批量下发，然后以服务器数据重建状态
    ///
    /// 批次里单个操作失败不影响其余操作；无论批次成败，提交后
    /// 都重新拉取该考试的分配列表并丢弃全部暂存。暂存为空时
    /// 直接返回，不发任何请求。
    pub async fn commit(&mut self) -> AppResult<CommitOutcome> {
        let diff = self.staging.compute_diff();
        if diff.is_empty() {
            info!("暂存区没有改动，无需提交");
            return Ok(CommitOutcome::default());
        }

        let summary = self.staging.summary(&self.exam);
        if summary.over_capacity() {
            warn!(
                "⚠️ 提交后将有 {} 题，超出上限 {}（仅提示，不拦截）",
                summary.planned_total, summary.max_questions
            );
        }

        let outcome = reconcile(&self.provider, self.exam.id, &diff).await;

        // 提交后一律以服务器为准，不信任本地推算
        match self.provider.fetch_assignments(self.exam.id).await {
            Ok(fresh) => self.staging.reset(fresh),
            Err(e) => {
                // 批次已经部分生效，保留暂存只会骗人，照样丢弃
                self.staging.clear_staged();
                warn!("⚠️ 提交后刷新分配列表失败，界面数据可能过期: {}", e);
                return Err(e);
            }
        }

        if let Some(partial) = outcome.partial_error() {
            warn!("⚠️ {}", partial);
        }
        Ok(outcome)
    }

    fn display_question<'a>(&'a self, assignment: &'a Assignment) -> QuestionDisplay<'a> {
        // 优先用分配记录内嵌的题目，其次查题库快照
        if let Some(question) = assignment.question.as_ref() {
            return QuestionDisplay::Found(question);
        }
        match self.questions.iter().find(|q| q.id == assignment.question_id) {
            Some(question) => QuestionDisplay::Found(question),
            None => QuestionDisplay::Missing(assignment.question_id),
        }
    }
}
