//! 提交批次执行器 - 编排层
//!
//! ## 职责
//!
//! 把暂存区算出的差异一次性同步到服务器。
//!
//! ## 核心功能
//!
//! 1. **并发下发**：新增与移除全部同时发出，互相不排序
//! 2. **全量结算**：等每一个操作出结果，单个失败不打断其余操作
//! 3. **逐项计数**：成功/失败分开统计，失败带原因
//!
//! ## 设计特点
//!
//! - **不做重试**：失败的操作留给下一轮编辑重新暂存
//! - **不做回滚**：提交后一律以服务器返回的数据为准

use futures::future::{join_all, BoxFuture};
use tracing::{info, warn};

use crate::clients::AssignmentProvider;
use crate::error::AppError;
use crate::models::{ExamId, QuestionId};
use crate::services::StagedDiff;

/// 单个远程操作的类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Add,
    Remove,
}

impl OpKind {
    /// 中文名称
    pub fn name(self) -> &'static str {
        match self {
            OpKind::Add => "新增",
            OpKind::Remove => "移除",
        }
    }
}

impl std::fmt::Display for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 批次里失败的单个操作
#[derive(Debug, Clone)]
pub struct FailedOp {
    pub kind: OpKind,
    pub question_id: QuestionId,
    pub message: String,
}

/// 一次提交批次的结算结果
#[derive(Debug, Clone, Default)]
pub struct CommitOutcome {
    pub added: usize,
    pub removed: usize,
    pub failed: usize,
    pub failures: Vec<FailedOp>,
}

impl CommitOutcome {
    /// 批次操作总数
    pub fn total(&self) -> usize {
        self.added + self.removed + self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// 失败部分对应的错误，全部成功时为 None
    pub fn partial_error(&self) -> Option<AppError> {
        if self.failed > 0 {
            Some(AppError::partial_commit(self.failed, self.total()))
        } else {
            None
        }
    }
}

impl std::fmt::Display for CommitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "新增 {} / 移除 {} / 失败 {}",
            self.added, self.removed, self.failed
        )
    }
}

/// 单个操作的结算记录
struct OpResult {
    kind: OpKind,
    question_id: QuestionId,
    error: Option<String>,
}

/// 执行一次提交批次
///
/// 差异里的每一条都转成远程调用并同时发出，等全部结算完
/// 才返回。单个操作失败只计数，不影响其余操作，也不中途
/// 放弃。调用方在本函数返回后必须重新拉取权威数据。
pub async fn reconcile<P>(provider: &P, exam_id: ExamId, diff: &StagedDiff) -> CommitOutcome
where
    P: AssignmentProvider + ?Sized,
{
    if diff.is_empty() {
        info!("暂存区没有改动，跳过提交");
        return CommitOutcome::default();
    }

    log_batch_start(diff);

    let mut ops: Vec<BoxFuture<'_, OpResult>> = Vec::with_capacity(diff.op_count());
    for &(question_id, marks) in &diff.to_add {
        ops.push(Box::pin(async move {
            let error = provider
                .create_assignment(exam_id, question_id, marks)
                .await
                .err()
                .map(|e| e.to_string());
            OpResult {
                kind: OpKind::Add,
                question_id,
                error,
            }
        }));
    }
    for &question_id in &diff.to_remove {
        ops.push(Box::pin(async move {
            let error = provider
                .delete_assignment(exam_id, question_id)
                .await
                .err()
                .map(|e| e.to_string());
            OpResult {
                kind: OpKind::Remove,
                question_id,
                error,
            }
        }));
    }

    let mut outcome = CommitOutcome::default();
    for result in join_all(ops).await {
        match result.error {
            None => match result.kind {
                OpKind::Add => outcome.added += 1,
                OpKind::Remove => outcome.removed += 1,
            },
            Some(message) => {
                warn!("❌ {}题目 {} 失败: {}", result.kind, result.question_id, message);
                outcome.failed += 1;
                outcome.failures.push(FailedOp {
                    kind: result.kind,
                    question_id: result.question_id,
                    message,
                });
            }
        }
    }

    log_batch_complete(&outcome);
    outcome
}

// ========== 日志辅助函数 ==========

fn log_batch_start(diff: &StagedDiff) {
    info!("\n{}", "=".repeat(60));
    info!(
        "📦 开始提交批次: 新增 {} 个 / 移除 {} 个",
        diff.to_add.len(),
        diff.to_remove.len()
    );
    info!("{}", "=".repeat(60));
}

fn log_batch_complete(outcome: &CommitOutcome) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 批次结算完成: 成功 {}/{}",
        outcome.added + outcome.removed,
        outcome.total()
    );
    info!(
        "结算时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    if outcome.failed > 0 {
        info!("❌ 失败: {}", outcome.failed);
    }
    info!("{}", "─".repeat(60));
}
