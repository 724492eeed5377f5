//! # Exam Question Assign
//!
//! 考试题目分配操作台：把题库题目按层级范围分配进考试
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 数据源层（Clients）
//! - `clients/` - 持有远程接口，只暴露数据能力
//! - `AssignmentProvider` - 数据源抽象，测试可注入假实现
//! - `HttpProvider` - 直连考试平台 REST 接口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，全部是纯内存计算
//! - `AncestryIndex` - 层级祖先索引与范围包含判定
//! - `filter_candidates` - 可选题目过滤（范围 + 搜索/难度筛选）
//! - `AssignmentStaging` - 已提交/待新增/待移除三集合暂存
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义一场考试的完整编辑会话
//! - `AssignmentSession` - 加载 → 勾选/填分 → 提交 → 重置
//! - `CandidateRow` / `AssignedRow` - 操作台展示行
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/reconciler` - 提交批次执行器，并发下发全量结算
//!
//! 依赖方向自上而下：工作流调用编排与业务能力，编排只认
//! 数据源接口，业务能力层不感知网络。

pub mod clients;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{AssignmentProvider, HttpProvider};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{
    Assignment, Difficulty, Exam, Question, ScopeRef, TaxonomySnapshot, DEFAULT_MARKS,
};
pub use orchestrator::{reconcile, CommitOutcome};
pub use services::{
    filter_candidates, qualifies, AncestryIndex, AssignmentStaging, CandidateFilter, StagedDiff,
    StagingSummary, ToggleOutcome,
};
pub use workflow::{AssignedRow, AssignmentSession, CandidateRow, QuestionDisplay};
