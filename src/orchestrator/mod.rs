//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责把本地暂存的改动批量同步到服务器。
//!
//! ## 模块划分
//!
//! ### `reconciler` - 提交批次执行器
//! - 把暂存差异（StagedDiff）转成远程新增/删除调用
//! - 全部并发发出，等所有操作结算
//! - 逐项统计成功与失败（CommitOutcome）
//!
//! ## 层次关系
//!
//! ```text
//! workflow::AssignmentSession (操作台会话)
//!     ↓
//! reconciler (执行一次提交批次)
//!     ↓
//! clients::AssignmentProvider (远程数据源)
//! ```
//!
//! ## 设计原则
//!
//! 1. **全量结算**：一个批次内任何失败都不打断其余操作
//! 2. **无业务逻辑**：差异怎么来的不归这里管，只负责执行和统计
//! 3. **不碰暂存区**：提交后的重置由会话层完成

pub mod reconciler;

// 重新导出主要类型
pub use reconciler::{reconcile, CommitOutcome, FailedOp, OpKind};
