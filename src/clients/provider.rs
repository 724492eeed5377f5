//! 分配数据源抽象
//!
//! 操作台只认这个接口，不关心数据从哪来：
//! 生产走 HTTP，测试用内存实现注入故障。

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Assignment, Exam, ExamId, Question, QuestionId, TaxonomySnapshot};

/// 考试分配数据源
///
/// 新增、删除以"考试 + 题目"定位分配记录，与服务器路由一致；
/// 改分则以分配记录本身为准。
#[async_trait]
pub trait AssignmentProvider: Send + Sync {
    /// 拉取考试
    async fn fetch_exam(&self, exam_id: ExamId) -> AppResult<Exam>;

    /// 拉取完整层级数据
    async fn fetch_taxonomy(&self) -> AppResult<TaxonomySnapshot>;

    /// 拉取全量题库
    async fn fetch_questions(&self) -> AppResult<Vec<Question>>;

    /// 拉取考试当前的全部分配（提交后以此为权威数据）
    async fn fetch_assignments(&self, exam_id: ExamId) -> AppResult<Vec<Assignment>>;

    /// 新建分配；服务器对重复请求幂等，直接返回已有记录
    async fn create_assignment(
        &self,
        exam_id: ExamId,
        question_id: QuestionId,
        marks: f64,
    ) -> AppResult<Assignment>;

    /// 删除分配；记录不存在时服务器返回 404，按错误处理
    async fn delete_assignment(&self, exam_id: ExamId, question_id: QuestionId) -> AppResult<()>;

    /// 修改已提交分配的分值，返回服务器确认后的记录
    async fn update_assignment_marks(
        &self,
        assignment: &Assignment,
        marks: f64,
    ) -> AppResult<Assignment>;
}
